//! Device identity: model, vendor and hardware identifiers.

use std::sync::Arc;

use super::{text, CategoryCollector, ProbeList};
use crate::core::availability::Requirement;
use crate::core::item::Category;
use crate::core::permissions::Permission;
use crate::platform::{BuildProperty, Platform, TelephonyField};

/// Hardware identifiers stopped being readable by apps at API 29
const IDENTIFIERS_REMOVED_IN: u32 = 29;

pub fn collector(platform: &Arc<dyn Platform>) -> CategoryCollector {
    let identifier = Requirement::permission(Permission::ReadPhoneState)
        .and_removed_in(IDENTIFIERS_REMOVED_IN);

    let mut probes = ProbeList::new(platform);
    probes
        .add("Model", Requirement::NONE, |p| {
            text(p.build_property(BuildProperty::Model))
        })
        .add("Manufacturer", Requirement::NONE, |p| {
            text(p.build_property(BuildProperty::Manufacturer))
        })
        .add("Brand", Requirement::NONE, |p| {
            text(p.build_property(BuildProperty::Brand))
        })
        .add("Board", Requirement::NONE, |p| {
            text(p.build_property(BuildProperty::Board))
        })
        .add("Hardware", Requirement::NONE, |p| {
            text(p.build_property(BuildProperty::Hardware))
        })
        .add("Hostname", Requirement::NONE, |p| text(p.hostname()))
        .add("Device ID", Requirement::NONE, |p| text(p.device_id()))
        .add("Build Fingerprint", Requirement::NONE, |p| {
            text(p.build_property(BuildProperty::Fingerprint))
        })
        .add("Serial Number", identifier, |p| text(p.serial_number()))
        .add("IMEI", identifier, |p| text(p.telephony(TelephonyField::Imei)));

    probes.into_collector(Category::Device)
}
