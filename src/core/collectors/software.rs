//! Operating system release, build and runtime state.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};

use super::{text, CategoryCollector, ProbeList};
use crate::core::availability::Requirement;
use crate::core::item::{Category, Reading};
use crate::core::versions;
use crate::error::{DevinfoError, Result};
use crate::platform::{BuildProperty, Platform};

const SECURITY_PATCH_SINCE: u32 = 23;
const SEAMLESS_UPDATES_SINCE: u32 = 24;
const TREBLE_SINCE: u32 = 26;
const DYNAMIC_PARTITIONS_SINCE: u32 = 29;

/// "3d 4h 12m", dropping leading zero units
pub fn format_uptime(uptime: Duration) -> String {
    let total_minutes = uptime.as_secs() / 60;
    let days = total_minutes / (24 * 60);
    let hours = (total_minutes / 60) % 24;
    let minutes = total_minutes % 60;

    if days > 0 {
        format!("{}d {}h {}m", days, hours, minutes)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

fn format_boot_time(epoch_secs: i64) -> Result<String> {
    let utc = DateTime::from_timestamp(epoch_secs, 0)
        .ok_or_else(|| DevinfoError::probe(format!("invalid boot timestamp {}", epoch_secs)))?;
    Ok(utc.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
}

/// Boolean system properties render as Supported / Not supported
fn supported_flag(raw: Result<String>) -> Result<Reading> {
    let raw = raw?;
    let label = if raw.trim().eq_ignore_ascii_case("true") {
        "Supported"
    } else {
        "Not supported"
    };
    Ok(Reading::text(label))
}

pub fn collector(platform: &Arc<dyn Platform>) -> CategoryCollector {
    let mut probes = ProbeList::new(platform);
    probes
        .add("Android Version", Requirement::NONE, |p| {
            text(p.version_release())
        })
        .add("API Level", Requirement::NONE, |p| {
            Ok(Reading::text(p.version().to_string()))
        })
        .add("Version Codename", Requirement::NONE, |p| {
            versions::version_name(p.version())
                .map(Reading::text)
                .ok_or_else(|| DevinfoError::probe(format!("no codename for API {}", p.version())))
        })
        .add("Build ID", Requirement::NONE, |p| {
            text(p.build_property(BuildProperty::BuildId))
        })
        .add(
            "Security Patch",
            Requirement::since(SECURITY_PATCH_SINCE),
            |p| text(p.build_property(BuildProperty::SecurityPatch)),
        )
        .add("Kernel Version", Requirement::NONE, |p| text(p.kernel_version()))
        .add("Bootloader", Requirement::NONE, |p| {
            text(p.build_property(BuildProperty::Bootloader))
        })
        .add("Uptime", Requirement::NONE, |p| {
            Ok(Reading::text(format_uptime(p.uptime()?)))
        })
        .add("Boot Time", Requirement::NONE, |p| {
            text(format_boot_time(p.boot_time()?))
        })
        .add("Language", Requirement::NONE, |p| text(p.language()))
        .add("Time Zone", Requirement::NONE, |p| text(p.time_zone()))
        .add(
            "Seamless Updates",
            Requirement::since(SEAMLESS_UPDATES_SINCE),
            |p| supported_flag(p.system_property("ro.build.ab_update")),
        )
        .add("Treble", Requirement::since(TREBLE_SINCE), |p| {
            supported_flag(p.system_property("ro.treble.enabled"))
        })
        .add(
            "Dynamic Partitions",
            Requirement::since(DYNAMIC_PARTITIONS_SINCE),
            |p| supported_flag(p.system_property("ro.boot.dynamic_partitions")),
        );

    probes.into_collector(Category::Software)
}
