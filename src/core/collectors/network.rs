//! Radio and network state.

use std::sync::Arc;

use super::{text, CategoryCollector, ProbeList};
use crate::core::availability::Requirement;
use crate::core::item::{Category, Reading};
use crate::core::permissions::Permission;
use crate::error::{DevinfoError, Result};
use crate::platform::{NetworkInterface, Platform, TelephonyField};

/// Hardware MAC addresses are masked from API 23 on
const MAC_REMOVED_IN: u32 = 23;
const DATA_NETWORK_TYPE_SINCE: u32 = 24;

/// SSID as reported by the radio, without surrounding quotes
fn clean_ssid(raw: String) -> Result<String> {
    let ssid = raw.trim().trim_matches('"');
    if ssid.is_empty() || ssid == "<unknown ssid>" {
        return Err(DevinfoError::probe("not connected to a wireless network"));
    }
    Ok(ssid.to_string())
}

fn join_addresses<F>(interfaces: Vec<NetworkInterface>, pick: F) -> Result<Reading>
where
    F: Fn(&NetworkInterface) -> &Vec<String>,
{
    let addresses: Vec<&str> = interfaces
        .iter()
        .flat_map(|iface| pick(iface).iter().map(String::as_str))
        .collect();
    if addresses.is_empty() {
        return Ok(Reading::empty());
    }
    Ok(Reading::text(addresses.join(", ")))
}

pub fn collector(platform: &Arc<dyn Platform>) -> CategoryCollector {
    let mut probes = ProbeList::new(platform);
    probes
        .add(
            "Wi-Fi SSID",
            Requirement::permission(Permission::AccessFineLocation),
            |p| text(p.wifi_ssid().and_then(clean_ssid)),
        )
        .add("Wi-Fi MAC Address", Requirement::removed_in(MAC_REMOVED_IN), |p| {
            text(p.wifi_mac_address())
        })
        .add(
            "Bluetooth MAC Address",
            Requirement::removed_in(MAC_REMOVED_IN),
            |p| text(p.bluetooth_mac_address()),
        )
        .add(
            "Bluetooth Name",
            Requirement::permission(Permission::BluetoothConnect),
            |p| text(p.bluetooth_name()),
        )
        .add("IPv4 Address", Requirement::NONE, |p| {
            join_addresses(p.network_interfaces()?, |iface| &iface.ipv4)
        })
        .add("IPv6 Address", Requirement::NONE, |p| {
            join_addresses(p.network_interfaces()?, |iface| &iface.ipv6)
        })
        .add("Network Interfaces", Requirement::NONE, |p| {
            let names: Vec<String> = p
                .network_interfaces()?
                .into_iter()
                .map(|iface| iface.name)
                .collect();
            Ok(Reading::text(names.join(", ")))
        })
        .add("Network Operator", Requirement::NONE, |p| {
            text(p.telephony(TelephonyField::NetworkOperator))
        })
        .add("SIM Country", Requirement::NONE, |p| {
            text(p.telephony(TelephonyField::SimCountry).map(|c| c.to_uppercase()))
        })
        .add(
            "Data Network Type",
            Requirement::permission(Permission::ReadPhoneState).and_since(DATA_NETWORK_TYPE_SINCE),
            |p| text(p.telephony(TelephonyField::DataNetworkType)),
        );

    probes.into_collector(Category::Network)
}
