//! Probe set for the machine devinfo runs on.
//!
//! Backed by `sysinfo` for OS, memory, disk and network figures and by the
//! `battery` crate for power state. On Linux a few identifiers come straight
//! from `/sys` and `/etc`.

use std::fs;
use std::path::Path;
use std::time::Duration;

use sysinfo::{CpuRefreshKind, Disks, MemoryRefreshKind, Networks, RefreshKind, System};

use super::{
    BatteryStatus, BuildProperty, Capacity, ChargeSource, ChargingState, CpuInfo,
    NetworkInterface, Platform,
};
use crate::core::versions;
use crate::error::{DevinfoError, Result};

#[cfg(target_os = "linux")]
const DMI_DIR: &str = "/sys/class/dmi/id";

pub struct HostPlatform {
    version: u32,
}

impl HostPlatform {
    /// `version` overrides the reported platform version
    pub fn new(version: Option<u32>) -> Self {
        Self {
            version: version.unwrap_or(versions::LATEST_KNOWN),
        }
    }
}

impl Default for HostPlatform {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Read a small text file, treating an empty file as a failure
fn read_trimmed<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let value = fs::read_to_string(path)?.trim().to_string();
    if value.is_empty() {
        return Err(DevinfoError::probe(format!("{} is empty", path.display())));
    }
    Ok(value)
}

fn non_empty(value: Option<String>, what: &str) -> Result<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| DevinfoError::probe(format!("{} not reported", what)))
}

#[cfg(target_os = "linux")]
fn dmi(field: &str) -> Result<String> {
    read_trimmed(Path::new(DMI_DIR).join(field))
}

#[cfg(not(target_os = "linux"))]
fn dmi(field: &str) -> Result<String> {
    Err(DevinfoError::unsupported(format!("dmi field {}", field)))
}

/// Value of `KEY=value` in an os-release style file
fn os_release_field(content: &str, key: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let (k, v) = line.split_once('=')?;
        (k.trim() == key).then(|| v.trim().trim_matches('"').to_string())
    })
}

fn abis_for(arch: &str) -> Vec<String> {
    let abis: &[&str] = match arch {
        "x86_64" => &["x86_64", "x86"],
        "x86" => &["x86"],
        "aarch64" => &["arm64-v8a", "armeabi-v7a", "armeabi"],
        "arm" => &["armeabi-v7a", "armeabi"],
        "riscv64" => &["riscv64"],
        other => return vec![other.to_string()],
    };
    abis.iter().map(|s| s.to_string()).collect()
}

/// Power source currently feeding the machine, from `/sys/class/power_supply`
#[cfg(target_os = "linux")]
fn charge_source(state: ChargingState) -> ChargeSource {
    let Ok(entries) = fs::read_dir("/sys/class/power_supply") else {
        return ChargeSource::Unknown;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let online = read_trimmed(path.join("online")).unwrap_or_default();
        if online != "1" {
            continue;
        }
        match read_trimmed(path.join("type")).unwrap_or_default().as_str() {
            "Mains" => return ChargeSource::Ac,
            "USB" | "USB_C" | "USB_PD" => return ChargeSource::Usb,
            "Wireless" => return ChargeSource::Wireless,
            _ => {}
        }
    }

    match state {
        ChargingState::Discharging => ChargeSource::Battery,
        _ => ChargeSource::Unknown,
    }
}

#[cfg(not(target_os = "linux"))]
fn charge_source(state: ChargingState) -> ChargeSource {
    match state {
        ChargingState::Discharging => ChargeSource::Battery,
        _ => ChargeSource::Unknown,
    }
}

impl Platform for HostPlatform {
    fn version(&self) -> u32 {
        self.version
    }

    fn version_release(&self) -> Result<String> {
        non_empty(System::os_version(), "os version")
    }

    fn build_property(&self, property: BuildProperty) -> Result<String> {
        match property {
            BuildProperty::Model => dmi("product_name"),
            BuildProperty::Manufacturer => dmi("sys_vendor"),
            BuildProperty::Brand => dmi("board_vendor"),
            BuildProperty::Board => dmi("board_name"),
            BuildProperty::Hardware => dmi("product_family"),
            BuildProperty::Bootloader => dmi("bios_version"),
            BuildProperty::Fingerprint => {
                let name = non_empty(System::name(), "os name")?;
                let version = non_empty(System::os_version(), "os version")?;
                let kernel = non_empty(System::kernel_version(), "kernel version")?;
                Ok(format!(
                    "{}/{}/{}:{}",
                    name,
                    std::env::consts::ARCH,
                    version,
                    kernel
                ))
            }
            BuildProperty::BuildId => {
                let content = fs::read_to_string("/etc/os-release")?;
                os_release_field(&content, "BUILD_ID")
                    .or_else(|| os_release_field(&content, "VERSION_ID"))
                    .ok_or_else(|| DevinfoError::probe("no build id in /etc/os-release"))
            }
            BuildProperty::SecurityPatch => {
                Err(DevinfoError::unsupported(property.label()))
            }
        }
    }

    fn serial_number(&self) -> Result<String> {
        dmi("product_serial")
    }

    fn device_id(&self) -> Result<String> {
        read_trimmed("/etc/machine-id")
    }

    fn hostname(&self) -> Result<String> {
        non_empty(System::host_name(), "hostname")
    }

    fn wifi_mac_address(&self) -> Result<String> {
        self.network_interfaces()?
            .into_iter()
            .find(|iface| iface.name.starts_with("wl"))
            .and_then(|iface| iface.mac_address)
            .ok_or_else(|| DevinfoError::probe("no wireless interface"))
    }

    fn bluetooth_mac_address(&self) -> Result<String> {
        read_trimmed("/sys/class/bluetooth/hci0/address")
    }

    fn network_interfaces(&self) -> Result<Vec<NetworkInterface>> {
        let networks = Networks::new_with_refreshed_list();
        let mut interfaces: Vec<NetworkInterface> = networks
            .iter()
            .map(|(name, data)| {
                let mac = data.mac_address();
                let mut ipv4 = Vec::new();
                let mut ipv6 = Vec::new();
                for network in data.ip_networks() {
                    if network.addr.is_loopback() {
                        continue;
                    }
                    if network.addr.is_ipv4() {
                        ipv4.push(network.addr.to_string());
                    } else {
                        ipv6.push(network.addr.to_string());
                    }
                }
                NetworkInterface {
                    name: name.to_string(),
                    mac_address: (!mac.is_unspecified()).then(|| mac.to_string()),
                    ipv4,
                    ipv6,
                }
            })
            .collect();
        interfaces.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(interfaces)
    }

    fn kernel_version(&self) -> Result<String> {
        non_empty(System::kernel_version(), "kernel version")
    }

    fn uptime(&self) -> Result<Duration> {
        Ok(Duration::from_secs(System::uptime()))
    }

    fn boot_time(&self) -> Result<i64> {
        Ok(System::boot_time() as i64)
    }

    fn language(&self) -> Result<String> {
        let raw = ["LC_ALL", "LC_MESSAGES", "LANG"]
            .iter()
            .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()))
            .ok_or_else(|| DevinfoError::probe("no locale variables set"))?;
        let tag = raw.split('.').next().unwrap_or(&raw).replace('_', "-");
        Ok(tag)
    }

    fn time_zone(&self) -> Result<String> {
        if let Ok(tz) = std::env::var("TZ") {
            if !tz.is_empty() {
                return Ok(tz.trim_start_matches(':').to_string());
            }
        }
        if let Ok(tz) = read_trimmed("/etc/timezone") {
            return Ok(tz);
        }
        let target = fs::read_link("/etc/localtime")?;
        let target = target.to_string_lossy();
        target
            .split_once("zoneinfo/")
            .map(|(_, zone)| zone.to_string())
            .ok_or_else(|| DevinfoError::probe("unrecognized /etc/localtime target"))
    }

    fn cpu(&self) -> Result<CpuInfo> {
        let sys = System::new_with_specifics(
            RefreshKind::nothing().with_cpu(CpuRefreshKind::everything()),
        );
        let cores = sys.cpus().len();
        if cores == 0 {
            return Err(DevinfoError::probe("no cpus reported"));
        }
        let architecture = std::env::consts::ARCH.to_string();
        Ok(CpuInfo {
            abis: abis_for(&architecture),
            architecture,
            cores,
        })
    }

    fn memory(&self) -> Result<Capacity> {
        let sys = System::new_with_specifics(
            RefreshKind::nothing().with_memory(MemoryRefreshKind::everything()),
        );
        let total = sys.total_memory();
        if total == 0 {
            return Err(DevinfoError::probe("total memory reported as zero"));
        }
        Ok(Capacity::new(total, sys.available_memory()))
    }

    fn swap(&self) -> Result<Capacity> {
        let sys = System::new_with_specifics(
            RefreshKind::nothing().with_memory(MemoryRefreshKind::everything()),
        );
        Ok(Capacity::new(sys.total_swap(), sys.free_swap()))
    }

    fn internal_storage(&self) -> Result<Capacity> {
        let anchor = dirs::data_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| DevinfoError::probe("no data directory"))?;
        let disks = Disks::new_with_refreshed_list();

        // Longest mount point containing the data directory
        disks
            .list()
            .iter()
            .filter(|disk| anchor.starts_with(disk.mount_point()))
            .max_by_key(|disk| disk.mount_point().as_os_str().len())
            .map(|disk| Capacity::new(disk.total_space(), disk.available_space()))
            .ok_or_else(|| DevinfoError::probe("no volume holds the data directory"))
    }

    fn all_storage(&self) -> Result<Capacity> {
        let disks = Disks::new_with_refreshed_list();
        if disks.list().is_empty() {
            return Err(DevinfoError::probe("no volumes mounted"));
        }
        Ok(disks.list().iter().fold(Capacity::default(), |acc, disk| {
            Capacity::new(
                acc.total_bytes + disk.total_space(),
                acc.available_bytes + disk.available_space(),
            )
        }))
    }

    fn battery(&self) -> Result<BatteryStatus> {
        use battery::units::ratio::percent;

        let manager = battery::Manager::new()
            .map_err(|e| DevinfoError::probe(format!("battery manager: {}", e)))?;
        let first = manager
            .batteries()
            .map_err(|e| DevinfoError::probe(format!("listing batteries: {}", e)))?
            .next()
            .ok_or_else(|| DevinfoError::unsupported("no battery present"))?;
        let battery = first.map_err(|e| DevinfoError::probe(format!("reading battery: {}", e)))?;

        let state = match battery.state() {
            battery::State::Charging => ChargingState::Charging,
            battery::State::Discharging | battery::State::Empty => ChargingState::Discharging,
            battery::State::Full => ChargingState::Full,
            _ => ChargingState::Unknown,
        };

        Ok(BatteryStatus {
            percent: battery.state_of_charge().get::<percent>(),
            state,
            source: charge_source(state),
        })
    }
}
