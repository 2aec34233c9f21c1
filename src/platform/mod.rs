//! Probe set: fallible accessors for raw environment facts.
//!
//! Every accessor has a default that reports the fact as unsupported, so an
//! implementation only overrides what its platform can actually read.

pub mod host;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::error::{DevinfoError, Result};

pub use host::HostPlatform;

/// Build-time identifiers of the running system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildProperty {
    Model,
    Manufacturer,
    Brand,
    Board,
    Hardware,
    Fingerprint,
    BuildId,
    Bootloader,
    SecurityPatch,
}

impl BuildProperty {
    pub fn label(&self) -> &'static str {
        match self {
            BuildProperty::Model => "model",
            BuildProperty::Manufacturer => "manufacturer",
            BuildProperty::Brand => "brand",
            BuildProperty::Board => "board",
            BuildProperty::Hardware => "hardware",
            BuildProperty::Fingerprint => "fingerprint",
            BuildProperty::BuildId => "build id",
            BuildProperty::Bootloader => "bootloader",
            BuildProperty::SecurityPatch => "security patch",
        }
    }
}

/// Facts read from the cellular radio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TelephonyField {
    Imei,
    NetworkOperator,
    SimCountry,
    DataNetworkType,
}

impl TelephonyField {
    pub fn label(&self) -> &'static str {
        match self {
            TelephonyField::Imei => "imei",
            TelephonyField::NetworkOperator => "network operator",
            TelephonyField::SimCountry => "sim country",
            TelephonyField::DataNetworkType => "data network type",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkInterface {
    pub name: String,
    pub mac_address: Option<String>,
    pub ipv4: Vec<String>,
    pub ipv6: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuInfo {
    pub architecture: String,
    pub cores: usize,
    pub abis: Vec<String>,
}

/// Total and available bytes of a memory pool or volume
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capacity {
    pub total_bytes: u64,
    pub available_bytes: u64,
}

impl Capacity {
    pub fn new(total_bytes: u64, available_bytes: u64) -> Self {
        Self {
            total_bytes,
            available_bytes,
        }
    }

    pub fn used_bytes(&self) -> u64 {
        self.total_bytes.saturating_sub(self.available_bytes)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayInfo {
    pub width_px: u32,
    pub height_px: u32,
    pub density_dpi: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChargingState {
    Charging,
    Discharging,
    Full,
    NotCharging,
    Unknown,
}

impl fmt::Display for ChargingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChargingState::Charging => write!(f, "Charging"),
            ChargingState::Discharging => write!(f, "Discharging"),
            ChargingState::Full => write!(f, "Full"),
            ChargingState::NotCharging => write!(f, "Not Charging"),
            ChargingState::Unknown => write!(f, "Unknown"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChargeSource {
    Ac,
    Usb,
    Wireless,
    Battery,
    Unknown,
}

impl fmt::Display for ChargeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChargeSource::Ac => write!(f, "AC"),
            ChargeSource::Usb => write!(f, "USB"),
            ChargeSource::Wireless => write!(f, "Wireless"),
            ChargeSource::Battery => write!(f, "Battery"),
            ChargeSource::Unknown => write!(f, "Unknown"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryStatus {
    pub percent: f32,
    pub state: ChargingState,
    pub source: ChargeSource,
}

fn unsupported<T>(what: &str) -> Result<T> {
    Err(DevinfoError::unsupported(what))
}

/// Accessors for environment facts.
///
/// Implementations must be side-effect free and cheap enough to call from a
/// blocking worker; none of them may perform network I/O.
pub trait Platform: Send + Sync {
    /// Platform API level; fixed for the life of the process
    fn version(&self) -> u32;

    fn version_release(&self) -> Result<String> {
        unsupported("version release")
    }

    fn build_property(&self, property: BuildProperty) -> Result<String> {
        unsupported(property.label())
    }

    /// Raw system property lookup, e.g. `ro.treble.enabled`
    fn system_property(&self, key: &str) -> Result<String> {
        unsupported(key)
    }

    fn serial_number(&self) -> Result<String> {
        unsupported("serial number")
    }

    fn device_id(&self) -> Result<String> {
        unsupported("device id")
    }

    fn hostname(&self) -> Result<String> {
        unsupported("hostname")
    }

    fn telephony(&self, field: TelephonyField) -> Result<String> {
        unsupported(field.label())
    }

    fn wifi_ssid(&self) -> Result<String> {
        unsupported("wi-fi ssid")
    }

    fn wifi_mac_address(&self) -> Result<String> {
        unsupported("wi-fi mac address")
    }

    fn bluetooth_mac_address(&self) -> Result<String> {
        unsupported("bluetooth mac address")
    }

    fn bluetooth_name(&self) -> Result<String> {
        unsupported("bluetooth name")
    }

    fn network_interfaces(&self) -> Result<Vec<NetworkInterface>> {
        unsupported("network interfaces")
    }

    fn kernel_version(&self) -> Result<String> {
        unsupported("kernel version")
    }

    fn uptime(&self) -> Result<Duration> {
        unsupported("uptime")
    }

    /// Boot time as seconds since the Unix epoch
    fn boot_time(&self) -> Result<i64> {
        unsupported("boot time")
    }

    fn language(&self) -> Result<String> {
        unsupported("language")
    }

    fn time_zone(&self) -> Result<String> {
        unsupported("time zone")
    }

    fn cpu(&self) -> Result<CpuInfo> {
        unsupported("cpu")
    }

    fn memory(&self) -> Result<Capacity> {
        unsupported("memory")
    }

    fn swap(&self) -> Result<Capacity> {
        unsupported("swap")
    }

    /// The volume holding the system's own data
    fn internal_storage(&self) -> Result<Capacity> {
        unsupported("internal storage")
    }

    /// Sum over every enumerated volume, internal one included
    fn all_storage(&self) -> Result<Capacity> {
        unsupported("storage volumes")
    }

    fn display(&self) -> Result<DisplayInfo> {
        unsupported("display")
    }

    fn battery(&self) -> Result<BatteryStatus> {
        unsupported("battery")
    }
}
