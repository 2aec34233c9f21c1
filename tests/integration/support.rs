// Shared fake platform for integration tests

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use devinfo::error::{DevinfoError, Result};
use devinfo::platform::{
    BatteryStatus, BuildProperty, Capacity, ChargeSource, ChargingState, CpuInfo, DisplayInfo,
    NetworkInterface, Platform, TelephonyField,
};
use parking_lot::Mutex;

pub const GB: u64 = 1_000_000_000;

pub struct FakePlatform {
    pub version: u32,
    pub battery: Mutex<Option<BatteryStatus>>,
    pub ssid_reads: AtomicUsize,
    pub imei_reads: AtomicUsize,
    pub storage_enumeration_fails: AtomicBool,
}

impl FakePlatform {
    pub fn new(version: u32) -> Self {
        Self {
            version,
            battery: Mutex::new(Some(BatteryStatus {
                percent: 72.0,
                state: ChargingState::Discharging,
                source: ChargeSource::Battery,
            })),
            ssid_reads: AtomicUsize::new(0),
            imei_reads: AtomicUsize::new(0),
            storage_enumeration_fails: AtomicBool::new(false),
        }
    }

    pub fn without_battery(self) -> Self {
        *self.battery.lock() = None;
        self
    }

    /// Internal storage still reads, but listing every volume fails
    pub fn with_failing_storage_enumeration(self) -> Self {
        self.storage_enumeration_fails.store(true, Ordering::SeqCst);
        self
    }
}

impl Platform for FakePlatform {
    fn version(&self) -> u32 {
        self.version
    }

    fn version_release(&self) -> Result<String> {
        Ok("14".to_string())
    }

    fn build_property(&self, property: BuildProperty) -> Result<String> {
        match property {
            BuildProperty::Model => Ok("Pixel 8".to_string()),
            BuildProperty::Manufacturer => Ok("Google".to_string()),
            BuildProperty::Brand => Ok("google".to_string()),
            BuildProperty::Board => panic!("board probe exploded"),
            BuildProperty::SecurityPatch => Ok("2024-05-05".to_string()),
            other => Err(DevinfoError::unsupported(other.label())),
        }
    }

    fn system_property(&self, key: &str) -> Result<String> {
        match key {
            "ro.treble.enabled" => Ok("true".to_string()),
            "ro.build.ab_update" => Ok("false".to_string()),
            _ => Err(DevinfoError::unsupported(key)),
        }
    }

    fn serial_number(&self) -> Result<String> {
        Ok("SN123".to_string())
    }

    fn telephony(&self, field: TelephonyField) -> Result<String> {
        match field {
            TelephonyField::Imei => {
                self.imei_reads.fetch_add(1, Ordering::SeqCst);
                Ok("356938035643809".to_string())
            }
            TelephonyField::SimCountry => Ok("us".to_string()),
            TelephonyField::DataNetworkType => Ok("LTE".to_string()),
            other => Err(DevinfoError::unsupported(other.label())),
        }
    }

    fn wifi_ssid(&self) -> Result<String> {
        self.ssid_reads.fetch_add(1, Ordering::SeqCst);
        Ok("\"home\"".to_string())
    }

    fn network_interfaces(&self) -> Result<Vec<NetworkInterface>> {
        Ok(vec![NetworkInterface {
            name: "wlan0".to_string(),
            mac_address: Some("02:00:00:00:00:00".to_string()),
            ipv4: vec!["192.168.1.20".to_string()],
            ipv6: vec![],
        }])
    }

    fn uptime(&self) -> Result<Duration> {
        Ok(Duration::from_secs(2 * 3600 + 30 * 60))
    }

    fn cpu(&self) -> Result<CpuInfo> {
        Ok(CpuInfo {
            architecture: "aarch64".to_string(),
            cores: 8,
            abis: vec!["arm64-v8a".to_string(), "armeabi-v7a".to_string()],
        })
    }

    fn memory(&self) -> Result<Capacity> {
        Ok(Capacity::new(8 * GB, 6 * GB))
    }

    fn swap(&self) -> Result<Capacity> {
        Ok(Capacity::new(0, 0))
    }

    fn internal_storage(&self) -> Result<Capacity> {
        Ok(Capacity::new(128 * GB, 64 * GB))
    }

    fn all_storage(&self) -> Result<Capacity> {
        if self.storage_enumeration_fails.load(Ordering::SeqCst) {
            return Err(DevinfoError::probe("volume enumeration failed"));
        }
        Ok(Capacity::new(192 * GB, 96 * GB))
    }

    fn display(&self) -> Result<DisplayInfo> {
        Ok(DisplayInfo {
            width_px: 1080,
            height_px: 2400,
            density_dpi: 420,
        })
    }

    fn battery(&self) -> Result<BatteryStatus> {
        self.battery
            .lock()
            .ok_or_else(|| DevinfoError::unsupported("battery"))
    }
}
