//! Platform version lookups (API level to release number and codename).
//!
//! The table only serves display; nothing depends on it being complete.

struct VersionEntry {
    api: u32,
    release: &'static str,
    codename: &'static str,
}

const VERSIONS: &[VersionEntry] = &[
    VersionEntry { api: 1, release: "1.0", codename: "Base" },
    VersionEntry { api: 2, release: "1.1", codename: "Base 1.1" },
    VersionEntry { api: 3, release: "1.5", codename: "Cupcake" },
    VersionEntry { api: 4, release: "1.6", codename: "Donut" },
    VersionEntry { api: 5, release: "2.0", codename: "Eclair" },
    VersionEntry { api: 6, release: "2.0.1", codename: "Eclair" },
    VersionEntry { api: 7, release: "2.1", codename: "Eclair" },
    VersionEntry { api: 8, release: "2.2", codename: "Froyo" },
    VersionEntry { api: 9, release: "2.3", codename: "Gingerbread" },
    VersionEntry { api: 10, release: "2.3.3", codename: "Gingerbread" },
    VersionEntry { api: 11, release: "3.0", codename: "Honeycomb" },
    VersionEntry { api: 12, release: "3.1", codename: "Honeycomb" },
    VersionEntry { api: 13, release: "3.2", codename: "Honeycomb" },
    VersionEntry { api: 14, release: "4.0", codename: "Ice Cream Sandwich" },
    VersionEntry { api: 15, release: "4.0.3", codename: "Ice Cream Sandwich" },
    VersionEntry { api: 16, release: "4.1", codename: "Jelly Bean" },
    VersionEntry { api: 17, release: "4.2", codename: "Jelly Bean" },
    VersionEntry { api: 18, release: "4.3", codename: "Jelly Bean" },
    VersionEntry { api: 19, release: "4.4", codename: "KitKat" },
    VersionEntry { api: 20, release: "4.4W", codename: "KitKat Wear" },
    VersionEntry { api: 21, release: "5.0", codename: "Lollipop" },
    VersionEntry { api: 22, release: "5.1", codename: "Lollipop" },
    VersionEntry { api: 23, release: "6.0", codename: "Marshmallow" },
    VersionEntry { api: 24, release: "7.0", codename: "Nougat" },
    VersionEntry { api: 25, release: "7.1", codename: "Nougat" },
    VersionEntry { api: 26, release: "8.0", codename: "Oreo" },
    VersionEntry { api: 27, release: "8.1", codename: "Oreo" },
    VersionEntry { api: 28, release: "9", codename: "Pie" },
    VersionEntry { api: 29, release: "10", codename: "Quince Tart" },
    VersionEntry { api: 30, release: "11", codename: "Red Velvet Cake" },
    VersionEntry { api: 31, release: "12", codename: "Snow Cone" },
    VersionEntry { api: 32, release: "12L", codename: "Snow Cone v2" },
    VersionEntry { api: 33, release: "13", codename: "Tiramisu" },
    VersionEntry { api: 34, release: "14", codename: "Upside Down Cake" },
    VersionEntry { api: 35, release: "15", codename: "Vanilla Ice Cream" },
    VersionEntry { api: 36, release: "16", codename: "Baklava" },
];

/// Newest version the table knows about
pub const LATEST_KNOWN: u32 = 36;

fn entry(api: u32) -> Option<&'static VersionEntry> {
    VERSIONS.iter().find(|e| e.api == api)
}

/// Codename for an API level
pub fn version_name(api: u32) -> Option<&'static str> {
    entry(api).map(|e| e.codename)
}

/// Marketing release number for an API level
pub fn release(api: u32) -> Option<&'static str> {
    entry(api).map(|e| e.release)
}

/// "Android 10 (API 29)", or "API 99" for unknown levels
pub fn describe(api: u32) -> String {
    match release(api) {
        Some(release) => format!("Android {} (API {})", release, api),
        None => format!("API {}", api),
    }
}
