use humansize::{format_size, DECIMAL};

use crate::core::item::{Chart, ChartIcon, Reading};
use crate::platform::Capacity;

/// Capacity of the external volumes alone.
///
/// The enumerated total also counts the internal volume, so it is
/// subtracted back out.
pub fn external_storage(internal: Capacity, enumerated: Capacity) -> Capacity {
    Capacity::new(
        enumerated.total_bytes.saturating_sub(internal.total_bytes),
        enumerated
            .available_bytes
            .saturating_sub(internal.available_bytes),
    )
}

/// "3.2 GB used of 8.0 GB" with a matching chart
pub fn capacity_reading(capacity: Capacity, icon: ChartIcon) -> Reading {
    let used = capacity.used_bytes();
    let total = capacity.total_bytes;
    Reading::with_chart(
        format!(
            "{} used of {}",
            format_size(used, DECIMAL),
            format_size(total, DECIMAL)
        ),
        Chart::new(used, total, icon),
    )
}
