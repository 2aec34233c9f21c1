// UI and formatting module

pub mod formatters;

pub use formatters::{format_status, item_line, print_items, print_refresh_banner, usage_bar};
