// Core collection engine

pub mod availability;
pub mod battery_listener;
pub mod collectors;
pub mod config;
pub mod engine;
pub mod item;
pub mod orchestrator;
pub mod permissions;
pub mod query;
pub mod store;
pub mod versions;

// Re-export commonly used items
pub use availability::{AvailabilityPolicy, Requirement};
pub use config::Config;
pub use engine::InfoEngine;
pub use item::{Category, Item, ItemValue, Unavailable};
pub use orchestrator::{PassHandle, Status};
pub use permissions::{GrantedPermissions, Permission, PermissionChecker, PermissionGrant};
pub use query::{LiveQuery, QueryFilter};
pub use store::ItemStore;
