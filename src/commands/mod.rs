// Command handlers module
pub mod config;
pub mod list;
pub mod watch;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::ArgMatches;
use tokio::runtime::Runtime;

use crate::core::config::Config;
use crate::core::engine::InfoEngine;
use crate::core::item::Category;
use crate::core::permissions::GrantedPermissions;
use crate::core::query::QueryFilter;
use crate::platform::HostPlatform;

// Re-exports for cleaner imports
pub use list::execute as list;
pub use watch::execute as watch;

/// Runtime the collectors and the battery monitor run on
pub fn build_runtime(config: &Config) -> Result<Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.worker_threads())
        .enable_time()
        .thread_name("devinfo-worker")
        .build()
        .context("Failed to start collection runtime")
}

/// Engine over the host platform, seeded from the config.
/// A command-line version override wins over the configured one.
pub fn build_engine(runtime: &Runtime, config: &Config, version_override: Option<u32>) -> InfoEngine {
    let platform = HostPlatform::new(version_override.or(config.platform_version));
    let permissions = GrantedPermissions::with(config.granted_permissions.iter().copied());
    InfoEngine::new(
        runtime.handle().clone(),
        Arc::new(platform),
        Arc::new(permissions),
    )
}

/// Filter built from the shared `--category`, `--search` and
/// `--hide-unavailable` arguments
pub fn filter_from_args(matches: &ArgMatches, config: &Config) -> Result<QueryFilter> {
    let mut filter = QueryFilter::new()
        .hide_unavailable(config.hide_unavailable || matches.get_flag("hide-unavailable"));

    if let Some(category) = matches.get_one::<String>("category") {
        let category: Category = category.parse()?;
        filter = filter.category(category);
    }
    if let Some(search) = matches.get_one::<String>("search") {
        filter = filter.search(search.as_str());
    }

    Ok(filter)
}
