use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::*;

use super::{build_engine, build_runtime, filter_from_args};
use crate::core::config::Config;
use crate::ui;

/// Collect once and print the matching items
pub fn execute(matches: &ArgMatches, version_override: Option<u32>) -> Result<()> {
    let config = Config::load()?;
    let filter = filter_from_args(matches, &config)?;
    let as_json = matches.get_flag("json");

    let runtime = build_runtime(&config)?;
    let engine = build_engine(&runtime, &config, version_override);

    if !as_json {
        println!("{}", "Collecting device information...".cyan());
    }

    let pass = match filter.category {
        Some(category) => engine.load_category(category),
        None => engine.start(),
    };
    let reports = runtime.block_on(pass.wait());
    log::debug!("{} collector run(s) finished", reports.len());

    let items = filter.apply(&engine.store().snapshot());

    if as_json {
        let json = serde_json::to_string_pretty(&items).context("Failed to serialize items")?;
        println!("{}", json);
    } else {
        ui::print_items(&items);
        println!(
            "{} {}",
            "Platform version:".dimmed(),
            crate::core::versions::describe(engine.platform_version()).dimmed()
        );
    }

    Ok(())
}
