use anyhow::Result;
use clap::ArgMatches;
use colored::*;
use tokio::sync::broadcast;

use super::{build_engine, build_runtime, filter_from_args};
use crate::core::config::Config;
use crate::ui;

/// Print the live view on every change until Ctrl+C
pub fn execute(matches: &ArgMatches, version_override: Option<u32>) -> Result<()> {
    let config = Config::load()?;
    let filter = filter_from_args(matches, &config)?;

    let runtime = build_runtime(&config)?;
    let engine = build_engine(&runtime, &config, version_override);

    let (shutdown_tx, _) = broadcast::channel::<()>(1);
    let ctrlc_tx = shutdown_tx.clone();
    ctrlc::set_handler(move || {
        let _ = ctrlc_tx.send(());
    })
    .map_err(|e| anyhow::anyhow!("Failed to set Ctrl+C handler: {}", e))?;

    println!("{}", "Watching device information...".cyan().bold());
    println!("{}", "Press Ctrl+C to stop".dimmed());

    runtime.block_on(async {
        let mut shutdown = shutdown_tx.subscribe();
        let monitor = engine.spawn_battery_monitor(shutdown_tx.subscribe());
        let mut query = engine.query(filter);

        match query.filter().category {
            Some(category) => engine.load_category(category),
            None => engine.start(),
        };

        loop {
            tokio::select! {
                next = query.next() => {
                    let Some(items) = next else { break };
                    ui::print_refresh_banner(items.len(), engine.status());
                    ui::print_items(&items);
                }
                _ = shutdown.recv() => break,
            }
        }

        let _ = monitor.await;
    });

    println!("{}", "Stopped.".yellow());
    Ok(())
}
