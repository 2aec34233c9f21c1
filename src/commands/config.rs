use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;

use crate::core::config::Config;
use crate::core::permissions::Permission;
use crate::core::versions;

fn permission_arg(matches: &ArgMatches) -> Result<Permission> {
    let raw = matches
        .get_one::<String>("permission")
        .context("Permission argument is required")?;
    Ok(raw.parse()?)
}

pub fn handle_grant(matches: &ArgMatches) -> Result<()> {
    let permission = permission_arg(matches)?;
    let mut config = Config::load()?;

    if config.grant(permission) {
        config.save()?;
        println!("{} {}", "Granted".green().bold(), permission.id().cyan());
    } else {
        println!("{} {}", permission.id().cyan(), "is already granted".yellow());
    }
    Ok(())
}

pub fn handle_revoke(matches: &ArgMatches) -> Result<()> {
    let permission = permission_arg(matches)?;
    let mut config = Config::load()?;

    if config.revoke(permission) {
        config.save()?;
        println!("{} {}", "Revoked".green().bold(), permission.id().cyan());
    } else {
        println!("{} {}", permission.id().cyan(), "was not granted".yellow());
    }
    Ok(())
}

pub fn handle_show() -> Result<()> {
    let config = Config::load()?;
    let path = Config::get_config_path()?;

    println!("{} {}", "Config file:".white(), path.display().to_string().dimmed());
    println!();

    println!("{}", "Permissions".bold().green());
    for permission in Permission::ALL {
        let marker = if config.granted_permissions.contains(&permission) {
            "granted".green()
        } else {
            "not granted".bright_black()
        };
        println!("  {:<42} {}", permission.id(), marker);
    }
    println!();

    let version = match config.platform_version {
        Some(api) => versions::describe(api),
        None => format!("host default ({})", versions::describe(versions::LATEST_KNOWN)),
    };
    println!("{:<18} {}", "Platform version:", version.cyan());
    println!("{:<18} {}", "Hide unavailable:", config.hide_unavailable.to_string().cyan());
    println!("{:<18} {}", "Worker threads:", config.worker_threads().to_string().cyan());
    Ok(())
}
