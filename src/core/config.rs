use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::permissions::Permission;

pub const DEFAULT_WORKER_THREADS: usize = 2;

fn default_worker_threads() -> usize {
    DEFAULT_WORKER_THREADS
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Permissions treated as granted at startup
    #[serde(default)]
    pub granted_permissions: Vec<Permission>,
    /// Overrides the platform version reported by the host
    #[serde(default)]
    pub platform_version: Option<u32>,
    #[serde(default)]
    pub hide_unavailable: bool,
    #[serde(default = "default_worker_threads")]
    pub worker_threads: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            granted_permissions: Vec::new(),
            platform_version: None,
            hide_unavailable: false,
            worker_threads: DEFAULT_WORKER_THREADS,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let data = fs::read(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        // Empty or unreadable files fall back to defaults
        if data.is_empty() {
            return Ok(Config::default());
        }
        Ok(serde_json::from_slice(&data).unwrap_or_else(|e| {
            log::warn!("Ignoring corrupt config {:?}: {}", path, e);
            Config::default()
        }))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let data = serde_json::to_vec_pretty(self).with_context(|| "Failed to serialize config")?;

        fs::write(path, data)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        Ok(())
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().with_context(|| "Could not determine config directory")?;

        Ok(config_dir.join("devinfo").join("config.json"))
    }

    /// Returns false if it was already granted
    pub fn grant(&mut self, permission: Permission) -> bool {
        if self.granted_permissions.contains(&permission) {
            return false;
        }
        self.granted_permissions.push(permission);
        true
    }

    /// Returns false if it was not granted
    pub fn revoke(&mut self, permission: Permission) -> bool {
        let before = self.granted_permissions.len();
        self.granted_permissions.retain(|p| *p != permission);
        self.granted_permissions.len() != before
    }

    pub fn worker_threads(&self) -> usize {
        self.worker_threads.max(1)
    }
}
