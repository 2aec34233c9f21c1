//! Availability policy.
//!
//! Decides whether a probe may run on this platform and with the current
//! permissions, and turns whatever the probe does into exactly one
//! [`ItemValue`]. Probe errors and panics stop here.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use log::{debug, warn};

use super::item::{ItemValue, Reading, Unavailable};
use super::permissions::{Permission, PermissionChecker};
use crate::error::Result;

/// Capability a probe needs before it may run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Requirement {
    pub permission: Option<Permission>,
    /// First platform version that has the feature
    pub min_version: Option<u32>,
    /// Platform version that removed the feature
    pub removed_in: Option<u32>,
}

impl Requirement {
    pub const NONE: Requirement = Requirement {
        permission: None,
        min_version: None,
        removed_in: None,
    };

    pub fn none() -> Self {
        Self::NONE
    }

    pub fn permission(permission: Permission) -> Self {
        Self::NONE.and_permission(permission)
    }

    pub fn since(version: u32) -> Self {
        Self::NONE.and_since(version)
    }

    pub fn removed_in(version: u32) -> Self {
        Self::NONE.and_removed_in(version)
    }

    pub const fn and_permission(mut self, permission: Permission) -> Self {
        self.permission = Some(permission);
        self
    }

    pub const fn and_since(mut self, version: u32) -> Self {
        self.min_version = Some(version);
        self
    }

    pub const fn and_removed_in(mut self, version: u32) -> Self {
        self.removed_in = Some(version);
        self
    }
}

/// Classifies probe outcomes for one platform version and permission source
#[derive(Clone)]
pub struct AvailabilityPolicy {
    version: u32,
    permissions: Arc<dyn PermissionChecker>,
}

impl AvailabilityPolicy {
    pub fn new(version: u32, permissions: Arc<dyn PermissionChecker>) -> Self {
        Self {
            version,
            permissions,
        }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Structural reason the requirement cannot be met, if any.
    ///
    /// Version checks come first: they are permanent, so a missing
    /// permission is only reported when granting it would help.
    pub fn check(&self, requirement: &Requirement) -> Option<Unavailable> {
        if let Some(min) = requirement.min_version {
            if self.version < min {
                return Some(Unavailable::NotPossibleYet { min });
            }
        }

        if let Some(since) = requirement.removed_in {
            if self.version >= since {
                return Some(Unavailable::NoLongerPossible { since });
            }
        }

        if let Some(permission) = requirement.permission {
            if !self.permissions.has_permission(permission) {
                return Some(Unavailable::needs_permission(permission));
            }
        }

        None
    }

    /// Run `probe` if the requirement allows it and classify the outcome
    pub fn evaluate<F>(&self, title: &str, requirement: &Requirement, probe: F) -> ItemValue
    where
        F: FnOnce() -> Result<Reading>,
    {
        if let Some(reason) = self.check(requirement) {
            debug!("Skipping probe '{}': {}", title, reason);
            return ItemValue::Unavailable(reason);
        }

        match panic::catch_unwind(AssertUnwindSafe(probe)) {
            Ok(Ok(reading)) => reading.into(),
            Ok(Err(e)) => {
                warn!("Probe '{}' failed: {}", title, e);
                ItemValue::empty()
            }
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                warn!("Probe '{}' panicked: {}", title, message);
                ItemValue::empty()
            }
        }
    }
}

impl std::fmt::Debug for AvailabilityPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AvailabilityPolicy")
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}
