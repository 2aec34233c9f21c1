//! Runtime permissions gating individual probes.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::{DevinfoError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ReadPhoneState,
    AccessFineLocation,
    BluetoothConnect,
}

impl Permission {
    pub const ALL: [Permission; 3] = [
        Permission::ReadPhoneState,
        Permission::AccessFineLocation,
        Permission::BluetoothConnect,
    ];

    /// Platform permission identifier
    pub fn id(&self) -> &'static str {
        match self {
            Permission::ReadPhoneState => "android.permission.READ_PHONE_STATE",
            Permission::AccessFineLocation => "android.permission.ACCESS_FINE_LOCATION",
            Permission::BluetoothConnect => "android.permission.BLUETOOTH_CONNECT",
        }
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            Permission::ReadPhoneState => "read_phone_state",
            Permission::AccessFineLocation => "access_fine_location",
            Permission::BluetoothConnect => "bluetooth_connect",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Permission::ReadPhoneState => "phone state",
            Permission::AccessFineLocation => "precise location",
            Permission::BluetoothConnect => "nearby devices",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for Permission {
    type Err = DevinfoError;

    /// Accepts the full id, the short name, or the short name with dashes
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().replace('-', "_");
        Permission::ALL
            .into_iter()
            .find(|p| {
                p.id() == s.trim()
                    || p.short_name().eq_ignore_ascii_case(&normalized)
                    || p.id()
                        .rsplit('.')
                        .next()
                        .is_some_and(|tail| tail.eq_ignore_ascii_case(&normalized))
            })
            .ok_or_else(|| DevinfoError::invalid_permission(s))
    }
}

/// Capability check consumed by the availability policy
pub trait PermissionChecker: Send + Sync {
    fn has_permission(&self, permission: Permission) -> bool;
}

/// Result of a permission request, delivered by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionGrant {
    pub permission: Permission,
    pub granted: bool,
}

impl PermissionGrant {
    pub fn granted(permission: Permission) -> Self {
        Self {
            permission,
            granted: true,
        }
    }

    pub fn denied(permission: Permission) -> Self {
        Self {
            permission,
            granted: false,
        }
    }
}

/// Mutable set of granted permissions
#[derive(Debug, Default)]
pub struct GrantedPermissions {
    granted: RwLock<HashSet<Permission>>,
}

impl GrantedPermissions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<I: IntoIterator<Item = Permission>>(permissions: I) -> Self {
        Self {
            granted: RwLock::new(permissions.into_iter().collect()),
        }
    }

    pub fn grant(&self, permission: Permission) {
        self.granted.write().insert(permission);
    }

    pub fn revoke(&self, permission: Permission) {
        self.granted.write().remove(&permission);
    }

    /// Record the outcome of a permission request
    pub fn apply(&self, grant: PermissionGrant) {
        if grant.granted {
            self.grant(grant.permission);
        } else {
            self.revoke(grant.permission);
        }
    }
}

impl PermissionChecker for GrantedPermissions {
    fn has_permission(&self, permission: Permission) -> bool {
        self.granted.read().contains(&permission)
    }
}
