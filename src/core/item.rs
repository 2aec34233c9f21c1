//! Item data model.
//!
//! An [`Item`] is one collected fact, identified by its title and category.
//! Its value is either resolved (possibly empty) or structurally unavailable,
//! never both at once.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use super::permissions::Permission;
use super::versions;
use crate::error::{DevinfoError, Result};

/// Partition of items and collectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Device,
    Network,
    Software,
    Hardware,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Device,
        Category::Network,
        Category::Software,
        Category::Hardware,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Device => "device",
            Category::Network => "network",
            Category::Software => "software",
            Category::Hardware => "hardware",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Device => write!(f, "Device"),
            Category::Network => write!(f, "Network"),
            Category::Software => write!(f, "Software"),
            Category::Hardware => write!(f, "Hardware"),
        }
    }
}

impl FromStr for Category {
    type Err = DevinfoError;

    fn from_str(s: &str) -> Result<Self> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DevinfoError::other(format!("Unknown category: {}", s)))
    }
}

/// Why a probe could not run at all
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unavailable {
    /// Required capability is not granted; the probe was never attempted
    NeedsPermission { permission: Permission, message: String },
    /// Removed by the platform at `since`
    NoLongerPossible { since: u32 },
    /// Introduced by the platform at `min`
    NotPossibleYet { min: u32 },
}

impl Unavailable {
    pub fn needs_permission(permission: Permission) -> Self {
        Unavailable::NeedsPermission {
            permission,
            message: format!("Requires {} permission", permission.description()),
        }
    }

    /// Human-readable explanation, also used as the display subtitle
    pub fn message(&self) -> String {
        match self {
            Unavailable::NeedsPermission { message, .. } => message.clone(),
            Unavailable::NoLongerPossible { since } => {
                format!("Not possible since {}", versions::describe(*since))
            }
            Unavailable::NotPossibleYet { min } => {
                format!("Requires {} or newer", versions::describe(*min))
            }
        }
    }

    /// Fixed for the lifetime of the process
    pub fn is_permanent(&self) -> bool {
        !matches!(self, Unavailable::NeedsPermission { .. })
    }

    pub fn permission(&self) -> Option<Permission> {
        match self {
            Unavailable::NeedsPermission { permission, .. } => Some(*permission),
            _ => None,
        }
    }
}

impl fmt::Display for Unavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartIcon {
    Storage,
    Memory,
    Battery,
}

/// Capacity figures for storage, memory and battery items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chart {
    pub used: u64,
    pub total: u64,
    pub icon: ChartIcon,
}

impl Chart {
    pub fn new(used: u64, total: u64, icon: ChartIcon) -> Self {
        Self { used, total, icon }
    }

    pub fn percent_used(&self) -> f32 {
        if self.total > 0 {
            (self.used as f32 / self.total as f32) * 100.0
        } else {
            0.0
        }
    }
}

/// Output of a successful probe
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reading {
    pub subtitle: Option<String>,
    pub chart: Option<Chart>,
}

impl Reading {
    pub fn text<S: Into<String>>(subtitle: S) -> Self {
        Self {
            subtitle: Some(subtitle.into()),
            chart: None,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_chart<S: Into<String>>(subtitle: S, chart: Chart) -> Self {
        Self {
            subtitle: Some(subtitle.into()),
            chart: Some(chart),
        }
    }
}

impl From<String> for Reading {
    fn from(subtitle: String) -> Self {
        Reading::text(subtitle)
    }
}

impl From<&str> for Reading {
    fn from(subtitle: &str) -> Self {
        Reading::text(subtitle)
    }
}

/// Value half of an item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemValue {
    Resolved {
        subtitle: Option<String>,
        chart: Option<Chart>,
    },
    Unavailable(Unavailable),
}

impl ItemValue {
    pub fn empty() -> Self {
        ItemValue::Resolved {
            subtitle: None,
            chart: None,
        }
    }
}

impl From<Reading> for ItemValue {
    fn from(reading: Reading) -> Self {
        ItemValue::Resolved {
            subtitle: reading.subtitle,
            chart: reading.chart,
        }
    }
}

impl From<Unavailable> for ItemValue {
    fn from(reason: Unavailable) -> Self {
        ItemValue::Unavailable(reason)
    }
}

/// Store identity of an item
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemKey {
    pub category: Category,
    pub title: String,
}

impl ItemKey {
    pub fn new<S: Into<String>>(title: S, category: Category) -> Self {
        Self {
            category,
            title: title.into(),
        }
    }
}

/// One collected fact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub title: String,
    pub category: Category,
    pub value: ItemValue,
}

impl Item {
    pub fn new<S: Into<String>>(title: S, category: Category, value: ItemValue) -> Self {
        Self {
            title: title.into(),
            category,
            value,
        }
    }

    pub fn resolved<S: Into<String>>(title: S, category: Category, reading: Reading) -> Self {
        Self::new(title, category, reading.into())
    }

    pub fn unavailable<S: Into<String>>(title: S, category: Category, reason: Unavailable) -> Self {
        Self::new(title, category, reason.into())
    }

    pub fn key(&self) -> ItemKey {
        ItemKey::new(self.title.clone(), self.category)
    }

    pub fn subtitle(&self) -> Option<&str> {
        match &self.value {
            ItemValue::Resolved { subtitle, .. } => subtitle.as_deref(),
            ItemValue::Unavailable(_) => None,
        }
    }

    pub fn unavailable_reason(&self) -> Option<&Unavailable> {
        match &self.value {
            ItemValue::Unavailable(reason) => Some(reason),
            ItemValue::Resolved { .. } => None,
        }
    }

    pub fn chart(&self) -> Option<&Chart> {
        match &self.value {
            ItemValue::Resolved { chart, .. } => chart.as_ref(),
            ItemValue::Unavailable(_) => None,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self.value, ItemValue::Unavailable(_))
    }

    /// Resolved but nothing was found
    pub fn is_empty(&self) -> bool {
        match &self.value {
            ItemValue::Resolved { subtitle, .. } => {
                subtitle.as_deref().map_or(true, |s| s.trim().is_empty())
            }
            ItemValue::Unavailable(_) => false,
        }
    }

    /// Text shown under the title: the subtitle, or the unavailable message
    pub fn display_subtitle(&self) -> Option<Cow<'_, str>> {
        match &self.value {
            ItemValue::Resolved { subtitle, .. } => subtitle.as_deref().map(Cow::Borrowed),
            ItemValue::Unavailable(reason) => Some(Cow::Owned(reason.message())),
        }
    }
}
