//! Task categories
//!
//! Every taxonomy node carries tasks in exactly three categories. The severe
//! category shows up under three spellings in real configs; `urgent` is the
//! canonical one and `blocker` / `showStopper` are migrated to it on load.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A reporting category a task belongs to
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "camelCase")]
pub enum TaskCategory {
    /// Something is broken
    Bug,
    /// Something is missing
    FeatureRequest,
    /// Something is broken badly enough to page someone
    #[serde(alias = "blocker", alias = "showStopper")]
    Urgent,
}

/// Legacy spellings of [`TaskCategory::Urgent`]
pub const SEVERE_CATEGORY_ALIASES: [&str; 2] = ["blocker", "showStopper"];

impl TaskCategory {
    /// All categories in display order
    pub const ALL: [TaskCategory; 3] = [
        TaskCategory::Bug,
        TaskCategory::FeatureRequest,
        TaskCategory::Urgent,
    ];

    /// Canonical key used in configs and task IDs
    pub fn as_str(self) -> &'static str {
        match self {
            TaskCategory::Bug => "bug",
            TaskCategory::FeatureRequest => "featureRequest",
            TaskCategory::Urgent => "urgent",
        }
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            TaskCategory::Bug => "Bug",
            TaskCategory::FeatureRequest => "Feature request",
            TaskCategory::Urgent => "Urgent",
        }
    }

    /// Parse a raw config key, accepting the legacy severe spellings.
    ///
    /// Returns `None` for anything outside the three categories.
    pub fn from_config_key(key: &str) -> Option<Self> {
        match key {
            "bug" => Some(TaskCategory::Bug),
            "featureRequest" => Some(TaskCategory::FeatureRequest),
            "urgent" => Some(TaskCategory::Urgent),
            other if SEVERE_CATEGORY_ALIASES.contains(&other) => Some(TaskCategory::Urgent),
            _ => None,
        }
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_config_key(s).ok_or_else(|| {
            format!("unknown task category '{s}' (expected bug, featureRequest, or urgent)")
        })
    }
}
