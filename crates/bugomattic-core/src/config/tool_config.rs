//! Tool configuration types
//!
//! Settings for the `bugomattic` command line tool itself, as opposed to the
//! reporting config it operates on.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cache::DEFAULT_MAX_ENTRIES;
use crate::highlight::HighlightMarker;
use crate::reporting::LinkOptions;

/// Root of a `.bugomatticrc.json` / `bugomattic.yaml` file
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BugomatticToolConfig {
    /// JSON schema reference (file-specific, never merged)
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Path to the reporting config, relative to the working directory
    #[schemars(description = "Path to the reporting config (.json, .yaml, or .yml)")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporting_config: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<HighlightConfiguration>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheConfiguration>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<LinksConfiguration>,
}

/// Markers wrapped around highlighted search matches
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HighlightConfiguration {
    #[schemars(description = "Text inserted before a highlighted match")]
    pub open: Option<String>,

    #[schemars(description = "Text inserted after a highlighted match")]
    pub close: Option<String>,
}

/// Interactive response cache
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CacheConfiguration {
    #[schemars(description = "Rendered search responses kept before the oldest is evicted")]
    pub max_entries: Option<usize>,
}

/// Link construction
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LinksConfiguration {
    #[schemars(description = "Prefix Slack channel names are appended to")]
    pub slack_base_url: Option<String>,
}

impl BugomatticToolConfig {
    /// Load configuration from file
    ///
    /// Supports YAML (.yaml, .yml), JSON (.json), and TOML (.toml).
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let ext = path.extension().and_then(|e| e.to_str());

        match ext {
            Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(&content)?),
            Some("json") => Ok(serde_json::from_str(&content)?),
            Some("toml") => Ok(toml::from_str(&content)?),
            _ => Err("Unsupported file extension (expected .yaml, .yml, .json, or .toml)".into()),
        }
    }

    /// Highlight markers, falling back to `default` for unset halves
    pub fn highlight_marker(&self, default: HighlightMarker) -> HighlightMarker {
        match &self.highlight {
            Some(highlight) => HighlightMarker {
                open: highlight.open.clone().unwrap_or(default.open),
                close: highlight.close.clone().unwrap_or(default.close),
            },
            None => default,
        }
    }

    pub fn cache_max_entries(&self) -> usize {
        self.cache
            .as_ref()
            .and_then(|cache| cache.max_entries)
            .unwrap_or(DEFAULT_MAX_ENTRIES)
    }

    pub fn link_options(&self) -> LinkOptions {
        let mut options = LinkOptions::default();
        if let Some(url) = self
            .links
            .as_ref()
            .and_then(|links| links.slack_base_url.clone())
        {
            options.slack_base_url = url;
        }
        options
    }

    /// Starter file written by `bugomattic config init`
    pub fn example() -> Self {
        Self {
            schema: None,
            reporting_config: Some(PathBuf::from("reporting-config.json")),
            highlight: Some(HighlightConfiguration {
                open: Some("[".to_string()),
                close: Some("]".to_string()),
            }),
            cache: Some(CacheConfiguration {
                max_entries: Some(DEFAULT_MAX_ENTRIES),
            }),
            links: Some(LinksConfiguration {
                slack_base_url: Some(crate::reporting::DEFAULT_SLACK_BASE_URL.to_string()),
            }),
        }
    }

    /// JSON Schema for the tool config file
    pub fn json_schema() -> serde_json::Value {
        schemars::schema_for!(BugomatticToolConfig).to_value()
    }
}
