//! Configuration management subcommands
//!
//! - init: Create a new configuration file
//! - show: Display the current configuration

use bugomattic_core::reporting::DEFAULT_SLACK_BASE_URL;
use bugomattic_core::{
    BugomatticError, BugomatticToolConfig, CacheConfiguration, DEFAULT_MAX_ENTRIES,
    HighlightConfiguration, LinksConfiguration, Result,
};
use std::path::PathBuf;
use tracing::{debug, error};

use super::Context;
use crate::ConfigFormat;
use crate::output::print_json;

/// Config init command implementation
pub fn init_command(format: ConfigFormat, force: bool) -> Result<()> {
    debug!("Initializing configuration file with format: {:?}", format);

    let filename = match format {
        ConfigFormat::Json => ".bugomatticrc.json",
        ConfigFormat::Toml => ".bugomatticrc.toml",
        ConfigFormat::Yaml => "bugomattic.yaml",
    };

    let config_path = PathBuf::from(filename);

    // Check if file already exists
    if config_path.exists() && !force {
        error!(
            "Configuration file '{}' already exists. Use --force to overwrite.",
            filename
        );
        return Err(BugomatticError::config_error(format!(
            "Configuration file '{filename}' already exists"
        )));
    }

    let config = BugomatticToolConfig::example();
    let content = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(&config)
            .map_err(|e| BugomatticError::config_error(format!("Failed to serialize JSON: {e}")))?,
        ConfigFormat::Toml => toml::to_string_pretty(&config)
            .map_err(|e| BugomatticError::config_error(format!("Failed to serialize TOML: {e}")))?,
        ConfigFormat::Yaml => serde_yaml::to_string(&config)
            .map_err(|e| BugomatticError::config_error(format!("Failed to serialize YAML: {e}")))?,
    };

    std::fs::write(&config_path, content)
        .map_err(|e| BugomatticError::io_error(&config_path, e))?;

    println!("✅ Created configuration file: {filename}");
    println!("   Point 'reportingConfig' at your reporting config to skip the file argument.");

    Ok(())
}

/// Config show command implementation
pub fn show_command(ctx: &Context, resolved: bool) -> Result<()> {
    debug!("Showing configuration (resolved: {})", resolved);

    let mut config = ctx.tool_config(BugomatticToolConfig::default())?;
    if resolved {
        config.merge_with(default_values(ctx));
    }

    print_json(&config)
}

/// Every optional setting at its built-in value
fn default_values(ctx: &Context) -> BugomatticToolConfig {
    let marker = ctx.default_marker();
    BugomatticToolConfig {
        schema: None,
        reporting_config: None,
        highlight: Some(HighlightConfiguration {
            open: Some(marker.open),
            close: Some(marker.close),
        }),
        cache: Some(CacheConfiguration {
            max_entries: Some(DEFAULT_MAX_ENTRIES),
        }),
        links: Some(LinksConfiguration {
            slack_base_url: Some(DEFAULT_SLACK_BASE_URL.to_string()),
        }),
    }
}
