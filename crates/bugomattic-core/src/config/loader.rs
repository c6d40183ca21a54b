//! Configuration file discovery and loading

use super::tool_config::BugomatticToolConfig;
use crate::error::BugomatticError;
use crate::result::Result;
use std::path::{Path, PathBuf};

/// Config file names in discovery priority order
pub const CONFIG_FILE_NAMES: [&str; 5] = [
    ".bugomatticrc.json",
    ".bugomatticrc.toml",
    "bugomattic.yaml",
    "bugomattic.yml",
    "bugomattic.json",
];

/// Configuration loader for discovering and loading config files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Auto-discover config file by traversing upward from start_path
    ///
    /// Looks for each name in [`CONFIG_FILE_NAMES`] in order, starting from
    /// the given directory and moving up the directory tree until a config is
    /// found or the filesystem root is reached.
    pub fn auto_discover(start_path: &Path) -> Result<Option<PathBuf>> {
        let mut current = start_path
            .canonicalize()
            .map_err(|e| BugomatticError::ConfigError {
                message: format!("Invalid path: {e}"),
            })?;

        loop {
            for filename in &CONFIG_FILE_NAMES {
                let config_path = current.join(filename);
                if config_path.is_file() {
                    tracing::debug!("Found config: {}", config_path.display());
                    return Ok(Some(config_path));
                }
            }

            if let Some(parent) = current.parent() {
                current = parent.to_path_buf();
            } else {
                break;
            }
        }

        Ok(None)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<BugomatticToolConfig> {
        BugomatticToolConfig::load(path).map_err(|e| BugomatticError::ConfigError {
            message: format!("Failed to load config from '{}': {}", path.display(), e),
        })
    }

    /// Load config from path or auto-discover
    ///
    /// An explicit path must exist. Without one, discovery starts at
    /// `start_dir` (or the current directory); finding nothing yields the
    /// default configuration, since every setting is optional.
    pub fn load(custom_path: Option<&Path>, start_dir: Option<&Path>) -> Result<BugomatticToolConfig> {
        if let Some(path) = custom_path {
            if !path.exists() {
                return Err(BugomatticError::ConfigError {
                    message: format!(
                        "Config file not found: {}. Run 'bugomattic config init' to create one.",
                        path.display()
                    ),
                });
            }
            return Self::load_from_file(path);
        }

        let search_dir = start_dir.unwrap_or_else(|| Path::new("."));
        match Self::auto_discover(search_dir)? {
            Some(path) => Self::load_from_file(&path),
            None => {
                tracing::debug!("No config file found, using defaults");
                Ok(BugomatticToolConfig::default())
            }
        }
    }
}
