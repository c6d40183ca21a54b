//! Configuration system for the bugomattic tool
//!
//! Settings for the command line tool: where the reporting config lives, how
//! matches are highlighted, the interactive cache size, and link prefixes.
//! Every field is optional.
//!
//! ## Configuration Files
//!
//! Discovered by walking up from the working directory, in this order:
//! - `.bugomatticrc.json`
//! - `.bugomatticrc.toml`
//! - `bugomattic.yaml` / `bugomattic.yml`
//! - `bugomattic.json`
//!
//! ## Example Configuration
//!
//! ```json
//! {
//!   "reportingConfig": "reporting-config.json",
//!   "highlight": { "open": "[", "close": "]" },
//!   "cache": { "maxEntries": 50 },
//!   "links": { "slackBaseUrl": "https://a8c.slack.com/channels/" }
//! }
//! ```

mod loader;
mod merge;
mod tool_config;

pub use loader::{CONFIG_FILE_NAMES, ConfigLoader};
pub use tool_config::{
    BugomatticToolConfig, CacheConfiguration, HighlightConfiguration, LinksConfiguration,
};
