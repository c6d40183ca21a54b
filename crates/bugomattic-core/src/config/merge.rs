//! Configuration merging logic
//!
//! Combines a discovered config file with overrides (e.g. CLI flags). The
//! receiver always wins; missing sections and fields are filled from `other`.

use super::tool_config::*;

impl BugomatticToolConfig {
    /// Merge another config into this one (current takes precedence)
    ///
    /// The `$schema` field is file-specific and never merged.
    pub fn merge_with(&mut self, other: BugomatticToolConfig) {
        if self.reporting_config.is_none() {
            self.reporting_config = other.reporting_config;
        }

        if let Some(other_highlight) = other.highlight {
            if let Some(ref mut highlight) = self.highlight {
                highlight.merge_with(other_highlight);
            } else {
                self.highlight = Some(other_highlight);
            }
        }

        if let Some(other_cache) = other.cache {
            if let Some(ref mut cache) = self.cache {
                cache.merge_with(other_cache);
            } else {
                self.cache = Some(other_cache);
            }
        }

        if let Some(other_links) = other.links {
            if let Some(ref mut links) = self.links {
                links.merge_with(other_links);
            } else {
                self.links = Some(other_links);
            }
        }
    }
}

impl HighlightConfiguration {
    pub fn merge_with(&mut self, other: HighlightConfiguration) {
        if self.open.is_none() {
            self.open = other.open;
        }
        if self.close.is_none() {
            self.close = other.close;
        }
    }
}

impl CacheConfiguration {
    pub fn merge_with(&mut self, other: CacheConfiguration) {
        if self.max_entries.is_none() {
            self.max_entries = other.max_entries;
        }
    }
}

impl LinksConfiguration {
    pub fn merge_with(&mut self, other: LinksConfiguration) {
        if self.slack_base_url.is_none() {
            self.slack_base_url = other.slack_base_url;
        }
    }
}
