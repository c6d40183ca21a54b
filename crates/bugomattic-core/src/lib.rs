//! Bugomattic Core
//!
//! Triage engine behind the Bugomattic reporting tool. This crate turns a
//! hand-authored reporting config into a flat, ID-keyed snapshot and
//! provides the pieces a UI needs on top of it: search over the taxonomy,
//! highlighting of matched text, and tree expansion state.

pub mod cache;
pub mod config;
pub mod error;
pub mod expansion;
pub mod highlight;
pub mod reporting;
pub mod result;
pub mod search;
pub mod session;

// Re-export commonly used types
pub use cache::{BoundedCache, CacheStats, DEFAULT_MAX_ENTRIES};
// Configuration system
pub use config::{
    BugomatticToolConfig, CONFIG_FILE_NAMES, CacheConfiguration, ConfigLoader,
    HighlightConfiguration, LinksConfiguration,
};
pub use error::{BugomatticError, ErrorKind};
pub use expansion::{ExpansionState, visible_children};
pub use highlight::{HighlightMarker, Matcher, Segment, highlight, render_highlighted};
pub use reporting::{
    ConfigStats, Feature, FeatureGroup, FeatureParent, LearnMoreLink, LinkOptions, NodeRef,
    NormalizeError, NormalizedConfig, Product, RawConfig, Task, TaskCategory, TaskLink,
    TaskMapping, TaskParent, normalize, normalize_json_str,
};
pub use result::Result;
pub use search::{SearchResults, compute_search_results};
pub use session::{TriageSession, VisibleRow};

/// Initialize the tracing subscriber for logging
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bugomattic=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
