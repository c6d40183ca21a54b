//! Reporting configuration: raw schema, normalized model, and the transform
//! between them
//!
//! ```rust
//! use bugomattic_core::reporting::{normalize, RawConfig};
//!
//! let raw = RawConfig::from_json_str(
//!     r#"{"Jetpack": {"features": {"Backup": {"tasks": {"bug": [{"title": "t"}]}}}}}"#,
//! )?;
//! let config = normalize(&raw)?;
//!
//! assert!(config.feature("Jetpack__Backup").is_some());
//! assert!(config.task("Jetpack__Backup__bug__0").is_some());
//! # Ok::<(), bugomattic_core::BugomatticError>(())
//! ```

mod category;
mod links;
mod model;
mod normalize;
mod raw;

pub use category::{SEVERE_CATEGORY_ALIASES, TaskCategory};
pub use links::{DEFAULT_SLACK_BASE_URL, LearnMoreLink, LinkOptions, TaskLink};
pub use model::{
    ConfigStats, Feature, FeatureGroup, FeatureParent, NodeRef, NormalizedConfig, Product, Task,
    TaskMapping, TaskParent,
};
pub use normalize::{ID_SEPARATOR, NormalizeError, normalize, normalize_json_str};
pub use raw::{RawConfig, RawFeature, RawFeatureGroup, RawProduct, RawTask, RawTaskMapping};
