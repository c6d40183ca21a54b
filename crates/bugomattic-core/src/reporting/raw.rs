//! Raw (human-authored) reporting configuration
//!
//! This is the nested shape people edit by hand:
//!
//! ```json
//! {
//!   "Jetpack": {
//!     "description": "Security, performance, and growth tools",
//!     "tasks": { "bug": [], "featureRequest": [], "urgent": [] },
//!     "featureGroups": {
//!       "Backups": {
//!         "features": {
//!           "Restore": { "keywords": ["rewind"], "tasks": { "bug": [{ "title": "Report it" }] } }
//!         }
//!       }
//!     },
//!     "features": {
//!       "Stats": { "description": "Site traffic" }
//!     }
//!   }
//! }
//! ```
//!
//! The document is validated once at this boundary. Any field outside the
//! documented shape is a [`BugomatticError::ConfigSchema`] naming the JSON
//! path of the offending value. A key repeated within one object is rejected
//! the same way rather than letting the later entry replace the earlier one.
//! Task category keys are kept verbatim here and validated by the normalizer,
//! which owns the alias migration.

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::fs;
use std::path::Path;

use super::links::{LearnMoreLink, TaskLink};
use crate::error::BugomatticError;
use crate::result::Result;

/// Nested reporting configuration: product name to product
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct RawConfig(
    #[serde(deserialize_with = "unique_keys::required")]
    #[schemars(with = "IndexMap<String, RawProduct>")]
    pub IndexMap<String, RawProduct>,
);

/// Top-level taxonomy node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawProduct {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learn_more_links: Option<Vec<LearnMoreLink>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks: Option<RawTaskMapping>,

    #[serde(
        default,
        deserialize_with = "unique_keys::optional",
        skip_serializing_if = "Option::is_none"
    )]
    #[schemars(with = "Option<IndexMap<String, RawFeatureGroup>>")]
    pub feature_groups: Option<IndexMap<String, RawFeatureGroup>>,

    #[serde(
        default,
        deserialize_with = "unique_keys::optional",
        skip_serializing_if = "Option::is_none"
    )]
    #[schemars(with = "Option<IndexMap<String, RawFeature>>")]
    pub features: Option<IndexMap<String, RawFeature>>,
}

/// Optional grouping layer between a product and its features
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawFeatureGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learn_more_links: Option<Vec<LearnMoreLink>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks: Option<RawTaskMapping>,

    #[serde(
        default,
        deserialize_with = "unique_keys::optional",
        skip_serializing_if = "Option::is_none"
    )]
    #[schemars(with = "Option<IndexMap<String, RawFeature>>")]
    pub features: Option<IndexMap<String, RawFeature>>,
}

/// Leaf taxonomy node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawFeature {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learn_more_links: Option<Vec<LearnMoreLink>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks: Option<RawTaskMapping>,
}

/// Category key to ordered task list, keys as written in the source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct RawTaskMapping(
    #[serde(deserialize_with = "unique_keys::required")]
    #[schemars(with = "IndexMap<String, Vec<RawTask>>")]
    pub IndexMap<String, Vec<RawTask>>,
);

/// A single reporting action
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawTask {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<TaskLink>,
}

impl RawConfig {
    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let mut de = serde_json::Deserializer::from_str(json);
        let raw: RawConfig = serde_path_to_error::deserialize(&mut de).map_err(schema_error)?;
        de.end()
            .map_err(|e| BugomatticError::schema_error("$", e.to_string()))?;
        Ok(raw)
    }

    /// Validate an already-parsed JSON value
    pub fn from_json_value(value: serde_json::Value) -> Result<Self> {
        serde_path_to_error::deserialize(value).map_err(schema_error)
    }

    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_path_to_error::deserialize(serde_yaml::Deserializer::from_str(yaml))
            .map_err(schema_error)
    }

    /// Load from a `.json`, `.yaml`, or `.yml` file
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| BugomatticError::io_error(path, e))?;
        let ext = path.extension().and_then(|e| e.to_str());

        let parsed = match ext {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            Some("json") => Self::from_json_str(&content),
            _ => {
                return Err(BugomatticError::config_error(format!(
                    "Unsupported reporting config extension for '{}' (expected .json, .yaml, or .yml)",
                    path.display()
                )));
            }
        }?;

        tracing::debug!(
            "Loaded {} products from {}",
            parsed.0.len(),
            path.display()
        );
        Ok(parsed)
    }

    /// Products in source order
    pub fn products(&self) -> impl Iterator<Item = (&String, &RawProduct)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// JSON Schema describing the accepted document shape
    pub fn json_schema() -> serde_json::Value {
        schemars::schema_for!(RawConfig).to_value()
    }
}

/// Map deserialization that fails on a repeated key
mod unique_keys {
    use indexmap::IndexMap;
    use indexmap::map::Entry;
    use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};
    use std::fmt;
    use std::marker::PhantomData;

    struct UniqueKeys<V>(IndexMap<String, V>);

    impl<'de, V: Deserialize<'de>> Deserialize<'de> for UniqueKeys<V> {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            struct UniqueKeysVisitor<V>(PhantomData<V>);

            impl<'de, V: Deserialize<'de>> Visitor<'de> for UniqueKeysVisitor<V> {
                type Value = UniqueKeys<V>;

                fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                    f.write_str("a map with unique keys")
                }

                fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                    let mut map = IndexMap::with_capacity(access.size_hint().unwrap_or(0).min(64));
                    while let Some(key) = access.next_key::<String>()? {
                        match map.entry(key) {
                            Entry::Occupied(entry) => {
                                return Err(de::Error::custom(format!(
                                    "duplicate key '{}'",
                                    entry.key()
                                )));
                            }
                            Entry::Vacant(entry) => {
                                entry.insert(access.next_value()?);
                            }
                        }
                    }
                    Ok(UniqueKeys(map))
                }
            }

            deserializer.deserialize_map(UniqueKeysVisitor(PhantomData))
        }
    }

    pub fn required<'de, D, V>(deserializer: D) -> Result<IndexMap<String, V>, D::Error>
    where
        D: Deserializer<'de>,
        V: Deserialize<'de>,
    {
        UniqueKeys::deserialize(deserializer).map(|keys| keys.0)
    }

    pub fn optional<'de, D, V>(deserializer: D) -> Result<Option<IndexMap<String, V>>, D::Error>
    where
        D: Deserializer<'de>,
        V: Deserialize<'de>,
    {
        Option::<UniqueKeys<V>>::deserialize(deserializer).map(|keys| keys.map(|keys| keys.0))
    }
}

fn schema_error<E: Display>(err: serde_path_to_error::Error<E>) -> BugomatticError {
    let path = match err.path().to_string().as_str() {
        "." => "$".to_string(),
        inner => format!("$.{inner}"),
    };
    BugomatticError::schema_error(path, err.inner().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_minimal_product() {
        let raw = RawConfig::from_json_str(r#"{"Jetpack": {}}"#).unwrap();
        assert_eq!(raw.len(), 1);
        let (name, product) = raw.products().next().unwrap();
        assert_eq!(name, "Jetpack");
        assert_eq!(product, &RawProduct::default());
    }

    #[test]
    fn test_preserves_source_order() {
        let raw = RawConfig::from_json_str(r#"{"Zeta": {}, "Alpha": {}, "Mid": {}}"#).unwrap();
        let names: Vec<_> = raw.products().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, ["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn test_unknown_field_reports_path() {
        let err = RawConfig::from_json_str(
            r#"{"Jetpack": {"features": {"Backup": {"descripton": "typo"}}}}"#,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
        match err {
            BugomatticError::ConfigSchema { path, message } => {
                assert!(path.starts_with("$.Jetpack.features.Backup"), "{path}");
                assert!(message.contains("unknown field"));
            }
            other => panic!("Expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_features_must_be_a_map() {
        let err = RawConfig::from_json_str(r#"{"Jetpack": {"features": ["Backup"]}}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            BugomatticError::ConfigSchema { ref path, .. } if path == "$.Jetpack.features"
        ));
    }

    #[test]
    fn test_duplicate_product_is_rejected() {
        let err = RawConfig::from_json_str(
            r#"{"Jetpack": {"features": {"Backup": {}}}, "Jetpack": {"features": {"Stats": {}}}}"#,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
        assert!(err.to_string().contains("duplicate key 'Jetpack'"), "{err}");
    }

    #[test]
    fn test_duplicate_nested_keys_are_rejected() {
        for json in [
            r#"{"Jetpack": {"features": {"Backup": {}, "Backup": {"keywords": ["x"]}}}}"#,
            r#"{"Jetpack": {"featureGroups": {"Backups": {}, "Backups": {}}}}"#,
            r#"{"Jetpack": {"tasks": {"bug": [], "bug": [{"title": "t"}]}}}"#,
        ] {
            let err = RawConfig::from_json_str(json).unwrap_err();
            match err {
                BugomatticError::ConfigSchema { path, message } => {
                    assert!(path.starts_with("$.Jetpack"), "{path}");
                    assert!(message.contains("duplicate key"), "{message}");
                }
                other => panic!("Expected schema error, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_null_feature_map_is_absent() {
        let raw = RawConfig::from_json_str(r#"{"Jetpack": {"features": null}}"#).unwrap();
        assert_eq!(raw.0["Jetpack"].features, None);
    }

    #[test]
    fn test_task_link_variants() {
        let raw = RawConfig::from_json_str(
            r#"{"Jetpack": {"tasks": {"bug": [
                {"link": {"type": "github", "repository": "Automattic/jetpack", "template": "bug.yml"}},
                {"link": {"type": "slack", "channel": "jetpack-help"}},
                {"link": {"type": "p2", "subdomain": "jetpackp2"}},
                {"link": {"type": "general", "href": "https://jetpack.com/support"}}
            ]}}}"#,
        )
        .unwrap();
        let tasks = &raw.0["Jetpack"].tasks.as_ref().unwrap().0["bug"];
        assert_eq!(tasks.len(), 4);
        assert!(matches!(
            tasks[0].link,
            Some(TaskLink::Github { ref repository, .. }) if repository == "Automattic/jetpack"
        ));
        assert!(matches!(tasks[3].link, Some(TaskLink::General { .. })));
    }

    #[test]
    fn test_unknown_link_type_is_rejected() {
        let result = RawConfig::from_json_str(
            r#"{"Jetpack": {"tasks": {"bug": [{"link": {"type": "email", "to": "x"}}]}}}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_trailing_garbage_is_rejected() {
        assert!(RawConfig::from_json_str(r#"{"Jetpack": {}} extra"#).is_err());
    }

    #[test]
    fn test_from_yaml() {
        let raw = RawConfig::from_yaml_str(
            "Jetpack:\n  features:\n    Backup:\n      keywords: [rewind]\n",
        )
        .unwrap();
        let feature = &raw.0["Jetpack"].features.as_ref().unwrap()["Backup"];
        assert_eq!(feature.keywords.as_deref(), Some(&["rewind".to_string()][..]));
    }

    #[test]
    fn test_json_schema_mentions_products() {
        let schema = RawConfig::json_schema();
        let text = schema.to_string();
        assert!(text.contains("featureGroups"));
        assert!(text.contains("learnMoreLinks"));
    }
}
