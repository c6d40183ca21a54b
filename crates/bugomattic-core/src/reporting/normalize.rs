//! Nested raw config to flat, ID-keyed dictionaries
//!
//! IDs are the names along the path from the root joined with
//! [`ID_SEPARATOR`]:
//!
//! | entity                     | ID                                 |
//! |----------------------------|------------------------------------|
//! | product                    | `Product`                          |
//! | feature group              | `Product__Group`                   |
//! | feature under a product    | `Product__Feature`                 |
//! | feature under a group      | `Product__Group__Feature`          |
//! | task                       | `<parent id>__<category>__<index>` |
//!
//! Traversal is depth-first in source order: a product's own tasks, then its
//! feature groups (each group's tasks, then its features), then its direct
//! features.

use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, trace};

use super::category::TaskCategory;
use super::links::LearnMoreLink;
use super::model::{
    Feature, FeatureGroup, FeatureParent, NormalizedConfig, Product, Task, TaskMapping, TaskParent,
};
use super::raw::{RawConfig, RawFeature, RawFeatureGroup, RawProduct, RawTaskMapping};
use crate::result::Result;

/// Joins path segments into an entity ID
pub const ID_SEPARATOR: &str = "__";

/// Errors that abort normalization
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// A task mapping key outside bug / featureRequest / urgent
    #[error("Unknown task category '{category}' at '{path}' (expected bug, featureRequest, or urgent)")]
    UnknownTaskCategory { path: String, category: String },

    /// Two spellings of the severe category in one task mapping
    #[error("Task mapping at '{path}' defines the severe category twice ('{first}' and '{second}')")]
    ConflictingSevereCategory {
        path: String,
        first: String,
        second: String,
    },

    /// A product, group, or feature key that is empty or blank
    #[error("Empty name at '{path}'")]
    EmptyName { path: String },

    /// A name containing the ID separator would make IDs ambiguous
    #[error("Name '{name}' at '{path}' contains the reserved ID separator '__'")]
    ReservedSeparator { path: String, name: String },

    /// Two entities resolved to the same ID
    #[error("Duplicate ID '{id}'")]
    DuplicateId { id: String },
}

/// Normalize a raw reporting config.
///
/// Pure: the input is only read. Normalizing the same input twice yields
/// identical output.
pub fn normalize(raw: &RawConfig) -> std::result::Result<NormalizedConfig, NormalizeError> {
    let mut normalizer = Normalizer::default();
    for (name, product) in raw.products() {
        normalizer.product(name, product)?;
    }

    let config = normalizer.output;
    let stats = config.stats();
    debug!(
        "Normalized {} products, {} feature groups, {} features, {} tasks",
        stats.products, stats.feature_groups, stats.features, stats.tasks
    );
    Ok(config)
}

/// Parse a JSON document and normalize it
pub fn normalize_json_str(json: &str) -> Result<NormalizedConfig> {
    let raw = RawConfig::from_json_str(json)?;
    Ok(normalize(&raw)?)
}

/// Location inside the raw document, rendered like `$.Jetpack.features.Backup`
#[derive(Debug, Clone)]
struct JsonPath(String);

impl JsonPath {
    fn root() -> Self {
        Self("$".to_string())
    }

    fn key(&self, key: &str) -> Self {
        Self(format!("{}.{key}", self.0))
    }
}

#[derive(Default)]
struct Normalizer {
    output: NormalizedConfig,
    /// Every ID handed out so far, across all four dictionaries
    issued: HashSet<String>,
}

impl Normalizer {
    /// Reserve `id`, failing if any entity already holds it
    fn claim(&mut self, id: &str) -> std::result::Result<(), NormalizeError> {
        if !self.issued.insert(id.to_string()) {
            return Err(NormalizeError::DuplicateId { id: id.to_string() });
        }
        Ok(())
    }

    fn product(&mut self, name: &str, raw: &RawProduct) -> std::result::Result<(), NormalizeError> {
        let path = JsonPath::root().key(name);
        validate_name(name, &path)?;
        let id = name.to_string();
        self.claim(&id)?;
        trace!("Normalizing product {id}");

        let task_mapping = self.tasks(
            raw.tasks.as_ref(),
            &id,
            TaskParent::Product(id.clone()),
            &path.key("tasks"),
        )?;

        let mut feature_group_ids = Vec::new();
        for (group_name, group) in raw.feature_groups.iter().flatten() {
            let group_path = path.key("featureGroups").key(group_name);
            feature_group_ids.push(self.feature_group(&id, group_name, group, &group_path)?);
        }

        let mut feature_ids = Vec::new();
        for (feature_name, feature) in raw.features.iter().flatten() {
            let feature_path = path.key("features").key(feature_name);
            feature_ids.push(self.feature(
                FeatureParent::Product(id.clone()),
                feature_name,
                feature,
                &feature_path,
            )?);
        }

        self.output.products.insert(
            id.clone(),
            Product {
                id: id.clone(),
                name: name.to_string(),
                description: raw.description.clone(),
                learn_more_links: links(raw.learn_more_links.as_ref()),
                task_mapping,
                feature_group_ids,
                feature_ids,
            },
        );
        Ok(())
    }

    fn feature_group(
        &mut self,
        product_id: &str,
        name: &str,
        raw: &RawFeatureGroup,
        path: &JsonPath,
    ) -> std::result::Result<String, NormalizeError> {
        validate_name(name, path)?;
        let id = join_id(product_id, name);
        self.claim(&id)?;
        trace!("Normalizing feature group {id}");

        let task_mapping = self.tasks(
            raw.tasks.as_ref(),
            &id,
            TaskParent::FeatureGroup(id.clone()),
            &path.key("tasks"),
        )?;

        let mut feature_ids = Vec::new();
        for (feature_name, feature) in raw.features.iter().flatten() {
            let feature_path = path.key("features").key(feature_name);
            feature_ids.push(self.feature(
                FeatureParent::FeatureGroup(id.clone()),
                feature_name,
                feature,
                &feature_path,
            )?);
        }

        self.output.feature_groups.insert(
            id.clone(),
            FeatureGroup {
                id: id.clone(),
                name: name.to_string(),
                description: raw.description.clone(),
                learn_more_links: links(raw.learn_more_links.as_ref()),
                task_mapping,
                product_id: product_id.to_string(),
                feature_ids,
            },
        );
        Ok(id)
    }

    fn feature(
        &mut self,
        parent: FeatureParent,
        name: &str,
        raw: &RawFeature,
        path: &JsonPath,
    ) -> std::result::Result<String, NormalizeError> {
        validate_name(name, path)?;
        let id = join_id(parent.id(), name);
        self.claim(&id)?;
        trace!("Normalizing feature {id}");

        let task_mapping = self.tasks(
            raw.tasks.as_ref(),
            &id,
            TaskParent::Feature(id.clone()),
            &path.key("tasks"),
        )?;

        self.output.features.insert(
            id.clone(),
            Feature {
                id: id.clone(),
                name: name.to_string(),
                description: raw.description.clone(),
                keywords: raw.keywords.clone().unwrap_or_default(),
                learn_more_links: links(raw.learn_more_links.as_ref()),
                task_mapping,
                parent,
            },
        );
        Ok(id)
    }

    /// Flatten one node's task lists into the task dictionary.
    ///
    /// Indices start at 0 per category per parent and follow array order.
    fn tasks(
        &mut self,
        raw: Option<&RawTaskMapping>,
        parent_id: &str,
        parent: TaskParent,
        path: &JsonPath,
    ) -> std::result::Result<TaskMapping, NormalizeError> {
        let mut mapping = TaskMapping::default();
        let Some(raw) = raw else {
            return Ok(mapping);
        };

        let mut severe_key: Option<&str> = None;
        for (key, tasks) in &raw.0 {
            let category = TaskCategory::from_config_key(key).ok_or_else(|| {
                NormalizeError::UnknownTaskCategory {
                    path: path.0.clone(),
                    category: key.clone(),
                }
            })?;

            if category == TaskCategory::Urgent {
                if let Some(first) = severe_key {
                    return Err(NormalizeError::ConflictingSevereCategory {
                        path: path.0.clone(),
                        first: first.to_string(),
                        second: key.clone(),
                    });
                }
                if key != category.as_str() {
                    debug!("Migrating task category '{key}' to 'urgent' at {}", path.0);
                }
                severe_key = Some(key.as_str());
            }

            for (index, task) in tasks.iter().enumerate() {
                let id = format!(
                    "{parent_id}{ID_SEPARATOR}{}{ID_SEPARATOR}{index}",
                    category.as_str()
                );
                self.claim(&id)?;
                self.output.tasks.insert(
                    id.clone(),
                    Task {
                        id: id.clone(),
                        title: task.title.clone(),
                        instructions: task.instructions.clone(),
                        details: task.details.clone(),
                        link: task.link.clone(),
                        category,
                        parent: parent.clone(),
                    },
                );
                mapping.get_mut(category).push(id);
            }
        }

        Ok(mapping)
    }
}

fn join_id(parent_id: &str, name: &str) -> String {
    format!("{parent_id}{ID_SEPARATOR}{name}")
}

fn validate_name(name: &str, path: &JsonPath) -> std::result::Result<(), NormalizeError> {
    if name.trim().is_empty() {
        return Err(NormalizeError::EmptyName {
            path: path.0.clone(),
        });
    }
    if name.contains(ID_SEPARATOR) {
        return Err(NormalizeError::ReservedSeparator {
            path: path.0.clone(),
            name: name.to_string(),
        });
    }
    Ok(())
}

fn links(raw: Option<&Vec<LearnMoreLink>>) -> Vec<LearnMoreLink> {
    raw.cloned().unwrap_or_default()
}
