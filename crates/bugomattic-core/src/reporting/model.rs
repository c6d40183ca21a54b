//! Normalized reporting model
//!
//! Flat, ID-keyed dictionaries produced by [`super::normalize`]. Every
//! dictionary keeps depth-first traversal order, so iterating `products`,
//! `feature_groups`, or `features` yields the same order as the source file.

use indexmap::IndexMap;
use serde::Serialize;

use super::category::TaskCategory;
use super::links::{LearnMoreLink, TaskLink};

/// Task IDs per category; all three categories are always present
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskMapping {
    pub bug: Vec<String>,
    pub feature_request: Vec<String>,
    pub urgent: Vec<String>,
}

impl TaskMapping {
    pub fn get(&self, category: TaskCategory) -> &[String] {
        match category {
            TaskCategory::Bug => &self.bug,
            TaskCategory::FeatureRequest => &self.feature_request,
            TaskCategory::Urgent => &self.urgent,
        }
    }

    pub(crate) fn get_mut(&mut self, category: TaskCategory) -> &mut Vec<String> {
        match category {
            TaskCategory::Bug => &mut self.bug,
            TaskCategory::FeatureRequest => &mut self.feature_request,
            TaskCategory::Urgent => &mut self.urgent,
        }
    }

    /// Categories with their task IDs, in display order
    pub fn iter(&self) -> impl Iterator<Item = (TaskCategory, &[String])> {
        TaskCategory::ALL
            .into_iter()
            .map(move |category| (category, self.get(category)))
    }

    pub fn len(&self) -> usize {
        self.bug.len() + self.feature_request.len() + self.urgent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub learn_more_links: Vec<LearnMoreLink>,
    pub task_mapping: TaskMapping,
    /// Child feature groups, in source order
    pub feature_group_ids: Vec<String>,
    /// Features attached directly to the product, in source order
    pub feature_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureGroup {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub learn_more_links: Vec<LearnMoreLink>,
    pub task_mapping: TaskMapping,
    pub product_id: String,
    pub feature_ids: Vec<String>,
}

/// Where a feature hangs in the tree
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "parentType", content = "parentId", rename_all = "camelCase")]
pub enum FeatureParent {
    Product(String),
    FeatureGroup(String),
}

impl FeatureParent {
    pub fn id(&self) -> &str {
        match self {
            FeatureParent::Product(id) | FeatureParent::FeatureGroup(id) => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub keywords: Vec<String>,
    pub learn_more_links: Vec<LearnMoreLink>,
    pub task_mapping: TaskMapping,
    #[serde(flatten)]
    pub parent: FeatureParent,
}

/// Owner of a task
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "parentType", content = "parentId", rename_all = "camelCase")]
pub enum TaskParent {
    Product(String),
    FeatureGroup(String),
    Feature(String),
}

impl TaskParent {
    pub fn id(&self) -> &str {
        match self {
            TaskParent::Product(id) | TaskParent::FeatureGroup(id) | TaskParent::Feature(id) => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<TaskLink>,
    pub category: TaskCategory,
    #[serde(flatten)]
    pub parent: TaskParent,
}

impl Task {
    /// Title, falling back to the link's default text
    pub fn display_title(&self) -> String {
        match (&self.title, &self.link) {
            (Some(title), _) => title.clone(),
            (None, Some(link)) => link.default_display_text(),
            (None, None) => self.id.clone(),
        }
    }
}

/// A node of the product / feature-group / feature tree
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "type", content = "id", rename_all = "camelCase")]
pub enum NodeRef {
    Product(String),
    FeatureGroup(String),
    Feature(String),
}

impl NodeRef {
    pub fn id(&self) -> &str {
        match self {
            NodeRef::Product(id) | NodeRef::FeatureGroup(id) | NodeRef::Feature(id) => id,
        }
    }

    /// Whether the node can have children at all
    pub fn is_branch(&self) -> bool {
        !matches!(self, NodeRef::Feature(_))
    }
}

impl From<&FeatureParent> for NodeRef {
    fn from(parent: &FeatureParent) -> Self {
        match parent {
            FeatureParent::Product(id) => NodeRef::Product(id.clone()),
            FeatureParent::FeatureGroup(id) => NodeRef::FeatureGroup(id.clone()),
        }
    }
}

/// Output of normalization: an immutable snapshot of the taxonomy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedConfig {
    pub products: IndexMap<String, Product>,
    pub feature_groups: IndexMap<String, FeatureGroup>,
    pub features: IndexMap<String, Feature>,
    pub tasks: IndexMap<String, Task>,
}

impl NormalizedConfig {
    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.get(id)
    }

    pub fn feature_group(&self, id: &str) -> Option<&FeatureGroup> {
        self.feature_groups.get(id)
    }

    pub fn feature(&self, id: &str) -> Option<&Feature> {
        self.features.get(id)
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn contains(&self, node: &NodeRef) -> bool {
        match node {
            NodeRef::Product(id) => self.products.contains_key(id),
            NodeRef::FeatureGroup(id) => self.feature_groups.contains_key(id),
            NodeRef::Feature(id) => self.features.contains_key(id),
        }
    }

    /// Display name of a node
    pub fn name(&self, node: &NodeRef) -> Option<&str> {
        match node {
            NodeRef::Product(id) => self.product(id).map(|p| p.name.as_str()),
            NodeRef::FeatureGroup(id) => self.feature_group(id).map(|g| g.name.as_str()),
            NodeRef::Feature(id) => self.feature(id).map(|f| f.name.as_str()),
        }
    }

    pub fn description(&self, node: &NodeRef) -> Option<&str> {
        match node {
            NodeRef::Product(id) => self.product(id)?.description.as_deref(),
            NodeRef::FeatureGroup(id) => self.feature_group(id)?.description.as_deref(),
            NodeRef::Feature(id) => self.feature(id)?.description.as_deref(),
        }
    }

    pub fn task_mapping(&self, node: &NodeRef) -> Option<&TaskMapping> {
        match node {
            NodeRef::Product(id) => self.product(id).map(|p| &p.task_mapping),
            NodeRef::FeatureGroup(id) => self.feature_group(id).map(|g| &g.task_mapping),
            NodeRef::Feature(id) => self.feature(id).map(|f| &f.task_mapping),
        }
    }

    pub fn learn_more_links(&self, node: &NodeRef) -> &[LearnMoreLink] {
        let links = match node {
            NodeRef::Product(id) => self.product(id).map(|p| &p.learn_more_links),
            NodeRef::FeatureGroup(id) => self.feature_group(id).map(|g| &g.learn_more_links),
            NodeRef::Feature(id) => self.feature(id).map(|f| &f.learn_more_links),
        };
        links.map(Vec::as_slice).unwrap_or_default()
    }

    /// Direct children: feature groups before direct features for a product,
    /// features for a group, nothing for a feature.
    pub fn children(&self, node: &NodeRef) -> Vec<NodeRef> {
        match node {
            NodeRef::Product(id) => self
                .product(id)
                .map(|product| {
                    product
                        .feature_group_ids
                        .iter()
                        .cloned()
                        .map(NodeRef::FeatureGroup)
                        .chain(product.feature_ids.iter().cloned().map(NodeRef::Feature))
                        .collect()
                })
                .unwrap_or_default(),
            NodeRef::FeatureGroup(id) => self
                .feature_group(id)
                .map(|group| group.feature_ids.iter().cloned().map(NodeRef::Feature).collect())
                .unwrap_or_default(),
            NodeRef::Feature(_) => Vec::new(),
        }
    }

    pub fn parent(&self, node: &NodeRef) -> Option<NodeRef> {
        match node {
            NodeRef::Product(_) => None,
            NodeRef::FeatureGroup(id) => self
                .feature_group(id)
                .map(|group| NodeRef::Product(group.product_id.clone())),
            NodeRef::Feature(id) => self.feature(id).map(|feature| NodeRef::from(&feature.parent)),
        }
    }

    /// Parent chain from the node's parent up to its product
    pub fn ancestors(&self, node: &NodeRef) -> Vec<NodeRef> {
        let mut chain = Vec::new();
        let mut current = self.parent(node);
        while let Some(parent) = current {
            current = self.parent(&parent);
            chain.push(parent);
        }
        chain
    }

    /// Top-level nodes in source order
    pub fn roots(&self) -> impl Iterator<Item = NodeRef> + '_ {
        self.products.keys().cloned().map(NodeRef::Product)
    }

    /// Resolve a node from a bare ID, trying products, groups, then features
    pub fn resolve(&self, id: &str) -> Option<NodeRef> {
        if self.products.contains_key(id) {
            Some(NodeRef::Product(id.to_string()))
        } else if self.feature_groups.contains_key(id) {
            Some(NodeRef::FeatureGroup(id.to_string()))
        } else if self.features.contains_key(id) {
            Some(NodeRef::Feature(id.to_string()))
        } else {
            None
        }
    }

    /// Tasks of a node in one category, in source order
    pub fn tasks_for(&self, node: &NodeRef, category: TaskCategory) -> Vec<&Task> {
        self.task_mapping(node)
            .map(|mapping| {
                mapping
                    .get(category)
                    .iter()
                    .filter_map(|id| self.task(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn stats(&self) -> ConfigStats {
        ConfigStats {
            products: self.products.len(),
            feature_groups: self.feature_groups.len(),
            features: self.features.len(),
            tasks: self.tasks.len(),
        }
    }
}

/// Entity counts of a snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigStats {
    pub products: usize,
    pub feature_groups: usize,
    pub features: usize,
    pub tasks: usize,
}
