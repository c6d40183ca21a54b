//! Taxonomy search
//!
//! A feature matches when its name or one of its keywords contains the term,
//! ignoring case. Case folding is the highlighter's (Unicode simple case
//! folding), so every match has a highlight. Feature groups and products never match on their own name:
//! they are pulled into the result purely by having a matching descendant, so
//! a matching feature is never hidden behind a non-matching parent.
//!
//! Results are recomputed from the snapshot on every call.

use indexmap::IndexSet;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::highlight::Matcher;
use crate::reporting::{Feature, FeatureParent, NodeRef, NormalizedConfig};

/// IDs of everything that stays visible for a search term, in config order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    /// The term these results were computed for
    pub term: String,
    pub features: IndexSet<String>,
    pub feature_groups: IndexSet<String>,
    pub products: IndexSet<String>,
}

impl SearchResults {
    /// Everything in the config, as returned for an empty term
    pub fn universal(config: &NormalizedConfig) -> Self {
        Self {
            term: String::new(),
            features: config.features.keys().cloned().collect(),
            feature_groups: config.feature_groups.keys().cloned().collect(),
            products: config.products.keys().cloned().collect(),
        }
    }

    /// Whether a non-empty term is filtering the tree
    pub fn is_active(&self) -> bool {
        !self.term.is_empty()
    }

    pub fn contains(&self, node: &NodeRef) -> bool {
        match node {
            NodeRef::Product(id) => self.products.contains(id),
            NodeRef::FeatureGroup(id) => self.feature_groups.contains(id),
            NodeRef::Feature(id) => self.features.contains(id),
        }
    }

    /// No feature matched
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Compute the visible sets for `term`.
///
/// An empty term returns the universal set.
pub fn compute_search_results(config: &NormalizedConfig, term: &str) -> SearchResults {
    if term.is_empty() {
        return SearchResults::universal(config);
    }

    let matcher = Matcher::substring(term);
    let Some(needle) = matcher.regex() else {
        warn!("Search term too large to compile, nothing matches");
        return SearchResults {
            term: term.to_string(),
            ..Default::default()
        };
    };
    let mut features = IndexSet::new();
    let mut groups = HashSet::new();
    let mut products = HashSet::new();

    for (id, feature) in &config.features {
        if !feature_matches(feature, &needle) {
            continue;
        }
        features.insert(id.clone());
        match &feature.parent {
            FeatureParent::Product(product_id) => {
                products.insert(product_id.as_str());
            }
            FeatureParent::FeatureGroup(group_id) => {
                groups.insert(group_id.as_str());
                if let Some(group) = config.feature_group(group_id) {
                    products.insert(group.product_id.as_str());
                }
            }
        }
    }

    let results = SearchResults {
        term: term.to_string(),
        features,
        feature_groups: config
            .feature_groups
            .keys()
            .filter(|id| groups.contains(id.as_str()))
            .cloned()
            .collect(),
        products: config
            .products
            .keys()
            .filter(|id| products.contains(id.as_str()))
            .cloned()
            .collect(),
    };

    debug!(
        "Search '{}' matched {} features, {} feature groups, {} products",
        term,
        results.features.len(),
        results.feature_groups.len(),
        results.products.len()
    );
    results
}

fn feature_matches(feature: &Feature, needle: &Regex) -> bool {
    needle.is_match(&feature.name) || feature.keywords.iter().any(|k| needle.is_match(k))
}
