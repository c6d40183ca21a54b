//! Triage session state
//!
//! Owns the immutable normalized snapshot together with the per-session UI
//! state: the active search term, its results, and which nodes are expanded.
//! Rendering layers read [`TriageSession::visible_tree`] and never touch the
//! snapshot directly.

use serde::Serialize;
use std::sync::Arc;

use crate::expansion::{ExpansionState, visible_children};
use crate::highlight::{Matcher, Segment, highlight};
use crate::reporting::{NodeRef, NormalizedConfig};
use crate::search::{SearchResults, compute_search_results};

/// One rendered line of the taxonomy tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibleRow {
    pub node: NodeRef,
    pub depth: usize,
    /// Node name split around the search term
    pub label: Vec<Segment>,
    pub is_expanded: bool,
    pub has_children: bool,
}

#[derive(Debug, Clone)]
pub struct TriageSession {
    config: Arc<NormalizedConfig>,
    results: SearchResults,
    expansion: ExpansionState,
}

impl TriageSession {
    pub fn new(config: Arc<NormalizedConfig>) -> Self {
        let results = SearchResults::universal(&config);
        Self {
            config,
            results,
            expansion: ExpansionState::new(),
        }
    }

    pub fn config(&self) -> &Arc<NormalizedConfig> {
        &self.config
    }

    pub fn results(&self) -> &SearchResults {
        &self.results
    }

    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    pub fn search_term(&self) -> &str {
        &self.results.term
    }

    /// Apply a new search term. A changed term recomputes the results and
    /// collapses the tree; an identical one is a no-op.
    pub fn set_search_term(&mut self, term: &str) {
        if self.expansion.sync_search_term(term) || self.results.term != term {
            self.results = compute_search_results(&self.config, term);
        }
    }

    pub fn toggle(&mut self, node: &NodeRef) -> bool {
        self.expansion.toggle(node)
    }

    pub fn expand(&mut self, node: &NodeRef) {
        self.expansion.set_expanded(node, true);
    }

    /// Depth-first list of the rows to render
    pub fn visible_tree(&self) -> Vec<VisibleRow> {
        let matcher = Matcher::substring(self.results.term.clone());
        let mut rows = Vec::new();
        for root in self.config.roots() {
            if self.results.is_active() && !self.results.contains(&root) {
                continue;
            }
            self.push_rows(&root, 0, &matcher, &mut rows);
        }
        rows
    }

    fn push_rows(&self, node: &NodeRef, depth: usize, matcher: &Matcher, rows: &mut Vec<VisibleRow>) {
        let name = self.config.name(node).unwrap_or_default();
        rows.push(VisibleRow {
            node: node.clone(),
            depth,
            label: highlight(name, matcher),
            is_expanded: self.expansion.is_expanded(node),
            has_children: !self.config.children(node).is_empty(),
        });

        for child in visible_children(&self.config, node, &self.expansion, &self.results) {
            self.push_rows(&child, depth + 1, matcher, rows);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporting::normalize_json_str;

    fn session() -> TriageSession {
        let config = normalize_json_str(
            r#"{
                "Jetpack": {
                    "featureGroups": {"Backups": {"features": {"Restore": {"keywords": ["rewind"]}}}},
                    "features": {"Stats": {}}
                },
                "WooCommerce": {"features": {"Payments": {}}}
            }"#,
        )
        .unwrap();
        TriageSession::new(Arc::new(config))
    }

    fn ids(rows: &[VisibleRow]) -> Vec<(&str, usize)> {
        rows.iter().map(|r| (r.node.id(), r.depth)).collect()
    }

    #[test]
    fn test_initial_tree_shows_products_only() {
        let session = session();
        assert_eq!(
            ids(&session.visible_tree()),
            [("Jetpack", 0), ("WooCommerce", 0)]
        );
    }

    #[test]
    fn test_search_shows_matching_path() {
        let mut session = session();
        session.set_search_term("rewind");
        assert_eq!(
            ids(&session.visible_tree()),
            [
                ("Jetpack", 0),
                ("Jetpack__Backups", 1),
                ("Jetpack__Backups__Restore", 2)
            ]
        );
    }

    #[test]
    fn test_labels_are_highlighted() {
        let mut session = session();
        session.set_search_term("sta");
        let rows = session.visible_tree();
        let stats = rows
            .iter()
            .find(|r| r.node.id() == "Jetpack__Stats")
            .unwrap();
        assert_eq!(stats.label[0].text, "Sta");
        assert!(stats.label[0].is_highlighted);
    }

    #[test]
    fn test_new_term_recollapses_expanded_nodes() {
        let mut session = session();
        let jetpack = NodeRef::Product("Jetpack".to_string());
        session.toggle(&jetpack);
        assert_eq!(session.visible_tree().len(), 4);

        session.set_search_term("pay");
        assert!(!session.expansion().is_expanded(&jetpack));
        assert_eq!(
            ids(&session.visible_tree()),
            [("WooCommerce", 0), ("WooCommerce__Payments", 1)]
        );
    }

    #[test]
    fn test_expanded_node_shows_non_matching_children_during_search() {
        let mut session = session();
        session.set_search_term("rewind");
        session.expand(&NodeRef::Product("Jetpack".to_string()));
        assert_eq!(
            ids(&session.visible_tree()),
            [
                ("Jetpack", 0),
                ("Jetpack__Backups", 1),
                ("Jetpack__Backups__Restore", 2),
                ("Jetpack__Stats", 1)
            ]
        );
    }
}
