//! Tree expansion state
//!
//! Products and feature groups start collapsed. Every change of the search
//! term collapses the whole tree again, so each search starts from a clean
//! view driven by the search results rather than by previously opened nodes.

use std::collections::HashSet;
use tracing::trace;

use crate::reporting::{NodeRef, NormalizedConfig};
use crate::search::SearchResults;

/// Which branch nodes are expanded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    expanded: HashSet<NodeRef>,
    search_term: String,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, node: &NodeRef) -> bool {
        self.expanded.contains(node)
    }

    /// Flip a branch node and return its new state. Features are leaves and
    /// never expand.
    pub fn toggle(&mut self, node: &NodeRef) -> bool {
        if !node.is_branch() {
            return false;
        }
        let expanded = if self.expanded.remove(node) {
            false
        } else {
            self.expanded.insert(node.clone());
            true
        };
        trace!("Toggled {:?} to expanded={}", node, expanded);
        expanded
    }

    pub fn set_expanded(&mut self, node: &NodeRef, expanded: bool) {
        if !node.is_branch() {
            return;
        }
        if expanded {
            self.expanded.insert(node.clone());
        } else {
            self.expanded.remove(node);
        }
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    /// Record the active search term. Returns `true` when the term changed
    /// and the tree was collapsed.
    pub fn sync_search_term(&mut self, term: &str) -> bool {
        if self.search_term == term {
            return false;
        }
        self.search_term = term.to_string();
        self.collapse_all();
        true
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn expanded_count(&self) -> usize {
        self.expanded.len()
    }
}

/// Children of `node` that should render.
///
/// Expanded nodes show every child. Collapsed nodes show only children in
/// the search results while a search is active, and nothing otherwise.
pub fn visible_children(
    config: &NormalizedConfig,
    node: &NodeRef,
    state: &ExpansionState,
    results: &SearchResults,
) -> Vec<NodeRef> {
    let children = config.children(node);
    if state.is_expanded(node) {
        return children;
    }
    if !results.is_active() {
        return Vec::new();
    }
    children
        .into_iter()
        .filter(|child| results.contains(child))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporting::normalize_json_str;
    use crate::search::compute_search_results;

    fn fixture() -> NormalizedConfig {
        normalize_json_str(
            r#"{"Jetpack": {
                "featureGroups": {"Backups": {"features": {"Restore": {}, "Schedule": {}}}},
                "features": {"Stats": {}, "Search": {}}
            }}"#,
        )
        .unwrap()
    }

    fn product() -> NodeRef {
        NodeRef::Product("Jetpack".to_string())
    }

    #[test]
    fn test_initially_collapsed() {
        let state = ExpansionState::new();
        assert!(!state.is_expanded(&product()));
    }

    #[test]
    fn test_toggle_flips() {
        let mut state = ExpansionState::new();
        assert!(state.toggle(&product()));
        assert!(state.is_expanded(&product()));
        assert!(!state.toggle(&product()));
        assert!(!state.is_expanded(&product()));
    }

    #[test]
    fn test_features_never_expand() {
        let mut state = ExpansionState::new();
        let feature = NodeRef::Feature("Jetpack__Stats".to_string());
        assert!(!state.toggle(&feature));
        assert_eq!(state.expanded_count(), 0);
    }

    #[test]
    fn test_search_change_collapses_everything() {
        let mut state = ExpansionState::new();
        state.toggle(&product());
        assert!(!state.sync_search_term(""));
        assert!(state.is_expanded(&product()));

        assert!(state.sync_search_term("res"));
        assert!(!state.is_expanded(&product()));
        assert!(!state.sync_search_term("res"));
    }

    #[test]
    fn test_collapsed_without_search_shows_nothing() {
        let config = fixture();
        let results = compute_search_results(&config, "");
        let state = ExpansionState::new();
        assert!(visible_children(&config, &product(), &state, &results).is_empty());
    }

    #[test]
    fn test_expanded_shows_all_children() {
        let config = fixture();
        let results = compute_search_results(&config, "restore");
        let mut state = ExpansionState::new();
        state.sync_search_term("restore");
        state.toggle(&product());
        assert_eq!(
            visible_children(&config, &product(), &state, &results),
            [
                NodeRef::FeatureGroup("Jetpack__Backups".to_string()),
                NodeRef::Feature("Jetpack__Stats".to_string()),
                NodeRef::Feature("Jetpack__Search".to_string()),
            ]
        );
    }

    #[test]
    fn test_collapsed_with_search_shows_matches_only() {
        let config = fixture();
        let results = compute_search_results(&config, "restore");
        let mut state = ExpansionState::new();
        state.sync_search_term("restore");

        assert_eq!(
            visible_children(&config, &product(), &state, &results),
            [NodeRef::FeatureGroup("Jetpack__Backups".to_string())]
        );
        let group = NodeRef::FeatureGroup("Jetpack__Backups".to_string());
        assert_eq!(
            visible_children(&config, &group, &state, &results),
            [NodeRef::Feature("Jetpack__Backups__Restore".to_string())]
        );
    }
}
