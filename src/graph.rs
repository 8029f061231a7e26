//! Transitive requirement discovery
//!
//! Starting from a project's direct requirements, [`build`] expands every
//! plugin through the registry until no undiscovered ids remain. Plugins the
//! registry does not know are kept in the graph with no dependencies and
//! reported separately so the caller can decide what to do with them.

use crate::registry::Registry;
use crate::PluginId;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// Plugin id -> ids of its direct dependencies
pub type DependencyMap = BTreeMap<PluginId, BTreeSet<PluginId>>;

/// Result of expanding a set of root requirements
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    pub dependencies: DependencyMap,
    /// Ids that were required but are absent from the registry
    pub unresolved: BTreeSet<PluginId>,
}

impl DependencyGraph {
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }

    /// Plugins that directly depend on `id`
    pub fn dependents(&self, id: &str) -> BTreeSet<&PluginId> {
        self.dependencies
            .iter()
            .filter(|(_, deps)| deps.contains(id))
            .map(|(dependent, _)| dependent)
            .collect()
    }
}

/// Discover the full requirement graph reachable from `roots`
///
/// The frontier is processed first-in first-out, so identical inputs always
/// expand in the same order. An id is expanded at most once, which also stops
/// discovery from looping on circular requirements; the cycle itself stays in
/// the map for the resolver to report.
pub fn build(registry: &Registry, roots: &[PluginId]) -> DependencyGraph {
    let mut graph = DependencyGraph::default();
    let mut frontier: VecDeque<&str> = roots.iter().map(String::as_str).collect();

    while let Some(id) = frontier.pop_front() {
        if graph.dependencies.contains_key(id) {
            continue;
        }

        let Some(record) = registry.get(id) else {
            tracing::debug!("requirement '{}' is not in the registry", id);
            graph.dependencies.insert(id.to_string(), BTreeSet::new());
            graph.unresolved.insert(id.to_string());
            continue;
        };

        debug_assert!(
            !record.requirements.iter().any(|req| req == id),
            "registry admitted self-requirement of '{}'",
            id
        );
        let deps: BTreeSet<PluginId> = record.requirements.iter().cloned().collect();

        frontier.extend(record.requirements.iter().map(String::as_str));
        graph.dependencies.insert(id.to_string(), deps);
    }

    graph
}
