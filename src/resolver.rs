//! Load-order resolution
//!
//! Orders a [`DependencyMap`] so that every plugin comes after everything it
//! depends on. Resolution proceeds in rounds: each round places every plugin
//! whose dependencies are already placed, in lexicographic order, then
//! removes them from the graph. The output therefore depends only on the
//! graph's contents, never on discovery or iteration order.
//!
//! # Examples
//!
//! ```no_run
//! use enginext::{resolve_requirements, MissingPolicy, Registry};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = Registry::load("/opt/engine/plugins")?;
//! let roots = vec!["CryDefaultEntities".to_string()];
//!
//! let resolution = resolve_requirements(&registry, &roots, MissingPolicy::Fail)?;
//! println!("Load order: {}", resolution.order.join(" -> "));
//! # Ok(())
//! # }
//! ```

use crate::graph::{self, DependencyGraph, DependencyMap};
use crate::registry::Registry;
use crate::{Error, PluginId, Result};
use std::collections::{BTreeMap, BTreeSet};

/// Plugin ids in load order
pub type ResolvedOrder = Vec<PluginId>;

/// What to do with requirements the registry cannot satisfy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingPolicy {
    /// Abort with [`Error::UnresolvedRequirements`]
    #[default]
    Fail,
    /// Warn and leave them out of the load order
    Omit,
}

/// Outcome of resolving a project's requirements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub graph: DependencyGraph,
    pub order: ResolvedOrder,
    /// Unresolved ids dropped from `order` under [`MissingPolicy::Omit`]
    pub omitted: BTreeSet<PluginId>,
}

/// Group plugins into load rounds
///
/// Every plugin in round `n` depends only on plugins from earlier rounds.
/// Ids within a round are sorted. Dependencies on ids that are not keys of
/// `map` are treated as already satisfied.
pub fn resolve_rounds(map: &DependencyMap) -> Result<Vec<Vec<PluginId>>> {
    let mut remaining: BTreeMap<&str, BTreeSet<&str>> = map
        .iter()
        .map(|(id, deps)| {
            let deps = deps
                .iter()
                .map(String::as_str)
                .filter(|dep| map.contains_key(*dep))
                .collect();
            (id.as_str(), deps)
        })
        .collect();

    let mut rounds = Vec::new();

    while !remaining.is_empty() {
        // BTreeMap iteration already yields the ready ids in sorted order
        let ready: BTreeSet<&str> = remaining
            .iter()
            .filter(|(_, deps)| deps.is_empty())
            .map(|(id, _)| *id)
            .collect();

        if ready.is_empty() {
            let stuck = remaining.keys().map(|id| id.to_string()).collect();
            return Err(Error::CycleDetected(stuck));
        }

        remaining = remaining
            .into_iter()
            .filter(|(id, _)| !ready.contains(id))
            .map(|(id, deps)| {
                let deps = deps.into_iter().filter(|dep| !ready.contains(dep)).collect();
                (id, deps)
            })
            .collect();

        rounds.push(ready.into_iter().map(String::from).collect());
    }

    Ok(rounds)
}

/// Produce a load order in which every dependency precedes its dependents
///
/// Fails with [`Error::CycleDetected`] naming every plugin that is part of, or
/// blocked behind, a dependency cycle.
pub fn resolve(map: &DependencyMap) -> Result<ResolvedOrder> {
    Ok(resolve_rounds(map)?.into_iter().flatten().collect())
}

/// Build the requirement graph for `roots` and order it
pub fn resolve_requirements(
    registry: &Registry,
    roots: &[PluginId],
    policy: MissingPolicy,
) -> Result<Resolution> {
    let graph = graph::build(registry, roots);

    if !graph.unresolved.is_empty() && policy == MissingPolicy::Fail {
        return Err(Error::UnresolvedRequirements(graph.unresolved.clone()));
    }

    for id in &graph.unresolved {
        let required_by: Vec<&str> = graph.dependents(id).into_iter().map(String::as_str).collect();
        if required_by.is_empty() {
            tracing::warn!("omitting '{}': not found in registry", id);
        } else {
            tracing::warn!(
                "omitting '{}' (required by {}): not found in registry",
                id,
                required_by.join(", ")
            );
        }
    }

    let order: ResolvedOrder = resolve(&graph.dependencies)?
        .into_iter()
        .filter(|id| !graph.unresolved.contains(id))
        .collect();

    tracing::debug!("resolved load order: {}", order.join(", "));

    Ok(Resolution {
        omitted: graph.unresolved.clone(),
        graph,
        order,
    })
}
