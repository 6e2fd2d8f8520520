//! Co-residency graph construction.
//!
//! Inverts the timeline into a per-period occupant index, then connects
//! every unordered pair of residents who shared a period.

use std::collections::{BTreeMap, BTreeSet};

use roomie_core::models::{Period, RoomieGraph, Timeline};
use tracing::debug;

/// Builds the co-residency graph from a validated timeline.
pub struct GraphBuilder;

impl GraphBuilder {
    /// Build the graph for `timeline`.
    ///
    /// One pass over the timeline builds the inverse index
    /// period → residents; each period then contributes an edge for every
    /// unordered pair of distinct occupants. Cost is O(Σ k²) over periods
    /// with k occupants each — fine, since k is bounded by the roster size
    /// and the period count by years × 12. Edge insertion is idempotent, and
    /// adjacency lists come out sorted and deduplicated, so rebuilding from
    /// the same timeline reproduces the graph exactly. Residents who never
    /// shared a period with anyone remain as isolated nodes.
    pub fn build(timeline: &Timeline) -> RoomieGraph {
        let mut occupants_by_period: BTreeMap<Period, Vec<&str>> = BTreeMap::new();
        for (resident, periods) in timeline.iter() {
            for period in periods {
                occupants_by_period.entry(*period).or_default().push(resident);
            }
        }

        // Every resident is a node, roommates or not.
        let mut adjacency: BTreeMap<String, BTreeSet<String>> = timeline
            .residents()
            .map(|name| (name.to_string(), BTreeSet::new()))
            .collect();

        for occupants in occupants_by_period.values() {
            for (index, left) in occupants.iter().enumerate() {
                for right in occupants.iter().skip(index + 1) {
                    if left == right {
                        continue;
                    }
                    if let Some(neighbors) = adjacency.get_mut(*left) {
                        neighbors.insert((*right).to_string());
                    }
                    if let Some(neighbors) = adjacency.get_mut(*right) {
                        neighbors.insert((*left).to_string());
                    }
                }
            }
        }

        let graph = RoomieGraph::from_adjacency(
            adjacency
                .into_iter()
                .map(|(name, neighbors)| (name, neighbors.into_iter().collect()))
                .collect(),
        );

        debug!(
            "Built graph: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        graph
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
