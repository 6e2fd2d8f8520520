//! Structural statistics over the co-residency graph.
//!
//! Runs an unweighted BFS from every node to obtain all-pairs shortest path
//! lengths, the longest shortest path with a concrete witness, and the
//! average path length over reachable pairs. Disconnected pairs are excluded
//! from the aggregates, never treated as infinite or zero.

use std::collections::{BTreeMap, VecDeque};

use roomie_core::models::RoomieGraph;
use serde::{Deserialize, Serialize};
use tracing::debug;

// ── Metric records ────────────────────────────────────────────────────────────

/// One concrete longest shortest path found among all reachable pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathWitness {
    /// Number of edges on the path.
    pub length: usize,
    /// Node sequence from source to target, endpoints included.
    pub nodes: Vec<String>,
}

/// Structural statistics computed from the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphMetrics {
    pub node_count: usize,
    pub edge_count: usize,
    /// Unordered node pairs with a connecting path.
    pub reachable_pairs: usize,
    /// Mean shortest-path length over reachable pairs; `None` ("no data")
    /// when the graph has fewer than two connected nodes.
    pub average_path_length: Option<f64>,
    /// The diameter witness; `None` when no pair of nodes is connected.
    pub diameter: Option<PathWitness>,
}

// ── GraphAnalyzer ─────────────────────────────────────────────────────────────

/// Computes [`GraphMetrics`] from a finished graph.
pub struct GraphAnalyzer;

impl GraphAnalyzer {
    /// Analyze `graph`.
    ///
    /// Pairs are enumerated in canonical order for reproducible results:
    /// sources ascend by name, and each source is paired with the targets
    /// lexicographically greater than it, also ascending. The first pair
    /// whose distance strictly exceeds the incumbent maximum becomes the
    /// diameter witness; equal-length paths never replace it.
    ///
    /// An empty graph is a valid input and yields all-zero statistics.
    pub fn analyze(graph: &RoomieGraph) -> GraphMetrics {
        let nodes: Vec<&str> = graph.nodes().collect();

        let mut reachable_pairs = 0usize;
        let mut total_length = 0usize;
        let mut diameter: Option<PathWitness> = None;

        for source in &nodes {
            let (distances, parents) = Self::bfs(graph, source);
            for target in &nodes {
                if target <= source {
                    continue;
                }
                let Some(&distance) = distances.get(*target) else {
                    continue;
                };
                reachable_pairs += 1;
                total_length += distance;

                let is_longer = diameter
                    .as_ref()
                    .map(|witness| distance > witness.length)
                    .unwrap_or(true);
                if is_longer {
                    diameter = Some(PathWitness {
                        length: distance,
                        nodes: Self::reconstruct_path(source, target, &parents),
                    });
                }
            }
        }

        let average_path_length = if reachable_pairs > 0 {
            Some(total_length as f64 / reachable_pairs as f64)
        } else {
            None
        };

        let metrics = GraphMetrics {
            node_count: graph.node_count(),
            edge_count: graph.edge_count(),
            reachable_pairs,
            average_path_length,
            diameter,
        };
        debug!(
            "Analyzed graph: {} nodes, {} edges, {} reachable pairs",
            metrics.node_count, metrics.edge_count, metrics.reachable_pairs
        );
        metrics
    }

    // ── BFS helpers ───────────────────────────────────────────────────────────

    /// Unweighted BFS from `source`, returning distances and BFS-tree
    /// parents for every reached node.
    fn bfs<'g>(
        graph: &'g RoomieGraph,
        source: &'g str,
    ) -> (BTreeMap<&'g str, usize>, BTreeMap<&'g str, &'g str>) {
        let mut distances: BTreeMap<&str, usize> = BTreeMap::new();
        let mut parents: BTreeMap<&str, &str> = BTreeMap::new();
        let mut queue: VecDeque<&str> = VecDeque::new();

        distances.insert(source, 0);
        queue.push_back(source);

        while let Some(node) = queue.pop_front() {
            let distance = *distances.get(node).unwrap_or(&0);
            for neighbor in graph.neighbors(node) {
                if !distances.contains_key(neighbor.as_str()) {
                    distances.insert(neighbor.as_str(), distance + 1);
                    parents.insert(neighbor.as_str(), node);
                    queue.push_back(neighbor.as_str());
                }
            }
        }

        (distances, parents)
    }

    /// Walk the BFS tree back from `target` to `source`.
    fn reconstruct_path(
        source: &str,
        target: &str,
        parents: &BTreeMap<&str, &str>,
    ) -> Vec<String> {
        let mut path = vec![target.to_string()];
        let mut current = target;
        while current != source {
            match parents.get(current) {
                Some(parent) => current = parent,
                None => break,
            }
            path.push(current.to_string());
        }
        path.reverse();
        path
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
