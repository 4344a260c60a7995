//! Node/edge view of the keyword vocabulary for map-style visualizations.

use serde::{Deserialize, Serialize};

use crate::cooccurrence::{CooccurrenceMap, build_cooccurrence_map};
use crate::entry::Entry;
use crate::keywords::{KeywordIndex, build_keyword_map};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    /// The keyword itself.
    pub id: String,
    pub count: usize,
    /// `count` relative to the most frequent node, in (0, 1].
    pub weight: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    /// Entries shared by both endpoints.
    pub weight: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

pub fn build_keyword_graph(
    entries: &[Entry],
    max_nodes: usize,
    min_edge_weight: u32,
) -> KeywordGraph {
    let index = build_keyword_map(entries);
    let cooccurrence = build_cooccurrence_map(entries);
    graph_from(&index, &cooccurrence, max_nodes, min_edge_weight)
}

/// Top `max_nodes` keywords as nodes; an edge joins two retained nodes when
/// they share at least `min_edge_weight` entries (and at least one).
pub fn graph_from(
    index: &KeywordIndex,
    cooccurrence: &CooccurrenceMap,
    max_nodes: usize,
    min_edge_weight: u32,
) -> KeywordGraph {
    let top: Vec<_> = index.ranked().into_iter().take(max_nodes).collect();
    let max_count = top.first().map_or(0, |k| k.count);

    let nodes = top
        .iter()
        .map(|k| GraphNode {
            id: k.word.clone(),
            count: k.count,
            weight: if max_count == 0 {
                0.0
            } else {
                k.count as f64 / max_count as f64
            },
        })
        .collect();

    let threshold = min_edge_weight.max(1);
    let mut edges = Vec::new();
    for (i, source) in top.iter().enumerate() {
        for target in &top[i + 1..] {
            let weight = cooccurrence.get(&source.word, &target.word);
            if weight >= threshold {
                edges.push(GraphEdge {
                    source: source.word.clone(),
                    target: target.word.clone(),
                    weight,
                });
            }
        }
    }

    KeywordGraph { nodes, edges }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn incident(id: &str, text: &str) -> Entry {
        Entry::incident(id, "2026-03-01", text)
    }

    #[test]
    fn test_empty() {
        let graph = build_keyword_graph(&[], 30, 2);
        assert!(graph.nodes.is_empty());
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn test_nodes_weighted_by_max() {
        let entries = [
            incident("e1", "sleep tired"),
            incident("e2", "sleep tired"),
            incident("e3", "sleep"),
            incident("e4", "sleep nap"),
        ];
        let graph = build_keyword_graph(&entries, 30, 2);
        assert_eq!(graph.nodes[0].id, "sleep");
        assert_abs_diff_eq!(graph.nodes[0].weight, 1.0);
        assert_abs_diff_eq!(graph.nodes[1].weight, 0.5);
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].source, "sleep");
        assert_eq!(graph.edges[0].target, "tired");
        assert_eq!(graph.edges[0].weight, 2);
    }

    #[test]
    fn test_edges_only_between_retained_nodes() {
        let entries = [
            incident("e1", "sleep tired nap"),
            incident("e2", "sleep tired"),
        ];
        let graph = build_keyword_graph(&entries, 2, 1);
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.edges.len(), 1);
    }

    #[test]
    fn test_zero_min_weight_still_requires_cooccurrence() {
        let entries = [incident("e1", "sleep"), incident("e2", "nap")];
        let graph = build_keyword_graph(&entries, 30, 0);
        assert_eq!(graph.nodes.len(), 2);
        assert!(graph.edges.is_empty());
    }
}
