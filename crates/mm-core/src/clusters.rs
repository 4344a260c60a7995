use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_CLUSTER_PARTNERS, MAX_CLUSTERS};
use crate::cooccurrence::{CooccurrenceMap, build_cooccurrence_map};
use crate::entry::Entry;
use crate::keywords::{KeywordIndex, build_keyword_map};

/// A densely connected keyword group for graph views.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: String,
    /// Seed first, then its strongest unclaimed partners.
    pub keywords: Vec<String>,
    pub size: usize,
    /// Seed's partner count over the corpus's distinct keyword count.
    pub centrality: f64,
}

pub fn generate_clusters(entries: &[Entry]) -> Vec<Cluster> {
    let index = build_keyword_map(entries);
    let cooccurrence = build_cooccurrence_map(entries);
    clusters_from(&index, &cooccurrence)
}

/// Greedy hub clustering: the best-connected unclaimed word takes up to four
/// of its strongest unclaimed partners, then the next hub goes.
pub fn clusters_from(index: &KeywordIndex, cooccurrence: &CooccurrenceMap) -> Vec<Cluster> {
    let mut hubs: Vec<(&str, usize)> = cooccurrence
        .words()
        .map(|word| (word, cooccurrence.connections(word)))
        .collect();
    hubs.sort_by(|a, b| b.1.cmp(&a.1));

    let total_keywords = index.len();
    let mut claimed: HashSet<&str> = HashSet::new();
    let mut clusters = Vec::new();

    for (seed, connections) in hubs {
        if claimed.contains(seed) {
            continue;
        }

        let mut partners: Vec<(&str, u32)> = cooccurrence
            .partners(seed)
            .filter(|&(word, _)| !claimed.contains(word))
            .collect();
        partners.sort_by(|a, b| b.1.cmp(&a.1));
        partners.truncate(MAX_CLUSTER_PARTNERS);

        let mut members = vec![seed];
        members.extend(partners.into_iter().map(|(word, _)| word));
        claimed.extend(members.iter().copied());

        let centrality = if total_keywords == 0 {
            0.0
        } else {
            connections as f64 / total_keywords as f64
        };
        clusters.push(Cluster {
            id: format!("cluster-{}", clusters.len()),
            size: members.len(),
            keywords: members.into_iter().map(str::to_string).collect(),
            centrality,
        });
    }

    clusters.sort_by(|a, b| b.centrality.total_cmp(&a.centrality));
    clusters.truncate(MAX_CLUSTERS);
    tracing::debug!(clusters = clusters.len(), "generated clusters");
    clusters
}
