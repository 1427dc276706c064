//! Rank-blending and query surface (§4.E). These functions are pure reads
//! over a [`GraphStore`] whose PageRank cache is already up to date;
//! [`crate::graph::MemoryGraph`] is responsible for recomputing PageRank
//! when the store is dirty before calling into here.

use std::cmp::Ordering;
use std::collections::{HashSet, VecDeque};

use tracing::instrument;

use crate::store::GraphStore;
use crate::types::MemoryEntry;

/// One result of [`blend`]: a backing-store hit re-scored against
/// structural importance.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedResult {
    pub entry_id: String,
    pub similarity_score: f64,
    pub combined: f64,
    pub community: Option<String>,
}

/// `combined = alpha * score + (1 - alpha) * (pagerank(id) * N)`. Unknown
/// entries contribute a zero PageRank term. Stable with respect to input
/// order for equal `combined` keys.
#[must_use]
#[instrument(skip(store, results))]
pub fn blend(store: &GraphStore, results: &[(MemoryEntry, f64)], alpha: f64) -> Vec<RankedResult> {
    let n = store.node_count().max(1) as f64;
    let mut ranked: Vec<RankedResult> = results
        .iter()
        .map(|(entry, score)| {
            let pagerank = store.ranks().get(&entry.id).copied().unwrap_or(0.0);
            let combined = alpha * score + (1.0 - alpha) * (pagerank * n);
            RankedResult {
                entry_id: entry.id.clone(),
                similarity_score: *score,
                combined,
                community: store.labels().get(&entry.id).cloned(),
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.combined
            .partial_cmp(&a.combined)
            .unwrap_or(Ordering::Equal)
    });
    ranked
}

/// One entry of [`top_nodes`]: a node id with its PageRank and community
/// label (falling back to the id itself when no label exists).
#[derive(Debug, Clone, PartialEq)]
pub struct TopNode {
    pub id: String,
    pub rank: f64,
    pub community: String,
}

#[must_use]
pub fn top_nodes(store: &GraphStore, n: usize) -> Vec<TopNode> {
    let mut nodes: Vec<TopNode> = store
        .ranks()
        .iter()
        .map(|(id, rank)| TopNode {
            id: id.clone(),
            rank: *rank,
            community: store
                .labels()
                .get(id)
                .cloned()
                .unwrap_or_else(|| id.clone()),
        })
        .collect();

    nodes.sort_by(|a, b| b.rank.partial_cmp(&a.rank).unwrap_or(Ordering::Equal));
    nodes.truncate(n);
    nodes
}

/// Breadth-first forward traversal from `id`, excluding `id` itself.
/// Visited bookkeeping is global across depths so a node already reached
/// at a shallower depth is not revisited.
#[must_use]
pub fn neighbors(store: &GraphStore, id: &str, depth: usize) -> HashSet<String> {
    let mut visited: HashSet<String> = HashSet::new();
    visited.insert(id.to_string());

    let mut frontier: VecDeque<String> = VecDeque::new();
    frontier.push_back(id.to_string());

    for _ in 0..depth {
        if frontier.is_empty() {
            break;
        }
        let mut next_frontier = VecDeque::new();
        while let Some(current) = frontier.pop_front() {
            for edge in store.out_edges(&current) {
                if visited.insert(edge.target.clone()) {
                    next_frontier.push_back(edge.target.clone());
                }
            }
        }
        frontier = next_frontier;
    }

    visited.remove(id);
    visited
}

/// Summary statistics over the current graph state (§4.E).
#[derive(Debug, Clone, PartialEq)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub avg_degree: f64,
    pub community_count: usize,
    pub pagerank_computed: bool,
    pub max_pagerank: f64,
    pub min_pagerank: f64,
}

#[must_use]
pub fn stats(store: &GraphStore) -> GraphStats {
    let node_count = store.node_count();
    let edge_count = store.edge_count();
    let avg_degree = if node_count == 0 {
        0.0
    } else {
        edge_count as f64 / node_count as f64
    };

    let (max_pagerank, min_pagerank) = store.ranks().values().fold(
        (None::<f64>, None::<f64>),
        |(max, min), &rank| {
            (
                Some(max.map_or(rank, |m| m.max(rank))),
                Some(min.map_or(rank, |m| m.min(rank))),
            )
        },
    );
    let max_pagerank = max_pagerank.unwrap_or(0.0);
    let min_pagerank = min_pagerank.unwrap_or(0.0);

    GraphStats {
        node_count,
        edge_count,
        avg_degree,
        community_count: crate::community::distinct_label_count(store.labels()),
        pagerank_computed: !store.is_dirty(),
        max_pagerank,
        min_pagerank,
    }
}
