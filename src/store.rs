//! In-memory directed graph: nodes, outgoing edges, and a reverse-edge
//! index, plus the derived per-node state (PageRank, community label) that
//! lives and dies with the node it describes.
//!
//! ```text
//! nodes : id -> GraphNode
//! out   : id -> ordered Vec<GraphEdge>   (insertion order is the
//!                                         community-detection tie-break order)
//! inbound: id -> HashSet<source-id>      (reverse index)
//! ```

use std::collections::{HashMap, HashSet};

use tracing::{debug, instrument};

use crate::types::{EdgeType, GraphEdge, GraphNode, MemoryEntry};

/// Owns the graph's structural state and the dirty flag coordinating it
/// with the PageRank cache (§3 invariant 6).
#[derive(Debug)]
pub struct GraphStore {
    nodes: HashMap<String, GraphNode>,
    out: HashMap<String, Vec<GraphEdge>>,
    inbound: HashMap<String, HashSet<String>>,
    ranks: HashMap<String, f64>,
    labels: HashMap<String, String>,
    dirty: bool,
    max_nodes: usize,
}

impl GraphStore {
    #[must_use]
    pub fn new(max_nodes: usize) -> Self {
        Self {
            nodes: HashMap::new(),
            out: HashMap::new(),
            inbound: HashMap::new(),
            ranks: HashMap::new(),
            labels: HashMap::new(),
            dirty: false,
            max_nodes,
        }
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.out.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    #[must_use]
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    #[must_use]
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    #[must_use]
    pub fn out_edges(&self, id: &str) -> &[GraphEdge] {
        self.out.get(id).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn in_neighbors(&self, id: &str) -> Option<&HashSet<String>> {
        self.inbound.get(id)
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    #[must_use]
    pub fn ranks(&self) -> &HashMap<String, f64> {
        &self.ranks
    }

    pub fn set_ranks(&mut self, ranks: HashMap<String, f64>) {
        self.ranks = ranks;
    }

    #[must_use]
    pub fn labels(&self) -> &HashMap<String, String> {
        &self.labels
    }

    pub fn set_labels(&mut self, labels: HashMap<String, String>) {
        self.labels = labels;
    }

    #[must_use]
    pub fn has_edge(&self, source: &str, target: &str) -> bool {
        self.out
            .get(source)
            .is_some_and(|edges| edges.iter().any(|e| e.target == target))
    }

    /// Capacity-gated insert. A no-op when at capacity and `entry.id` is
    /// new; otherwise inserts or replaces the node.
    #[instrument(skip(self, entry), fields(id = %entry.id))]
    pub fn add_node(&mut self, entry: &MemoryEntry) {
        let at_capacity = self.nodes.len() >= self.max_nodes;
        if at_capacity && !self.nodes.contains_key(&entry.id) {
            debug!("add_node rejected: at capacity");
            return;
        }

        self.nodes
            .insert(entry.id.clone(), GraphNode::from_entry(entry));
        self.out.entry(entry.id.clone()).or_default();
        self.inbound.entry(entry.id.clone()).or_default();
        self.dirty = true;
    }

    /// If either endpoint is missing, no-op. Re-adding an edge keeps the
    /// maximum weight and never changes the recorded type.
    #[instrument(skip(self))]
    pub fn add_edge(&mut self, source: &str, target: &str, edge_type: EdgeType, weight: f64) {
        if !self.nodes.contains_key(source) || !self.nodes.contains_key(target) {
            debug!("add_edge rejected: missing endpoint");
            return;
        }

        let edges = self.out.entry(source.to_string()).or_default();
        if let Some(existing) = edges.iter_mut().find(|e| e.target == target) {
            existing.weight = existing.weight.max(weight);
        } else {
            edges.push(GraphEdge {
                target: target.to_string(),
                edge_type,
                weight,
            });
            self.inbound
                .entry(target.to_string())
                .or_default()
                .insert(source.to_string());
        }
        self.dirty = true;
    }

    /// Erases all incident edges (both directions) and any derived
    /// PageRank/community state for `id`.
    #[instrument(skip(self))]
    pub fn remove_node(&mut self, id: &str) {
        if self.nodes.remove(id).is_none() {
            return;
        }

        if let Some(targets) = self.out.remove(id) {
            for edge in targets {
                if let Some(sources) = self.inbound.get_mut(&edge.target) {
                    sources.remove(id);
                }
            }
        }

        if let Some(sources) = self.inbound.remove(id) {
            for source in sources {
                if let Some(edges) = self.out.get_mut(&source) {
                    edges.retain(|e| e.target != id);
                }
            }
        }

        self.ranks.remove(id);
        self.labels.remove(id);
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry(id: &str) -> MemoryEntry {
        MemoryEntry {
            id: id.to_string(),
            category: None,
            confidence: None,
            access_count: 0,
            created_at: Utc::now(),
            references: vec![],
            embedding: None,
        }
    }

    #[test]
    fn add_node_then_query() {
        let mut store = GraphStore::new(5000);
        store.add_node(&entry("a"));
        assert_eq!(store.node_count(), 1);
        assert!(store.contains_node("a"));
        assert!(store.is_dirty());
    }

    #[test]
    fn add_node_at_capacity_is_noop_for_new_id() {
        let mut store = GraphStore::new(1);
        store.add_node(&entry("a"));
        store.add_node(&entry("b"));
        assert_eq!(store.node_count(), 1);
        assert!(store.contains_node("a"));
        assert!(!store.contains_node("b"));
    }

    #[test]
    fn re_adding_existing_node_at_capacity_still_replaces() {
        let mut store = GraphStore::new(1);
        store.add_node(&entry("a"));
        let mut e = entry("a");
        e.access_count = 7;
        store.add_node(&e);
        assert_eq!(store.node_count(), 1);
        assert_eq!(store.node("a").unwrap().access_count, 7);
    }

    #[test]
    fn add_edge_requires_both_endpoints() {
        let mut store = GraphStore::new(5000);
        store.add_node(&entry("a"));
        store.add_edge("a", "missing", EdgeType::Reference, 1.0);
        assert_eq!(store.edge_count(), 0);
    }

    #[test]
    fn add_edge_twice_keeps_max_weight_and_original_type() {
        let mut store = GraphStore::new(5000);
        store.add_node(&entry("a"));
        store.add_node(&entry("b"));
        store.add_edge("a", "b", EdgeType::Similar, 0.5);
        store.add_edge("a", "b", EdgeType::Reference, 0.9);
        let edges = store.out_edges("a");
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].edge_type, EdgeType::Similar);
        assert!((edges[0].weight - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn add_edge_keeps_existing_max_when_new_weight_lower() {
        let mut store = GraphStore::new(5000);
        store.add_node(&entry("a"));
        store.add_node(&entry("b"));
        store.add_edge("a", "b", EdgeType::Reference, 0.9);
        store.add_edge("a", "b", EdgeType::Reference, 0.2);
        assert!((store.out_edges("a")[0].weight - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn remove_node_cleans_up_both_directions() {
        let mut store = GraphStore::new(5000);
        store.add_node(&entry("a"));
        store.add_node(&entry("b"));
        store.add_edge("a", "b", EdgeType::Reference, 1.0);
        store.remove_node("b");
        assert_eq!(store.node_count(), 1);
        assert_eq!(store.edge_count(), 0);
        assert!(store.in_neighbors("b").is_none());
    }

    #[test]
    fn remove_node_clears_derived_state() {
        let mut store = GraphStore::new(5000);
        store.add_node(&entry("a"));
        store.set_ranks(HashMap::from([("a".to_string(), 0.5)]));
        store.set_labels(HashMap::from([("a".to_string(), "c0".to_string())]));
        store.remove_node("a");
        assert!(!store.ranks().contains_key("a"));
        assert!(!store.labels().contains_key("a"));
    }

    #[test]
    fn remove_node_then_readd_matches_fresh_state() {
        let mut empty = GraphStore::new(5000);
        let mut roundtrip = GraphStore::new(5000);
        roundtrip.add_node(&entry("a"));
        roundtrip.remove_node("a");
        assert_eq!(empty.node_count(), roundtrip.node_count());
        assert_eq!(empty.edge_count(), roundtrip.edge_count());
    }

    // Property-based invariant checks (§8): capacity, idempotence, and
    // reverse-index consistency under arbitrary operation sequences, not
    // just the fixed cases above.
    mod properties {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            AddNode(String),
            AddEdge(String, String, f64),
            RemoveNode(String),
        }

        fn id_strategy() -> impl Strategy<Value = String> {
            prop_oneof![
                Just("a".to_string()),
                Just("b".to_string()),
                Just("c".to_string()),
                Just("d".to_string()),
                Just("e".to_string()),
            ]
        }

        fn op_strategy() -> impl Strategy<Value = Op> {
            prop_oneof![
                id_strategy().prop_map(Op::AddNode),
                (id_strategy(), id_strategy(), 0.0f64..5.0)
                    .prop_map(|(a, b, w)| Op::AddEdge(a, b, w)),
                id_strategy().prop_map(Op::RemoveNode),
            ]
        }

        proptest! {
            #[test]
            fn capacity_never_exceeded(ids in prop::collection::vec(id_strategy(), 0..50)) {
                let max_nodes = 3;
                let mut store = GraphStore::new(max_nodes);
                for id in &ids {
                    store.add_node(&entry(id));
                    prop_assert!(store.node_count() <= max_nodes);
                }
            }

            #[test]
            fn add_node_is_idempotent(
                id in id_strategy(),
                confidence in 0.0f64..1.0,
                access_count in 0u64..100,
            ) {
                let mut e = entry(&id);
                e.confidence = Some(confidence);
                e.access_count = access_count;

                let mut once = GraphStore::new(5000);
                once.add_node(&e);

                let mut twice = GraphStore::new(5000);
                twice.add_node(&e);
                twice.add_node(&e);

                prop_assert_eq!(once.node_count(), twice.node_count());
                prop_assert_eq!(once.node(&id).cloned(), twice.node(&id).cloned());
            }

            #[test]
            fn add_edge_is_idempotent_with_max_weight(w1 in 0.0f64..5.0, w2 in 0.0f64..5.0) {
                let mut once = GraphStore::new(5000);
                once.add_node(&entry("a"));
                once.add_node(&entry("b"));
                once.add_edge("a", "b", EdgeType::Reference, w1.max(w2));

                let mut twice = GraphStore::new(5000);
                twice.add_node(&entry("a"));
                twice.add_node(&entry("b"));
                twice.add_edge("a", "b", EdgeType::Reference, w1);
                twice.add_edge("a", "b", EdgeType::Reference, w2);

                prop_assert_eq!(once.out_edges("a").to_vec(), twice.out_edges("a").to_vec());
            }

            #[test]
            fn reverse_index_consistent_after_random_ops(ops in prop::collection::vec(op_strategy(), 0..80)) {
                let mut store = GraphStore::new(20);
                for op in ops {
                    match op {
                        Op::AddNode(id) => store.add_node(&entry(&id)),
                        Op::AddEdge(a, b, w) => store.add_edge(&a, &b, EdgeType::Reference, w),
                        Op::RemoveNode(id) => store.remove_node(&id),
                    }
                }

                let ids: Vec<String> = store.node_ids().map(str::to_string).collect();
                for id in &ids {
                    for edge in store.out_edges(id) {
                        let reciprocal = store
                            .in_neighbors(&edge.target)
                            .is_some_and(|sources| sources.contains(id));
                        prop_assert!(reciprocal);
                    }
                    if let Some(sources) = store.in_neighbors(id) {
                        for source in sources {
                            let reciprocal = store.out_edges(source).iter().any(|e| &e.target == id);
                            prop_assert!(reciprocal);
                        }
                    }
                }
            }
        }
    }
}
