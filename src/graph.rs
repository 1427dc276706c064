//! Public entry point: `MemoryGraph` ties the graph store, edge builder,
//! PageRank engine, community detector, and ranker together behind the
//! construction and query surface described in §6.

use std::collections::HashMap;

use tokio::sync::mpsc;
use tracing::instrument;

use crate::backing_store::BackingStore;
use crate::community::{self, distinct_label_count};
use crate::config::{CommunityAlgorithm, GraphConfig};
use crate::edges;
use crate::error::StoreError;
use crate::events::{self, GraphEvent};
use crate::pagerank::{self, PageRankConfig};
use crate::ranker::{self, GraphStats, RankedResult, TopNode};
use crate::store::GraphStore;
use crate::types::MemoryEntry;

const EVENT_CHANNEL_CAPACITY: usize = 64;
const DEFAULT_BLEND_ALPHA: f64 = 0.7;

/// The knowledge-graph ranking and clustering core (§1).
pub struct MemoryGraph {
    store: GraphStore,
    config: GraphConfig,
    events: Option<mpsc::Sender<GraphEvent>>,
}

impl MemoryGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(GraphConfig::default())
    }

    #[must_use]
    pub fn with_config(config: GraphConfig) -> Self {
        Self {
            store: GraphStore::new(config.max_nodes),
            config,
            events: None,
        }
    }

    /// Like [`Self::with_config`], but also returns a receiver for the
    /// event channel described in §6.
    #[must_use]
    pub fn with_event_channel(config: GraphConfig) -> (Self, mpsc::Receiver<GraphEvent>) {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let mut graph = Self::with_config(config);
        graph.events = Some(tx);
        (graph, rx)
    }

    /// Ingest an entry set: add every entry as a node, then wire reference
    /// edges from declared cross-references. Emits `graph:built`.
    #[instrument(skip(self, entries))]
    pub fn ingest(&mut self, entries: &[MemoryEntry]) {
        edges::build_reference_edges(&mut self.store, entries);
        events::emit(
            self.events.as_ref(),
            GraphEvent::Built {
                node_count: self.store.node_count(),
            },
        );
    }

    pub fn add_node(&mut self, entry: &MemoryEntry) {
        self.store.add_node(entry);
    }

    pub fn add_edge(
        &mut self,
        source: &str,
        target: &str,
        edge_type: crate::types::EdgeType,
        weight: f64,
    ) {
        self.store.add_edge(source, target, edge_type, weight);
    }

    pub fn remove_node(&mut self, id: &str) {
        self.store.remove_node(id);
    }

    #[must_use]
    pub fn has_edge(&self, source: &str, target: &str) -> bool {
        self.store.has_edge(source, target)
    }

    /// §4.B's similarity-edge path; the only fallible, suspending
    /// operation in the whole core.
    pub async fn add_similarity_edges(
        &mut self,
        backing_store: &dyn BackingStore,
        entry_id: &str,
    ) -> Result<usize, StoreError> {
        edges::add_similarity_edges(
            &mut self.store,
            backing_store,
            entry_id,
            self.config.similarity_threshold,
        )
        .await
    }

    /// Recompute PageRank unconditionally. Most callers should rely on the
    /// dirty-flag-gated recomputation done by [`Self::rank_with_graph`] and
    /// [`Self::get_top_nodes`] instead.
    #[instrument(skip(self))]
    pub fn compute_page_rank(&mut self) -> HashMap<String, f64> {
        let pr_config = PageRankConfig {
            damping: self.config.pagerank_damping,
            tolerance: self.config.pagerank_convergence,
            max_iter: self.config.pagerank_iterations,
        };
        let result = pagerank::compute(&self.store, &pr_config);
        self.store.set_ranks(result.scores.clone());
        self.store.clear_dirty();
        events::emit(
            self.events.as_ref(),
            GraphEvent::PageRankComputed {
                iterations: result.iterations,
            },
        );
        result.scores
    }

    fn ensure_ranks(&mut self) {
        if self.store.is_dirty() {
            self.compute_page_rank();
        }
    }

    /// Run community detection. `louvain` currently aliases to label
    /// propagation (see `DESIGN.md` for the Open Question resolution).
    #[instrument(skip(self))]
    pub fn detect_communities(&mut self) -> HashMap<String, String> {
        let labels = match self.config.community_algorithm {
            CommunityAlgorithm::LabelPropagation | CommunityAlgorithm::Louvain => {
                community::detect_communities_default(&self.store)
            }
        };
        self.store.set_labels(labels.clone());
        events::emit(
            self.events.as_ref(),
            GraphEvent::CommunitiesDetected {
                community_count: distinct_label_count(&labels),
            },
        );
        labels
    }

    /// §4.E: blend similarity scores with structural importance.
    /// Recomputes PageRank first if the store is dirty.
    pub fn rank_with_graph(
        &mut self,
        results: &[(MemoryEntry, f64)],
        alpha: f64,
    ) -> Vec<RankedResult> {
        self.ensure_ranks();
        ranker::blend(&self.store, results, alpha)
    }

    pub fn rank_with_graph_default(&mut self, results: &[(MemoryEntry, f64)]) -> Vec<RankedResult> {
        self.rank_with_graph(results, DEFAULT_BLEND_ALPHA)
    }

    pub fn get_top_nodes(&mut self, n: usize) -> Vec<TopNode> {
        self.ensure_ranks();
        ranker::top_nodes(&self.store, n)
    }

    #[must_use]
    pub fn get_neighbors(&self, id: &str, depth: usize) -> std::collections::HashSet<String> {
        ranker::neighbors(&self.store, id, depth)
    }

    #[must_use]
    pub fn get_stats(&self) -> GraphStats {
        ranker::stats(&self.store)
    }
}

impl Default for MemoryGraph {
    fn default() -> Self {
        Self::new()
    }
}
