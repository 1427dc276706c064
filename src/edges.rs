//! Edge construction policy (§4.B): reference edges from declared
//! cross-references, and similarity edges from k-NN queries against the
//! backing store. The core never writes back to the store; similarity
//! edges are graph-local enrichment only.

use tracing::{info, instrument, warn};

use crate::backing_store::{BackingStore, SearchParams};
use crate::error::StoreError;
use crate::store::GraphStore;
use crate::types::{EdgeType, MemoryEntry};

const SIMILARITY_K: usize = 20;

/// Adds every entry as a node, then a `reference` edge for each declared
/// reference id. Missing targets silently drop the edge, per `add_edge`'s
/// own contract.
#[instrument(skip(store, entries))]
pub fn build_reference_edges(store: &mut GraphStore, entries: &[MemoryEntry]) {
    for entry in entries {
        store.add_node(entry);
    }
    for entry in entries {
        for reference in &entry.references {
            store.add_edge(&entry.id, reference, EdgeType::Reference, 1.0);
        }
    }
    info!(node_count = store.node_count(), "reference edges built");
}

/// Fetches `entry_id` from the backing store, runs a k-NN similarity
/// search, and adds a `similar` edge for every hit at or above
/// `similarity_threshold`. Returns the count of newly added (not
/// weight-updated) edges. Returns `0` if the entry is absent or has no
/// embedding.
#[instrument(skip(store, backing_store))]
pub async fn add_similarity_edges(
    store: &mut GraphStore,
    backing_store: &dyn BackingStore,
    entry_id: &str,
    similarity_threshold: f64,
) -> Result<usize, StoreError> {
    let Some(entry) = backing_store.get(entry_id).await? else {
        return Ok(0);
    };
    let Some(embedding) = entry.embedding.as_ref() else {
        return Ok(0);
    };

    let hits = backing_store
        .search(
            embedding,
            SearchParams {
                k: SIMILARITY_K,
                threshold: similarity_threshold,
            },
        )
        .await?;

    let mut matched = 0;
    let mut added = 0;
    for hit in hits {
        if hit.entry.id == entry_id || hit.score < similarity_threshold {
            continue;
        }
        matched += 1;
        let had_edge = store.has_edge(entry_id, &hit.entry.id);
        store.add_edge(entry_id, &hit.entry.id, EdgeType::Similar, hit.score);
        if !had_edge {
            added += 1;
        }
    }

    if matched == 0 {
        warn!(entry_id, "no similarity edges met threshold");
    }
    Ok(added)
}
