//! The external capability the core depends on but never owns.
//!
//! `BackingStore` is the only suspension point in the crate (§5 of the
//! design notes): everything else executes to completion synchronously.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::types::MemoryEntry;

/// Parameters for a bulk `query` call.
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    pub namespace: Option<String>,
    pub limit: Option<usize>,
}

/// Parameters for a `search` (k-nearest-neighbour) call.
#[derive(Debug, Clone)]
pub struct SearchParams {
    pub k: usize,
    pub threshold: f64,
}

/// One hit from a similarity search: the matched entry and its score.
/// `score` is cosine-similarity-like; higher means more similar.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub entry: MemoryEntry,
    pub score: f64,
}

/// The persistent memory system the core is a projection over. Implemented
/// by the host; the core only ever reads through this trait.
#[async_trait]
pub trait BackingStore: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<MemoryEntry>, StoreError>;

    async fn query(&self, params: QueryParams) -> Result<Vec<MemoryEntry>, StoreError>;

    async fn search(
        &self,
        embedding: &[f32],
        params: SearchParams,
    ) -> Result<Vec<SearchHit>, StoreError>;
}
