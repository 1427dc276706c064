#![forbid(unsafe_code)]
//! memory-graph library.
//!
//! A knowledge-graph ranking and clustering core over a vector-embedded
//! memory store: directed multi-type edges, PageRank, label-propagation
//! communities, and similarity/structural rank blending.
//!
//! # Conventions
//!
//! - **Errors**: public methods are total (see [`error`]); the one
//!   fallible boundary is [`backing_store::BackingStore`] I/O.
//! - **Logging**: use `tracing` macros (`info!`, `warn!`, `debug!`, `trace!`).

pub mod backing_store;
pub mod community;
pub mod config;
pub mod edges;
pub mod error;
pub mod events;
pub mod graph;
pub mod pagerank;
pub mod ranker;
pub mod store;
pub mod types;

pub use backing_store::BackingStore;
pub use config::GraphConfig;
pub use error::{ConfigError, StoreError};
pub use events::GraphEvent;
pub use graph::MemoryGraph;
pub use types::{EdgeType, GraphEdge, GraphNode, MemoryEntry};

use tracing::{info, instrument};

#[instrument]
pub fn init() {
    info!("memory-graph initialized");
}
