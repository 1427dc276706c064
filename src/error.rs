//! Error types for the crate's two fallible boundaries: backing-store I/O
//! and optional config loading. Every other public operation is total
//! (see the module docs in [`crate::store`] and [`crate::ranker`]).

use thiserror::Error;

/// Raised by [`crate::backing_store::BackingStore`] implementations and
/// surfaced unchanged through [`crate::edges::add_similarity_edges`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("backing store lookup failed for id `{id}`: {source}")]
    Get {
        id: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("backing store similarity search failed: {source}")]
    Search {
        #[source]
        source: anyhow::Error,
    },
}

/// Raised only by [`crate::config::GraphConfig`]'s TOML loading path.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file at `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {source}")]
    Parse {
        #[source]
        source: toml::de::Error,
    },

    #[error("config field `{field}` out of range: {reason}")]
    OutOfRange { field: &'static str, reason: String },
}
