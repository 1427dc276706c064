//! Core data types: the external [`MemoryEntry`] shape and the owned
//! [`GraphNode`]/[`GraphEdge`] types the store derives from it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A record as seen from the backing store. Opaque to the graph except for
/// the fields listed here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryEntry {
    pub id: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub access_count: u64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub references: Vec<String>,
    #[serde(default)]
    pub embedding: Option<Vec<f32>>,
}

const DEFAULT_CATEGORY: &str = "general";
const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Edge classification. Re-adding an edge never changes its type; only its
/// weight may be bumped to the observed maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeType {
    Reference,
    Similar,
    Temporal,
    CoAccessed,
    Causal,
}

/// A node derived from a [`MemoryEntry`] at ingest. Never mutated in place;
/// re-adding an entry replaces the node wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub id: String,
    pub category: String,
    pub confidence: f64,
    pub access_count: u64,
    pub created_at: DateTime<Utc>,
}

impl GraphNode {
    #[must_use]
    pub fn from_entry(entry: &MemoryEntry) -> Self {
        Self {
            id: entry.id.clone(),
            category: entry
                .category
                .clone()
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            confidence: entry.confidence.unwrap_or(DEFAULT_CONFIDENCE),
            access_count: entry.access_count,
            created_at: entry.created_at,
        }
    }
}

/// A directed, typed, weighted edge from the owning node's perspective.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphEdge {
    pub target: String,
    pub edge_type: EdgeType,
    pub weight: f64,
}
