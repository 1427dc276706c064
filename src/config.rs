//! Tuning knobs for a [`crate::graph::MemoryGraph`] instance.
//!
//! `GraphConfig` is constructed directly in the common case
//! (`GraphConfig::default()` or a struct literal). The optional TOML loader
//! below exists for hosts that want to keep graph tuning in a config file
//! alongside the rest of their settings.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// Community-detection algorithm selection. `Louvain` is accepted for
/// forward compatibility but currently aliases to label propagation; see
/// `DESIGN.md` for the rationale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommunityAlgorithm {
    LabelPropagation,
    Louvain,
}

impl Default for CommunityAlgorithm {
    fn default() -> Self {
        Self::LabelPropagation
    }
}

const fn default_similarity_threshold() -> f64 {
    0.8
}
const fn default_pagerank_damping() -> f64 {
    0.85
}
const fn default_pagerank_iterations() -> usize {
    50
}
const fn default_pagerank_convergence() -> f64 {
    1e-6
}
const fn default_max_nodes() -> usize {
    5000
}
const fn default_enable_auto_edges() -> bool {
    true
}
const fn default_community_algorithm() -> CommunityAlgorithm {
    CommunityAlgorithm::LabelPropagation
}

/// Recognized construction options for [`crate::graph::MemoryGraph`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,
    #[serde(default = "default_pagerank_damping")]
    pub pagerank_damping: f64,
    #[serde(default = "default_pagerank_iterations")]
    pub pagerank_iterations: usize,
    #[serde(default = "default_pagerank_convergence")]
    pub pagerank_convergence: f64,
    #[serde(default = "default_max_nodes")]
    pub max_nodes: usize,
    #[serde(default = "default_enable_auto_edges")]
    pub enable_auto_edges: bool,
    #[serde(default = "default_community_algorithm")]
    pub community_algorithm: CommunityAlgorithm,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            pagerank_damping: default_pagerank_damping(),
            pagerank_iterations: default_pagerank_iterations(),
            pagerank_convergence: default_pagerank_convergence(),
            max_nodes: default_max_nodes(),
            enable_auto_edges: default_enable_auto_edges(),
            community_algorithm: default_community_algorithm(),
        }
    }
}

impl GraphConfig {
    /// Parse a config from a TOML string, falling back to defaults for any
    /// field the string omits.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(s).map_err(|source| ConfigError::Parse { source })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load a config from a TOML file on disk.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(ConfigError::OutOfRange {
                field: "similarity_threshold",
                reason: "must be within [0, 1]".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.pagerank_damping) {
            return Err(ConfigError::OutOfRange {
                field: "pagerank_damping",
                reason: "must be within [0, 1]".to_string(),
            });
        }
        if self.max_nodes == 0 {
            return Err(ConfigError::OutOfRange {
                field: "max_nodes",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let cfg = GraphConfig::default();
        assert!((cfg.similarity_threshold - 0.8).abs() < f64::EPSILON);
        assert!((cfg.pagerank_damping - 0.85).abs() < f64::EPSILON);
        assert_eq!(cfg.pagerank_iterations, 50);
        assert!((cfg.pagerank_convergence - 1e-6).abs() < f64::EPSILON);
        assert_eq!(cfg.max_nodes, 5000);
        assert!(cfg.enable_auto_edges);
        assert_eq!(cfg.community_algorithm, CommunityAlgorithm::LabelPropagation);
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let cfg = GraphConfig::from_toml_str("").expect("parse");
        assert_eq!(cfg, GraphConfig::default());
    }

    #[test]
    fn partial_toml_overrides_only_given_fields() {
        let cfg = GraphConfig::from_toml_str("max_nodes = 10\n").expect("parse");
        assert_eq!(cfg.max_nodes, 10);
        assert!((cfg.pagerank_damping - 0.85).abs() < f64::EPSILON);
    }

    #[test]
    fn out_of_range_damping_rejected() {
        let err = GraphConfig::from_toml_str("pagerank_damping = 1.5\n").unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { field: "pagerank_damping", .. }));
    }

    #[test]
    fn from_file_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("graph.toml");
        std::fs::write(&path, "max_nodes = 42\n").expect("write");
        let cfg = GraphConfig::from_file(&path).expect("load");
        assert_eq!(cfg.max_nodes, 42);
    }

    #[test]
    fn missing_file_errors() {
        let err = GraphConfig::from_file(Path::new("/nonexistent/graph.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
