//! Power-iteration PageRank with dangling-mass redistribution (§4.C).
//!
//! The dangling-mass formula uses a defensive `|out[v]| = 1` divisor
//! alongside an explicit `dangling_sum / N` redistribution term. Do not
//! simplify this to the textbook formulation: the two terms are not
//! equivalent when isolated nodes are present, and the contract fixes this
//! exact shape (see `DESIGN.md`).

use std::collections::HashMap;

use tracing::{debug, instrument};

use crate::store::GraphStore;

#[derive(Debug, Clone)]
pub struct PageRankConfig {
    pub damping: f64,
    pub tolerance: f64,
    pub max_iter: usize,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            damping: 0.85,
            tolerance: 1e-6,
            max_iter: 50,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PageRankResult {
    pub scores: HashMap<String, f64>,
    pub iterations: usize,
}

/// Run power iteration to convergence (max-norm, per §4.C) or `max_iter`,
/// whichever comes first.
#[must_use]
#[instrument(skip(store, config))]
pub fn compute(store: &GraphStore, config: &PageRankConfig) -> PageRankResult {
    let ids: Vec<&str> = store.node_ids().collect();
    let n = ids.len();

    if n == 0 {
        return PageRankResult {
            scores: HashMap::new(),
            iterations: 0,
        };
    }

    let n_f64 = n as f64;
    let mut ranks: HashMap<String, f64> =
        ids.iter().map(|id| ((*id).to_string(), 1.0 / n_f64)).collect();

    let mut iterations = 0;
    for _ in 0..config.max_iter {
        iterations += 1;

        let dangling_sum: f64 = ids
            .iter()
            .filter(|id| store.out_edges(id).is_empty())
            .map(|id| ranks[*id])
            .sum();

        let mut new_ranks = HashMap::with_capacity(n);
        let mut max_diff: f64 = 0.0;

        for id in &ids {
            let inbound_sum: f64 = store.in_neighbors(id).map_or(0.0, |sources| {
                sources
                    .iter()
                    .map(|source| {
                        let out_degree = store.out_edges(source).len().max(1) as f64;
                        ranks[source] / out_degree
                    })
                    .sum()
            });

            let new_rank =
                (1.0 - config.damping) / n_f64 + config.damping * (inbound_sum + dangling_sum / n_f64);

            max_diff = max_diff.max((new_rank - ranks[*id]).abs());
            new_ranks.insert((*id).to_string(), new_rank);
        }

        ranks = new_ranks;
        if max_diff < config.tolerance {
            break;
        }
    }

    debug!(iterations, "pagerank converged or exhausted max_iter");
    PageRankResult {
        scores: ranks,
        iterations,
    }
}
