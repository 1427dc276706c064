//! Asynchronous weighted label propagation (§4.D).
//!
//! Each sweep visits nodes in a freshly Fisher–Yates-shuffled order and
//! reassigns each node's label to the highest-scoring neighbour label,
//! breaking ties by first-seen order within that node's sweep. The caller
//! supplies the random source so tests can fix a seed; production callers
//! use an ambient generator (`rand::thread_rng`).

use std::collections::HashMap;

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, instrument};

use crate::store::GraphStore;

const MAX_OUTER_ITERATIONS: usize = 20;

/// Accumulates per-label scores while remembering first-seen order, so the
/// eventual "highest score, earliest seen" tie-break is a simple linear
/// scan rather than a second pass.
#[derive(Default)]
struct LabelScores {
    order: Vec<String>,
    index: HashMap<String, usize>,
    scores: Vec<f64>,
}

impl LabelScores {
    fn add(&mut self, label: &str, amount: f64) {
        if let Some(&i) = self.index.get(label) {
            self.scores[i] += amount;
        } else {
            self.index.insert(label.to_string(), self.scores.len());
            self.order.push(label.to_string());
            self.scores.push(amount);
        }
    }

    fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Highest score; first-seen label wins ties.
    fn winner(&self) -> &str {
        let mut best = 0;
        for i in 1..self.scores.len() {
            if self.scores[i] > self.scores[best] {
                best = i;
            }
        }
        &self.order[best]
    }
}

/// Run label propagation with an injected random source (for deterministic
/// tests). Returns the final label assignment.
#[instrument(skip(store, rng))]
pub fn detect_communities<R: Rng + ?Sized>(
    store: &GraphStore,
    rng: &mut R,
) -> HashMap<String, String> {
    let mut order: Vec<String> = store.node_ids().map(str::to_string).collect();
    let mut labels: HashMap<String, String> =
        order.iter().map(|id| (id.clone(), id.clone())).collect();

    for _ in 0..MAX_OUTER_ITERATIONS {
        order.shuffle(rng);
        let mut changed = false;

        for u in &order {
            let mut candidates = LabelScores::default();

            for edge in store.out_edges(u) {
                candidates.add(&labels[&edge.target], edge.weight);
            }
            if let Some(sources) = store.in_neighbors(u) {
                for source in sources {
                    candidates.add(&labels[source], 1.0);
                }
            }

            if candidates.is_empty() {
                continue;
            }

            let winner = candidates.winner();
            if winner != labels[u] {
                labels.insert(u.clone(), winner.to_string());
                changed = true;
            }
        }

        if !changed {
            break;
        }
    }

    debug!(
        community_count = distinct_label_count(&labels),
        "label propagation settled"
    );
    labels
}

/// Convenience wrapper using the ambient thread-local generator.
#[must_use]
pub fn detect_communities_default(store: &GraphStore) -> HashMap<String, String> {
    detect_communities(store, &mut rand::thread_rng())
}

#[must_use]
pub fn distinct_label_count(labels: &HashMap<String, String>) -> usize {
    labels.values().collect::<std::collections::HashSet<_>>().len()
}
