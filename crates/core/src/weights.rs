//! Shared score-weight state.
//!
//! The scoring engine and the learning engine used to disagree about
//! who owns the weights; here they share a [`WeightHandle`] with
//! single-writer discipline: the learning engine is the only mutator,
//! the scoring engine takes an immutable snapshot at score time.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Lower clamp applied to the flow weight by learning adjustments.
pub const FLOW_WEIGHT_MIN: f64 = 0.3;
/// Upper clamp applied to the flow weight by learning adjustments.
pub const FLOW_WEIGHT_MAX: f64 = 0.5;

/// Relative importance of each sub-score. The defaults sum to 1.0 and
/// weight-adjustment code is expected to keep them there.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub flow: f64,
    pub technical: f64,
    pub regime: f64,
    pub news: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            flow: 0.4,
            technical: 0.25,
            regime: 0.2,
            news: 0.15,
        }
    }
}

/// Cloneable handle to the process-wide weight state.
#[derive(Debug, Clone, Default)]
pub struct WeightHandle {
    inner: Arc<RwLock<ScoreWeights>>,
}

impl WeightHandle {
    #[must_use]
    pub fn new(weights: ScoreWeights) -> Self {
        Self {
            inner: Arc::new(RwLock::new(weights)),
        }
    }

    /// Returns a copy of the current weights.
    #[must_use]
    pub fn snapshot(&self) -> ScoreWeights {
        *self.inner.read()
    }

    /// Applies a mutation under the write lock. Reserved for the
    /// learning engine; everything else reads snapshots.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut ScoreWeights),
    {
        f(&mut self.inner.write());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_sum_to_one() {
        let w = ScoreWeights::default();
        assert!((w.flow + w.technical + w.regime + w.news - 1.0).abs() < 1e-9);
    }

    #[test]
    fn handle_clones_share_state() {
        let handle = WeightHandle::default();
        let other = handle.clone();
        handle.update(|w| w.flow = 0.45);
        assert!((other.snapshot().flow - 0.45).abs() < f64::EPSILON);
    }

    #[test]
    fn snapshot_is_detached_from_later_updates() {
        let handle = WeightHandle::default();
        let snap = handle.snapshot();
        handle.update(|w| w.flow = 0.3);
        assert!((snap.flow - 0.4).abs() < f64::EPSILON);
    }
}
