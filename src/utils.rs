use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, LockResult,
};

use serde::Serialize;

/// Unwrap a lock result, recovering the guard if another thread panicked
/// while holding it. Scoring state is always left consistent between
/// statements, so a poisoned lock is still usable.
pub fn recover_lock<G>(result: LockResult<G>) -> G {
    result.unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Scoring metrics collection
#[derive(Debug, Default, Clone)]
pub struct ScoringMetrics {
    pub attempts_scored: Arc<AtomicU64>,
    pub units_scored: Arc<AtomicU64>,
    pub score_cache_hits: Arc<AtomicU64>,
    pub score_cache_misses: Arc<AtomicU64>,
}

impl ScoringMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_attempts_scored(&self) {
        self.attempts_scored.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_units_scored(&self, count: u64) {
        self.units_scored.fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_score_cache_hits(&self) {
        self.score_cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_score_cache_misses(&self) {
        self.score_cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_stats(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            attempts_scored: self.attempts_scored.load(Ordering::Relaxed),
            units_scored: self.units_scored.load(Ordering::Relaxed),
            score_cache_hits: self.score_cache_hits.load(Ordering::Relaxed),
            score_cache_misses: self.score_cache_misses.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub attempts_scored: u64,
    pub units_scored: u64,
    pub score_cache_hits: u64,
    pub score_cache_misses: u64,
}

impl MetricsSnapshot {
    pub fn score_cache_hit_rate(&self) -> f64 {
        if self.score_cache_hits + self.score_cache_misses > 0 {
            self.score_cache_hits as f64 / (self.score_cache_hits + self.score_cache_misses) as f64
        } else {
            0.0
        }
    }
}
