use std::{
    fmt,
    num::NonZeroUsize,
    sync::{Mutex, RwLock},
};

use lru::LruCache;
use rand::{rngs::StdRng, SeedableRng};
use tracing::debug;

use super::{
    breakdown::{aligned_breakdown, randomized_breakdown, BreakdownMode, RandomFraction},
    result::{ScoreResult, UnitScore},
    similarity::{normalize, similarity_percent},
};
use crate::{
    config::Config,
    errors::constants::DEFAULT_CACHE_SIZE,
    utils::{recover_lock, ScoringMetrics},
    word_bank::word::ReferenceWord,
};

/// Normalized reference/candidate pair, stored in sorted order because
/// the score is symmetric.
type CacheKey = (String, String);

/// Scores pronunciation attempts against reference words.
///
/// Shareable across threads. Results never depend on the cache, only the
/// randomized breakdown depends on the RNG.
pub struct SimilarityScorer {
    mode: BreakdownMode,
    rng: Option<Mutex<StdRng>>,
    cache: Option<RwLock<LruCache<CacheKey, u8>>>,
    metrics: ScoringMetrics,
}

impl fmt::Debug for SimilarityScorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimilarityScorer")
            .field("mode", &self.mode)
            .field("seeded", &self.rng.is_some())
            .field("cached", &self.cache.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for SimilarityScorer {
    fn default() -> Self {
        Self::new(BreakdownMode::default(), None, DEFAULT_CACHE_SIZE)
    }
}

impl SimilarityScorer {
    /// Create a scorer. A `cache_size` of 0 disables the score cache.
    pub fn new(mode: BreakdownMode, seed: Option<u64>, cache_size: usize) -> Self {
        Self {
            mode,
            rng: seed.map(|seed| Mutex::new(StdRng::seed_from_u64(seed))),
            cache: NonZeroUsize::new(cache_size).map(|size| RwLock::new(LruCache::new(size))),
            metrics: ScoringMetrics::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.breakdown, config.seed, config.cache_size)
    }

    pub fn mode(&self) -> BreakdownMode {
        self.mode
    }

    pub fn metrics(&self) -> &ScoringMetrics {
        &self.metrics
    }

    /// Overall 0-100 similarity between `reference` and `candidate`.
    #[tracing::instrument(level = "trace", name = "overall_score", skip(self))]
    pub fn compute_overall_score(&self, reference: &str, candidate: &str) -> u8 {
        let reference = normalize(reference);
        let candidate = normalize(candidate);
        let key = if reference <= candidate {
            (reference, candidate)
        } else {
            (candidate, reference)
        };

        let Some(cache) = &self.cache else {
            return Self::score_key(&key);
        };

        {
            let mut cache_guard = recover_lock(cache.write());
            if let Some(score) = cache_guard.get(&key) {
                debug!(score = *score, "Score cache hit");
                self.metrics.increment_score_cache_hits();
                return *score;
            }
        }

        debug!("Score cache miss, computing edit distance");
        self.metrics.increment_score_cache_misses();

        let score = Self::score_key(&key);
        {
            let mut cache_guard = recover_lock(cache.write());
            cache_guard.put(key, score);
        }
        score
    }

    fn score_key((a, b): &CacheKey) -> u8 {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        similarity_percent(&a, &b)
    }

    /// One score per unit, in the order given.
    pub fn compute_unit_breakdown(&self, units: &[String], candidate: &str) -> Vec<UnitScore> {
        self.metrics.add_units_scored(units.len() as u64);

        match self.mode {
            BreakdownMode::Aligned => aligned_breakdown(units, candidate),
            BreakdownMode::Randomized => match &self.rng {
                Some(rng) => {
                    let mut rng_guard = recover_lock(rng.lock());
                    randomized_breakdown(units, candidate, &mut RandomFraction(&mut *rng_guard))
                }
                None => randomized_breakdown(
                    units,
                    candidate,
                    &mut RandomFraction(rand::thread_rng()),
                ),
            },
        }
    }

    /// Score a transcribed attempt at `word`.
    #[tracing::instrument(skip(self, word), fields(word = %word.id, mode = ?self.mode))]
    pub fn score_attempt(&self, word: &ReferenceWord, candidate: &str) -> ScoreResult {
        self.metrics.increment_attempts_scored();

        let overall_score = self.compute_overall_score(&word.text, candidate);
        let per_unit_scores = self.compute_unit_breakdown(&word.phonemes, candidate);

        debug!(overall_score, units = per_unit_scores.len(), "Attempt scored");

        ScoreResult::new(overall_score, per_unit_scores)
    }
}
