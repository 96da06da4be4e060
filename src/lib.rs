// Public API for the hatsuon library

pub mod config;
pub mod errors;
pub mod scoring;
pub mod session;
pub mod trace;
pub mod utils;
pub mod word_bank;

// Re-export commonly used types
pub use errors::{HatsuonError, Result};
pub use scoring::{
    breakdown::{BreakdownMode, FractionSource, RandomFraction},
    result::{Feedback, ScoreResult, Tier, UnitScore},
    scorer::SimilarityScorer,
    similarity::overall_score,
};
pub use utils::{MetricsSnapshot, ScoringMetrics};
pub use word_bank::{ReferenceWord, WordBank};
