use serde::{Deserialize, Serialize};

use crate::errors::constants::{
    FEEDBACK_EXCELLENT, FEEDBACK_GOOD, FEEDBACK_NEEDS_PRACTICE, GOOD_THRESHOLD, OKAY_THRESHOLD,
};

/// Qualitative bucket for a single unit score
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Good,
    Okay,
    Poor,
}

impl Tier {
    pub fn from_score(score: u8) -> Self {
        if score >= GOOD_THRESHOLD {
            Tier::Good
        } else if score >= OKAY_THRESHOLD {
            Tier::Okay
        } else {
            Tier::Poor
        }
    }
}

/// Message shown for the overall score. Thresholds mirror [`Tier`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feedback {
    Excellent,
    Good,
    NeedsPractice,
}

impl Feedback {
    pub fn from_score(score: u8) -> Self {
        match Tier::from_score(score) {
            Tier::Good => Feedback::Excellent,
            Tier::Okay => Feedback::Good,
            Tier::Poor => Feedback::NeedsPractice,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Feedback::Excellent => FEEDBACK_EXCELLENT,
            Feedback::Good => FEEDBACK_GOOD,
            Feedback::NeedsPractice => FEEDBACK_NEEDS_PRACTICE,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitScore {
    pub unit: String,
    pub score: u8,
    pub tier: Tier,
}

impl UnitScore {
    pub fn new(unit: impl Into<String>, score: u8) -> Self {
        Self {
            unit: unit.into(),
            score,
            tier: Tier::from_score(score),
        }
    }
}

/// Outcome of one pronunciation attempt. Built per request, never stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub overall_score: u8,
    pub per_unit_scores: Vec<UnitScore>,
    pub feedback: Feedback,
}

impl ScoreResult {
    pub fn new(overall_score: u8, per_unit_scores: Vec<UnitScore>) -> Self {
        Self {
            overall_score,
            per_unit_scores,
            feedback: Feedback::from_score(overall_score),
        }
    }
}
