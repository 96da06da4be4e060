use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};

use super::{
    result::UnitScore,
    similarity::{normalize, similarity_percent},
};
use crate::errors::{
    constants::{BASE_SCORE_FLOOR, BASE_SCORE_SPAN, CONTAINMENT_BONUS, MAX_SCORE, OKAY_THRESHOLD},
    HatsuonError,
};

/// How per-unit scores are produced
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakdownMode {
    /// Random base score in [70, 100) with a bonus for units found
    /// verbatim in the transcript.
    #[default]
    Randomized,
    /// Each unit scored by edit distance against its aligned slice of the
    /// transcript.
    Aligned,
}

impl FromStr for BreakdownMode {
    type Err = HatsuonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "randomized" | "random" => Ok(BreakdownMode::Randomized),
            "aligned" => Ok(BreakdownMode::Aligned),
            other => Err(HatsuonError::config(format!(
                "Unknown breakdown mode {:?} (expected \"randomized\" or \"aligned\")",
                other
            ))),
        }
    }
}

/// Config files accept the same spellings as the environment.
impl<'de> Deserialize<'de> for BreakdownMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

/// Source of uniform fractions in [0, 1) for the randomized breakdown.
#[cfg_attr(test, mockall::automock)]
pub trait FractionSource {
    fn next_fraction(&mut self) -> f64;
}

/// Adapts any [`rand::Rng`] into a [`FractionSource`].
pub struct RandomFraction<R>(pub R);

impl<R: Rng> FractionSource for RandomFraction<R> {
    fn next_fraction(&mut self) -> f64 {
        self.0.gen::<f64>()
    }
}

/// Randomized per-unit breakdown.
///
/// The containment check runs against the raw candidate, not its
/// normalized form.
pub fn randomized_breakdown(
    units: &[String],
    candidate: &str,
    source: &mut dyn FractionSource,
) -> Vec<UnitScore> {
    units
        .iter()
        .map(|unit| {
            let fraction = source.next_fraction().clamp(0.0, 1.0);
            let mut score = BASE_SCORE_FLOOR + fraction * BASE_SCORE_SPAN;

            if candidate.contains(unit.as_str()) {
                score = (score + CONTAINMENT_BONUS).min(f64::from(MAX_SCORE));
            }

            UnitScore::new(unit.clone(), score.round() as u8)
        })
        .collect()
}

#[derive(Clone, Copy, Debug)]
struct Window {
    end: usize,
    score: u8,
}

/// Best-scoring candidate slice for `unit` starting at or after `from`.
/// Slices are one char shorter to one char longer than the unit.
fn best_window(unit: &[char], candidate: &[char], from: usize) -> Option<Window> {
    let min_length = unit.len().saturating_sub(1).max(1);
    let max_length = unit.len() + 1;
    let mut best: Option<Window> = None;

    for start in from..candidate.len() {
        for length in min_length..=max_length {
            let end = start + length;
            if end > candidate.len() {
                break;
            }

            let score = similarity_percent(unit, &candidate[start..end]);
            if best.map_or(true, |b| score > b.score) {
                best = Some(Window { end, score });
                if score == MAX_SCORE {
                    return best;
                }
            }
        }
    }

    best
}

/// Deterministic per-unit breakdown.
///
/// Units are aligned left to right; the cursor only moves past a slice
/// that scored at least okay, so a missed unit does not swallow the rest
/// of the transcript.
pub fn aligned_breakdown(units: &[String], candidate: &str) -> Vec<UnitScore> {
    let candidate: Vec<char> = normalize(candidate).chars().collect();
    let mut cursor = 0;

    units
        .iter()
        .map(|unit| {
            let unit_chars: Vec<char> = normalize(unit).chars().collect();
            if unit_chars.is_empty() {
                return UnitScore::new(unit.clone(), MAX_SCORE);
            }

            match best_window(&unit_chars, &candidate, cursor) {
                Some(window) => {
                    if window.score >= OKAY_THRESHOLD {
                        cursor = window.end;
                    }
                    UnitScore::new(unit.clone(), window.score)
                }
                None => UnitScore::new(unit.clone(), 0),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::result::Tier;
    use rand::{rngs::StdRng, SeedableRng};

    fn units(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn fixed(fraction: f64) -> MockFractionSource {
        let mut source = MockFractionSource::new();
        source.expect_next_fraction().returning(move || fraction);
        source
    }

    #[test]
    fn test_breakdown_mode_from_str() {
        assert_eq!("aligned".parse::<BreakdownMode>().unwrap(), BreakdownMode::Aligned);
        assert_eq!(" Randomized ".parse::<BreakdownMode>().unwrap(), BreakdownMode::Randomized);
        assert_eq!("random".parse::<BreakdownMode>().unwrap(), BreakdownMode::Randomized);
        assert!("phonetic".parse::<BreakdownMode>().is_err());
        assert_eq!(BreakdownMode::default(), BreakdownMode::Randomized);
    }

    #[test]
    fn test_breakdown_mode_deserialize_matches_from_str() {
        for (raw, expected) in [
            ("\"aligned\"", BreakdownMode::Aligned),
            ("\"Aligned\"", BreakdownMode::Aligned),
            ("\" random \"", BreakdownMode::Randomized),
            ("\"RANDOMIZED\"", BreakdownMode::Randomized),
        ] {
            assert_eq!(serde_json::from_str::<BreakdownMode>(raw).unwrap(), expected);
        }
        assert!(serde_json::from_str::<BreakdownMode>("\"phonetic\"").is_err());
        assert_eq!(
            serde_json::to_string(&BreakdownMode::Aligned).unwrap(),
            "\"aligned\""
        );
    }

    #[test]
    fn test_randomized_one_entry_per_unit_in_order() {
        let phonemes = units(&["ko", "n", "ni", "chi", "wa"]);
        let mut rng = RandomFraction(StdRng::seed_from_u64(7));
        let scores = randomized_breakdown(&phonemes, "konbanwa", &mut rng);

        assert_eq!(scores.len(), phonemes.len());
        for (score, unit) in scores.iter().zip(&phonemes) {
            assert_eq!(&score.unit, unit);
            assert!(score.score <= 100);
            assert_eq!(score.tier, Tier::from_score(score.score));
        }
    }

    #[test]
    fn test_randomized_empty_units() {
        let mut source = MockFractionSource::new();
        source.expect_next_fraction().times(0);
        assert!(randomized_breakdown(&[], "konnichiwa", &mut source).is_empty());
    }

    #[test]
    fn test_randomized_draws_once_per_unit() {
        let mut source = MockFractionSource::new();
        source.expect_next_fraction().times(3).returning(|| 0.5);
        let scores = randomized_breakdown(&units(&["a", "b", "c"]), "", &mut source);
        assert_eq!(scores.len(), 3);
    }

    #[test]
    fn test_randomized_base_range_without_containment() {
        let phonemes = units(&["su"]);
        assert_eq!(randomized_breakdown(&phonemes, "xyz", &mut fixed(0.0))[0].score, 70);
        assert_eq!(randomized_breakdown(&phonemes, "xyz", &mut fixed(0.5))[0].score, 85);
        assert_eq!(randomized_breakdown(&phonemes, "xyz", &mut fixed(0.999))[0].score, 100);
    }

    #[test]
    fn test_randomized_containment_adds_exact_bonus() {
        let phonemes = units(&["ri"]);
        let without = randomized_breakdown(&phonemes, "xyz", &mut fixed(0.2))[0].score;
        let with = randomized_breakdown(&phonemes, "arigatou", &mut fixed(0.2))[0].score;

        assert_eq!(without, 76);
        assert_eq!(with, without + 15);
    }

    #[test]
    fn test_randomized_containment_capped_at_100() {
        let phonemes = units(&["ri"]);
        let scores = randomized_breakdown(&phonemes, "arigatou", &mut fixed(0.9));
        assert_eq!(scores[0].score, 100);
        assert_eq!(scores[0].tier, Tier::Good);
    }

    #[test]
    fn test_randomized_containment_is_case_sensitive() {
        let phonemes = units(&["ko"]);
        let scores = randomized_breakdown(&phonemes, "KONNICHIWA", &mut fixed(0.0));
        assert_eq!(scores[0].score, 70);
    }

    #[test]
    fn test_randomized_contained_units_never_poor() {
        let phonemes = units(&["ko", "n", "ni", "chi", "wa"]);
        for seed in 0..50 {
            let mut rng = RandomFraction(StdRng::seed_from_u64(seed));
            for score in randomized_breakdown(&phonemes, "konnichiwa", &mut rng) {
                assert!(score.score >= 85, "seed {seed}: {score:?}");
                assert_eq!(score.tier, Tier::Good);
            }
        }
    }

    #[test]
    fn test_randomized_seeded_is_reproducible() {
        let phonemes = units(&["a", "ri", "ga", "to", "u"]);
        let first = randomized_breakdown(
            &phonemes,
            "arigato",
            &mut RandomFraction(StdRng::seed_from_u64(42)),
        );
        let second = randomized_breakdown(
            &phonemes,
            "arigato",
            &mut RandomFraction(StdRng::seed_from_u64(42)),
        );
        assert_eq!(first, second);
    }

    #[test]
    fn test_aligned_exact_transcript() {
        let phonemes = units(&["ko", "n", "ni", "chi", "wa"]);
        let scores = aligned_breakdown(&phonemes, "konnichiwa");

        assert_eq!(scores.len(), 5);
        assert!(scores.iter().all(|s| s.score == 100 && s.tier == Tier::Good));
    }

    #[test]
    fn test_aligned_missing_final_unit() {
        let phonemes = units(&["a", "ri", "ga", "to", "u"]);
        let scores = aligned_breakdown(&phonemes, "arigato");

        let values: Vec<u8> = scores.iter().map(|s| s.score).collect();
        assert_eq!(values, vec![100, 100, 100, 100, 0]);
        assert_eq!(scores[4].tier, Tier::Poor);
    }

    #[test]
    fn test_aligned_normalizes_transcript() {
        let phonemes = units(&["ko", "n", "ni", "chi", "wa"]);
        let scores = aligned_breakdown(&phonemes, "Kon Nichi Wa");
        assert!(scores.iter().all(|s| s.score == 100));
    }

    #[test]
    fn test_aligned_partial_match() {
        // "shi" heard as "si"
        let scores = aligned_breakdown(&units(&["shi"]), "si");
        assert_eq!(scores[0].score, 67);
        assert_eq!(scores[0].tier, Tier::Poor);
    }

    #[test]
    fn test_aligned_empty_candidate() {
        let scores = aligned_breakdown(&units(&["o", "ha", "you"]), "");
        assert!(scores.iter().all(|s| s.score == 0));
    }

    #[test]
    fn test_aligned_empty_unit_is_perfect() {
        let scores = aligned_breakdown(&units(&[" "]), "abc");
        assert_eq!(scores[0].score, 100);
    }

    #[test]
    fn test_aligned_is_deterministic() {
        let phonemes = units(&["sa", "you", "na", "ra"]);
        assert_eq!(
            aligned_breakdown(&phonemes, "sayonara"),
            aligned_breakdown(&phonemes, "sayonara")
        );
    }

    #[test]
    fn test_aligned_empty_units() {
        assert!(aligned_breakdown(&[], "anything").is_empty());
    }
}
