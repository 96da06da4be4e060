use serde::Serialize;
use tracing::warn;

use crate::{
    errors::{constants::NO_SPEECH_DETECTED, validation, HatsuonError},
    scoring::{result::ScoreResult, scorer::SimilarityScorer},
    word_bank::WordBank,
};

/// One output line of the scoring session
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Reply {
    Scored {
        word: String,
        #[serde(flatten)]
        result: ScoreResult,
        message: &'static str,
    },
    Failed {
        word: String,
        error: String,
    },
}

/// Handle one `<word-id> <transcript>` input line.
///
/// Blank lines produce nothing. A line with no transcript means speech
/// recognition heard nothing, so the scorer is not called.
pub fn handle_line(scorer: &SimilarityScorer, bank: &WordBank, line: &str) -> Option<Reply> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let (id, candidate) = match line.split_once(char::is_whitespace) {
        Some((id, rest)) => (id, rest.trim()),
        None => (line, ""),
    };

    let failed = |error: String| Reply::Failed {
        word: id.to_string(),
        error,
    };

    if candidate.is_empty() {
        warn!(word = id, "No transcript for attempt");
        return Some(failed(NO_SPEECH_DETECTED.to_string()));
    }

    if let Err(e) = validation::validate_candidate_text(candidate) {
        warn!(word = id, error = %e, "Rejected transcript");
        return Some(failed(e.to_string()));
    }

    let word = match bank.get(id) {
        Ok(word) => word,
        Err(e) => {
            warn!(word = id, "Unknown word requested");
            return Some(failed(e.to_string()));
        }
    };

    let result = scorer.score_attempt(word, candidate);
    Some(Reply::Scored {
        word: word.id.clone(),
        message: result.feedback.message(),
        result,
    })
}

/// Handle one raw input line as read from stdin.
///
/// Input that is not valid UTF-8 gets an error reply for that line only.
pub fn handle_bytes(scorer: &SimilarityScorer, bank: &WordBank, line: &[u8]) -> Option<Reply> {
    match std::str::from_utf8(line) {
        Ok(line) => handle_line(scorer, bank, line),
        Err(e) => {
            let lossy = String::from_utf8_lossy(line);
            let id = lossy.split_whitespace().next().unwrap_or_default();
            warn!(word = id, error = %e, "Undecodable input line");
            Some(Reply::Failed {
                word: id.to_string(),
                error: HatsuonError::invalid_input("transcript is not valid UTF-8").to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        errors::constants::{FEEDBACK_EXCELLENT, MAX_CANDIDATE_TEXT_LENGTH},
        scoring::breakdown::BreakdownMode,
    };

    fn scorer() -> SimilarityScorer {
        SimilarityScorer::new(BreakdownMode::Aligned, None, 8)
    }

    #[test]
    fn test_blank_line_is_ignored() {
        let bank = WordBank::builtin();
        assert_eq!(handle_line(&scorer(), &bank, ""), None);
        assert_eq!(handle_line(&scorer(), &bank, "   \t"), None);
    }

    #[test]
    fn test_scored_line() {
        let bank = WordBank::builtin();
        let reply = handle_line(&scorer(), &bank, "arigatou  ari gato ").unwrap();

        match reply {
            Reply::Scored {
                word,
                result,
                message,
            } => {
                assert_eq!(word, "arigatou");
                assert_eq!(result.overall_score, 88);
                assert_eq!(result.per_unit_scores.len(), 5);
                assert_eq!(message, FEEDBACK_EXCELLENT);
            }
            other => panic!("Expected scored reply, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_transcript_skips_scoring() {
        let bank = WordBank::builtin();
        let scorer = scorer();
        let reply = handle_line(&scorer, &bank, "konnichiwa").unwrap();

        assert_eq!(
            reply,
            Reply::Failed {
                word: "konnichiwa".to_string(),
                error: NO_SPEECH_DETECTED.to_string(),
            }
        );
        assert_eq!(scorer.metrics().get_stats().attempts_scored, 0);
    }

    #[test]
    fn test_unknown_word() {
        let bank = WordBank::builtin();
        let reply = handle_line(&scorer(), &bank, "konbanwa konbanwa").unwrap();

        assert!(matches!(reply, Reply::Failed { ref error, .. } if error == "Unknown word: konbanwa"));
    }

    #[test]
    fn test_overlong_transcript() {
        let bank = WordBank::builtin();
        let line = format!("sensei {}", "a".repeat(MAX_CANDIDATE_TEXT_LENGTH + 1));
        let reply = handle_line(&scorer(), &bank, &line).unwrap();

        assert!(matches!(reply, Reply::Failed { .. }));
    }

    #[test]
    fn test_invalid_utf8_line_fails_alone() {
        let bank = WordBank::builtin();
        let scorer = scorer();

        let reply = handle_bytes(&scorer, &bank, b"arigatou ari\xffgato\n").unwrap();
        assert_eq!(
            reply,
            Reply::Failed {
                word: "arigatou".to_string(),
                error: "Invalid input: transcript is not valid UTF-8".to_string(),
            }
        );
        assert_eq!(scorer.metrics().get_stats().attempts_scored, 0);

        let next = handle_bytes(&scorer, &bank, b"sensei sensei\n").unwrap();
        assert!(matches!(next, Reply::Scored { ref word, .. } if word == "sensei"));
    }

    #[test]
    fn test_replacement_character_is_scored_as_text() {
        let bank = WordBank::builtin();
        let line = "arigatou ari\u{FFFD}gato".as_bytes();
        let reply = handle_bytes(&scorer(), &bank, line).unwrap();

        match reply {
            // one extra char plus the missing final "u": (8 - 2) / 8
            Reply::Scored { result, .. } => assert_eq!(result.overall_score, 75),
            other => panic!("Expected scored reply, got {:?}", other),
        }
    }

    #[test]
    fn test_bytes_blank_line_is_ignored() {
        let bank = WordBank::builtin();
        assert_eq!(handle_bytes(&scorer(), &bank, b"\r\n"), None);
    }

    #[test]
    fn test_reply_serialization() {
        let bank = WordBank::builtin();
        let reply = handle_line(&scorer(), &bank, "konnichiwa konnichiwa").unwrap();
        let json = serde_json::to_value(&reply).unwrap();

        assert_eq!(json["word"], "konnichiwa");
        assert_eq!(json["overall_score"], 100);
        assert_eq!(json["feedback"], "excellent");
        assert_eq!(json["per_unit_scores"].as_array().unwrap().len(), 5);
        assert!(json.get("error").is_none());

        let failed = handle_line(&scorer(), &bank, "konnichiwa").unwrap();
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["error"], NO_SPEECH_DETECTED);
    }
}
