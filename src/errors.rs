/// Custom error types for the hatsuon crate
///
/// Scoring itself is total and never returns these; they cover the
/// configuration, word bank and command-line surfaces around it.
#[derive(Debug, thiserror::Error)]
pub enum HatsuonError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Word bank error: {0}")]
    WordBank(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown word: {id}")]
    UnknownWord { id: String },

    #[error("Text too long (max {max_length} characters)")]
    TextTooLong { max_length: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl HatsuonError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn word_bank(message: impl Into<String>) -> Self {
        Self::WordBank(message.into())
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn unknown_word(id: impl Into<String>) -> Self {
        Self::UnknownWord { id: id.into() }
    }

    pub fn text_too_long(max_length: usize) -> Self {
        Self::TextTooLong { max_length }
    }

    pub fn invalid_env_var(var_name: &str, value: &str) -> Self {
        Self::Config(format!(
            "Invalid value for environment variable {}: {:?}",
            var_name, value
        ))
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, HatsuonError>;

/// Input validation functions
pub mod validation {
    use super::*;

    /// Validate a word bank identifier
    pub fn validate_word_id(id: &str) -> Result<()> {
        if id.trim().is_empty() {
            return Err(HatsuonError::invalid_input("Word id cannot be empty"));
        }

        if id.chars().count() > constants::MAX_WORD_ID_LENGTH {
            return Err(HatsuonError::invalid_input(format!(
                "Word id too long (max {} characters)",
                constants::MAX_WORD_ID_LENGTH
            )));
        }

        if !id.chars().all(|c| c.is_alphanumeric() || "_-".contains(c)) {
            return Err(HatsuonError::invalid_input(format!(
                "Word id {:?} contains invalid characters (only alphanumeric, hyphens, and underscores allowed)",
                id
            )));
        }

        Ok(())
    }

    /// Validate the full reference text of a word
    pub fn validate_reference_text(text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Err(HatsuonError::invalid_input("Reference text cannot be empty"));
        }

        if text.chars().count() > constants::MAX_REFERENCE_TEXT_LENGTH {
            return Err(HatsuonError::text_too_long(
                constants::MAX_REFERENCE_TEXT_LENGTH,
            ));
        }

        Ok(())
    }

    /// Validate the phoneme segmentation of a word
    pub fn validate_phonemes(phonemes: &[String]) -> Result<()> {
        if phonemes.is_empty() {
            return Err(HatsuonError::invalid_input(
                "A word needs at least one phoneme",
            ));
        }

        for (index, phoneme) in phonemes.iter().enumerate() {
            if phoneme.trim().is_empty() {
                return Err(HatsuonError::invalid_input(format!(
                    "Phoneme #{} is empty",
                    index
                )));
            }

            if phoneme.chars().count() > constants::MAX_PHONEME_LENGTH {
                return Err(HatsuonError::invalid_input(format!(
                    "Phoneme {:?} too long (max {} characters)",
                    phoneme,
                    constants::MAX_PHONEME_LENGTH
                )));
            }
        }

        Ok(())
    }

    /// Validate a transcribed candidate read from the command line
    pub fn validate_candidate_text(text: &str) -> Result<()> {
        if text.chars().count() > constants::MAX_CANDIDATE_TEXT_LENGTH {
            return Err(HatsuonError::text_too_long(
                constants::MAX_CANDIDATE_TEXT_LENGTH,
            ));
        }

        Ok(())
    }
}

/// Constants used throughout the crate
pub mod constants {
    // Configuration constants
    pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
    pub const CONFIG_PATH_ENV: &str = "HATSUON_CONFIG";
    pub const WORD_BANK_ENV: &str = "HATSUON_WORD_BANK";
    pub const BREAKDOWN_ENV: &str = "HATSUON_BREAKDOWN";
    pub const SEED_ENV: &str = "HATSUON_SEED";
    pub const CACHE_SIZE_ENV: &str = "HATSUON_CACHE_SIZE";
    pub const LOG_LEVEL_ENV: &str = "HATSUON_LOG_LEVEL";
    pub const OTEL_HTTP_URL_ENV: &str = "HATSUON_OTEL_HTTP_URL";

    // Cache constants
    pub const DEFAULT_CACHE_SIZE: usize = 1000;

    // Score constants
    pub const MAX_SCORE: u8 = 100;
    pub const GOOD_THRESHOLD: u8 = 85;
    pub const OKAY_THRESHOLD: u8 = 70;

    // Randomized breakdown constants
    pub const BASE_SCORE_FLOOR: f64 = 70.0;
    pub const BASE_SCORE_SPAN: f64 = 30.0;
    pub const CONTAINMENT_BONUS: f64 = 15.0;

    // Validation constants
    pub const MAX_WORD_ID_LENGTH: usize = 50;
    pub const MAX_REFERENCE_TEXT_LENGTH: usize = 200;
    pub const MAX_PHONEME_LENGTH: usize = 10;
    pub const MAX_CANDIDATE_TEXT_LENGTH: usize = 500;

    // Message constants
    pub const FEEDBACK_EXCELLENT: &str = "素晴らしい！ Excellent pronunciation!";
    pub const FEEDBACK_GOOD: &str = "いいですね！ Good, keep practicing.";
    pub const FEEDBACK_NEEDS_PRACTICE: &str = "もう一度！ This one needs more practice.";
    pub const NO_SPEECH_DETECTED: &str =
        "発音を検出できませんでした。 Could not detect pronunciation, please try again.";
}
