use serde::{Deserialize, Serialize};

use crate::errors::{validation, HatsuonError, Result};

/// A target word and its phoneme segmentation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReferenceWord {
    pub id: String,
    /// Full text compared against the transcript for the overall score
    pub text: String,
    pub kana: Option<String>,
    pub meaning: Option<String>,
    pub phonemes: Vec<String>,
}

impl ReferenceWord {
    pub fn new(id: impl Into<String>, text: impl Into<String>, phonemes: &[&str]) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            kana: None,
            meaning: None,
            phonemes: phonemes.iter().map(|p| p.to_string()).collect(),
        }
    }

    pub fn with_kana(mut self, kana: impl Into<String>) -> Self {
        self.kana = Some(kana.into());
        self
    }

    pub fn with_meaning(mut self, meaning: impl Into<String>) -> Self {
        self.meaning = Some(meaning.into());
        self
    }

    /// Check the word is usable for scoring. Errors name the offending word.
    pub fn validate(&self) -> Result<()> {
        validation::validate_word_id(&self.id)?;

        validation::validate_reference_text(&self.text)
            .and_then(|_| validation::validate_phonemes(&self.phonemes))
            .map_err(|e| HatsuonError::word_bank(format!("word {:?}: {}", self.id, e)))
    }
}
