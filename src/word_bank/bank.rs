use std::{collections::HashMap, path::Path};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::word::ReferenceWord;
use crate::errors::{HatsuonError, Result};

static BUILTIN_WORDS: Lazy<Vec<ReferenceWord>> = Lazy::new(|| {
    vec![
        ReferenceWord::new("konnichiwa", "konnichiwa", &["ko", "n", "ni", "chi", "wa"])
            .with_kana("こんにちは")
            .with_meaning("hello"),
        ReferenceWord::new("arigatou", "arigatou", &["a", "ri", "ga", "to", "u"])
            .with_kana("ありがとう")
            .with_meaning("thank you"),
        ReferenceWord::new("sayounara", "sayounara", &["sa", "yo", "u", "na", "ra"])
            .with_kana("さようなら")
            .with_meaning("goodbye"),
        ReferenceWord::new("ohayou", "ohayou", &["o", "ha", "yo", "u"])
            .with_kana("おはよう")
            .with_meaning("good morning"),
        ReferenceWord::new("sumimasen", "sumimasen", &["su", "mi", "ma", "se", "n"])
            .with_kana("すみません")
            .with_meaning("excuse me"),
        ReferenceWord::new("oyasumi", "oyasumi", &["o", "ya", "su", "mi"])
            .with_kana("おやすみ")
            .with_meaning("good night"),
        ReferenceWord::new("itadakimasu", "itadakimasu", &["i", "ta", "da", "ki", "ma", "su"])
            .with_kana("いただきます")
            .with_meaning("said before eating"),
        ReferenceWord::new("gochisousama", "gochisousama", &["go", "chi", "so", "u", "sa", "ma"])
            .with_kana("ごちそうさま")
            .with_meaning("said after eating"),
        ReferenceWord::new("hajimemashite", "hajimemashite", &["ha", "ji", "me", "ma", "shi", "te"])
            .with_kana("はじめまして")
            .with_meaning("nice to meet you"),
        ReferenceWord::new("sensei", "sensei", &["se", "n", "se", "i"])
            .with_kana("せんせい")
            .with_meaning("teacher"),
    ]
});

/// On-disk layout of a word bank file
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WordBankFile {
    pub words: Vec<ReferenceWord>,
}

/// Validated, id-indexed collection of reference words
#[derive(Clone, Debug)]
pub struct WordBank {
    words: Vec<ReferenceWord>,
    index: HashMap<String, usize>,
}

impl WordBank {
    /// Build a bank, rejecting invalid words and duplicate ids.
    pub fn from_words(words: Vec<ReferenceWord>) -> Result<Self> {
        let mut index = HashMap::with_capacity(words.len());

        for (position, word) in words.iter().enumerate() {
            word.validate()?;

            if index.insert(word.id.clone(), position).is_some() {
                return Err(HatsuonError::word_bank(format!(
                    "duplicate word id {:?}",
                    word.id
                )));
            }
        }

        Ok(Self { words, index })
    }

    /// The default greeting vocabulary.
    pub fn builtin() -> Self {
        let words = BUILTIN_WORDS.clone();
        let index = words
            .iter()
            .enumerate()
            .map(|(position, word)| (word.id.clone(), position))
            .collect();
        Self { words, index }
    }

    /// Load a bank from disk. `.json` files are read as JSON, anything
    /// else as TOML.
    #[tracing::instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        let file: WordBankFile = match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => serde_json::from_str(&contents)?,
            _ => toml::from_str(&contents)?,
        };

        let bank = Self::from_words(file.words)?;
        info!(words = bank.len(), "Loaded word bank");
        Ok(bank)
    }

    pub fn get(&self, id: &str) -> Result<&ReferenceWord> {
        self.index
            .get(id)
            .map(|&position| &self.words[position])
            .ok_or_else(|| HatsuonError::unknown_word(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReferenceWord> {
        self.words.iter()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for WordBank {
    fn default() -> Self {
        Self::builtin()
    }
}
