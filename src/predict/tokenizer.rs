use std::{collections::HashMap, fs, path::Path};

use serde::Deserialize;

use crate::error::ArtifactError;

/// Characters stripped by the tokenizer unless the artifact overrides them.
const DEFAULT_FILTERS: &str = "!\"#$%&()*+,-./:;<=>?@[\\]^_`{|}~\t\n";
const DEFAULT_SPLIT: &str = " ";

/// Artifact layouts accepted on disk.
///
/// The nested layout is what the training side serializes with `to_json()`:
/// `word_index` is itself a JSON document stored as a string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TokenizerArtifact {
    Nested { config: NestedConfig },
    Flat(TokenizerConfig<HashMap<String, u32>>),
}

type NestedConfig = TokenizerConfig<String>;

#[derive(Debug, Deserialize)]
struct TokenizerConfig<W> {
    word_index: W,
    #[serde(default)]
    num_words: Option<usize>,
    #[serde(default)]
    oov_token: Option<String>,
    #[serde(default)]
    filters: Option<String>,
    #[serde(default)]
    lower: Option<bool>,
    #[serde(default)]
    split: Option<String>,
}

/// Pre-fit word-index tokenizer used by the sequence model.
#[derive(Debug, Clone)]
pub struct WordTokenizer {
    word_index: HashMap<String, u32>,
    num_words: Option<usize>,
    oov_index: Option<u32>,
    filters: String,
    lower: bool,
    split: String,
}

impl WordTokenizer {
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let bytes = fs::read(path).map_err(|source| ArtifactError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let parse_error = |source| ArtifactError::Parse {
            path: path.to_path_buf(),
            source,
        };
        let artifact: TokenizerArtifact = serde_json::from_slice(&bytes).map_err(parse_error)?;
        let config = match artifact {
            TokenizerArtifact::Flat(config) => config,
            TokenizerArtifact::Nested { config } => {
                let word_index: HashMap<String, u32> =
                    serde_json::from_str(&config.word_index).map_err(parse_error)?;
                TokenizerConfig {
                    word_index,
                    num_words: config.num_words,
                    oov_token: config.oov_token,
                    filters: config.filters,
                    lower: config.lower,
                    split: config.split,
                }
            }
        };
        let tokenizer = Self::from_config(config).map_err(|reason| ArtifactError::Invalid {
            path: path.to_path_buf(),
            reason,
        })?;
        tracing::info!(
            "Loaded tokenizer {} ({} words)",
            path.display(),
            tokenizer.word_index.len()
        );
        Ok(tokenizer)
    }

    /// Tokenizer with the default filters, lower-casing and space splitting.
    pub fn new(word_index: HashMap<String, u32>, oov_token: Option<&str>) -> Result<Self, String> {
        Self::from_config(TokenizerConfig {
            word_index,
            num_words: None,
            oov_token: oov_token.map(String::from),
            filters: None,
            lower: None,
            split: None,
        })
    }

    fn from_config(config: TokenizerConfig<HashMap<String, u32>>) -> Result<Self, String> {
        let split = config.split.unwrap_or_else(|| DEFAULT_SPLIT.to_string());
        if split.is_empty() {
            return Err("split separator must not be empty".to_string());
        }
        let oov_index = match &config.oov_token {
            Some(token) => Some(
                *config
                    .word_index
                    .get(token)
                    .ok_or_else(|| format!("oov_token {token:?} missing from word_index"))?,
            ),
            None => None,
        };
        Ok(Self {
            word_index: config.word_index,
            num_words: config.num_words.filter(|&n| n > 0),
            oov_index,
            filters: config.filters.unwrap_or_else(|| DEFAULT_FILTERS.to_string()),
            lower: config.lower.unwrap_or(true),
            split,
        })
    }

    /// Map text to vocabulary ids, dropping or OOV-mapping unknown words.
    pub fn texts_to_sequence(&self, text: &str) -> Vec<u32> {
        let text = if self.lower {
            text.to_lowercase()
        } else {
            text.to_string()
        };
        let filtered: String = text
            .chars()
            .map(|c| {
                if self.filters.contains(c) {
                    self.split.clone()
                } else {
                    c.to_string()
                }
            })
            .collect();

        filtered
            .split(self.split.as_str())
            .filter(|word| !word.is_empty())
            .filter_map(|word| match self.word_index.get(word) {
                Some(&index) if self.num_words.is_some_and(|n| index as usize >= n) => {
                    self.oov_index
                }
                Some(&index) => Some(index),
                None => self.oov_index,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(words: &[(&str, u32)]) -> HashMap<String, u32> {
        words.iter().map(|(w, i)| (w.to_string(), *i)).collect()
    }

    #[test]
    fn known_words_map_in_order() {
        let tokenizer = WordTokenizer::new(index(&[("good", 1), ("movie", 2)]), None).unwrap();
        assert_eq!(tokenizer.texts_to_sequence("good   movie good"), vec![1, 2, 1]);
    }

    #[test]
    fn unknown_words_drop_without_oov_token() {
        let tokenizer = WordTokenizer::new(index(&[("good", 1)]), None).unwrap();
        assert_eq!(tokenizer.texts_to_sequence("very good film"), vec![1]);
    }

    #[test]
    fn unknown_words_use_oov_index_when_configured() {
        let tokenizer =
            WordTokenizer::new(index(&[("<OOV>", 1), ("good", 2)]), Some("<OOV>")).unwrap();
        assert_eq!(tokenizer.texts_to_sequence("very good"), vec![1, 2]);
    }

    #[test]
    fn filters_and_case_are_applied() {
        let tokenizer = WordTokenizer::new(index(&[("good", 1), ("movie", 2)]), None).unwrap();
        assert_eq!(tokenizer.texts_to_sequence("GOOD,movie!"), vec![1, 2]);
    }

    #[test]
    fn rare_words_beyond_num_words_are_dropped() {
        let tokenizer = WordTokenizer::from_config(TokenizerConfig {
            word_index: index(&[("common", 1), ("rare", 5)]),
            num_words: Some(3),
            oov_token: None,
            filters: None,
            lower: None,
            split: None,
        })
        .unwrap();
        assert_eq!(tokenizer.texts_to_sequence("rare common"), vec![1]);
    }

    #[test]
    fn missing_oov_entry_is_rejected() {
        assert!(WordTokenizer::new(index(&[("good", 1)]), Some("<OOV>")).is_err());
    }

    #[test]
    fn loads_flat_and_nested_layouts() {
        let dir = tempfile::tempdir().unwrap();

        let flat = dir.path().join("flat.json");
        fs::write(&flat, r#"{"word_index": {"good": 1, "bad": 2}}"#).unwrap();
        let tokenizer = WordTokenizer::load(&flat).unwrap();
        assert_eq!(tokenizer.texts_to_sequence("bad good"), vec![2, 1]);

        let nested = dir.path().join("nested.json");
        fs::write(
            &nested,
            r#"{"class_name": "Tokenizer", "config": {"num_words": null, "oov_token": null,
                "lower": true, "split": " ", "word_index": "{\"good\": 1, \"bad\": 2}"}}"#,
        )
        .unwrap();
        let tokenizer = WordTokenizer::load(&nested).unwrap();
        assert_eq!(tokenizer.texts_to_sequence("good bad"), vec![1, 2]);
    }

    #[test]
    fn nested_layout_is_keyed_by_config_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bare.json");
        fs::write(&path, r#"{"config": {"word_index": "{\"fine\": 4}"}}"#).unwrap();
        let tokenizer = WordTokenizer::load(&path).unwrap();
        assert_eq!(tokenizer.texts_to_sequence("fine"), vec![4]);
    }
}
