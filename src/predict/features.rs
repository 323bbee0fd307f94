use std::{collections::HashMap, fs, path::Path, sync::LazyLock};

use ndarray::Array1;
use regex::Regex;
use serde::Deserialize;

use crate::error::ArtifactError;

/// Tokens of two or more word characters, as the vectorizer was fit with.
static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("token pattern must compile"));

#[derive(Debug, Deserialize)]
struct VectorizerArtifact {
    vocabulary: HashMap<String, usize>,
    #[serde(default = "default_ngram_range")]
    ngram_range: (usize, usize),
    #[serde(default)]
    binary: bool,
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

/// Pre-fit bag-of-words encoder producing one count per vocabulary column.
#[derive(Debug, Clone)]
pub struct CountVectorizer {
    vocabulary: HashMap<String, usize>,
    ngram_range: (usize, usize),
    binary: bool,
    width: usize,
}

impl CountVectorizer {
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let bytes = fs::read(path).map_err(|source| ArtifactError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let artifact: VectorizerArtifact =
            serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        let vectorizer = Self::new(artifact.vocabulary, artifact.ngram_range, artifact.binary)
            .map_err(|reason| ArtifactError::Invalid {
                path: path.to_path_buf(),
                reason,
            })?;
        tracing::info!(
            "Loaded feature extractor {} ({} terms)",
            path.display(),
            vectorizer.vocabulary.len()
        );
        Ok(vectorizer)
    }

    pub fn new(
        vocabulary: HashMap<String, usize>,
        ngram_range: (usize, usize),
        binary: bool,
    ) -> Result<Self, String> {
        let (min_n, max_n) = ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(format!("invalid ngram_range ({min_n}, {max_n})"));
        }
        let width = vocabulary
            .values()
            .max()
            .map(|max| max + 1)
            .ok_or_else(|| "vocabulary is empty".to_string())?;
        Ok(Self {
            vocabulary,
            ngram_range,
            binary,
            width,
        })
    }

    /// Number of columns in every produced vector.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Encode already-normalized text. Unknown terms are ignored.
    pub fn transform(&self, text: &str) -> Array1<f32> {
        let mut counts = Array1::<f32>::zeros(self.width);
        let tokens: Vec<&str> = TOKEN_PATTERN.find_iter(text).map(|m| m.as_str()).collect();
        let (min_n, max_n) = self.ngram_range;
        for n in min_n..=max_n {
            for window in tokens.windows(n) {
                let term = window.join(" ");
                if let Some(&column) = self.vocabulary.get(&term) {
                    if self.binary {
                        counts[column] = 1.0;
                    } else {
                        counts[column] += 1.0;
                    }
                }
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocabulary(terms: &[(&str, usize)]) -> HashMap<String, usize> {
        terms.iter().map(|(t, i)| (t.to_string(), *i)).collect()
    }

    #[test]
    fn counts_known_terms_and_skips_short_tokens() {
        let vectorizer =
            CountVectorizer::new(vocabulary(&[("good", 0), ("movie", 2), ("bad", 1)]), (1, 1), false)
                .unwrap();
        let features = vectorizer.transform("good good a movie unknown");
        assert_eq!(features.to_vec(), vec![2.0, 0.0, 1.0]);
    }

    #[test]
    fn binary_mode_caps_counts() {
        let vectorizer = CountVectorizer::new(vocabulary(&[("good", 0)]), (1, 1), true).unwrap();
        assert_eq!(vectorizer.transform("good good good").to_vec(), vec![1.0]);
    }

    #[test]
    fn bigrams_are_joined_with_space() {
        let vectorizer = CountVectorizer::new(
            vocabulary(&[("not", 0), ("not good", 1), ("good", 2)]),
            (1, 2),
            false,
        )
        .unwrap();
        assert_eq!(vectorizer.transform("not   good").to_vec(), vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn width_follows_highest_column() {
        let vectorizer = CountVectorizer::new(vocabulary(&[("x1", 4)]), (1, 1), false).unwrap();
        assert_eq!(vectorizer.width(), 5);
        assert_eq!(vectorizer.transform("").len(), 5);
    }

    #[test]
    fn rejects_empty_vocabulary_and_bad_ranges() {
        assert!(CountVectorizer::new(HashMap::new(), (1, 1), false).is_err());
        assert!(CountVectorizer::new(vocabulary(&[("a", 0)]), (2, 1), false).is_err());
    }

    #[test]
    fn load_reads_json_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("features.json");
        fs::write(&path, r#"{"vocabulary": {"great": 1, "film": 0}}"#).unwrap();
        let vectorizer = CountVectorizer::load(&path).unwrap();
        assert_eq!(vectorizer.transform("great film").to_vec(), vec![1.0, 1.0]);
    }
}
