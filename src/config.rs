//! Server configuration loaded from a TOML file.
//!
//! The file is looked up at `$SENTIMENT_CONFIG`, then `config.toml` in the
//! working directory. When neither exists the built-in defaults are used, which
//! match the original deployment layout (`sql.db`, artifacts under `static/`).

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "SENTIMENT_CONFIG";
/// Default filename used when no explicit path is given.
pub const CONFIG_FILE_NAME: &str = "config.toml";
/// Number of token positions fed to the sequence classifier.
pub const DEFAULT_SEQUENCE_LENGTH: usize = 100;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Invalid config value: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub models: ModelSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Worker count; `None` lets actix pick one per core.
    #[serde(default)]
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "default_database_path")]
    pub path: PathBuf,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

/// Locations of the frozen artifacts and the parameters they were fit with.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelSettings {
    #[serde(default = "default_feature_extractor")]
    pub feature_extractor: PathBuf,
    #[serde(default = "default_nn_classifier")]
    pub nn_classifier: PathBuf,
    /// Labels of the NN classifier's output columns, in column order.
    #[serde(default = "default_nn_classes")]
    pub nn_classes: Vec<String>,
    #[serde(default = "default_tokenizer")]
    pub tokenizer: PathBuf,
    #[serde(default = "default_lstm_classifier")]
    pub lstm_classifier: PathBuf,
    #[serde(default = "default_sequence_length")]
    pub sequence_length: usize,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            feature_extractor: default_feature_extractor(),
            nn_classifier: default_nn_classifier(),
            nn_classes: default_nn_classes(),
            tokenizer: default_tokenizer(),
            lstm_classifier: default_lstm_classifier(),
            sequence_length: default_sequence_length(),
        }
    }
}

impl Config {
    /// Resolve and load the config, falling back to defaults when no file exists.
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::from_path(Path::new(&path)),
            None => {
                let path = Path::new(CONFIG_FILE_NAME);
                if path.exists() {
                    Self::from_path(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.models.sequence_length == 0 {
            return Err(ConfigError::Invalid(
                "models.sequence_length must be greater than zero".to_string(),
            ));
        }
        if self.models.nn_classes.is_empty() {
            return Err(ConfigError::Invalid(
                "models.nn_classes must list at least one label".to_string(),
            ));
        }
        if self.server.workers == Some(0) {
            return Err(ConfigError::Invalid(
                "server.workers must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.server.host.clone(), self.server.port)
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_database_path() -> PathBuf {
    PathBuf::from("sql.db")
}

fn default_feature_extractor() -> PathBuf {
    PathBuf::from("static/feature_nn.json")
}

fn default_nn_classifier() -> PathBuf {
    PathBuf::from("static/model_nn.onnx")
}

fn default_nn_classes() -> Vec<String> {
    ["negative", "neutral", "positive"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_tokenizer() -> PathBuf {
    PathBuf::from("static/tokenizer_lstm.json")
}

fn default_lstm_classifier() -> PathBuf {
    PathBuf::from("static/model_lstm.onnx")
}

fn default_sequence_length() -> usize {
    DEFAULT_SEQUENCE_LENGTH
}
