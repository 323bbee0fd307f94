use std::path::PathBuf;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

/// Failures while loading one of the frozen model artifacts.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Failed to read artifact {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse artifact {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid artifact {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
    #[error("Failed to load ONNX model {path}: {reason}")]
    Onnx { path: PathBuf, reason: String },
}

/// Failures raised while classifying a single text.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("Inference error: {0}")]
    Inference(String),
    #[error("Model returned no scores")]
    EmptyOutput,
    #[error("Model returned class index {index} but only {classes} classes are known")]
    UnknownClass { index: usize, classes: usize },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to open database {path}: {source}")]
    Open {
        path: PathBuf,
        source: rusqlite::Error,
    },
    #[error("Database query failed: {0}")]
    Query(#[from] rusqlite::Error),
}

/// Errors surfaced to HTTP clients.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing form field `{0}`")]
    MissingField(&'static str),
    #[error("Missing uploaded file part `{0}`")]
    MissingFile(&'static str),
    #[error("Uploaded CSV has no `{0}` column")]
    MissingColumn(&'static str),
    #[error("Uploaded CSV could not be read: {0}")]
    Csv(#[from] csv::Error),
    #[error("Upload failed: {0}")]
    Upload(String),
    #[error("Could not handle uploaded file: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Predict(#[from] PredictError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Failed to render page: {0}")]
    Template(#[from] minijinja::Error),
    #[error("Blocking task failed: {0}")]
    Blocking(#[from] actix_web::error::BlockingError),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingField(_)
            | ApiError::MissingFile(_)
            | ApiError::MissingColumn(_)
            | ApiError::Csv(_)
            | ApiError::Upload(_) => StatusCode::BAD_REQUEST,
            ApiError::Io(_)
            | ApiError::Predict(_)
            | ApiError::Store(_)
            | ApiError::Template(_)
            | ApiError::Blocking(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

/// Anything that keeps the server from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
    #[error(transparent)]
    Logging(#[from] crate::logging::LoggingError),
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}
