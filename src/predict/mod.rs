//! Prediction services wrapping the frozen NN and LSTM artifacts.
//!
//! Handlers only see [`SentimentPredictor`]; the concrete services are built
//! once at startup and injected through the application state.

mod features;
mod lstm;
mod nn;
mod onnx;
mod tokenizer;

use std::fmt;

use crate::error::PredictError;

pub use features::CountVectorizer;
pub use lstm::{pad_sequence, LstmPredictor};
pub use nn::NeuralNetworkPredictor;
pub use onnx::{OnnxClassifier, ScoreModel};
pub use tokenizer::WordTokenizer;

/// Which model produced a logged prediction; stored in the `tipe` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    NeuralNetwork,
    Lstm,
}

impl ModelKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ModelKind::NeuralNetwork => "NN",
            ModelKind::Lstm => "LSTM",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed label set of the sequence classifier, in output-column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Negative,
    Neutral,
    Positive,
}

impl Sentiment {
    pub const ORDERED: [Sentiment; 3] = [Sentiment::Negative, Sentiment::Neutral, Sentiment::Positive];

    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
            Sentiment::Positive => "positive",
        }
    }

    /// Pick the label at the arg-max of `scores`; ties go to the lowest index.
    pub fn from_scores(scores: &[f32]) -> Result<Self, PredictError> {
        let index = arg_max(scores).ok_or(PredictError::EmptyOutput)?;
        Self::ORDERED
            .get(index)
            .copied()
            .ok_or(PredictError::UnknownClass {
                index,
                classes: Self::ORDERED.len(),
            })
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A frozen model that turns raw text into a sentiment label.
pub trait SentimentPredictor: Send + Sync {
    fn kind(&self) -> ModelKind;

    fn predict(&self, text: &str) -> Result<String, PredictError>;
}

/// Index of the first maximum. NaN scores never win.
pub fn arg_max(values: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (index, &value) in values.iter().enumerate() {
        if value.is_nan() {
            continue;
        }
        match best {
            Some((_, current)) if value <= current => {}
            _ => best = Some((index, value)),
        }
    }
    best.map(|(index, _)| index)
}
