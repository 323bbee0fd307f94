use serde::{Deserialize, Serialize};

/// One row of `sentiment_analysis_library`. Columns are nullable in SQLite.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PredictionRecord {
    pub id: i64,
    pub text: Option<String>,
    pub sentiment: Option<String>,
    pub tipe: Option<String>,
}

/// Response of the single-text endpoints.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ManualPrediction {
    pub input: String,
    pub output: String,
}

/// Per-row response of the CSV upload endpoints.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RowPrediction {
    pub text: String,
    pub sentiment: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StatusResponse {
    pub status_code: u16,
    pub description: String,
    pub data: String,
}

#[derive(Debug, Deserialize)]
pub struct NeuralNetworkForm {
    pub manual_input_neural_network: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LstmForm {
    pub post_lstm: Option<String>,
}
