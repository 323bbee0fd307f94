use super::{ModelKind, ScoreModel, Sentiment, SentimentPredictor, WordTokenizer};
use crate::{error::PredictError, normalize::normalize};

/// Fit `ids` to exactly `length` positions.
///
/// Short sequences are left-padded with zeros; long ones keep their last
/// `length` ids.
pub fn pad_sequence(ids: &[u32], length: usize) -> Vec<u32> {
    if ids.len() >= length {
        return ids[ids.len() - length..].to_vec();
    }
    let mut padded = vec![0; length - ids.len()];
    padded.extend_from_slice(ids);
    padded
}

/// Tokenizer plus sequence classifier with the fixed three-label output.
pub struct LstmPredictor<M> {
    tokenizer: WordTokenizer,
    model: M,
    sequence_length: usize,
}

impl<M: ScoreModel> LstmPredictor<M> {
    pub fn new(tokenizer: WordTokenizer, model: M) -> Self {
        let sequence_length = model.input_width();
        Self {
            tokenizer,
            model,
            sequence_length,
        }
    }

    pub fn predict_sentiment(&self, text: &str) -> Result<Sentiment, PredictError> {
        let ids = self.tokenizer.texts_to_sequence(&normalize(text));
        let padded: Vec<f32> = pad_sequence(&ids, self.sequence_length)
            .into_iter()
            .map(|id| id as f32)
            .collect();
        let scores = self.model.scores(&padded)?;
        let sentiment = Sentiment::from_scores(&scores)?;
        tracing::debug!(tokens = ids.len(), ?scores, %sentiment, "LSTM prediction");
        Ok(sentiment)
    }
}

impl<M: ScoreModel> SentimentPredictor for LstmPredictor<M> {
    fn kind(&self) -> ModelKind {
        ModelKind::Lstm
    }

    fn predict(&self, text: &str) -> Result<String, PredictError> {
        self.predict_sentiment(text).map(|s| s.as_str().to_string())
    }
}
