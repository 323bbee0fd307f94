use super::{arg_max, CountVectorizer, ModelKind, ScoreModel, SentimentPredictor};
use crate::{error::PredictError, normalize::normalize};

/// Bag-of-words features plus a frozen classifier.
///
/// Labels are whatever the classifier was trained on; `classes` lists them in
/// output-column order and is not checked against any fixed set.
pub struct NeuralNetworkPredictor<M> {
    vectorizer: CountVectorizer,
    model: M,
    classes: Vec<String>,
}

impl<M: ScoreModel> NeuralNetworkPredictor<M> {
    pub fn new(vectorizer: CountVectorizer, model: M, classes: Vec<String>) -> Self {
        Self {
            vectorizer,
            model,
            classes,
        }
    }
}

impl<M: ScoreModel> SentimentPredictor for NeuralNetworkPredictor<M> {
    fn kind(&self) -> ModelKind {
        ModelKind::NeuralNetwork
    }

    fn predict(&self, text: &str) -> Result<String, PredictError> {
        let features = self.vectorizer.transform(&normalize(text)).to_vec();
        let scores = self.model.scores(&features)?;
        let index = arg_max(&scores).ok_or(PredictError::EmptyOutput)?;
        let label = self
            .classes
            .get(index)
            .ok_or(PredictError::UnknownClass {
                index,
                classes: self.classes.len(),
            })?;
        tracing::debug!(?scores, label = %label, "NN prediction");
        Ok(label.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    /// Scores each class by the feature in the same column.
    struct Echo;

    impl ScoreModel for Echo {
        fn input_width(&self) -> usize {
            2
        }

        fn scores(&self, input: &[f32]) -> Result<Vec<f32>, PredictError> {
            Ok(input.to_vec())
        }
    }

    fn predictor(classes: &[&str]) -> NeuralNetworkPredictor<Echo> {
        let vocabulary: HashMap<String, usize> =
            [("awful".to_string(), 0), ("lovely".to_string(), 1)].into_iter().collect();
        NeuralNetworkPredictor::new(
            CountVectorizer::new(vocabulary, (1, 1), false).unwrap(),
            Echo,
            classes.iter().map(|c| c.to_string()).collect(),
        )
    }

    #[test]
    fn returns_classifier_native_label() {
        let predictor = predictor(&["neg", "pos"]);
        assert_eq!(predictor.predict("LOVELY, lovely day").unwrap(), "pos");
        assert_eq!(predictor.predict("Awful!").unwrap(), "neg");
        assert_eq!(predictor.kind(), ModelKind::NeuralNetwork);
    }

    #[test]
    fn empty_features_fall_back_to_first_class() {
        assert_eq!(predictor(&["neg", "pos"]).predict("").unwrap(), "neg");
    }

    #[test]
    fn too_few_classes_is_an_error() {
        assert!(matches!(
            predictor(&["only"]).predict("lovely"),
            Err(PredictError::UnknownClass { index: 1, classes: 1 })
        ));
    }
}
