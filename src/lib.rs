pub mod config;
pub mod docs;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod models;
pub mod normalize;
pub mod page;
pub mod predict;
pub mod store;
pub mod upload;

use std::sync::Arc;

use config::Config;
use error::StartupError;
use handlers::AppState;
use predict::{
    CountVectorizer, LstmPredictor, NeuralNetworkPredictor, OnnxClassifier, WordTokenizer,
};
use store::Store;

/// Load every artifact named in `config` and open the database once.
///
/// Any failure here is fatal: the server never starts without both models.
pub fn build_state(config: &Config) -> Result<AppState, StartupError> {
    let models = &config.models;

    let vectorizer = CountVectorizer::load(&models.feature_extractor)?;
    let nn_model = OnnxClassifier::load(&models.nn_classifier, vectorizer.width())?;
    let neural_network =
        NeuralNetworkPredictor::new(vectorizer, nn_model, models.nn_classes.clone());

    let tokenizer = WordTokenizer::load(&models.tokenizer)?;
    let lstm_model = OnnxClassifier::load(&models.lstm_classifier, models.sequence_length)?;
    let lstm = LstmPredictor::new(tokenizer, lstm_model);

    let store = Store::new(&config.database.path);
    store.connect()?;
    tracing::info!("Prediction log at {}", store.path().display());

    Ok(AppState {
        store,
        neural_network: Arc::new(neural_network),
        lstm: Arc::new(lstm),
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use error::ArtifactError;

    #[test]
    fn missing_feature_extractor_stops_startup() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.models.feature_extractor = dir.path().join("missing.json");
        config.database.path = dir.path().join("sql.db");

        let err = build_state(&config).err().unwrap();
        assert!(matches!(
            err,
            StartupError::Artifact(ArtifactError::Read { ref path, .. })
                if path.ends_with("missing.json")
        ));
    }

    #[test]
    fn corrupt_feature_extractor_stops_startup() {
        let dir = tempfile::tempdir().unwrap();
        let features = dir.path().join("features.json");
        fs::write(&features, "not json").unwrap();
        let mut config = Config::default();
        config.models.feature_extractor = features;

        assert!(matches!(
            build_state(&config).err(),
            Some(StartupError::Artifact(ArtifactError::Parse { .. }))
        ));
    }

    #[test]
    fn non_onnx_classifier_stops_startup() {
        let dir = tempfile::tempdir().unwrap();
        let features = dir.path().join("features.json");
        fs::write(&features, r#"{"vocabulary": {"good": 0, "bad": 1}}"#).unwrap();
        let classifier = dir.path().join("model_nn.onnx");
        fs::write(&classifier, "not an onnx model").unwrap();

        let mut config = Config::default();
        config.models.feature_extractor = features;
        config.models.nn_classifier = classifier;
        config.database.path = dir.path().join("sql.db");

        assert!(matches!(
            build_state(&config).err(),
            Some(StartupError::Artifact(ArtifactError::Onnx { .. }))
        ));
        assert!(!dir.path().join("sql.db").exists());
    }
}
