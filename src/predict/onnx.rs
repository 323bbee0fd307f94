use std::path::Path;

use tract_onnx::prelude::*;

use crate::error::{ArtifactError, PredictError};

/// A frozen classifier mapping a fixed-width f32 row to one score per class.
pub trait ScoreModel: Send + Sync {
    fn input_width(&self) -> usize;

    fn scores(&self, input: &[f32]) -> Result<Vec<f32>, PredictError>;
}

/// ONNX graph compiled with tract for a `[1, width]` f32 input.
pub struct OnnxClassifier {
    plan: TypedRunnableModel<TypedModel>,
    width: usize,
}

impl OnnxClassifier {
    pub fn load(path: &Path, width: usize) -> Result<Self, ArtifactError> {
        let onnx_error = |e: TractError| ArtifactError::Onnx {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };
        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .map_err(onnx_error)?
            .with_input_fact(0, f32::fact([1, width]).into())
            .map_err(onnx_error)?
            .into_optimized()
            .map_err(onnx_error)?
            .into_runnable()
            .map_err(onnx_error)?;
        tracing::info!("Loaded ONNX model {} (input width {})", path.display(), width);
        Ok(Self { plan, width })
    }
}

impl ScoreModel for OnnxClassifier {
    fn input_width(&self) -> usize {
        self.width
    }

    fn scores(&self, input: &[f32]) -> Result<Vec<f32>, PredictError> {
        if input.len() != self.width {
            return Err(PredictError::Inference(format!(
                "expected {} input values, got {}",
                self.width,
                input.len()
            )));
        }
        let tensor = tract_ndarray::Array2::from_shape_vec((1, self.width), input.to_vec())
            .map_err(|e| PredictError::Inference(e.to_string()))?
            .into_tensor();

        let outputs = self
            .plan
            .run(tvec!(tensor.into()))
            .map_err(|e| PredictError::Inference(e.to_string()))?;
        let first = outputs.first().ok_or(PredictError::EmptyOutput)?;
        let view = first
            .to_array_view::<f32>()
            .map_err(|e| PredictError::Inference(e.to_string()))?;
        Ok(view.iter().copied().collect())
    }
}
