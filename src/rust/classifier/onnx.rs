use std::collections::HashMap;
use std::path::Path;

use log::{debug, info};
use ort::session::Session;
use ort::value::{Tensor as OrtTensor, ValueType};

use super::engine::{check_shape, InferenceEngine};
use super::error::ClassifierError;
use super::preprocess::Tensor;
use crate::runtime::{create_session_builder, RuntimeConfig};

/// Runs ONNX models through ONNX Runtime.
///
/// The model is expected to:
/// - Take one float input shaped `[batch, height, width, 3]` (batch may be dynamic)
/// - Produce the class scores as its first output, shaped `[1, K]` or `[K]`
#[derive(Debug)]
pub struct OnnxEngine {
    session: Session,
    input_name: String,
    input_dims: Option<Vec<i64>>,
}

impl OnnxEngine {
    pub fn load_with_config(model_bytes: &[u8], config: &RuntimeConfig) -> Result<Self, ClassifierError> {
        if model_bytes.is_empty() {
            return Err(ClassifierError::ModelLoadError("Model buffer is empty".into()));
        }

        let session = create_session_builder(config)?
            .commit_from_memory(model_bytes)
            .map_err(|e| ClassifierError::ModelLoadError(format!("Failed to load ONNX model: {}", e)))?;

        Self::from_session(session)
    }

    pub fn load_file<P: AsRef<Path>>(path: P, config: &RuntimeConfig) -> Result<Self, ClassifierError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ClassifierError::ModelLoadError(format!("Model file not found: {}", path.display())));
        }

        let session = create_session_builder(config)?
            .commit_from_file(path)
            .map_err(|e| ClassifierError::ModelLoadError(format!("Failed to load ONNX model: {}", e)))?;

        Self::from_session(session)
    }

    fn from_session(session: Session) -> Result<Self, ClassifierError> {
        Self::validate_model(&session)?;

        let input = &session.inputs[0];
        let input_name = input.name.clone();
        let input_dims = match &input.input_type {
            ValueType::Tensor { dimensions, .. } => Some(dimensions.clone()),
            _ => None,
        };
        info!("ONNX model loaded (input '{}', dims {:?})", input_name, input_dims);

        Ok(Self { session, input_name, input_dims })
    }

    /// Validates that the model has at least one input and one output
    fn validate_model(session: &Session) -> Result<(), ClassifierError> {
        if session.inputs.is_empty() {
            return Err(ClassifierError::ModelLoadError(
                "Model must have an image input".to_string()
            ));
        }
        if session.outputs.is_empty() {
            return Err(ClassifierError::ModelLoadError(
                "Model must have at least 1 output for class scores".to_string()
            ));
        }
        Ok(())
    }
}

impl InferenceEngine for OnnxEngine {
    fn load(model_bytes: &[u8]) -> Result<Self, ClassifierError> {
        Self::load_with_config(model_bytes, &RuntimeConfig::default())
    }

    fn infer(&self, input: Tensor) -> Result<Vec<f32>, ClassifierError> {
        if let Some(dims) = &self.input_dims {
            check_shape(dims, input.shape())?;
        }

        let input_tensor = OrtTensor::from_array(input)
            .map_err(|e| ClassifierError::InferenceError(format!("Failed to create input tensor: {}", e)))?;
        let mut input_tensors = HashMap::new();
        input_tensors.insert(self.input_name.as_str(), input_tensor);

        let outputs = self.session.run(input_tensors)
            .map_err(|e| ClassifierError::InferenceError(format!("Failed to run model: {}", e)))?;
        let output_tensor = outputs[0].try_extract_tensor::<f32>()
            .map_err(|e| ClassifierError::InferenceError(format!("Failed to extract output tensor: {}", e)))?;

        let shape = output_tensor.shape();
        debug!("Model output shape: {:?}", shape);
        let flattenable = match shape {
            [_] => true,
            [1, _] => true,
            _ => false,
        };
        if !flattenable {
            return Err(ClassifierError::shape_mismatch(&[1, -1], shape));
        }

        Ok(output_tensor.iter().copied().collect())
    }

    fn expected_input_shape(&self) -> Option<Vec<i64>> {
        self.input_dims.clone()
    }
}
