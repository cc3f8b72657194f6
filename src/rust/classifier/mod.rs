use crate::config::ResizeFilter;

mod error;
mod engine;
mod onnx;
mod preprocess;
mod postprocess;
pub mod builder;
#[allow(clippy::module_inception)]
mod classifier;

pub use error::ClassifierError;
pub use engine::InferenceEngine;
pub use onnx::OnnxEngine;
pub use preprocess::{preprocess, preprocess_with_filter, Bitmap, Tensor};
pub use postprocess::{classify, format_prediction, top_k, Prediction};
pub use classifier::{ImageClassifier, OnnxClassifier};
pub use builder::ClassifierBuilder;

/// Information about the configuration of a classifier
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierInfo {
    /// Side length of the square model input
    pub input_size: u32,
    /// Number of classes the model scores
    pub num_classes: usize,
    /// Interpolation used when resizing
    pub resize_filter: ResizeFilter,
    /// Input shape declared by the model, if the engine exposes it
    pub model_input_shape: Option<Vec<i64>>,
}
