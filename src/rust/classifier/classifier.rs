use std::sync::Arc;

use log::debug;
use tokio::task::JoinHandle;

use super::builder::ClassifierBuilder;
use super::engine::InferenceEngine;
use super::error::ClassifierError;
use super::onnx::OnnxEngine;
use super::postprocess::{classify, top_k, Prediction};
use super::preprocess::{preprocess_with_filter, Bitmap};
use super::ClassifierInfo;
use crate::config::PipelineConfig;

/// A thread-safe image classifier: preprocess, run the engine, pick the top class.
///
/// # Thread Safety
///
/// The engine is loaded once and only read afterwards. It lives behind an `Arc`,
/// so a classifier can be shared across threads and every call works on its own
/// bitmap and tensor.
///
/// ```rust
/// use pca200::{Bitmap, ClassifierError, ImageClassifier, InferenceEngine, Tensor};
///
/// struct Constant;
///
/// impl InferenceEngine for Constant {
///     fn load(_: &[u8]) -> Result<Self, ClassifierError> { Ok(Constant) }
///     fn infer(&self, _: Tensor) -> Result<Vec<f32>, ClassifierError> {
///         Ok(vec![0.1, 0.05, 0.7, 0.15])
///     }
/// }
///
/// # fn main() -> Result<(), ClassifierError> {
/// let classifier = ImageClassifier::builder()
///     .with_engine(Constant)
///     .with_num_classes(4)
///     .build()?;
///
/// let bitmap = Bitmap::new(320, 240);
/// let prediction = classifier.classify_image(&bitmap)?;
/// assert_eq!(prediction.to_string(), "Class 2 (Confidence: 0.7)");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ImageClassifier<E> {
    pub(crate) engine: Arc<E>,
    pub(crate) config: PipelineConfig,
}

/// A classifier backed by ONNX Runtime.
pub type OnnxClassifier = ImageClassifier<OnnxEngine>;

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<OnnxClassifier>();
    }
};

impl<E: InferenceEngine> ImageClassifier<E> {
    /// Creates a new ClassifierBuilder for fluent construction
    pub fn builder() -> ClassifierBuilder<E> {
        ClassifierBuilder::new()
    }

    /// Returns information about the classifier's configuration
    pub fn info(&self) -> ClassifierInfo {
        ClassifierInfo {
            input_size: self.config.input_size,
            num_classes: self.config.num_classes,
            resize_filter: self.config.resize_filter,
            model_input_shape: self.engine.expected_input_shape(),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs the model on a bitmap and returns the raw score for every class.
    ///
    /// # Errors
    /// - `ValidationError` if the bitmap has a zero dimension
    /// - `ShapeMismatchError` if the engine rejects the tensor, or returns a
    ///   vector whose length is not `num_classes`
    /// - `InferenceError` if the engine fails
    pub fn scores(&self, bitmap: &Bitmap) -> Result<Vec<f32>, ClassifierError> {
        let tensor = preprocess_with_filter(
            bitmap,
            self.config.input_size,
            self.config.resize_filter.into(),
        )?;
        debug!(
            "Preprocessed {}x{} bitmap into tensor {:?}",
            bitmap.width(),
            bitmap.height(),
            tensor.shape()
        );

        let scores = self.engine.infer(tensor)?;
        if scores.len() != self.config.num_classes {
            return Err(ClassifierError::ShapeMismatchError {
                expected: vec![1, self.config.num_classes as i64],
                actual: vec![1, scores.len() as i64],
            });
        }
        Ok(scores)
    }

    /// Classifies a bitmap, returning the highest-scoring class.
    ///
    /// # Errors
    /// - Forwards all errors from `scores()`
    /// - `EmptyVectorError` if the output vector is empty
    pub fn classify_image(&self, bitmap: &Bitmap) -> Result<Prediction, ClassifierError> {
        let scores = self.scores(bitmap)?;
        let prediction = classify(&scores)?;
        debug!("Prediction: {}", prediction);
        Ok(prediction)
    }

    /// Returns the `k` best classes, highest score first.
    pub fn ranked(&self, bitmap: &Bitmap, k: usize) -> Result<Vec<Prediction>, ClassifierError> {
        let scores = self.scores(bitmap)?;
        top_k(&scores, k)
    }
}

impl<E: InferenceEngine + 'static> ImageClassifier<E> {
    /// Classifies a bitmap on tokio's blocking thread pool, keeping the calling
    /// task free while the model runs. Must be called from within a tokio runtime.
    pub fn spawn_classify(self: &Arc<Self>, bitmap: Bitmap) -> JoinHandle<Result<Prediction, ClassifierError>> {
        let classifier = Arc::clone(self);
        tokio::task::spawn_blocking(move || classifier.classify_image(&bitmap))
    }
}
