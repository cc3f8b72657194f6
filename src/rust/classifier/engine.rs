use super::error::ClassifierError;
use super::preprocess::Tensor;

/// A pre-trained model that turns an image tensor into per-class scores.
///
/// Implementations are loaded once and then only read, so a single handle can
/// serve concurrent inferences from several threads.
///
/// The contract:
/// 1. `load` deserializes a model from opaque bytes
/// 2. `infer` takes ownership of a `(1, H, W, 3)` tensor and returns the `1×K`
///    output flattened to `K` scores
/// 3. `infer` never pads or crops: a tensor whose shape disagrees with the
///    model fails with `ShapeMismatchError`
pub trait InferenceEngine: Send + Sync {
    /// Loads a serialized model.
    ///
    /// # Errors
    /// - `ModelLoadError` if the bytes are not a model this engine can run
    fn load(model_bytes: &[u8]) -> Result<Self, ClassifierError>
    where
        Self: Sized;

    /// Runs the model on one tensor. Blocks the calling thread until done.
    ///
    /// # Errors
    /// - `ShapeMismatchError` if the tensor does not fit the model's input
    /// - `InferenceError` if the model fails to run
    fn infer(&self, input: Tensor) -> Result<Vec<f32>, ClassifierError>;

    /// The input shape the model was built for, if the engine knows it.
    /// Negative entries are dynamic dimensions that accept any size.
    fn expected_input_shape(&self) -> Option<Vec<i64>> {
        None
    }
}

/// Compares a concrete shape against a model's declared one, where negative
/// declared dimensions match anything.
pub(crate) fn check_shape(expected: &[i64], actual: &[usize]) -> Result<(), ClassifierError> {
    let matches = expected.len() == actual.len()
        && expected
            .iter()
            .zip(actual)
            .all(|(&want, &got)| want < 0 || want as usize == got);

    if matches {
        Ok(())
    } else {
        Err(ClassifierError::shape_mismatch(expected, actual))
    }
}
