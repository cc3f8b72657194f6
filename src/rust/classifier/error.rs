use thiserror::Error;

use crate::assets::AssetError;

/// Represents the different types of errors that can occur while classifying an image.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// The model asset is missing, corrupt, or incompatible with the runtime
    #[error("Model load error: {0}")]
    ModelLoadError(String),
    /// The image bytes could not be decoded into a bitmap
    #[error("Image decode error: {0}")]
    ImageDecodeError(String),
    /// The image source finished without producing an image
    #[error("Image selection cancelled")]
    UserCancelled,
    /// A tensor disagrees with the shape the model expects.
    /// Negative entries in `expected` are dynamic dimensions.
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatchError { expected: Vec<i64>, actual: Vec<i64> },
    /// The model produced an output vector with no entries
    #[error("Output vector is empty")]
    EmptyVectorError,
    /// The engine failed while running the model
    #[error("Inference error: {0}")]
    InferenceError(String),
    /// Error occurred during the build phase
    #[error("Build error: {0}")]
    BuildError(String),
    /// Error occurred due to invalid input parameters
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl ClassifierError {
    /// Returns true for image source failures, after which the caller can simply
    /// ask for another image. Everything else is a startup or configuration fault.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::ImageDecodeError(_) | Self::UserCancelled)
    }

    pub(crate) fn shape_mismatch(expected: &[i64], actual: &[usize]) -> Self {
        Self::ShapeMismatchError {
            expected: expected.to_vec(),
            actual: actual.iter().map(|&d| d as i64).collect(),
        }
    }
}

impl From<image::ImageError> for ClassifierError {
    fn from(err: image::ImageError) -> Self {
        ClassifierError::ImageDecodeError(err.to_string())
    }
}

impl From<AssetError> for ClassifierError {
    fn from(err: AssetError) -> Self {
        ClassifierError::ModelLoadError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_errors() {
        assert!(ClassifierError::UserCancelled.is_recoverable());
        assert!(ClassifierError::ImageDecodeError("bad png".into()).is_recoverable());
        assert!(!ClassifierError::EmptyVectorError.is_recoverable());
        assert!(!ClassifierError::ModelLoadError("missing".into()).is_recoverable());
    }

    #[test]
    fn test_shape_mismatch_display() {
        let err = ClassifierError::shape_mismatch(&[1, 224, 224, 3], &[1, 112, 112, 3]);
        assert_eq!(
            err.to_string(),
            "Shape mismatch: expected [1, 224, 224, 3], got [1, 112, 112, 3]"
        );
    }
}
