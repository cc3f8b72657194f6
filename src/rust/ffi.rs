//! C ABI for hosting the classifier inside a mobile app.
//!
//! The host owns the UI and the image picker; it hands over model bytes once,
//! then raw RGBA pixels per image. `build.rs` writes the matching `pca200.h`.

use std::panic::{self, AssertUnwindSafe};
use std::slice;

use log::error;

use crate::classifier::{ClassifierError, ImageClassifier, InferenceEngine, OnnxClassifier, Prediction};
use crate::image_source::bitmap_from_rgba;

/// Outcome of an FFI call. Every [`ClassifierError`] variant has its own code.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pca200Status {
    Ok = 0,
    InvalidArgument = 1,
    ModelLoad = 2,
    ImageDecode = 3,
    UserCancelled = 4,
    ShapeMismatch = 5,
    EmptyVector = 6,
    Inference = 7,
    Build = 8,
    /// A panic was caught at the boundary.
    Internal = 9,
}

impl From<&ClassifierError> for Pca200Status {
    fn from(err: &ClassifierError) -> Self {
        match err {
            ClassifierError::ModelLoadError(_) => Self::ModelLoad,
            ClassifierError::ImageDecodeError(_) => Self::ImageDecode,
            ClassifierError::UserCancelled => Self::UserCancelled,
            ClassifierError::ShapeMismatchError { .. } => Self::ShapeMismatch,
            ClassifierError::EmptyVectorError => Self::EmptyVector,
            ClassifierError::InferenceError(_) => Self::Inference,
            ClassifierError::BuildError(_) => Self::Build,
            ClassifierError::ValidationError(_) => Self::InvalidArgument,
        }
    }
}

/// Opaque classifier handle.
pub struct Pca200Classifier {
    inner: OnnxClassifier,
}

/// Classifies a tightly packed RGBA8 buffer with any engine.
pub(crate) fn classify_into<E: InferenceEngine>(
    classifier: &ImageClassifier<E>,
    pixels: &[u8],
    width: u32,
    height: u32,
) -> Result<Prediction, ClassifierError> {
    let bitmap = bitmap_from_rgba(width, height, pixels.to_vec())?;
    classifier.classify_image(&bitmap)
}

/// Loads an ONNX model from memory. Returns null on failure; the reason is logged.
///
/// # Safety
/// `model_ptr` must point to `model_len` readable bytes. The bytes are copied
/// into the runtime and may be freed once this returns.
#[no_mangle]
pub unsafe extern "C" fn pca200_classifier_new(
    model_ptr: *const u8,
    model_len: usize,
    input_size: u32,
    num_classes: usize,
) -> *mut Pca200Classifier {
    if model_ptr.is_null() || model_len == 0 {
        error!("pca200_classifier_new: empty model buffer");
        return std::ptr::null_mut();
    }
    let model_bytes = slice::from_raw_parts(model_ptr, model_len);

    let built = panic::catch_unwind(|| {
        OnnxClassifier::builder()
            .with_model_bytes(model_bytes)
            .and_then(|builder| {
                builder
                    .with_input_size(input_size)
                    .with_num_classes(num_classes)
                    .build()
            })
    });

    match built {
        Ok(Ok(inner)) => Box::into_raw(Box::new(Pca200Classifier { inner })),
        Ok(Err(e)) => {
            error!("pca200_classifier_new: {}", e);
            std::ptr::null_mut()
        }
        Err(_) => {
            error!("pca200_classifier_new: panicked while loading the model");
            std::ptr::null_mut()
        }
    }
}

/// Classifies one RGBA8 image of `width * height * 4` bytes.
///
/// # Safety
/// `handle` must come from [`pca200_classifier_new`] and not yet be freed.
/// `pixels` must point to `width * height * 4` readable bytes. `out_index`
/// and `out_confidence` must be valid for writes; they are left untouched
/// unless the call returns `Ok`.
#[no_mangle]
pub unsafe extern "C" fn pca200_classify_rgba(
    handle: *const Pca200Classifier,
    pixels: *const u8,
    width: u32,
    height: u32,
    out_index: *mut usize,
    out_confidence: *mut f32,
) -> Pca200Status {
    if handle.is_null() || pixels.is_null() || out_index.is_null() || out_confidence.is_null() {
        return Pca200Status::InvalidArgument;
    }
    let len = match (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(4))
    {
        Some(len) => len,
        None => return Pca200Status::InvalidArgument,
    };

    let classifier = &(*handle).inner;
    let pixels = slice::from_raw_parts(pixels, len);

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        classify_into(classifier, pixels, width, height)
    }));

    match result {
        Ok(Ok(prediction)) => {
            *out_index = prediction.index;
            *out_confidence = prediction.confidence;
            Pca200Status::Ok
        }
        Ok(Err(e)) => {
            error!("pca200_classify_rgba: {}", e);
            Pca200Status::from(&e)
        }
        Err(_) => {
            error!("pca200_classify_rgba: panicked during classification");
            Pca200Status::Internal
        }
    }
}

/// Releases a classifier. Null is ignored.
///
/// # Safety
/// `handle` must come from [`pca200_classifier_new`] and must not be used afterwards.
#[no_mangle]
pub unsafe extern "C" fn pca200_classifier_free(handle: *mut Pca200Classifier) {
    if handle.is_null() {
        return;
    }
    let classifier = Box::from_raw(handle);
    if panic::catch_unwind(AssertUnwindSafe(move || drop(classifier))).is_err() {
        error!("pca200_classifier_free: panicked while releasing the classifier");
    }
}
