//! A thread-safe image classifier library: resize a bitmap, normalize it into a
//! tensor, run a pre-trained model, and report the best class.
//!
//! # Basic Usage
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use pca200::{load_image, AssetStore, OnnxClassifier, BUNDLED_MODEL_NAME};
//!
//! let asset = AssetStore::new("assets").load(BUNDLED_MODEL_NAME, None)?;
//! let classifier = OnnxClassifier::builder()
//!     .with_model_asset(&asset)?
//!     .with_input_size(224)
//!     .with_num_classes(10)
//!     .build()?;
//!
//! let bitmap = load_image("photo.jpg")?;
//! let prediction = classifier.classify_image(&bitmap)?;
//! println!("{}", prediction); // e.g. "Class 3 (Confidence: 0.82)"
//! # Ok(())
//! # }
//! ```
//!
//! # Pluggable Engines
//!
//! Anything implementing [`InferenceEngine`] can stand in for ONNX Runtime,
//! which keeps the preprocessing and arg-max testable without a model file:
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use pca200::{Bitmap, ClassifierError, ImageClassifier, InferenceEngine, Tensor};
//! use std::sync::Arc;
//! use std::thread;
//!
//! struct Stub;
//!
//! impl InferenceEngine for Stub {
//!     fn load(_: &[u8]) -> Result<Self, ClassifierError> { Ok(Stub) }
//!     fn infer(&self, _: Tensor) -> Result<Vec<f32>, ClassifierError> {
//!         Ok(vec![0.1, 0.05, 0.7, 0.15])
//!     }
//! }
//!
//! let classifier = Arc::new(ImageClassifier::builder()
//!     .with_engine(Stub)
//!     .with_num_classes(4)
//!     .build()?);
//!
//! let mut handles = vec![];
//! for _ in 0..3 {
//!     let classifier = Arc::clone(&classifier);
//!     handles.push(thread::spawn(move || {
//!         classifier.classify_image(&Bitmap::new(32, 32)).unwrap()
//!     }));
//! }
//!
//! for handle in handles {
//!     assert_eq!(handle.join().unwrap().index, 2);
//! }
//! # Ok(())
//! # }
//! ```

pub mod classifier;
mod runtime;
pub mod assets;
pub mod config;
pub mod ffi;
pub mod image_source;

pub use classifier::{
    classify, format_prediction, preprocess, preprocess_with_filter, top_k, Bitmap,
    ClassifierBuilder, ClassifierError, ClassifierInfo, ImageClassifier, InferenceEngine,
    OnnxClassifier, OnnxEngine, Prediction, Tensor,
};
pub use runtime::{RuntimeConfig, create_session_builder};
pub use assets::{AssetError, AssetStore, ModelAsset, BUNDLED_MODEL_NAME};
pub use config::{PipelineConfig, ResizeFilter, DEFAULT_INPUT_SIZE, DEFAULT_NUM_CLASSES};
pub use image_source::{bitmap_from_rgba, decode_image, load_image, ImageSource, PromptImageSource};

pub fn init_logger() {
    env_logger::init();
}
