use std::sync::Arc;

use log::info;

use super::classifier::ImageClassifier;
use super::engine::{check_shape, InferenceEngine};
use super::error::ClassifierError;
use crate::assets::ModelAsset;
use crate::config::{PipelineConfig, ResizeFilter};

/// A builder for constructing an [`ImageClassifier`] with a fluent interface.
#[derive(Debug)]
pub struct ClassifierBuilder<E> {
    engine: Option<E>,
    config: PipelineConfig,
}

impl<E: InferenceEngine> Default for ClassifierBuilder<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: InferenceEngine> ClassifierBuilder<E> {
    /// Creates a builder with no engine and the default [`PipelineConfig`]
    pub fn new() -> Self {
        Self {
            engine: None,
            config: PipelineConfig::default(),
        }
    }

    /// Uses an already loaded engine
    pub fn with_engine(mut self, engine: E) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Loads the engine from serialized model bytes
    ///
    /// # Returns
    /// * `Result<Self, ClassifierError>` - The builder instance if successful, or an error if:
    ///   - An engine is already set
    ///   - The bytes are not a valid model (`ModelLoadError`)
    pub fn with_model_bytes(mut self, model_bytes: &[u8]) -> Result<Self, ClassifierError> {
        if self.engine.is_some() {
            return Err(ClassifierError::BuildError("Inference engine already set".to_string()));
        }
        let engine = E::load(model_bytes)?;
        info!("Model loaded successfully ({} bytes)", model_bytes.len());
        self.engine = Some(engine);
        Ok(self)
    }

    /// Loads the engine from a model asset read by an [`AssetStore`](crate::AssetStore)
    pub fn with_model_asset(self, asset: &ModelAsset) -> Result<Self, ClassifierError> {
        info!("Loading model asset '{}'", asset.name);
        self.with_model_bytes(&asset.bytes)
    }

    /// Replaces the whole pipeline configuration
    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the side length of the square tensor handed to the engine
    pub fn with_input_size(mut self, input_size: u32) -> Self {
        self.config.input_size = input_size;
        self
    }

    /// Sets the number of scores the engine must return
    pub fn with_num_classes(mut self, num_classes: usize) -> Self {
        self.config.num_classes = num_classes;
        self
    }

    pub fn with_resize_filter(mut self, filter: ResizeFilter) -> Self {
        self.config.resize_filter = filter;
        self
    }

    /// Builds and returns the final ImageClassifier instance
    ///
    /// # Returns
    /// * `Result<ImageClassifier<E>, ClassifierError>` - The constructed classifier if successful, or an error if:
    ///   - No engine was set (`BuildError`)
    ///   - The input size or class count is zero (`ValidationError`)
    ///   - The engine declares an input shape other than `(1, S, S, 3)` (`ShapeMismatchError`)
    pub fn build(self) -> Result<ImageClassifier<E>, ClassifierError> {
        let engine = self.engine
            .ok_or_else(|| ClassifierError::BuildError("An inference engine must be set".to_string()))?;
        self.config.validate()?;

        if let Some(expected) = engine.expected_input_shape() {
            check_shape(&expected, &self.config.input_shape())?;
            info!("Model input shape {:?} matches pipeline configuration", expected);
        }

        Ok(ImageClassifier {
            engine: Arc::new(engine),
            config: self.config,
        })
    }
}
