use std::fs;
use std::path::Path;

use image::imageops::FilterType;
use serde::{Deserialize, Serialize};

use crate::classifier::ClassifierError;

/// Side length, in pixels, of the square image the bundled model was trained on.
pub const DEFAULT_INPUT_SIZE: u32 = 224;
/// Number of classes the bundled model scores.
pub const DEFAULT_NUM_CLASSES: usize = 10;

/// Interpolation used when scaling a bitmap to the model's input size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeFilter {
    Nearest,
    #[default]
    Bilinear,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<ResizeFilter> for FilterType {
    fn from(filter: ResizeFilter) -> Self {
        match filter {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Bilinear => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Shape parameters of the classification pipeline.
///
/// Every field has a default, so a JSON file only needs the keys it overrides:
///
/// ```
/// use pca200::PipelineConfig;
///
/// let config = PipelineConfig::from_json_str(r#"{ "num_classes": 4 }"#).unwrap();
/// assert_eq!(config.input_size, 224);
/// assert_eq!(config.num_classes, 4);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Width and height of the tensor handed to the engine
    pub input_size: u32,
    /// Length of the output vector the engine must return
    pub num_classes: usize,
    pub resize_filter: ResizeFilter,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_size: DEFAULT_INPUT_SIZE,
            num_classes: DEFAULT_NUM_CLASSES,
            resize_filter: ResizeFilter::default(),
        }
    }
}

impl PipelineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ClassifierError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ClassifierError::ValidationError(format!("Invalid pipeline config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ClassifierError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            ClassifierError::ValidationError(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }

    /// Rejects zero-sized inputs and outputs.
    pub fn validate(&self) -> Result<(), ClassifierError> {
        if self.input_size == 0 {
            return Err(ClassifierError::ValidationError("Input size must be positive".into()));
        }
        if self.num_classes == 0 {
            return Err(ClassifierError::ValidationError("Number of classes must be positive".into()));
        }
        Ok(())
    }

    /// The `(batch, height, width, channels)` shape of the tensor this config produces.
    pub fn input_shape(&self) -> [usize; 4] {
        let side = self.input_size as usize;
        [1, side, side, 3]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_bundled_model() {
        let config = PipelineConfig::default();
        assert_eq!(config.input_size, 224);
        assert_eq!(config.num_classes, 10);
        assert_eq!(config.resize_filter, ResizeFilter::Bilinear);
        assert_eq!(config.input_shape(), [1, 224, 224, 3]);
    }

    #[test]
    fn test_json_overrides() {
        let config = PipelineConfig::from_json_str(
            r#"{ "input_size": 96, "resize_filter": "lanczos3" }"#,
        )
        .unwrap();
        assert_eq!(config.input_size, 96);
        assert_eq!(config.num_classes, DEFAULT_NUM_CLASSES);
        assert_eq!(config.resize_filter, ResizeFilter::Lanczos3);
    }

    #[test]
    fn test_zero_sizes_rejected() {
        let result = PipelineConfig::from_json_str(r#"{ "num_classes": 0 }"#);
        assert!(matches!(result, Err(ClassifierError::ValidationError(_))));

        let result = PipelineConfig::from_json_str(r#"{ "input_size": 0 }"#);
        assert!(matches!(result, Err(ClassifierError::ValidationError(_))));
    }

    #[test]
    fn test_malformed_json() {
        let result = PipelineConfig::from_json_str("{ input_size: ");
        assert!(matches!(result, Err(ClassifierError::ValidationError(_))));
    }

    #[test]
    fn test_bilinear_maps_to_triangle() {
        assert_eq!(FilterType::from(ResizeFilter::Bilinear), FilterType::Triangle);
    }
}
