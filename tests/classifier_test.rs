use image::Rgba;
use pca200::{
    format_prediction, Bitmap, ClassifierError, ImageClassifier, InferenceEngine, Prediction, Tensor,
};
use std::sync::Arc;
use std::thread;

/// Always answers with the same output vector, like a model that has already decided.
struct StubEngine {
    output: Vec<f32>,
}

impl InferenceEngine for StubEngine {
    fn load(_model_bytes: &[u8]) -> Result<Self, ClassifierError> {
        Ok(Self { output: vec![0.1, 0.05, 0.7, 0.15] })
    }

    fn infer(&self, _input: Tensor) -> Result<Vec<f32>, ClassifierError> {
        Ok(self.output.clone())
    }
}

/// Scores each class by the mean value of the matching channel.
struct ChannelMeanEngine;

impl InferenceEngine for ChannelMeanEngine {
    fn load(_model_bytes: &[u8]) -> Result<Self, ClassifierError> {
        Ok(ChannelMeanEngine)
    }

    fn infer(&self, input: Tensor) -> Result<Vec<f32>, ClassifierError> {
        Ok((0..3)
            .map(|c| input.slice(ndarray::s![0, .., .., c]).mean().unwrap_or(0.0))
            .collect())
    }
}

fn setup_test_classifier() -> ImageClassifier<StubEngine> {
    ImageClassifier::<StubEngine>::builder()
        .with_model_bytes(b"stub model")
        .unwrap()
        .with_num_classes(4)
        .build()
        .expect("Failed to create classifier")
}

#[test]
fn test_end_to_end_classification() -> Result<(), Box<dyn std::error::Error>> {
    let classifier = setup_test_classifier();
    let bitmap = Bitmap::from_pixel(300, 200, Rgba([12, 200, 40, 255]));

    let prediction = classifier.classify_image(&bitmap)?;

    assert_eq!(prediction, Prediction { index: 2, confidence: 0.7 });
    assert_eq!(format_prediction(&prediction), "Class 2 (Confidence: 0.7)");
    Ok(())
}

#[test]
fn test_engine_receives_normalized_tensor() -> Result<(), Box<dyn std::error::Error>> {
    let classifier = ImageClassifier::<ChannelMeanEngine>::builder()
        .with_model_bytes(b"")?
        .with_num_classes(3)
        .with_input_size(16)
        .build()?;

    let bitmap = Bitmap::from_pixel(40, 25, Rgba([255, 0, 0, 255]));
    let prediction = classifier.classify_image(&bitmap)?;
    assert_eq!(prediction.index, 0);
    assert_eq!(prediction.confidence, 1.0);

    let info = classifier.info();
    assert_eq!(info.input_size, 16);
    Ok(())
}

#[test]
fn test_wrong_output_length() {
    let classifier = ImageClassifier::builder()
        .with_engine(StubEngine { output: vec![0.5; 4] })
        .with_num_classes(10)
        .build()
        .unwrap();

    let result = classifier.classify_image(&Bitmap::new(10, 10));
    match result {
        Err(ClassifierError::ShapeMismatchError { expected, actual }) => {
            assert_eq!(expected, vec![1, 10]);
            assert_eq!(actual, vec![1, 4]);
        }
        other => panic!("expected shape mismatch, got {:?}", other),
    }
}

#[test]
fn test_empty_bitmap_rejected() {
    let classifier = setup_test_classifier();
    let result = classifier.classify_image(&Bitmap::new(0, 0));
    assert!(matches!(result, Err(ClassifierError::ValidationError(_))));
}

#[test]
fn test_thread_safety() {
    let classifier = Arc::new(setup_test_classifier());
    let mut handles = vec![];

    for i in 0..4u8 {
        let classifier = Arc::clone(&classifier);
        let handle = thread::spawn(move || {
            let bitmap = Bitmap::from_pixel(50 + i as u32, 60, Rgba([i * 40, 0, 0, 255]));
            let result = classifier.classify_image(&bitmap);
            assert_eq!(result.unwrap().index, 2);
        });
        handles.push(handle);
    }

    for handle in handles {
        handle.join().unwrap();
    }
}
