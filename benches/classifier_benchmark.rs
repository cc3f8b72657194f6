use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::Rgba;
use pca200::{classify, preprocess, Bitmap, ClassifierError, ImageClassifier, InferenceEngine, Tensor};

struct SumEngine;

impl InferenceEngine for SumEngine {
    fn load(_model_bytes: &[u8]) -> Result<Self, ClassifierError> {
        Ok(SumEngine)
    }

    fn infer(&self, input: Tensor) -> Result<Vec<f32>, ClassifierError> {
        let total: f32 = input.iter().sum();
        Ok((0..10).map(|i| total / (i + 1) as f32).collect())
    }
}

fn gradient(width: u32, height: u32) -> Bitmap {
    Bitmap::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255])
    })
}

fn bench_preprocess(c: &mut Criterion) {
    let mut group = c.benchmark_group("Preprocess");
    group.sample_size(50);
    group.warm_up_time(std::time::Duration::from_secs(1));

    for (name, width, height) in [("square_224", 224, 224), ("vga", 640, 480), ("photo_12mp", 4000, 3000)] {
        let bitmap = gradient(width, height);
        group.bench_function(name, |b| b.iter(|| {
            preprocess(black_box(&bitmap), 224).unwrap()
        }));
    }

    group.finish();
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("Classify");

    for size in [10usize, 1000, 100_000] {
        let scores: Vec<f32> = (0..size).map(|i| ((i * 7919) % size) as f32).collect();
        group.bench_function(format!("argmax_{}", size), |b| b.iter(|| {
            classify(black_box(&scores)).unwrap()
        }));
    }

    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let classifier = ImageClassifier::builder()
        .with_engine(SumEngine)
        .build()
        .unwrap();
    let bitmap = gradient(640, 480);

    c.bench_function("pipeline_vga", |b| b.iter(|| {
        classifier.classify_image(black_box(&bitmap)).unwrap()
    }));
}

criterion_group!(
    benches,
    bench_preprocess,
    bench_classify,
    bench_pipeline
);
criterion_main!(benches);
