use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use pca200::{
    load_image, AssetStore, Bitmap, ClassifierError, ImageSource, OnnxClassifier, OnnxEngine,
    PipelineConfig, PromptImageSource, RuntimeConfig,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the ONNX model file
    #[arg(short, long)]
    model: PathBuf,

    /// Expected SHA-256 of the model file
    #[arg(long)]
    sha256: Option<String>,

    /// JSON pipeline configuration (input_size, num_classes, resize_filter)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Overrides the model input size from the config
    #[arg(long)]
    input_size: Option<u32>,

    /// Overrides the class count from the config
    #[arg(long)]
    num_classes: Option<usize>,

    /// Print the best `top` classes instead of only the winner
    #[arg(short, long, default_value_t = 1)]
    top: usize,

    /// Intra-op threads for ONNX Runtime (0 lets the runtime decide)
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Images to classify. When none are given, paths are read from stdin.
    images: Vec<PathBuf>,
}

fn build_classifier(args: &Args) -> Result<OnnxClassifier> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(input_size) = args.input_size {
        config.input_size = input_size;
    }
    if let Some(num_classes) = args.num_classes {
        config.num_classes = num_classes;
    }

    let model_dir = args.model.parent().unwrap_or_else(|| Path::new("."));
    let model_name = args
        .model
        .file_name()
        .and_then(|name| name.to_str())
        .context("Model path has no file name")?;
    let asset = AssetStore::new(model_dir)
        .load(model_name, args.sha256.as_deref())
        .with_context(|| format!("Failed to load model {}", args.model.display()))?;

    let runtime = if args.threads > 0 {
        RuntimeConfig::with_threads(args.threads)
    } else {
        RuntimeConfig::default()
    };
    let engine = OnnxEngine::load_with_config(&asset.bytes, &runtime)?;

    let classifier = OnnxClassifier::builder()
        .with_engine(engine)
        .with_config(config)
        .build()?;
    Ok(classifier)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    info!("=== Starting Image Classifier ===");
    let start_time = Instant::now();
    let classifier = build_classifier(&args)?;
    info!("Classifier ready (took {:.2?}): {:?}", start_time.elapsed(), classifier.info());

    if args.images.is_empty() {
        let stdin = io::stdin();
        let mut source = PromptImageSource::new(stdin.lock());
        loop {
            eprintln!("Image path (blank to quit):");
            match source.pick() {
                Ok(bitmap) => report(&classifier, &bitmap, args.top)?,
                Err(ClassifierError::UserCancelled) => break,
                Err(e) if e.is_recoverable() => eprintln!("Skipping image: {}", e),
                Err(e) => return Err(e.into()),
            }
        }
    } else {
        for path in &args.images {
            match load_image(path) {
                Ok(bitmap) => report(&classifier, &bitmap, args.top)?,
                Err(e) if e.is_recoverable() => warn!("Skipping {}: {}", path.display(), e),
                Err(e) => return Err(e.into()),
            }
        }
    }

    info!("=== Done (total {:.2?}) ===", start_time.elapsed());
    Ok(())
}

fn report(classifier: &OnnxClassifier, bitmap: &Bitmap, top: usize) -> Result<()> {
    let classify_start = Instant::now();

    if top <= 1 {
        let prediction = classifier.classify_image(bitmap)?;
        println!("{}", prediction);
    } else {
        for prediction in classifier.ranked(bitmap, top)? {
            println!("  {}", prediction);
        }
    }

    info!("Classified {}x{} image in {:.2?}", bitmap.width(), bitmap.height(), classify_start.elapsed());
    Ok(())
}
