use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use clap::Parser;

use agecam_core::detection::domain::face_detector::FaceDetector;
use agecam_core::detection::infrastructure::onnx_blazeface_detector::{
    DetectorConfig, ModelSize, OnnxBlazefaceDetector,
};
use agecam_core::pipeline::frame_pipeline::FramePipeline;
use agecam_core::pipeline::overlay_renderer;
use agecam_core::pipeline::pipeline_logger::{PipelineLogger, StdoutPipelineLogger};
use agecam_core::pipeline::throttled_predictor::ThrottledPredictor;
use agecam_core::prediction::infrastructure::onnx_age_predictor::OnnxAgePredictor;
use agecam_core::shared::constants::{
    AGE_MODEL_NAME, AGE_MODEL_URL, BLAZEFACE_FULL_MODEL_NAME, BLAZEFACE_FULL_MODEL_URL,
    BLAZEFACE_SHORT_MODEL_NAME, BLAZEFACE_SHORT_MODEL_URL, DEFAULT_CONFIDENCE,
    DEFAULT_PREDICTION_INTERVAL_MS,
};
use agecam_core::shared::model_resolver;
use agecam_core::video::domain::frame_sink::FrameSink;
use agecam_core::video::domain::frame_source::FrameSource;
use agecam_core::video::domain::image_writer::ImageWriter;
use agecam_core::video::infrastructure::camera_source::CameraSource;
use agecam_core::video::infrastructure::ffplay_sink::FfplaySink;
use agecam_core::video::infrastructure::image_file_source::ImageFileSource;
use agecam_core::video::infrastructure::image_file_writer::ImageFileWriter;

/// Webcam age estimation with live overlay.
#[derive(Parser)]
#[command(name = "agecam")]
struct Cli {
    /// Input image file (omit to use the webcam).
    input: Option<PathBuf>,

    /// Output image file (required with an input image).
    output: Option<PathBuf>,

    /// Camera device index.
    #[arg(long, default_value = "0")]
    camera: u32,

    /// Face detection confidence threshold (0.0-1.0).
    #[arg(long, default_value_t = DEFAULT_CONFIDENCE)]
    confidence: f32,

    /// Minimum milliseconds between age-model invocations.
    #[arg(long, default_value_t = DEFAULT_PREDICTION_INTERVAL_MS)]
    interval_ms: u64,

    /// Mirror detections horizontally (selfie-mode cameras).
    #[arg(long)]
    mirror: bool,

    /// Face model variant: short (webcam range) or full.
    #[arg(long, default_value = "short")]
    model_size: String,

    /// Stop after this many camera frames.
    #[arg(long)]
    max_frames: Option<usize>,

    /// Save face region crops to this directory.
    #[arg(long)]
    preview: Option<PathBuf>,

    /// Directory with pre-downloaded model files.
    #[arg(long)]
    models_dir: Option<PathBuf>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let detector = build_detector(&cli)?;
    let predictor = build_predictor(&cli);
    let logger: Box<dyn PipelineLogger> = Box::new(StdoutPipelineLogger::default());
    let mut pipeline = FramePipeline::new(
        detector,
        ThrottledPredictor::new(Box::new(predictor), Duration::from_millis(cli.interval_ms)),
        logger,
    );

    if let Some(input) = &cli.input {
        let output = cli.output.as_ref().ok_or("Output file is required")?;
        run_image(input, output, &mut pipeline, cli.preview.as_deref())?;
    } else {
        run_camera(
            cli.camera,
            &mut pipeline,
            cli.preview.as_deref(),
            cli.max_frames,
        )?;
    }

    pipeline.finish();
    Ok(())
}

fn run_image(
    input: &Path,
    output: &Path,
    pipeline: &mut FramePipeline,
    preview_dir: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut source = ImageFileSource::new(input);
    source.open()?;
    let writer = ImageFileWriter::new();

    let mut frame = source
        .next_frame()?
        .ok_or("Image source produced no frame")?;
    let state = pipeline.process_frame(&frame)?;

    if let (Some(dir), Some(face)) = (preview_dir, state.face()) {
        writer.write(&dir.join("roi.png"), &face.roi, None)?;
    }

    overlay_renderer::render(&mut frame, &state);
    writer.write(output, &frame, None)?;
    source.close();
    log::info!("Output written to {}", output.display());
    Ok(())
}

fn run_camera(
    camera_index: u32,
    pipeline: &mut FramePipeline,
    preview_dir: Option<&Path>,
    max_frames: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    const MAX_CONSECUTIVE_FAILURES: usize = 30;
    // Crop previews are throttled so a long session doesn't fill the disk.
    const PREVIEW_EVERY: usize = 30;

    let mut source = CameraSource::new(camera_index);
    let metadata = source.open()?;

    let mut sink = FfplaySink::new();
    sink.open(&metadata)?;

    let writer = ImageFileWriter::new();
    let mut processed = 0usize;
    let mut failures = 0usize;

    loop {
        if let Some(limit) = max_frames {
            if processed >= limit {
                break;
            }
        }

        let mut frame = match source.next_frame() {
            Ok(Some(frame)) => {
                failures = 0;
                frame
            }
            Ok(None) => break,
            Err(e) => {
                failures += 1;
                log::warn!("Skipping frame: {e}");
                if failures >= MAX_CONSECUTIVE_FAILURES {
                    return Err("Camera stopped delivering frames".into());
                }
                continue;
            }
        };

        // A bad frame should not kill a live session.
        let state = match pipeline.process_frame(&frame) {
            Ok(state) => state,
            Err(e) => {
                log::warn!("Frame {} failed: {e}", frame.index());
                continue;
            }
        };

        if let (Some(dir), Some(face)) = (preview_dir, state.face()) {
            if frame.index() % PREVIEW_EVERY == 0 {
                let path = dir.join(format!("roi_{:06}.png", frame.index()));
                if let Err(e) = writer.write(&path, &face.roi, None) {
                    log::warn!("Failed to write preview {}: {e}", path.display());
                }
            }
        }

        overlay_renderer::render(&mut frame, &state);
        sink.write(&frame)?;
        processed += 1;
    }

    sink.close()?;
    source.close();
    Ok(())
}

fn build_detector(cli: &Cli) -> Result<Box<dyn FaceDetector>, Box<dyn std::error::Error>> {
    let model_size = parse_model_size(&cli.model_size);
    let (name, url) = match model_size {
        ModelSize::Short => (BLAZEFACE_SHORT_MODEL_NAME, BLAZEFACE_SHORT_MODEL_URL),
        ModelSize::Full => (BLAZEFACE_FULL_MODEL_NAME, BLAZEFACE_FULL_MODEL_URL),
    };

    log::info!("Resolving model: {name}");
    let model_path = model_resolver::resolve(
        name,
        url,
        cli.models_dir.as_deref(),
        Some(Box::new(download_progress)),
    )?;
    eprintln!();

    let config = DetectorConfig {
        confidence: cli.confidence,
        mirror_input: cli.mirror,
        model_size,
    };
    Ok(Box::new(OnnxBlazefaceDetector::new(&model_path, config)?))
}

/// A missing age model is not fatal; the overlay shows "loading model"
/// and detection keeps running.
fn build_predictor(cli: &Cli) -> OnnxAgePredictor {
    log::info!("Resolving model: {AGE_MODEL_NAME}");
    match model_resolver::resolve(
        AGE_MODEL_NAME,
        AGE_MODEL_URL,
        cli.models_dir.as_deref(),
        Some(Box::new(download_progress)),
    ) {
        Ok(path) => {
            eprintln!();
            OnnxAgePredictor::new(&path)
        }
        Err(e) => {
            eprintln!();
            log::error!("Could not resolve age model: {e}");
            OnnxAgePredictor::offline()
        }
    }
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(input) = &cli.input {
        if !input.exists() {
            return Err(format!("Input file not found: {}", input.display()).into());
        }
        if cli.output.is_none() {
            return Err("Output file is required with an input image".into());
        }
    }
    if !(0.0..=1.0).contains(&cli.confidence) {
        return Err(format!(
            "Confidence must be between 0.0 and 1.0, got {}",
            cli.confidence
        )
        .into());
    }
    if cli.model_size != "short" && cli.model_size != "full" {
        return Err(format!(
            "Model size must be 'short' or 'full', got '{}'",
            cli.model_size
        )
        .into());
    }
    Ok(())
}

fn parse_model_size(size: &str) -> ModelSize {
    if size == "full" {
        ModelSize::Full
    } else {
        ModelSize::Short
    }
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading model... {pct}%");
    } else {
        eprint!("\rDownloading model... {downloaded} bytes");
    }
}
