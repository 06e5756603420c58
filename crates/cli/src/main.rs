use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use facewatch_core::detection::infrastructure::model_resolver::{
    default_bundle_dir, face_detection_bundle, resolve_bundle,
};
use facewatch_core::detection::domain::face_detector::FaceDetector;
use facewatch_core::detection::infrastructure::onnx_ssd_detector::OnnxSsdDetector;
use facewatch_core::detection::infrastructure::openvino_ssd_detector::OpenVinoSsdDetector;
use facewatch_core::overlay::infrastructure::opencv_overlay_renderer::OpenCvOverlayRenderer;
use facewatch_core::pipeline::live_detection_use_case::LiveDetectionUseCase;
use facewatch_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use facewatch_core::shared::constants::{
    DEFAULT_CAMERA_INDEX, DEFAULT_CONFIDENCE, FACE_MODEL_BASE_URL, IMAGE_EXTENSIONS, WINDOW_TITLE,
};
use facewatch_core::video::domain::frame_sink::FrameSink;
use facewatch_core::video::domain::frame_source::FrameSource;
use facewatch_core::video::infrastructure::ffmpeg_file_source::FfmpegFileSource;
use facewatch_core::video::infrastructure::image_directory_sink::ImageDirectorySink;
use facewatch_core::video::infrastructure::image_file_source::ImageFileSource;
use facewatch_core::video::infrastructure::opencv_camera_source::OpenCvCameraSource;
use facewatch_core::video::infrastructure::window_sink::WindowSink;

/// Live face detection with on-screen boxes and stage timings.
#[derive(Parser, Debug)]
#[command(name = "facewatch")]
struct Cli {
    /// Camera device index.
    #[arg(long, default_value_t = DEFAULT_CAMERA_INDEX)]
    camera: i32,

    /// Video or image file to use instead of the camera.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Face detection confidence threshold (0.0-1.0).
    #[arg(long, default_value_t = DEFAULT_CONFIDENCE)]
    confidence: f32,

    /// Folder holding the model files (default: platform cache).
    #[arg(long)]
    model_dir: Option<PathBuf>,

    /// Base URL the model files are downloaded from.
    #[arg(long, default_value = FACE_MODEL_BASE_URL)]
    model_url: String,

    /// Run a local ONNX conversion of the model with ONNX Runtime instead
    /// of the downloaded OpenVINO model.
    #[arg(long)]
    onnx_model: Option<PathBuf>,

    /// Stop after this many frames.
    #[arg(long)]
    max_frames: Option<usize>,

    /// Run without a display window.
    #[arg(long)]
    headless: bool,

    /// Save every annotated frame as PNG into this directory.
    #[arg(long)]
    record_dir: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let detector = build_detector(&cli)?;
    let source = open_source(&cli);
    let sinks = build_sinks(&cli);
    if sinks.is_empty() {
        log::warn!("--headless without --record-dir: frames are processed but not kept");
    }

    let mut use_case = LiveDetectionUseCase::new(
        source,
        detector,
        Box::new(OpenCvOverlayRenderer::new()),
        sinks,
        Box::new(StdoutPipelineLogger::default()),
        cli.max_frames,
    );
    let summary = use_case.execute()?;
    log::info!(
        "Done: {} frames, {} faces detected",
        summary.frames,
        summary.detections
    );

    Ok(())
}

fn build_detector(cli: &Cli) -> Result<Box<dyn FaceDetector>, Box<dyn std::error::Error>> {
    if let Some(onnx_model) = &cli.onnx_model {
        log::info!("Using ONNX model {}", onnx_model.display());
        return Ok(Box::new(OnnxSsdDetector::new(onnx_model, cli.confidence)?));
    }

    let model_dir = match &cli.model_dir {
        Some(dir) => dir.clone(),
        None => default_bundle_dir()?,
    };
    let model_path = resolve_bundle(
        &model_dir,
        &face_detection_bundle(&cli.model_url),
        Some(Box::new(download_progress)),
    )?;
    Ok(Box::new(OpenVinoSsdDetector::new(&model_path, cli.confidence)?))
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !(0.0..=1.0).contains(&cli.confidence) {
        return Err(format!(
            "Confidence must be between 0.0 and 1.0, got {}",
            cli.confidence
        )
        .into());
    }
    if let Some(input) = &cli.input {
        if !input.exists() {
            return Err(format!("Input file not found: {}", input.display()).into());
        }
    }
    if let Some(onnx_model) = &cli.onnx_model {
        if !onnx_model.exists() {
            return Err(format!("ONNX model not found: {}", onnx_model.display()).into());
        }
    }
    if cli.camera < 0 {
        return Err(format!("Camera index must be non-negative, got {}", cli.camera).into());
    }
    Ok(())
}

fn open_source(cli: &Cli) -> Box<dyn FrameSource> {
    match &cli.input {
        Some(input) if is_image(input) => Box::new(ImageFileSource::new(input)),
        Some(input) => Box::new(FfmpegFileSource::new(input)),
        None => Box::new(OpenCvCameraSource::new(cli.camera)),
    }
}

fn build_sinks(cli: &Cli) -> Vec<Box<dyn FrameSink>> {
    let mut sinks: Vec<Box<dyn FrameSink>> = Vec::new();
    if !cli.headless {
        sinks.push(Box::new(WindowSink::new(WINDOW_TITLE)));
    }
    if let Some(dir) = &cli.record_dir {
        sinks.push(Box::new(ImageDirectorySink::new(dir)));
    }
    sinks
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading face detection model... {pct}%");
        if downloaded >= total {
            eprintln!();
        }
    } else {
        eprint!("\rDownloading face detection model... {downloaded} bytes");
    }
}
