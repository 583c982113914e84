use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use clusterface_core::config::domain::config_store::ConfigStore;
use clusterface_core::config::domain::face_detection_config::FaceDetectionConfig;
use clusterface_core::config::infrastructure::config_file;
use clusterface_core::config::infrastructure::config_file_watcher::ConfigFileWatcher;
use clusterface_core::detection::domain::face_detector::FaceDetector;
use clusterface_core::detection::domain::roi_projector::RoiProjector;
use clusterface_core::detection::infrastructure::model_locator;
use clusterface_core::detection::infrastructure::rustface_detector::RustfaceDetector;
use clusterface_core::detection::infrastructure::serialized_detector::SerializedDetector;
use clusterface_core::pipeline::face_detection_use_case::FaceDetectionUseCase;
use clusterface_core::pipeline::infrastructure::threaded_roi_executor::ThreadedRoiExecutor;
use clusterface_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use clusterface_core::pipeline::roi_executor::{RoiExecutor, SequentialRoiExecutor};
use clusterface_core::shared::constants::{
    DEFAULT_LOCATOR_WORKERS, DEFAULT_SENSOR_NAME, DETECTOR_MODEL_NAME, TRANSFORM_LOOKUP_TIMEOUT,
};
use clusterface_core::shared::sensor_frames::SensorFrames;
use clusterface_core::transform::domain::transform_resolver::FrameTransforms;
use clusterface_core::transform::infrastructure::transform_buffer::TransformBuffer;
use clusterface_core::transform::infrastructure::transforms_file;
use clusterface_core::transport::infrastructure::image_file_visualizer::ImageFileVisualizer;
use clusterface_core::transport::infrastructure::json_lines_frame_source::JsonLinesFrameSource;
use clusterface_core::transport::infrastructure::json_lines_sink::JsonLinesSink;

/// Locates faces for recorded 3D human-cluster detections.
#[derive(Parser)]
#[command(name = "clusterface")]
struct Cli {
    /// JSON-lines file of frames (image path, camera info, detections).
    input: PathBuf,

    /// Write enriched detection arrays here, one JSON object per line.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Also write enriched detection arrays to stdout.
    #[arg(long)]
    stdout: bool,

    /// JSON file with static transforms between named frames.
    #[arg(long)]
    transforms: PathBuf,

    /// Sensor name; frame ids are derived from it.
    #[arg(long, default_value = DEFAULT_SENSOR_NAME)]
    sensor: String,

    /// Seconds to wait for each startup transform.
    #[arg(long, default_value_t = TRANSFORM_LOOKUP_TIMEOUT.as_secs_f64())]
    transform_timeout: f64,

    /// SeetaFace model file (searched in the data directory if omitted).
    #[arg(long)]
    model: Option<PathBuf>,

    /// ROI worker threads (1 = process ROIs sequentially).
    #[arg(long, default_value_t = DEFAULT_LOCATOR_WORKERS)]
    workers: usize,

    /// Allow only one detector call at a time across workers.
    #[arg(long)]
    serialize_detector: bool,

    /// Configuration file (defaults to the platform config directory).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the effective configuration to the config file before running.
    #[arg(long)]
    save_config: bool,

    /// Reload the configuration file between frames when it changes.
    #[arg(long)]
    watch_config: bool,

    /// Minimum detector score.
    #[arg(long)]
    confidence: Option<f64>,

    /// Half width of the head ROI in meters.
    #[arg(long)]
    roi_half_width: Option<f64>,

    /// Anchor ROIs on the cluster centroid instead of its top point.
    #[arg(long)]
    use_centroid: bool,

    /// Vertical offset from the top point to the face, in meters.
    #[arg(long, allow_hyphen_values = true)]
    head_offset_top: Option<f64>,

    /// Vertical offset from the centroid to the face, in meters.
    #[arg(long, allow_hyphen_values = true)]
    head_offset_centroid: Option<f64>,

    /// ROIs narrower than this many pixels are upscaled before detection.
    #[arg(long)]
    min_upscale: Option<u32>,

    /// Write annotated frames to this directory.
    #[arg(long)]
    visualize: Option<PathBuf>,
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

    let config = build_config(&cli)?;
    if cli.save_config {
        let path = config_path(&cli).ok_or("No config directory available for --save-config")?;
        config_file::save(&config, &path)?;
        log::info!("Saved configuration to {}", path.display());
    }
    let frames = SensorFrames::for_sensor(&cli.sensor);
    let transforms = resolve_transforms(&cli, &frames)?;
    let detector = build_detector(&cli)?;
    let executor: Box<dyn RoiExecutor> = if cli.workers > 1 {
        Box::new(ThreadedRoiExecutor::new(cli.workers))
    } else {
        Box::new(SequentialRoiExecutor)
    };

    let (store, updater) = ConfigStore::new(config);
    let mut watcher = match watched_config_path(&cli) {
        Some(path) => {
            log::info!("Watching {} for configuration changes", path.display());
            Some(ConfigFileWatcher::new(&path, updater))
        }
        None => None,
    };

    let mut use_case = FaceDetectionUseCase::new(
        &frames.source,
        RoiProjector::new(transforms),
        detector,
        executor,
        store,
    )
    .with_logger(Box::new(StdoutPipelineLogger::default()));
    if let Some(path) = &cli.output {
        use_case = use_case.with_sink(Box::new(JsonLinesSink::create(path)?));
    }
    if cli.stdout {
        use_case = use_case.with_sink(Box::new(JsonLinesSink::stdout()));
    }
    if let Some(dir) = &cli.visualize {
        use_case = use_case.with_visualizer(Box::new(ImageFileVisualizer::new(dir)));
    }

    let mut source = JsonLinesFrameSource::open(&cli.input)?;
    let summary = use_case.run(&mut source, || {
        if let Some(watcher) = watcher.as_mut() {
            if let Err(e) = watcher.poll() {
                log::warn!("Keeping previous configuration: {e}");
            }
        }
    })?;

    log::info!(
        "Done: {} published, {} rejected, {} unreadable",
        summary.published,
        summary.rejected,
        summary.unreadable
    );
    if let Some(path) = &cli.output {
        log::info!("Output written to {}", path.display());
    }
    Ok(())
}

/// File values, then command-line overrides.
fn build_config(cli: &Cli) -> Result<FaceDetectionConfig, Box<dyn std::error::Error>> {
    let mut config = config_file::load(cli.config.as_deref())?;

    if let Some(v) = cli.confidence {
        config.confidence_threshold = v;
    }
    if let Some(v) = cli.roi_half_width {
        config.roi_half_width_meters = v;
    }
    if cli.use_centroid {
        config.use_top_point = false;
    }
    if let Some(v) = cli.head_offset_top {
        config.head_offset_top_meters = v;
    }
    if let Some(v) = cli.head_offset_centroid {
        config.head_offset_centroid_meters = v;
    }
    if let Some(v) = cli.min_upscale {
        config.min_upscale_pixels = v;
    }
    if cli.visualize.is_some() {
        config.visualization_enabled = true;
    }

    config.validate()?;
    log::info!("Configuration: {config:?}");
    Ok(config)
}

fn resolve_transforms(
    cli: &Cli,
    frames: &SensorFrames,
) -> Result<FrameTransforms, Box<dyn std::error::Error>> {
    let buffer = TransformBuffer::new();
    let loaded = transforms_file::load_into(&cli.transforms, &buffer)?;
    log::info!(
        "Loaded {loaded} transforms from {}",
        cli.transforms.display()
    );
    let timeout = lookup_timeout(cli.transform_timeout)?;
    Ok(FrameTransforms::resolve(&buffer, frames, timeout)?)
}

fn build_detector(cli: &Cli) -> Result<Arc<dyn FaceDetector>, Box<dyn std::error::Error>> {
    let working_dir = std::env::current_dir().ok();
    let model_path = model_locator::locate(
        DETECTOR_MODEL_NAME,
        cli.model.as_deref(),
        working_dir.as_deref(),
    )?;
    let base: Box<dyn FaceDetector> = Box::new(RustfaceDetector::from_file(&model_path)?);

    if cli.serialize_detector {
        Ok(Arc::new(SerializedDetector::new(base)))
    } else {
        Ok(Arc::from(base))
    }
}

fn config_path(cli: &Cli) -> Option<PathBuf> {
    cli.config.clone().or_else(config_file::default_config_path)
}

/// The file to watch: the explicit `--config`, or the platform default when
/// it exists (or is about to be written by `--save-config`).
fn watched_config_path(cli: &Cli) -> Option<PathBuf> {
    if !cli.watch_config {
        return None;
    }
    config_path(cli).filter(|p| cli.config.is_some() || cli.save_config || p.exists())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.input.exists() {
        return Err(format!("Input file not found: {}", cli.input.display()).into());
    }
    if !cli.transforms.exists() {
        return Err(format!("Transforms file not found: {}", cli.transforms.display()).into());
    }
    if cli.output.is_none() && !cli.stdout {
        return Err("Nothing to publish to: pass --output and/or --stdout".into());
    }
    lookup_timeout(cli.transform_timeout)?;
    if cli.workers == 0 {
        return Err("--workers must be at least 1".into());
    }
    if cli.watch_config && watched_config_path(cli).is_none() {
        return Err("--watch-config needs --config or an existing default config file".into());
    }
    if let Some(dir) = &cli.visualize {
        if dir.is_file() {
            return Err(format!("Visualization path is a file: {}", dir.display()).into());
        }
    }
    Ok(())
}

/// Seconds to a lookup timeout; rejects negative, non-finite and values
/// too large for a `Duration`.
fn lookup_timeout(seconds: f64) -> Result<Duration, String> {
    Duration::try_from_secs_f64(seconds)
        .map_err(|e| format!("Invalid transform timeout {seconds}: {e}"))
}
