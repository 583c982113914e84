use std::time::Duration;

pub const DEFAULT_SENSOR_NAME: &str = "kinect2_head";

pub const WORLD_FRAME: &str = "world";
pub const SOURCE_FRAME_SUFFIX: &str = "_ir_optical_frame";
pub const COLOR_FRAME_SUFFIX: &str = "_rgb_optical_frame";

/// Bounded wait for the startup transform lookups.
pub const TRANSFORM_LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Workers used for per-ROI face location.
pub const DEFAULT_LOCATOR_WORKERS: usize = 3;

pub const DETECTOR_MODEL_NAME: &str = "seeta_fd_frontal_v1.0.bin";

/// Width annotated frames are scaled down to before being written.
pub const VISUALIZATION_WIDTH: u32 = 480;
