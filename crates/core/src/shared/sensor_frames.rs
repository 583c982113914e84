use crate::shared::constants::{COLOR_FRAME_SUFFIX, SOURCE_FRAME_SUFFIX, WORLD_FRAME};

/// Names of the three reference frames a sensor's processing depends on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SensorFrames {
    /// Frame the cluster detections are expressed in (depth camera).
    pub source: String,
    pub color: String,
    pub world: String,
}

impl SensorFrames {
    pub fn for_sensor(sensor_name: &str) -> Self {
        let sensor = normalize_frame_id(sensor_name);
        Self {
            source: format!("{sensor}{SOURCE_FRAME_SUFFIX}"),
            color: format!("{sensor}{COLOR_FRAME_SUFFIX}"),
            world: WORLD_FRAME.to_string(),
        }
    }
}

/// Frame ids compare without their optional leading slash.
pub fn normalize_frame_id(frame_id: &str) -> &str {
    frame_id.trim_start_matches('/')
}

pub fn same_frame(a: &str, b: &str) -> bool {
    normalize_frame_id(a) == normalize_frame_id(b)
}
