use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write config {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error("config update channel closed")]
    ChannelClosed,
}

/// Runtime-tunable parameters of face localization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaceDetectionConfig {
    /// Minimum detector score for a face to count.
    pub confidence_threshold: f64,
    /// Half the physical width of the head ROI, in meters.
    pub roi_half_width_meters: f64,
    /// Anchor the ROI on the cluster's top point instead of its centroid.
    pub use_top_point: bool,
    /// Vertical offset from the top point to the face center, in meters.
    pub head_offset_top_meters: f64,
    /// Vertical offset from the centroid to the face center, in meters.
    pub head_offset_centroid_meters: f64,
    /// ROIs narrower than this are upscaled to a square of this size.
    pub min_upscale_pixels: u32,
    pub visualization_enabled: bool,
}

impl Default for FaceDetectionConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.0,
            roi_half_width_meters: 0.2,
            use_top_point: true,
            head_offset_top_meters: -0.1,
            head_offset_centroid_meters: 0.4,
            min_upscale_pixels: 100,
            visualization_enabled: false,
        }
    }
}

impl FaceDetectionConfig {
    /// Offset along the world's vertical axis for the configured anchor point.
    pub fn head_offset_z(&self) -> f64 {
        if self.use_top_point {
            self.head_offset_top_meters
        } else {
            self.head_offset_centroid_meters
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            ("confidence_threshold", self.confidence_threshold),
            ("roi_half_width_meters", self.roi_half_width_meters),
            ("head_offset_top_meters", self.head_offset_top_meters),
            ("head_offset_centroid_meters", self.head_offset_centroid_meters),
        ];
        if let Some((name, value)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "{name} must be finite, got {value}"
            )));
        }
        if self.roi_half_width_meters <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "roi_half_width_meters must be positive, got {}",
                self.roi_half_width_meters
            )));
        }
        if self.min_upscale_pixels == 0 {
            return Err(ConfigError::Invalid(
                "min_upscale_pixels must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
