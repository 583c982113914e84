use nalgebra::Vector3;

use crate::config::domain::face_detection_config::FaceDetectionConfig;
use crate::shared::camera_model::CameraModel;
use crate::shared::cluster_detection::ClusterDetection;
use crate::shared::roi::Roi;
use crate::transform::domain::transform_resolver::FrameTransforms;

/// Computes one head ROI per cluster detection in color-image pixels.
///
/// The estimated face center is the chosen cluster point plus a vertical
/// offset, still in the depth frame; only then is it moved into the color
/// frame and projected. The ROI is a square whose pixel size follows the
/// perspective scale at the estimated depth.
pub struct RoiProjector {
    transforms: FrameTransforms,
}

impl RoiProjector {
    pub fn new(transforms: FrameTransforms) -> Self {
        Self { transforms }
    }

    /// The world-vertical head offset, expressed in color-frame orientation.
    pub fn head_offset(&self, config: &FaceDetectionConfig) -> Vector3<f64> {
        self.transforms
            .world_to_color
            .rotate(&Vector3::new(0.0, 0.0, config.head_offset_z()))
    }

    /// Returns exactly one ROI per detection, in input order.
    ///
    /// Detections whose face center lands at or behind the camera, or that
    /// project to a non-finite pixel, get [`Roi::EMPTY`].
    pub fn project(
        &self,
        camera: &CameraModel,
        detections: &[ClusterDetection],
        config: &FaceDetectionConfig,
    ) -> Vec<Roi> {
        if detections.is_empty() {
            return Vec::new();
        }

        let offset = self.head_offset(config);
        detections
            .iter()
            .map(|detection| {
                let anchor = if config.use_top_point {
                    detection.top
                } else {
                    detection.centroid
                };
                let face_in_depth = anchor.to_vector() + offset;
                let face_in_color = self.transforms.depth_to_color.transform_point(&face_in_depth);
                roi_for(camera, &face_in_color, config.roi_half_width_meters)
            })
            .collect()
    }
}

/// Pixel half-width of a `half_width_meters` span seen at depth `z`.
///
/// `None` when the depth is not strictly positive or the result not finite.
pub fn half_width_pixels(camera: &CameraModel, half_width_meters: f64, z: f64) -> Option<f64> {
    if !(z > 0.0) {
        return None;
    }
    let half = half_width_meters * camera.fx() / z;
    half.is_finite().then_some(half)
}

fn roi_for(camera: &CameraModel, point: &Vector3<f64>, half_width_meters: f64) -> Roi {
    let Some(uv) = camera.project(point) else {
        return Roi::EMPTY;
    };
    let Some(half) = half_width_pixels(camera, half_width_meters, point.z) else {
        return Roi::EMPTY;
    };
    Roi::square_around(uv.x, uv.y, half, camera.width(), camera.height())
}
