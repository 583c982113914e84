use crate::shared::camera_model::CameraInfo;
use crate::shared::cluster_detection::DetectionArray;
use crate::shared::frame::Frame;

/// Everything that arrives together for one frame: the color image, its
/// camera metadata and the cluster detections to enrich.
#[derive(Clone, Debug)]
pub struct FrameInput {
    pub image: Frame,
    pub camera_info: CameraInfo,
    pub detections: DetectionArray,
}

/// Supplies synchronized frame inputs in arrival order.
pub trait FrameSource: Send {
    /// Returns an iterator over frame inputs. A failed item only affects
    /// that frame; iteration may continue past it.
    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<FrameInput, Box<dyn std::error::Error>>> + '_>;
}
