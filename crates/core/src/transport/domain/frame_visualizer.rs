use std::time::Duration;

use crate::shared::bounding_box::FaceBox;
use crate::shared::frame::Frame;
use crate::shared::roi::Roi;

/// Renders a processed frame with its ROIs and located faces.
pub trait FrameVisualizer: Send {
    fn show(
        &mut self,
        frame: &Frame,
        rois: &[Roi],
        faces: &[Option<FaceBox>],
        processing_time: Duration,
    ) -> Result<(), Box<dyn std::error::Error>>;
}
