use crate::config::domain::face_detection_config::FaceDetectionConfig;
use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::domain::face_locator;
use crate::shared::bounding_box::FaceBox;
use crate::shared::frame::Frame;
use crate::shared::roi::Roi;

/// Runs the face locator over every ROI of one frame.
///
/// Implementations may work in any order or in parallel, but the result
/// always has one entry per ROI at the ROI's index.
pub trait RoiExecutor: Send {
    fn locate_all(
        &self,
        gray: &Frame,
        rois: &[Roi],
        config: &FaceDetectionConfig,
        detector: &dyn FaceDetector,
    ) -> Vec<Option<FaceBox>>;
}

/// Locates one ROI, turning a detector failure into an absent face.
pub(crate) fn locate_or_absent(
    gray: &Frame,
    roi: &Roi,
    config: &FaceDetectionConfig,
    detector: &dyn FaceDetector,
) -> Option<FaceBox> {
    match face_locator::locate(gray, roi, config, detector) {
        Ok(face) => face,
        Err(e) => {
            log::warn!("Face detection failed in ROI {roi:?}: {e}");
            None
        }
    }
}

/// Processes ROIs one after another on the calling thread.
pub struct SequentialRoiExecutor;

impl RoiExecutor for SequentialRoiExecutor {
    fn locate_all(
        &self,
        gray: &Frame,
        rois: &[Roi],
        config: &FaceDetectionConfig,
        detector: &dyn FaceDetector,
    ) -> Vec<Option<FaceBox>> {
        rois.iter()
            .map(|roi| locate_or_absent(gray, roi, config, detector))
            .collect()
    }
}
