use crate::config::domain::face_detection_config::FaceDetectionConfig;
use crate::detection::domain::face_detector::{DetectorError, FaceDetector, ScoredBox};
use crate::shared::bounding_box::FaceBox;
use crate::shared::frame::Frame;
use crate::shared::roi::Roi;

/// Finds the best face inside one ROI of a grayscale frame.
///
/// Returns `Ok(None)` without calling the detector for a degenerate ROI, and
/// `Ok(None)` when the detector reports no candidate. Narrow ROIs are
/// upscaled to a `min_upscale_pixels` square first; the chosen box is
/// mapped back to full-image pixels.
pub fn locate(
    gray: &Frame,
    roi: &Roi,
    config: &FaceDetectionConfig,
    detector: &dyn FaceDetector,
) -> Result<Option<FaceBox>, DetectorError> {
    if roi.is_degenerate() {
        return Ok(None);
    }

    let crop = gray.crop(roi);
    let min_size = config.min_upscale_pixels;
    let width = roi.width();

    let (region, scaling_factor) = if min_size > 0 && (width as u32) < min_size {
        match crop.resized(min_size, min_size) {
            Ok(upscaled) => (upscaled, width as f64 / min_size as f64),
            Err(e) => {
                log::warn!("Failed to upscale ROI {roi:?}: {e}");
                return Ok(None);
            }
        }
    } else {
        (crop, 1.0)
    };

    let candidates = detector.detect(&region, config.confidence_threshold)?;
    Ok(best_candidate(candidates).map(|best| to_image_coordinates(&best, scaling_factor, roi)))
}

/// Highest score wins; ties keep the detector's original order.
fn best_candidate(mut candidates: Vec<ScoredBox>) -> Option<ScoredBox> {
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    candidates.into_iter().next()
}

/// Scales a crop-local box and translates it by the ROI origin.
///
/// Scaled coordinates are truncated toward zero before translation.
pub fn to_image_coordinates(candidate: &ScoredBox, scaling_factor: f64, roi: &Roi) -> FaceBox {
    let scale = |v: i32| (scaling_factor * v as f64) as i32;
    FaceBox::new(
        scale(candidate.left) + roi.left,
        scale(candidate.top) + roi.top,
        scale(candidate.right) + roi.left,
        scale(candidate.bottom) + roi.top,
    )
}
