use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::detection::domain::face_detector::{DetectorError, FaceDetector, ScoredBox};
use crate::shared::frame::Frame;

/// Smallest face the funnel cascade can find; smaller regions are skipped.
const MIN_FACE_SIZE: u32 = 20;
const PYRAMID_SCALE_FACTOR: f32 = 0.8;
const SLIDE_WINDOW_STEP: u32 = 4;

/// Face detector backed by the `rustface` crate (SeetaFace funnel cascade).
///
/// The model is loaded once; each call builds a detector from a clone of
/// it, so concurrent calls share no mutable state.
pub struct RustfaceDetector {
    model: rustface::Model,
}

impl RustfaceDetector {
    /// Loads a SeetaFace model file. Failure here is fatal to startup.
    pub fn from_file(path: &Path) -> Result<Self, DetectorError> {
        let load_err = |reason: String| DetectorError::ModelLoad {
            path: path.to_path_buf(),
            reason,
        };
        let file = File::open(path).map_err(|e| load_err(e.to_string()))?;
        let model =
            rustface::read_model(BufReader::new(file)).map_err(|e| load_err(e.to_string()))?;
        log::info!("Loaded face detector model from {}", path.display());
        Ok(Self { model })
    }
}

impl FaceDetector for RustfaceDetector {
    fn detect(&self, region: &Frame, threshold: f64) -> Result<Vec<ScoredBox>, DetectorError> {
        if region.channels() != 1 {
            return Err(DetectorError::UnsupportedRegion(region.channels()));
        }
        if region.width() < MIN_FACE_SIZE || region.height() < MIN_FACE_SIZE {
            return Ok(Vec::new());
        }

        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(MIN_FACE_SIZE);
        detector.set_score_thresh(threshold);
        detector.set_pyramid_scale_factor(PYRAMID_SCALE_FACTOR);
        detector.set_slide_window_step(SLIDE_WINDOW_STEP, SLIDE_WINDOW_STEP);

        let image = rustface::ImageData::new(region.data(), region.width(), region.height());
        let faces = detector.detect(&image);

        Ok(faces
            .iter()
            .filter(|face| face.score() >= threshold)
            .map(|face| {
                let bbox = face.bbox();
                ScoredBox {
                    left: bbox.x(),
                    top: bbox.y(),
                    right: bbox.x() + bbox.width() as i32,
                    bottom: bbox.y() + bbox.height() as i32,
                    score: face.score(),
                }
            })
            .collect())
    }
}
