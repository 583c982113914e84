use std::path::PathBuf;

use thiserror::Error;

use crate::shared::frame::Frame;

#[derive(Error, Debug)]
pub enum DetectorError {
    #[error("failed to load face detector model {path}: {reason}")]
    ModelLoad { path: PathBuf, reason: String },
    #[error("detector expects a single-channel region, got {0} channels")]
    UnsupportedRegion(u8),
    #[error("face detector panicked while holding its lock")]
    Poisoned,
}

/// A candidate face in the coordinates of the region it was found in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoredBox {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub score: f64,
}

/// Domain interface for the external face detector.
///
/// Given a grayscale region and a confidence threshold, returns every
/// candidate at or above the threshold. Implementations must be
/// deterministic for identical input and safe to call from several
/// workers at once.
pub trait FaceDetector: Send + Sync {
    fn detect(&self, region: &Frame, threshold: f64) -> Result<Vec<ScoredBox>, DetectorError>;
}

/// A detector that needs exclusive access for each call.
///
/// Wrap one in [`SerializedDetector`](crate::detection::infrastructure::serialized_detector::SerializedDetector)
/// to use it where a [`FaceDetector`] is expected.
pub trait ExclusiveFaceDetector: Send {
    fn detect(&mut self, region: &Frame, threshold: f64)
        -> Result<Vec<ScoredBox>, DetectorError>;
}

/// Any shared detector can be used where exclusive access is expected,
/// e.g. to cap a heavy backend at one call at a time.
impl<D: FaceDetector + ?Sized> ExclusiveFaceDetector for Box<D> {
    fn detect(&mut self, region: &Frame, threshold: f64) -> Result<Vec<ScoredBox>, DetectorError> {
        FaceDetector::detect(&**self, region, threshold)
    }
}
