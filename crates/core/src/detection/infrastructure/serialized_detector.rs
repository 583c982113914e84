use std::sync::Mutex;

use crate::detection::domain::face_detector::{
    DetectorError, ExclusiveFaceDetector, FaceDetector, ScoredBox,
};
use crate::shared::frame::Frame;

/// Decorator that serializes calls into a non-reentrant detector.
///
/// ROI workers still run cropping and resizing in parallel; only the
/// detector call itself is behind the lock.
pub struct SerializedDetector<D: ExclusiveFaceDetector> {
    inner: Mutex<D>,
}

impl<D: ExclusiveFaceDetector> SerializedDetector<D> {
    pub fn new(inner: D) -> Self {
        Self {
            inner: Mutex::new(inner),
        }
    }
}

impl<D: ExclusiveFaceDetector> FaceDetector for SerializedDetector<D> {
    fn detect(&self, region: &Frame, threshold: f64) -> Result<Vec<ScoredBox>, DetectorError> {
        let mut inner = self.inner.lock().map_err(|_| DetectorError::Poisoned)?;
        inner.detect(region, threshold)
    }
}
