use thiserror::Error;

use crate::shared::bounding_box::{BoundingBox2D, FaceBox};
use crate::shared::cluster_detection::ClusterDetection;

#[derive(Error, Debug, PartialEq, Eq)]
#[error("got {faces} face results for {detections} detections")]
pub struct LengthMismatch {
    pub detections: usize,
    pub faces: usize,
}

/// Writes each face result into the matching detection's `box_2d`.
///
/// Pairs by index. An absent face becomes [`BoundingBox2D::NO_FACE`]; no
/// other field of any detection is touched. Returns how many faces were
/// found.
pub fn merge_faces(
    detections: &mut [ClusterDetection],
    faces: &[Option<FaceBox>],
) -> Result<usize, LengthMismatch> {
    if detections.len() != faces.len() {
        return Err(LengthMismatch {
            detections: detections.len(),
            faces: faces.len(),
        });
    }

    for (detection, face) in detections.iter_mut().zip(faces) {
        detection.box_2d = BoundingBox2D::from(*face);
    }
    Ok(faces.iter().filter(|f| f.is_some()).count())
}
