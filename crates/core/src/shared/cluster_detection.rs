use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::shared::bounding_box::BoundingBox2D;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn to_vector(self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }
}

/// One upstream human-cluster detection.
///
/// Only `top`, `centroid` and `box_2d` are interpreted here. Every other
/// field (3D box, identity, confidence, ...) is kept in `payload` and
/// serialized back untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClusterDetection {
    pub top: Point3,
    pub centroid: Point3,
    #[serde(rename = "box_2D", default)]
    pub box_2d: BoundingBox2D,
    #[serde(flatten)]
    pub payload: serde_json::Map<String, serde_json::Value>,
}

impl ClusterDetection {
    pub fn new(top: Point3, centroid: Point3) -> Self {
        Self {
            top,
            centroid,
            box_2d: BoundingBox2D::default(),
            payload: serde_json::Map::new(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Header {
    #[serde(default)]
    pub seq: u64,
    #[serde(default)]
    pub stamp: f64,
    pub frame_id: String,
}

/// A frame's worth of cluster detections, tagged with the reference frame
/// their 3D points are expressed in.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionArray {
    pub header: Header,
    #[serde(default)]
    pub detections: Vec<ClusterDetection>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_fields_round_trip_through_payload() {
        let json = serde_json::json!({
            "top": {"x": 0.1, "y": -0.9, "z": 2.0},
            "centroid": {"x": 0.1, "y": -0.2, "z": 2.0},
            "box_2D": {"x": 1, "y": 2, "width": 3, "height": 4},
            "confidence": 0.83,
            "box_3D": {"p1": {"x": 0.0, "y": 0.0, "z": 0.0}},
            "height": 1.74
        });

        let detection: ClusterDetection = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(detection.top, Point3::new(0.1, -0.9, 2.0));
        assert_eq!(detection.box_2d.width, 3);
        assert_eq!(detection.payload.len(), 3);
        assert_eq!(serde_json::to_value(&detection).unwrap(), json);
    }

    #[test]
    fn test_missing_box_defaults_to_zero() {
        let json = serde_json::json!({
            "top": {"x": 0.0, "y": 0.0, "z": 1.0},
            "centroid": {"x": 0.0, "y": 0.0, "z": 1.0}
        });
        let detection: ClusterDetection = serde_json::from_value(json).unwrap();
        assert!(detection.box_2d.is_no_face());
        assert!(detection.payload.is_empty());
    }

    #[test]
    fn test_header_defaults() {
        let array: DetectionArray =
            serde_json::from_value(serde_json::json!({"header": {"frame_id": "ir"}})).unwrap();
        assert_eq!(array.header.frame_id, "ir");
        assert_eq!(array.header.seq, 0);
        assert!(array.detections.is_empty());
    }

    #[test]
    fn test_point_to_vector() {
        let v = Point3::new(1.0, 2.0, 3.0).to_vector();
        assert_eq!(v, Vector3::new(1.0, 2.0, 3.0));
    }
}
