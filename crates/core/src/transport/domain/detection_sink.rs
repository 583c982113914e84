use crate::shared::cluster_detection::DetectionArray;

/// An enriched detection array and its JSON encoding.
///
/// Encoded once per frame, before any sink is written, so an encoding
/// failure reaches no sink at all.
#[derive(Debug)]
pub struct EncodedDetections<'a> {
    pub detections: &'a DetectionArray,
    pub json: String,
}

impl<'a> EncodedDetections<'a> {
    pub fn encode(detections: &'a DetectionArray) -> Result<Self, serde_json::Error> {
        Ok(Self {
            detections,
            json: serde_json::to_string(detections)?,
        })
    }
}

/// Receives each enriched detection array exactly once per accepted frame.
pub trait DetectionSink: Send {
    fn publish(&mut self, frame: &EncodedDetections<'_>) -> Result<(), Box<dyn std::error::Error>>;
}
