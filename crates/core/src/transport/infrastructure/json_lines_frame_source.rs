use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::shared::camera_model::CameraInfo;
use crate::shared::cluster_detection::DetectionArray;
use crate::shared::frame::Frame;
use crate::transport::domain::frame_source::{FrameInput, FrameSource};

/// One line of a frame replay file.
#[derive(Debug, Deserialize)]
struct FrameRecord {
    /// Color image path, relative to the replay file's directory.
    image: PathBuf,
    camera_info: CameraInfo,
    detections: DetectionArray,
}

/// Replays recorded frames from a JSON-lines file.
///
/// Each non-empty line holds `{"image": ..., "camera_info": ...,
/// "detections": ...}`. Images are decoded with the `image` crate into RGB
/// frames; the frame index is the record's position among non-empty lines.
pub struct JsonLinesFrameSource {
    reader: BufReader<File>,
    base_dir: PathBuf,
}

impl JsonLinesFrameSource {
    pub fn open(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let file = File::open(path)
            .map_err(|e| format!("Failed to open frame file {}: {e}", path.display()))?;
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(Self {
            reader: BufReader::new(file),
            base_dir,
        })
    }
}

impl FrameSource for JsonLinesFrameSource {
    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<FrameInput, Box<dyn std::error::Error>>> + '_> {
        let base_dir = self.base_dir.clone();
        let lines = (&mut self.reader)
            .lines()
            .enumerate()
            .filter(|(_, line)| !matches!(line, Ok(text) if text.trim().is_empty()));

        Box::new(lines.enumerate().map(
            move |(index, (line_number, line))| -> Result<FrameInput, Box<dyn std::error::Error>> {
                let line = line?;
                parse_record(&line, &base_dir, index)
                    .map_err(|e| format!("line {}: {e}", line_number + 1).into())
            },
        ))
    }
}

fn parse_record(
    line: &str,
    base_dir: &Path,
    index: usize,
) -> Result<FrameInput, Box<dyn std::error::Error>> {
    let record: FrameRecord = serde_json::from_str(line)?;
    let image_path = base_dir.join(&record.image);
    let rgb = image::open(&image_path)
        .map_err(|e| format!("Failed to read image {}: {e}", image_path.display()))?
        .to_rgb8();
    let (width, height) = rgb.dimensions();

    Ok(FrameInput {
        image: Frame::new(rgb.into_raw(), width, height, 3, index),
        camera_info: record.camera_info,
        detections: record.detections,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_image(dir: &Path, name: &str, width: u32, height: u32) {
        image::RgbImage::from_pixel(width, height, image::Rgb([10, 200, 30]))
            .save(dir.join(name))
            .unwrap();
    }

    fn record(image: &str, frame_id: &str, detections: usize) -> String {
        let detections: Vec<serde_json::Value> = (0..detections)
            .map(|i| {
                serde_json::json!({
                    "top": {"x": 0.0, "y": -0.5, "z": 2.0 + i as f64},
                    "centroid": {"x": 0.0, "y": 0.0, "z": 2.0 + i as f64},
                    "track_id": i,
                })
            })
            .collect();
        serde_json::json!({
            "image": image,
            "camera_info": {
                "width": 8,
                "height": 6,
                "K": [500.0, 0.0, 4.0, 0.0, 500.0, 3.0, 0.0, 0.0, 1.0],
            },
            "detections": {
                "header": {"seq": 1, "frame_id": frame_id},
                "detections": detections,
            },
        })
        .to_string()
    }

    #[test]
    fn test_reads_frames_relative_to_file() {
        let dir = tempfile::tempdir().unwrap();
        write_image(dir.path(), "a.png", 8, 6);
        write_image(dir.path(), "b.png", 8, 6);
        let path = dir.path().join("frames.jsonl");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "{}", record("a.png", "kinect2_head_ir_optical_frame", 2)).unwrap();
        writeln!(file).unwrap();
        writeln!(file, "{}", record("b.png", "kinect2_head_ir_optical_frame", 0)).unwrap();
        drop(file);

        let mut source = JsonLinesFrameSource::open(&path).unwrap();
        let frames: Vec<FrameInput> = source.frames().map(|f| f.unwrap()).collect();

        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].image.width(), 8);
        assert_eq!(frames[0].image.channels(), 3);
        assert_eq!(&frames[0].image.data()[..3], &[10, 200, 30]);
        assert_eq!(frames[0].detections.detections.len(), 2);
        assert_eq!(frames[0].detections.detections[1].payload["track_id"], 1);
        assert_eq!(frames[0].camera_info.k[2], 4.0);
        assert_eq!(frames[1].image.index(), 1);
        assert!(frames[1].detections.detections.is_empty());
    }

    #[test]
    fn test_bad_record_does_not_stop_iteration() {
        let dir = tempfile::tempdir().unwrap();
        write_image(dir.path(), "a.png", 8, 6);
        let path = dir.path().join("frames.jsonl");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "{}", record("missing.png", "f", 1)).unwrap();
        writeln!(file, "{{not json").unwrap();
        writeln!(file, "{}", record("a.png", "f", 1)).unwrap();
        drop(file);

        let mut source = JsonLinesFrameSource::open(&path).unwrap();
        let results: Vec<_> = source.frames().collect();

        assert_eq!(results.len(), 3);
        let first = results[0].as_ref().unwrap_err().to_string();
        assert!(first.starts_with("line 1:"), "{first}");
        assert!(first.contains("missing.png"), "{first}");
        assert!(results[1].as_ref().unwrap_err().to_string().starts_with("line 2:"));
        assert!(results[2].is_ok());
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(JsonLinesFrameSource::open(&dir.path().join("nope.jsonl")).is_err());
    }
}
