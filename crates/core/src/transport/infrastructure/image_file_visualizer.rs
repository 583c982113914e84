use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::shared::bounding_box::FaceBox;
use crate::shared::constants::VISUALIZATION_WIDTH;
use crate::shared::frame::Frame;
use crate::shared::roi::Roi;
use crate::transport::domain::frame_visualizer::FrameVisualizer;

const ROI_COLOR: [u8; 3] = [0, 255, 0];
const FACE_COLOR: [u8; 3] = [255, 0, 0];
const LINE_THICKNESS: i32 = 4;

/// Annotates frames with ROI (green) and face (red) outlines and writes
/// them as PNG files, one per frame, into an output directory.
///
/// Frames wider than the target width are downscaled, keeping the aspect
/// ratio, after annotation.
pub struct ImageFileVisualizer {
    output_dir: PathBuf,
    target_width: u32,
}

impl ImageFileVisualizer {
    pub fn new(output_dir: &Path) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
            target_width: VISUALIZATION_WIDTH,
        }
    }

    pub fn with_target_width(mut self, target_width: u32) -> Self {
        self.target_width = target_width.max(1);
        self
    }

    pub fn path_for(&self, frame_index: usize) -> PathBuf {
        self.output_dir.join(format!("frame_{frame_index:06}.png"))
    }
}

/// Returns a copy of `frame` with the outlines drawn in.
pub fn annotate(frame: &Frame, rois: &[Roi], faces: &[Option<FaceBox>]) -> Frame {
    let mut annotated = frame.clone();
    for roi in rois.iter().filter(|r| !r.is_degenerate()) {
        draw_outline(
            &mut annotated,
            (roi.left, roi.top, roi.right, roi.bottom),
            ROI_COLOR,
        );
    }
    for face in faces.iter().flatten() {
        draw_outline(
            &mut annotated,
            (face.left, face.top, face.right, face.bottom),
            FACE_COLOR,
        );
    }
    annotated
}

/// Draws a `LINE_THICKNESS` wide outline centered on the box edges,
/// clipped to the frame.
fn draw_outline(frame: &mut Frame, (left, top, right, bottom): (i32, i32, i32, i32), color: [u8; 3]) {
    let half = LINE_THICKNESS / 2;
    let x0 = (left - half).max(0);
    let y0 = (top - half).max(0);
    let x1 = (right + half).min(frame.width() as i32);
    let y1 = (bottom + half).min(frame.height() as i32);
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    let mut pixels = frame.as_ndarray_mut();
    for y in y0..y1 {
        for x in x0..x1 {
            let on_edge = x < left + half
                || x >= right - half
                || y < top + half
                || y >= bottom - half;
            if !on_edge {
                continue;
            }
            for (c, value) in color.iter().enumerate() {
                pixels[[y as usize, x as usize, c]] = *value;
            }
        }
    }
}

impl FrameVisualizer for ImageFileVisualizer {
    fn show(
        &mut self,
        frame: &Frame,
        rois: &[Roi],
        faces: &[Option<FaceBox>],
        processing_time: Duration,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if frame.channels() != 3 {
            return Err(format!("Cannot annotate frame with {} channels", frame.channels()).into());
        }

        let annotated = annotate(frame, rois, faces);
        let annotated = if annotated.width() > self.target_width {
            let height = (u64::from(annotated.height()) * u64::from(self.target_width)
                / u64::from(annotated.width()))
            .max(1) as u32;
            annotated.resized(self.target_width, height)?
        } else {
            annotated
        };

        std::fs::create_dir_all(&self.output_dir)?;
        let path = self.path_for(frame.index());
        image::RgbImage::from_raw(annotated.width(), annotated.height(), annotated.data().to_vec())
            .ok_or("Failed to create image from frame data")?
            .save(&path)?;

        let ms = processing_time.as_secs_f64() * 1000.0;
        let fps = if ms > 0.0 { 1000.0 / ms } else { 0.0 };
        log::info!("{ms:.2}msec / {fps:.2}fps ({})", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn black(width: u32, height: u32) -> Frame {
        Frame::new(vec![0; (width * height * 3) as usize], width, height, 3, 5)
    }

    fn pixel(frame: &Frame, x: usize, y: usize) -> [u8; 3] {
        let i = (y * frame.width() as usize + x) * 3;
        [frame.data()[i], frame.data()[i + 1], frame.data()[i + 2]]
    }

    #[test]
    fn test_outlines_drawn_in_their_colors() {
        let frame = black(100, 100);
        let annotated = annotate(
            &frame,
            &[Roi::new(10, 10, 90, 90)],
            &[Some(FaceBox::new(40, 40, 60, 60)), None],
        );

        assert_eq!(pixel(&annotated, 10, 50), ROI_COLOR);
        assert_eq!(pixel(&annotated, 8, 50), ROI_COLOR);
        assert_eq!(pixel(&annotated, 11, 50), ROI_COLOR);
        assert_eq!(pixel(&annotated, 12, 50), [0, 0, 0]);
        assert_eq!(pixel(&annotated, 50, 40), FACE_COLOR);
        assert_eq!(pixel(&annotated, 50, 50), [0, 0, 0]);
        assert_eq!(pixel(&frame, 10, 50), [0, 0, 0]);
    }

    #[test]
    fn test_degenerate_roi_not_drawn() {
        let annotated = annotate(&black(20, 20), &[Roi::EMPTY], &[]);
        assert!(annotated.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_outline_clipped_to_frame() {
        let annotated = annotate(&black(20, 20), &[], &[Some(FaceBox::new(-10, -10, 5, 30))]);
        assert_eq!(pixel(&annotated, 4, 10), FACE_COLOR);
        assert_eq!(pixel(&annotated, 10, 10), [0, 0, 0]);
    }

    #[test]
    fn test_show_writes_downscaled_png() {
        let dir = tempfile::tempdir().unwrap();
        let mut visualizer = ImageFileVisualizer::new(dir.path()).with_target_width(50);

        visualizer
            .show(
                &black(100, 60),
                &[Roi::new(10, 10, 50, 50)],
                &[None],
                Duration::from_millis(20),
            )
            .unwrap();

        let written = image::open(visualizer.path_for(5)).unwrap();
        assert_eq!((written.width(), written.height()), (50, 30));
    }

    #[test]
    fn test_small_frame_kept_at_full_size() {
        let dir = tempfile::tempdir().unwrap();
        let mut visualizer = ImageFileVisualizer::new(dir.path());

        visualizer
            .show(&black(64, 48), &[], &[], Duration::ZERO)
            .unwrap();

        let written = image::open(visualizer.path_for(5)).unwrap();
        assert_eq!((written.width(), written.height()), (64, 48));
    }

    #[test]
    fn test_luma_frame_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut visualizer = ImageFileVisualizer::new(dir.path());
        let gray = Frame::new(vec![0; 16], 4, 4, 1, 0);

        assert!(visualizer.show(&gray, &[], &[], Duration::ZERO).is_err());
    }
}
