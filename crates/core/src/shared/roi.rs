use serde::{Deserialize, Serialize};

/// Axis-aligned pixel rectangle the face detector searches in.
///
/// Edges are half-open: columns `left..right`, rows `top..bottom`.
/// A ROI with zero width or height is degenerate and never reaches
/// the detector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roi {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Roi {
    pub const EMPTY: Roi = Roi {
        left: 0,
        top: 0,
        right: 0,
        bottom: 0,
    };

    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Square of half-size `half` centered at `(u, v)`, clipped to the image.
    ///
    /// Edges are truncated toward zero before clipping. Width and height
    /// are floored at zero, so a square entirely outside the image comes
    /// back degenerate rather than inverted.
    pub fn square_around(u: f64, v: f64, half: f64, image_width: u32, image_height: u32) -> Roi {
        let unclipped = Roi::new(
            (u - half) as i32,
            (v - half) as i32,
            (u + half) as i32,
            (v + half) as i32,
        );
        unclipped.clamped(image_width, image_height)
    }

    /// Clamps every edge into `[0, width] x [0, height]`.
    pub fn clamped(&self, image_width: u32, image_height: u32) -> Roi {
        let max_x = image_width.min(i32::MAX as u32) as i32;
        let max_y = image_height.min(i32::MAX as u32) as i32;
        let left = self.left.clamp(0, max_x);
        let top = self.top.clamp(0, max_y);
        let right = self.right.clamp(0, max_x);
        let bottom = self.bottom.clamp(0, max_y);
        Roi::new(
            left,
            top,
            left + (right - left).max(0),
            top + (bottom - top).max(0),
        )
    }

    pub fn width(&self) -> i32 {
        (self.right - self.left).max(0)
    }

    pub fn height(&self) -> i32 {
        (self.bottom - self.top).max(0)
    }

    pub fn is_degenerate(&self) -> bool {
        self.right <= self.left || self.bottom <= self.top
    }
}
