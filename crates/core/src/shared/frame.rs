use ndarray::{s, ArrayView3, ArrayViewMut3};

use crate::shared::roi::Roi;

/// A single camera image: contiguous pixel bytes in row-major order.
///
/// Color frames are RGB (3 channels); the face locator works on
/// single-channel luma frames produced by [`Frame::to_grayscale`].
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    pub fn as_ndarray_mut(&mut self) -> ArrayViewMut3<'_, u8> {
        ArrayViewMut3::from_shape(self.shape(), &mut self.data)
            .expect("Frame data length must match dimensions")
    }

    /// Luma conversion with fixed-point BT.601 weights.
    ///
    /// Single-channel frames are returned as-is.
    pub fn to_grayscale(&self) -> Frame {
        if self.channels == 1 {
            return self.clone();
        }
        let data = self
            .data
            .chunks_exact(self.channels as usize)
            .map(|px| match px {
                [r, g, b, ..] => luma(*r, *g, *b),
                [v, ..] => *v,
                [] => 0,
            })
            .collect();
        Frame::new(data, self.width, self.height, 1, self.index)
    }

    /// Copies the pixels inside `roi`, clamped to the frame bounds.
    pub fn crop(&self, roi: &Roi) -> Frame {
        let roi = roi.clamped(self.width, self.height);
        let view = self.as_ndarray();
        let region = view.slice(s![
            roi.top as usize..roi.bottom as usize,
            roi.left as usize..roi.right as usize,
            ..
        ]);
        let data: Vec<u8> = region.iter().copied().collect();
        Frame::new(
            data,
            roi.width() as u32,
            roi.height() as u32,
            self.channels,
            self.index,
        )
    }

    /// Bilinear resize to `width x height`. Supports luma and RGB frames.
    pub fn resized(&self, width: u32, height: u32) -> Result<Frame, Box<dyn std::error::Error>> {
        let filter = image::imageops::FilterType::Triangle;
        let data = match self.channels {
            1 => {
                let img = image::GrayImage::from_raw(self.width, self.height, self.data.clone())
                    .ok_or("Failed to create luma image from frame data")?;
                image::imageops::resize(&img, width, height, filter).into_raw()
            }
            3 => {
                let img = image::RgbImage::from_raw(self.width, self.height, self.data.clone())
                    .ok_or("Failed to create RGB image from frame data")?;
                image::imageops::resize(&img, width, height, filter).into_raw()
            }
            n => return Err(format!("Cannot resize frame with {n} channels").into()),
        };
        Ok(Frame::new(data, width, height, self.channels, self.index))
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}

fn luma(r: u8, g: u8, b: u8) -> u8 {
    let y = r as u32 * 4899 + g as u32 * 9617 + b as u32 * 1868 + (1 << 13);
    (y >> 14) as u8
}
