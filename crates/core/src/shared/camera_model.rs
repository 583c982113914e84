use nalgebra::{Matrix3, Vector2, Vector3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum CameraModelError {
    #[error("intrinsic matrix must have 9 elements, got {0}")]
    IntrinsicsShape(usize),
    #[error("intrinsic matrix contains non-finite values")]
    NonFiniteIntrinsics,
    #[error("focal length must be positive, got fx={fx} fy={fy}")]
    FocalLength { fx: f64, fy: f64 },
}

/// Raw per-frame camera metadata as published alongside the color image.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraInfo {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub distortion_model: String,
    #[serde(rename = "K")]
    pub k: Vec<f64>,
    #[serde(rename = "D", default)]
    pub d: Vec<f64>,
}

/// Pinhole intrinsics plus OpenCV-style lens distortion for one frame.
///
/// Distortion coefficients follow the `(k1, k2, p1, p2[, k3[, k4, k5, k6
/// [, s1, s2, s3, s4]]])` layout; missing trailing terms are zero.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraModel {
    intrinsics: Matrix3<f64>,
    distortion: Vec<f64>,
    width: u32,
    height: u32,
}

impl CameraModel {
    pub fn new(
        k: &[f64],
        distortion: &[f64],
        width: u32,
        height: u32,
    ) -> Result<Self, CameraModelError> {
        if k.len() != 9 {
            return Err(CameraModelError::IntrinsicsShape(k.len()));
        }
        if k.iter().any(|v| !v.is_finite()) {
            return Err(CameraModelError::NonFiniteIntrinsics);
        }
        let intrinsics = Matrix3::from_row_slice(k);
        let (fx, fy) = (intrinsics[(0, 0)], intrinsics[(1, 1)]);
        if fx <= 0.0 || fy <= 0.0 {
            return Err(CameraModelError::FocalLength { fx, fy });
        }
        Ok(Self {
            intrinsics,
            distortion: distortion.to_vec(),
            width,
            height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn fx(&self) -> f64 {
        self.intrinsics[(0, 0)]
    }

    pub fn fy(&self) -> f64 {
        self.intrinsics[(1, 1)]
    }

    pub fn cx(&self) -> f64 {
        self.intrinsics[(0, 2)]
    }

    pub fn cy(&self) -> f64 {
        self.intrinsics[(1, 2)]
    }

    pub fn distortion(&self) -> &[f64] {
        &self.distortion
    }

    /// Projects a point given in this camera's frame onto the image plane.
    ///
    /// Returns `None` for points at or behind the camera, and for any
    /// projection that is not finite.
    pub fn project(&self, point: &Vector3<f64>) -> Option<Vector2<f64>> {
        if !(point.z > 0.0) {
            return None;
        }
        let x = point.x / point.z;
        let y = point.y / point.z;
        let (xd, yd) = self.distort(x, y);
        let uv = Vector2::new(self.fx() * xd + self.cx(), self.fy() * yd + self.cy());
        (uv.x.is_finite() && uv.y.is_finite()).then_some(uv)
    }

    fn distort(&self, x: f64, y: f64) -> (f64, f64) {
        let c = |i: usize| self.distortion.get(i).copied().unwrap_or(0.0);
        let (k1, k2, p1, p2, k3) = (c(0), c(1), c(2), c(3), c(4));
        let (k4, k5, k6) = (c(5), c(6), c(7));
        let (s1, s2, s3, s4) = (c(8), c(9), c(10), c(11));

        let r2 = x * x + y * y;
        let r4 = r2 * r2;
        let r6 = r4 * r2;
        let radial = (1.0 + k1 * r2 + k2 * r4 + k3 * r6) / (1.0 + k4 * r2 + k5 * r4 + k6 * r6);
        let a1 = 2.0 * x * y;

        let xd = x * radial + p1 * a1 + p2 * (r2 + 2.0 * x * x) + s1 * r2 + s2 * r4;
        let yd = y * radial + p1 * (r2 + 2.0 * y * y) + p2 * a1 + s3 * r2 + s4 * r4;
        (xd, yd)
    }
}

impl TryFrom<&CameraInfo> for CameraModel {
    type Error = CameraModelError;

    fn try_from(info: &CameraInfo) -> Result<Self, Self::Error> {
        CameraModel::new(&info.k, &info.d, info.width, info.height)
    }
}
