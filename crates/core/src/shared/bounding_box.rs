use serde::{Deserialize, Serialize};

/// A located face in full-image pixel coordinates (`right`/`bottom` exclusive).
///
/// Unlike [`Roi`](crate::shared::roi::Roi), a face box is not clipped: the
/// detector may report a box that extends past the crop it searched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceBox {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl FaceBox {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }
}

/// The 2D box field carried by every cluster detection.
///
/// The all-zero box [`BoundingBox2D::NO_FACE`] is reserved: downstream
/// consumers must read it as "no face found for this detection", never as
/// a real detection at the image origin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox2D {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BoundingBox2D {
    pub const NO_FACE: BoundingBox2D = BoundingBox2D {
        x: 0,
        y: 0,
        width: 0,
        height: 0,
    };

    pub fn is_no_face(&self) -> bool {
        *self == Self::NO_FACE
    }
}

impl From<FaceBox> for BoundingBox2D {
    fn from(face: FaceBox) -> Self {
        Self {
            x: face.left,
            y: face.top,
            width: face.right - face.left,
            height: face.bottom - face.top,
        }
    }
}

impl From<Option<FaceBox>> for BoundingBox2D {
    fn from(face: Option<FaceBox>) -> Self {
        face.map_or(Self::NO_FACE, Self::from)
    }
}
