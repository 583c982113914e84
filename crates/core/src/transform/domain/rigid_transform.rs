use nalgebra::{Isometry3, Matrix3, Matrix4, Quaternion, Translation3, UnitQuaternion, Vector3};

use crate::transform::domain::transform_resolver::TransformError;

const RIGIDITY_TOLERANCE: f64 = 1e-6;

/// Homogeneous 4x4 rotation + translation between two reference frames.
///
/// Maps points expressed in the source frame into the target frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RigidTransform {
    matrix: Matrix4<f64>,
}

impl RigidTransform {
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Validates that the upper-left 3x3 block is a proper rotation and the
    /// bottom row is `[0, 0, 0, 1]`.
    pub fn from_matrix(matrix: Matrix4<f64>) -> Result<Self, TransformError> {
        if matrix.iter().any(|v| !v.is_finite()) {
            return Err(TransformError::NotRigid("non-finite entries".into()));
        }
        let bottom_ok = matrix
            .row(3)
            .iter()
            .zip([0.0, 0.0, 0.0, 1.0])
            .all(|(actual, expected)| (actual - expected).abs() <= RIGIDITY_TOLERANCE);
        if !bottom_ok {
            return Err(TransformError::NotRigid(
                "bottom row must be [0, 0, 0, 1]".into(),
            ));
        }
        let rotation: Matrix3<f64> = matrix.fixed_view::<3, 3>(0, 0).into_owned();
        let orthogonality = (rotation.transpose() * rotation - Matrix3::identity()).amax();
        if orthogonality > RIGIDITY_TOLERANCE {
            return Err(TransformError::NotRigid(format!(
                "rotation block is not orthonormal (error {orthogonality:.3e})"
            )));
        }
        if (rotation.determinant() - 1.0).abs() > RIGIDITY_TOLERANCE {
            return Err(TransformError::NotRigid(
                "rotation block is a reflection".into(),
            ));
        }
        Ok(Self { matrix })
    }

    /// Builds a transform from a row-major 4x4 slice.
    pub fn from_row_slice(values: &[f64]) -> Result<Self, TransformError> {
        if values.len() != 16 {
            return Err(TransformError::NotRigid(format!(
                "expected 16 matrix entries, got {}",
                values.len()
            )));
        }
        Self::from_matrix(Matrix4::from_row_slice(values))
    }

    /// Builds a transform from a translation and an `[x, y, z, w]` quaternion.
    ///
    /// The quaternion is normalized; a (near) zero quaternion is rejected.
    pub fn from_translation_rotation(
        translation: [f64; 3],
        rotation: [f64; 4],
    ) -> Result<Self, TransformError> {
        if translation.iter().chain(rotation.iter()).any(|v| !v.is_finite()) {
            return Err(TransformError::NotRigid(
                "non-finite translation or rotation".into(),
            ));
        }
        let [qx, qy, qz, qw] = rotation;
        let rotation = UnitQuaternion::try_new(Quaternion::new(qw, qx, qy, qz), RIGIDITY_TOLERANCE)
            .ok_or_else(|| TransformError::NotRigid("rotation quaternion has zero norm".into()))?;
        let [tx, ty, tz] = translation;
        let isometry = Isometry3::from_parts(Translation3::new(tx, ty, tz), rotation);
        Ok(Self {
            matrix: isometry.to_homogeneous(),
        })
    }

    pub fn matrix(&self) -> &Matrix4<f64> {
        &self.matrix
    }

    pub fn rotation(&self) -> Matrix3<f64> {
        self.matrix.fixed_view::<3, 3>(0, 0).into_owned()
    }

    pub fn translation(&self) -> Vector3<f64> {
        self.matrix.fixed_view::<3, 1>(0, 3).into_owned()
    }

    pub fn inverse(&self) -> Self {
        let rt = self.rotation().transpose();
        let t = -(rt * self.translation());
        let mut matrix = Matrix4::identity();
        matrix.fixed_view_mut::<3, 3>(0, 0).copy_from(&rt);
        matrix.fixed_view_mut::<3, 1>(0, 3).copy_from(&t);
        Self { matrix }
    }

    /// `self` after `first`: maps `first`'s source frame into `self`'s target.
    pub fn compose(&self, first: &RigidTransform) -> Self {
        Self {
            matrix: self.matrix * first.matrix,
        }
    }

    /// Applies the full homogeneous transform (w = 1) and drops w.
    pub fn transform_point(&self, point: &Vector3<f64>) -> Vector3<f64> {
        (self.matrix * point.push(1.0)).xyz()
    }

    /// Applies only the rotation, for direction vectors.
    pub fn rotate(&self, vector: &Vector3<f64>) -> Vector3<f64> {
        self.rotation() * vector
    }
}

impl std::fmt::Display for RigidTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.matrix)
    }
}
