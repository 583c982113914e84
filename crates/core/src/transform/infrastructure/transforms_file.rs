use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::transform::domain::rigid_transform::RigidTransform;
use crate::transform::domain::transform_resolver::TransformError;
use crate::transform::infrastructure::transform_buffer::TransformBuffer;

/// One static transform entry: either a full row-major matrix or a
/// translation plus `[x, y, z, w]` quaternion.
#[derive(Debug, Deserialize)]
struct TransformRecord {
    source: String,
    target: String,
    #[serde(flatten)]
    value: TransformValue,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TransformValue {
    Matrix { matrix: Vec<f64> },
    Pose { translation: [f64; 3], rotation: [f64; 4] },
}

#[derive(Debug, Deserialize)]
struct TransformsDocument {
    transforms: Vec<TransformRecord>,
}

/// Loads every transform in a JSON document into `buffer`.
///
/// Returns the number of transforms inserted.
pub fn load_into(path: &Path, buffer: &TransformBuffer) -> Result<usize, TransformError> {
    let raw = fs::read_to_string(path).map_err(|source| TransformError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let document: TransformsDocument =
        serde_json::from_str(&raw).map_err(|source| TransformError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let count = document.transforms.len();
    for record in document.transforms {
        let transform = match record.value {
            TransformValue::Matrix { matrix } => RigidTransform::from_row_slice(&matrix)?,
            TransformValue::Pose {
                translation,
                rotation,
            } => RigidTransform::from_translation_rotation(translation, rotation)?,
        };
        buffer.insert(&record.source, &record.target, transform);
    }
    log::debug!("Loaded {count} transforms from {}", path.display());
    Ok(count)
}
