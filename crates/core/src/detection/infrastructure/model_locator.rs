use std::path::{Path, PathBuf};

use crate::detection::domain::face_detector::DetectorError;

/// Directory searched for detector models, e.g.
/// `~/.local/share/clusterface/models` on Linux.
pub fn model_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("clusterface").join("models"))
}

/// Finds a detector model file.
///
/// Resolution order:
/// 1. `explicit`, which must exist when given
/// 2. User data directory ([`model_data_dir`])
/// 3. `fallback_dir` (working directory, pre-packaged installs)
pub fn locate(
    name: &str,
    explicit: Option<&Path>,
    fallback_dir: Option<&Path>,
) -> Result<PathBuf, DetectorError> {
    if let Some(path) = explicit {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        return Err(DetectorError::ModelLoad {
            path: path.to_path_buf(),
            reason: "file not found".into(),
        });
    }

    let candidates: Vec<PathBuf> = model_data_dir()
        .into_iter()
        .chain(fallback_dir.map(Path::to_path_buf))
        .map(|dir| dir.join(name))
        .collect();

    candidates
        .iter()
        .find(|p| p.is_file())
        .cloned()
        .ok_or_else(|| DetectorError::ModelLoad {
            path: PathBuf::from(name),
            reason: format!(
                "not found in {}",
                candidates
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        })
}
