use std::fs;
use std::path::{Path, PathBuf};

use crate::config::domain::face_detection_config::{ConfigError, FaceDetectionConfig};

/// Platform config location, e.g. `~/.config/clusterface/config.json` on Linux.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("clusterface").join("config.json"))
}

/// Loads and validates a configuration file.
///
/// With no explicit path, the platform default is tried; a missing default
/// file yields [`FaceDetectionConfig::default`]. An explicit path must exist.
pub fn load(path: Option<&Path>) -> Result<FaceDetectionConfig, ConfigError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) if p.exists() => p,
            _ => return Ok(FaceDetectionConfig::default()),
        },
    };

    let raw = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    let config: FaceDetectionConfig =
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
    config.validate()?;
    Ok(config)
}

pub fn save(config: &FaceDetectionConfig, path: &Path) -> Result<(), ConfigError> {
    let write_err = |source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    let json = serde_json::to_string_pretty(config).map_err(|e| ConfigError::Write {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    fs::write(path, json).map_err(write_err)
}
