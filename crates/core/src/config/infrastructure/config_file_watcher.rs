use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::config::domain::config_store::ConfigUpdater;
use crate::config::domain::face_detection_config::ConfigError;
use crate::config::infrastructure::config_file;

/// Live-reconfiguration source backed by a JSON file.
///
/// Polled between frames: when the file's modification time changes it is
/// reloaded and submitted, taking effect at the next frame boundary. A
/// broken edit is reported and the previous configuration stays active.
pub struct ConfigFileWatcher {
    path: PathBuf,
    last_modified: Option<SystemTime>,
    updater: ConfigUpdater,
}

impl ConfigFileWatcher {
    pub fn new(path: &Path, updater: ConfigUpdater) -> Self {
        Self {
            path: path.to_path_buf(),
            last_modified: modified(path),
            updater,
        }
    }

    /// Returns `true` when a changed file was reloaded and submitted.
    pub fn poll(&mut self) -> Result<bool, ConfigError> {
        let current = modified(&self.path);
        if current.is_none() || current == self.last_modified {
            return Ok(false);
        }
        self.last_modified = current;

        let config = config_file::load(Some(&self.path))?;
        log::info!("Reloaded configuration from {}", self.path.display());
        self.updater.submit(config)?;
        Ok(true)
    }
}

fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}
