use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender, TryRecvError};

use crate::config::domain::face_detection_config::{ConfigError, FaceDetectionConfig};

/// An immutable configuration, shared by every frame processed under it.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigSnapshot {
    pub version: u64,
    pub config: FaceDetectionConfig,
}

/// Holds the active configuration and the queue of pending updates.
///
/// Updates are only applied in [`ConfigStore::begin_frame`], so a frame in
/// flight always sees one consistent snapshot.
pub struct ConfigStore {
    current: Arc<ConfigSnapshot>,
    updates: Receiver<FaceDetectionConfig>,
}

/// Cloneable handle for submitting configuration updates from any thread.
#[derive(Clone)]
pub struct ConfigUpdater {
    updates: Sender<FaceDetectionConfig>,
}

impl ConfigStore {
    pub fn new(initial: FaceDetectionConfig) -> (Self, ConfigUpdater) {
        let (tx, rx) = crossbeam_channel::unbounded();
        let store = Self {
            current: Arc::new(ConfigSnapshot {
                version: 0,
                config: initial,
            }),
            updates: rx,
        };
        (store, ConfigUpdater { updates: tx })
    }

    pub fn current(&self) -> Arc<ConfigSnapshot> {
        Arc::clone(&self.current)
    }

    /// Applies every pending update (the last one wins) and returns the
    /// snapshot the next frame must use.
    pub fn begin_frame(&mut self) -> Arc<ConfigSnapshot> {
        let mut latest = None;
        loop {
            match self.updates.try_recv() {
                Ok(config) => latest = Some(config),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        if let Some(config) = latest {
            if config != self.current.config {
                let version = self.current.version + 1;
                log::info!("Applying configuration v{version}: {config:?}");
                self.current = Arc::new(ConfigSnapshot { version, config });
            }
        }
        Arc::clone(&self.current)
    }
}

impl ConfigUpdater {
    /// Queues `config` for the next frame boundary after validating it.
    pub fn submit(&self, config: FaceDetectionConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.updates
            .send(config)
            .map_err(|_| ConfigError::ChannelClosed)
    }
}
