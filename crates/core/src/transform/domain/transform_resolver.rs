use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::shared::sensor_frames::SensorFrames;
use crate::transform::domain::rigid_transform::RigidTransform;

#[derive(Error, Debug)]
pub enum TransformError {
    #[error("no transform from {source_frame} to {target_frame} within {timeout:?}")]
    Timeout {
        source_frame: String,
        target_frame: String,
        timeout: Duration,
    },
    #[error("transform is not rigid: {0}")]
    NotRigid(String),
    #[error("failed to read transforms from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse transforms from {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Domain interface for looking up transforms between named frames.
///
/// `lookup(source, target)` returns the transform mapping points expressed
/// in `source` into `target`, waiting at most `timeout` for it to appear.
pub trait TransformResolver: Send + Sync {
    fn lookup(
        &self,
        source: &str,
        target: &str,
        timeout: Duration,
    ) -> Result<RigidTransform, TransformError>;
}

/// The two transforms ROI projection needs, resolved once at startup and
/// constant afterwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTransforms {
    pub depth_to_color: RigidTransform,
    pub world_to_color: RigidTransform,
}

impl FrameTransforms {
    /// Resolves both transforms; either one missing is fatal to startup.
    pub fn resolve(
        resolver: &dyn TransformResolver,
        frames: &SensorFrames,
        timeout: Duration,
    ) -> Result<Self, TransformError> {
        let depth_to_color = resolver.lookup(&frames.source, &frames.color, timeout)?;
        log::info!(
            "Resolved {} -> {}:{depth_to_color}",
            frames.source,
            frames.color
        );
        let world_to_color = resolver.lookup(&frames.world, &frames.color, timeout)?;
        log::info!(
            "Resolved {} -> {}:{world_to_color}",
            frames.world,
            frames.color
        );
        Ok(Self {
            depth_to_color,
            world_to_color,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct StubResolver {
        known: Vec<(String, String, RigidTransform)>,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl TransformResolver for StubResolver {
        fn lookup(
            &self,
            source: &str,
            target: &str,
            timeout: Duration,
        ) -> Result<RigidTransform, TransformError> {
            self.calls
                .lock()
                .unwrap()
                .push((source.to_string(), target.to_string()));
            self.known
                .iter()
                .find(|(s, t, _)| s == source && t == target)
                .map(|(_, _, tf)| *tf)
                .ok_or_else(|| TransformError::Timeout {
                    source_frame: source.to_string(),
                    target_frame: target.to_string(),
                    timeout,
                })
        }
    }

    fn shift(x: f64) -> RigidTransform {
        RigidTransform::from_translation_rotation([x, 0.0, 0.0], [0.0, 0.0, 0.0, 1.0]).unwrap()
    }

    #[test]
    fn test_resolve_looks_up_both_transforms() {
        let frames = SensorFrames::for_sensor("cam");
        let resolver = StubResolver {
            known: vec![
                (frames.source.clone(), frames.color.clone(), shift(0.05)),
                (frames.world.clone(), frames.color.clone(), shift(2.0)),
            ],
            calls: Mutex::new(Vec::new()),
        };

        let transforms =
            FrameTransforms::resolve(&resolver, &frames, Duration::from_millis(1)).unwrap();

        assert_eq!(transforms.depth_to_color, shift(0.05));
        assert_eq!(transforms.world_to_color, shift(2.0));
        assert_eq!(resolver.calls.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_resolve_fails_when_world_transform_missing() {
        let frames = SensorFrames::for_sensor("cam");
        let resolver = StubResolver {
            known: vec![(frames.source.clone(), frames.color.clone(), shift(0.05))],
            calls: Mutex::new(Vec::new()),
        };

        let err =
            FrameTransforms::resolve(&resolver, &frames, Duration::from_millis(1)).unwrap_err();

        match err {
            TransformError::Timeout { source_frame, .. } => assert_eq!(source_frame, "world"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
