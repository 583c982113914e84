use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;

use crate::config::domain::config_store::ConfigStore;
use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::domain::result_merger::merge_faces;
use crate::detection::domain::roi_projector::RoiProjector;
use crate::pipeline::pipeline_logger::{NullPipelineLogger, PipelineLogger};
use crate::pipeline::roi_executor::RoiExecutor;
use crate::shared::camera_model::{CameraModel, CameraModelError};
use crate::shared::cluster_detection::DetectionArray;
use crate::shared::sensor_frames::{normalize_frame_id, same_frame};
use crate::transport::domain::detection_sink::{DetectionSink, EncodedDetections};
use crate::transport::domain::frame_source::{FrameInput, FrameSource};
use crate::transport::domain::frame_visualizer::FrameVisualizer;

/// Why a frame was dropped without output.
#[derive(Error, Debug, PartialEq)]
pub enum FrameRejection {
    #[error("detections are in frame {actual}, expected {expected}")]
    UnexpectedFrameId { expected: String, actual: String },
    #[error("malformed camera info: {0}")]
    Camera(#[from] CameraModelError),
    #[error(
        "image is {image_width}x{image_height} but camera info says {camera_width}x{camera_height}"
    )]
    ImageSize {
        image_width: u32,
        image_height: u32,
        camera_width: u32,
        camera_height: u32,
    },
}

#[derive(Debug, PartialEq)]
pub enum FrameOutcome {
    /// The enriched array went to every sink.
    Published { detections: usize, faces_found: usize },
    /// Nothing was published and the detector was not called.
    Rejected(FrameRejection),
}

/// Totals for one [`FaceDetectionUseCase::run`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub published: usize,
    pub rejected: usize,
    pub unreadable: usize,
}

/// Per-frame pipeline: validate → project ROIs → locate faces → merge →
/// publish, with optional visualization.
///
/// Frames are handled one at a time; the configuration snapshot is taken at
/// the start of each frame and held until it is published.
pub struct FaceDetectionUseCase {
    expected_frame_id: String,
    projector: RoiProjector,
    detector: Arc<dyn FaceDetector>,
    executor: Box<dyn RoiExecutor>,
    config: ConfigStore,
    sinks: Vec<Box<dyn DetectionSink>>,
    visualizer: Option<Box<dyn FrameVisualizer>>,
    logger: Box<dyn PipelineLogger>,
}

impl FaceDetectionUseCase {
    pub fn new(
        expected_frame_id: &str,
        projector: RoiProjector,
        detector: Arc<dyn FaceDetector>,
        executor: Box<dyn RoiExecutor>,
        config: ConfigStore,
    ) -> Self {
        Self {
            expected_frame_id: normalize_frame_id(expected_frame_id).to_string(),
            projector,
            detector,
            executor,
            config,
            sinks: Vec::new(),
            visualizer: None,
            logger: Box::new(NullPipelineLogger),
        }
    }

    pub fn with_sink(mut self, sink: Box<dyn DetectionSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn with_visualizer(mut self, visualizer: Box<dyn FrameVisualizer>) -> Self {
        self.visualizer = Some(visualizer);
        self
    }

    pub fn with_logger(mut self, logger: Box<dyn PipelineLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Processes one frame end to end.
    ///
    /// Rejections are reported as [`FrameOutcome::Rejected`]; an `Err` means
    /// the frame could not be encoded or a sink failed to publish. Sinks are
    /// written in the order they were added, and a failing sink stops the
    /// frame there: sinks before it keep the frame, sinks after it never see
    /// it.
    pub fn process_frame(
        &mut self,
        input: FrameInput,
    ) -> Result<FrameOutcome, Box<dyn std::error::Error>> {
        let started = Instant::now();
        let snapshot = self.config.begin_frame();
        let config = &snapshot.config;
        let frame_index = input.image.index();

        if let Err(rejection) = self.validate(&input) {
            log::warn!("Dropping frame {frame_index}: {rejection}");
            self.logger
                .frame_rejected(frame_index, &rejection.to_string());
            return Ok(FrameOutcome::Rejected(rejection));
        }
        let camera = match CameraModel::try_from(&input.camera_info) {
            Ok(camera) => camera,
            Err(e) => {
                let rejection = FrameRejection::from(e);
                log::warn!("Dropping frame {frame_index}: {rejection}");
                self.logger
                    .frame_rejected(frame_index, &rejection.to_string());
                return Ok(FrameOutcome::Rejected(rejection));
            }
        };

        let FrameInput {
            image,
            mut detections,
            ..
        } = input;

        let t = Instant::now();
        let rois = self
            .projector
            .project(&camera, &detections.detections, config);
        self.logger.timing("project", elapsed_ms(t));

        let t = Instant::now();
        let faces = if rois.is_empty() {
            Vec::new()
        } else {
            let gray = image.to_grayscale();
            self.executor
                .locate_all(&gray, &rois, config, self.detector.as_ref())
        };
        self.logger.timing("locate", elapsed_ms(t));

        let faces_found = merge_faces(&mut detections.detections, &faces)?;

        let t = Instant::now();
        self.publish(&detections)?;
        self.logger.timing("publish", elapsed_ms(t));

        let count = detections.detections.len();
        self.logger.metric("detections", count as f64);
        self.logger.metric("faces_found", faces_found as f64);
        self.logger.frame_published(frame_index);
        log::debug!(
            "Frame {frame_index}: {faces_found}/{count} faces (config v{})",
            snapshot.version
        );

        if config.visualization_enabled {
            if let Some(visualizer) = self.visualizer.as_mut() {
                if let Err(e) = visualizer.show(&image, &rois, &faces, started.elapsed()) {
                    log::warn!("Visualization failed for frame {frame_index}: {e}");
                }
            }
        }

        Ok(FrameOutcome::Published {
            detections: count,
            faces_found,
        })
    }

    /// Processes every frame of `source`, calling `between_frames` before
    /// each one. Unreadable inputs are logged and skipped; a publish
    /// failure stops the run.
    pub fn run(
        &mut self,
        source: &mut dyn FrameSource,
        mut between_frames: impl FnMut(),
    ) -> Result<RunSummary, Box<dyn std::error::Error>> {
        let mut summary = RunSummary::default();
        for input in source.frames() {
            between_frames();
            let input = match input {
                Ok(input) => input,
                Err(e) => {
                    log::warn!("Skipping unreadable frame: {e}");
                    summary.unreadable += 1;
                    continue;
                }
            };
            match self.process_frame(input)? {
                FrameOutcome::Published { .. } => summary.published += 1,
                FrameOutcome::Rejected(_) => summary.rejected += 1,
            }
        }
        self.logger.summary();
        Ok(summary)
    }

    fn validate(&self, input: &FrameInput) -> Result<(), FrameRejection> {
        let actual = &input.detections.header.frame_id;
        if !same_frame(actual, &self.expected_frame_id) {
            return Err(FrameRejection::UnexpectedFrameId {
                expected: self.expected_frame_id.clone(),
                actual: actual.clone(),
            });
        }
        let (image, camera) = (&input.image, &input.camera_info);
        if image.width() != camera.width || image.height() != camera.height {
            return Err(FrameRejection::ImageSize {
                image_width: image.width(),
                image_height: image.height(),
                camera_width: camera.width,
                camera_height: camera.height,
            });
        }
        Ok(())
    }

    fn publish(&mut self, detections: &DetectionArray) -> Result<(), Box<dyn std::error::Error>> {
        let encoded = EncodedDetections::encode(detections)?;
        let total = self.sinks.len();
        for (written, sink) in self.sinks.iter_mut().enumerate() {
            if let Err(e) = sink.publish(&encoded) {
                if written > 0 {
                    log::error!(
                        "Frame seq {} reached only {written} of {total} sinks",
                        detections.header.seq
                    );
                }
                return Err(e);
            }
        }
        Ok(())
    }
}

fn elapsed_ms(since: Instant) -> f64 {
    since.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::domain::face_detection_config::FaceDetectionConfig;
    use crate::detection::domain::face_detector::{DetectorError, ScoredBox};
    use crate::pipeline::infrastructure::threaded_roi_executor::ThreadedRoiExecutor;
    use crate::pipeline::roi_executor::SequentialRoiExecutor;
    use crate::shared::bounding_box::{BoundingBox2D, FaceBox};
    use crate::shared::camera_model::CameraInfo;
    use crate::shared::cluster_detection::{ClusterDetection, Header, Point3};
    use crate::shared::frame::Frame;
    use crate::shared::roi::Roi;
    use crate::transform::domain::rigid_transform::RigidTransform;
    use crate::transform::domain::transform_resolver::FrameTransforms;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    const FRAME_ID: &str = "kinect2_head_ir_optical_frame";

    // --- Stubs ---

    /// Finds one face at a fixed crop-local box in every region and counts
    /// calls.
    struct StubDetector {
        calls: AtomicUsize,
    }

    impl StubDetector {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl FaceDetector for StubDetector {
        fn detect(&self, _: &Frame, _: f64) -> Result<Vec<ScoredBox>, DetectorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![ScoredBox {
                left: 10,
                top: 10,
                right: 50,
                bottom: 50,
                score: 1.0,
            }])
        }
    }

    /// Never finds a face.
    struct EmptyDetector;

    impl FaceDetector for EmptyDetector {
        fn detect(&self, _: &Frame, _: f64) -> Result<Vec<ScoredBox>, DetectorError> {
            Ok(Vec::new())
        }
    }

    struct RecordingSink {
        published: Arc<Mutex<Vec<DetectionArray>>>,
    }

    impl DetectionSink for RecordingSink {
        fn publish(
            &mut self,
            frame: &EncodedDetections<'_>,
        ) -> Result<(), Box<dyn std::error::Error>> {
            self.published.lock().unwrap().push(frame.detections.clone());
            Ok(())
        }
    }

    struct FailingSink;

    impl DetectionSink for FailingSink {
        fn publish(&mut self, _: &EncodedDetections<'_>) -> Result<(), Box<dyn std::error::Error>> {
            Err("disk full".into())
        }
    }

    struct RecordingVisualizer {
        shown: Arc<Mutex<Vec<(usize, Vec<Roi>, Vec<Option<FaceBox>>)>>>,
    }

    impl FrameVisualizer for RecordingVisualizer {
        fn show(
            &mut self,
            frame: &Frame,
            rois: &[Roi],
            faces: &[Option<FaceBox>],
            _: Duration,
        ) -> Result<(), Box<dyn std::error::Error>> {
            self.shown
                .lock()
                .unwrap()
                .push((frame.index(), rois.to_vec(), faces.to_vec()));
            Ok(())
        }
    }

    struct VecSource {
        frames: Vec<Result<FrameInput, String>>,
    }

    impl FrameSource for VecSource {
        fn frames(
            &mut self,
        ) -> Box<dyn Iterator<Item = Result<FrameInput, Box<dyn std::error::Error>>> + '_> {
            Box::new(
                self.frames
                    .drain(..)
                    .map(|f| f.map_err(Box::<dyn std::error::Error>::from)),
            )
        }
    }

    // --- Fixtures ---

    fn camera_info() -> CameraInfo {
        CameraInfo {
            width: 640,
            height: 480,
            distortion_model: "plumb_bob".into(),
            k: vec![500.0, 0.0, 320.0, 0.0, 500.0, 240.0, 0.0, 0.0, 1.0],
            d: vec![0.0; 5],
        }
    }

    fn detection(x: f64, z: f64, id: u64) -> ClusterDetection {
        let mut d = ClusterDetection::new(Point3::new(x, 0.0, z), Point3::new(x, 0.5, z));
        d.box_2d = BoundingBox2D {
            x: 1,
            y: 1,
            width: 1,
            height: 1,
        };
        d.payload.insert("track_id".into(), id.into());
        d
    }

    fn input(index: usize, frame_id: &str, detections: Vec<ClusterDetection>) -> FrameInput {
        FrameInput {
            image: Frame::new(vec![90; 640 * 480 * 3], 640, 480, 3, index),
            camera_info: camera_info(),
            detections: DetectionArray {
                header: Header {
                    seq: index as u64,
                    stamp: 0.0,
                    frame_id: frame_id.into(),
                },
                detections,
            },
        }
    }

    /// Identity transforms and no head offset: the face center is the top
    /// point itself.
    fn config() -> FaceDetectionConfig {
        FaceDetectionConfig {
            head_offset_top_meters: 0.0,
            ..Default::default()
        }
    }

    fn use_case(
        detector: Arc<StubDetector>,
        initial: FaceDetectionConfig,
    ) -> (FaceDetectionUseCase, Arc<Mutex<Vec<DetectionArray>>>) {
        use_case_with(detector, initial)
    }

    fn use_case_with(
        detector: Arc<dyn FaceDetector>,
        initial: FaceDetectionConfig,
    ) -> (FaceDetectionUseCase, Arc<Mutex<Vec<DetectionArray>>>) {
        let transforms = FrameTransforms {
            depth_to_color: RigidTransform::identity(),
            world_to_color: RigidTransform::identity(),
        };
        let (store, _) = ConfigStore::new(initial);
        let published = Arc::new(Mutex::new(Vec::new()));
        let uc = FaceDetectionUseCase::new(
            FRAME_ID,
            RoiProjector::new(transforms),
            detector,
            Box::new(SequentialRoiExecutor),
            store,
        )
        .with_sink(Box::new(RecordingSink {
            published: Arc::clone(&published),
        }));
        (uc, published)
    }

    // --- Tests ---

    #[test]
    fn test_publishes_faces_in_detection_order() {
        let detector = StubDetector::new();
        let (mut uc, published) = use_case(Arc::clone(&detector), config());

        // Centered at z=2: half = 0.2 * 500 / 2 = 50 -> ROI (270,190)-(370,290)
        // Off to the right at z=4: u = 320 + 500 * 1 / 4 = 445, half 25
        let outcome = uc
            .process_frame(input(
                0,
                FRAME_ID,
                vec![detection(0.0, 2.0, 7), detection(1.0, 4.0, 8)],
            ))
            .unwrap();

        assert_eq!(
            outcome,
            FrameOutcome::Published {
                detections: 2,
                faces_found: 2
            }
        );
        let published = published.lock().unwrap();
        assert_eq!(published.len(), 1);
        let out = &published[0].detections;
        assert_eq!(out[0].payload["track_id"], 7);
        assert_eq!(
            out[0].box_2d,
            BoundingBox2D {
                x: 280,
                y: 200,
                width: 40,
                height: 40
            }
        );
        assert_eq!(out[1].payload["track_id"], 8);
        // ROI width 50 upscaled to 100: factor 0.5 -> (5,5,25,25) + (420,215)
        assert_eq!(
            out[1].box_2d,
            BoundingBox2D {
                x: 425,
                y: 220,
                width: 20,
                height: 20
            }
        );
        assert_eq!(detector.calls(), 2);
    }

    #[test]
    fn test_empty_input_still_publishes() {
        let detector = StubDetector::new();
        let (mut uc, published) = use_case(Arc::clone(&detector), config());

        let outcome = uc.process_frame(input(3, FRAME_ID, vec![])).unwrap();

        assert_eq!(
            outcome,
            FrameOutcome::Published {
                detections: 0,
                faces_found: 0
            }
        );
        let published = published.lock().unwrap();
        assert_eq!(published.len(), 1);
        assert!(published[0].detections.is_empty());
        assert_eq!(published[0].header.seq, 3);
        assert_eq!(detector.calls(), 0);
    }

    #[test]
    fn test_behind_camera_gets_no_face_sentinel() {
        let detector = StubDetector::new();
        let (mut uc, published) = use_case(Arc::clone(&detector), config());

        uc.process_frame(input(
            0,
            FRAME_ID,
            vec![detection(0.0, -1.0, 1), detection(0.0, 2.0, 2)],
        ))
        .unwrap();

        let published = published.lock().unwrap();
        assert!(published[0].detections[0].box_2d.is_no_face());
        assert!(!published[0].detections[1].box_2d.is_no_face());
        assert_eq!(detector.calls(), 1);
    }

    #[test]
    fn test_unexpected_frame_id_rejected_without_output() {
        let detector = StubDetector::new();
        let (mut uc, published) = use_case(Arc::clone(&detector), config());

        let outcome = uc
            .process_frame(input(
                0,
                "kinect2_far_ir_optical_frame",
                vec![detection(0.0, 2.0, 1)],
            ))
            .unwrap();

        assert_eq!(
            outcome,
            FrameOutcome::Rejected(FrameRejection::UnexpectedFrameId {
                expected: FRAME_ID.into(),
                actual: "kinect2_far_ir_optical_frame".into(),
            })
        );
        assert!(published.lock().unwrap().is_empty());
        assert_eq!(detector.calls(), 0);
    }

    #[test]
    fn test_leading_slash_frame_id_accepted() {
        let detector = StubDetector::new();
        let (mut uc, published) = use_case(detector, config());

        uc.process_frame(input(0, "/kinect2_head_ir_optical_frame", vec![]))
            .unwrap();

        assert_eq!(published.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_malformed_intrinsics_rejected() {
        let detector = StubDetector::new();
        let (mut uc, published) = use_case(Arc::clone(&detector), config());
        let mut frame = input(0, FRAME_ID, vec![detection(0.0, 2.0, 1)]);
        frame.camera_info.k.truncate(4);

        let outcome = uc.process_frame(frame).unwrap();

        assert_eq!(
            outcome,
            FrameOutcome::Rejected(FrameRejection::Camera(CameraModelError::IntrinsicsShape(4)))
        );
        assert!(published.lock().unwrap().is_empty());
        assert_eq!(detector.calls(), 0);
    }

    #[test]
    fn test_image_size_mismatch_rejected() {
        let detector = StubDetector::new();
        let (mut uc, published) = use_case(Arc::clone(&detector), config());
        let mut frame = input(0, FRAME_ID, vec![detection(0.0, 2.0, 1)]);
        frame.image = Frame::new(vec![90; 100 * 100 * 3], 100, 100, 3, 0);

        let outcome = uc.process_frame(frame).unwrap();

        assert_eq!(
            outcome,
            FrameOutcome::Rejected(FrameRejection::ImageSize {
                image_width: 100,
                image_height: 100,
                camera_width: 640,
                camera_height: 480,
            })
        );
        assert!(published.lock().unwrap().is_empty());
        assert_eq!(detector.calls(), 0);
    }

    #[test]
    fn test_zero_candidates_publish_no_face_sentinel() {
        let (mut uc, published) = use_case_with(Arc::new(EmptyDetector), config());

        let outcome = uc
            .process_frame(input(0, FRAME_ID, vec![detection(0.0, 2.0, 1)]))
            .unwrap();

        assert_eq!(
            outcome,
            FrameOutcome::Published {
                detections: 1,
                faces_found: 0
            }
        );
        let published = published.lock().unwrap();
        assert_eq!(published[0].detections[0].box_2d, BoundingBox2D::NO_FACE);
        assert_eq!(published[0].detections[0].payload["track_id"], 1);
    }

    #[test]
    fn test_every_sink_receives_each_frame() {
        let detector = StubDetector::new();
        let (uc, first) = use_case(detector, config());
        let second = Arc::new(Mutex::new(Vec::new()));
        let mut uc = uc.with_sink(Box::new(RecordingSink {
            published: Arc::clone(&second),
        }));

        uc.process_frame(input(0, FRAME_ID, vec![detection(0.0, 2.0, 1)]))
            .unwrap();
        uc.process_frame(input(1, FRAME_ID, vec![])).unwrap();

        assert_eq!(*first.lock().unwrap(), *second.lock().unwrap());
        assert_eq!(second.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_sink_failure_is_error() {
        let detector = StubDetector::new();
        let (uc, _) = use_case(detector, config());
        let mut uc = uc.with_sink(Box::new(FailingSink));

        let err = uc.process_frame(input(0, FRAME_ID, vec![])).unwrap_err();
        assert_eq!(err.to_string(), "disk full");
    }

    #[test]
    fn test_sink_failure_stops_later_sinks() {
        let (uc, first) = use_case(StubDetector::new(), config());
        let last = Arc::new(Mutex::new(Vec::new()));
        let mut uc = uc
            .with_sink(Box::new(FailingSink))
            .with_sink(Box::new(RecordingSink {
                published: Arc::clone(&last),
            }));

        assert!(uc.process_frame(input(0, FRAME_ID, vec![])).is_err());

        assert_eq!(first.lock().unwrap().len(), 1);
        assert!(last.lock().unwrap().is_empty());
    }

    #[test]
    fn test_visualizer_only_runs_when_enabled() {
        let shown = Arc::new(Mutex::new(Vec::new()));
        let detector = StubDetector::new();
        let (uc, _) = use_case(
            detector,
            FaceDetectionConfig {
                visualization_enabled: true,
                ..config()
            },
        );
        let mut uc = uc.with_visualizer(Box::new(RecordingVisualizer {
            shown: Arc::clone(&shown),
        }));

        uc.process_frame(input(4, FRAME_ID, vec![detection(0.0, 2.0, 1)]))
            .unwrap();

        let shown = shown.lock().unwrap();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].0, 4);
        assert_eq!(shown[0].1, vec![Roi::new(270, 190, 370, 290)]);
        assert_eq!(shown[0].2, vec![Some(FaceBox::new(280, 200, 320, 240))]);
    }

    #[test]
    fn test_visualizer_skipped_when_disabled() {
        let shown = Arc::new(Mutex::new(Vec::new()));
        let (uc, _) = use_case(StubDetector::new(), config());
        let mut uc = uc.with_visualizer(Box::new(RecordingVisualizer {
            shown: Arc::clone(&shown),
        }));

        uc.process_frame(input(0, FRAME_ID, vec![detection(0.0, 2.0, 1)]))
            .unwrap();

        assert!(shown.lock().unwrap().is_empty());
    }

    #[test]
    fn test_config_update_applies_at_next_frame() {
        let detector = StubDetector::new();
        let transforms = FrameTransforms {
            depth_to_color: RigidTransform::identity(),
            world_to_color: RigidTransform::identity(),
        };
        let (store, updater) = ConfigStore::new(config());
        let published = Arc::new(Mutex::new(Vec::new()));
        let mut uc = FaceDetectionUseCase::new(
            FRAME_ID,
            RoiProjector::new(transforms),
            detector,
            Box::new(SequentialRoiExecutor),
            store,
        )
        .with_sink(Box::new(RecordingSink {
            published: Arc::clone(&published),
        }));

        uc.process_frame(input(0, FRAME_ID, vec![detection(0.0, 2.0, 1)]))
            .unwrap();
        updater
            .submit(FaceDetectionConfig {
                roi_half_width_meters: 0.1,
                ..config()
            })
            .unwrap();
        uc.process_frame(input(1, FRAME_ID, vec![detection(0.0, 2.0, 1)]))
            .unwrap();

        // Half width 25 px: ROI (295,215)-(345,265), upscaled by 2
        let published = published.lock().unwrap();
        assert_eq!(published[0].detections[0].box_2d.x, 280);
        assert_eq!(
            published[1].detections[0].box_2d,
            BoundingBox2D {
                x: 300,
                y: 220,
                width: 20,
                height: 20
            }
        );
    }

    #[test]
    fn test_threaded_executor_matches_sequential() {
        let detections: Vec<_> = (0..6)
            .map(|i| detection(-0.5 + 0.2 * i as f64, 2.0 + i as f64 * 0.5, i))
            .collect();

        let (mut sequential, seq_out) = use_case(StubDetector::new(), config());
        sequential
            .process_frame(input(0, FRAME_ID, detections.clone()))
            .unwrap();

        let transforms = FrameTransforms {
            depth_to_color: RigidTransform::identity(),
            world_to_color: RigidTransform::identity(),
        };
        let (store, _) = ConfigStore::new(config());
        let threaded_out = Arc::new(Mutex::new(Vec::new()));
        let mut threaded = FaceDetectionUseCase::new(
            FRAME_ID,
            RoiProjector::new(transforms),
            StubDetector::new(),
            Box::new(ThreadedRoiExecutor::new(3)),
            store,
        )
        .with_sink(Box::new(RecordingSink {
            published: Arc::clone(&threaded_out),
        }));
        threaded
            .process_frame(input(0, FRAME_ID, detections))
            .unwrap();

        assert_eq!(*seq_out.lock().unwrap(), *threaded_out.lock().unwrap());
    }

    #[test]
    fn test_run_counts_and_skips_unreadable() {
        let (mut uc, published) = use_case(StubDetector::new(), config());
        let mut source = VecSource {
            frames: vec![
                Ok(input(0, FRAME_ID, vec![detection(0.0, 2.0, 1)])),
                Err("broken image".into()),
                Ok(input(2, "other_frame", vec![])),
                Ok(input(3, FRAME_ID, vec![])),
            ],
        };
        let mut boundaries = 0;

        let summary = uc.run(&mut source, || boundaries += 1).unwrap();

        assert_eq!(
            summary,
            RunSummary {
                published: 2,
                rejected: 1,
                unreadable: 1
            }
        );
        assert_eq!(boundaries, 4);
        assert_eq!(published.lock().unwrap().len(), 2);
    }
}
