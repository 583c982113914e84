use crate::config::domain::face_detection_config::FaceDetectionConfig;
use crate::detection::domain::face_detector::FaceDetector;
use crate::pipeline::roi_executor::{locate_or_absent, RoiExecutor};
use crate::shared::bounding_box::FaceBox;
use crate::shared::constants::DEFAULT_LOCATOR_WORKERS;
use crate::shared::frame::Frame;
use crate::shared::roi::Roi;

/// Fans the ROIs of one frame out over a fixed number of scoped worker
/// threads and reassembles the results by ROI index.
///
/// Layout: `jobs (index, roi) → N workers [crop/upscale/detect] → results`
///
/// Workers borrow the frame and detector for the duration of the call, so
/// the call returns only after every ROI has been processed.
pub struct ThreadedRoiExecutor {
    workers: usize,
}

impl ThreadedRoiExecutor {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }
}

impl Default for ThreadedRoiExecutor {
    fn default() -> Self {
        Self::new(DEFAULT_LOCATOR_WORKERS)
    }
}

impl RoiExecutor for ThreadedRoiExecutor {
    fn locate_all(
        &self,
        gray: &Frame,
        rois: &[Roi],
        config: &FaceDetectionConfig,
        detector: &dyn FaceDetector,
    ) -> Vec<Option<FaceBox>> {
        let mut faces = vec![None; rois.len()];
        let jobs: Vec<(usize, Roi)> = rois
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, roi)| !roi.is_degenerate())
            .collect();
        if jobs.is_empty() {
            return faces;
        }

        let (job_tx, job_rx) = crossbeam_channel::bounded::<(usize, Roi)>(jobs.len());
        let (result_tx, result_rx) =
            crossbeam_channel::bounded::<(usize, Option<FaceBox>)>(jobs.len());

        let worker_count = self.workers.min(jobs.len());
        for job in jobs {
            // Capacity covers every job, so this never blocks.
            if job_tx.send(job).is_err() {
                break;
            }
        }
        drop(job_tx);

        std::thread::scope(|scope| {
            for _ in 0..worker_count {
                let job_rx = job_rx.clone();
                let result_tx = result_tx.clone();
                scope.spawn(move || {
                    for (index, roi) in job_rx {
                        let face = locate_or_absent(gray, &roi, config, detector);
                        if result_tx.send((index, face)).is_err() {
                            break;
                        }
                    }
                });
            }
        });
        drop(result_tx);

        for (index, face) in result_rx {
            faces[index] = face;
        }
        faces
    }
}
