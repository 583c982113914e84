use std::collections::HashMap;
use std::time::Instant;

/// Observer for per-frame pipeline events.
///
/// Keeps the use case independent of how progress, stage timings and
/// counters are reported.
pub trait PipelineLogger: Send {
    /// A frame was fully processed and published.
    fn frame_published(&mut self, frame_index: usize);

    /// A frame was dropped before reaching the detector.
    fn frame_rejected(&mut self, frame_index: usize, reason: &str);

    /// Record how long a named stage took for one frame.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Record a per-frame value (e.g. detections, faces found).
    fn metric(&mut self, name: &str, value: f64);

    /// Emit an end-of-run summary. Default: no-op.
    fn summary(&self) {}
}

/// Discards all events. Used in tests.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn frame_published(&mut self, _frame_index: usize) {}
    fn frame_rejected(&mut self, _frame_index: usize, _reason: &str) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
}

/// CLI logger: accumulates stage timings and metrics, reports progress
/// every `throttle_frames` published frames and prints a summary at the
/// end of the run.
pub struct StdoutPipelineLogger {
    throttle_frames: usize,
    timings: HashMap<String, Vec<f64>>,
    metrics: HashMap<String, Vec<f64>>,
    start_time: Instant,
    published: usize,
    rejected: usize,
}

impl StdoutPipelineLogger {
    pub fn new(throttle_frames: usize) -> Self {
        Self {
            throttle_frames: throttle_frames.max(1),
            timings: HashMap::new(),
            metrics: HashMap::new(),
            start_time: Instant::now(),
            published: 0,
            rejected: 0,
        }
    }

    pub fn published(&self) -> usize {
        self.published
    }

    pub fn rejected(&self) -> usize {
        self.rejected
    }

    /// Returns the formatted summary, or `None` if no frame was seen.
    pub fn summary_string(&self) -> Option<String> {
        if self.published == 0 && self.rejected == 0 {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let mut lines = vec![format!(
            "Run summary ({} published, {} rejected, {:.1}s total):",
            self.published,
            self.rejected,
            elapsed_ms / 1000.0
        )];

        let mut stages: Vec<_> = self.timings.keys().collect();
        stages.sort();
        for stage in stages {
            let durations = &self.timings[stage];
            let total_ms: f64 = durations.iter().sum();
            let avg_ms = mean(durations);
            lines.push(format!(
                "  {stage:8}: avg {avg_ms:6.1}ms  max {:6.1}ms  total {total_ms:7.0}ms",
                durations.iter().copied().fold(0.0, f64::max)
            ));
        }

        let mut names: Vec<_> = self.metrics.keys().collect();
        names.sort();
        for name in names {
            let values = &self.metrics[name];
            lines.push(format!(
                "  {name}: avg {:.1}  total {:.0}",
                mean(values),
                values.iter().sum::<f64>()
            ));
        }

        if self.published > 0 && elapsed_ms > 0.0 {
            let fps = self.published as f64 / (elapsed_ms / 1000.0);
            lines.push(format!("  Throughput: {fps:.1} fps"));
        }

        Some(lines.join("\n"))
    }

    pub fn timings_for(&self, stage: &str) -> Option<&[f64]> {
        self.timings.get(stage).map(|v| v.as_slice())
    }

    pub fn metrics_for(&self, name: &str) -> Option<&[f64]> {
        self.metrics.get(name).map(|v| v.as_slice())
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

impl Default for StdoutPipelineLogger {
    fn default() -> Self {
        Self::new(100)
    }
}

impl PipelineLogger for StdoutPipelineLogger {
    fn frame_published(&mut self, frame_index: usize) {
        self.published += 1;
        if self.published % self.throttle_frames == 0 {
            log::info!(
                "Processed {} frames (last index {frame_index})",
                self.published
            );
        }
    }

    fn frame_rejected(&mut self, frame_index: usize, reason: &str) {
        self.rejected += 1;
        log::debug!("Frame {frame_index} rejected: {reason}");
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.metrics
            .entry(name.to_string())
            .or_default()
            .push(value);
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}
