use std::fs::File;
use std::io::{BufWriter, Stdout, Write};
use std::path::Path;

use crate::transport::domain::detection_sink::{DetectionSink, EncodedDetections};

/// Writes each detection array as one JSON object per line.
///
/// Each line goes out in a single write and is flushed, so downstream
/// readers see whole frames only.
pub struct JsonLinesSink<W: Write + Send> {
    writer: W,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl JsonLinesSink<BufWriter<File>> {
    /// Creates (or truncates) `path`, creating missing parent directories.
    pub fn create(path: &Path) -> Result<Self, std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl JsonLinesSink<Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> DetectionSink for JsonLinesSink<W> {
    fn publish(&mut self, frame: &EncodedDetections<'_>) -> Result<(), Box<dyn std::error::Error>> {
        let mut line = String::with_capacity(frame.json.len() + 1);
        line.push_str(&frame.json);
        line.push('\n');
        self.writer.write_all(line.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }
}
