//! Pose sources: where detections come from.
//!
//! A source is pulled one detection at a time. Recorded sessions are stored
//! as JSON lines, one detection per line:
//!
//! ```text
//! {"t_ms": 0.0, "landmarks": [{"x": 0.51, "y": 0.12}, null, ...]}
//! {"t_ms": 33.3, "landmarks": null}
//! {"t_ms": 66.6, "error": "detector timeout"}
//! ```

use crate::{Detection, Error, LandmarkFrame, Point, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;
use std::time::Duration;

/// Producer of detections, pulled by the frame loop
pub trait PoseSource {
    /// `Ok(Some(_))` for a detection, `Ok(None)` once the source is gone,
    /// `Err(_)` when this detection failed but later ones may succeed.
    fn next_detection(&mut self) -> Result<Option<Detection>>;
}

impl<S: PoseSource + ?Sized> PoseSource for Box<S> {
    fn next_detection(&mut self) -> Result<Option<Detection>> {
        (**self).next_detection()
    }
}

/// One line of a recording
#[derive(Debug, Deserialize)]
struct RecordedDetection {
    t_ms: f64,
    #[serde(default)]
    landmarks: Option<Vec<Option<Point>>>,
    #[serde(default)]
    error: Option<String>,
}

impl RecordedDetection {
    fn into_detection(self, line: usize) -> Result<Detection> {
        if let Some(error) = self.error {
            return Err(Error::PoseSource(format!("line {}: {}", line, error)));
        }
        if !self.t_ms.is_finite() || self.t_ms < 0.0 {
            return Err(Error::PoseSource(format!(
                "line {}: invalid timestamp {}",
                line, self.t_ms
            )));
        }

        let timestamp = Duration::from_nanos((self.t_ms * 1_000_000.0).round() as u64);
        Ok(match self.landmarks {
            Some(points) => Detection::Subject(LandmarkFrame::new(timestamp, points)),
            None => Detection::NoSubject { timestamp },
        })
    }
}

/// Replays a JSON-lines recording
pub struct JsonlSource<R> {
    reader: R,
    line: usize,
    buf: String,
}

impl JsonlSource<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        tracing::debug!("Replaying detections from {:?}", path);
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> JsonlSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buf: String::new(),
        }
    }
}

impl<R: BufRead> PoseSource for JsonlSource<R> {
    fn next_detection(&mut self) -> Result<Option<Detection>> {
        loop {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return Ok(None),
                Ok(_) => {}
                Err(e) if e.kind() == ErrorKind::InvalidData => {
                    // The undecodable line is consumed; later lines still play
                    self.line += 1;
                    return Err(Error::PoseSource(format!("line {}: {}", self.line, e)));
                }
                Err(e) => {
                    // An unreadable recording is a source that went away
                    tracing::warn!("Recording unreadable after line {}: {}", self.line, e);
                    return Ok(None);
                }
            }
            self.line += 1;

            let text = self.buf.trim();
            if text.is_empty() {
                continue;
            }

            let record: RecordedDetection = serde_json::from_str(text)
                .map_err(|e| Error::PoseSource(format!("line {}: {}", self.line, e)))?;
            return record.into_detection(self.line).map(Some);
        }
    }
}
