//! Recorded landmark trace source.
//!
//! Replays a local JSON-lines file, one frame per line:
//!
//! ```text
//! {"t_ms": 0, "landmarks": [{"x": 0.51, "y": 0.42, "z": -0.01}, ...]}
//! {"t_ms": 33, "landmarks": [[0.51, 0.42, -0.01], ...]}
//! {"t_ms": 66, "landmarks": null}
//! ```
//!
//! Points may be objects or `[x, y]` / `[x, y, z]` arrays. Blank lines and
//! lines starting with `#` are skipped. A line whose hand is not exactly 21
//! finite points is delivered as an empty frame and counted as rejected.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::PathBuf;
use std::time::Duration;

use super::{LandmarkSource, SourceConfig, SourceStats};
use crate::frame::{HandLandmark, HandObservation, LandmarkFrame};

#[derive(Debug, Deserialize)]
struct TraceLine {
    t_ms: u64,
    #[serde(default)]
    landmarks: Option<Vec<TracePoint>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TracePoint {
    Xyz([f32; 3]),
    Xy([f32; 2]),
    Object(HandLandmark),
}

impl From<TracePoint> for HandLandmark {
    fn from(point: TracePoint) -> Self {
        match point {
            TracePoint::Xyz([x, y, z]) => HandLandmark::new(x, y, z),
            TracePoint::Xy([x, y]) => HandLandmark::new(x, y, 0.0),
            TracePoint::Object(lm) => lm,
        }
    }
}

pub struct TraceSource {
    config: SourceConfig,
    path: PathBuf,
    lines: Option<Lines<BufReader<File>>>,
    line_no: u64,
    frame_count: u64,
    hands_seen: u64,
    rejected: u64,
    last_timestamp: Duration,
    exhausted: bool,
}

impl TraceSource {
    pub fn new(config: SourceConfig) -> Result<Self> {
        if config.url.trim().is_empty() {
            return Err(anyhow!("trace source needs a file path"));
        }
        let path = PathBuf::from(&config.url);
        Ok(Self {
            config,
            path,
            lines: None,
            line_no: 0,
            frame_count: 0,
            hands_seen: 0,
            rejected: 0,
            last_timestamp: Duration::ZERO,
            exhausted: false,
        })
    }

    fn parse_line(&mut self, raw: &str) -> Result<LandmarkFrame> {
        let line: TraceLine = serde_json::from_str(raw)
            .with_context(|| format!("{}:{}: invalid trace line", self.path.display(), self.line_no))?;

        // Clamp to the previous frame so replayed time never runs backwards.
        let timestamp = Duration::from_millis(line.t_ms).max(self.last_timestamp);
        self.last_timestamp = timestamp;

        let Some(points) = line.landmarks else {
            return Ok(LandmarkFrame::empty(timestamp));
        };
        let points: Vec<HandLandmark> = points.into_iter().map(HandLandmark::from).collect();
        match HandObservation::from_points(&points) {
            Ok(observation) => Ok(LandmarkFrame::with_hand(timestamp, observation)),
            Err(e) => {
                log::warn!(
                    "{}:{}: dropping observation: {}",
                    self.path.display(),
                    self.line_no,
                    e
                );
                self.rejected += 1;
                Ok(LandmarkFrame::empty(timestamp))
            }
        }
    }
}

impl LandmarkSource for TraceSource {
    fn name(&self) -> &'static str {
        "trace"
    }

    fn connect(&mut self) -> Result<()> {
        let file = File::open(&self.path)
            .with_context(|| format!("open landmark trace {}", self.path.display()))?;
        self.lines = Some(BufReader::new(file).lines());
        self.exhausted = false;
        log::info!("TraceSource: replaying {}", self.path.display());
        Ok(())
    }

    fn next_frame(&mut self) -> Result<Option<LandmarkFrame>> {
        loop {
            let Some(lines) = self.lines.as_mut() else {
                return Err(anyhow!("trace source {} is not connected", self.config.url));
            };
            let Some(raw) = lines.next() else {
                self.exhausted = true;
                return Ok(None);
            };
            self.line_no += 1;
            let raw = raw.with_context(|| format!("read {}", self.path.display()))?;
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let frame = self.parse_line(trimmed)?;
            self.frame_count += 1;
            if frame.has_hand() {
                self.hands_seen += 1;
            }
            return Ok(Some(frame));
        }
    }

    fn is_healthy(&self) -> bool {
        self.lines.is_some() && !self.exhausted
    }

    fn stats(&self) -> SourceStats {
        SourceStats {
            frames_delivered: self.frame_count,
            hands_seen: self.hands_seen,
            rejected: self.rejected,
            source: self.config.url.clone(),
        }
    }
}
