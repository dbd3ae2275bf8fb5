//! Landmark sources.
//!
//! Hand landmark estimation is not done here. A source only hands over what an
//! estimator produced, one `LandmarkFrame` per camera frame:
//! - Synthetic hands (`stub://<pattern>`) for demos and tests
//! - Recorded JSON-lines traces (local files only)
//!
//! A live estimator plugs in by implementing `LandmarkSource`.
//!
//! The ingestion layer is responsible for:
//! - Stamping frames with a monotonic session time
//! - Rejecting observations that are not exactly 21 finite points
//!
//! The ingestion layer MUST NOT:
//! - Interpret the hand (that is the detector's job)
//! - Fetch remote URLs

pub mod synthetic;
pub mod trace;

use anyhow::{anyhow, Result};
use std::time::Duration;

use crate::frame::LandmarkFrame;

pub use synthetic::{synthetic_hand, SyntheticPattern, SyntheticSource};
pub use trace::TraceSource;

/// Default frame rate of generated and replayed streams.
pub const DEFAULT_TARGET_FPS: u32 = 30;

/// Configuration for a landmark source.
#[derive(Clone, Debug)]
pub struct SourceConfig {
    /// `stub://<pattern>` for synthetic hands, otherwise a local trace path.
    pub url: String,
    /// Frame rate of synthetic streams.
    pub target_fps: u32,
    /// Camera frame size the landmarks were normalized against.
    pub width: u32,
    pub height: u32,
    /// Synthetic streams stop after this long. `None` runs forever.
    pub duration: Option<Duration>,
    /// Extended fingers on synthetic hands (0..=4).
    pub fingers: u8,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: "stub://steady".to_string(),
            target_fps: DEFAULT_TARGET_FPS,
            width: 640,
            height: 480,
            duration: None,
            fingers: 4,
        }
    }
}

/// Statistics for a landmark source.
#[derive(Clone, Debug, Default)]
pub struct SourceStats {
    pub frames_delivered: u64,
    pub hands_seen: u64,
    /// Observations dropped because they had the wrong shape.
    pub rejected: u64,
    pub source: String,
}

/// Anything that can deliver landmark frames.
///
/// Frames are pulled one at a time and handed to the detector before the next
/// one is requested, so implementations never see overlapping calls.
pub trait LandmarkSource {
    /// Source identifier.
    fn name(&self) -> &'static str;

    /// Open the underlying stream.
    fn connect(&mut self) -> Result<()> {
        Ok(())
    }

    /// Next frame, or `None` once the stream is exhausted.
    fn next_frame(&mut self) -> Result<Option<LandmarkFrame>>;

    /// Check if the source is healthy.
    fn is_healthy(&self) -> bool;

    /// Get frame statistics.
    fn stats(&self) -> SourceStats;
}

/// Open the source named by `config.url`.
pub fn open_source(config: SourceConfig) -> Result<Box<dyn LandmarkSource>> {
    if config.target_fps == 0 {
        return Err(anyhow!("target fps must be >= 1"));
    }
    if let Some(pattern) = config.url.strip_prefix("stub://") {
        let pattern: SyntheticPattern = pattern.parse()?;
        return Ok(Box::new(SyntheticSource::new(config, pattern)));
    }
    if config.url.contains("://") {
        return Err(anyhow!(
            "unsupported landmark source '{}'; expected stub://<pattern> or a local trace file",
            config.url
        ));
    }
    Ok(Box::new(TraceSource::new(config)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opens_stub_sources() -> Result<()> {
        let mut source = open_source(SourceConfig {
            url: "stub://absent".to_string(),
            duration: Some(Duration::from_millis(100)),
            ..SourceConfig::default()
        })?;
        source.connect()?;
        assert_eq!(source.name(), "synthetic");
        let frame = source.next_frame()?.expect("frame");
        assert!(!frame.has_hand());
        Ok(())
    }

    #[test]
    fn rejects_remote_urls() {
        let err = open_source(SourceConfig {
            url: "http://example.com/trace.jsonl".to_string(),
            ..SourceConfig::default()
        })
        .err()
        .expect("remote url must be rejected");
        assert!(err.to_string().contains("unsupported landmark source"));
    }

    #[test]
    fn rejects_unknown_stub_pattern() {
        assert!(open_source(SourceConfig {
            url: "stub://wave".to_string(),
            ..SourceConfig::default()
        })
        .is_err());
    }

    #[test]
    fn rejects_zero_fps() {
        assert!(open_source(SourceConfig {
            target_fps: 0,
            ..SourceConfig::default()
        })
        .is_err());
    }
}
