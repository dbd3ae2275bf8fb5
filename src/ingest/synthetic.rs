//! Synthetic landmark source (`stub://<pattern>`).
//!
//! Generates a plausible open hand at a fixed spot and moves it according to
//! the pattern. Deterministic, so demos and tests see the same stream every run.

use anyhow::{anyhow, Result};
use std::str::FromStr;
use std::time::Duration;

use super::{LandmarkSource, SourceConfig, SourceStats};
use crate::detect::FINGER_TIP_JOINTS;
use crate::frame::{
    HandLandmark, HandObservation, LandmarkFrame, HAND_LANDMARK_COUNT, THUMB_CMC, THUMB_IP,
    THUMB_MCP, THUMB_TIP, WRIST,
};

/// Per-frame offset of the `steady` pattern, well under the default threshold.
const STEADY_JITTER: f32 = 0.004;
/// Per-frame jump of the `jitter` pattern, well over the default threshold.
const JITTER_JUMP: f32 = 0.2;

/// How the synthetic hand behaves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyntheticPattern {
    /// Hand held still with sub-threshold tremor.
    Steady,
    /// Hand jumping back and forth every frame.
    Jitter,
    /// No hand in view.
    Absent,
    /// Steady closed fist, regardless of the configured finger count.
    Fist,
}

impl FromStr for SyntheticPattern {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim_end_matches('/') {
            "" | "steady" => Ok(Self::Steady),
            "jitter" => Ok(Self::Jitter),
            "absent" => Ok(Self::Absent),
            "fist" => Ok(Self::Fist),
            other => Err(anyhow!(
                "unknown synthetic pattern '{}'; expected steady, jitter, absent or fist",
                other
            )),
        }
    }
}

/// Build an upright hand with the first `extended` non-thumb fingers
/// (index first) pointing up and the rest curled.
pub fn synthetic_hand(extended: u8) -> HandObservation {
    let mut points = [HandLandmark::default(); HAND_LANDMARK_COUNT];
    points[WRIST] = HandLandmark::new(0.50, 0.80, 0.0);
    points[THUMB_CMC] = HandLandmark::new(0.45, 0.75, -0.01);
    points[THUMB_MCP] = HandLandmark::new(0.41, 0.70, -0.02);
    points[THUMB_IP] = HandLandmark::new(0.38, 0.66, -0.03);
    points[THUMB_TIP] = HandLandmark::new(0.36, 0.62, -0.03);

    for (finger, (tip, pip)) in FINGER_TIP_JOINTS.iter().enumerate() {
        let x = 0.44 + finger as f32 * 0.05;
        let mcp = pip - 1;
        let dip = tip - 1;
        points[mcp] = HandLandmark::new(x, 0.62, 0.0);
        points[*pip] = HandLandmark::new(x, 0.52, -0.01);
        if finger < usize::from(extended) {
            points[dip] = HandLandmark::new(x, 0.46, -0.02);
            points[*tip] = HandLandmark::new(x, 0.41, -0.02);
        } else {
            points[dip] = HandLandmark::new(x, 0.57, -0.03);
            points[*tip] = HandLandmark::new(x, 0.60, -0.02);
        }
    }

    HandObservation::from_array(points)
}

pub struct SyntheticSource {
    config: SourceConfig,
    pattern: SyntheticPattern,
    hand: HandObservation,
    frame_count: u64,
    hands_seen: u64,
    frame_limit: Option<u64>,
}

impl SyntheticSource {
    pub fn new(config: SourceConfig, pattern: SyntheticPattern) -> Self {
        let fingers = match pattern {
            SyntheticPattern::Fist => 0,
            _ => config.fingers.min(4),
        };
        let fps = u128::from(config.target_fps.max(1));
        let frame_limit = config
            .duration
            .map(|d| ((d.as_millis() * fps).div_ceil(1000)) as u64);
        Self {
            hand: synthetic_hand(fingers),
            config,
            pattern,
            frame_count: 0,
            hands_seen: 0,
            frame_limit,
        }
    }

    fn observation_for(&self, index: u64) -> Option<HandObservation> {
        let odd = index % 2 == 1;
        match self.pattern {
            SyntheticPattern::Absent => None,
            SyntheticPattern::Steady | SyntheticPattern::Fist => {
                let dx = if odd { STEADY_JITTER } else { -STEADY_JITTER };
                Some(self.hand.translated(dx, 0.0))
            }
            SyntheticPattern::Jitter => {
                let dx = if odd { JITTER_JUMP } else { 0.0 };
                Some(self.hand.translated(dx, 0.0))
            }
        }
    }
}

impl LandmarkSource for SyntheticSource {
    fn name(&self) -> &'static str {
        "synthetic"
    }

    fn connect(&mut self) -> Result<()> {
        log::info!(
            "SyntheticSource: connected to {} ({}x{} @ {} fps)",
            self.config.url,
            self.config.width,
            self.config.height,
            self.config.target_fps
        );
        Ok(())
    }

    fn next_frame(&mut self) -> Result<Option<LandmarkFrame>> {
        if let Some(limit) = self.frame_limit {
            if self.frame_count >= limit {
                return Ok(None);
            }
        }
        let index = self.frame_count;
        self.frame_count += 1;

        let timestamp =
            Duration::from_secs_f64(index as f64 / f64::from(self.config.target_fps.max(1)));
        let observation = self.observation_for(index);
        if observation.is_some() {
            self.hands_seen += 1;
        }
        Ok(Some(LandmarkFrame {
            timestamp,
            observation,
        }))
    }

    fn is_healthy(&self) -> bool {
        true
    }

    fn stats(&self) -> SourceStats {
        SourceStats {
            frames_delivered: self.frame_count,
            hands_seen: self.hands_seen,
            rejected: 0,
            source: self.config.url.clone(),
        }
    }
}
