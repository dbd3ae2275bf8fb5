use anyhow::{anyhow, Result};
use std::time::Duration;

use crate::detect::fingers::count_extended_fingers;
use crate::detect::result::{FrameOutcome, Status, TriggerEvent};
use crate::frame::{Centroid, HandObservation};

/// Default maximum centroid movement per frame, in normalized units.
pub const DEFAULT_STEADY_THRESHOLD: f32 = 0.05;
/// Default dwell time before a steady hold triggers.
pub const DEFAULT_TIME_TO_TRIGGER: Duration = Duration::from_millis(700);

/// Tuning for the steadiness detector.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectorConfig {
    /// A frame-to-frame centroid move at or above this breaks the hold.
    pub steady_threshold: f32,
    /// The hold must last strictly longer than this to trigger.
    pub time_to_trigger: Duration,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            steady_threshold: DEFAULT_STEADY_THRESHOLD,
            time_to_trigger: DEFAULT_TIME_TO_TRIGGER,
        }
    }
}

impl DetectorConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.steady_threshold.is_finite() || self.steady_threshold <= 0.0 {
            return Err(anyhow!(
                "steady threshold must be a positive number, got {}",
                self.steady_threshold
            ));
        }
        if self.time_to_trigger.is_zero() {
            return Err(anyhow!("time to trigger must be greater than zero"));
        }
        Ok(())
    }
}

/// Where the current steadiness session stands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Phase {
    /// No hand seen since the last reset or the last empty frame.
    NoHand,
    /// A hand is tracked but not (yet) steady.
    Tracking { prior: Centroid },
    /// The hand has stayed under the threshold since `since`.
    Holding { prior: Centroid, since: Duration },
    /// A trigger was emitted. Nothing changes until `reset()`.
    Latched,
}

/// Turns a stream of hand observations into at most one trigger per session.
///
/// The caller drives it once per delivered frame with a monotonic timestamp.
/// There is no dependency on how frames arrive, so it can be fed from a live
/// estimator, a recorded trace, or a test.
#[derive(Debug)]
pub struct SteadinessDetector {
    config: DetectorConfig,
    phase: Phase,
    paused: bool,
    status: Status,
}

impl SteadinessDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            config,
            phase: Phase::NoHand,
            paused: false,
            status: Status::WaitingForHand,
        }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_latched(&self) -> bool {
        self.phase == Phase::Latched
    }

    /// While paused, `process_frame` changes nothing and reports the frozen status.
    pub fn set_paused(&mut self, paused: bool) {
        if self.paused != paused {
            log::debug!("detector {}", if paused { "paused" } else { "resumed" });
        }
        self.paused = paused;
    }

    /// Clear the session and the latch.
    pub fn reset(&mut self) {
        self.phase = Phase::NoHand;
        self.status = Status::WaitingForHand;
    }

    /// Process one frame.
    pub fn process_frame(
        &mut self,
        observation: Option<&HandObservation>,
        now: Duration,
    ) -> FrameOutcome {
        if self.paused || self.phase == Phase::Latched {
            return FrameOutcome::status_only(self.status);
        }

        let Some(observation) = observation else {
            self.phase = Phase::NoHand;
            self.status = Status::NoHandDetected;
            return FrameOutcome::status_only(self.status);
        };

        let centroid = observation.centroid();
        if !centroid.is_finite() {
            self.phase = Phase::NoHand;
            self.status = Status::HoldHandSteady;
            return FrameOutcome::status_only(self.status);
        }

        let (phase, status, event) = match self.phase {
            Phase::NoHand | Phase::Latched => (
                Phase::Tracking { prior: centroid },
                Status::HoldHandSteady,
                None,
            ),
            Phase::Tracking { prior } | Phase::Holding { prior, .. } => {
                let distance = centroid.distance(&prior);
                if distance >= self.config.steady_threshold {
                    if matches!(self.phase, Phase::Holding { .. }) {
                        log::debug!("hold broken: centroid moved {:.3}", distance);
                    }
                    (Phase::Tracking { prior: centroid }, Status::HoldHandSteady, None)
                } else {
                    let since = match self.phase {
                        Phase::Holding { since, .. } => since,
                        _ => now,
                    };
                    let elapsed = now.saturating_sub(since);
                    if elapsed > self.config.time_to_trigger {
                        let event = TriggerEvent::with_fingers(count_extended_fingers(observation));
                        log::info!(
                            "steady hold complete after {}ms: {} finger(s) extended",
                            elapsed.as_millis(),
                            event.extended_finger_count
                        );
                        (Phase::Latched, Status::Analyzing, Some(event))
                    } else {
                        let percent = self.progress_percent(elapsed);
                        (
                            Phase::Holding {
                                prior: centroid,
                                since,
                            },
                            Status::Holding { percent },
                            None,
                        )
                    }
                }
            }
        };

        self.phase = phase;
        self.status = status;
        FrameOutcome { status, event }
    }

    fn progress_percent(&self, elapsed: Duration) -> u8 {
        let progress =
            (elapsed.as_secs_f64() / self.config.time_to_trigger.as_secs_f64()).min(1.0);
        (progress * 100.0).floor() as u8
    }
}

impl Default for SteadinessDetector {
    fn default() -> Self {
        Self::new(DetectorConfig::default())
    }
}
