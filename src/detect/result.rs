use serde::{Deserialize, Serialize};
use std::fmt;

/// Confidence reported with every trigger. The estimator's per-hand score is
/// not consulted.
pub const TRIGGER_CONFIDENCE: f32 = 0.98;

/// Which hand triggered. Always `Right`; real handedness is not classified.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Handedness {
    #[default]
    Right,
}

impl fmt::Display for Handedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handedness::Right => f.write_str("Right"),
        }
    }
}

/// Emitted exactly once when a steady hold completes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TriggerEvent {
    /// Extended non-thumb fingers, 0..=4.
    pub extended_finger_count: u8,
    pub confidence: f32,
    pub handedness: Handedness,
}

impl TriggerEvent {
    pub(crate) fn with_fingers(extended_finger_count: u8) -> Self {
        Self {
            extended_finger_count: extended_finger_count.min(4),
            confidence: TRIGGER_CONFIDENCE,
            handedness: Handedness::Right,
        }
    }
}

/// Detector feedback for the status line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    WaitingForHand,
    NoHandDetected,
    HoldHandSteady,
    /// Dwell progress, 0..=100.
    Holding { percent: u8 },
    Analyzing,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::WaitingForHand => f.write_str("waiting for hand"),
            Status::NoHandDetected => f.write_str("no hand detected"),
            Status::HoldHandSteady => f.write_str("hold hand steady"),
            Status::Holding { percent } => write!(f, "holding... {}%", percent),
            Status::Analyzing => f.write_str("analyzing"),
        }
    }
}

/// Result of processing one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameOutcome {
    pub status: Status,
    pub event: Option<TriggerEvent>,
}

impl FrameOutcome {
    pub(crate) fn status_only(status: Status) -> Self {
        Self {
            status,
            event: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_text() {
        assert_eq!(Status::NoHandDetected.to_string(), "no hand detected");
        assert_eq!(Status::HoldHandSteady.to_string(), "hold hand steady");
        assert_eq!(Status::Holding { percent: 42 }.to_string(), "holding... 42%");
        assert_eq!(Status::Analyzing.to_string(), "analyzing");
    }

    #[test]
    fn trigger_event_serializes_for_consumers() {
        let ev = TriggerEvent::with_fingers(3);
        let json = serde_json::to_value(ev).unwrap();
        assert_eq!(json["extended_finger_count"], 3);
        assert_eq!(json["handedness"], "Right");
    }

    #[test]
    fn finger_count_is_capped() {
        assert_eq!(TriggerEvent::with_fingers(9).extended_finger_count, 4);
    }
}
