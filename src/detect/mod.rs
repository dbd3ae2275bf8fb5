mod fingers;
mod result;
mod steadiness;

pub use fingers::{count_extended_fingers, extended_fingers, FINGER_TIP_JOINTS};
pub use result::{FrameOutcome, Handedness, Status, TriggerEvent, TRIGGER_CONFIDENCE};
pub use steadiness::{
    DetectorConfig, Phase, SteadinessDetector, DEFAULT_STEADY_THRESHOLD, DEFAULT_TIME_TO_TRIGGER,
};
