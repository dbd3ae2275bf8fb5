use crate::frame::{
    HandObservation, INDEX_PIP, INDEX_TIP, MIDDLE_PIP, MIDDLE_TIP, PINKY_PIP, PINKY_TIP, RING_PIP,
    RING_TIP,
};

/// (tip, proximal joint) pairs for the four non-thumb fingers.
pub const FINGER_TIP_JOINTS: [(usize, usize); 4] = [
    (INDEX_TIP, INDEX_PIP),
    (MIDDLE_TIP, MIDDLE_PIP),
    (RING_TIP, RING_PIP),
    (PINKY_TIP, PINKY_PIP),
];

/// Per-finger extension flags in index, middle, ring, pinky order.
///
/// A finger is extended when its tip sits above its PIP joint on the frame
/// (smaller y). The thumb is never considered.
pub fn extended_fingers(observation: &HandObservation) -> [bool; 4] {
    let lm = observation.landmarks();
    FINGER_TIP_JOINTS.map(|(tip, joint)| lm[tip].y < lm[joint].y)
}

/// Number of extended non-thumb fingers, always 0..=4.
pub fn count_extended_fingers(observation: &HandObservation) -> u8 {
    extended_fingers(observation)
        .iter()
        .filter(|extended| **extended)
        .count() as u8
}
