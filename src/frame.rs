//! Hand landmark frames.
//!
//! This module defines the shape of what a landmark source delivers per frame:
//!
//! - `HandLandmark`: one normalized keypoint (x, y in [0,1], y grows downward).
//! - `HandObservation`: exactly 21 keypoints in the standard hand topology.
//! - `LandmarkFrame`: one delivered frame, with or without a hand.
//!
//! Observations can only be built through validating constructors, so anything
//! that reaches the detector already has the right shape. Sources reject
//! malformed input at the ingest boundary.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Number of keypoints in one hand observation.
pub const HAND_LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// One normalized keypoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HandLandmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl HandLandmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Mean (x, y) position of a hand's keypoints.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Centroid {
    pub x: f32,
    pub y: f32,
}

impl Centroid {
    /// Euclidean distance in normalized units.
    pub fn distance(&self, other: &Centroid) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A single detected hand: exactly 21 keypoints.
///
/// There is no public way to build one with a different point count.
#[derive(Clone, Debug, PartialEq)]
pub struct HandObservation {
    landmarks: [HandLandmark; HAND_LANDMARK_COUNT],
}

impl HandObservation {
    /// Build from an ordered point list. Rejects wrong counts and non-finite values.
    pub fn from_points(points: &[HandLandmark]) -> Result<Self> {
        if points.len() != HAND_LANDMARK_COUNT {
            return Err(anyhow!(
                "hand observation needs {} landmarks, got {}",
                HAND_LANDMARK_COUNT,
                points.len()
            ));
        }
        if let Some(idx) = points.iter().position(|p| !p.is_finite()) {
            return Err(anyhow!("landmark {} has a non-finite coordinate", idx));
        }
        let mut landmarks = [HandLandmark::default(); HAND_LANDMARK_COUNT];
        landmarks.copy_from_slice(points);
        Ok(Self { landmarks })
    }

    /// Build from a flat `[x0, y0, z0, x1, y1, z1, ...]` buffer, as estimators
    /// typically hand them over.
    pub fn from_flat(flat: &[f32]) -> Result<Self> {
        if flat.len() != HAND_LANDMARK_COUNT * 3 {
            return Err(anyhow!(
                "flat landmark buffer needs {} values, got {}",
                HAND_LANDMARK_COUNT * 3,
                flat.len()
            ));
        }
        let points: Vec<HandLandmark> = flat
            .chunks_exact(3)
            .map(|c| HandLandmark::new(c[0], c[1], c[2]))
            .collect();
        Self::from_points(&points)
    }

    /// Callers must only pass finite coordinates.
    pub(crate) fn from_array(landmarks: [HandLandmark; HAND_LANDMARK_COUNT]) -> Self {
        Self { landmarks }
    }

    pub fn landmarks(&self) -> &[HandLandmark; HAND_LANDMARK_COUNT] {
        &self.landmarks
    }

    /// Arithmetic mean of all keypoints' (x, y).
    pub fn centroid(&self) -> Centroid {
        let (sum_x, sum_y) = self
            .landmarks
            .iter()
            .fold((0.0f32, 0.0f32), |(sx, sy), lm| (sx + lm.x, sy + lm.y));
        let n = HAND_LANDMARK_COUNT as f32;
        Centroid {
            x: sum_x / n,
            y: sum_y / n,
        }
    }

    /// Same hand shifted by (dx, dy). Used by synthetic sources for jitter.
    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        let mut landmarks = self.landmarks;
        for lm in landmarks.iter_mut() {
            lm.x += dx;
            lm.y += dy;
        }
        Self { landmarks }
    }
}

/// One frame as delivered by a landmark source.
#[derive(Clone, Debug)]
pub struct LandmarkFrame {
    /// Monotonic time since the capture session started.
    pub timestamp: Duration,
    /// The detected hand, if any.
    pub observation: Option<HandObservation>,
}

impl LandmarkFrame {
    pub fn empty(timestamp: Duration) -> Self {
        Self {
            timestamp,
            observation: None,
        }
    }

    pub fn with_hand(timestamp: Duration, observation: HandObservation) -> Self {
        Self {
            timestamp,
            observation: Some(observation),
        }
    }

    pub fn has_hand(&self) -> bool {
        self.observation.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_points() -> Vec<HandLandmark> {
        (0..HAND_LANDMARK_COUNT)
            .map(|i| HandLandmark::new(0.4 + i as f32 * 0.01, 0.5, 0.0))
            .collect()
    }

    #[test]
    fn rejects_wrong_point_count() {
        let mut points = grid_points();
        points.pop();
        assert!(HandObservation::from_points(&points).is_err());
        assert!(HandObservation::from_flat(&[0.5; 60]).is_err());
    }

    #[test]
    fn rejects_non_finite_points() {
        let mut points = grid_points();
        points[7].y = f32::NAN;
        let err = HandObservation::from_points(&points).unwrap_err();
        assert!(err.to_string().contains("landmark 7"));
    }

    #[test]
    fn centroid_is_mean_of_points() -> Result<()> {
        let obs = HandObservation::from_points(&grid_points())?;
        let c = obs.centroid();
        assert!((c.x - 0.5).abs() < 1e-5);
        assert!((c.y - 0.5).abs() < 1e-5);
        Ok(())
    }

    #[test]
    fn flat_buffer_matches_point_list() -> Result<()> {
        let points = grid_points();
        let flat: Vec<f32> = points.iter().flat_map(|p| [p.x, p.y, p.z]).collect();
        let a = HandObservation::from_points(&points)?;
        let b = HandObservation::from_flat(&flat)?;
        assert_eq!(a, b);
        Ok(())
    }

    #[test]
    fn translation_moves_centroid() -> Result<()> {
        let obs = HandObservation::from_points(&grid_points())?;
        let moved = obs.translated(0.1, -0.2);
        let d = obs.centroid().distance(&moved.centroid());
        assert!((d - (0.01f32 + 0.04).sqrt()).abs() < 1e-5);
        Ok(())
    }
}
