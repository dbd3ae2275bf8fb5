//! HoloHand
//!
//! A "hold your hand steady, show fingers" gesture unlock for a content overlay.
//!
//! # Architecture
//!
//! Frames flow one way:
//!
//! 1. **Landmark source** (`ingest`): per frame, zero or one hand of 21
//!    normalized keypoints. Estimation itself happens outside this crate.
//! 2. **Steadiness detector** (`detect`): tracks the hand's centroid and emits
//!    a single `TriggerEvent` once it has been held still long enough.
//! 3. **Scanner session** (`scanner`): pauses the detector and opens the result
//!    overlay on trigger, re-arms it when the overlay closes.
//! 4. **Content source** (`content`): CMS items for the overlay, with a
//!    built-in fallback that is served on any failure.
//!
//! `shell` holds the two-screen navigation state around the scanner.
//!
//! # Module Structure
//!
//! - `frame`: Landmark types (HandLandmark, HandObservation, LandmarkFrame)
//! - `ingest`: Landmark sources (synthetic, recorded traces)
//! - `detect`: Steadiness detector and finger classification
//! - `scanner`, `shell`: View state
//! - `content`: Content sources
//! - `config`: File + environment configuration

pub mod config;
pub mod content;
pub mod detect;
pub mod frame;
pub mod ingest;
pub mod scanner;
pub mod shell;

pub use config::{CmsSettings, HolohandConfig, SourceSettings};
pub use content::{content_source, fallback_content, ContentBundle, ContentItem, ContentSource};
pub use detect::{
    count_extended_fingers, DetectorConfig, FrameOutcome, Handedness, Phase, SteadinessDetector,
    Status, TriggerEvent,
};
pub use frame::{Centroid, HandLandmark, HandObservation, LandmarkFrame, HAND_LANDMARK_COUNT};
pub use ingest::{open_source, LandmarkSource, SourceConfig, SourceStats};
pub use scanner::{CameraState, Key, ResultOverlay, ScannerSession, ScannerStatus, Verdict};
pub use shell::{Screen, Shell};
