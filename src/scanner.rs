//! Scanner screen state.
//!
//! A `ScannerSession` owns one steadiness detector for as long as the scanner
//! screen is open. It feeds the detector once per frame, opens the result
//! overlay when a trigger arrives, and re-arms the detector when the overlay is
//! closed. Nothing here draws pixels; `render_lines` produces the text a view
//! layer shows.

use std::fmt;
use std::time::Duration;

use crate::content::ContentBundle;
use crate::detect::{SteadinessDetector, Status, TriggerEvent};
use crate::frame::HandObservation;

/// Fingers needed to unlock the content panel.
pub const UNLOCK_FINGER_COUNT: u8 = 3;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CameraState {
    #[default]
    Initializing,
    Ready,
    /// The user refused camera access. Needs action outside the app.
    PermissionDenied,
}

/// Keys the scanner reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Escape,
    Char(char),
}

/// What the status line shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScannerStatus {
    Initializing,
    PermissionDenied,
    Detector(Status),
}

impl fmt::Display for ScannerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScannerStatus::Initializing => f.write_str("initializing"),
            ScannerStatus::PermissionDenied => f.write_str("camera permission denied"),
            ScannerStatus::Detector(status) => fmt::Display::fmt(status, f),
        }
    }
}

/// Result of feeding one frame to the scanner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScannerFrame {
    pub status: ScannerStatus,
    /// Set on the frame that opened the overlay.
    pub event: Option<TriggerEvent>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Unlocked,
    Locked,
}

/// The decorative 3D scene behind the verdict: a wireframe icosahedron inside
/// a thin torus, both spinning slowly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecorativeScene {
    pub color: &'static str,
    pub icosahedron_radius: f32,
    pub torus_radius: f32,
    pub torus_tube: f32,
    /// Icosahedron spin, radians per second around x and y.
    pub spin_rate: (f32, f32),
}

impl Default for DecorativeScene {
    fn default() -> Self {
        Self {
            color: "#00f3ff",
            icosahedron_radius: 1.5,
            torus_radius: 2.5,
            torus_tube: 0.02,
            spin_rate: (0.2, 0.5),
        }
    }
}

impl DecorativeScene {
    /// Icosahedron rotation (x, y) in radians after `elapsed`, wrapped to one turn.
    pub fn rotation_at(&self, elapsed: Duration) -> (f32, f32) {
        let t = elapsed.as_secs_f32();
        let turn = std::f32::consts::TAU;
        (
            (self.spin_rate.0 * t).rem_euclid(turn),
            (self.spin_rate.1 * t).rem_euclid(turn),
        )
    }
}

/// Modal view opened by a trigger.
#[derive(Clone, Debug, PartialEq)]
pub struct ResultOverlay {
    pub event: TriggerEvent,
    pub verdict: Verdict,
    pub scene: DecorativeScene,
    content: ContentBundle,
}

impl ResultOverlay {
    pub fn new(event: TriggerEvent, content: &ContentBundle) -> Self {
        let verdict = if event.extended_finger_count >= UNLOCK_FINGER_COUNT {
            Verdict::Unlocked
        } else {
            Verdict::Locked
        };
        Self {
            event,
            verdict,
            scene: DecorativeScene::default(),
            content: content.clone(),
        }
    }

    pub fn headline(&self) -> &'static str {
        match self.verdict {
            Verdict::Unlocked => "YOU ARE GOOD",
            Verdict::Locked => "KEEP TRYING",
        }
    }

    pub fn confidence_percent(&self) -> u32 {
        (self.event.confidence * 100.0).round().max(0.0) as u32
    }

    /// The content panel, only when unlocked.
    pub fn visible_content(&self) -> Option<&ContentBundle> {
        match self.verdict {
            Verdict::Unlocked => Some(&self.content),
            Verdict::Locked => None,
        }
    }

    pub fn render_lines(&self) -> Vec<String> {
        let mut lines = vec![
            "Analysis Complete".to_string(),
            format!("CONFIDENCE: {}%", self.confidence_percent()),
            format!("FINGERS DETECTED: {}", self.event.extended_finger_count),
            self.headline().to_string(),
        ];
        match self.visible_content() {
            Some(content) => {
                lines.push("LATEST INSIGHTS".to_string());
                for item in &content.primary_items {
                    lines.push(format!("  {}: {} <{}>", item.title, item.excerpt, item.url));
                }
                lines.push("PREMIUM EBOOKS".to_string());
                for item in &content.secondary_items {
                    lines.push(format!("  {} - Download PDF <{}>", item.title, item.url));
                }
            }
            None => lines.push("Locked. Please show 3+ fingers.".to_string()),
        }
        lines.push("PRESS [ESC] TO CLOSE".to_string());
        lines
    }
}

/// State of one open scanner screen.
#[derive(Debug)]
pub struct ScannerSession {
    detector: SteadinessDetector,
    content: ContentBundle,
    camera: CameraState,
    overlay: Option<ResultOverlay>,
}

impl ScannerSession {
    /// `content` is fetched once by the caller when the screen opens.
    pub fn new(detector: SteadinessDetector, content: ContentBundle) -> Self {
        Self {
            detector,
            content,
            camera: CameraState::Initializing,
            overlay: None,
        }
    }

    pub fn camera_started(&mut self) {
        self.camera = CameraState::Ready;
        self.detector.reset();
        log::info!("camera ready; waiting for hand");
    }

    pub fn camera_denied(&mut self) {
        self.camera = CameraState::PermissionDenied;
        log::warn!("camera permission denied");
    }

    pub fn camera(&self) -> CameraState {
        self.camera
    }

    pub fn detector(&self) -> &SteadinessDetector {
        &self.detector
    }

    pub fn content(&self) -> &ContentBundle {
        &self.content
    }

    pub fn overlay(&self) -> Option<&ResultOverlay> {
        self.overlay.as_ref()
    }

    pub fn status(&self) -> ScannerStatus {
        match self.camera {
            CameraState::Initializing => ScannerStatus::Initializing,
            CameraState::PermissionDenied => ScannerStatus::PermissionDenied,
            CameraState::Ready => ScannerStatus::Detector(self.detector.status()),
        }
    }

    /// Feed one frame. Frames are ignored until the camera is ready.
    pub fn on_frame(&mut self, observation: Option<&HandObservation>, now: Duration) -> ScannerFrame {
        if self.camera != CameraState::Ready {
            return ScannerFrame {
                status: self.status(),
                event: None,
            };
        }

        let outcome = self.detector.process_frame(observation, now);
        if let Some(event) = outcome.event {
            self.detector.set_paused(true);
            let overlay = ResultOverlay::new(event, &self.content);
            log::info!(
                "overlay opened: {} ({} finger(s))",
                overlay.headline(),
                event.extended_finger_count
            );
            self.overlay = Some(overlay);
        }
        ScannerFrame {
            status: ScannerStatus::Detector(outcome.status),
            event: outcome.event,
        }
    }

    /// Close the overlay and re-arm the detector. Returns false if nothing was open.
    pub fn close_overlay(&mut self) -> bool {
        if self.overlay.take().is_none() {
            return false;
        }
        self.detector.reset();
        self.detector.set_paused(false);
        log::debug!("overlay closed; detector re-armed");
        true
    }

    pub fn handle_key(&mut self, key: Key) -> bool {
        match key {
            Key::Escape => self.close_overlay(),
            Key::Char(_) => false,
        }
    }

    pub fn render_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if self.camera == CameraState::PermissionDenied {
            lines.push("Camera Access Required".to_string());
        }
        lines.push(format!("STATUS: {}", self.status().to_string().to_uppercase()));
        if let Some(overlay) = &self.overlay {
            lines.extend(overlay.render_lines());
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::fallback_content;
    use crate::detect::Phase;
    use crate::ingest::synthetic_hand;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn ready_session() -> ScannerSession {
        let mut session = ScannerSession::new(SteadinessDetector::default(), fallback_content());
        session.camera_started();
        session
    }

    fn hold(session: &mut ScannerSession, fingers: u8, from: u64, to: u64) -> Option<TriggerEvent> {
        let hand = synthetic_hand(fingers);
        let mut event = None;
        let mut t = from;
        while t <= to {
            let frame = session.on_frame(Some(&hand), ms(t));
            if frame.event.is_some() {
                event = frame.event;
            }
            t += 33;
        }
        event
    }

    #[test]
    fn frames_ignored_until_camera_ready() {
        let mut session = ScannerSession::new(SteadinessDetector::default(), fallback_content());
        let frame = session.on_frame(Some(&synthetic_hand(4)), ms(0));
        assert_eq!(frame.status, ScannerStatus::Initializing);
        assert_eq!(session.detector().phase(), Phase::NoHand);
    }

    #[test]
    fn permission_denied_blocks_scanning() {
        let mut session = ScannerSession::new(SteadinessDetector::default(), fallback_content());
        session.camera_denied();
        assert!(hold(&mut session, 4, 0, 2000).is_none());
        let lines = session.render_lines();
        assert_eq!(lines[0], "Camera Access Required");
        assert_eq!(lines[1], "STATUS: CAMERA PERMISSION DENIED");
    }

    #[test]
    fn trigger_opens_unlocked_overlay_and_pauses() {
        let mut session = ready_session();
        let event = hold(&mut session, 4, 0, 900).expect("trigger");
        assert_eq!(event.extended_finger_count, 4);
        assert!(session.detector().is_paused());

        let overlay = session.overlay().expect("overlay");
        assert_eq!(overlay.verdict, Verdict::Unlocked);
        assert_eq!(overlay.headline(), "YOU ARE GOOD");
        assert_eq!(overlay.confidence_percent(), 98);
        assert_eq!(overlay.visible_content(), Some(&fallback_content()));

        let lines = session.render_lines();
        assert!(lines.contains(&"LATEST INSIGHTS".to_string()));
        assert!(lines.iter().any(|l| l.contains("Q4 Market Insights")));
    }

    #[test]
    fn two_fingers_keep_content_locked() {
        let mut session = ready_session();
        hold(&mut session, 2, 0, 900).expect("trigger");
        let overlay = session.overlay().expect("overlay");
        assert_eq!(overlay.verdict, Verdict::Locked);
        assert_eq!(overlay.headline(), "KEEP TRYING");
        assert!(overlay.visible_content().is_none());
        assert!(session
            .render_lines()
            .contains(&"Locked. Please show 3+ fingers.".to_string()));
    }

    #[test]
    fn three_fingers_unlock() {
        let mut session = ready_session();
        hold(&mut session, 3, 0, 900).expect("trigger");
        assert_eq!(session.overlay().map(|o| o.verdict), Some(Verdict::Unlocked));
    }

    #[test]
    fn escape_closes_overlay_and_rearms() {
        let mut session = ready_session();
        hold(&mut session, 4, 0, 900).expect("trigger");

        assert!(!session.handle_key(Key::Char('q')));
        assert!(session.overlay().is_some());

        assert!(session.handle_key(Key::Escape));
        assert!(session.overlay().is_none());
        assert!(!session.detector().is_paused());
        assert!(!session.detector().is_latched());
        assert_eq!(
            session.status(),
            ScannerStatus::Detector(Status::WaitingForHand)
        );

        // Closing twice is harmless.
        assert!(!session.close_overlay());

        let event = hold(&mut session, 1, 2000, 2900).expect("second trigger");
        assert_eq!(event.extended_finger_count, 1);
    }

    #[test]
    fn frames_while_overlay_open_do_nothing() {
        let mut session = ready_session();
        hold(&mut session, 4, 0, 900).expect("trigger");
        let frame = session.on_frame(None, ms(1000));
        assert_eq!(frame.status, ScannerStatus::Detector(Status::Analyzing));
        assert!(frame.event.is_none());
        assert!(hold(&mut session, 4, 1100, 3000).is_none());
    }

    #[test]
    fn scene_rotation_wraps() {
        let scene = DecorativeScene::default();
        let (x, y) = scene.rotation_at(Duration::from_secs(10));
        assert!((x - 2.0).abs() < 1e-4);
        assert!((y - 5.0).abs() < 1e-4);
        let (_, y) = scene.rotation_at(Duration::from_secs(20));
        assert!((y - (10.0 - std::f32::consts::TAU)).abs() < 1e-4);
    }
}
