use std::time::Duration;

use holohand::ingest::synthetic_hand;
use holohand::{HandObservation, Handedness, Phase, SteadinessDetector, Status, TriggerEvent};

const FRAME_MS: f64 = 1000.0 / 30.0;

fn at(frame: u32) -> Duration {
    Duration::from_secs_f64(f64::from(frame) * FRAME_MS / 1000.0)
}

/// Frames `[from, to)` of a hand with sub-threshold jitter; returns every event seen.
fn feed_steady(
    detector: &mut SteadinessDetector,
    hand: &HandObservation,
    from: u32,
    to: u32,
) -> Vec<TriggerEvent> {
    let mut events = Vec::new();
    for frame in from..to {
        let dx = if frame % 2 == 0 { 0.004 } else { -0.004 };
        let observation = hand.translated(dx, 0.0);
        if let Some(event) = detector.process_frame(Some(&observation), at(frame)).event {
            events.push(event);
        }
    }
    events
}

#[test]
fn open_palm_held_steady_triggers_once() {
    let mut detector = SteadinessDetector::default();
    let hand = synthetic_hand(4);

    // 25 frames (0..=800ms): the hold starts on the second frame and fires
    // once it has lasted longer than 700ms.
    let events = feed_steady(&mut detector, &hand, 0, 25);
    assert_eq!(events.len(), 1);
    let event = events[0];
    assert_eq!(event.extended_finger_count, 4);
    assert_eq!(event.confidence, 0.98);
    assert_eq!(event.handedness, Handedness::Right);
    assert_eq!(detector.status(), Status::Analyzing);
    assert!(detector.is_latched());

    // Still latched: more steady frames emit nothing.
    assert!(feed_steady(&mut detector, &hand, 25, 90).is_empty());
    assert_eq!(detector.status(), Status::Analyzing);
}

#[test]
fn dwell_boundary_at_thirty_fps() {
    // Whole-nanosecond frame times so the boundary does not depend on float rounding.
    fn frame_time(frame: u64) -> Duration {
        Duration::from_nanos(frame * 33_333_333)
    }
    let hand = synthetic_hand(4);

    // 23 frames span ~733ms, but the hold only starts at frame 1: 700ms is not enough.
    let mut detector = SteadinessDetector::default();
    for frame in 0..23 {
        let outcome = detector.process_frame(Some(&hand), frame_time(frame));
        assert!(outcome.event.is_none(), "frame {frame}");
    }
    assert_eq!(detector.status(), Status::Holding { percent: 99 });

    // The 24th frame crosses it.
    let outcome = detector.process_frame(Some(&hand), frame_time(23));
    assert_eq!(outcome.event.map(|e| e.extended_finger_count), Some(4));
    assert_eq!(outcome.status, Status::Analyzing);
}

#[test]
fn jumping_hand_never_triggers() {
    let mut detector = SteadinessDetector::default();
    let hand = synthetic_hand(4);

    for frame in 0..60 {
        let dx = if frame % 2 == 0 { 0.0 } else { 0.2 };
        let outcome = detector.process_frame(Some(&hand.translated(dx, 0.0)), at(frame));
        assert!(outcome.event.is_none());
        assert_eq!(outcome.status, Status::HoldHandSteady);
        assert!(matches!(detector.phase(), Phase::Tracking { .. }));
    }
}

#[test]
fn absent_frames_keep_session_empty() {
    let mut detector = SteadinessDetector::default();
    for frame in 0..10 {
        let outcome = detector.process_frame(None, at(frame));
        assert_eq!(outcome.status, Status::NoHandDetected);
        assert!(outcome.event.is_none());
        assert_eq!(detector.phase(), Phase::NoHand);
    }
}

#[test]
fn reset_allows_second_trigger() {
    let mut detector = SteadinessDetector::default();
    let hand = synthetic_hand(2);

    assert_eq!(feed_steady(&mut detector, &hand, 0, 25).len(), 1);
    detector.reset();
    assert_eq!(detector.phase(), Phase::NoHand);

    let events = feed_steady(&mut detector, &hand, 30, 55);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].extended_finger_count, 2);
}

#[test]
fn motion_restarts_dwell_from_breaking_frame() {
    let mut detector = SteadinessDetector::default();
    let hand = synthetic_hand(4);

    // Hold for ~500ms, then jump.
    assert!(feed_steady(&mut detector, &hand, 0, 16).is_empty());
    let moved = hand.translated(0.3, 0.0);
    let outcome = detector.process_frame(Some(&moved), at(16));
    assert_eq!(outcome.status, Status::HoldHandSteady);
    assert!(outcome.event.is_none());

    // The earlier 500ms must not count: another 600ms is not enough.
    assert!(feed_steady(&mut detector, &moved, 17, 35).is_empty());
    // Crossing 700ms from the new hold start fires.
    assert_eq!(feed_steady(&mut detector, &moved, 35, 45).len(), 1);
}

#[test]
fn absent_frame_mid_hold_resets_dwell() {
    let mut detector = SteadinessDetector::default();
    let hand = synthetic_hand(4);

    assert!(feed_steady(&mut detector, &hand, 0, 20).is_empty());
    detector.process_frame(None, at(20));
    detector.process_frame(None, at(21));
    assert_eq!(detector.phase(), Phase::NoHand);

    assert!(feed_steady(&mut detector, &hand, 22, 40).is_empty());
    assert_eq!(feed_steady(&mut detector, &hand, 40, 50).len(), 1);
}

#[test]
fn paused_detector_ignores_everything() {
    let mut detector = SteadinessDetector::default();
    let hand = synthetic_hand(4);
    feed_steady(&mut detector, &hand, 0, 10);
    let phase = detector.phase();
    let status = detector.status();

    detector.set_paused(true);
    for frame in 10..100 {
        let observation = if frame % 3 == 0 { None } else { Some(&hand) };
        let outcome = detector.process_frame(observation, at(frame));
        assert_eq!(outcome.status, status);
        assert!(outcome.event.is_none());
    }
    assert_eq!(detector.phase(), phase);
}

#[test]
fn progress_climbs_while_holding() {
    let mut detector = SteadinessDetector::default();
    let hand = synthetic_hand(4);

    let mut last = 0u8;
    for frame in 0..22 {
        let status = detector.process_frame(Some(&hand), at(frame)).status;
        if let Status::Holding { percent } = status {
            assert!(percent >= last);
            assert!(percent <= 100);
            last = percent;
        }
    }
    assert!(last >= 90);
    assert!(detector.status().to_string().starts_with("holding"));
}

#[test]
fn finger_count_tracks_synthetic_hand() {
    for fingers in 0..=4u8 {
        let mut detector = SteadinessDetector::default();
        let events = feed_steady(&mut detector, &synthetic_hand(fingers), 0, 30);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].extended_finger_count, fingers);
    }
}
