//! End-to-end pipeline scenarios against scripted detector backends.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;

use handwatch::{
    AlertSink, Annotator, Frame, HandInstance, Keypoint, OverlapEngine, PersonBox,
    ScreenshotStore, ScriptedHands, ScriptedPersons, SideEffect, CLEAR_COLOR, OVERLAP_COLOR,
};

struct CountingSink(Arc<AtomicUsize>);

impl AlertSink for CountingSink {
    fn alert(&mut self) -> Result<()> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn frame() -> Frame {
    Frame::new(vec![0u8; 160 * 120 * 3], 160, 120).unwrap()
}

fn person_box() -> PersonBox {
    PersonBox {
        x1: 10,
        y1: 10,
        x2: 100,
        y2: 100,
        confidence: 0.9,
        class_id: 15,
    }
}

fn hand_inside() -> Vec<HandInstance> {
    vec![HandInstance::new(vec![Keypoint::new(50, 50)])]
}

#[test]
fn overlap_alert_cooldown_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let beeps = Arc::new(AtomicUsize::new(0));
    let mut engine = OverlapEngine::new(
        Box::new(ScriptedHands::new(vec![hand_inside(), hand_inside()])),
        Box::new(ScriptedPersons::new(vec![
            vec![person_box()],
            vec![person_box()],
        ])),
        Box::new(CountingSink(beeps.clone())),
        ScreenshotStore::new(dir.path()).unwrap(),
        Annotator::new(None),
    );

    // First frame at t=0: overlap, one beep, evidence index 0.
    let report = engine.process_frame(&frame(), 0.0);
    assert_eq!(report.verdicts.len(), 1);
    assert!(report.verdicts[0].hand_inside);
    assert_eq!(*report.image.get_pixel(10, 10), OVERLAP_COLOR);
    assert_eq!(beeps.load(Ordering::SeqCst), 1);

    let expected = dir.path().join("screenshot_000.jpg");
    assert!(report
        .effects
        .contains(&SideEffect::Screenshot(expected.clone())));
    assert!(expected.is_file());

    let state = engine.state();
    assert_eq!(state.screenshot_counter, 1);
    assert_eq!(state.last_alert_secs, Some(0.0));

    // Second identical frame at t=0.5: overlap detected again, but the
    // cooldown swallows the alert.
    let report = engine.process_frame(&frame(), 0.5);
    assert!(report.verdicts[0].hand_inside);
    assert!(report.effects.is_empty());
    assert_eq!(beeps.load(Ordering::SeqCst), 1);
    assert_eq!(engine.state().screenshot_counter, 1);
    assert_eq!(engine.state().last_alert_secs, Some(0.0));
}

#[test]
fn empty_hand_set_labels_every_box_clear() {
    let dir = tempfile::tempdir().unwrap();
    let beeps = Arc::new(AtomicUsize::new(0));
    let mut engine = OverlapEngine::new(
        Box::new(ScriptedHands::empty()),
        Box::new(ScriptedPersons::new(vec![vec![
            person_box(),
            PersonBox {
                x1: 110,
                y1: 10,
                x2: 150,
                y2: 100,
                confidence: 0.99,
                class_id: 15,
            },
        ]])),
        Box::new(CountingSink(beeps.clone())),
        ScreenshotStore::new(dir.path()).unwrap(),
        Annotator::new(None),
    );

    let report = engine.process_frame(&frame(), 0.0);
    assert_eq!(report.verdicts.len(), 2);
    assert!(report.verdicts.iter().all(|v| !v.hand_inside));
    assert_eq!(*report.image.get_pixel(10, 10), CLEAR_COLOR);
    assert_eq!(*report.image.get_pixel(110, 10), CLEAR_COLOR);
    assert!(report.effects.is_empty());
    assert_eq!(beeps.load(Ordering::SeqCst), 0);
}

#[test]
fn alerts_far_enough_apart_both_fire() {
    let dir = tempfile::tempdir().unwrap();
    let beeps = Arc::new(AtomicUsize::new(0));
    let mut engine = OverlapEngine::new(
        Box::new(ScriptedHands::new(vec![hand_inside(), hand_inside()])),
        Box::new(ScriptedPersons::new(vec![
            vec![person_box()],
            vec![person_box()],
        ])),
        Box::new(CountingSink(beeps.clone())),
        ScreenshotStore::new(dir.path()).unwrap(),
        Annotator::new(None),
    );

    assert!(engine.process_frame(&frame(), 0.0).alert_fired());
    assert!(engine.process_frame(&frame(), 2.1).alert_fired());
    assert_eq!(beeps.load(Ordering::SeqCst), 2);
    assert!(dir.path().join("screenshot_000.jpg").is_file());
    assert!(dir.path().join("screenshot_001.jpg").is_file());
}
