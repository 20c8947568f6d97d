//! Overlap & alert engine.
//!
//! Per frame: obtain hand keypoints and person boxes from the two detector
//! seams, test inclusive point-in-box containment, annotate, and fire the
//! cooldown-gated side effects (beep + evidence screenshot). Detector failures
//! degrade to empty result sets; nothing per-frame ever aborts the pipeline.

use std::path::PathBuf;

use image::RgbImage;

use crate::annotate::Annotator;
use crate::detect::{HandLocator, Keypoint, PersonBox, PersonDetector};
use crate::frame::Frame;
use crate::notify::AlertSink;
use crate::screenshots::ScreenshotStore;

/// Minimum elapsed time between two consecutive alerts, in seconds.
pub const ALERT_INTERVAL_SECS: f64 = 2.0;

/// Process-wide alert state. Survives across frames (and, via `Monitor`,
/// across stop/start cycles); resets only on process restart.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AlertState {
    /// Monotonic time of the most recent alert. `None` until the first one,
    /// so the first overlap always fires.
    pub last_alert_secs: Option<f64>,
    /// Next screenshot index. Strictly increasing, never reused.
    pub screenshot_counter: u64,
}

impl AlertState {
    fn cooldown_elapsed(&self, now_secs: f64, interval_secs: f64) -> bool {
        match self.last_alert_secs {
            Some(last) => now_secs - last > interval_secs,
            None => true,
        }
    }
}

/// Side effects executed while processing one frame, for observability.
#[derive(Clone, Debug, PartialEq)]
pub enum SideEffect {
    Beep,
    Screenshot(PathBuf),
}

/// Per-box overlap decision.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Verdict {
    pub bbox: PersonBox,
    pub hand_inside: bool,
}

/// Outcome of one processing cycle: the annotated frame plus what happened.
pub struct FrameReport {
    pub image: RgbImage,
    pub verdicts: Vec<Verdict>,
    pub effects: Vec<SideEffect>,
}

impl FrameReport {
    pub fn alert_fired(&self) -> bool {
        !self.effects.is_empty()
    }
}

/// The per-frame fusion pipeline.
///
/// Both detectors are black boxes behind their traits; swapping model
/// families does not touch this type.
pub struct OverlapEngine {
    hands: Box<dyn HandLocator>,
    persons: Box<dyn PersonDetector>,
    sink: Box<dyn AlertSink>,
    store: ScreenshotStore,
    annotator: Annotator,
    alert_interval_secs: f64,
    state: AlertState,
}

impl OverlapEngine {
    pub fn new(
        hands: Box<dyn HandLocator>,
        persons: Box<dyn PersonDetector>,
        sink: Box<dyn AlertSink>,
        store: ScreenshotStore,
        annotator: Annotator,
    ) -> Self {
        Self {
            hands,
            persons,
            sink,
            store,
            annotator,
            alert_interval_secs: ALERT_INTERVAL_SECS,
            state: AlertState::default(),
        }
    }

    pub fn with_alert_interval(mut self, interval_secs: f64) -> Self {
        self.alert_interval_secs = interval_secs;
        self
    }

    /// Seed the engine with previously accumulated state (session restart).
    pub fn with_state(mut self, state: AlertState) -> Self {
        self.state = state;
        self
    }

    pub fn state(&self) -> AlertState {
        self.state
    }

    /// Run one full cycle on a frame at the given monotonic time.
    ///
    /// Boxes are handled in the detector's emission order. The cooldown is a
    /// single global window: when two boxes overlap in the same frame, only
    /// the first fires, and the second sees the just-updated timestamp.
    pub fn process_frame(&mut self, frame: &Frame, now_secs: f64) -> FrameReport {
        let hands = match self.hands.locate(frame) {
            Ok(hands) => hands,
            Err(err) => {
                log::warn!(
                    "hand locator '{}' failed, treating as no hands: {err:#}",
                    self.hands.name()
                );
                Vec::new()
            }
        };
        let boxes = match self.persons.detect(frame) {
            Ok(boxes) => boxes,
            Err(err) => {
                log::warn!(
                    "person detector '{}' failed, treating as no persons: {err:#}",
                    self.persons.name()
                );
                Vec::new()
            }
        };

        // Hand identity is not distinguished: any hand's point triggers
        // overlap, so all instances flatten into one keypoint set.
        let keypoints: Vec<Keypoint> = hands
            .iter()
            .flat_map(|hand| hand.keypoints.iter().copied())
            .collect();

        let mut image = frame.to_image();
        for hand in &hands {
            self.annotator.draw_hand(&mut image, hand);
        }

        let mut verdicts = Vec::with_capacity(boxes.len());
        let mut effects = Vec::new();

        for bbox in boxes {
            let hand_inside = keypoints.iter().any(|point| bbox.contains(*point));
            self.annotator.draw_person_box(&mut image, &bbox, hand_inside);

            if hand_inside && self.state.cooldown_elapsed(now_secs, self.alert_interval_secs) {
                match self.sink.alert() {
                    Ok(()) => effects.push(SideEffect::Beep),
                    Err(err) => log::warn!("alert sink failed: {err:#}"),
                }
                let index = self.state.screenshot_counter;
                match self.store.save(&image, index) {
                    Ok(path) => {
                        log::info!("saved {}", path.display());
                        effects.push(SideEffect::Screenshot(path));
                    }
                    Err(err) => log::warn!("screenshot {index} failed: {err:#}"),
                }
                // State advances exactly once per triggered alert, even when a
                // sink or the filesystem misbehaves.
                self.state.screenshot_counter += 1;
                self.state.last_alert_secs = Some(now_secs);
            }

            verdicts.push(Verdict { bbox, hand_inside });
        }

        FrameReport {
            image,
            verdicts,
            effects,
        }
    }
}
