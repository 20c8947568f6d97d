//! handwatch — realtime hand/person overlap monitor.
//!
//! Flags when a detected hand overlaps a detected person's bounding region in
//! a live camera feed, beeps, and persists the annotated frame as evidence,
//! rate-limited by a global cooldown.
//!
//! # Architecture
//!
//! Three logical components, consumed leaf-first:
//!
//! 1. **Hand locator** (`detect::HandLocator`): per frame, a set of 2D
//!    landmark keypoints, one set per detected hand.
//! 2. **Person detector** (`detect::PersonDetector`): per frame, person boxes
//!    with confidence, pre-filtered to the person class.
//! 3. **Overlap & alert engine** (`engine::OverlapEngine`): fuses both into a
//!    point-in-box overlap decision per box, annotates the frame, and fires
//!    cooldown-gated side effects (beep + screenshot).
//!
//! A single worker (`monitor::Monitor`) drives the cycle synchronously:
//! capture, detect, fuse, annotate, deliver. Frame N+1 never starts until
//! frame N's cycle completes. Annotated frames flow to the consumer over a
//! bounded channel; rendering is fully decoupled from the core.
//!
//! # Module structure
//!
//! - `frame`: the captured RGB frame
//! - `ingest`: camera sources (V4L2 device or synthetic stub)
//! - `detect`: detector seams, result types, model backends
//! - `engine`: overlap fusion, cooldown, side effects
//! - `annotate` / `notify` / `screenshots`: rendering, beeps, evidence files
//! - `monitor`: start/stop session control
//! - `config`: file + environment configuration

pub mod annotate;
pub mod config;
pub mod detect;
pub mod engine;
pub mod frame;
pub mod ingest;
pub mod monitor;
pub mod notify;
pub mod screenshots;

pub use annotate::{Annotator, CLEAR_COLOR, CLEAR_LABEL, OVERLAP_COLOR, OVERLAP_LABEL};
pub use config::MonitorConfig;
#[cfg(feature = "backend-tract")]
pub use detect::{LandmarkHandBackend, SsdPersonBackend};
pub use detect::{
    HandInstance, HandLocator, Keypoint, PersonBox, PersonDetector, ScriptedHands,
    ScriptedPersons, HAND_LANDMARK_COUNT,
};
pub use engine::{
    AlertState, FrameReport, OverlapEngine, SideEffect, Verdict, ALERT_INTERVAL_SECS,
};
pub use frame::Frame;
pub use ingest::{CameraConfig, CameraSource};
pub use monitor::{monotonic_secs, Monitor};
#[cfg(feature = "alert-audio")]
pub use notify::TonePlayer;
pub use notify::{AlertSink, TerminalBell, ALERT_DURATION_MS, ALERT_FREQUENCY_HZ};
pub use screenshots::ScreenshotStore;
