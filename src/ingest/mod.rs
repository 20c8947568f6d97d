//! Frame ingestion sources.
//!
//! Frames come from a local capture device or from the synthetic `stub://`
//! source used in tests and the demo. The ingestion layer produces `Frame`
//! values and applies capture-time concerns (mirroring, frame pacing); it has
//! no knowledge of detection or alerting.

pub mod camera;

pub use camera::{CameraConfig, CameraSource, CameraStats};
