//! Detector backend seams.
//!
//! Both detectors are black-box capability providers: swapping the underlying
//! model family must not change the overlap engine. Backends report failures
//! through `Result`; the engine absorbs per-frame failures into empty result
//! sets (graceful degradation), so an `Err` here never aborts the pipeline.

use anyhow::Result;

use crate::detect::result::{HandInstance, PersonBox};
use crate::frame::Frame;

/// Hand landmark detector.
pub trait HandLocator: Send {
    /// Backend identifier.
    fn name(&self) -> &'static str;

    /// Locate hands in a frame.
    ///
    /// Returns zero or more hand instances, each with
    /// [`HAND_LANDMARK_COUNT`](crate::detect::result::HAND_LANDMARK_COUNT)
    /// keypoints in pixel coordinates of the given frame.
    fn locate(&mut self, frame: &Frame) -> Result<Vec<HandInstance>>;
}

/// Person bounding-box detector.
pub trait PersonDetector: Send {
    /// Backend identifier.
    fn name(&self) -> &'static str;

    /// Detect persons in a frame.
    ///
    /// Returned boxes are already filtered to the person class and a strict
    /// confidence threshold, in the backend's emission order, with corners in
    /// absolute pixel coordinates of the given frame.
    fn detect(&mut self, frame: &Frame) -> Result<Vec<PersonBox>>;
}
