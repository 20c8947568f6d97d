//! Detection result types shared by both detector seams.
//!
//! All coordinates are absolute pixels of the originating frame. Backends that
//! emit normalized output rescale before returning (see `detect::decode`).
//! None of these values carry identity across frames.

/// Number of landmarks per detected hand (MediaPipe hand convention).
pub const HAND_LANDMARK_COUNT: usize = 21;

/// Landmark indices, MediaPipe hand landmark convention.
pub mod landmarks {
    pub const WRIST: usize = 0;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_FINGER_TIP: usize = 8;
    pub const MIDDLE_FINGER_TIP: usize = 12;
    pub const RING_FINGER_TIP: usize = 16;
    pub const PINKY_TIP: usize = 20;
}

/// Skeleton edges between landmark indices, used for annotation only.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 4),
    (0, 5),
    (5, 6),
    (6, 7),
    (7, 8),
    (5, 9),
    (9, 10),
    (10, 11),
    (11, 12),
    (9, 13),
    (13, 14),
    (14, 15),
    (15, 16),
    (13, 17),
    (0, 17),
    (17, 18),
    (18, 19),
    (19, 20),
];

/// One 2D pixel coordinate of a detected hand landmark.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Keypoint {
    pub x: i32,
    pub y: i32,
}

impl Keypoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// One detected hand: a fixed-order sequence of landmarks in pixel space.
#[derive(Clone, Debug)]
pub struct HandInstance {
    pub keypoints: Vec<Keypoint>,
}

impl HandInstance {
    pub fn new(keypoints: Vec<Keypoint>) -> Self {
        Self { keypoints }
    }
}

/// Axis-aligned box around a detected person, with detector confidence.
///
/// Valid only for the frame it was computed from; there is no cross-frame
/// identity (no tracking).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PersonBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
    pub confidence: f32,
    pub class_id: u32,
}

impl PersonBox {
    /// Inclusive containment: boundary points count as inside.
    pub fn contains(&self, point: Keypoint) -> bool {
        self.x1 <= point.x && point.x <= self.x2 && self.y1 <= point.y && point.y <= self.y2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox() -> PersonBox {
        PersonBox {
            x1: 10,
            y1: 20,
            x2: 110,
            y2: 220,
            confidence: 0.9,
            class_id: 15,
        }
    }

    #[test]
    fn containment_includes_all_corners() {
        let b = bbox();
        for (x, y) in [(10, 20), (110, 20), (10, 220), (110, 220)] {
            assert!(b.contains(Keypoint::new(x, y)), "corner ({x},{y})");
        }
    }

    #[test]
    fn containment_includes_all_edges() {
        let b = bbox();
        for (x, y) in [(60, 20), (60, 220), (10, 120), (110, 120)] {
            assert!(b.contains(Keypoint::new(x, y)), "edge ({x},{y})");
        }
    }

    #[test]
    fn containment_excludes_one_pixel_outside_each_edge() {
        let b = bbox();
        for (x, y) in [(60, 19), (60, 221), (9, 120), (111, 120)] {
            assert!(!b.contains(Keypoint::new(x, y)), "outside ({x},{y})");
        }
    }

    #[test]
    fn hand_connections_stay_within_landmark_range() {
        for (a, b) in HAND_CONNECTIONS {
            assert!(a < HAND_LANDMARK_COUNT);
            assert!(b < HAND_LANDMARK_COUNT);
        }
    }
}
