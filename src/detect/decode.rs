//! Pure decoding of raw backend output into result types.
//!
//! Kept separate from the tract backends so the filtering and rescale rules
//! compile and test without a model file or the `backend-tract` feature.

use anyhow::{anyhow, Result};

use crate::detect::result::{HandInstance, Keypoint, PersonBox, HAND_LANDMARK_COUNT};

/// MobileNet-SSD calibration contract. These match the trained model exactly
/// and must not drift.
pub const SSD_INPUT_SIZE: u32 = 300;
pub const SSD_SCALE: f32 = 0.007843;
pub const SSD_MEAN: f32 = 127.5;

/// Class id of "person" in the MobileNet-SSD (VOC) label map.
pub const PERSON_CLASS_ID: u32 = 15;

/// Boxes at or below this confidence are dropped (strict threshold).
pub const PERSON_CONFIDENCE_THRESHOLD: f32 = 0.5;

/// Floats per SSD detection row: [image_id, class_id, confidence, x1, y1, x2, y2].
const SSD_ROW_LEN: usize = 7;

/// Decode SSD detection rows into person boxes in pixel space.
///
/// Rows are normalized [0,1] coordinates; output corners are rescaled by the
/// original frame dimensions. Non-person classes and confidences `<= threshold`
/// are dropped, not returned. Emission order is preserved.
pub fn decode_ssd_rows(
    rows: &[f32],
    frame_width: u32,
    frame_height: u32,
    threshold: f32,
) -> Vec<PersonBox> {
    let w = frame_width as f32;
    let h = frame_height as f32;
    rows.chunks_exact(SSD_ROW_LEN)
        .filter_map(|row| {
            let class_id = row[1] as u32;
            let confidence = row[2];
            if confidence <= threshold || class_id != PERSON_CLASS_ID {
                return None;
            }
            Some(PersonBox {
                x1: (row[3] * w) as i32,
                y1: (row[4] * h) as i32,
                x2: (row[5] * w) as i32,
                y2: (row[6] * h) as i32,
                confidence,
                class_id,
            })
        })
        .collect()
}

/// Decode one hand's landmark vector into pixel-space keypoints.
///
/// `values` holds `HAND_LANDMARK_COUNT` landmarks of `stride` floats each
/// (x, y and optionally depth), with x/y normalized to [0,1] of the frame.
pub fn decode_landmarks(
    values: &[f32],
    stride: usize,
    frame_width: u32,
    frame_height: u32,
) -> Result<HandInstance> {
    if stride < 2 {
        return Err(anyhow!("landmark stride must be at least 2, got {stride}"));
    }
    let expected = HAND_LANDMARK_COUNT * stride;
    if values.len() < expected {
        return Err(anyhow!(
            "expected {} landmark values, received {}",
            expected,
            values.len()
        ));
    }
    let keypoints = values[..expected]
        .chunks_exact(stride)
        .map(|lm| {
            Keypoint::new(
                (lm[0] * frame_width as f32) as i32,
                (lm[1] * frame_height as f32) as i32,
            )
        })
        .collect();
    Ok(HandInstance::new(keypoints))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(class_id: f32, confidence: f32) -> [f32; 7] {
        [0.0, class_id, confidence, 0.1, 0.2, 0.5, 0.8]
    }

    #[test]
    fn confidence_exactly_at_threshold_is_dropped() {
        let rows = row(15.0, 0.5);
        assert!(decode_ssd_rows(&rows, 640, 480, PERSON_CONFIDENCE_THRESHOLD).is_empty());
    }

    #[test]
    fn non_person_class_is_dropped_even_above_threshold() {
        let rows = row(7.0, 0.51);
        assert!(decode_ssd_rows(&rows, 640, 480, PERSON_CONFIDENCE_THRESHOLD).is_empty());
    }

    #[test]
    fn person_above_threshold_is_kept_and_rescaled() {
        let rows = row(15.0, 0.51);
        let boxes = decode_ssd_rows(&rows, 640, 480, PERSON_CONFIDENCE_THRESHOLD);
        assert_eq!(boxes.len(), 1);
        let b = boxes[0];
        assert_eq!((b.x1, b.y1, b.x2, b.y2), (64, 96, 320, 384));
        assert_eq!(b.class_id, PERSON_CLASS_ID);
        assert!((b.confidence - 0.51).abs() < f32::EPSILON);
    }

    #[test]
    fn emission_order_is_preserved() {
        let mut rows = Vec::new();
        rows.extend_from_slice(&[0.0, 15.0, 0.9, 0.0, 0.0, 0.1, 0.1]);
        rows.extend_from_slice(&[0.0, 15.0, 0.6, 0.5, 0.5, 0.9, 0.9]);
        let boxes = decode_ssd_rows(&rows, 100, 100, PERSON_CONFIDENCE_THRESHOLD);
        assert_eq!(boxes.len(), 2);
        assert!(boxes[0].confidence > boxes[1].confidence);
        assert_eq!(boxes[1].x1, 50);
    }

    #[test]
    fn landmarks_rescale_to_pixel_space() {
        let mut values = vec![0.0f32; HAND_LANDMARK_COUNT * 3];
        values[0] = 0.5; // wrist x
        values[1] = 0.25; // wrist y
        let hand = decode_landmarks(&values, 3, 640, 480).unwrap();
        assert_eq!(hand.keypoints.len(), HAND_LANDMARK_COUNT);
        assert_eq!(hand.keypoints[0], Keypoint::new(320, 120));
    }

    #[test]
    fn short_landmark_vector_is_rejected() {
        let values = vec![0.0f32; 10];
        assert!(decode_landmarks(&values, 3, 640, 480).is_err());
    }
}
