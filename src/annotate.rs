//! Frame annotation.
//!
//! Drawing is a rendering concern only: annotations go onto a mutable copy of
//! the frame and never feed back into detection. Boxes are drawn in the
//! overlap or clear color with a text label above; hands are drawn as
//! landmark dots joined by the skeleton edges.

use std::fs;
use std::path::Path;

use ab_glyph::{FontArc, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_hollow_rect_mut, draw_line_segment_mut, draw_text_mut,
};
use imageproc::rect::Rect;

use crate::detect::{HandInstance, PersonBox, HAND_CONNECTIONS};

/// Box and label color when a hand overlaps the box.
pub const OVERLAP_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
/// Box and label color when no hand overlaps the box.
pub const CLEAR_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

pub const OVERLAP_LABEL: &str = "Hand Detected";
pub const CLEAR_LABEL: &str = "No Hand";

const LANDMARK_COLOR: Rgb<u8> = Rgb([0, 160, 255]);
const SKELETON_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
const LABEL_HEIGHT: f32 = 22.0;
const BOX_THICKNESS: i32 = 2;

/// Common system font locations tried when no font path is configured.
const DEFAULT_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
];

/// Draws detection results onto frames.
///
/// Text labels need a TrueType font. When none can be loaded the annotator
/// still draws boxes and skeletons and logs a single warning at startup; label
/// rendering is skipped.
pub struct Annotator {
    font: Option<FontArc>,
}

impl Annotator {
    pub fn new(font_path: Option<&Path>) -> Self {
        let font = match font_path {
            Some(path) => load_font(path),
            None => DEFAULT_FONT_PATHS
                .iter()
                .find_map(|path| load_font(Path::new(path))),
        };
        if font.is_none() {
            log::warn!("no label font available; boxes will be drawn without text");
        }
        Self { font }
    }

    /// Draw a person box with its overlap label.
    pub fn draw_person_box(&self, image: &mut RgbImage, bbox: &PersonBox, overlap: bool) {
        let color = if overlap { OVERLAP_COLOR } else { CLEAR_COLOR };
        let label = if overlap { OVERLAP_LABEL } else { CLEAR_LABEL };

        let width = bbox.x2 - bbox.x1;
        let height = bbox.y2 - bbox.y1;
        if width <= 0 || height <= 0 {
            return;
        }
        for inset in 0..BOX_THICKNESS {
            let w = width - 2 * inset;
            let h = height - 2 * inset;
            if w <= 0 || h <= 0 {
                break;
            }
            draw_hollow_rect_mut(
                image,
                Rect::at(bbox.x1 + inset, bbox.y1 + inset).of_size(w as u32, h as u32),
                color,
            );
        }

        if let Some(font) = &self.font {
            let y = (bbox.y1 - LABEL_HEIGHT as i32 - 4).max(0);
            draw_text_mut(
                image,
                color,
                bbox.x1.max(0),
                y,
                PxScale::from(LABEL_HEIGHT),
                font,
                label,
            );
        }
    }

    /// Draw one hand's landmarks and skeleton.
    pub fn draw_hand(&self, image: &mut RgbImage, hand: &HandInstance) {
        for (a, b) in HAND_CONNECTIONS {
            let (Some(p), Some(q)) = (hand.keypoints.get(a), hand.keypoints.get(b)) else {
                continue;
            };
            draw_line_segment_mut(
                image,
                (p.x as f32, p.y as f32),
                (q.x as f32, q.y as f32),
                SKELETON_COLOR,
            );
        }
        for point in &hand.keypoints {
            draw_filled_circle_mut(image, (point.x, point.y), 2, LANDMARK_COLOR);
        }
    }
}

fn load_font(path: &Path) -> Option<FontArc> {
    let bytes = fs::read(path).ok()?;
    match FontArc::try_from_vec(bytes) {
        Ok(font) => Some(font),
        Err(err) => {
            log::warn!("failed to parse font {}: {}", path.display(), err);
            None
        }
    }
}
