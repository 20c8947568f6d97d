//! Frame container for the capture cycle.
//!
//! A `Frame` is one captured RGB image. It is produced by the ingestion layer,
//! consumed by the detectors and the overlap engine within a single processing
//! cycle, and discarded after the annotated copy has been handed off. Nothing
//! detector-side outlives the frame it was computed from.

use anyhow::{anyhow, Result};
use image::RgbImage;

/// One captured RGB frame (width x height x 3 bytes, row-major).
#[derive(Clone, Debug)]
pub struct Frame {
    image: RgbImage,
}

impl Frame {
    /// Build a frame from raw RGB bytes. The byte count must match the
    /// dimensions exactly.
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Result<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(3))
            .ok_or_else(|| anyhow!("frame dimensions overflow"))?;
        if data.len() != expected {
            return Err(anyhow!(
                "expected {} RGB bytes for {}x{}, received {}",
                expected,
                width,
                height,
                data.len()
            ));
        }
        let image = RgbImage::from_raw(width, height, data)
            .ok_or_else(|| anyhow!("frame buffer does not fit {}x{}", width, height))?;
        Ok(Self { image })
    }

    pub fn from_image(image: RgbImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Raw RGB bytes, row-major. Detector backends read these.
    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Mutable copy for annotation. The frame itself stays untouched so
    /// detection data never depends on what was drawn.
    pub fn to_image(&self) -> RgbImage {
        self.image.clone()
    }

    /// Horizontally mirrored copy (selfie view). Applied at capture time when
    /// the camera is configured as mirrored.
    pub fn mirrored(&self) -> Self {
        Self {
            image: image::imageops::flip_horizontal(&self.image),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_validates_buffer_length() {
        assert!(Frame::new(vec![0u8; 4 * 4 * 3], 4, 4).is_ok());
        assert!(Frame::new(vec![0u8; 10], 4, 4).is_err());
    }

    #[test]
    fn mirrored_swaps_columns() {
        let mut data = vec![0u8; 2 * 3];
        data[0] = 255; // left pixel, red channel
        let frame = Frame::new(data, 2, 1).unwrap();
        let flipped = frame.mirrored();
        assert_eq!(flipped.pixels()[3], 255);
        assert_eq!(flipped.pixels()[0], 0);
    }
}
