#![cfg(feature = "backend-tract")]

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use image::imageops::{self, FilterType};
use tract_onnx::prelude::*;

use crate::detect::backend::HandLocator;
use crate::detect::decode::decode_landmarks;
use crate::detect::result::HandInstance;
use crate::frame::Frame;

/// Default minimum presence score for a landmark set to count as a hand.
pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.7;

/// Hand-landmark model input edge length.
const INPUT_SIZE: u32 = 224;

/// Hand landmark detector via tract-onnx.
///
/// Expects a single-hand landmark model (MediaPipe hand landmark export):
/// output 0 is a flat vector of 21 landmarks x 3 floats in input-pixel space,
/// output 1 is a presence score in [0,1]. A score below `min_confidence` is
/// reported as no hands, matching how the engine treats backend failures.
pub struct LandmarkHandBackend {
    model: SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>,
    min_confidence: f32,
}

impl LandmarkHandBackend {
    pub fn new<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        let model_path = model_path.as_ref();
        let size = INPUT_SIZE as usize;
        let model = tract_onnx::onnx()
            .model_for_path(model_path)
            .with_context(|| {
                format!(
                    "failed to load hand landmark model from {}",
                    model_path.display()
                )
            })?
            .with_input_fact(
                0,
                InferenceFact::dt_shape(f32::datum_type(), tvec!(1, 3, size, size)),
            )
            .context("failed to set input fact")?
            .into_optimized()
            .context("failed to optimize hand landmark model")?
            .into_runnable()
            .context("failed to build runnable hand landmark model")?;

        Ok(Self {
            model,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
        })
    }

    pub fn with_min_confidence(mut self, min_confidence: f32) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    fn build_input(&self, frame: &Frame) -> Tensor {
        let resized = imageops::resize(
            &frame.to_image(),
            INPUT_SIZE,
            INPUT_SIZE,
            FilterType::Triangle,
        );
        let size = INPUT_SIZE as usize;
        let input =
            tract_ndarray::Array4::from_shape_fn((1, 3, size, size), |(_, channel, y, x)| {
                resized.get_pixel(x as u32, y as u32)[channel] as f32 / 255.0
            });
        input.into_tensor()
    }
}

impl HandLocator for LandmarkHandBackend {
    fn name(&self) -> &'static str {
        "landmark"
    }

    fn locate(&mut self, frame: &Frame) -> Result<Vec<HandInstance>> {
        let input = self.build_input(frame);
        let outputs = self
            .model
            .run(tvec!(input.into()))
            .context("hand landmark inference failed")?;

        let score = match outputs.get(1) {
            Some(tensor) => *tensor
                .to_array_view::<f32>()
                .context("presence score tensor was not f32")?
                .iter()
                .next()
                .ok_or_else(|| anyhow!("presence score tensor was empty"))?,
            // Models without a score head are treated as always-present.
            None => 1.0,
        };
        if score < self.min_confidence {
            return Ok(Vec::new());
        }

        let raw = outputs
            .first()
            .ok_or_else(|| anyhow!("model produced no outputs"))?
            .to_array_view::<f32>()
            .context("landmark tensor was not f32")?;
        let raw = raw
            .as_slice()
            .ok_or_else(|| anyhow!("landmark tensor was not contiguous"))?;

        // Landmarks come out in input-pixel space; normalize to [0,1] before
        // rescaling to the original frame.
        let normalized: Vec<f32> = raw.iter().map(|v| v / INPUT_SIZE as f32).collect();
        let hand = decode_landmarks(&normalized, 3, frame.width(), frame.height())?;
        Ok(vec![hand])
    }
}
