#![cfg(feature = "backend-tract")]

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use image::imageops::{self, FilterType};
use tract_onnx::prelude::*;

use crate::detect::backend::PersonDetector;
use crate::detect::decode::{
    decode_ssd_rows, PERSON_CONFIDENCE_THRESHOLD, SSD_INPUT_SIZE, SSD_MEAN, SSD_SCALE,
};
use crate::detect::result::PersonBox;
use crate::frame::Frame;

/// MobileNet-SSD person detector via tract-onnx.
///
/// The model is loaded once at construction; a missing or malformed file is a
/// startup error, never a per-frame one. Frames are resized to the fixed
/// 300x300 input and normalized with the model's calibration constants
/// (`SSD_SCALE`, `SSD_MEAN`). Output boxes are rescaled to absolute pixels of
/// the original frame.
pub struct SsdPersonBackend {
    model: SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>,
    threshold: f32,
}

impl SsdPersonBackend {
    pub fn new<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        let model_path = model_path.as_ref();
        let size = SSD_INPUT_SIZE as usize;
        let model = tract_onnx::onnx()
            .model_for_path(model_path)
            .with_context(|| format!("failed to load ONNX model from {}", model_path.display()))?
            .with_input_fact(
                0,
                InferenceFact::dt_shape(f32::datum_type(), tvec!(1, 3, size, size)),
            )
            .context("failed to set input fact")?
            .into_optimized()
            .context("failed to optimize ONNX model")?
            .into_runnable()
            .context("failed to build runnable ONNX model")?;

        Ok(Self {
            model,
            threshold: PERSON_CONFIDENCE_THRESHOLD,
        })
    }

    /// Override the default confidence threshold.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    fn build_input(&self, frame: &Frame) -> Tensor {
        let size = SSD_INPUT_SIZE;
        let resized = imageops::resize(&frame.to_image(), size, size, FilterType::Triangle);
        let input = tract_ndarray::Array4::from_shape_fn(
            (1, 3, size as usize, size as usize),
            |(_, channel, y, x)| {
                let px = resized.get_pixel(x as u32, y as u32)[channel];
                (px as f32 - SSD_MEAN) * SSD_SCALE
            },
        );
        input.into_tensor()
    }
}

impl PersonDetector for SsdPersonBackend {
    fn name(&self) -> &'static str {
        "ssd"
    }

    fn detect(&mut self, frame: &Frame) -> Result<Vec<PersonBox>> {
        let input = self.build_input(frame);
        let outputs = self
            .model
            .run(tvec!(input.into()))
            .context("SSD inference failed")?;
        let output = outputs
            .first()
            .ok_or_else(|| anyhow!("model produced no outputs"))?;
        let rows = output
            .to_array_view::<f32>()
            .context("model output tensor was not f32")?;
        let rows = rows
            .as_slice()
            .ok_or_else(|| anyhow!("model output tensor was not contiguous"))?;

        Ok(decode_ssd_rows(
            rows,
            frame.width(),
            frame.height(),
            self.threshold,
        ))
    }
}
