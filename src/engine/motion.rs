//! Per-pixel motion scoring from temporal neighbors
//!
//! The classifier is bound once at configuration with the expected mask
//! dimensions and bit depth; every evaluated frame gets a fresh mask computed
//! from its successor and predecessor frames. The mask is a per-call input to
//! the engine and is never retained.

use super::MotionSettings;
use crate::error::{Error, Result};
use crate::frame::{PlaneData, VideoFrame};
use ndarray::{Array2, Zip};

/// Fixed gain spreading temporal differences across the mask's value range
const MOTION_GAIN: f64 = 10.0;

/// Per-pixel motion scores for one frame
#[derive(Debug, Clone)]
pub struct MotionMask {
    /// Non-negative scores, same shape as the source frame's planes
    pub scores: Array2<f64>,
    /// Bit depth the scores are clamped to
    pub bit_depth: u8,
}

/// Computes motion masks from a frame and its temporal neighbors
#[derive(Debug, Clone, Copy)]
pub struct MotionClassifier {
    settings: MotionSettings,
}

impl MotionClassifier {
    pub fn new(settings: MotionSettings) -> Self {
        MotionClassifier { settings }
    }

    /// Score plane 0 of `current` against its forward (successor) and
    /// backward (predecessor) neighbors:
    ///
    /// ```text
    /// score = | |current - forward| * 10 - backward | * 10
    /// ```
    ///
    /// clamped to `[0, 2^bit_depth)`. All three frames must match the bound
    /// dimensions.
    pub fn mask(
        &self,
        current: &VideoFrame,
        forward: &VideoFrame,
        backward: &VideoFrame,
    ) -> Result<MotionMask> {
        for frame in [current, forward, backward] {
            if frame.width != self.settings.width || frame.height != self.settings.height {
                return Err(Error::shape_mismatch(
                    (self.settings.width, self.settings.height),
                    (frame.width, frame.height),
                ));
            }
            frame.validate()?;
        }

        let cur = luma_as_f64(current);
        let fwd = luma_as_f64(forward);
        let bwd = luma_as_f64(backward);

        let peak = ((1u64 << self.settings.bit_depth) - 1) as f64;
        let scores = Zip::from(&cur).and(&fwd).and(&bwd).map_collect(|&x, &y, &z| {
            (((x - y).abs() * MOTION_GAIN - z).abs() * MOTION_GAIN).clamp(0.0, peak)
        });

        Ok(MotionMask {
            scores,
            bit_depth: self.settings.bit_depth,
        })
    }
}

fn luma_as_f64(frame: &VideoFrame) -> Array2<f64> {
    match &frame.planes[0] {
        PlaneData::Int(data) => data.mapv(|v| v as f64),
        PlaneData::Float(data) => data.mapv(|v| v as f64),
    }
}
