//! Frame representation for decoded video data
//!
//! A [`VideoFrame`] owns exactly three same-shape color planes (Y, U, V) plus
//! a sample format tag. The engine reads input frames, allocates fresh output
//! frames of the same shape, and never retains a reference past a call.

use crate::error::{Error, Result};
use ndarray::Array2;

/// Sample representation of a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    /// Fixed-point integer samples in `[0, 2^bit_depth)`, stored as `u16`.
    /// Bit depths 1..=16 are supported.
    Int { bit_depth: u8 },
    /// 32-bit floating-point samples: luma in `[0, 1]`, chroma in `[-0.5, 0.5]`
    Float,
}

impl SampleFormat {
    /// Bits per sample (32 for float)
    pub fn bit_depth(&self) -> u8 {
        match self {
            SampleFormat::Int { bit_depth } => *bit_depth,
            SampleFormat::Float => 32,
        }
    }

    /// Whether samples are floating-point
    pub fn is_float(&self) -> bool {
        matches!(self, SampleFormat::Float)
    }

    /// Largest representable integer sample value, if fixed-point
    pub fn max_int_value(&self) -> Option<u16> {
        match self {
            SampleFormat::Int { bit_depth } => Some(((1u32 << bit_depth) - 1) as u16),
            SampleFormat::Float => None,
        }
    }
}

/// Sample storage for a single color plane
#[derive(Debug, Clone, PartialEq)]
pub enum PlaneData {
    Int(Array2<u16>),
    Float(Array2<f32>),
}

impl PlaneData {
    /// Plane dimensions as (height, width)
    pub fn dim(&self) -> (usize, usize) {
        match self {
            PlaneData::Int(data) => data.dim(),
            PlaneData::Float(data) => data.dim(),
        }
    }
}

/// A decoded video frame
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// Color planes in Y, U, V order, all the same shape
    pub planes: Vec<PlaneData>,

    /// Width in pixels
    pub width: usize,

    /// Height in pixels
    pub height: usize,

    /// Sample representation
    pub format: SampleFormat,
}

impl VideoFrame {
    /// Create a zero-filled frame with three planes of the given shape
    pub fn new(width: usize, height: usize, format: SampleFormat) -> Self {
        let plane = match format {
            SampleFormat::Int { .. } => PlaneData::Int(Array2::zeros((height, width))),
            SampleFormat::Float => PlaneData::Float(Array2::zeros((height, width))),
        };
        VideoFrame {
            planes: vec![plane.clone(), plane.clone(), plane],
            width,
            height,
            format,
        }
    }

    /// Check internal consistency: plane count, shapes, and sample storage
    /// matching the declared format
    pub fn validate(&self) -> Result<()> {
        if let SampleFormat::Int { bit_depth } = self.format {
            if bit_depth == 0 || bit_depth > 16 {
                return Err(Error::invalid_input(format!(
                    "unsupported integer bit depth {bit_depth} (expected 1..=16)"
                )));
            }
        }
        if self.planes.len() != 3 {
            return Err(Error::invalid_input(format!(
                "frame must have 3 planes, got {}",
                self.planes.len()
            )));
        }
        for (i, plane) in self.planes.iter().enumerate() {
            let (h, w) = plane.dim();
            if (h, w) != (self.height, self.width) {
                return Err(Error::shape_mismatch((self.width, self.height), (w, h)));
            }
            let matches_format = match (plane, self.format) {
                (PlaneData::Int(_), SampleFormat::Int { .. }) => true,
                (PlaneData::Float(_), SampleFormat::Float) => true,
                _ => false,
            };
            if !matches_format {
                return Err(Error::invalid_input(format!(
                    "plane {i} storage does not match frame format"
                )));
            }
        }
        Ok(())
    }
}
