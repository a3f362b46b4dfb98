//! jpegsim - synthetic block-transform compression artifacts
//!
//! jpegsim degrades already-decoded video frames with the quantization noise
//! characteristic of JPEG-style block-transform compression, for generating
//! synthetic degraded test material. It is not an encoder: there is no entropy
//! coding and no bitstream, only the forward-transform / quantize / dequantize /
//! inverse-transform round trip that produces blocking and ringing.
//!
//! # Architecture
//!
//! - `frame`: plane and frame representation (integer and float samples)
//! - `engine`: the adaptive artifact engine - DCT bases, quality-scaled
//!   quantization tables, motion-driven block-size selection, per-plane
//!   macroblock processing
//! - `error`: common error types
//!
//! # Usage
//!
//! ```rust,ignore
//! use jpegsim::{ArtifactConfig, ArtifactEngine};
//!
//! let config = ArtifactConfig::builder()
//!     .dimensions(1920, 1080)
//!     .quality(25)
//!     .block_sizes([4, 8, 16])
//!     .build()?;
//!
//! let engine = ArtifactEngine::new(config)?;
//! let degraded = engine.process_frame(&frame, None)?;
//! ```

pub mod engine;
pub mod error;
pub mod frame;

pub use engine::{
    ArtifactConfig, ArtifactEngine, BlockSizePicker, BlockSizes, MotionClassifier, MotionMask,
    MotionSettings, UniformPicker,
};
pub use error::{Error, Result};
pub use frame::{PlaneData, SampleFormat, VideoFrame};

/// jpegsim version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
