//! Adaptive block-transform artifact engine
//!
//! The engine reproduces the quantization-noise characteristic of JPEG-style
//! block-transform compression on decoded frames. Per configured block size it
//! holds one orthogonal DCT basis and one quality-scaled quantization table
//! per plane class, all built once at construction and shared read-only across
//! any number of worker threads. Per frame, each plane is rescaled into the
//! 0-255 working range, tiled into macroblocks whose block size is chosen from
//! the motion mask (luma only) or a fallback strategy, requantized, and
//! rescaled back to the native range.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use jpegsim::{ArtifactConfig, ArtifactEngine, MotionSettings};
//!
//! let config = ArtifactConfig::builder()
//!     .dimensions(1280, 720)
//!     .quality(20)
//!     .block_sizes([4, 8, 16])
//!     .motion(MotionSettings { width: 1280, height: 720, bit_depth: 8 })
//!     .build()?;
//!
//! let engine = ArtifactEngine::new(config)?;
//! let degraded = engine.process_clip(&frames)?;
//! ```

pub mod basis;
pub mod block;
pub mod motion;
pub mod plane;
pub mod quant;
pub mod select;

pub use basis::DctBasis;
pub use motion::{MotionClassifier, MotionMask};
pub use quant::PlaneClass;
pub use select::{BlockSizePicker, BlockSizes, UniformPicker};

use crate::error::{Error, Result};
use crate::frame::{PlaneData, SampleFormat, VideoFrame};
use ndarray::Array2;
use plane::PlaneProcessor;
use tracing::{debug, trace};

/// Dimensions and bit depth of the bound motion mask source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionSettings {
    pub width: usize,
    pub height: usize,
    /// Bit depth of the mask values; default thresholds partition
    /// `[0, 2^bit_depth)`
    pub bit_depth: u8,
}

/// Engine configuration, validated once at construction
#[derive(Debug, Clone)]
pub struct ArtifactConfig {
    /// Clip width in pixels
    pub width: usize,
    /// Clip height in pixels
    pub height: usize,
    /// JPEG-style quality, 1..=100; lower means coarser quantization
    pub quality: u8,
    /// Block edge lengths to choose from; sorted and deduplicated internally
    pub block_sizes: Vec<usize>,
    /// Explicit motion thresholds; must have `block_sizes.len() - 1` entries
    pub motion_thresholds: Option<Vec<f64>>,
    /// Motion mask source; absent means the random fallback selection
    pub motion: Option<MotionSettings>,
}

impl ArtifactConfig {
    pub fn builder() -> ArtifactConfigBuilder {
        ArtifactConfigBuilder::default()
    }

    /// Validate every configuration invariant; called by [`ArtifactEngine::new`]
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::config("clip dimensions must be positive"));
        }
        if self.quality == 0 || self.quality > 100 {
            return Err(Error::config(format!(
                "quality must be between 1 and 100, got {}",
                self.quality
            )));
        }
        let sizes = BlockSizes::new(self.block_sizes.clone())?;
        if let Some(thresholds) = &self.motion_thresholds {
            if thresholds.len() != sizes.len() - 1 {
                return Err(Error::config(format!(
                    "expected {} motion thresholds for {} block sizes, got {}",
                    sizes.len() - 1,
                    sizes.len(),
                    thresholds.len()
                )));
            }
            if thresholds.windows(2).any(|w| w[0] > w[1]) {
                return Err(Error::config("motion thresholds must be non-decreasing"));
            }
        }
        if let Some(motion) = &self.motion {
            if motion.width != self.width || motion.height != self.height {
                return Err(Error::shape_mismatch(
                    (self.width, self.height),
                    (motion.width, motion.height),
                ));
            }
            if motion.bit_depth == 0 || motion.bit_depth > 32 {
                return Err(Error::config(format!(
                    "mask bit depth must be between 1 and 32, got {}",
                    motion.bit_depth
                )));
            }
        }
        Ok(())
    }
}

/// Builder for [`ArtifactConfig`]
///
/// Defaults match the classic fixed-grid simulation: quality 50, a single
/// 8x8 block size, and no motion source.
#[derive(Debug, Clone)]
pub struct ArtifactConfigBuilder {
    width: usize,
    height: usize,
    quality: u8,
    block_sizes: Vec<usize>,
    motion_thresholds: Option<Vec<f64>>,
    motion: Option<MotionSettings>,
}

impl Default for ArtifactConfigBuilder {
    fn default() -> Self {
        ArtifactConfigBuilder {
            width: 0,
            height: 0,
            quality: 50,
            block_sizes: vec![8],
            motion_thresholds: None,
            motion: None,
        }
    }
}

impl ArtifactConfigBuilder {
    /// Set the clip dimensions (required)
    pub fn dimensions(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the quality level (1-100)
    pub fn quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    /// Set the block sizes to choose from
    pub fn block_sizes<I: IntoIterator<Item = usize>>(mut self, sizes: I) -> Self {
        self.block_sizes = sizes.into_iter().collect();
        self
    }

    /// Supply explicit motion thresholds
    pub fn motion_thresholds<I: IntoIterator<Item = f64>>(mut self, thresholds: I) -> Self {
        self.motion_thresholds = Some(thresholds.into_iter().collect());
        self
    }

    /// Bind a motion mask source
    pub fn motion(mut self, settings: MotionSettings) -> Self {
        self.motion = Some(settings);
        self
    }

    /// Validate and build the configuration
    pub fn build(self) -> Result<ArtifactConfig> {
        let config = ArtifactConfig {
            width: self.width,
            height: self.height,
            quality: self.quality,
            block_sizes: self.block_sizes,
            motion_thresholds: self.motion_thresholds,
            motion: self.motion,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Immutable per-size transform state: one basis plus one quantization table
/// per plane class, built once at configuration
#[derive(Debug, Clone)]
pub struct SizeEntry {
    pub size: usize,
    pub basis: DctBasis,
    pub luma: Array2<f64>,
    pub chroma: Array2<f64>,
}

impl SizeEntry {
    /// Quantization table for the given plane class
    pub fn table(&self, class: PlaneClass) -> &Array2<f64> {
        match class {
            PlaneClass::Luma => &self.luma,
            PlaneClass::Chroma => &self.chroma,
        }
    }
}

/// The configured artifact engine
///
/// Holds no mutable cross-frame state: frames may be processed concurrently
/// from any number of threads.
pub struct ArtifactEngine {
    width: usize,
    height: usize,
    sizes: BlockSizes,
    thresholds: Vec<f64>,
    entries: Vec<SizeEntry>,
    motion: Option<MotionSettings>,
    classifier: Option<MotionClassifier>,
    picker: Box<dyn BlockSizePicker>,
}

impl ArtifactEngine {
    /// Create an engine with the default uniformly random fallback picker
    pub fn new(config: ArtifactConfig) -> Result<Self> {
        Self::with_picker(config, Box::new(UniformPicker))
    }

    /// Create an engine with a custom no-mask block-size strategy
    pub fn with_picker(config: ArtifactConfig, picker: Box<dyn BlockSizePicker>) -> Result<Self> {
        config.validate()?;
        let sizes = BlockSizes::new(config.block_sizes.clone())?;

        let thresholds = match (&config.motion_thresholds, &config.motion) {
            (Some(explicit), _) => explicit.clone(),
            (None, Some(motion)) => select::default_thresholds(motion.bit_depth, sizes.len()),
            (None, None) => Vec::new(),
        };

        let entries: Vec<SizeEntry> = sizes
            .as_slice()
            .iter()
            .map(|&n| SizeEntry {
                size: n,
                basis: DctBasis::new(n),
                luma: quant::quant_table(PlaneClass::Luma, n, config.quality),
                chroma: quant::quant_table(PlaneClass::Chroma, n, config.quality),
            })
            .collect();

        let classifier = config.motion.map(MotionClassifier::new);

        debug!(
            quality = config.quality,
            sizes = ?sizes.as_slice(),
            motion = config.motion.is_some(),
            "configured artifact engine"
        );

        Ok(ArtifactEngine {
            width: config.width,
            height: config.height,
            sizes,
            thresholds,
            entries,
            motion: config.motion,
            classifier,
            picker,
        })
    }

    /// Configured block sizes, ascending
    pub fn block_sizes(&self) -> &BlockSizes {
        &self.sizes
    }

    /// Effective motion thresholds (empty when selection is never motion-driven)
    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    /// Degrade one frame, returning a new frame of identical shape and format.
    ///
    /// A mask is required when a motion source is configured and must be
    /// absent otherwise. Motion-adaptive sizing applies to plane 0 only;
    /// chroma planes always take the fallback path.
    pub fn process_frame(
        &self,
        frame: &VideoFrame,
        mask: Option<&MotionMask>,
    ) -> Result<VideoFrame> {
        frame.validate()?;
        if frame.width != self.width || frame.height != self.height {
            return Err(Error::shape_mismatch(
                (self.width, self.height),
                (frame.width, frame.height),
            ));
        }
        match (&self.motion, mask) {
            (Some(_), None) => {
                return Err(Error::invalid_input(
                    "engine is configured with a motion source but no mask was supplied",
                ))
            }
            (None, Some(_)) => {
                return Err(Error::invalid_input(
                    "engine has no motion source but a mask was supplied",
                ))
            }
            _ => {}
        }
        if let (Some(motion), Some(mask)) = (&self.motion, mask) {
            let (mh, mw) = mask.scores.dim();
            if (mh, mw) != (self.height, self.width) {
                return Err(Error::shape_mismatch((self.width, self.height), (mw, mh)));
            }
            if mask.bit_depth != motion.bit_depth {
                return Err(Error::invalid_input(format!(
                    "mask bit depth {} does not match the configured {}",
                    mask.bit_depth, motion.bit_depth
                )));
            }
        }

        trace!(width = frame.width, height = frame.height, "processing frame");

        let processor =
            PlaneProcessor::new(&self.entries, &self.sizes, &self.thresholds, &*self.picker);

        let mut out = VideoFrame::new(frame.width, frame.height, frame.format);
        for (i, plane) in frame.planes.iter().enumerate() {
            let class = if i == 0 {
                PlaneClass::Luma
            } else {
                PlaneClass::Chroma
            };
            let mask_view = if i == 0 {
                mask.map(|m| m.scores.view())
            } else {
                None
            };
            let working = to_working(plane, i, frame.format);
            let processed = processor.process(&working.view(), class, mask_view.as_ref());
            out.planes[i] = from_working(&processed, i, frame.format);
        }
        Ok(out)
    }

    /// Degrade a whole clip, computing motion masks from clamped temporal
    /// neighbors when a motion source is configured
    pub fn process_clip(&self, frames: &[VideoFrame]) -> Result<Vec<VideoFrame>> {
        match &self.classifier {
            None => frames.iter().map(|f| self.process_frame(f, None)).collect(),
            Some(classifier) => frames
                .iter()
                .enumerate()
                .map(|(n, frame)| {
                    let forward = &frames[(n + 1).min(frames.len() - 1)];
                    let backward = &frames[n.saturating_sub(1)];
                    let mask = classifier.mask(frame, forward, backward)?;
                    self.process_frame(frame, Some(&mask))
                })
                .collect(),
        }
    }
}

/// Rescale a native plane into the 0-255 working range
fn to_working(plane: &PlaneData, index: usize, format: SampleFormat) -> Array2<f64> {
    match plane {
        PlaneData::Int(data) => {
            let max = ((1u32 << format.bit_depth()) - 1) as f64;
            let scale = 255.0 / max;
            data.mapv(|v| v as f64 * scale)
        }
        PlaneData::Float(data) => {
            if index == 0 {
                data.mapv(|v| v as f64 * 255.0)
            } else {
                data.mapv(|v| (v as f64 + 0.5) * 255.0)
            }
        }
    }
}

/// Rescale a processed working-range plane back to the native range,
/// rounding and saturating for integer formats
fn from_working(plane: &Array2<f64>, index: usize, format: SampleFormat) -> PlaneData {
    match format {
        SampleFormat::Int { bit_depth } => {
            let max = ((1u32 << bit_depth) - 1) as f64;
            let scale = 255.0 / max;
            PlaneData::Int(plane.mapv(|v| (v / scale).clamp(0.0, max).round() as u16))
        }
        SampleFormat::Float => {
            if index == 0 {
                PlaneData::Float(plane.mapv(|v| (v / 255.0).clamp(0.0, 1.0) as f32))
            } else {
                PlaneData::Float(plane.mapv(|v| (v / 255.0 - 0.5).clamp(-0.5, 0.5) as f32))
            }
        }
    }
}
