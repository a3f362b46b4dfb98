//! Block-size configuration and motion-driven selection
//!
//! [`BlockSizes`] is the validated set of configured block edge lengths; its
//! maximum defines the macroblock size used for tiling and padding. Selection
//! maps a macroblock's mean motion score onto the ordered sizes through
//! ordered thresholds, with a pluggable fallback strategy for the no-mask
//! path.

use crate::error::{Error, Result};
use rand::Rng;

/// Validated, ascending-sorted set of distinct block edge lengths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockSizes {
    sizes: Vec<usize>,
}

impl BlockSizes {
    /// Normalize and validate a block-size set: must be non-empty, every
    /// entry positive, and every entry a divisor of the largest so a
    /// macroblock subdivides into whole sub-blocks. Input order is
    /// irrelevant; duplicates collapse.
    pub fn new(mut sizes: Vec<usize>) -> Result<Self> {
        if sizes.is_empty() {
            return Err(Error::config("block size set must not be empty"));
        }
        if sizes.iter().any(|&s| s == 0) {
            return Err(Error::config("block sizes must be positive"));
        }
        sizes.sort_unstable();
        sizes.dedup();
        let macroblock = sizes[sizes.len() - 1];
        if let Some(&size) = sizes.iter().find(|&&s| macroblock % s != 0) {
            return Err(Error::config(format!(
                "block size {size} does not divide the macroblock size {macroblock}"
            )));
        }
        Ok(BlockSizes { sizes })
    }

    /// Number of distinct sizes
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Sizes in ascending order
    pub fn as_slice(&self) -> &[usize] {
        &self.sizes
    }

    /// Size at the given index
    pub fn get(&self, index: usize) -> usize {
        self.sizes[index]
    }

    /// The macroblock size: the largest configured block size
    pub fn macroblock(&self) -> usize {
        self.sizes[self.sizes.len() - 1]
    }
}

/// Default thresholds partitioning the motion value range `[0, 2^bit_depth)`
/// into `count` equal-width bands (one band per configured size)
pub fn default_thresholds(bit_depth: u8, count: usize) -> Vec<f64> {
    let levels = (1u64 << bit_depth) as f64;
    let step = levels / count as f64;
    (1..count).map(|i| (step * i as f64).floor()).collect()
}

/// Map a macroblock's mean motion score to an index into `sizes`.
///
/// Walks thresholds in ascending order and picks the first size whose
/// threshold the mean does not exceed (the boundary is inclusive); a mean
/// above every threshold selects the largest size.
pub fn select_size_index(mean_motion: f64, thresholds: &[f64], sizes: &BlockSizes) -> usize {
    for (i, &threshold) in thresholds.iter().enumerate() {
        if mean_motion <= threshold {
            return i;
        }
    }
    sizes.len() - 1
}

/// Strategy for choosing a block size when no motion mask is available.
///
/// This path exists only to exercise size diversity without a real motion
/// signal; implementations are free to be non-deterministic.
pub trait BlockSizePicker: Send + Sync {
    /// Choose an index into `sizes` for one macroblock
    fn pick(&self, sizes: &BlockSizes) -> usize;
}

/// Uniformly random choice per macroblock (the default fallback)
#[derive(Debug, Default, Clone, Copy)]
pub struct UniformPicker;

impl BlockSizePicker for UniformPicker {
    fn pick(&self, sizes: &BlockSizes) -> usize {
        rand::thread_rng().gen_range(0..sizes.len())
    }
}
