//! Macroblock tiling and per-plane processing
//!
//! A plane is padded by edge replication to a multiple of the macroblock size,
//! tiled into macroblocks in row-major order, requantized block by block, and
//! cropped back to its original dimensions. Macroblocks share only the
//! immutable per-size registry, so macroblock rows are processed as a parallel
//! map over horizontal bands.

use super::quant::PlaneClass;
use super::select::{self, BlockSizePicker, BlockSizes};
use super::{block, SizeEntry};
use ndarray::{s, Array2, ArrayView2};
use rayon::prelude::*;

/// Per-plane processing over a configured engine's registry
pub struct PlaneProcessor<'a> {
    entries: &'a [SizeEntry],
    sizes: &'a BlockSizes,
    thresholds: &'a [f64],
    picker: &'a dyn BlockSizePicker,
}

impl<'a> PlaneProcessor<'a> {
    pub fn new(
        entries: &'a [SizeEntry],
        sizes: &'a BlockSizes,
        thresholds: &'a [f64],
        picker: &'a dyn BlockSizePicker,
    ) -> Self {
        PlaneProcessor {
            entries,
            sizes,
            thresholds,
            picker,
        }
    }

    /// Requantize a whole plane in the 0-255 working range.
    ///
    /// `mask`, when present, drives block-size selection per macroblock; it
    /// must have the same shape as `plane`.
    pub fn process(
        &self,
        plane: &ArrayView2<f64>,
        class: PlaneClass,
        mask: Option<&ArrayView2<f64>>,
    ) -> Array2<f64> {
        let (h, w) = plane.dim();
        let mb = self.sizes.macroblock();
        let padded = pad_to_multiple(plane, mb);
        let mask_padded = mask.map(|m| pad_to_multiple(m, mb));
        let (ph, pw) = padded.dim();

        let bands: Vec<Array2<f64>> = (0..ph / mb)
            .into_par_iter()
            .map(|band| {
                let rows = band * mb..(band + 1) * mb;
                let src = padded.slice(s![rows.clone(), ..]);
                let mask_band = mask_padded.as_ref().map(|m| m.slice(s![rows, ..]));
                self.process_band(&src, class, mask_band.as_ref())
            })
            .collect();

        let mut out = Array2::zeros((ph, pw));
        for (band, data) in bands.iter().enumerate() {
            out.slice_mut(s![band * mb..(band + 1) * mb, ..]).assign(data);
        }
        out.slice(s![..h, ..w]).to_owned()
    }

    /// Process one horizontal band of macroblocks
    fn process_band(
        &self,
        band: &ArrayView2<f64>,
        class: PlaneClass,
        mask: Option<&ArrayView2<f64>>,
    ) -> Array2<f64> {
        let (mb, pw) = band.dim();
        let mut out = Array2::zeros((mb, pw));

        for c in (0..pw).step_by(mb) {
            let chosen = match mask {
                Some(m) => {
                    let region = m.slice(s![.., c..c + mb]);
                    let mean = region.mean().unwrap_or(0.0);
                    select::select_size_index(mean, self.thresholds, self.sizes)
                }
                None => self.picker.pick(self.sizes),
            };
            let entry = &self.entries[chosen];
            let table = entry.table(class);
            let n = entry.size;

            // A chosen size equal to the macroblock runs this once; smaller
            // sizes subdivide into equal sub-blocks.
            for sr in (0..mb).step_by(n) {
                for sc in (c..c + mb).step_by(n) {
                    let sub = band.slice(s![sr..sr + n, sc..sc + n]);
                    let restored = block::requantize(&sub, &entry.basis, table);
                    out.slice_mut(s![sr..sr + n, sc..sc + n]).assign(&restored);
                }
            }
        }
        out
    }
}

/// Pad bottom/right edges by replication up to a multiple of `mb`.
///
/// Replication keeps block boundaries free of artificial high-frequency
/// content that zero-fill would introduce.
fn pad_to_multiple(plane: &ArrayView2<f64>, mb: usize) -> Array2<f64> {
    let (h, w) = plane.dim();
    let ph = (h + mb - 1) / mb * mb;
    let pw = (w + mb - 1) / mb * mb;
    if (ph, pw) == (h, w) {
        return plane.to_owned();
    }
    Array2::from_shape_fn((ph, pw), |(r, c)| plane[[r.min(h - 1), c.min(w - 1)]])
}
