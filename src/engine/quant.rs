//! Quality-scaled quantization tables
//!
//! Tables derive from the canonical 8x8 JPEG reference tables in two stages:
//! a resize to the configured block size (cubic resampling over the original
//! row/column grid) followed by the standard quality scaling. There is no
//! canonical quantization table for non-8x8 blocks, so the resize models how
//! the *relative* perceptual weighting would scale: a deliberate extrapolation
//! choice, not a standard.

use ndarray::Array2;

/// Canonical 8x8 luma quantization reference table
pub const LUMA_REFERENCE: [[f64; 8]; 8] = [
    [16.0, 11.0, 10.0, 16.0, 24.0, 40.0, 51.0, 61.0],
    [12.0, 12.0, 14.0, 19.0, 26.0, 58.0, 60.0, 55.0],
    [14.0, 13.0, 16.0, 24.0, 40.0, 57.0, 69.0, 56.0],
    [14.0, 17.0, 22.0, 29.0, 51.0, 87.0, 80.0, 62.0],
    [18.0, 22.0, 37.0, 56.0, 68.0, 109.0, 103.0, 77.0],
    [24.0, 35.0, 55.0, 64.0, 81.0, 104.0, 113.0, 92.0],
    [49.0, 64.0, 78.0, 87.0, 103.0, 121.0, 120.0, 101.0],
    [72.0, 92.0, 95.0, 98.0, 112.0, 100.0, 103.0, 99.0],
];

/// Canonical 8x8 chroma quantization reference table
pub const CHROMA_REFERENCE: [[f64; 8]; 8] = [
    [17.0, 18.0, 24.0, 47.0, 99.0, 99.0, 99.0, 99.0],
    [18.0, 21.0, 26.0, 66.0, 99.0, 99.0, 99.0, 99.0],
    [24.0, 26.0, 56.0, 99.0, 99.0, 99.0, 99.0, 99.0],
    [47.0, 66.0, 99.0, 99.0, 99.0, 99.0, 99.0, 99.0],
    [99.0, 99.0, 99.0, 99.0, 99.0, 99.0, 99.0, 99.0],
    [99.0, 99.0, 99.0, 99.0, 99.0, 99.0, 99.0, 99.0],
    [99.0, 99.0, 99.0, 99.0, 99.0, 99.0, 99.0, 99.0],
    [99.0, 99.0, 99.0, 99.0, 99.0, 99.0, 99.0, 99.0],
];

/// Which reference table a plane quantizes against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneClass {
    Luma,
    Chroma,
}

/// Build the quantization table for one plane class, block size, and quality.
///
/// `quality` must already be validated to 1..=100.
pub fn quant_table(class: PlaneClass, size: usize, quality: u8) -> Array2<f64> {
    let reference = match class {
        PlaneClass::Luma => &LUMA_REFERENCE,
        PlaneClass::Chroma => &CHROMA_REFERENCE,
    };
    let reference = Array2::from_shape_fn((8, 8), |(r, c)| reference[r][c]);
    scale_for_quality(&resize_reference(&reference, size), quality)
}

/// Resample a reference table to `size` x `size`.
///
/// The output grid maps endpoint-to-endpoint onto the source grid, so an 8x8
/// target returns the table unchanged. Resampling is separable cubic
/// convolution (Catmull-Rom); support taps past the table edge are linearly
/// extrapolated rather than clamped, preserving the boundary slope of the
/// perceptual weighting.
pub fn resize_reference(table: &Array2<f64>, size: usize) -> Array2<f64> {
    let (rows, cols) = table.dim();
    if (rows, cols) == (size, size) {
        return table.clone();
    }

    // Rows first, then columns.
    let mut horizontal = Array2::zeros((rows, size));
    for r in 0..rows {
        let line = table.row(r).to_vec();
        for c in 0..size {
            horizontal[[r, c]] = cubic_resample(&line, grid_coord(c, size, cols));
        }
    }
    let mut out = Array2::zeros((size, size));
    for c in 0..size {
        let line = horizontal.column(c).to_vec();
        for r in 0..size {
            out[[r, c]] = cubic_resample(&line, grid_coord(r, size, rows));
        }
    }
    out
}

/// Apply the standard JPEG quality scaling.
///
/// S = 5000/q below 50, 200 - 2q at or above; each entry becomes
/// `clamp(floor((t*S + 50) / 100), 1, 255)`. q = 50 reproduces the table
/// unchanged, and the lower clamp guarantees no quantization step is ever
/// zero.
pub fn scale_for_quality(table: &Array2<f64>, quality: u8) -> Array2<f64> {
    let q = quality as f64;
    let s = if quality < 50 { 5000.0 / q } else { 200.0 - 2.0 * q };
    table.mapv(|t| ((t * s + 50.0) / 100.0).floor().clamp(1.0, 255.0))
}

/// Map output index `i` of `size` samples onto the source grid `[0, len - 1]`,
/// endpoints inclusive.
fn grid_coord(i: usize, size: usize, len: usize) -> f64 {
    if size == 1 {
        0.0
    } else {
        (len - 1) as f64 * i as f64 / (size - 1) as f64
    }
}

/// Catmull-Rom cubic convolution kernel (a = -0.5)
fn cubic_kernel(x: f64) -> f64 {
    let x = x.abs();
    if x < 1.0 {
        (1.5 * x - 2.5) * x * x + 1.0
    } else if x < 2.0 {
        ((-0.5 * x + 2.5) * x - 4.0) * x + 2.0
    } else {
        0.0
    }
}

/// Fetch a support tap, linearly extrapolating past either end of the line
fn tap(line: &[f64], i: isize) -> f64 {
    let n = line.len() as isize;
    if i < 0 {
        line[0] + (line[0] - line[1]) * (-i) as f64
    } else if i >= n {
        let last = line[(n - 1) as usize];
        last + (last - line[(n - 2) as usize]) * (i - n + 1) as f64
    } else {
        line[i as usize]
    }
}

fn cubic_resample(line: &[f64], u: f64) -> f64 {
    let base = u.floor() as isize;
    let mut acc = 0.0;
    for k in -1..=2 {
        let i = base + k;
        acc += tap(line, i) * cubic_kernel(u - i as f64);
    }
    acc
}
