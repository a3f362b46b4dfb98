//! Orthogonal DCT-II basis construction
//!
//! The transform matrix is a pure function of the block edge length: row 0 is
//! the constant DC vector normalized by `1/sqrt(N)`, rows i > 0 are the
//! cosine-modulated AC vectors scaled by `sqrt(2/N)`. Because the matrix is
//! orthogonal, the inverse transform is just its transpose.

use ndarray::Array2;
use std::f64::consts::PI;

/// An N x N orthogonal transform basis, built once per configured block size
/// and immutable thereafter.
#[derive(Debug, Clone)]
pub struct DctBasis {
    size: usize,
    forward: Array2<f64>,
    inverse: Array2<f64>,
}

impl DctBasis {
    /// Build the basis for the given block edge length.
    ///
    /// `size` must be positive; configuration validation rejects zero before
    /// any basis is constructed.
    pub fn new(size: usize) -> Self {
        let n = size as f64;
        let forward = Array2::from_shape_fn((size, size), |(i, j)| {
            if i == 0 {
                1.0 / n.sqrt()
            } else {
                (2.0 / n).sqrt() * (((2 * j + 1) * i) as f64 * PI / (2.0 * n)).cos()
            }
        });
        let inverse = forward.t().to_owned();
        DctBasis {
            size,
            forward,
            inverse,
        }
    }

    /// Block edge length
    pub fn size(&self) -> usize {
        self.size
    }

    /// Forward transform matrix
    pub fn forward(&self) -> &Array2<f64> {
        &self.forward
    }

    /// Inverse transform matrix (the transpose of the forward matrix)
    pub fn inverse(&self) -> &Array2<f64> {
        &self.inverse
    }
}
