//! Two-dimensional scalar field in row-major layout.
//!
//! A `ScalarField` stores `num_rows * num_cols` f64 values. It serves both as
//! the input texture smeared along streamlines and as the convolution output,
//! so values are deliberately unclamped: a high-pass filtered field is signed
//! and a pre-normalization pass can exceed [0, 1]. Indexing is direct
//! `(row, col)` addressing; boundary policy (wrap vs. terminate) is decided
//! by the streamline integrator, not the container.

use crate::error::LicError;
use crate::prng::Xorshift64;

/// A 2D scalar field with unclamped f64 values and direct indexing.
#[derive(Debug, Clone)]
pub struct ScalarField {
    num_rows: usize,
    num_cols: usize,
    data: Vec<f64>,
}

impl ScalarField {
    /// Creates a zero-filled field of the given dimensions.
    ///
    /// Returns `LicError::InvalidDimensions` if either dimension is zero
    /// or if `num_rows * num_cols` overflows `usize`.
    pub fn new(num_rows: usize, num_cols: usize) -> Result<Self, LicError> {
        let len = checked_len(num_rows, num_cols)?;
        Ok(Self {
            num_rows,
            num_cols,
            data: vec![0.0; len],
        })
    }

    /// Creates a field filled with `value`.
    pub fn filled(num_rows: usize, num_cols: usize, value: f64) -> Result<Self, LicError> {
        let len = checked_len(num_rows, num_cols)?;
        Ok(Self {
            num_rows,
            num_cols,
            data: vec![value; len],
        })
    }

    /// Creates a field from a pre-built row-major data vector, validating
    /// that `data.len() == num_rows * num_cols`.
    pub fn from_data(num_rows: usize, num_cols: usize, data: Vec<f64>) -> Result<Self, LicError> {
        let expected = checked_len(num_rows, num_cols)?;
        if data.len() != expected {
            return Err(LicError::DimensionMismatch {
                lhs_rows: num_rows,
                lhs_cols: num_cols,
                rhs_rows: data.len(),
                rhs_cols: 1,
            });
        }
        Ok(Self {
            num_rows,
            num_cols,
            data,
        })
    }

    /// Creates a white-noise field with values in [0, 1) drawn from the
    /// given PRNG. Same generator state produces the same texture.
    pub fn random(
        num_rows: usize,
        num_cols: usize,
        rng: &mut Xorshift64,
    ) -> Result<Self, LicError> {
        let len = checked_len(num_rows, num_cols)?;
        Ok(Self {
            num_rows,
            num_cols,
            data: (0..len).map(|_| rng.next_f64()).collect(),
        })
    }

    /// Field height in cells.
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Field width in cells.
    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    /// Spatial shape as `(num_rows, num_cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.num_rows, self.num_cols)
    }

    /// Read-only access to the underlying row-major data.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Mutable access to the underlying row-major data.
    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Gets the value at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if either coordinate is out of bounds.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.num_cols + col]
    }

    /// Sets the value at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if either coordinate is out of bounds.
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.num_cols + col] = value;
    }

    /// Largest absolute value in the field.
    pub fn max_abs(&self) -> f64 {
        self.data.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()))
    }

    /// Minimum and maximum value as `(min, max)`.
    pub fn min_max(&self) -> (f64, f64) {
        self.data.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(lo, hi), &v| (lo.min(v), hi.max(v)),
        )
    }

    /// Rescales the field in place by its maximum absolute value, bounding
    /// values to [-1, 1]. A no-op on an all-zero field.
    pub fn normalize_max_abs(&mut self) {
        let max_abs = self.max_abs();
        if max_abs > 0.0 {
            self.data.iter_mut().for_each(|v| *v /= max_abs);
        }
    }

    /// Iterates over all cells yielding `(row, col, value)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.data.iter().enumerate().map(|(i, &v)| {
            let row = i / self.num_cols;
            let col = i % self.num_cols;
            (row, col, v)
        })
    }
}

/// Validates dimensions and returns `rows * cols`.
fn checked_len(num_rows: usize, num_cols: usize) -> Result<usize, LicError> {
    if num_rows == 0 || num_cols == 0 {
        return Err(LicError::InvalidDimensions);
    }
    num_rows
        .checked_mul(num_cols)
        .ok_or(LicError::InvalidDimensions)
}
