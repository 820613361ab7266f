//! Two-component direction field over a regular 2D grid.
//!
//! A `VectorField` stores separate row-major planes for the row and column
//! velocity components. It is immutable for the duration of an LIC
//! invocation and shared read-only across workers. Sub-pixel access goes
//! through [`VectorField::sample_bilinear`], which interpolates between the
//! four enclosing grid cells and clamps high neighbors at the domain edge.

use crate::error::LicError;

/// A 2-component vector field on a `num_rows x num_cols` grid.
#[derive(Debug, Clone)]
pub struct VectorField {
    num_rows: usize,
    num_cols: usize,
    row_comp: Vec<f64>,
    col_comp: Vec<f64>,
}

impl VectorField {
    /// Creates a vector field from row-major component planes.
    ///
    /// `row_comp` holds the row (vertical) velocity component and `col_comp`
    /// the column (horizontal) component. Returns `LicError::InvalidDimensions`
    /// for a zero dimension and `LicError::DimensionMismatch` if either plane
    /// has the wrong length.
    pub fn from_components(
        num_rows: usize,
        num_cols: usize,
        row_comp: Vec<f64>,
        col_comp: Vec<f64>,
    ) -> Result<Self, LicError> {
        if num_rows == 0 || num_cols == 0 {
            return Err(LicError::InvalidDimensions);
        }
        let expected = num_rows
            .checked_mul(num_cols)
            .ok_or(LicError::InvalidDimensions)?;
        if row_comp.len() != expected || col_comp.len() != expected {
            return Err(LicError::DimensionMismatch {
                lhs_rows: num_rows,
                lhs_cols: num_cols,
                rhs_rows: row_comp.len(),
                rhs_cols: col_comp.len(),
            });
        }
        Ok(Self {
            num_rows,
            num_cols,
            row_comp,
            col_comp,
        })
    }

    /// Creates a vector field by evaluating `f(row, col) -> (row_comp, col_comp)`
    /// at every cell.
    pub fn from_fn<F>(num_rows: usize, num_cols: usize, f: F) -> Result<Self, LicError>
    where
        F: Fn(usize, usize) -> (f64, f64),
    {
        if num_rows == 0 || num_cols == 0 {
            return Err(LicError::InvalidDimensions);
        }
        let len = num_rows
            .checked_mul(num_cols)
            .ok_or(LicError::InvalidDimensions)?;
        let mut row_comp = Vec::with_capacity(len);
        let mut col_comp = Vec::with_capacity(len);
        for row in 0..num_rows {
            for col in 0..num_cols {
                let (vr, vc) = f(row, col);
                row_comp.push(vr);
                col_comp.push(vc);
            }
        }
        Ok(Self {
            num_rows,
            num_cols,
            row_comp,
            col_comp,
        })
    }

    /// Creates an everywhere-zero vector field.
    pub fn zeros(num_rows: usize, num_cols: usize) -> Result<Self, LicError> {
        Self::from_fn(num_rows, num_cols, |_, _| (0.0, 0.0))
    }

    /// Creates a constant vector field with the given components.
    pub fn constant(
        num_rows: usize,
        num_cols: usize,
        row_comp: f64,
        col_comp: f64,
    ) -> Result<Self, LicError> {
        Self::from_fn(num_rows, num_cols, |_, _| (row_comp, col_comp))
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

    /// The vector at an integer cell, as `(row_comp, col_comp)`.
    ///
    /// # Panics
    ///
    /// Panics if either coordinate is out of bounds.
    pub fn at(&self, row: usize, col: usize) -> (f64, f64) {
        let idx = row * self.num_cols + col;
        (self.row_comp[idx], self.col_comp[idx])
    }

    /// Bilinearly interpolated vector at a continuous position, as
    /// `(row_comp, col_comp)`.
    ///
    /// The four enclosing cells are the floor neighbors and their +1
    /// successors, with high indices clamped to the last valid index so the
    /// sampler never reads out of bounds at the domain edge. Positions must
    /// lie in `[0, num_rows) x [0, num_cols)`; the streamline integrator
    /// maintains that invariant.
    ///
    /// A non-finite interpolated component (NaN/Inf in a degenerate region)
    /// is reported as the zero vector, which halts advection.
    pub fn sample_bilinear(&self, row: f64, col: f64) -> (f64, f64) {
        debug_assert!((0.0..self.num_rows as f64).contains(&row), "row {row} out of domain");
        debug_assert!((0.0..self.num_cols as f64).contains(&col), "col {col} out of domain");
        let row_low = row.floor() as usize;
        let col_low = col.floor() as usize;
        let row_high = (row_low + 1).min(self.num_rows - 1);
        let col_high = (col_low + 1).min(self.num_cols - 1);
        // weight based on distance from the cell edge
        let w_row_high = row - row_low as f64;
        let w_col_high = col - col_low as f64;
        let w_row_low = 1.0 - w_row_high;
        let w_col_low = 1.0 - w_col_high;

        let ll = row_low * self.num_cols + col_low;
        let lh = row_low * self.num_cols + col_high;
        let hl = row_high * self.num_cols + col_low;
        let hh = row_high * self.num_cols + col_high;

        let v_row = self.row_comp[ll] * w_row_low * w_col_low
            + self.row_comp[lh] * w_row_low * w_col_high
            + self.row_comp[hl] * w_row_high * w_col_low
            + self.row_comp[hh] * w_row_high * w_col_high;
        let v_col = self.col_comp[ll] * w_row_low * w_col_low
            + self.col_comp[lh] * w_row_low * w_col_high
            + self.col_comp[hl] * w_row_high * w_col_low
            + self.col_comp[hh] * w_row_high * w_col_high;

        if !v_row.is_finite() || !v_col.is_finite() {
            return (0.0, 0.0);
        }
        (v_row, v_col)
    }
}
