//! Full-field convolution: the per-pixel engine and execution backends.
//!
//! Each output pixel is produced by tracing the streamline through it in
//! both directions and normalizing the combined weighted sums. The full-field
//! pass is embarrassingly parallel: every pixel is a pure function of the
//! (read-only) input fields, so the parallel backend partitions the output
//! by row with no locking and no cross-worker communication.

use flowtex_core::{LicError, ScalarField, VectorField};
use rayon::prelude::*;

use crate::config::{validate_streamlength, Execution};
use crate::streamline::{advect_streamline, Direction};

/// Convolved intensity of a single pixel.
///
/// Traces forward and backward streamlines from `(row, col)` and combines
/// them as `(sum_f + sum_b) / (weight_f + weight_b)`. The symmetric
/// two-direction traversal makes the result follow the local flow tangent
/// line rather than a one-sided integral curve. A combined weight of zero
/// (stalled advection in both directions) yields `0.0`.
pub fn convolve_pixel(
    vfield: &VectorField,
    sfield_in: &ScalarField,
    row: usize,
    col: usize,
    streamlength: usize,
    periodic: bool,
) -> f64 {
    let (fwd_sum, fwd_weight) = advect_streamline(
        vfield,
        sfield_in,
        row,
        col,
        Direction::Forward,
        streamlength,
        periodic,
    );
    let (bwd_sum, bwd_weight) = advect_streamline(
        vfield,
        sfield_in,
        row,
        col,
        Direction::Backward,
        streamlength,
        periodic,
    );
    let total_weight = fwd_weight + bwd_weight;
    if total_weight > 0.0 {
        (fwd_sum + bwd_sum) / total_weight
    } else {
        0.0
    }
}

/// An execution strategy for one full-field LIC pass.
///
/// Implementations are pure functions of their inputs: the same fields and
/// settings produce the same output regardless of scheduling, so serial and
/// parallel strategies are interchangeable. The trait is object-safe.
pub trait ConvolutionBackend {
    /// Convolves the input texture along the vector field's streamlines,
    /// producing an output field of the same spatial shape.
    ///
    /// Fails fast on a shape mismatch or an unusable streamlength; no rows
    /// are processed in that case.
    fn convolve(
        &self,
        vfield: &VectorField,
        sfield_in: &ScalarField,
        streamlength: usize,
        periodic: bool,
    ) -> Result<ScalarField, LicError>;
}

/// Validates the inputs shared by every backend.
fn validate_pass(
    vfield: &VectorField,
    sfield_in: &ScalarField,
    streamlength: usize,
) -> Result<(), LicError> {
    let (num_rows, num_cols) = vfield.shape();
    if sfield_in.shape() != (num_rows, num_cols) {
        return Err(LicError::DimensionMismatch {
            lhs_rows: num_rows,
            lhs_cols: num_cols,
            rhs_rows: sfield_in.num_rows(),
            rhs_cols: sfield_in.num_cols(),
        });
    }
    validate_streamlength(streamlength, num_rows, num_cols)
}

/// Reference implementation: a plain double loop over the output grid.
///
/// This is the semantic contract the parallel strategy is measured against.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialBackend;

impl ConvolutionBackend for SerialBackend {
    fn convolve(
        &self,
        vfield: &VectorField,
        sfield_in: &ScalarField,
        streamlength: usize,
        periodic: bool,
    ) -> Result<ScalarField, LicError> {
        validate_pass(vfield, sfield_in, streamlength)?;
        let (num_rows, num_cols) = vfield.shape();
        let mut sfield_out = ScalarField::new(num_rows, num_cols)?;
        for row in 0..num_rows {
            for col in 0..num_cols {
                let value = convolve_pixel(vfield, sfield_in, row, col, streamlength, periodic);
                sfield_out.set(row, col, value);
            }
        }
        Ok(sfield_out)
    }
}

/// Fork-join implementation over the rayon thread pool.
///
/// The output buffer is split into per-row chunks, each owned exclusively by
/// one worker; the input fields are shared by immutable reference. Disjoint
/// write sets mean no locks are needed, and the per-pixel arithmetic is
/// identical to [`SerialBackend`], so the two produce bitwise-equal output.
/// A panicking worker propagates out of the fork-join scope and aborts the
/// whole pass: no partial field is ever returned.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParallelBackend;

impl ConvolutionBackend for ParallelBackend {
    fn convolve(
        &self,
        vfield: &VectorField,
        sfield_in: &ScalarField,
        streamlength: usize,
        periodic: bool,
    ) -> Result<ScalarField, LicError> {
        validate_pass(vfield, sfield_in, streamlength)?;
        let (num_rows, num_cols) = vfield.shape();
        let mut sfield_out = ScalarField::new(num_rows, num_cols)?;
        sfield_out
            .data_mut()
            .par_chunks_mut(num_cols)
            .enumerate()
            .for_each(|(row, out_row)| {
                for (col, slot) in out_row.iter_mut().enumerate() {
                    *slot = convolve_pixel(vfield, sfield_in, row, col, streamlength, periodic);
                }
            });
        Ok(sfield_out)
    }
}

/// Enumeration of the available execution backends.
///
/// Constructed from the tagged [`Execution`] configuration value; delegates
/// the [`ConvolutionBackend`] contract to the selected implementation.
#[derive(Debug, Clone, Copy)]
pub enum BackendKind {
    /// Reference double loop.
    Serial(SerialBackend),
    /// Rayon fork-join over rows.
    Parallel(ParallelBackend),
}

impl BackendKind {
    /// Selects a backend from the configuration tag.
    pub fn from_execution(execution: Execution) -> Self {
        match execution {
            Execution::Serial => BackendKind::Serial(SerialBackend),
            Execution::Parallel => BackendKind::Parallel(ParallelBackend),
        }
    }
}

impl ConvolutionBackend for BackendKind {
    fn convolve(
        &self,
        vfield: &VectorField,
        sfield_in: &ScalarField,
        streamlength: usize,
        periodic: bool,
    ) -> Result<ScalarField, LicError> {
        match self {
            BackendKind::Serial(backend) => {
                backend.convolve(vfield, sfield_in, streamlength, periodic)
            }
            BackendKind::Parallel(backend) => {
                backend.convolve(vfield, sfield_in, streamlength, periodic)
            }
        }
    }
}
