//! Iterative refinement pipeline driving repeated LIC passes.
//!
//! One refinement cycle runs a configured number of LIC passes (each pass
//! convolving the previous pass's output), then rescales the field by its
//! maximum absolute value and optionally sharpens it with a high-pass
//! filter. Cycles chain output-to-input by value; no cycle mutates a
//! previous cycle's buffer. An optional adaptive equalization runs once at
//! the very end.

use flowtex_core::{LicError, ScalarField, VectorField, Xorshift64};
use log::debug;

use crate::config::{Execution, LicConfig};
use crate::convolve::{BackendKind, ConvolutionBackend};
use crate::postprocess;

/// One full-field LIC pass with explicit settings.
///
/// Validates the configuration and input shapes, then convolves the texture
/// along the vector field's streamlines with the selected execution
/// strategy. The output has the vector field's spatial shape.
pub fn compute_lic(
    vfield: &VectorField,
    sfield_in: &ScalarField,
    streamlength: usize,
    periodic: bool,
    execution: Execution,
) -> Result<ScalarField, LicError> {
    BackendKind::from_execution(execution).convolve(vfield, sfield_in, streamlength, periodic)
}

/// The full refinement pipeline: seeding, passes, cycles, post-processing.
///
/// When `sfield_in` is `None`, a white-noise texture is generated from the
/// configured seed: same seed, same texture, same output. All configuration
/// errors (streamlength bounds, iteration counts, texture shape mismatch)
/// surface before any convolution work is scheduled.
pub fn compute_lic_with_postprocessing(
    vfield: &VectorField,
    sfield_in: Option<&ScalarField>,
    config: &LicConfig,
) -> Result<ScalarField, LicError> {
    let (num_rows, num_cols) = vfield.shape();
    let resolved = config.resolve(num_rows, num_cols)?;
    if let Some(sfield) = sfield_in {
        if sfield.shape() != (num_rows, num_cols) {
            return Err(LicError::DimensionMismatch {
                lhs_rows: num_rows,
                lhs_cols: num_cols,
                rhs_rows: sfield.num_rows(),
                rhs_cols: sfield.num_cols(),
            });
        }
    }

    let backend = BackendKind::from_execution(resolved.execution);
    let mut sfield = match sfield_in {
        Some(sfield) => sfield.clone(),
        None => {
            let mut rng = Xorshift64::new(resolved.seed);
            ScalarField::random(num_rows, num_cols, &mut rng)?
        }
    };

    for cycle in 0..resolved.num_cycles {
        for pass in 0..resolved.num_passes {
            sfield = backend.convolve(
                vfield,
                &sfield,
                resolved.streamlength,
                resolved.periodic,
            )?;
            debug!(
                "cycle {}/{}: pass {}/{} complete",
                cycle + 1,
                resolved.num_cycles,
                pass + 1,
                resolved.num_passes
            );
        }
        sfield.normalize_max_abs();
        if let Some(sigma) = resolved.highpass {
            sfield = postprocess::highpass(&sfield, sigma);
        }
    }
    if resolved.equalize {
        sfield = postprocess::equalize_adaptive(&sfield);
    }
    Ok(sfield)
}
