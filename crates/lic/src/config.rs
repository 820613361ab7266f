//! LIC configuration and fail-fast validation.
//!
//! All validation happens in [`LicConfig::resolve`] before any convolution
//! work is scheduled: a configuration either resolves completely or the
//! caller gets a `LicError` with no partial work performed.

use flowtex_core::LicError;
use serde::{Deserialize, Serialize};

/// Default PRNG seed for the generated noise texture.
pub const DEFAULT_SEED: u64 = 42;
/// Default LIC passes per refinement cycle.
pub const DEFAULT_NUM_PASSES: usize = 3;
/// Default refinement cycles.
pub const DEFAULT_NUM_CYCLES: usize = 3;
/// Default Gaussian sigma for the per-cycle high-pass filter.
pub const DEFAULT_FILTER_SIGMA: f64 = 3.0;
/// Minimum usable streamlength; the cosine taper degenerates below this.
pub const MIN_STREAMLENGTH: usize = 5;

/// Which execution strategy runs a full-field pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Execution {
    /// Reference double loop on the calling thread.
    Serial,
    /// Row-partitioned fork-join across the rayon thread pool.
    #[default]
    Parallel,
}

/// Configuration for [`compute_lic_with_postprocessing`](crate::pipeline::compute_lic_with_postprocessing).
///
/// The defaults reproduce the standard rendering recipe: three passes per
/// cycle, three cycles, sigma-3 high-pass, final equalization, periodic
/// boundaries, parallel execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicConfig {
    /// Streamline length in cells; `None` resolves to a quarter of the
    /// smaller grid dimension.
    pub streamlength: Option<usize>,
    /// Seed for the generated noise texture (unused when a texture is
    /// supplied by the caller).
    pub seed: u64,
    /// Wrap-around domain topology; open boundaries terminate streamlines
    /// at the domain edge instead.
    pub periodic: bool,
    /// LIC passes per refinement cycle, each feeding its output to the next.
    pub num_passes: usize,
    /// Refinement cycles (passes + normalization + optional high-pass).
    pub num_cycles: usize,
    /// `Some(sigma)` applies a Gaussian high-pass once per cycle.
    pub highpass: Option<f64>,
    /// Adaptive histogram equalization, once, at the very end.
    pub equalize: bool,
    /// Execution strategy for each pass.
    pub execution: Execution,
}

impl Default for LicConfig {
    fn default() -> Self {
        Self {
            streamlength: None,
            seed: DEFAULT_SEED,
            periodic: true,
            num_passes: DEFAULT_NUM_PASSES,
            num_cycles: DEFAULT_NUM_CYCLES,
            highpass: Some(DEFAULT_FILTER_SIGMA),
            equalize: true,
            execution: Execution::default(),
        }
    }
}

/// A [`LicConfig`] with every value resolved and validated against a grid.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedConfig {
    pub streamlength: usize,
    pub seed: u64,
    pub periodic: bool,
    pub num_passes: usize,
    pub num_cycles: usize,
    pub highpass: Option<f64>,
    pub equalize: bool,
    pub execution: Execution,
}

impl LicConfig {
    /// Resolves defaults against the grid shape and validates everything.
    ///
    /// Returns `LicError::InvalidStreamlength` when the (resolved)
    /// streamlength falls outside `[5, min_dim / 2)` and
    /// `LicError::InvalidIterationCounts` when a pass or cycle count is zero.
    pub fn resolve(&self, num_rows: usize, num_cols: usize) -> Result<ResolvedConfig, LicError> {
        let streamlength = self
            .streamlength
            .unwrap_or_else(|| num_rows.min(num_cols) / 4);
        validate_streamlength(streamlength, num_rows, num_cols)?;
        if self.num_passes == 0 || self.num_cycles == 0 {
            return Err(LicError::InvalidIterationCounts {
                num_passes: self.num_passes,
                num_cycles: self.num_cycles,
            });
        }
        Ok(ResolvedConfig {
            streamlength,
            seed: self.seed,
            periodic: self.periodic,
            num_passes: self.num_passes,
            num_cycles: self.num_cycles,
            highpass: self.highpass,
            equalize: self.equalize,
            execution: self.execution,
        })
    }
}

/// Validates a streamlength against the grid it will trace over.
///
/// Usable values lie in `[MIN_STREAMLENGTH, min_dim / 2)`: below 5 the taper
/// weighting is numerically meaningless, and at half the smaller dimension a
/// streamline can lap the domain.
pub fn validate_streamlength(
    streamlength: usize,
    num_rows: usize,
    num_cols: usize,
) -> Result<(), LicError> {
    let min_dim = num_rows.min(num_cols);
    if streamlength < MIN_STREAMLENGTH || streamlength >= min_dim / 2 {
        return Err(LicError::InvalidStreamlength {
            streamlength,
            num_rows,
            num_cols,
        });
    }
    Ok(())
}
