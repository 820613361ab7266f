//! Error types for the flowtex core.

use thiserror::Error;

/// Errors produced by field construction and LIC configuration.
///
/// All variants describe configuration problems detected before any
/// convolution work is scheduled; a pass either runs to completion or
/// never starts.
#[derive(Debug, Error)]
pub enum LicError {
    /// A grid dimension was zero, or `rows * cols` overflowed `usize`.
    #[error("invalid dimensions: rows and cols must be non-zero")]
    InvalidDimensions,

    /// Two fields had incompatible spatial shapes.
    #[error("dimension mismatch: ({lhs_rows}, {lhs_cols}) vs ({rhs_rows}, {rhs_cols})")]
    DimensionMismatch {
        lhs_rows: usize,
        lhs_cols: usize,
        rhs_rows: usize,
        rhs_cols: usize,
    },

    /// Streamlength outside the usable range `[5, min_dim / 2)`.
    #[error(
        "invalid streamlength {streamlength} for a {num_rows}x{num_cols} grid: \
         must be at least 5 and less than half the smaller dimension"
    )]
    InvalidStreamlength {
        streamlength: usize,
        num_rows: usize,
        num_cols: usize,
    },

    /// Pass or cycle count of zero in the refinement configuration.
    #[error("invalid iteration counts: passes={num_passes}, cycles={num_cycles} (both must be >= 1)")]
    InvalidIterationCounts { num_passes: usize, num_cycles: usize },

    /// A vector field preset name was not recognized.
    #[error("unknown preset: {0}")]
    UnknownPreset(String),

    /// An I/O error (snapshot write).
    #[error("i/o error: {0}")]
    Io(String),
}
