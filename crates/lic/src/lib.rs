#![deny(unsafe_code)]
//! Line Integral Convolution (LIC) engine.
//!
//! Visualizes a 2D vector field by smearing a noise texture along
//! field-aligned streamlines. Each output pixel is the taper-weighted average
//! of texture values sampled along the streamline through that pixel, traced
//! forward and backward with adaptive cell-crossing steps.
//!
//! The crate is layered leaves-first:
//! - [`streamline`]: single-streamline advection and the cosine taper
//! - [`convolve`]: per-pixel convolution and the serial/parallel execution
//!   backends behind the [`ConvolutionBackend`] trait
//! - [`pipeline`]: the iterative refinement driver (passes, cycles,
//!   normalization, post-processing)
//! - [`postprocess`]: Gaussian high-pass filter and adaptive equalization
//! - [`vfields`]: built-in analytic vector field presets

pub mod config;
pub mod convolve;
pub mod pipeline;
pub mod postprocess;
pub mod streamline;
pub mod vfields;

pub use config::{Execution, LicConfig};
pub use convolve::{BackendKind, ConvolutionBackend, ParallelBackend, SerialBackend};
pub use pipeline::{compute_lic, compute_lic_with_postprocessing};
pub use streamline::{advect_streamline, Direction};
pub use vfields::VFieldPreset;
