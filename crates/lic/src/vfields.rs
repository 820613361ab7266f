//! Built-in analytic vector fields for demos and CLI rendering.
//!
//! Each preset evaluates a closed-form flow over a fixed coordinate window
//! mapped onto a square grid, and carries the streamline length that renders
//! it well (close to the field's correlation length). The `curl-noise`
//! preset is the odd one out: a divergence-free flow derived from Perlin
//! noise, standing in for turbulent simulation slices.

use flowtex_core::{LicError, VectorField};
use noise::{NoiseFn, Perlin};

/// Noise seed for the `curl-noise` preset; fixed so renders are reproducible.
const CURL_NOISE_SEED: u32 = 7;
/// Noise-space units spanned by the grid for the `curl-noise` preset.
const CURL_NOISE_EXTENT: f64 = 4.0;
/// Central-difference step for the curl, in noise-space units.
const CURL_NOISE_EPS: f64 = 1e-3;

/// All available preset names.
const PRESET_NAMES: &[&str] = &[
    "lotka-volterra",
    "flowers",
    "circles",
    "swirls",
    "curl-noise",
];

/// A named vector field with a suggested streamline length.
#[derive(Debug, Clone)]
pub struct VFieldPreset {
    /// Preset name as accepted by [`from_name`].
    pub name: &'static str,
    /// The field itself, `size x size`.
    pub vfield: VectorField,
    /// Streamline length that renders this field well.
    pub streamlength: usize,
}

/// Returns a slice of all recognized preset names.
pub fn list_names() -> &'static [&'static str] {
    PRESET_NAMES
}

/// Constructs a preset by name on a `size x size` grid.
///
/// Returns `LicError::UnknownPreset` if the name is not recognized and
/// `LicError::InvalidDimensions` for a grid too small to evaluate.
pub fn from_name(name: &str, size: usize) -> Result<VFieldPreset, LicError> {
    match name {
        "lotka-volterra" => lotka_volterra(size),
        "flowers" => flowers(size),
        "circles" => circles(size),
        "swirls" => swirls(size),
        "curl-noise" => curl_noise(size),
        _ => Err(LicError::UnknownPreset(name.to_string())),
    }
}

/// Maps a grid index to a coordinate in `[lo, hi]` (endpoints included).
fn linspace(index: usize, size: usize, lo: f64, hi: f64) -> f64 {
    lo + index as f64 * (hi - lo) / (size.max(2) - 1) as f64
}

/// Lotka-Volterra phase flow: predator-prey dynamics with logistic prey
/// growth, on `[-5, 10] x [-5, 10]`.
pub fn lotka_volterra(size: usize) -> Result<VFieldPreset, LicError> {
    let prey_capacity = 8.0;
    let predator_growth = 3.0;
    let predator_decay = 2.0;
    let vfield = VectorField::from_fn(size, size, |row, col| {
        let y = linspace(row, size, -5.0, 10.0);
        let x = linspace(col, size, -5.0, 10.0);
        let predation = y * x / (1.0 + x);
        let row_comp = predator_growth * predation - predator_decay * y;
        let col_comp = x * (1.0 - x / prey_capacity) - predation;
        (row_comp, col_comp)
    })?;
    Ok(VFieldPreset {
        name: "lotka-volterra",
        vfield,
        streamlength: size / 4,
    })
}

/// Separable cosine flow producing flower-like lobes, on `[-10, 10]^2`.
pub fn flowers(size: usize) -> Result<VFieldPreset, LicError> {
    let vfield = VectorField::from_fn(size, size, |row, col| {
        let y = linspace(row, size, -10.0, 10.0);
        let x = linspace(col, size, -10.0, 10.0);
        ((y / 2.0).cos(), (x / 2.0).cos())
    })?;
    Ok(VFieldPreset {
        name: "flowers",
        vfield,
        streamlength: size / 4,
    })
}

/// Crossed cosine flow producing closed circular cells, on `[-10, 10]^2`.
pub fn circles(size: usize) -> Result<VFieldPreset, LicError> {
    let vfield = VectorField::from_fn(size, size, |row, col| {
        let y = linspace(row, size, -10.0, 10.0);
        let x = linspace(col, size, -10.0, 10.0);
        ((x / 2.0).cos(), (y / 2.0).cos())
    })?;
    Ok(VFieldPreset {
        name: "circles",
        vfield,
        streamlength: size / 4,
    })
}

/// Diagonal shear flow with long curling filaments, on `[-10, 10]^2`.
pub fn swirls(size: usize) -> Result<VFieldPreset, LicError> {
    let vfield = VectorField::from_fn(size, size, |row, col| {
        let y = linspace(row, size, -10.0, 10.0);
        let x = linspace(col, size, -10.0, 10.0);
        (((x - y) / 3.0).cos(), ((y + x) / 3.0).sin())
    })?;
    Ok(VFieldPreset {
        name: "swirls",
        vfield,
        streamlength: size / 3,
    })
}

/// Divergence-free curl-of-Perlin flow.
///
/// The curl of a scalar noise field F gives a flow with zero divergence:
/// `col_comp = dF/dy`, `row_comp = -dF/dx`, evaluated by central
/// differences.
pub fn curl_noise(size: usize) -> Result<VFieldPreset, LicError> {
    let perlin = Perlin::new(CURL_NOISE_SEED);
    let scale = CURL_NOISE_EXTENT / size.max(2) as f64;
    let vfield = VectorField::from_fn(size, size, |row, col| {
        let sy = row as f64 * scale;
        let sx = col as f64 * scale;
        let df_dy =
            (perlin.get([sx, sy + CURL_NOISE_EPS]) - perlin.get([sx, sy - CURL_NOISE_EPS]))
                / (2.0 * CURL_NOISE_EPS);
        let df_dx =
            (perlin.get([sx + CURL_NOISE_EPS, sy]) - perlin.get([sx - CURL_NOISE_EPS, sy]))
                / (2.0 * CURL_NOISE_EPS);
        (-df_dx, df_dy)
    })?;
    Ok(VFieldPreset {
        name: "curl-noise",
        vfield,
        streamlength: size / 4,
    })
}
