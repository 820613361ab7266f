//! Grayscale PNG snapshots of a [`ScalarField`].

use flowtex_core::{LicError, ScalarField};
use std::path::Path;

/// Maps field values to grayscale bytes, stretching the field's own value
/// range over [0, 255].
///
/// A constant field maps to mid-gray. The buffer length is
/// `num_rows * num_cols`.
pub fn field_to_luma(field: &ScalarField) -> Vec<u8> {
    let (min_val, max_val) = field.min_max();
    let range = max_val - min_val;
    if range <= f64::EPSILON {
        return vec![128; field.data().len()];
    }
    field
        .data()
        .iter()
        .map(|&v| (((v - min_val) / range) * 255.0).round() as u8)
        .collect()
}

/// Writes a field as a grayscale PNG.
///
/// Returns `LicError::InvalidDimensions` if the field dimensions overflow
/// `u32`, or `LicError::Io` on write failure.
pub fn write_png(field: &ScalarField, path: &Path) -> Result<(), LicError> {
    let luma = field_to_luma(field);
    let w = u32::try_from(field.num_cols()).map_err(|_| LicError::InvalidDimensions)?;
    let h = u32::try_from(field.num_rows()).map_err(|_| LicError::InvalidDimensions)?;
    let img = image::GrayImage::from_raw(w, h, luma)
        .ok_or_else(|| LicError::Io("luma buffer size mismatch".into()))?;
    img.save(path).map_err(|e| LicError::Io(e.to_string()))
}
