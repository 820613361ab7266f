//! Post-processing: Gaussian high-pass filtering and adaptive local
//! histogram equalization.
//!
//! The high-pass filter subtracts a blurred copy from the field to sharpen
//! streak structure between refinement cycles. The equalization step
//! normalizes local contrast across sub-regions of the final image: each
//! tile of an 8x8 grid gets a clipped-histogram intensity mapping, and every
//! pixel blends the mappings of its four surrounding tiles bilinearly.

use flowtex_core::ScalarField;

/// Tiles per axis for adaptive equalization.
const EQUALIZE_TILES_PER_AXIS: usize = 8;
/// Intensity histogram resolution for adaptive equalization.
const EQUALIZE_NUM_BINS: usize = 150;
/// Fraction of a tile's pixel count at which histogram bins are clipped.
const EQUALIZE_CLIP_LIMIT: f64 = 0.01;

/// Separable Gaussian blur with reflected boundary sampling.
///
/// Kernel radius is `ceil(3 * sigma)`. A non-positive sigma is an identity
/// copy.
pub fn gaussian_blur(field: &ScalarField, sigma: f64) -> ScalarField {
    if sigma <= 0.0 {
        return field.clone();
    }
    let kernel = gaussian_kernel(sigma);
    let radius = (kernel.len() / 2) as isize;
    let (num_rows, num_cols) = field.shape();
    let data = field.data();

    // horizontal pass
    let mut tmp = vec![0.0_f64; data.len()];
    for row in 0..num_rows {
        for col in 0..num_cols {
            let mut acc = 0.0;
            for (k, weight) in kernel.iter().enumerate() {
                let tap = reflect(col as isize + k as isize - radius, num_cols);
                acc += weight * data[row * num_cols + tap];
            }
            tmp[row * num_cols + col] = acc;
        }
    }

    // vertical pass
    let mut out = field.clone();
    for row in 0..num_rows {
        for col in 0..num_cols {
            let mut acc = 0.0;
            for (k, weight) in kernel.iter().enumerate() {
                let tap = reflect(row as isize + k as isize - radius, num_rows);
                acc += weight * tmp[tap * num_cols + col];
            }
            out.set(row, col, acc);
        }
    }
    out
}

/// High-pass filter: the field minus its low-pass (blurred) copy.
pub fn highpass(field: &ScalarField, sigma: f64) -> ScalarField {
    let lowpass = gaussian_blur(field, sigma);
    let mut out = field.clone();
    out.data_mut()
        .iter_mut()
        .zip(lowpass.data().iter())
        .for_each(|(v, low)| *v -= low);
    out
}

/// Normalized Gaussian kernel with radius `ceil(3 * sigma)`.
fn gaussian_kernel(sigma: f64) -> Vec<f64> {
    let radius = (3.0 * sigma).ceil() as isize;
    let mut kernel: Vec<f64> = (-radius..=radius)
        .map(|offset| (-0.5 * (offset as f64 / sigma).powi(2)).exp())
        .collect();
    let sum: f64 = kernel.iter().sum();
    kernel.iter_mut().for_each(|w| *w /= sum);
    kernel
}

/// Reflected index for out-of-range taps: `(d c b a | a b c d)`.
fn reflect(index: isize, size: usize) -> usize {
    let size = size as isize;
    let mut i = index;
    loop {
        if i < 0 {
            i = -i - 1;
        } else if i >= size {
            i = 2 * size - i - 1;
        } else {
            return i as usize;
        }
    }
}

/// Adaptive local histogram equalization with range restoration.
///
/// The field is affinely mapped to [0, 1], equalized over an
/// [`EQUALIZE_TILES_PER_AXIS`]-squared tile grid with clipped histograms,
/// and rescaled back into its original value range when that range fell
/// outside [0, 1]. A constant field has no contrast to equalize and is
/// returned unchanged.
pub fn equalize_adaptive(field: &ScalarField) -> ScalarField {
    let (min_val, max_val) = field.min_max();
    let range = max_val - min_val;
    if !(range > f64::EPSILON) {
        return field.clone();
    }
    let needs_restore = max_val > 1.0 || min_val < 0.0;
    let (num_rows, num_cols) = field.shape();

    // unit-interval copy the tile histograms are built over
    let unit: Vec<f64> = field.data().iter().map(|v| (v - min_val) / range).collect();

    let tiles = EQUALIZE_TILES_PER_AXIS.min(num_rows).min(num_cols);
    let luts = build_tile_luts(&unit, num_rows, num_cols, tiles);

    let tile_height = num_rows as f64 / tiles as f64;
    let tile_width = num_cols as f64 / tiles as f64;
    let mut out = field.clone();
    for row in 0..num_rows {
        // continuous tile coordinate of this pixel's center, clamped so the
        // four blended tiles always exist
        let tr = ((row as f64 + 0.5) / tile_height - 0.5).clamp(0.0, tiles as f64 - 1.0);
        let tr_low = tr.floor() as usize;
        let tr_high = (tr_low + 1).min(tiles - 1);
        let wr = tr - tr_low as f64;
        for col in 0..num_cols {
            let tc = ((col as f64 + 0.5) / tile_width - 0.5).clamp(0.0, tiles as f64 - 1.0);
            let tc_low = tc.floor() as usize;
            let tc_high = (tc_low + 1).min(tiles - 1);
            let wc = tc - tc_low as f64;

            let bin = value_to_bin(unit[row * num_cols + col]);
            let ll = luts[tr_low * tiles + tc_low][bin];
            let lh = luts[tr_low * tiles + tc_high][bin];
            let hl = luts[tr_high * tiles + tc_low][bin];
            let hh = luts[tr_high * tiles + tc_high][bin];
            let value = ll * (1.0 - wr) * (1.0 - wc)
                + lh * (1.0 - wr) * wc
                + hl * wr * (1.0 - wc)
                + hh * wr * wc;
            out.set(
                row,
                col,
                if needs_restore {
                    value * range + min_val
                } else {
                    value
                },
            );
        }
    }
    out
}

/// Maps a unit-interval value to a histogram bin index.
fn value_to_bin(value: f64) -> usize {
    ((value * EQUALIZE_NUM_BINS as f64) as usize).min(EQUALIZE_NUM_BINS - 1)
}

/// Builds one clipped-histogram CDF lookup table per tile.
///
/// Histogram counts above `EQUALIZE_CLIP_LIMIT * tile_pixels` are clipped
/// and the excess redistributed uniformly, bounding the local contrast
/// gradient the mapping can introduce.
fn build_tile_luts(
    unit: &[f64],
    num_rows: usize,
    num_cols: usize,
    tiles: usize,
) -> Vec<Vec<f64>> {
    let mut luts = Vec::with_capacity(tiles * tiles);
    for tile_row in 0..tiles {
        let row_start = tile_row * num_rows / tiles;
        let row_end = (tile_row + 1) * num_rows / tiles;
        for tile_col in 0..tiles {
            let col_start = tile_col * num_cols / tiles;
            let col_end = (tile_col + 1) * num_cols / tiles;

            // tiles <= min(num_rows, num_cols), so every extent is non-empty
            let mut histogram = vec![0.0_f64; EQUALIZE_NUM_BINS];
            let mut count = 0.0;
            for row in row_start..row_end {
                for col in col_start..col_end {
                    histogram[value_to_bin(unit[row * num_cols + col])] += 1.0;
                    count += 1.0;
                }
            }

            let clip = (EQUALIZE_CLIP_LIMIT * count).max(1.0);
            let mut excess = 0.0;
            for bin in histogram.iter_mut() {
                if *bin > clip {
                    excess += *bin - clip;
                    *bin = clip;
                }
            }
            let redistribute = excess / EQUALIZE_NUM_BINS as f64;
            for bin in histogram.iter_mut() {
                *bin += redistribute;
            }

            let mut cdf = Vec::with_capacity(EQUALIZE_NUM_BINS);
            let mut cumulative = 0.0;
            for &bin in &histogram {
                cumulative += bin;
                // accumulation error can push past 1.0 in the last bins
                cdf.push((cumulative / count).min(1.0));
            }
            luts.push(cdf);
        }
    }
    luts
}
