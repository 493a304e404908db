//! Per-frame channel preprocessing.
//!
//! Turns the infrared channel into a gradient edge response and the depth
//! channel into a background-subtracted delta, both block-averaged down to
//! the resolution the baseline statistics were computed at.

use ndarray::Array2;
use rayon::prelude::*;

use crate::config::EdgeConfig;
use crate::consts::PARALLEL_PIXEL_THRESHOLD;

/// Full edge channel for one frame: Sobel magnitude of the infrared
/// channel, double-thresholded. Shared verbatim by the warm-up sampler
/// and the live path so the baseline statistics model the same signal
/// the gate later thresholds.
pub fn edge_channel(infrared: &Array2<f32>, config: &EdgeConfig) -> Array2<f32> {
    edge_response(
        &gradient_magnitude(infrared),
        config.low_thresh,
        config.high_thresh,
    )
}

/// Compute Sobel gradient magnitude image.
///
/// Returns an `Array2<f32>` of the same dimensions as input. The 1-pixel
/// border is zero (Sobel kernel needs a 3x3 neighborhood).
pub fn gradient_magnitude(data: &Array2<f32>) -> Array2<f32> {
    let (h, w) = data.dim();
    if h < 3 || w < 3 {
        return Array2::<f32>::zeros((h, w));
    }

    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        gradient_magnitude_parallel(data, h, w)
    } else {
        gradient_magnitude_sequential(data, h, w)
    }
}

fn sobel_at(data: &Array2<f32>, row: usize, col: usize) -> f32 {
    let gx = -data[[row - 1, col - 1]] as f64 + data[[row - 1, col + 1]] as f64
        - 2.0 * data[[row, col - 1]] as f64
        + 2.0 * data[[row, col + 1]] as f64
        - data[[row + 1, col - 1]] as f64
        + data[[row + 1, col + 1]] as f64;

    let gy = -data[[row - 1, col - 1]] as f64
        - 2.0 * data[[row - 1, col]] as f64
        - data[[row - 1, col + 1]] as f64
        + data[[row + 1, col - 1]] as f64
        + 2.0 * data[[row + 1, col]] as f64
        + data[[row + 1, col + 1]] as f64;

    (gx * gx + gy * gy).sqrt() as f32
}

fn gradient_magnitude_sequential(data: &Array2<f32>, h: usize, w: usize) -> Array2<f32> {
    let mut result = Array2::<f32>::zeros((h, w));
    for row in 1..h - 1 {
        for col in 1..w - 1 {
            result[[row, col]] = sobel_at(data, row, col);
        }
    }
    result
}

/// Row-parallel Sobel using Rayon.
fn gradient_magnitude_parallel(data: &Array2<f32>, h: usize, w: usize) -> Array2<f32> {
    let rows: Vec<Vec<f32>> = (1..h - 1)
        .into_par_iter()
        .map(|row| (1..w - 1).map(|col| sobel_at(data, row, col)).collect())
        .collect();

    let mut result = Array2::<f32>::zeros((h, w));
    for (i, row_vals) in rows.into_iter().enumerate() {
        for (j, v) in row_vals.into_iter().enumerate() {
            result[[i + 1, j + 1]] = v;
        }
    }
    result
}

/// Double-threshold edge response on a gradient magnitude image.
///
/// Magnitudes at or above `high` are kept as-is. Magnitudes in
/// `[low, high)` are kept only when 8-adjacent to a strong pixel.
/// Everything else is zeroed.
pub fn edge_response(magnitude: &Array2<f32>, low: f32, high: f32) -> Array2<f32> {
    let (h, w) = magnitude.dim();
    let mut result = Array2::<f32>::zeros((h, w));

    let strong = magnitude.mapv(|v| v >= high);

    for row in 0..h {
        for col in 0..w {
            let v = magnitude[[row, col]];
            if v >= high {
                result[[row, col]] = v;
            } else if v >= low && has_strong_neighbor(&strong, row, col, h, w) {
                result[[row, col]] = v;
            }
        }
    }

    result
}

fn has_strong_neighbor(strong: &Array2<bool>, row: usize, col: usize, h: usize, w: usize) -> bool {
    for dr in -1..=1_i32 {
        for dc in -1..=1_i32 {
            if dr == 0 && dc == 0 {
                continue;
            }
            let nr = row as i32 + dr;
            let nc = col as i32 + dc;
            if nr >= 0 && nr < h as i32 && nc >= 0 && nc < w as i32 && strong[[nr as usize, nc as usize]]
            {
                return true;
            }
        }
    }
    false
}

/// Block-average downsample by an integer factor.
///
/// Each output pixel is the mean of the corresponding factor x factor
/// block; blocks at the right/bottom edge are truncated to the pixels
/// that exist. `factor = 1` is a copy. Applied identically to the warm-up
/// samples and to every live frame so the statistics stay comparable.
pub fn block_mean(data: &Array2<f32>, factor: usize) -> Array2<f32> {
    assert!(factor > 0, "downsample factor must be nonzero");
    if factor == 1 {
        return data.clone();
    }

    let (h, w) = data.dim();
    let oh = h.div_ceil(factor);
    let ow = w.div_ceil(factor);
    let mut result = Array2::<f32>::zeros((oh, ow));

    for orow in 0..oh {
        for ocol in 0..ow {
            let r0 = orow * factor;
            let c0 = ocol * factor;
            let r1 = (r0 + factor).min(h);
            let c1 = (c0 + factor).min(w);

            let mut sum = 0.0f64;
            for row in r0..r1 {
                for col in c0..c1 {
                    sum += data[[row, col]] as f64;
                }
            }
            let count = ((r1 - r0) * (c1 - c0)) as f64;
            result[[orow, ocol]] = (sum / count) as f32;
        }
    }

    result
}

/// Background-subtracted depth delta: baseline mean minus current depth.
/// Positive values mean closer to the camera than the background.
pub fn depth_delta(baseline_mean: &Array2<f32>, depth: &Array2<f32>) -> Array2<f32> {
    baseline_mean - depth
}
