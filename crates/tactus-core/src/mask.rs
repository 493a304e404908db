//! Binary gating of the preprocessed channels.
//!
//! Both masks are transient, recomputed every frame. The edge mask is a
//! growth barrier for the region grower; the candidate mask is the set of
//! pixels eligible for absorption.

use ndarray::{Array2, Zip};

use crate::config::{CandidateConfig, EdgeConfig};

/// Adaptive edge gate.
///
/// A pixel is an edge iff its response clears the absolute floor AND the
/// per-pixel statistical threshold `sigma_multiplier * stddev + epsilon`.
/// Background texture produces a stable per-pixel noise floor; only
/// deviations beyond it are structural boundaries.
pub fn edge_mask(
    edge: &Array2<f32>,
    edge_stddev: &Array2<f32>,
    config: &EdgeConfig,
) -> Array2<bool> {
    Zip::from(edge)
        .and(edge_stddev)
        .map_collect(|&v, &sd| {
            v >= config.min_edge_thresh && v >= config.sigma_multiplier * sd + config.epsilon
        })
}

/// Foreground candidate gate on the background-subtracted depth delta.
///
/// A pixel is a candidate iff it protrudes above the per-pixel depth
/// noise and stays under the absolute height ceiling (too-close readings
/// are sensor noise, not hands).
pub fn candidate_mask(
    delta: &Array2<f32>,
    depth_stddev: &Array2<f32>,
    config: &CandidateConfig,
) -> Array2<bool> {
    Zip::from(delta)
        .and(depth_stddev)
        .map_collect(|&d, &sd| d >= config.sigma_multiplier * sd && d < config.max_hand_height)
}

/// Number of set pixels in a mask.
pub fn candidate_count(mask: &Array2<bool>) -> usize {
    mask.iter().filter(|&&v| v).count()
}
