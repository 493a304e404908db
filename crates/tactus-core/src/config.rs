use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_BASELINE_SAMPLE_COUNT, DEFAULT_DEPTH_SIGMA_MULTIPLIER, DEFAULT_DOWNSAMPLE_FACTOR,
    DEFAULT_EARLY_REJECT_BLOB, DEFAULT_EDGE_EPSILON, DEFAULT_EDGE_HIGH_THRESH,
    DEFAULT_EDGE_LOW_THRESH, DEFAULT_EDGE_SIGMA_MULTIPLIER, DEFAULT_FINGER_TIP_DEPTH_THRESH,
    DEFAULT_HAND_FINGER_DEPTH_THRESH, DEFAULT_MAX_HAND_HEIGHT, DEFAULT_MAX_TIP_AREA,
    DEFAULT_MAX_TIP_ECCENTRICITY, DEFAULT_MIN_EDGE_THRESH, DEFAULT_MIN_SIZE_HAND,
    DEFAULT_MIN_TIP_AREA, DEFAULT_TIP_SIGMA_MULTIPLIER,
};

/// Full configuration for a touch-sensing session.
///
/// Every threshold is deployment-tunable; defaults come from `consts`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TouchConfig {
    #[serde(default)]
    pub baseline: BaselineConfig,
    #[serde(default)]
    pub edge: EdgeConfig,
    #[serde(default)]
    pub candidate: CandidateConfig,
    #[serde(default)]
    pub grow: GrowConfig,
    #[serde(default)]
    pub tip: TipConfig,
}

/// Warm-up sampling for baseline statistics.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BaselineConfig {
    /// Number of valid warm-up frames; dropped frames do not count.
    #[serde(default = "default_sample_count")]
    pub sample_count: usize,
    /// Block-averaging factor applied to both channels.
    #[serde(default = "default_downsample_factor")]
    pub downsample_factor: usize,
}

/// Edge detector and adaptive edge gate.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EdgeConfig {
    /// Low gradient threshold for the infrared edge detector.
    #[serde(default = "default_edge_low")]
    pub low_thresh: f32,
    /// High gradient threshold for the infrared edge detector.
    #[serde(default = "default_edge_high")]
    pub high_thresh: f32,
    /// Absolute edge-response floor for the gate.
    #[serde(default = "default_min_edge_thresh")]
    pub min_edge_thresh: f32,
    /// Sigma multiplier for the per-pixel adaptive gate.
    #[serde(default = "default_edge_sigma_multiplier")]
    pub sigma_multiplier: f32,
    /// Additive epsilon in the adaptive gate.
    #[serde(default = "default_edge_epsilon")]
    pub epsilon: f32,
}

/// Foreground candidate test on the depth delta.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CandidateConfig {
    /// Sigma multiplier against the per-pixel depth stddev.
    #[serde(default = "default_depth_sigma_multiplier")]
    pub sigma_multiplier: f32,
    /// Absolute ceiling on the depth delta (mm); rejects near-camera noise.
    #[serde(default = "default_max_hand_height")]
    pub max_hand_height: f32,
}

/// Region growing and depth-band classification.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GrowConfig {
    /// Delta at or above which an absorbed pixel is Hand (mm).
    #[serde(default = "default_hand_thresh")]
    pub hand_finger_depth_thresh: f32,
    /// Delta above which an absorbed pixel is Finger (mm).
    #[serde(default = "default_finger_thresh")]
    pub finger_tip_depth_thresh: f32,
    /// Sigma multiplier for the Tip band floor.
    #[serde(default = "default_tip_sigma_multiplier")]
    pub tip_sigma_multiplier: f32,
    /// Minimum accepted blob size in pixels.
    #[serde(default = "default_min_size_hand")]
    pub min_size_hand: usize,
    /// Candidate count below which the frame is rejected outright.
    #[serde(default = "default_early_reject_blob")]
    pub early_reject_blob: usize,
}

/// Tip contour shape filtering.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TipConfig {
    /// Minimum moment-derived contour area.
    #[serde(default = "default_min_tip_area")]
    pub min_area: f64,
    /// Maximum moment-derived contour area.
    #[serde(default = "default_max_tip_area")]
    pub max_area: f64,
    /// Maximum covariance eccentricity.
    #[serde(default = "default_max_tip_eccentricity")]
    pub max_eccentricity: f64,
}

fn default_sample_count() -> usize {
    DEFAULT_BASELINE_SAMPLE_COUNT
}
fn default_downsample_factor() -> usize {
    DEFAULT_DOWNSAMPLE_FACTOR
}
fn default_edge_low() -> f32 {
    DEFAULT_EDGE_LOW_THRESH
}
fn default_edge_high() -> f32 {
    DEFAULT_EDGE_HIGH_THRESH
}
fn default_min_edge_thresh() -> f32 {
    DEFAULT_MIN_EDGE_THRESH
}
fn default_edge_sigma_multiplier() -> f32 {
    DEFAULT_EDGE_SIGMA_MULTIPLIER
}
fn default_edge_epsilon() -> f32 {
    DEFAULT_EDGE_EPSILON
}
fn default_depth_sigma_multiplier() -> f32 {
    DEFAULT_DEPTH_SIGMA_MULTIPLIER
}
fn default_max_hand_height() -> f32 {
    DEFAULT_MAX_HAND_HEIGHT
}
fn default_hand_thresh() -> f32 {
    DEFAULT_HAND_FINGER_DEPTH_THRESH
}
fn default_finger_thresh() -> f32 {
    DEFAULT_FINGER_TIP_DEPTH_THRESH
}
fn default_tip_sigma_multiplier() -> f32 {
    DEFAULT_TIP_SIGMA_MULTIPLIER
}
fn default_min_size_hand() -> usize {
    DEFAULT_MIN_SIZE_HAND
}
fn default_early_reject_blob() -> usize {
    DEFAULT_EARLY_REJECT_BLOB
}
fn default_min_tip_area() -> f64 {
    DEFAULT_MIN_TIP_AREA
}
fn default_max_tip_area() -> f64 {
    DEFAULT_MAX_TIP_AREA
}
fn default_max_tip_eccentricity() -> f64 {
    DEFAULT_MAX_TIP_ECCENTRICITY
}

impl Default for BaselineConfig {
    fn default() -> Self {
        Self {
            sample_count: DEFAULT_BASELINE_SAMPLE_COUNT,
            downsample_factor: DEFAULT_DOWNSAMPLE_FACTOR,
        }
    }
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            low_thresh: DEFAULT_EDGE_LOW_THRESH,
            high_thresh: DEFAULT_EDGE_HIGH_THRESH,
            min_edge_thresh: DEFAULT_MIN_EDGE_THRESH,
            sigma_multiplier: DEFAULT_EDGE_SIGMA_MULTIPLIER,
            epsilon: DEFAULT_EDGE_EPSILON,
        }
    }
}

impl Default for CandidateConfig {
    fn default() -> Self {
        Self {
            sigma_multiplier: DEFAULT_DEPTH_SIGMA_MULTIPLIER,
            max_hand_height: DEFAULT_MAX_HAND_HEIGHT,
        }
    }
}

impl Default for GrowConfig {
    fn default() -> Self {
        Self {
            hand_finger_depth_thresh: DEFAULT_HAND_FINGER_DEPTH_THRESH,
            finger_tip_depth_thresh: DEFAULT_FINGER_TIP_DEPTH_THRESH,
            tip_sigma_multiplier: DEFAULT_TIP_SIGMA_MULTIPLIER,
            min_size_hand: DEFAULT_MIN_SIZE_HAND,
            early_reject_blob: DEFAULT_EARLY_REJECT_BLOB,
        }
    }
}

impl Default for TipConfig {
    fn default() -> Self {
        Self {
            min_area: DEFAULT_MIN_TIP_AREA,
            max_area: DEFAULT_MAX_TIP_AREA,
            max_eccentricity: DEFAULT_MAX_TIP_ECCENTRICITY,
        }
    }
}
