/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Default number of valid warm-up frames for baseline statistics.
pub const DEFAULT_BASELINE_SAMPLE_COUNT: usize = 40;

/// Default block-averaging downsample factor applied to both channels.
pub const DEFAULT_DOWNSAMPLE_FACTOR: usize = 2;

/// Low gradient-magnitude threshold for the infrared edge detector.
/// Weak responses in [low, high) survive only next to a strong pixel.
pub const DEFAULT_EDGE_LOW_THRESH: f32 = 100.0;

/// High gradient-magnitude threshold for the infrared edge detector.
pub const DEFAULT_EDGE_HIGH_THRESH: f32 = 300.0;

/// Absolute floor below which a pixel is never flagged as an edge,
/// regardless of its per-pixel noise statistics.
pub const DEFAULT_MIN_EDGE_THRESH: f32 = 100.0;

/// Sigma multiplier for the adaptive edge gate.
pub const DEFAULT_EDGE_SIGMA_MULTIPLIER: f32 = 2.0;

/// Additive epsilon for the adaptive edge gate, so a zero-stddev pixel
/// still needs a nonzero response.
pub const DEFAULT_EDGE_EPSILON: f32 = 1.0;

/// Sigma multiplier for the foreground candidate test on depth delta.
pub const DEFAULT_DEPTH_SIGMA_MULTIPLIER: f32 = 2.0;

/// Maximum plausible hand height above the surface, in depth units (mm).
/// Larger deltas are near-camera noise spikes or invalid readings.
pub const DEFAULT_MAX_HAND_HEIGHT: f32 = 300.0;

/// Depth delta at or above which an absorbed pixel is classified Hand.
pub const DEFAULT_HAND_FINGER_DEPTH_THRESH: f32 = 50.0;

/// Depth delta above which an absorbed pixel is classified Finger.
pub const DEFAULT_FINGER_TIP_DEPTH_THRESH: f32 = 15.0;

/// Sigma multiplier for the Tip band: delta must exceed this multiple of
/// the per-pixel depth stddev to be classified Tip.
pub const DEFAULT_TIP_SIGMA_MULTIPLIER: f32 = 1.5;

/// Minimum blob size (pixels) for a region to be accepted as a hand.
pub const DEFAULT_MIN_SIZE_HAND: usize = 500;

/// Candidate-pixel count below which a frame is rejected before any
/// flood fill is attempted.
pub const DEFAULT_EARLY_REJECT_BLOB: usize = 100;

/// Minimum moment-derived area for an accepted tip contour.
pub const DEFAULT_MIN_TIP_AREA: f64 = 4.0;

/// Maximum moment-derived area for an accepted tip contour.
pub const DEFAULT_MAX_TIP_AREA: f64 = 400.0;

/// Maximum covariance eccentricity for an accepted tip contour.
pub const DEFAULT_MAX_TIP_ECCENTRICITY: f64 = 0.95;
