//! Per-pixel background statistics from a warm-up window.
//!
//! The baseline models the static scene: for every (downsampled) pixel,
//! the mean and standard deviation of the infrared edge response and of
//! the raw depth, over a fixed number of valid warm-up frames.

use ndarray::Array2;
use tracing::{debug, info};

use crate::config::{BaselineConfig, EdgeConfig};
use crate::error::{Result, TactusError};
use crate::preprocess::{block_mean, edge_channel};
use crate::source::{Acquisition, FrameSource};

/// Per-pixel mean/stddev for the edge and depth channels, at the
/// downsampled resolution. Immutable once computed; rebuilt only on an
/// explicit external request.
#[derive(Clone, Debug)]
pub struct BaselineStats {
    pub edge_mean: Array2<f32>,
    pub edge_stddev: Array2<f32>,
    pub depth_mean: Array2<f32>,
    pub depth_stddev: Array2<f32>,
    /// Downsample factor the statistics were computed at.
    pub downsample_factor: usize,
}

impl BaselineStats {
    /// Dimensions of the statistic grids as (height, width).
    pub fn dim(&self) -> (usize, usize) {
        self.depth_mean.dim()
    }
}

/// Shifted-moment accumulator for one channel.
///
/// Accumulates sum = SUM(x - k) and sumsq = SUM((x - k)^2) in f64 so the
/// variance subtraction does not cancel catastrophically. The shift k is
/// the channel mean of the first valid sample.
struct ChannelAccumulator {
    shift: f64,
    sum: Array2<f64>,
    sumsq: Array2<f64>,
}

impl ChannelAccumulator {
    fn new(first: &Array2<f32>) -> Self {
        let n = first.len().max(1) as f64;
        let shift = first.iter().map(|&v| v as f64).sum::<f64>() / n;
        let dim = first.dim();
        let mut acc = Self {
            shift,
            sum: Array2::zeros(dim),
            sumsq: Array2::zeros(dim),
        };
        acc.push(first);
        acc
    }

    fn push(&mut self, sample: &Array2<f32>) {
        for ((s, sq), &x) in self
            .sum
            .iter_mut()
            .zip(self.sumsq.iter_mut())
            .zip(sample.iter())
        {
            let d = x as f64 - self.shift;
            *s += d;
            *sq += d * d;
        }
    }

    /// Finalize into (mean, stddev) grids. Uses the n-1 denominator;
    /// n = 1 yields zero stddev, and rounding-induced negative variance
    /// is clamped to zero.
    fn finish(self, n: usize) -> (Array2<f32>, Array2<f32>) {
        let nf = n as f64;
        let mean = self.sum.mapv(|s| (self.shift + s / nf) as f32);
        let stddev = if n > 1 {
            ndarray::Zip::from(&self.sumsq)
                .and(&self.sum)
                .map_collect(|&sq, &s| {
                    let var = (sq - s * s / nf).max(0.0) / (nf - 1.0);
                    var.sqrt() as f32
                })
        } else {
            Array2::zeros(self.sum.dim())
        };
        (mean, stddev)
    }
}

/// Collect baseline statistics from `config.sample_count` valid frames.
///
/// Dropped acquisitions are skipped and never count toward the sample
/// budget; the estimator keeps pulling until the budget is met. A source
/// that runs out first is an error, not a silently degraded baseline.
pub fn estimate_baseline(
    source: &mut dyn FrameSource,
    config: &BaselineConfig,
    edge_config: &EdgeConfig,
) -> Result<BaselineStats> {
    estimate_baseline_with_progress(source, config, edge_config, |_| {})
}

/// Same as [`estimate_baseline`], reporting each collected sample.
pub fn estimate_baseline_with_progress(
    source: &mut dyn FrameSource,
    config: &BaselineConfig,
    edge_config: &EdgeConfig,
    on_sample: impl Fn(usize),
) -> Result<BaselineStats> {
    let wanted = config.sample_count;
    let factor = config.downsample_factor;
    info!(samples = wanted, downsample = factor, "Collecting baseline");

    let mut edge_acc: Option<ChannelAccumulator> = None;
    let mut depth_acc: Option<ChannelAccumulator> = None;
    let mut collected = 0usize;

    while collected < wanted {
        let frame = match source.acquire()? {
            Acquisition::Pair(frame) => frame,
            Acquisition::Dropped => {
                debug!(collected, "Dropped frame during warm-up, retrying");
                continue;
            }
            Acquisition::Exhausted => {
                return Err(TactusError::SourceExhausted { collected, wanted });
            }
        };

        let edge = block_mean(&edge_channel(&frame.infrared, edge_config), factor);
        let depth = block_mean(&frame.depth, factor);

        match (&mut edge_acc, &mut depth_acc) {
            (Some(ea), Some(da)) => {
                ea.push(&edge);
                da.push(&depth);
            }
            _ => {
                edge_acc = Some(ChannelAccumulator::new(&edge));
                depth_acc = Some(ChannelAccumulator::new(&depth));
            }
        }

        collected += 1;
        on_sample(collected);
    }

    // wanted >= 1 is guaranteed by the loop having collected anything;
    // a zero sample budget is a configuration error.
    let edge_acc = edge_acc.ok_or(TactusError::SourceExhausted {
        collected: 0,
        wanted,
    })?;
    let depth_acc = depth_acc.ok_or(TactusError::SourceExhausted {
        collected: 0,
        wanted,
    })?;

    let (edge_mean, edge_stddev) = edge_acc.finish(collected);
    let (depth_mean, depth_stddev) = depth_acc.finish(collected);

    info!(samples = collected, "Baseline complete");

    Ok(BaselineStats {
        edge_mean,
        edge_stddev,
        depth_mean,
        depth_stddev,
        downsample_factor: factor,
    })
}
