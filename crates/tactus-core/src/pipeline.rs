//! Per-frame orchestration of the touch-sensing pipeline.
//!
//! One synchronous pass per frame: preprocess -> gate/mask -> grow ->
//! locate. The baseline statistics and calibration are read-only for the
//! session; the grower context is the only cross-frame mutable state.

use ndarray::Array2;
use tracing::{debug, info};

use crate::baseline::{estimate_baseline_with_progress, BaselineStats};
use crate::calib::Calibration;
use crate::config::TouchConfig;
use crate::error::Result;
use crate::frame::{Frame, PixelClass, TipPoint};
use crate::grow::{grow_region, BlobStats, GrowerContext};
use crate::mask::{candidate_mask, edge_mask};
use crate::preprocess::{block_mean, depth_delta, edge_channel};
use crate::source::FrameSource;
use crate::tip::locate_tips;

/// Output of one per-frame pass.
#[derive(Clone, Debug)]
pub struct FrameResult {
    pub frame_index: usize,
    /// Classified label image at the downsampled resolution, for an
    /// external visualization or debugging layer.
    pub labels: Array2<PixelClass>,
    /// Fingertip points in output coordinates, possibly empty.
    pub tips: Vec<TipPoint>,
    /// The retained blob, if one qualified this frame.
    pub blob: Option<BlobStats>,
}

/// A warmed-up touch-sensing session.
pub struct TouchPipeline {
    config: TouchConfig,
    baseline: BaselineStats,
    calibration: Calibration,
    grower: GrowerContext,
}

impl TouchPipeline {
    /// Collect the baseline from the source, then return a session ready
    /// for per-frame processing.
    pub fn warm_up(
        source: &mut dyn FrameSource,
        config: TouchConfig,
        calibration: Calibration,
    ) -> Result<Self> {
        Self::warm_up_with_progress(source, config, calibration, |_| {})
    }

    /// Same as [`TouchPipeline::warm_up`], reporting each collected
    /// baseline sample.
    pub fn warm_up_with_progress(
        source: &mut dyn FrameSource,
        config: TouchConfig,
        calibration: Calibration,
        on_sample: impl Fn(usize),
    ) -> Result<Self> {
        let baseline =
            estimate_baseline_with_progress(source, &config.baseline, &config.edge, on_sample)?;
        let (h, w) = baseline.dim();
        info!(
            grid_h = h,
            grid_w = w,
            downsample = baseline.downsample_factor,
            uncalibrated = calibration.degraded(),
            "Session ready"
        );
        Ok(Self {
            config,
            baseline,
            calibration,
            grower: GrowerContext::default(),
        })
    }

    /// Re-collect the baseline on explicit external request. The grower
    /// context is reset: the old centroid hint refers to the old scene.
    pub fn rebuild_baseline(&mut self, source: &mut dyn FrameSource) -> Result<()> {
        info!("Rebuilding baseline");
        self.baseline = estimate_baseline_with_progress(
            source,
            &self.config.baseline,
            &self.config.edge,
            |_| {},
        )?;
        self.grower = GrowerContext::default();
        Ok(())
    }

    /// Run the full per-frame pass. Runs to completion before the caller
    /// pulls the next frame; nothing here suspends or runs concurrently
    /// across frames.
    pub fn process(&mut self, frame: &Frame) -> FrameResult {
        let factor = self.baseline.downsample_factor;

        let edge = block_mean(&edge_channel(&frame.infrared, &self.config.edge), factor);
        let depth = block_mean(&frame.depth, factor);
        let delta = depth_delta(&self.baseline.depth_mean, &depth);

        let edges = edge_mask(&edge, &self.baseline.edge_stddev, &self.config.edge);
        let candidates = candidate_mask(&delta, &self.baseline.depth_stddev, &self.config.candidate);

        let grown = grow_region(
            &candidates,
            &edges,
            &delta,
            &self.baseline.depth_stddev,
            &mut self.grower,
            &self.config.grow,
        );

        let tips = if grown.blob.is_some() {
            locate_tips(&grown.labels, factor, &self.calibration, &self.config.tip)
        } else {
            Vec::new()
        };

        debug!(
            frame = frame.metadata.frame_index,
            contact = grown.blob.is_some(),
            tips = tips.len(),
            "Frame processed"
        );

        FrameResult {
            frame_index: frame.metadata.frame_index,
            labels: grown.labels,
            tips,
            blob: grown.blob,
        }
    }

    pub fn config(&self) -> &TouchConfig {
        &self.config
    }

    pub fn baseline(&self) -> &BaselineStats {
        &self.baseline
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }
}
