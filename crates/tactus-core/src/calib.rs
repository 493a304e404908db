//! Session calibration: the camera-to-output homography and the capture
//! resolution it was computed at.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, TactusError};

/// Immutable per-session calibration record.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Calibration {
    /// 3x3 projective matrix mapping camera pixel coordinates to output
    /// coordinates.
    pub homography: Matrix3<f64>,
    /// Camera capture width when the homography was computed.
    pub capture_width: u32,
    /// Camera capture height when the homography was computed.
    pub capture_height: u32,
    /// True when this record is the identity fallback after a failed
    /// load; points pass through unmapped.
    #[serde(skip)]
    degraded: bool,
}

impl Calibration {
    pub fn new(homography: Matrix3<f64>, capture_width: u32, capture_height: u32) -> Self {
        Self {
            homography,
            capture_width,
            capture_height,
            degraded: false,
        }
    }

    /// Identity mapping at the given capture resolution.
    pub fn identity(capture_width: u32, capture_height: u32) -> Self {
        Self::new(Matrix3::identity(), capture_width, capture_height)
    }

    /// Load a calibration record from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let calib: Calibration = serde_json::from_reader(file)
            .map_err(|e| TactusError::InvalidCalibration(e.to_string()))?;
        Ok(calib)
    }

    /// Load a calibration record, degrading to the identity homography at
    /// the supplied default resolution when the record is missing or
    /// corrupt. Load failure is a warning, never an error: processing
    /// continues in uncalibrated mode.
    pub fn load_or_default(path: &Path, default_dims: (u32, u32)) -> Self {
        match Self::load(path) {
            Ok(calib) => calib,
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Calibration unavailable, running uncalibrated"
                );
                let (w, h) = default_dims;
                let mut calib = Self::identity(w, h);
                calib.degraded = true;
                calib
            }
        }
    }

    /// Persist this record as JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)
            .map_err(|e| TactusError::InvalidCalibration(e.to_string()))?;
        Ok(())
    }

    pub fn degraded(&self) -> bool {
        self.degraded
    }

    /// Map a camera-pixel point to output coordinates as H * [x, y, 1].
    ///
    /// No perspective divide is applied: the calibration routine this
    /// session consumes produces matrices that are used affinely, and
    /// the record is taken at face value.
    pub fn project(&self, x: f64, y: f64) -> (f64, f64) {
        let p = self.homography * Vector3::new(x, y, 1.0);
        (p.x, p.y)
    }
}
