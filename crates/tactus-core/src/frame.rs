use ndarray::Array2;

use crate::error::{Result, TactusError};

/// A temporally aligned depth + infrared frame pair.
///
/// Depth values are f32 millimetres (converted from the sensor's u16
/// counts); infrared values are f32 intensity in [0.0, 255.0]. Both
/// channels are row-major with shape = (height, width).
#[derive(Clone, Debug)]
pub struct Frame {
    pub depth: Array2<f32>,
    pub infrared: Array2<f32>,
    pub metadata: FrameMetadata,
}

impl Frame {
    /// Pair the two channels, rejecting mismatched grids.
    pub fn new(depth: Array2<f32>, infrared: Array2<f32>) -> Result<Self> {
        if depth.dim() != infrared.dim() {
            let (depth_h, depth_w) = depth.dim();
            let (ir_h, ir_w) = infrared.dim();
            return Err(TactusError::DimensionMismatch {
                depth_h,
                depth_w,
                ir_h,
                ir_w,
            });
        }
        Ok(Self {
            depth,
            infrared,
            metadata: FrameMetadata::default(),
        })
    }

    pub fn width(&self) -> usize {
        self.depth.ncols()
    }

    pub fn height(&self) -> usize {
        self.depth.nrows()
    }
}

#[derive(Clone, Debug, Default)]
pub struct FrameMetadata {
    pub frame_index: usize,
    pub timestamp_us: Option<u64>,
}

/// Classification band for one pixel of a grown blob.
///
/// Bands are ordered by how far the pixel protrudes above the background:
/// Hand is the deepest band, Tip the finest. A pixel absorbed by the
/// grower but below every band threshold stays Background.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum PixelClass {
    #[default]
    Background = 0,
    Hand = 1,
    Finger = 2,
    Tip = 3,
}

/// A fingertip location in output (calibrated) coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TipPoint {
    pub x: f64,
    pub y: f64,
}
