use thiserror::Error;

#[derive(Error, Debug)]
pub enum TactusError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid recording: {0}")]
    InvalidRecording(String),

    #[error("Frame index {index} out of range (total: {total})")]
    FrameIndexOutOfRange { index: usize, total: usize },

    #[error("Channel dimensions differ: depth {depth_h}x{depth_w}, infrared {ir_h}x{ir_w}")]
    DimensionMismatch {
        depth_h: usize,
        depth_w: usize,
        ir_h: usize,
        ir_w: usize,
    },

    #[error("Frame source exhausted after {collected} of {wanted} baseline samples")]
    SourceExhausted { collected: usize, wanted: usize },

    #[error("Invalid calibration record: {0}")]
    InvalidCalibration(String),

    #[error("Pipeline error: {0}")]
    Pipeline(String),
}

pub type Result<T> = std::result::Result<T, TactusError>;
