#![allow(dead_code)]

use ndarray::Array2;

use tactus_core::error::Result;
use tactus_core::frame::Frame;
use tactus_core::source::replay::{RECORDING_MAGIC, RECORDING_VERSION};
use tactus_core::source::{Acquisition, FrameSource};

/// Build a recording header as raw bytes.
pub fn build_recording_header(width: u32, height: u32, frame_count: u32) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(RECORDING_MAGIC);
    buf.extend_from_slice(&RECORDING_VERSION.to_le_bytes());
    buf.extend_from_slice(&width.to_le_bytes());
    buf.extend_from_slice(&height.to_le_bytes());
    buf.extend_from_slice(&frame_count.to_le_bytes());
    buf
}

/// Build a complete recording: header plus per-frame depth (u16 LE) and
/// infrared (u8) planes.
pub fn build_recording(width: u32, height: u32, frames: &[(Vec<u16>, Vec<u8>)]) -> Vec<u8> {
    let mut buf = build_recording_header(width, height, frames.len() as u32);
    for (depth, infrared) in frames {
        assert_eq!(depth.len(), (width * height) as usize);
        assert_eq!(infrared.len(), (width * height) as usize);
        for &d in depth {
            buf.extend_from_slice(&d.to_le_bytes());
        }
        buf.extend_from_slice(infrared);
    }
    buf
}

/// Frame with constant depth and infrared values.
pub fn flat_frame(h: usize, w: usize, depth: f32, infrared: f32) -> Frame {
    Frame::new(
        Array2::from_elem((h, w), depth),
        Array2::from_elem((h, w), infrared),
    )
    .unwrap()
}

/// Stamp a filled circle of constant depth into a frame's depth channel.
pub fn stamp_circle(frame: &mut Frame, center: (usize, usize), radius: usize, depth: f32) {
    let (h, w) = frame.depth.dim();
    let r2 = (radius * radius) as i64;
    for row in 0..h {
        for col in 0..w {
            let dr = row as i64 - center.0 as i64;
            let dc = col as i64 - center.1 as i64;
            if dr * dr + dc * dc <= r2 {
                frame.depth[[row, col]] = depth;
            }
        }
    }
}

/// Binary mask of a filled circle.
pub fn circle_mask(h: usize, w: usize, center: (usize, usize), radius: usize) -> Array2<bool> {
    let r2 = (radius * radius) as i64;
    Array2::from_shape_fn((h, w), |(row, col)| {
        let dr = row as i64 - center.0 as i64;
        let dc = col as i64 - center.1 as i64;
        dr * dr + dc * dc <= r2
    })
}

/// Scriptable in-memory frame source: `None` slots replay as transient
/// drops, the end of the list as exhaustion.
pub struct VecSource {
    frames: Vec<Option<Frame>>,
    cursor: usize,
    dims: (usize, usize),
}

impl VecSource {
    pub fn new(dims: (usize, usize), frames: Vec<Option<Frame>>) -> Self {
        Self {
            frames,
            cursor: 0,
            dims,
        }
    }

    pub fn acquired(&self) -> usize {
        self.cursor
    }
}

impl FrameSource for VecSource {
    fn acquire(&mut self) -> Result<Acquisition> {
        if self.cursor >= self.frames.len() {
            return Ok(Acquisition::Exhausted);
        }
        let slot = self.frames[self.cursor].take();
        self.cursor += 1;
        Ok(match slot {
            Some(frame) => Acquisition::Pair(frame),
            None => Acquisition::Dropped,
        })
    }

    fn dimensions(&self) -> (usize, usize) {
        self.dims
    }
}
