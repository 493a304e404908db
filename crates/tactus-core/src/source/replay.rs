use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};
use memmap2::Mmap;
use ndarray::Array2;

use crate::error::{Result, TactusError};
use crate::frame::{Frame, FrameMetadata};

use super::{Acquisition, FrameSource};

pub const RECORDING_HEADER_SIZE: usize = 28;
pub const RECORDING_MAGIC: &[u8; 12] = b"TACTUSRECORD";
pub const RECORDING_VERSION: u32 = 1;

/// Touch-sample recording header (28 bytes).
///
/// Frame payload layout: depth plane as u16 little-endian millimetres,
/// then infrared plane as u8 intensity, both row-major. An optional
/// trailer of one u64 microsecond timestamp per frame may follow the
/// frame data.
#[derive(Clone, Debug)]
pub struct RecordingHeader {
    pub version: u32,
    pub width: u32,
    pub height: u32,
    pub frame_count: u32,
}

impl RecordingHeader {
    /// Total bytes per frame: 2 bytes depth + 1 byte infrared per pixel.
    pub fn frame_byte_size(&self) -> usize {
        let pixels = (self.width as usize)
            .checked_mul(self.height as usize)
            .expect("Image dimensions too large");
        pixels.checked_mul(3).expect("Frame size calculation overflow")
    }
}

/// Memory-mapped reader over a recorded touch sample, and the replay
/// implementation of [`FrameSource`].
pub struct ReplaySource {
    mmap: Mmap,
    pub header: RecordingHeader,
    cursor: usize,
}

impl ReplaySource {
    /// Open a recording and parse its header.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };

        if mmap.len() < RECORDING_HEADER_SIZE {
            return Err(TactusError::InvalidRecording(
                "File too small for recording header".into(),
            ));
        }

        if &mmap[0..12] != RECORDING_MAGIC {
            return Err(TactusError::InvalidRecording(
                "Missing TACTUSRECORD magic".into(),
            ));
        }

        let header = parse_header(&mmap[..RECORDING_HEADER_SIZE])?;

        let expected_data_size =
            RECORDING_HEADER_SIZE + header.frame_byte_size() * header.frame_count as usize;
        if mmap.len() < expected_data_size {
            return Err(TactusError::InvalidRecording(format!(
                "File truncated: expected at least {} bytes, got {}",
                expected_data_size,
                mmap.len()
            )));
        }

        Ok(Self {
            mmap,
            header,
            cursor: 0,
        })
    }

    pub fn frame_count(&self) -> usize {
        self.header.frame_count as usize
    }

    /// Get the raw bytes for a single frame (zero-copy from mmap).
    pub fn frame_raw(&self, index: usize) -> Result<&[u8]> {
        let count = self.frame_count();
        if index >= count {
            return Err(TactusError::FrameIndexOutOfRange {
                index,
                total: count,
            });
        }
        let offset = RECORDING_HEADER_SIZE + index * self.header.frame_byte_size();
        let end = offset + self.header.frame_byte_size();
        Ok(&self.mmap[offset..end])
    }

    /// Decode a single frame pair at the given index.
    pub fn read_frame(&self, index: usize) -> Result<Frame> {
        let raw = self.frame_raw(index)?;
        let h = self.header.height as usize;
        let w = self.header.width as usize;
        let pixels = h * w;

        let mut depth = Array2::<f32>::zeros((h, w));
        let mut infrared = Array2::<f32>::zeros((h, w));

        for row in 0..h {
            for col in 0..w {
                let i = row * w + col;
                let d = u16::from_le_bytes([raw[i * 2], raw[i * 2 + 1]]);
                depth[[row, col]] = d as f32;
                infrared[[row, col]] = raw[pixels * 2 + i] as f32;
            }
        }

        let mut frame = Frame::new(depth, infrared)?;
        frame.metadata = FrameMetadata {
            frame_index: index,
            timestamp_us: self.read_timestamp(index),
        };
        Ok(frame)
    }

    /// Read per-frame timestamp from the optional trailer.
    fn read_timestamp(&self, index: usize) -> Option<u64> {
        let trailer_offset =
            RECORDING_HEADER_SIZE + self.header.frame_byte_size() * self.frame_count();
        let ts_offset = trailer_offset + index * 8;
        if ts_offset + 8 <= self.mmap.len() {
            let bytes = &self.mmap[ts_offset..ts_offset + 8];
            Some(u64::from_le_bytes(bytes.try_into().ok()?))
        } else {
            None
        }
    }

    /// Iterator over all frames in recorded order.
    pub fn frames(&self) -> impl Iterator<Item = Result<Frame>> + '_ {
        (0..self.frame_count()).map(move |i| self.read_frame(i))
    }
}

impl FrameSource for ReplaySource {
    fn acquire(&mut self) -> Result<Acquisition> {
        if self.cursor >= self.frame_count() {
            return Ok(Acquisition::Exhausted);
        }
        let frame = self.read_frame(self.cursor)?;
        self.cursor += 1;
        Ok(Acquisition::Pair(frame))
    }

    fn dimensions(&self) -> (usize, usize) {
        (self.header.height as usize, self.header.width as usize)
    }
}

fn parse_header(buf: &[u8]) -> Result<RecordingHeader> {
    let mut cursor = std::io::Cursor::new(&buf[12..]); // skip magic

    let version = cursor.read_u32::<LittleEndian>()?;
    let width = cursor.read_u32::<LittleEndian>()?;
    let height = cursor.read_u32::<LittleEndian>()?;
    let frame_count = cursor.read_u32::<LittleEndian>()?;

    if version != RECORDING_VERSION {
        return Err(TactusError::InvalidRecording(format!(
            "Unsupported recording version {version}"
        )));
    }
    if width == 0 || height == 0 {
        return Err(TactusError::InvalidRecording(format!(
            "Invalid dimensions {width}x{height}"
        )));
    }

    Ok(RecordingHeader {
        version,
        width,
        height,
        frame_count,
    })
}

/// Writes a touch-sample recording at the raw byte level.
pub struct RecordingWriter {
    writer: BufWriter<File>,
    header: RecordingHeader,
    frames_written: u32,
}

impl RecordingWriter {
    /// Create a new recording and write the header.
    pub fn create(path: &Path, header: &RecordingHeader) -> Result<Self> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        write_header(&mut writer, header)?;
        Ok(Self {
            writer,
            header: header.clone(),
            frames_written: 0,
        })
    }

    /// Encode and append one frame pair. Depth is clamped to the u16
    /// range; infrared to u8.
    pub fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        let (h, w) = frame.depth.dim();
        if (h, w) != (self.header.height as usize, self.header.width as usize) {
            return Err(TactusError::InvalidRecording(format!(
                "Frame is {h}x{w}, recording is {}x{}",
                self.header.height, self.header.width
            )));
        }

        for &d in frame.depth.iter() {
            let v = d.clamp(0.0, u16::MAX as f32) as u16;
            self.writer.write_all(&v.to_le_bytes())?;
        }
        for &v in frame.infrared.iter() {
            self.writer.write_all(&[v.clamp(0.0, 255.0) as u8])?;
        }
        self.frames_written += 1;
        Ok(())
    }

    /// Write the optional timestamp trailer (one u64 per frame, little-endian).
    pub fn write_timestamps(&mut self, timestamps: &[u64]) -> Result<()> {
        for &ts in timestamps {
            self.writer.write_all(&ts.to_le_bytes())?;
        }
        Ok(())
    }

    /// Flush and finalize the file. Fails when fewer or more frames were
    /// written than the header promised.
    pub fn finalize(mut self) -> Result<()> {
        if self.frames_written != self.header.frame_count {
            return Err(TactusError::InvalidRecording(format!(
                "Header promises {} frames, {} written",
                self.header.frame_count, self.frames_written
            )));
        }
        self.writer.flush()?;
        Ok(())
    }
}

fn write_header(w: &mut impl Write, header: &RecordingHeader) -> Result<()> {
    w.write_all(RECORDING_MAGIC)?;
    w.write_all(&header.version.to_le_bytes())?;
    w.write_all(&header.width.to_le_bytes())?;
    w.write_all(&header.height.to_le_bytes())?;
    w.write_all(&header.frame_count.to_le_bytes())?;
    Ok(())
}
