// Sprite file header and per-frame header decoding.
//
// All multi-byte fields are little-endian.

use std::io::Read;

use bitflags::bitflags;

use super::cursor::ByteCursor;
use crate::error::DecodeError;

// ---------------------------------------------------------------------------
// Magic numbers
// ---------------------------------------------------------------------------

pub const FILE_MAGIC: u16 = 0xA5E0;
pub const FRAME_MAGIC: u16 = 0xF1FA;

/// The only supported color depth (RGBA, 8 bits per channel).
pub const SUPPORTED_COLOR_DEPTH: u16 = 32;

/// Fixed header size in bytes, including the 4-byte file size field.
pub const FILE_HEADER_LEN: usize = 128;
/// Fixed frame header size in bytes, including the 4-byte frame size field.
pub const FRAME_HEADER_LEN: usize = 16;

// flags (4) + deprecated speed (2) + reserved (108)
const FILE_HEADER_RESERVED: u64 = 114;
const FRAME_HEADER_RESERVED: u64 = 6;

// ---------------------------------------------------------------------------
// Flag words found inside chunks
// ---------------------------------------------------------------------------

bitflags! {
    /// Layer chunk flags. Only visibility is interpreted.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LayerFlags: u16 {
        const VISIBLE = 1 << 0;
        const _ = !0;
    }
}

bitflags! {
    /// Which optional fields follow in a user-data chunk.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct UserDataFlags: u32 {
        const TEXT = 1 << 0;
        const COLOR = 1 << 1;
        const _ = !0;
    }
}

bitflags! {
    /// Which optional fields follow in a slice key.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SliceFlags: u32 {
        const NINE_SLICE = 1 << 0;
        const PIVOT = 1 << 1;
        const _ = !0;
    }
}

// ---------------------------------------------------------------------------
// File header
// ---------------------------------------------------------------------------

/// The fields of the 128-byte file header that the decoder uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    pub frame_count: u16,
    pub width: u16,
    pub height: u16,
    pub color_depth: u16,
}

impl FileHeader {
    /// Decode and validate the file header.
    ///
    /// The declared file size is read and ignored. Color depth is checked
    /// before anything past the header is touched.
    pub fn decode<R: Read>(c: &mut ByteCursor<R>) -> Result<Self, DecodeError> {
        c.skip(4)?; // file size

        let magic = c.read_u16()?;
        if magic != FILE_MAGIC {
            return Err(DecodeError::invalid(format!(
                "bad file magic: expected {FILE_MAGIC:#06X}, got {magic:#06X}"
            )));
        }

        let frame_count = c.read_u16()?;
        let width = c.read_u16()?;
        let height = c.read_u16()?;
        let color_depth = c.read_u16()?;
        if color_depth != SUPPORTED_COLOR_DEPTH {
            return Err(DecodeError::UnsupportedColorDepth(color_depth));
        }

        c.skip(FILE_HEADER_RESERVED)?;

        Ok(Self {
            frame_count,
            width,
            height,
            color_depth,
        })
    }
}

// ---------------------------------------------------------------------------
// Frame header
// ---------------------------------------------------------------------------

/// Parsed 16-byte frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub chunk_count: u16,
    /// Frame duration in milliseconds.
    pub duration: u16,
}

impl FrameHeader {
    pub fn decode<R: Read>(c: &mut ByteCursor<R>) -> Result<Self, DecodeError> {
        c.skip(4)?; // frame size

        let magic = c.read_u16()?;
        if magic != FRAME_MAGIC {
            return Err(DecodeError::invalid(format!(
                "bad frame magic at offset {}: expected {FRAME_MAGIC:#06X}, got {magic:#06X}",
                c.position() - 2
            )));
        }

        let chunk_count = c.read_u16()?;
        let duration = c.read_u16()?;
        c.skip(FRAME_HEADER_RESERVED)?;

        Ok(Self {
            chunk_count,
            duration,
        })
    }
}
