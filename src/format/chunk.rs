// Chunk framing.
//
// Every chunk starts with a 4-byte size (which counts the 6-byte header
// itself) and a 2-byte type tag. The payload that follows is exactly
// `size - 6` bytes. Decoders are handed the cursor positioned at the
// payload; once they return, `ChunkHeader::finish` skips whatever part of
// the payload they did not consume and rejects decoders that overran it.

use std::io::Read;

use super::cursor::ByteCursor;
use crate::error::DecodeError;

/// Size of the chunk header (size + type).
pub const CHUNK_HEADER_LEN: u32 = 6;

/// Chunk type tags recognized by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChunkType {
    Layer,
    Cel,
    CelExtra,
    FrameTags,
    Palette,
    UserData,
    Slice,
    /// Anything else; skipped.
    Unknown(u16),
}

impl ChunkType {
    pub const LAYER: u16 = 0x2004;
    pub const CEL: u16 = 0x2005;
    pub const CEL_EXTRA: u16 = 0x2006;
    pub const FRAME_TAGS: u16 = 0x2018;
    pub const PALETTE: u16 = 0x2019;
    pub const USER_DATA: u16 = 0x2020;
    pub const SLICE: u16 = 0x2022;

    pub fn from_u16(tag: u16) -> Self {
        match tag {
            Self::LAYER => Self::Layer,
            Self::CEL => Self::Cel,
            Self::CEL_EXTRA => Self::CelExtra,
            Self::FRAME_TAGS => Self::FrameTags,
            Self::PALETTE => Self::Palette,
            Self::USER_DATA => Self::UserData,
            Self::SLICE => Self::Slice,
            other => Self::Unknown(other),
        }
    }

    pub fn to_u16(self) -> u16 {
        match self {
            Self::Layer => Self::LAYER,
            Self::Cel => Self::CEL,
            Self::CelExtra => Self::CEL_EXTRA,
            Self::FrameTags => Self::FRAME_TAGS,
            Self::Palette => Self::PALETTE,
            Self::UserData => Self::USER_DATA,
            Self::Slice => Self::SLICE,
            Self::Unknown(tag) => tag,
        }
    }
}

/// A decoded chunk header plus the stream offset where its payload begins.
#[derive(Debug, Clone, Copy)]
pub struct ChunkHeader {
    /// Total chunk size, header included.
    pub size: u32,
    pub kind: ChunkType,
    payload_start: u64,
}

impl ChunkHeader {
    pub fn decode<R: Read>(c: &mut ByteCursor<R>) -> Result<Self, DecodeError> {
        let size = c.read_u32()?;
        let tag = c.read_u16()?;
        if size < CHUNK_HEADER_LEN {
            return Err(DecodeError::invalid(format!(
                "chunk {tag:#06X} at offset {} declares size {size}, smaller than its header",
                c.position() - CHUNK_HEADER_LEN as u64
            )));
        }
        Ok(Self {
            size,
            kind: ChunkType::from_u16(tag),
            payload_start: c.position(),
        })
    }

    /// Declared payload length (`size - 6`).
    #[inline]
    pub fn payload_len(&self) -> u64 {
        u64::from(self.size - CHUNK_HEADER_LEN)
    }

    /// Payload bytes not yet consumed at the cursor's current position.
    pub fn remaining<R: Read>(&self, c: &ByteCursor<R>) -> Result<u64, DecodeError> {
        let consumed = c.position() - self.payload_start;
        self.payload_len().checked_sub(consumed).ok_or_else(|| {
            DecodeError::invalid(format!(
                "chunk {:#06X} read {consumed} bytes past a {}-byte payload",
                self.kind.to_u16(),
                self.payload_len()
            ))
        })
    }

    /// Skip the unread tail of the payload so the cursor sits on the next chunk.
    pub fn finish<R: Read>(&self, c: &mut ByteCursor<R>) -> Result<(), DecodeError> {
        let rest = self.remaining(c)?;
        if rest > 0 {
            c.skip(rest)?;
        }
        Ok(())
    }
}
