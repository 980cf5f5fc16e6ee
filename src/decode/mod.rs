// Sprite decoder: drives the frame/chunk loop and assembles a `Document`.
//
// Decoding is all-or-nothing. The byte source is owned by the decode call
// and dropped on every exit path.
//
// # Modules
//
// - `layer`:     Layer chunks and depth-based tree reconstruction
// - `cel`:       Raw, linked and zlib-compressed cel payloads
// - `tags`:      Frame-tags chunk and post-pass tag/frame linking
// - `slice`:     Slice chunk (first key, 9-slice, pivot)
// - `user_data`: User-data chunk and its acceptor

pub mod cel;
pub mod layer;
pub mod slice;
pub mod tags;
pub mod user_data;

use std::io::Read;

use crate::document::{Document, Frame, FrameId, SliceId};
use crate::error::DecodeError;
use crate::format::{ByteCursor, ChunkHeader, ChunkType, FileHeader, FrameHeader};

use layer::LayerHierarchyBuilder;
use user_data::UserDataTarget;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Default upper bound on a single cel's RGBA buffer: no limit.
pub const DEFAULT_MAX_CEL_BYTES: usize = usize::MAX;

/// Decoder configuration.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
    /// Materialize pixels for cels on invisible layers too.
    pub load_hidden_pixels: bool,
    /// Largest accepted `width * height * 4` for a cel whose pixels are
    /// materialized. Skipped cels are not checked.
    pub max_cel_bytes: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            load_hidden_pixels: false,
            max_cel_bytes: DEFAULT_MAX_CEL_BYTES,
        }
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Decode a sprite from `source` with default options.
pub fn decode<R: Read>(source: R) -> Result<Document, DecodeError> {
    decode_with_options(source, &DecodeOptions::default())
}

/// Decode a sprite from `source`.
pub fn decode_with_options<R: Read>(
    source: R,
    opts: &DecodeOptions,
) -> Result<Document, DecodeError> {
    let mut cursor = ByteCursor::new(source);
    DocumentBuilder::new(opts).run(&mut cursor)
}

// ---------------------------------------------------------------------------
// DocumentBuilder
// ---------------------------------------------------------------------------

struct DocumentBuilder<'o> {
    doc: Document,
    layers: LayerHierarchyBuilder,
    acceptor: Option<UserDataTarget>,
    opts: &'o DecodeOptions,
}

impl<'o> DocumentBuilder<'o> {
    fn new(opts: &'o DecodeOptions) -> Self {
        Self {
            doc: Document::default(),
            layers: LayerHierarchyBuilder::new(),
            acceptor: None,
            opts,
        }
    }

    fn run<R: Read>(mut self, c: &mut ByteCursor<R>) -> Result<Document, DecodeError> {
        let header = FileHeader::decode(c)?;
        log::debug!(
            "sprite {}x{}, {} frames",
            header.width,
            header.height,
            header.frame_count
        );
        self.doc.width = header.width;
        self.doc.height = header.height;
        self.doc.frames.reserve(header.frame_count as usize);

        for index in 0..header.frame_count as usize {
            self.decode_frame(c, index, header.frame_count)?;
        }

        tags::expand(&mut self.doc)?;
        Ok(self.doc)
    }

    fn decode_frame<R: Read>(
        &mut self,
        c: &mut ByteCursor<R>,
        index: usize,
        frame_count: u16,
    ) -> Result<(), DecodeError> {
        let offset = c.position();
        let header = FrameHeader::decode(c)?;
        log::debug!(
            "frame {index:3}/{frame_count:3} at {offset:#010X}: {} chunks, {} ms",
            header.chunk_count,
            header.duration
        );

        self.doc.frames.push(Frame {
            duration: header.duration,
            ..Frame::default()
        });
        let frame = FrameId(index);

        for _ in 0..header.chunk_count {
            self.decode_chunk(c, frame)?;
        }

        // Layers declared later leave this frame with trailing empty slots.
        let layer_count = self.doc.layers.len();
        let slots = &mut self.doc.frames[index].cels;
        if slots.len() < layer_count {
            slots.resize(layer_count, None);
        }

        Ok(())
    }

    fn decode_chunk<R: Read>(
        &mut self,
        c: &mut ByteCursor<R>,
        frame: FrameId,
    ) -> Result<(), DecodeError> {
        let chunk = ChunkHeader::decode(c)?;
        log::trace!(
            "  chunk {:#06X} size {} at {:#010X}",
            chunk.kind.to_u16(),
            chunk.size,
            c.position()
        );

        match chunk.kind {
            ChunkType::Layer => {
                let id = self.layers.decode_chunk(c, &mut self.doc.layers)?;
                self.acceptor = Some(UserDataTarget::Layer(id));
            }
            ChunkType::Cel => {
                let id = cel::decode_chunk(c, &chunk, &mut self.doc, frame, self.opts)?;
                self.acceptor = Some(UserDataTarget::Cel(id));
            }
            ChunkType::FrameTags => tags::decode_chunk(c, &mut self.doc.tags)?,
            ChunkType::UserData => {
                let data = user_data::decode_chunk(c)?;
                user_data::apply(&mut self.doc, self.acceptor, data);
            }
            ChunkType::Slice => {
                let slice = slice::decode_chunk(c)?;
                self.acceptor = Some(UserDataTarget::Slice(SliceId(self.doc.slices.len())));
                self.doc.slices.push(slice);
            }
            ChunkType::Unknown(tag) => {
                log::debug!("skipping unknown chunk {tag:#06X} ({} bytes)", chunk.size);
            }
            ChunkType::CelExtra | ChunkType::Palette => {}
        }

        chunk.finish(c)
    }
}
