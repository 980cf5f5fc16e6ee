// Cel chunk decoding.
//
// Three payload variants:
//   - Raw:        width, height, then width*height*4 RGBA bytes
//   - Linked:     index of an earlier frame whose cel (same layer) is reused
//   - Compressed: width, height, then a zlib stream inflating to width*height*4
//
// Cels on invisible layers skip their pixel payload entirely unless
// `DecodeOptions::load_hidden_pixels` is set. The cel size limit only
// applies to cels whose pixels are materialized.

use std::io::Read;

use flate2::read::ZlibDecoder;

use super::DecodeOptions;
use crate::document::{
    Cel, CelId, CelKind, Document, FrameId, LayerId, PixelBuffer, Point, Size, UserData,
};
use crate::error::DecodeError;
use crate::format::{ByteCursor, ChunkHeader};

pub const CEL_RAW: u16 = 0;
pub const CEL_LINKED: u16 = 1;
pub const CEL_COMPRESSED: u16 = 2;

/// Upper bound on deflate's expansion ratio.
const MAX_DEFLATE_RATIO: usize = 1032;

/// Fixed cel fields that precede the type-specific payload.
#[derive(Debug, Clone, Copy)]
struct CelPrefix {
    layer: usize,
    position: Point,
    opacity: u8,
    cel_type: u16,
}

impl CelPrefix {
    fn decode<R: Read>(c: &mut ByteCursor<R>) -> Result<Self, DecodeError> {
        let layer = c.read_u16()? as usize;
        let x = c.read_i16()?;
        let y = c.read_i16()?;
        let opacity = c.read_u8()?;
        let cel_type = c.read_u16()?;
        c.skip(7)?;
        Ok(Self {
            layer,
            position: Point {
                x: i32::from(x),
                y: i32::from(y),
            },
            opacity,
            cel_type,
        })
    }
}

/// Decode one cel chunk into `doc`, storing it in `frame`'s slot for its layer.
pub fn decode_chunk<R: Read>(
    c: &mut ByteCursor<R>,
    chunk: &ChunkHeader,
    doc: &mut Document,
    frame: FrameId,
    opts: &DecodeOptions,
) -> Result<CelId, DecodeError> {
    let prefix = CelPrefix::decode(c)?;

    let slots = &mut doc.frames[frame.0].cels;
    if slots.len() <= prefix.layer {
        slots.resize(prefix.layer + 1, None);
    }

    let layer = doc.layers.get(prefix.layer).ok_or_else(|| {
        DecodeError::invalid(format!(
            "cel in frame {} targets undeclared layer {} ({} layers so far)",
            frame.0,
            prefix.layer,
            doc.layers.len()
        ))
    })?;
    let materialize = layer.visible || opts.load_hidden_pixels;

    let (kind, size, pixels) = match prefix.cel_type {
        CEL_RAW => {
            let size = read_size(c)?;
            let stored = chunk.remaining(c)?;
            if materialize {
                let expected = checked_rgba_len(size, opts)?;
                if stored != expected as u64 {
                    return Err(DecodeError::invalid(format!(
                        "raw cel {}x{} carries {stored} bytes, expected {expected}",
                        size.width, size.height
                    )));
                }
                let bytes = c.read_bytes(expected)?;
                (CelKind::Raw, size, Some(PixelBuffer::new(bytes)))
            } else {
                c.skip(stored)?;
                (CelKind::Raw, size, None)
            }
        }

        CEL_LINKED => {
            let linked = c.read_u16()? as usize;
            let target = (linked < frame.0)
                .then(|| doc.frames[linked].cels.get(prefix.layer).copied().flatten())
                .flatten()
                .ok_or(DecodeError::BrokenCelLink {
                    frame: frame.0,
                    layer: prefix.layer,
                    linked_frame: linked,
                })?;
            let target = &doc.cels[target.0];
            (
                CelKind::Linked {
                    frame: FrameId(linked),
                },
                target.size,
                target.pixels.clone(),
            )
        }

        CEL_COMPRESSED => {
            let size = read_size(c)?;
            let stored = chunk.remaining(c)?;
            if materialize {
                let expected = checked_rgba_len(size, opts)?;
                let compressed = c.read_bytes(stored as usize)?;
                let bytes = inflate(&compressed, expected)?;
                (CelKind::Compressed, size, Some(PixelBuffer::new(bytes)))
            } else {
                c.skip(stored)?;
                (CelKind::Compressed, size, None)
            }
        }

        other => return Err(DecodeError::UnsupportedCelType(other)),
    };

    let id = CelId(doc.cels.len());
    doc.cels.push(Cel {
        frame,
        layer: LayerId(prefix.layer),
        kind,
        position: prefix.position,
        size,
        opacity: prefix.opacity,
        pixels,
        user_data: UserData::default(),
    });
    doc.frames[frame.0].cels[prefix.layer] = Some(id);

    Ok(id)
}

fn read_size<R: Read>(c: &mut ByteCursor<R>) -> Result<Size, DecodeError> {
    let width = u32::from(c.read_u16()?);
    let height = u32::from(c.read_u16()?);
    Ok(Size { width, height })
}

fn checked_rgba_len(size: Size, opts: &DecodeOptions) -> Result<usize, DecodeError> {
    match size.rgba_len() {
        Some(len) if len <= opts.max_cel_bytes => Ok(len),
        _ => Err(DecodeError::invalid(format!(
            "cel {}x{} exceeds the {}-byte cel limit",
            size.width, size.height, opts.max_cel_bytes
        ))),
    }
}

/// Inflate a zlib stream that must produce exactly `expected` bytes.
pub fn inflate(compressed: &[u8], expected: usize) -> Result<Vec<u8>, DecodeError> {
    // A declared size the stream cannot possibly reach must not be reserved up front.
    let reachable = compressed.len().saturating_mul(MAX_DEFLATE_RATIO);
    let mut out = Vec::with_capacity(expected.min(reachable));
    ZlibDecoder::new(compressed)
        .take(expected as u64 + 1)
        .read_to_end(&mut out)
        .map_err(|e| DecodeError::DecompressionError(e.to_string()))?;
    if out.len() != expected {
        return Err(DecodeError::DecompressionError(format!(
            "inflated {} bytes, expected {expected}",
            out.len()
        )));
    }
    Ok(out)
}
