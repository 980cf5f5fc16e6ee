// Frame-tags chunk decoding and tag expansion.
//
// Tags are staged as they are read and linked to frames only after every
// frame has been decoded, because a tag may cover frames that come later
// in the stream.

use std::io::Read;

use crate::document::{AnimationDirection, Color, Document, FrameId, Tag, TagId, UserData};
use crate::error::DecodeError;
use crate::format::ByteCursor;

/// Decode a frame-tags chunk, appending one unlinked `Tag` per entry.
pub fn decode_chunk<R: Read>(
    c: &mut ByteCursor<R>,
    tags: &mut Vec<Tag>,
) -> Result<(), DecodeError> {
    let count = c.read_u16()?;
    c.skip(8)?;

    tags.reserve(count as usize);
    for _ in 0..count {
        let from = c.read_u16()?;
        let to = c.read_u16()?;
        let direction = AnimationDirection::from_u16(c.read_u16()?);
        c.skip(7)?;
        let color = Color::from_packed(c.read_u32()?);
        let name = c.read_prefixed_string()?;

        log::trace!("tag {name:?} frames {from}..={to} {direction:?}");
        tags.push(Tag {
            name,
            from,
            to,
            direction,
            color,
            frames: Vec::new(),
            user_data: UserData::default(),
        });
    }

    Ok(())
}

/// Link every tag with the frames in its inclusive range, both directions.
///
/// All ranges are checked against the decoded frame list before any link
/// is made.
pub fn expand(doc: &mut Document) -> Result<(), DecodeError> {
    let frame_count = doc.frames.len();
    for tag in &doc.tags {
        if tag.from > tag.to || tag.to as usize >= frame_count {
            return Err(DecodeError::invalid(format!(
                "tag {:?} covers frames {}..={} but the sprite has {frame_count} frames",
                tag.name, tag.from, tag.to
            )));
        }
    }

    for (i, tag) in doc.tags.iter_mut().enumerate() {
        for f in tag.from..=tag.to {
            let f = f as usize;
            tag.frames.push(FrameId(f));
            doc.frames[f].tags.push(TagId(i));
        }
    }

    Ok(())
}
