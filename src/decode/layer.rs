// Layer chunk decoding and parent/child tree reconstruction.
//
// Layers arrive as a flat list, each tagged with a nesting depth. A layer
// at depth `d > 0` belongs to the layer most recently seen at depth `d - 1`.
// Visibility is inherited downward once, when the child is attached.

use std::collections::HashMap;
use std::io::Read;

use crate::document::{BlendMode, Layer, LayerId, LayerKind, UserData};
use crate::error::DecodeError;
use crate::format::ByteCursor;
use crate::format::header::LayerFlags;

const LAYER_TYPE_GROUP: u16 = 1;

/// One layer chunk as stored in the file, before tree placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerRecord {
    pub flags: LayerFlags,
    pub kind: LayerKind,
    pub depth: u16,
    pub blend_mode: BlendMode,
    pub opacity: u8,
    pub name: String,
}

impl LayerRecord {
    pub fn decode<R: Read>(c: &mut ByteCursor<R>) -> Result<Self, DecodeError> {
        let flags = LayerFlags::from_bits_retain(c.read_u16()?);
        let kind = if c.read_u16()? == LAYER_TYPE_GROUP {
            LayerKind::Group
        } else {
            LayerKind::Normal
        };
        let depth = c.read_u16()?;
        c.skip(4)?; // default width/height

        let blend_mode = BlendMode::from_u16(c.read_u16()?);

        // Opacity lives in the low byte; the upper three are reserved.
        let opacity = (c.read_u32()? & 0xFF) as u8;
        let name = c.read_prefixed_string()?;

        Ok(Self {
            flags,
            kind,
            depth,
            blend_mode,
            opacity,
            name,
        })
    }
}

/// Tracks the most recent layer at every depth while layer chunks stream in.
#[derive(Debug, Default)]
pub struct LayerHierarchyBuilder {
    last_at_depth: HashMap<u16, LayerId>,
}

impl LayerHierarchyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `record` to `layers`, linking it under its parent.
    pub fn attach(
        &mut self,
        record: LayerRecord,
        layers: &mut Vec<Layer>,
    ) -> Result<LayerId, DecodeError> {
        let id = LayerId(layers.len());
        let mut visible = record.flags.contains(LayerFlags::VISIBLE);

        let parent = if record.depth == 0 {
            None
        } else {
            let parent = *self.last_at_depth.get(&(record.depth - 1)).ok_or_else(|| {
                DecodeError::invalid(format!(
                    "layer {:?} at depth {} has no parent at depth {}",
                    record.name,
                    record.depth,
                    record.depth - 1
                ))
            })?;
            let p = &mut layers[parent.0];
            p.children.push(id);
            visible &= p.visible;
            Some(parent)
        };

        layers.push(Layer {
            name: record.name,
            kind: record.kind,
            visible,
            opacity: record.opacity,
            blend_mode: record.blend_mode,
            depth: record.depth,
            parent,
            children: Vec::new(),
            user_data: UserData::default(),
        });
        self.last_at_depth.insert(record.depth, id);

        Ok(id)
    }

    pub fn decode_chunk<R: Read>(
        &mut self,
        c: &mut ByteCursor<R>,
        layers: &mut Vec<Layer>,
    ) -> Result<LayerId, DecodeError> {
        let record = LayerRecord::decode(c)?;
        log::trace!(
            "layer {:?} depth {} kind {:?}",
            record.name,
            record.depth,
            record.kind
        );
        self.attach(record, layers)
    }
}
