// Decoded sprite document.
//
// The document owns every entity in insertion-ordered arenas. Entities refer
// to each other through typed ids (`FrameId`, `LayerId`, ...), never through
// owning pointers. The one piece of shared ownership is pixel storage, which
// linked cels alias through `PixelBuffer`.

mod entities;
mod pixels;

pub use entities::{
    AnimationDirection, BlendMode, Cel, CelId, CelKind, Color, Frame, FrameId, Layer, LayerId,
    LayerKind, Point, Rect, Size, Slice, SliceId, Tag, TagId, UserData,
};
pub use pixels::PixelBuffer;

/// A fully decoded sprite.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub(crate) width: u16,
    pub(crate) height: u16,
    pub(crate) frames: Vec<Frame>,
    pub(crate) layers: Vec<Layer>,
    pub(crate) cels: Vec<Cel>,
    pub(crate) tags: Vec<Tag>,
    pub(crate) slices: Vec<Slice>,
}

impl Document {
    /// Canvas width in pixels.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Canvas height in pixels.
    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// All cels in decode order.
    pub fn cels(&self) -> &[Cel] {
        &self.cels
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn slices(&self) -> &[Slice] {
        &self.slices
    }

    pub fn frame(&self, id: FrameId) -> Option<&Frame> {
        self.frames.get(id.0)
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.get(id.0)
    }

    pub fn cel(&self, id: CelId) -> Option<&Cel> {
        self.cels.get(id.0)
    }

    pub fn tag(&self, id: TagId) -> Option<&Tag> {
        self.tags.get(id.0)
    }

    pub fn slice(&self, id: SliceId) -> Option<&Slice> {
        self.slices.get(id.0)
    }

    /// The cel of `layer` in `frame`, if that slot is populated.
    pub fn cel_at(&self, frame: FrameId, layer: LayerId) -> Option<&Cel> {
        let id = (*self.frame(frame)?.cels.get(layer.0)?)?;
        self.cel(id)
    }

    /// Layers without a parent, in declaration order.
    pub fn root_layers(&self) -> impl Iterator<Item = LayerId> + '_ {
        self.layers
            .iter()
            .enumerate()
            .filter(|(_, l)| l.parent.is_none())
            .map(|(i, _)| LayerId(i))
    }

    /// First layer named `name`.
    pub fn layer_by_name(&self, name: &str) -> Option<LayerId> {
        self.layers.iter().position(|l| l.name == name).map(LayerId)
    }

    pub fn tag_by_name(&self, name: &str) -> Option<TagId> {
        self.tags.iter().position(|t| t.name == name).map(TagId)
    }

    pub fn slice_by_name(&self, name: &str) -> Option<SliceId> {
        self.slices.iter().position(|s| s.name == name).map(SliceId)
    }

    /// Sum of all frame durations in milliseconds.
    pub fn total_duration_ms(&self) -> u64 {
        self.frames.iter().map(|f| u64::from(f.duration)).sum()
    }
}
