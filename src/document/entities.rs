// Entities owned by a `Document`.
//
// Cross references are typed indices into the document's arenas; they stay
// valid for as long as the document lives.

use super::pixels::PixelBuffer;

// ---------------------------------------------------------------------------
// Ids
// ---------------------------------------------------------------------------

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub usize);

        impl $name {
            #[inline]
            pub fn index(self) -> usize {
                self.0
            }
        }
    };
}

entity_id!(
    /// Index into `Document::frames`.
    FrameId
);
entity_id!(
    /// Index into `Document::layers`. Also the layer index used by cel chunks.
    LayerId
);
entity_id!(
    /// Index into `Document::cels`.
    CelId
);
entity_id!(
    /// Index into `Document::tags`.
    TagId
);
entity_id!(
    /// Index into `Document::slices`.
    SliceId
);

// ---------------------------------------------------------------------------
// Small value types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Unpack a color stored as r,g,b,a from the low byte up.
    pub fn from_packed(packed: u32) -> Self {
        let [r, g, b, a] = packed.to_le_bytes();
        Self { r, g, b, a }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    /// Byte length of a tightly packed RGBA image of this size.
    pub fn rgba_len(self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)?
            .checked_mul(4)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

/// Optional text and color attached to a layer, cel, tag or slice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserData {
    pub text: Option<String>,
    pub color: Option<Color>,
}

impl UserData {
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.color.is_none()
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Layer blend mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BlendMode {
    #[default]
    Normal,
    Darken,
    Multiply,
    ColorBurn,
    Lighten,
    Screen,
    ColorDodge,
    Addition,
    Overlay,
    SoftLight,
    HardLight,
    Difference,
    Exclusion,
    Subtract,
    Divide,
    Hue,
    Saturation,
    Color,
    Luminosity,
    /// A value this decoder does not know, kept as stored.
    Other(u16),
}

impl BlendMode {
    pub fn from_u16(v: u16) -> Self {
        match v {
            0 => Self::Normal,
            1 => Self::Darken,
            2 => Self::Multiply,
            3 => Self::ColorBurn,
            4 => Self::Lighten,
            5 => Self::Screen,
            6 => Self::ColorDodge,
            7 => Self::Addition,
            8 => Self::Overlay,
            9 => Self::SoftLight,
            10 => Self::HardLight,
            11 => Self::Difference,
            12 => Self::Exclusion,
            13 => Self::Subtract,
            14 => Self::Divide,
            15 => Self::Hue,
            16 => Self::Saturation,
            17 => Self::Color,
            18 => Self::Luminosity,
            other => Self::Other(other),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Darken => "darken",
            Self::Multiply => "multiply",
            Self::ColorBurn => "color-burn",
            Self::Lighten => "lighten",
            Self::Screen => "screen",
            Self::ColorDodge => "color-dodge",
            Self::Addition => "addition",
            Self::Overlay => "overlay",
            Self::SoftLight => "soft-light",
            Self::HardLight => "hard-light",
            Self::Difference => "difference",
            Self::Exclusion => "exclusion",
            Self::Subtract => "subtract",
            Self::Divide => "divide",
            Self::Hue => "hue",
            Self::Saturation => "saturation",
            Self::Color => "color",
            Self::Luminosity => "luminosity",
            Self::Other(_) => "other",
        }
    }
}

/// Tag playback direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AnimationDirection {
    #[default]
    Forward,
    Reverse,
    PingPong,
    PingPongReverse,
    /// A value this decoder does not know, kept as stored.
    Other(u16),
}

impl AnimationDirection {
    pub fn from_u16(v: u16) -> Self {
        match v {
            0 => Self::Forward,
            1 => Self::Reverse,
            2 => Self::PingPong,
            3 => Self::PingPongReverse,
            other => Self::Other(other),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Reverse => "reverse",
            Self::PingPong => "ping-pong",
            Self::PingPongReverse => "ping-pong-reverse",
            Self::Other(_) => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LayerKind {
    #[default]
    Normal,
    Group,
}

/// How a cel's pixels were stored in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CelKind {
    Raw,
    /// Pixels shared with the same layer's cel in `frame`.
    Linked { frame: FrameId },
    Compressed,
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    /// Duration in milliseconds.
    pub duration: u16,
    /// One slot per layer index; `None` where the layer has no cel in this frame.
    pub cels: Vec<Option<CelId>>,
    /// Tags whose range covers this frame, in tag decode order.
    pub tags: Vec<TagId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    pub name: String,
    pub kind: LayerKind,
    /// Effective visibility: the layer's own flag AND every ancestor's,
    /// fixed at decode time.
    pub visible: bool,
    pub opacity: u8,
    pub blend_mode: BlendMode,
    /// Nesting depth in the layer tree (0 for roots).
    pub depth: u16,
    pub parent: Option<LayerId>,
    pub children: Vec<LayerId>,
    pub user_data: UserData,
}

impl Layer {
    pub fn is_group(&self) -> bool {
        self.kind == LayerKind::Group
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cel {
    pub frame: FrameId,
    pub layer: LayerId,
    pub kind: CelKind,
    pub position: Point,
    pub size: Size,
    pub opacity: u8,
    /// `None` when the layer was invisible and pixels were not materialized.
    pub pixels: Option<PixelBuffer>,
    pub user_data: UserData,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    /// First frame index covered, inclusive.
    pub from: u16,
    /// Last frame index covered, inclusive.
    pub to: u16,
    pub direction: AnimationDirection,
    pub color: Color,
    /// Frames `from..=to`, ascending.
    pub frames: Vec<FrameId>,
    /// Always empty after decoding: a tags chunk never becomes the
    /// user-data acceptor, so user data that follows it goes to the
    /// previous layer, cel or slice.
    pub user_data: UserData,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slice {
    pub name: String,
    pub bounds: Rect,
    /// Stretchable center region, relative to `bounds`.
    pub nine_slice: Option<Rect>,
    pub pivot: Option<Point>,
    pub user_data: UserData,
}
