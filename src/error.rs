// Decode error type.
//
// Every primitive read and every chunk decoder returns `Result<_, DecodeError>`;
// the first error aborts the whole decode and no partial document escapes.

use std::io;

/// Reasons a sprite decode can fail.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The byte source could not be opened, or failed for a reason other
    /// than running out of bytes.
    #[error("cannot open sprite source: {0}")]
    CannotOpenSource(#[source] io::Error),

    /// A read needed more bytes than the source had left.
    #[error("truncated input: needed {needed} bytes at offset {offset}")]
    TruncatedInput { offset: u64, needed: u64 },

    /// Magic-number mismatch or another structural violation.
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    /// Only 32 bpp RGBA sprites are supported.
    #[error("unsupported color depth: {0} bpp")]
    UnsupportedColorDepth(u16),

    #[error("unsupported cel type {0}")]
    UnsupportedCelType(u16),

    /// A linked cel points at a frame/layer slot that holds no cel.
    #[error("broken cel link: frame {frame} layer {layer} links to frame {linked_frame}")]
    BrokenCelLink {
        frame: usize,
        layer: usize,
        linked_frame: usize,
    },

    /// Inflating a compressed cel failed or produced the wrong size.
    #[error("decompression error: {0}")]
    DecompressionError(String),
}

impl DecodeError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidFormat(msg.into())
    }

    /// Short stable name of the error kind, used in CLI JSON output.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::CannotOpenSource(_) => "cannot_open_source",
            Self::TruncatedInput { .. } => "truncated_input",
            Self::InvalidFormat(_) => "invalid_format",
            Self::UnsupportedColorDepth(_) => "unsupported_color_depth",
            Self::UnsupportedCelType(_) => "unsupported_cel_type",
            Self::BrokenCelLink { .. } => "broken_cel_link",
            Self::DecompressionError(_) => "decompression_error",
        }
    }
}
