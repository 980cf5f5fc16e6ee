//! Asegraph: an Aseprite sprite decoder in Rust.
//!
//! Reads the binary `.aseprite` / `.ase` format (32 bpp RGBA only) into a
//! [`Document`]: frames, a parent/child layer tree, cels, animation tags
//! and slices. Decoding is read-only and all-or-nothing.
//!
//! The crate provides:
//! - The decoder (`decode`) and its wire-level building blocks (`format`)
//! - The decoded data model (`document`)
//! - File helpers (`io`) and a path-keyed load cache (`cache`)
//! - An optional CLI (`cli` feature)
//!
//! # Quick Start
//!
//! ```no_run
//! use asegraph::document::{FrameId, LayerId};
//!
//! let bytes = std::fs::read("hero.aseprite")?;
//! let doc = asegraph::decode(bytes.as_slice())?;
//!
//! println!("{}x{}, {} frames", doc.width(), doc.height(), doc.frames().len());
//! if let Some(cel) = doc.cel_at(FrameId(0), LayerId(0)) {
//!     println!("first cel is {}x{}", cel.size.width, cel.size.height);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cache;
pub mod decode;
pub mod document;
pub mod error;
pub mod format;
pub mod io;

#[cfg(feature = "cli")]
pub mod cli;

pub use cache::SpriteCache;
pub use decode::{DecodeOptions, decode, decode_with_options};
pub use document::Document;
pub use error::DecodeError;
