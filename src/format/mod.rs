// Wire-level pieces of the sprite format.
//
// # Modules
//
// - `cursor`: Forward-only little-endian reader with truncation reporting
// - `header`: File and frame headers, magic numbers, flag words
// - `chunk`:  Chunk header framing and payload accounting

pub mod chunk;
pub mod cursor;
pub mod header;

pub use chunk::{CHUNK_HEADER_LEN, ChunkHeader, ChunkType};
pub use cursor::ByteCursor;
pub use header::{FILE_MAGIC, FRAME_MAGIC, FileHeader, FrameHeader};
