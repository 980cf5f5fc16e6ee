// File-level decode helpers.
//
// Opens the file, wraps it in a `BufReader` and runs the decoder. The file
// handle is owned by the decode call, so it is closed on success and on
// every error path.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::decode::{self, DecodeOptions};
use crate::document::Document;
use crate::error::DecodeError;

const BUF_SIZE: usize = 64 * 1024; // 64 KiB

/// Decode the sprite file at `path` with default options.
pub fn decode_file(path: &Path) -> Result<Document, DecodeError> {
    decode_file_with_options(path, &DecodeOptions::default())
}

/// Decode the sprite file at `path`.
pub fn decode_file_with_options(
    path: &Path,
    opts: &DecodeOptions,
) -> Result<Document, DecodeError> {
    let file = File::open(path).map_err(DecodeError::CannotOpenSource)?;
    log::debug!("decoding {}", path.display());
    decode::decode_with_options(BufReader::with_capacity(BUF_SIZE, file), opts)
}
