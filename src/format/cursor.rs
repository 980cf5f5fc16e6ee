// Forward-only, bounds-checked little-endian reader.
//
// Wraps any `Read` and tracks the absolute stream offset so truncation
// errors can say where the input ran out. There is no seeking: skips are
// performed by draining into a sink.

use std::io::{self, Read};

use crate::error::DecodeError;

/// Sequential reader over a sprite byte source.
pub struct ByteCursor<R: Read> {
    inner: R,
    offset: u64,
}

impl<R: Read> ByteCursor<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, offset: 0 }
    }

    /// Number of bytes consumed so far.
    #[inline]
    pub fn position(&self) -> u64 {
        self.offset
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut buf = [0u8; N];
        match self.inner.read_exact(&mut buf) {
            Ok(()) => {
                self.offset += N as u64;
                Ok(buf)
            }
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                Err(DecodeError::TruncatedInput {
                    offset: self.offset,
                    needed: N as u64,
                })
            }
            Err(e) => Err(DecodeError::CannotOpenSource(e)),
        }
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, DecodeError> {
        self.read_array().map(u16::from_le_bytes)
    }

    pub fn read_i16(&mut self) -> Result<i16, DecodeError> {
        self.read_array().map(i16::from_le_bytes)
    }

    pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
        self.read_array().map(u32::from_le_bytes)
    }

    pub fn read_i32(&mut self) -> Result<i32, DecodeError> {
        self.read_array().map(i32::from_le_bytes)
    }

    /// Read exactly `len` bytes into a fresh buffer.
    ///
    /// The buffer grows with the data actually read, so a bogus length on a
    /// short stream fails with `TruncatedInput` instead of allocating `len`
    /// bytes up front.
    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>, DecodeError> {
        let mut buf = Vec::new();
        let got = (&mut self.inner)
            .take(len as u64)
            .read_to_end(&mut buf)
            .map_err(DecodeError::CannotOpenSource)?;
        if got < len {
            let offset = self.offset;
            self.offset += got as u64;
            return Err(DecodeError::TruncatedInput {
                offset,
                needed: len as u64,
            });
        }
        self.offset += len as u64;
        Ok(buf)
    }

    /// Read `len` bytes and reinterpret them as text.
    ///
    /// Embedded NULs are kept; invalid UTF-8 is replaced lossily.
    pub fn read_string(&mut self, len: usize) -> Result<String, DecodeError> {
        let bytes = self.read_bytes(len)?;
        Ok(match String::from_utf8(bytes) {
            Ok(s) => s,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        })
    }

    /// Read a 2-byte length followed by that many bytes of text.
    pub fn read_prefixed_string(&mut self) -> Result<String, DecodeError> {
        let len = self.read_u16()?;
        self.read_string(len as usize)
    }

    /// Advance `len` bytes without keeping them.
    pub fn skip(&mut self, len: u64) -> Result<(), DecodeError> {
        let skipped = io::copy(&mut (&mut self.inner).take(len), &mut io::sink())
            .map_err(DecodeError::CannotOpenSource)?;
        if skipped < len {
            let offset = self.offset;
            self.offset += skipped;
            return Err(DecodeError::TruncatedInput {
                offset,
                needed: len,
            });
        }
        self.offset += len;
        Ok(())
    }
}
