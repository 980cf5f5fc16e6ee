// Slice chunk decoding.
//
// Only the first slice key is read; any further keys are left for the
// chunk framing to skip.

use std::io::Read;

use crate::document::{Point, Rect, Size, Slice, UserData};
use crate::error::DecodeError;
use crate::format::ByteCursor;
use crate::format::header::SliceFlags;

pub fn decode_chunk<R: Read>(c: &mut ByteCursor<R>) -> Result<Slice, DecodeError> {
    c.skip(4)?; // key count
    let flags = SliceFlags::from_bits_retain(c.read_u32()?);
    c.skip(4)?;
    let name = c.read_prefixed_string()?;
    c.skip(4)?; // frame number of the key

    let bounds = read_rect(c)?;
    let nine_slice = if flags.contains(SliceFlags::NINE_SLICE) {
        Some(read_rect(c)?)
    } else {
        None
    };
    let pivot = if flags.contains(SliceFlags::PIVOT) {
        Some(read_point(c)?)
    } else {
        None
    };

    Ok(Slice {
        name,
        bounds,
        nine_slice,
        pivot,
        user_data: UserData::default(),
    })
}

fn read_point<R: Read>(c: &mut ByteCursor<R>) -> Result<Point, DecodeError> {
    let x = c.read_i32()?;
    let y = c.read_i32()?;
    Ok(Point { x, y })
}

fn read_rect<R: Read>(c: &mut ByteCursor<R>) -> Result<Rect, DecodeError> {
    let origin = read_point(c)?;
    let width = c.read_u32()?;
    let height = c.read_u32()?;
    Ok(Rect {
        origin,
        size: Size { width, height },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slice_bytes(flags: u32, extra: &[i32]) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(&flags.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&3u16.to_le_bytes());
        data.extend_from_slice(b"hit");
        data.extend_from_slice(&0u32.to_le_bytes());
        for v in [-2i32, 3, 10, 12].iter().chain(extra) {
            data.extend_from_slice(&v.to_le_bytes());
        }
        data
    }

    #[test]
    fn plain_slice() {
        let data = slice_bytes(0, &[]);
        let s = decode_chunk(&mut ByteCursor::new(data.as_slice())).unwrap();
        assert_eq!(s.name, "hit");
        assert_eq!(s.bounds.origin, Point { x: -2, y: 3 });
        assert_eq!(
            s.bounds.size,
            Size {
                width: 10,
                height: 12
            }
        );
        assert!(s.nine_slice.is_none());
        assert!(s.pivot.is_none());
    }

    #[test]
    fn nine_slice_and_pivot() {
        let data = slice_bytes(0b11, &[1, 1, 8, 10, 5, 6]);
        let s = decode_chunk(&mut ByteCursor::new(data.as_slice())).unwrap();
        let center = s.nine_slice.unwrap();
        assert_eq!(center.origin, Point { x: 1, y: 1 });
        assert_eq!(
            center.size,
            Size {
                width: 8,
                height: 10
            }
        );
        assert_eq!(s.pivot, Some(Point { x: 5, y: 6 }));
    }

    #[test]
    fn pivot_only() {
        let data = slice_bytes(0b10, &[4, 4]);
        let s = decode_chunk(&mut ByteCursor::new(data.as_slice())).unwrap();
        assert!(s.nine_slice.is_none());
        assert_eq!(s.pivot, Some(Point { x: 4, y: 4 }));
    }
}
