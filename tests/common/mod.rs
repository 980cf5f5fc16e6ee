// Byte-exact sprite writer for tests.
//
// Produces files in the same layout the decoder reads: 128-byte header,
// 16-byte frame headers, size-prefixed chunks. Sizes in headers are filled
// in for real even though the decoder ignores the file/frame size fields.

#![allow(dead_code)]

use std::io::Write;

use asegraph::format::ChunkType;
use asegraph::format::header::{FILE_HEADER_LEN, FILE_MAGIC, FRAME_HEADER_LEN, FRAME_MAGIC};
use flate2::Compression;
use flate2::write::ZlibEncoder;

pub const VISIBLE: u16 = 1;
pub const HIDDEN: u16 = 0;

pub struct Frame {
    pub duration: u16,
    pub chunks: Vec<Vec<u8>>,
}

pub fn frame(chunks: Vec<Vec<u8>>) -> Frame {
    Frame {
        duration: 100,
        chunks,
    }
}

pub struct Sprite {
    pub width: u16,
    pub height: u16,
    pub color_depth: u16,
    pub file_magic: u16,
    pub frame_magic: u16,
    pub frames: Vec<Frame>,
}

impl Sprite {
    pub fn new(width: u16, height: u16, frames: Vec<Frame>) -> Self {
        Self {
            width,
            height,
            color_depth: 32,
            file_magic: FILE_MAGIC,
            frame_magic: FRAME_MAGIC,
            frames,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&0u32.to_le_bytes()); // patched below
        out.extend_from_slice(&self.file_magic.to_le_bytes());
        out.extend_from_slice(&(self.frames.len() as u16).to_le_bytes());
        out.extend_from_slice(&self.width.to_le_bytes());
        out.extend_from_slice(&self.height.to_le_bytes());
        out.extend_from_slice(&self.color_depth.to_le_bytes());
        out.extend_from_slice(&1u32.to_le_bytes()); // flags
        out.extend_from_slice(&100u16.to_le_bytes()); // deprecated speed
        out.resize(FILE_HEADER_LEN, 0);

        for f in &self.frames {
            let body: usize = f.chunks.iter().map(Vec::len).sum();
            let size = (FRAME_HEADER_LEN + body) as u32;
            out.extend_from_slice(&size.to_le_bytes());
            out.extend_from_slice(&self.frame_magic.to_le_bytes());
            out.extend_from_slice(&(f.chunks.len() as u16).to_le_bytes());
            out.extend_from_slice(&f.duration.to_le_bytes());
            out.extend_from_slice(&[0; 6]);
            for c in &f.chunks {
                out.extend_from_slice(c);
            }
        }

        let total = out.len() as u32;
        out[..4].copy_from_slice(&total.to_le_bytes());
        out
    }
}

pub fn chunk(tag: u16, payload: &[u8]) -> Vec<u8> {
    let mut out = ((payload.len() + 6) as u32).to_le_bytes().to_vec();
    out.extend_from_slice(&tag.to_le_bytes());
    out.extend_from_slice(payload);
    out
}

fn push_str(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(&(s.len() as u16).to_le_bytes());
    buf.extend_from_slice(s.as_bytes());
}

pub fn layer(name: &str, depth: u16, flags: u16) -> Vec<u8> {
    layer_with(name, depth, flags, 0, 0, 255)
}

pub fn group(name: &str, depth: u16, flags: u16) -> Vec<u8> {
    layer_with(name, depth, flags, 1, 0, 255)
}

pub fn layer_with(
    name: &str,
    depth: u16,
    flags: u16,
    layer_type: u16,
    blend: u16,
    opacity: u8,
) -> Vec<u8> {
    let mut p = Vec::new();
    p.extend_from_slice(&flags.to_le_bytes());
    p.extend_from_slice(&layer_type.to_le_bytes());
    p.extend_from_slice(&depth.to_le_bytes());
    p.extend_from_slice(&[0; 4]);
    p.extend_from_slice(&blend.to_le_bytes());
    p.extend_from_slice(&u32::from(opacity).to_le_bytes());
    push_str(&mut p, name);
    chunk(ChunkType::LAYER, &p)
}

fn cel_prefix(layer: u16, x: i16, y: i16, cel_type: u16) -> Vec<u8> {
    let mut p = Vec::new();
    p.extend_from_slice(&layer.to_le_bytes());
    p.extend_from_slice(&x.to_le_bytes());
    p.extend_from_slice(&y.to_le_bytes());
    p.push(255);
    p.extend_from_slice(&cel_type.to_le_bytes());
    p.extend_from_slice(&[0; 7]);
    p
}

pub fn raw_cel(layer: u16, x: i16, y: i16, w: u16, h: u16, pixels: &[u8]) -> Vec<u8> {
    let mut p = cel_prefix(layer, x, y, 0);
    p.extend_from_slice(&w.to_le_bytes());
    p.extend_from_slice(&h.to_le_bytes());
    p.extend_from_slice(pixels);
    chunk(ChunkType::CEL, &p)
}

pub fn linked_cel(layer: u16, frame: u16) -> Vec<u8> {
    let mut p = cel_prefix(layer, 0, 0, 1);
    p.extend_from_slice(&frame.to_le_bytes());
    chunk(ChunkType::CEL, &p)
}

pub fn compressed_cel(layer: u16, w: u16, h: u16, zdata: &[u8]) -> Vec<u8> {
    let mut p = cel_prefix(layer, 0, 0, 2);
    p.extend_from_slice(&w.to_le_bytes());
    p.extend_from_slice(&h.to_le_bytes());
    p.extend_from_slice(zdata);
    chunk(ChunkType::CEL, &p)
}

pub fn cel_of_type(layer: u16, cel_type: u16) -> Vec<u8> {
    let mut p = cel_prefix(layer, 0, 0, cel_type);
    p.extend_from_slice(&[0; 4]);
    chunk(ChunkType::CEL, &p)
}

pub struct TagSpec<'a> {
    pub name: &'a str,
    pub from: u16,
    pub to: u16,
    pub direction: u16,
    pub color: u32,
}

pub fn tags(specs: &[TagSpec<'_>]) -> Vec<u8> {
    let mut p = Vec::new();
    p.extend_from_slice(&(specs.len() as u16).to_le_bytes());
    p.extend_from_slice(&[0; 8]);
    for t in specs {
        p.extend_from_slice(&t.from.to_le_bytes());
        p.extend_from_slice(&t.to.to_le_bytes());
        p.extend_from_slice(&t.direction.to_le_bytes());
        p.extend_from_slice(&[0; 7]);
        p.extend_from_slice(&t.color.to_le_bytes());
        push_str(&mut p, t.name);
    }
    chunk(ChunkType::FRAME_TAGS, &p)
}

pub fn user_data(text: Option<&str>, color: Option<u32>) -> Vec<u8> {
    let flags = u32::from(text.is_some()) | (u32::from(color.is_some()) << 1);
    let mut p = flags.to_le_bytes().to_vec();
    if let Some(t) = text {
        push_str(&mut p, t);
    }
    if let Some(c) = color {
        p.extend_from_slice(&c.to_le_bytes());
    }
    chunk(ChunkType::USER_DATA, &p)
}

/// `nine` is (x, y, w, h), `pivot` is (x, y).
pub fn slice(
    name: &str,
    bounds: (i32, i32, u32, u32),
    nine: Option<(i32, i32, u32, u32)>,
    pivot: Option<(i32, i32)>,
) -> Vec<u8> {
    let flags = u32::from(nine.is_some()) | (u32::from(pivot.is_some()) << 1);
    let mut p = Vec::new();
    p.extend_from_slice(&1u32.to_le_bytes());
    p.extend_from_slice(&flags.to_le_bytes());
    p.extend_from_slice(&0u32.to_le_bytes());
    push_str(&mut p, name);
    p.extend_from_slice(&0u32.to_le_bytes());
    let push_rect = |p: &mut Vec<u8>, (x, y, w, h): (i32, i32, u32, u32)| {
        p.extend_from_slice(&x.to_le_bytes());
        p.extend_from_slice(&y.to_le_bytes());
        p.extend_from_slice(&w.to_le_bytes());
        p.extend_from_slice(&h.to_le_bytes());
    };
    push_rect(&mut p, bounds);
    if let Some(n) = nine {
        push_rect(&mut p, n);
    }
    if let Some((x, y)) = pivot {
        p.extend_from_slice(&x.to_le_bytes());
        p.extend_from_slice(&y.to_le_bytes());
    }
    chunk(ChunkType::SLICE, &p)
}

pub fn deflate(data: &[u8]) -> Vec<u8> {
    let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
    enc.write_all(data).unwrap();
    enc.finish().unwrap()
}

/// `w * h` RGBA pixels with a recognizable per-pixel pattern.
pub fn pattern(w: u16, h: u16, seed: u8) -> Vec<u8> {
    (0..usize::from(w) * usize::from(h) * 4)
        .map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed))
        .collect()
}

/// A sprite using every chunk kind the decoder understands.
///
/// Layers: 0 "bg", 1 "group" (group), 2 "body" (child of group), 3 "hidden".
/// Frames: 4. Frame 0 has raw bg + compressed body + raw hidden; frame 1
/// links body to frame 0; frames 2-3 have bg only. Tag "walk" covers 1..=3.
pub fn full_sprite() -> Sprite {
    let bg = pattern(4, 4, 1);
    let body = pattern(2, 3, 7);
    Sprite::new(
        16,
        16,
        vec![
            frame(vec![
                layer("bg", 0, VISIBLE),
                user_data(Some("background"), Some(0xFF00_FF00)),
                group("group", 0, VISIBLE),
                layer("body", 1, VISIBLE),
                layer("hidden", 0, HIDDEN),
                chunk(ChunkType::PALETTE, &[0xAB; 40]),
                tags(&[TagSpec {
                    name: "walk",
                    from: 1,
                    to: 3,
                    direction: 2,
                    color: 0xFF00_00FF,
                }]),
                raw_cel(0, 0, 0, 4, 4, &bg),
                user_data(Some("bg cel"), None),
                compressed_cel(2, 2, 3, &deflate(&body)),
                raw_cel(3, 1, 1, 1, 1, &[1, 2, 3, 4]),
                slice("hitbox", (1, 2, 8, 9), Some((2, 2, 4, 5)), Some((4, 8))),
                user_data(None, Some(0x8000_0080)),
            ]),
            frame(vec![linked_cel(2, 0), raw_cel(0, 0, 0, 4, 4, &bg)]),
            frame(vec![raw_cel(0, 0, 0, 4, 4, &pattern(4, 4, 3))]),
            frame(vec![raw_cel(0, 0, 0, 4, 4, &pattern(4, 4, 4))]),
        ],
    )
}
