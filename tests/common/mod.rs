// mod.rs      sample GIFs for tests
//
// Copyright (c) 2026  Douglas Lau
//
#![allow(dead_code)]

use gifraffe::block::TRAILER;
use gifraffe::field::{
    Application, ColorTable, Comment, ControlFlags, DisposalMethod,
    GraphicControl, Header, ImageDesc, ImageFlags, LogicalScreenDesc,
    PlainText, Record, ScreenFlags,
};
use gifraffe::lzw;

/// 10x10 image with 4 colors in global color table
#[rustfmt::skip]
pub const SIMPLE: &[u8] = &[
    0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x0A, 0x00,
    0x0A, 0x00, 0x91, 0x00, 0x00, 0xFF, 0xFF, 0xFF,
    0xFF, 0x00, 0x00, 0x00, 0x00, 0xFF, 0x00, 0x00,
    0x00, 0x21, 0xF9, 0x04, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x2C, 0x00, 0x00, 0x00, 0x00, 0x0A, 0x00,
    0x0A, 0x00, 0x00, 0x02, 0x16, 0x8C, 0x2D, 0x99,
    0x87, 0x2A, 0x1C, 0xDC, 0x33, 0xA0, 0x02, 0x75,
    0xEC, 0x95, 0xFA, 0xA8, 0xDE, 0x60, 0x8C, 0x04,
    0x91, 0x4C, 0x01, 0x00, 0x3B,
];

/// Global color table of the animation sample
pub fn global_table() -> ColorTable {
    ColorTable::from_hex(&["000000", "ff0000", "00ff00", "0000ff"]).unwrap()
}

/// Local color table of odd frames in the animation sample
pub fn local_table() -> ColorTable {
    ColorTable::from_hex(&[
        "ffffff", "c0c0c0", "808080", "404040", "ffff00", "00ffff",
        "ff00ff", "101010",
    ])
    .unwrap()
}

/// Color indices of one frame
pub fn frame_indices(width: u16, height: u16, frame: usize) -> Vec<u8> {
    let colors = if frame % 2 == 1 { 8 } else { 4 };
    let mut indices = Vec::with_capacity(width as usize * height as usize);
    for y in 0..height as usize {
        for x in 0..width as usize {
            indices.push(((x / 3 + y * y / 5 + frame) % colors) as u8);
        }
    }
    indices
}

/// Plain text extension with a text grid and one line of text
pub fn plain_text() -> PlainText {
    let grid = vec![0, 0, 0, 0, 16, 0, 8, 0, 8, 8, 1, 0];
    PlainText {
        introducer: 0x21,
        label: 0x01,
        sub_blocks: vec![grid, b"Hi!".to_vec()],
    }
}

/// Build an animation.
///
/// * The first frame has a NETSCAPE2.0 looping extension and a comment
/// * Every frame has a graphic control extension
/// * Odd frames have a local color table
/// * The second frame has a plain text extension
/// * A comment follows the last frame
pub fn animation(width: u16, height: u16, frames: usize) -> Vec<u8> {
    let global = global_table();
    let mut buf = Header::default().pack();
    let screen = LogicalScreenDesc {
        screen_width: width,
        screen_height: height,
        flags: ScreenFlags {
            global_color_table: true,
            color_resolution: 7,
            sorted: false,
            table_size: global.size_field(),
        },
        background_color_idx: 0,
        pixel_aspect_ratio: 0,
    };
    buf.extend(screen.pack());
    buf.extend(global.pack());
    for frame in 0..frames {
        if frame == 0 {
            buf.extend(Application::with_loop_count(0).pack());
            buf.extend(Comment::with_text(b"gifraffe sample").pack());
        }
        let mut control = GraphicControl::default();
        control.delay_time_cs = 10 * (frame as u16 + 1);
        control.flags = ControlFlags {
            disposal_method: if frame % 2 == 0 {
                DisposalMethod::Keep
            } else {
                DisposalMethod::Background
            },
            ..ControlFlags::default()
        };
        if frame % 3 == 2 {
            control.set_transparent_color(Some(3));
        }
        buf.extend(control.pack());
        if frame == 1 {
            buf.extend(plain_text().pack());
        }
        let local = if frame % 2 == 1 {
            local_table()
        } else {
            ColorTable::default()
        };
        let desc = ImageDesc {
            width,
            height,
            flags: ImageFlags {
                local_color_table: !local.is_empty(),
                interlaced: frame == 2,
                table_size: local.size_field(),
                ..ImageFlags::default()
            },
            ..ImageDesc::default()
        };
        buf.extend(desc.pack());
        buf.extend(local.pack());
        let table = if local.is_empty() { &global } else { &local };
        let indices = frame_indices(width, height, frame);
        buf.extend(lzw::encode(&indices, Some(table)).unwrap());
    }
    buf.extend(Comment::with_text(b"end").pack());
    buf.push(TRAILER);
    buf
}
