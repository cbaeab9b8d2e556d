// field.rs
//
// Copyright (c) 2026  Douglas Lau
//
//! Structured records packed into raw blocks.
//!
//! Every record can be unpacked from its raw block and packed back again
//! without changing a single byte.
use crate::block::{color_table_size, BlockName, CHANNELS, TRAILER};
use crate::error::{Error, Result};
use std::fmt::Write;

/// A record stored in one raw block
pub trait Record: Sized {
    /// Block holding the record
    const BLOCK: BlockName;

    /// Unpack a record from a raw block
    fn unpack(raw: &[u8]) -> Result<Self>;

    /// Pack the record into a raw block
    fn pack(&self) -> Vec<u8>;
}

/// Read a little-endian u16
fn read_u16(buf: &[u8], i: usize) -> u16 {
    (buf[i + 1] as u16) << 8 | buf[i] as u16
}

/// Push a little-endian u16
fn push_u16(buf: &mut Vec<u8>, v: u16) {
    buf.push(v as u8);
    buf.push((v >> 8) as u8);
}

/// Check a fixed-length block
fn check_len<R: Record>(raw: &[u8]) -> Result<()> {
    match R::BLOCK.size() {
        Some(sz) if sz != raw.len() => Err(Error::MalformedBlock(R::BLOCK)),
        _ => Ok(()),
    }
}

/// Split a chain of sub-blocks.
///
/// The chain must end with a zero-length block terminator at the end of the
/// buffer.
pub(crate) fn split_sub_blocks(buf: &[u8]) -> Option<Vec<&[u8]>> {
    let mut blocks = vec![];
    let mut i = 0;
    loop {
        let len = *buf.get(i)? as usize;
        i += 1;
        if len == 0 {
            break;
        }
        blocks.push(buf.get(i..i + len)?);
        i += len;
    }
    if i == buf.len() {
        Some(blocks)
    } else {
        None
    }
}

/// Push a chain of sub-blocks, with block terminator.
///
/// Sub-blocks longer than 255 bytes are split, and empty ones are skipped.
fn push_sub_blocks<B: AsRef<[u8]>>(buf: &mut Vec<u8>, blocks: &[B]) {
    for chunk in blocks.iter().flat_map(|b| b.as_ref().chunks(0xFF)) {
        buf.push(chunk.len() as u8);
        buf.extend_from_slice(chunk);
    }
    buf.push(0);
}

/// Header block (signature and version)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    pub signature: [u8; 3],
    pub version: [u8; 3],
}

impl Default for Header {
    fn default() -> Self {
        Header {
            signature: *b"GIF",
            version: *b"89a",
        }
    }
}

impl Header {
    /// Check for a GIF signature with a known version (87a or 89a)
    pub fn is_gif(&self) -> bool {
        &self.signature == b"GIF" && matches!(&self.version, b"87a" | b"89a")
    }
}

impl Record for Header {
    const BLOCK: BlockName = BlockName::Header;

    fn unpack(raw: &[u8]) -> Result<Self> {
        check_len::<Self>(raw)?;
        Ok(Header {
            signature: [raw[0], raw[1], raw[2]],
            version: [raw[3], raw[4], raw[5]],
        })
    }

    fn pack(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(6);
        buf.extend_from_slice(&self.signature);
        buf.extend_from_slice(&self.version);
        buf
    }
}

/// Packed field of a logical screen descriptor
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScreenFlags {
    pub global_color_table: bool,
    /// Color resolution (3 bits)
    pub color_resolution: u8,
    pub sorted: bool,
    /// Size of global color table (3 bits)
    pub table_size: u8,
}

impl ScreenFlags {
    const COLOR_TABLE_PRESENT: u8 = 0b1000_0000;
    const COLOR_RESOLUTION: u8 = 0b0111_0000;
    const COLOR_TABLE_ORDERING: u8 = 0b0000_1000;
    const COLOR_TABLE_SIZE: u8 = 0b0000_0111;
}

impl From<u8> for ScreenFlags {
    fn from(flags: u8) -> Self {
        ScreenFlags {
            global_color_table: flags & Self::COLOR_TABLE_PRESENT != 0,
            color_resolution: (flags & Self::COLOR_RESOLUTION) >> 4,
            sorted: flags & Self::COLOR_TABLE_ORDERING != 0,
            table_size: flags & Self::COLOR_TABLE_SIZE,
        }
    }
}

impl From<ScreenFlags> for u8 {
    fn from(f: ScreenFlags) -> Self {
        let mut flags =
            (f.color_resolution << 4) & ScreenFlags::COLOR_RESOLUTION;
        flags |= f.table_size & ScreenFlags::COLOR_TABLE_SIZE;
        if f.global_color_table {
            flags |= ScreenFlags::COLOR_TABLE_PRESENT;
        }
        if f.sorted {
            flags |= ScreenFlags::COLOR_TABLE_ORDERING;
        }
        flags
    }
}

/// Logical screen descriptor block
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LogicalScreenDesc {
    pub screen_width: u16,
    pub screen_height: u16,
    pub flags: ScreenFlags,
    /// Index into global color table
    pub background_color_idx: u8,
    pub pixel_aspect_ratio: u8,
}

impl LogicalScreenDesc {
    /// Get the size of the global color table, in bytes.
    ///
    /// The table follows the descriptor whether or not its flag is set.
    pub fn color_table_size(&self) -> usize {
        color_table_size(self.flags.table_size)
    }
}

impl Record for LogicalScreenDesc {
    const BLOCK: BlockName = BlockName::LogicalScreenDesc;

    fn unpack(raw: &[u8]) -> Result<Self> {
        check_len::<Self>(raw)?;
        Ok(LogicalScreenDesc {
            screen_width: read_u16(raw, 0),
            screen_height: read_u16(raw, 2),
            flags: raw[4].into(),
            background_color_idx: raw[5],
            pixel_aspect_ratio: raw[6],
        })
    }

    fn pack(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(7);
        push_u16(&mut buf, self.screen_width);
        push_u16(&mut buf, self.screen_height);
        buf.push(self.flags.into());
        buf.push(self.background_color_idx);
        buf.push(self.pixel_aspect_ratio);
        buf
    }
}

/// Disposal method for a frame
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DisposalMethod {
    #[default]
    NoAction,
    Keep,
    Background,
    Previous,
    Reserved(u8),
}

impl From<u8> for DisposalMethod {
    fn from(n: u8) -> Self {
        use self::DisposalMethod::*;
        match n & 0b0111 {
            0 => NoAction,
            1 => Keep,
            2 => Background,
            3 => Previous,
            n => Reserved(n),
        }
    }
}

impl From<DisposalMethod> for u8 {
    fn from(d: DisposalMethod) -> Self {
        use self::DisposalMethod::*;
        match d {
            NoAction => 0,
            Keep => 1,
            Background => 2,
            Previous => 3,
            Reserved(n) => n & 0b0111,
        }
    }
}

/// Packed field of a graphic control extension
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControlFlags {
    /// Reserved (3 bits)
    pub reserved: u8,
    pub disposal_method: DisposalMethod,
    pub user_input: bool,
    pub transparent_color: bool,
}

impl ControlFlags {
    const RESERVED: u8 = 0b1110_0000;
    const DISPOSAL_METHOD: u8 = 0b0001_1100;
    const USER_INPUT: u8 = 0b0000_0010;
    const TRANSPARENT_COLOR: u8 = 0b0000_0001;
}

impl From<u8> for ControlFlags {
    fn from(flags: u8) -> Self {
        ControlFlags {
            reserved: (flags & Self::RESERVED) >> 5,
            disposal_method: ((flags & Self::DISPOSAL_METHOD) >> 2).into(),
            user_input: flags & Self::USER_INPUT != 0,
            transparent_color: flags & Self::TRANSPARENT_COLOR != 0,
        }
    }
}

impl From<ControlFlags> for u8 {
    fn from(f: ControlFlags) -> Self {
        let d: u8 = f.disposal_method.into();
        let mut flags = (f.reserved << 5) & ControlFlags::RESERVED;
        flags |= (d << 2) & ControlFlags::DISPOSAL_METHOD;
        if f.user_input {
            flags |= ControlFlags::USER_INPUT;
        }
        if f.transparent_color {
            flags |= ControlFlags::TRANSPARENT_COLOR;
        }
        flags
    }
}

/// Graphic control extension block
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GraphicControl {
    pub introducer: u8,
    pub label: u8,
    pub block_size: u8,
    pub flags: ControlFlags,
    /// Delay in centiseconds (hundredths of a second)
    pub delay_time_cs: u16,
    pub transparent_color_idx: u8,
    pub terminator: u8,
}

impl Default for GraphicControl {
    fn default() -> Self {
        GraphicControl {
            introducer: 0x21,
            label: 0xF9,
            block_size: 4,
            flags: ControlFlags::default(),
            delay_time_cs: 0,
            transparent_color_idx: 0,
            terminator: 0,
        }
    }
}

impl GraphicControl {
    /// Get the transparent color index, if enabled
    pub fn transparent_color(&self) -> Option<u8> {
        if self.flags.transparent_color {
            Some(self.transparent_color_idx)
        } else {
            None
        }
    }

    /// Set or clear the transparent color
    pub fn set_transparent_color(&mut self, clr: Option<u8>) {
        self.flags.transparent_color = clr.is_some();
        self.transparent_color_idx = clr.unwrap_or_default();
    }
}

impl Record for GraphicControl {
    const BLOCK: BlockName = BlockName::GraphicControl;

    fn unpack(raw: &[u8]) -> Result<Self> {
        check_len::<Self>(raw)?;
        Ok(GraphicControl {
            introducer: raw[0],
            label: raw[1],
            block_size: raw[2],
            flags: raw[3].into(),
            delay_time_cs: read_u16(raw, 4),
            transparent_color_idx: raw[6],
            terminator: raw[7],
        })
    }

    fn pack(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(8);
        buf.push(self.introducer);
        buf.push(self.label);
        buf.push(self.block_size);
        buf.push(self.flags.into());
        push_u16(&mut buf, self.delay_time_cs);
        buf.push(self.transparent_color_idx);
        buf.push(self.terminator);
        buf
    }
}

/// Packed field of an image descriptor
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImageFlags {
    pub local_color_table: bool,
    pub interlaced: bool,
    pub sorted: bool,
    /// Reserved (2 bits)
    pub reserved: u8,
    /// Size of local color table (3 bits)
    pub table_size: u8,
}

impl ImageFlags {
    const COLOR_TABLE_PRESENT: u8 = 0b1000_0000;
    const INTERLACED: u8 = 0b0100_0000;
    const COLOR_TABLE_ORDERING: u8 = 0b0010_0000;
    const RESERVED: u8 = 0b0001_1000;
    const COLOR_TABLE_SIZE: u8 = 0b0000_0111;
}

impl From<u8> for ImageFlags {
    fn from(flags: u8) -> Self {
        ImageFlags {
            local_color_table: flags & Self::COLOR_TABLE_PRESENT != 0,
            interlaced: flags & Self::INTERLACED != 0,
            sorted: flags & Self::COLOR_TABLE_ORDERING != 0,
            reserved: (flags & Self::RESERVED) >> 3,
            table_size: flags & Self::COLOR_TABLE_SIZE,
        }
    }
}

impl From<ImageFlags> for u8 {
    fn from(f: ImageFlags) -> Self {
        let mut flags = (f.reserved << 3) & ImageFlags::RESERVED;
        flags |= f.table_size & ImageFlags::COLOR_TABLE_SIZE;
        if f.local_color_table {
            flags |= ImageFlags::COLOR_TABLE_PRESENT;
        }
        if f.interlaced {
            flags |= ImageFlags::INTERLACED;
        }
        if f.sorted {
            flags |= ImageFlags::COLOR_TABLE_ORDERING;
        }
        flags
    }
}

/// Image descriptor block
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageDesc {
    pub separator: u8,
    pub left: u16,
    pub top: u16,
    pub width: u16,
    pub height: u16,
    pub flags: ImageFlags,
}

impl Default for ImageDesc {
    fn default() -> Self {
        ImageDesc {
            separator: 0x2C,
            left: 0,
            top: 0,
            width: 0,
            height: 0,
            flags: ImageFlags::default(),
        }
    }
}

impl ImageDesc {
    /// Get the size of the local color table, in bytes
    pub fn color_table_size(&self) -> usize {
        if self.flags.local_color_table {
            color_table_size(self.flags.table_size)
        } else {
            0
        }
    }

    /// Get the image size, in pixels
    pub fn image_sz(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl Record for ImageDesc {
    const BLOCK: BlockName = BlockName::ImageDesc;

    fn unpack(raw: &[u8]) -> Result<Self> {
        check_len::<Self>(raw)?;
        Ok(ImageDesc {
            separator: raw[0],
            left: read_u16(raw, 1),
            top: read_u16(raw, 3),
            width: read_u16(raw, 5),
            height: read_u16(raw, 7),
            flags: raw[9].into(),
        })
    }

    fn pack(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(10);
        buf.push(self.separator);
        push_u16(&mut buf, self.left);
        push_u16(&mut buf, self.top);
        push_u16(&mut buf, self.width);
        push_u16(&mut buf, self.height);
        buf.push(self.flags.into());
        buf
    }
}

/// Application extension block
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Application {
    pub introducer: u8,
    pub label: u8,
    pub block_size: u8,
    /// Application identifier (ASCII)
    pub app_id: [u8; 8],
    /// Application authentication code (ASCII)
    pub auth_code: [u8; 3],
    pub sub_block_len: u8,
    pub sub_block_id: u8,
    pub loop_count: u16,
    pub terminator: u8,
}

impl Application {
    /// Create a NETSCAPE2.0 looping extension.
    ///
    /// A loop count of zero means loop forever.
    pub fn with_loop_count(loop_count: u16) -> Self {
        Application {
            introducer: 0x21,
            label: 0xFF,
            block_size: 11,
            app_id: *b"NETSCAPE",
            auth_code: *b"2.0",
            sub_block_len: 3,
            sub_block_id: 1,
            loop_count,
            terminator: 0,
        }
    }

    fn is_looping(&self) -> bool {
        matches!(
            (&self.app_id, &self.auth_code),
            (b"NETSCAPE", b"2.0") | (b"ANIMEXTS", b"1.0")
        )
    }

    /// Get the loop count of a looping extension
    pub fn looping(&self) -> Option<u16> {
        // NOTE: only meaningful in the first frame, before any image
        let sub_block = (self.sub_block_len, self.sub_block_id);
        if self.is_looping() && sub_block == (3, 1) {
            Some(self.loop_count)
        } else {
            None
        }
    }
}

impl Record for Application {
    const BLOCK: BlockName = BlockName::Application;

    fn unpack(raw: &[u8]) -> Result<Self> {
        check_len::<Self>(raw)?;
        let mut app_id = [0; 8];
        app_id.copy_from_slice(&raw[3..11]);
        Ok(Application {
            introducer: raw[0],
            label: raw[1],
            block_size: raw[2],
            app_id,
            auth_code: [raw[11], raw[12], raw[13]],
            sub_block_len: raw[14],
            sub_block_id: raw[15],
            loop_count: read_u16(raw, 16),
            terminator: raw[18],
        })
    }

    fn pack(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(19);
        buf.push(self.introducer);
        buf.push(self.label);
        buf.push(self.block_size);
        buf.extend_from_slice(&self.app_id);
        buf.extend_from_slice(&self.auth_code);
        buf.push(self.sub_block_len);
        buf.push(self.sub_block_id);
        push_u16(&mut buf, self.loop_count);
        buf.push(self.terminator);
        buf
    }
}

/// Comment extension block
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Comment {
    pub introducer: u8,
    pub label: u8,
    /// Comment data sub-blocks (ASCII recommended)
    pub comments: Vec<Vec<u8>>,
}

impl Comment {
    /// Create a comment, split into sub-blocks as needed
    pub fn with_text(text: &[u8]) -> Self {
        Comment {
            introducer: 0x21,
            label: 0xFE,
            comments: text.chunks(0xFF).map(|c| c.to_vec()).collect(),
        }
    }

    /// Get the comment text (all sub-blocks joined)
    pub fn text(&self) -> Vec<u8> {
        self.comments.concat()
    }
}

impl Record for Comment {
    const BLOCK: BlockName = BlockName::Comment;

    fn unpack(raw: &[u8]) -> Result<Self> {
        if raw.len() < 3 {
            return Err(Error::MalformedBlock(Self::BLOCK));
        }
        let comments = split_sub_blocks(&raw[2..])
            .ok_or(Error::MalformedBlock(Self::BLOCK))?;
        Ok(Comment {
            introducer: raw[0],
            label: raw[1],
            comments: comments.into_iter().map(|c| c.to_vec()).collect(),
        })
    }

    fn pack(&self) -> Vec<u8> {
        let mut buf = vec![self.introducer, self.label];
        push_sub_blocks(&mut buf, &self.comments);
        buf
    }
}

/// Plain text extension block.
///
/// The first sub-block holds the text grid; the rest hold text data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlainText {
    pub introducer: u8,
    pub label: u8,
    pub sub_blocks: Vec<Vec<u8>>,
}

impl Record for PlainText {
    const BLOCK: BlockName = BlockName::PlainText;

    fn unpack(raw: &[u8]) -> Result<Self> {
        if raw.len() < 3 {
            return Err(Error::MalformedBlock(Self::BLOCK));
        }
        let sub_blocks = split_sub_blocks(&raw[2..])
            .ok_or(Error::MalformedBlock(Self::BLOCK))?;
        Ok(PlainText {
            introducer: raw[0],
            label: raw[1],
            sub_blocks: sub_blocks.into_iter().map(|b| b.to_vec()).collect(),
        })
    }

    fn pack(&self) -> Vec<u8> {
        let mut buf = vec![self.introducer, self.label];
        push_sub_blocks(&mut buf, &self.sub_blocks);
        buf
    }
}

/// Trailer block
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Trailer {}

impl Record for Trailer {
    const BLOCK: BlockName = BlockName::Trailer;

    fn unpack(raw: &[u8]) -> Result<Self> {
        match raw {
            [TRAILER] => Ok(Trailer {}),
            _ => Err(Error::MalformedBlock(Self::BLOCK)),
        }
    }

    fn pack(&self) -> Vec<u8> {
        vec![TRAILER]
    }
}

/// Global or local color table
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColorTable {
    colors: Vec<[u8; CHANNELS]>,
}

impl ColorTable {
    /// Unpack a color table from a raw block
    pub fn unpack(name: BlockName, raw: &[u8]) -> Result<Self> {
        if raw.len() % CHANNELS != 0 {
            return Err(Error::MalformedBlock(name));
        }
        let colors = raw
            .chunks_exact(CHANNELS)
            .map(|c| [c[0], c[1], c[2]])
            .collect();
        Ok(ColorTable { colors })
    }

    /// Create a color table from RGB entries
    pub fn with_colors(colors: &[[u8; CHANNELS]]) -> Self {
        let colors = colors.to_vec();
        ColorTable { colors }
    }

    /// Pack the color table into a raw block
    pub fn pack(&self) -> Vec<u8> {
        self.colors.concat()
    }

    /// Create a color table from hex colors (`"rrggbb"`)
    pub fn from_hex<S: AsRef<str>>(colors: &[S]) -> Result<Self> {
        let colors = colors
            .iter()
            .map(|c| parse_hex(c.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(ColorTable { colors })
    }

    /// Get colors as hex strings (`"rrggbb"`), in table order
    pub fn to_hex(&self) -> Vec<String> {
        self.colors
            .iter()
            .map(|c| {
                let mut s = String::with_capacity(6);
                for v in c {
                    let _ = write!(s, "{:02x}", v);
                }
                s
            })
            .collect()
    }

    pub fn colors(&self) -> &[[u8; CHANNELS]] {
        &self.colors
    }

    /// Get the number of entries
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Get the packed size field needed to hold the table
    pub fn size_field(&self) -> u8 {
        let len = self.len().max(2).next_power_of_two();
        (len.trailing_zeros() as u8).clamp(1, 8) - 1
    }
}

/// Parse one hex color (`"rrggbb"`)
fn parse_hex(c: &str) -> Result<[u8; CHANNELS]> {
    if c.len() != 6 || !c.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::InvalidColor(c.to_string()));
    }
    let channel = |i: usize| {
        u8::from_str_radix(&c[i..i + 2], 16)
            .map_err(|_| Error::InvalidColor(c.to_string()))
    };
    Ok([channel(0)?, channel(2)?, channel(4)?])
}

#[cfg(test)]
mod test {
    use super::*;

    fn round_trip<R: Record + PartialEq + std::fmt::Debug>(raw: &[u8]) -> R {
        let rec = R::unpack(raw).unwrap();
        let packed = rec.pack();
        assert_eq!(&packed[..], raw);
        assert_eq!(R::unpack(&packed).unwrap(), rec);
        rec
    }

    #[test]
    fn screen_desc() {
        let lsd: LogicalScreenDesc =
            round_trip(&[0x0A, 0x00, 0x0A, 0x00, 0x91, 0x00, 0x00]);
        assert_eq!(lsd.screen_width, 10);
        assert_eq!(lsd.screen_height, 10);
        assert!(lsd.flags.global_color_table);
        assert_eq!(lsd.flags.color_resolution, 1);
        assert!(!lsd.flags.sorted);
        assert_eq!(lsd.flags.table_size, 1);
        assert_eq!(lsd.color_table_size(), 12);
        let lsd: LogicalScreenDesc =
            round_trip(&[0x34, 0x12, 0x01, 0x02, 0x7F, 0x03, 0x31]);
        assert_eq!(lsd.screen_width, 0x1234);
        assert_eq!(lsd.screen_height, 0x0201);
        assert!(lsd.flags.sorted);
        assert_eq!(lsd.flags.color_resolution, 7);
        assert!(!lsd.flags.global_color_table);
        assert_eq!(lsd.color_table_size(), 768);
    }

    #[test]
    fn graphic_control() {
        let gce: GraphicControl =
            round_trip(&[0x21, 0xF9, 4, 0b1110_1011, 0x0A, 0x01, 0x05, 0]);
        assert_eq!(gce.flags.reserved, 0b111);
        assert_eq!(gce.flags.disposal_method, DisposalMethod::Background);
        assert!(gce.flags.user_input);
        assert!(gce.flags.transparent_color);
        assert_eq!(gce.delay_time_cs, 0x010A);
        assert_eq!(gce.transparent_color(), Some(5));
        let gce: GraphicControl =
            round_trip(&[0x21, 0xF9, 0x04, 0b0001_1100, 0, 0, 0, 0]);
        assert_eq!(gce.flags.disposal_method, DisposalMethod::Reserved(7));
        assert_eq!(gce.transparent_color(), None);
        assert_eq!(
            GraphicControl::default().pack(),
            [0x21, 0xF9, 0x04, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn image_desc() {
        let id: ImageDesc =
            round_trip(&[0x2C, 1, 0, 2, 0, 0x0A, 0, 0x0B, 0, 0b1111_1010]);
        assert_eq!((id.left, id.top, id.width, id.height), (1, 2, 10, 11));
        assert!(id.flags.local_color_table);
        assert!(id.flags.interlaced);
        assert!(id.flags.sorted);
        assert_eq!(id.flags.reserved, 0b11);
        assert_eq!(id.flags.table_size, 2);
        assert_eq!(id.color_table_size(), 24);
        assert_eq!(id.image_sz(), 110);
    }

    #[test]
    fn application() {
        let raw = Application::with_loop_count(0x0102).pack();
        assert_eq!(raw.len(), 19);
        assert_eq!(&raw[3..14], b"NETSCAPE2.0");
        assert_eq!(&raw[14..], [3, 1, 0x02, 0x01, 0]);
        let app: Application = round_trip(&raw);
        assert_eq!(app.looping(), Some(0x0102));
        let mut app = app;
        app.app_id = *b"XMP Data";
        app.auth_code = *b"XMP";
        assert_eq!(app.looping(), None);
    }

    #[test]
    fn comment() {
        let c: Comment = round_trip(b"\x21\xFE\x05hello\x00");
        assert_eq!(c.text(), b"hello");
        let c: Comment = round_trip(b"\x21\xFE\x02hi\x03you\x00");
        assert_eq!(c.comments.len(), 2);
        assert_eq!(c.text(), b"hiyou");
        let c: Comment = round_trip(b"\x21\xFE\x00");
        assert!(c.comments.is_empty());
        assert!(Comment::unpack(b"\x21\xFE\x05hell").is_err());
        assert!(Comment::unpack(b"\x21\xFE\x01a\x00\x00").is_err());
        let long = vec![b'x'; 300];
        let c = Comment::with_text(&long);
        assert_eq!(c.comments.len(), 2);
        let raw = c.pack();
        assert_eq!(raw.len(), 2 + 1 + 255 + 1 + 45 + 1);
        assert_eq!(Comment::unpack(&raw).unwrap().text(), long);
    }

    #[test]
    fn oversized_sub_blocks() {
        let mut c = Comment::with_text(b"");
        c.comments = vec![vec![b'x'; 300], vec![], b"yz".to_vec()];
        let raw = c.pack();
        assert_eq!(raw.len(), 2 + 1 + 255 + 1 + 45 + 1 + 2 + 1);
        assert_eq!(raw[2], 255);
        assert_eq!(raw[258], 45);
        assert_eq!(raw[304], 2);
        let c2 = Comment::unpack(&raw).unwrap();
        assert_eq!(c2.comments.len(), 3);
        assert_eq!(c2.text(), c.text());
    }

    #[test]
    fn plain_text() {
        let mut raw = vec![0x21, 0x01, 12];
        raw.extend_from_slice(&[0, 0, 0, 0, 8, 0, 8, 0, 8, 8, 1, 0]);
        raw.extend_from_slice(b"\x02Hi\x00");
        let pt: PlainText = round_trip(&raw);
        assert_eq!(pt.sub_blocks.len(), 2);
        assert_eq!(pt.sub_blocks[1], b"Hi");
    }

    #[test]
    fn header() {
        let h: Header = round_trip(b"GIF89a");
        assert!(h.is_gif());
        let h: Header = round_trip(b"GIF88b");
        assert!(!h.is_gif());
        assert!(Header::unpack(b"GIF8").is_err());
        assert_eq!(Header::default().pack(), b"GIF89a");
    }

    #[test]
    fn trailer() {
        assert!(Trailer::unpack(&[0x3B]).is_ok());
        assert!(Trailer::unpack(&[0x3B, 0x3B]).is_err());
        assert!(Trailer::unpack(&[0x00]).is_err());
    }

    #[test]
    fn color_table() {
        let raw = [0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00, 0xFF];
        let tbl =
            ColorTable::unpack(BlockName::GlobalColorTable, &raw).unwrap();
        assert_eq!(tbl.len(), 3);
        let hex = tbl.to_hex();
        assert_eq!(hex, ["ffffff", "ff0000", "0000ff"]);
        let tbl2 = ColorTable::from_hex(&hex).unwrap();
        assert_eq!(tbl2, tbl);
        assert_eq!(tbl2.pack(), raw);
        let name = BlockName::LocalColorTable;
        assert!(ColorTable::unpack(name, &raw[1..]).is_err());
        assert!(ColorTable::from_hex(&["12345"]).is_err());
        assert!(ColorTable::from_hex(&["+12345"]).is_err());
        assert!(ColorTable::from_hex(&["gg0000"]).is_err());
        let tbl = ColorTable::from_hex(&["A0b1C2"]).unwrap();
        assert_eq!(tbl.colors(), [[0xA0, 0xB1, 0xC2]]);
    }

    #[test]
    fn size_field() {
        let tbl = |n| ColorTable::with_colors(&vec![[0; 3]; n]);
        assert_eq!(tbl(0).size_field(), 0);
        assert_eq!(tbl(2).size_field(), 0);
        assert_eq!(tbl(3).size_field(), 1);
        assert_eq!(tbl(4).size_field(), 1);
        assert_eq!(tbl(5).size_field(), 2);
        assert_eq!(tbl(16).size_field(), 3);
        assert_eq!(tbl(17).size_field(), 4);
        assert_eq!(tbl(256).size_field(), 7);
    }

    #[test]
    fn wrong_length() {
        assert!(matches!(
            LogicalScreenDesc::unpack(&[0; 6]),
            Err(Error::MalformedBlock(BlockName::LogicalScreenDesc))
        ));
        assert!(GraphicControl::unpack(&[0; 9]).is_err());
        assert!(ImageDesc::unpack(&[0; 11]).is_err());
        assert!(Application::unpack(&[0; 18]).is_err());
    }
}
