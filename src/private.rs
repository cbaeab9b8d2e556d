// private.rs
//
// Copyright (c) 2026  Douglas Lau
//
//! Private module for top-level items
use crate::block::{
    color_table_size, BlockName, Extension, Frame, EXTENSION_INTRODUCER,
    IMAGE_SEPARATOR, TRAILER,
};
use crate::field::{
    split_sub_blocks, ColorTable, Header, ImageDesc, LogicalScreenDesc, Record,
};
use crate::{decode, encode, lzw, Error, Result};
use std::io::{Read, Write};

/// Maximum number of entries in a color table
const MAX_COLORS: usize = 256;

/// GIF document, held as raw blocks
///
/// Blocks are kept byte-for-byte as parsed, so serializing an unchanged
/// document reproduces its source exactly.  Structured access goes through
/// [records] and [fields], which unpack a raw block and pack it back
/// wholesale.
///
/// ## Example: Read the delay of each frame
/// ```
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// # let buf = &[
/// #   0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x02, 0x00,
/// #   0x02, 0x00, 0x80, 0x01, 0x00, 0x00, 0x00, 0x00,
/// #   0xff, 0xff, 0xff, 0x21, 0xF9, 0x04, 0x00, 0x0A,
/// #   0x00, 0x00, 0x00, 0x2c, 0x00, 0x00, 0x00, 0x00,
/// #   0x02, 0x00, 0x02, 0x00, 0x00, 0x02, 0x03, 0x0c,
/// #   0x10, 0x05, 0x00, 0x3b,
/// # ][..];
/// use gifraffe::{Field, FieldValue, Gif};
///
/// let mut gif = Gif::from_bytes(buf)?;
/// while gif.advance().is_ok() {
///     let delay = gif.field(Field::DelayTime)?;
///     assert_eq!(delay, FieldValue::Int(10));
/// }
/// assert_eq!(gif.to_bytes(), buf);
/// # Ok(())
/// # }
/// ```
///
/// [fields]: struct.Gif.html#method.field
/// [records]: struct.Gif.html#method.record
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Gif {
    /// Header block
    header: Vec<u8>,
    /// Logical screen descriptor block
    screen_desc: Vec<u8>,
    /// Global color table (may be empty)
    global_color_table: Vec<u8>,
    /// All frames, in stream order
    frames: Vec<Frame>,
    /// Extensions after the last frame
    trailing_extensions: Vec<Extension>,
    /// Current frame index (`None` before the first advance)
    cursor: Option<usize>,
}

impl Default for Gif {
    fn default() -> Self {
        Gif::new(
            Header::default().pack(),
            LogicalScreenDesc::default().pack(),
            vec![0; color_table_size(0)],
            vec![],
            vec![],
        )
    }
}

impl TryFrom<&[u8]> for Gif {
    type Error = Error;

    fn try_from(buf: &[u8]) -> Result<Self> {
        decode::parse(buf)
    }
}

impl Gif {
    pub(crate) fn new(
        header: Vec<u8>,
        screen_desc: Vec<u8>,
        global_color_table: Vec<u8>,
        frames: Vec<Frame>,
        trailing_extensions: Vec<Extension>,
    ) -> Self {
        Gif {
            header,
            screen_desc,
            global_color_table,
            frames,
            trailing_extensions,
            cursor: None,
        }
    }

    /// Parse a document from a complete byte buffer
    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        decode::parse(buf)
    }

    /// Read all bytes from a reader and parse a document
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut buf = vec![];
        reader.read_to_end(&mut buf)?;
        decode::parse(&buf)
    }

    /// Replace the document with one parsed from a byte buffer.
    ///
    /// On error, the document is left unchanged.
    pub fn reload(&mut self, buf: &[u8]) -> Result<()> {
        *self = decode::parse(buf)?;
        Ok(())
    }

    /// Serialize all blocks
    pub fn to_bytes(&self) -> Vec<u8> {
        encode::blocks(self).collect::<Vec<_>>().concat()
    }

    /// Serialize all blocks to a writer
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        encode::Encoder::new(writer).encode(self)
    }

    pub fn header(&self) -> &[u8] {
        &self.header
    }

    pub fn screen_desc(&self) -> &[u8] {
        &self.screen_desc
    }

    pub fn global_color_table(&self) -> &[u8] {
        &self.global_color_table
    }

    /// Get all frames, in stream order
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Get extensions following the last frame
    pub fn trailing_extensions(&self) -> &[Extension] {
        &self.trailing_extensions
    }

    pub fn trailer(&self) -> &[u8] {
        &[TRAILER]
    }

    /// Get the number of frames
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Get the current frame index
    pub fn frame(&self) -> usize {
        self.cursor.unwrap_or_default()
    }

    /// Set the current frame index
    pub fn set_frame(&mut self, index: usize) -> Result<()> {
        let count = self.frame_count();
        if index < count {
            self.cursor = Some(index);
            Ok(())
        } else {
            Err(Error::FrameOutOfRange { index, count })
        }
    }

    /// Advance to the next frame, returning its index.
    ///
    /// Once the last frame is reached, `Error::FrameOutOfRange` is returned
    /// and the cursor stays put.
    pub fn advance(&mut self) -> Result<usize> {
        let index = self.cursor.map_or(0, |c| c + 1);
        self.set_frame(index)?;
        Ok(index)
    }

    /// Get the current frame
    pub fn current_frame(&self) -> Option<&Frame> {
        self.frames.get(self.frame())
    }

    /// Get a raw block by name.
    ///
    /// Frame blocks are taken from the current frame.
    pub fn block(&self, name: BlockName) -> Result<&[u8]> {
        match name {
            BlockName::Header => Ok(&self.header),
            BlockName::LogicalScreenDesc => Ok(&self.screen_desc),
            BlockName::GlobalColorTable => Ok(&self.global_color_table),
            BlockName::Trailer => Ok(self.trailer()),
            _ => self
                .current_frame()
                .and_then(|f| f.block(name))
                .ok_or(Error::MissingBlock(name)),
        }
    }

    /// Replace a raw block by name.
    ///
    /// Frame blocks are replaced in the current frame; an extension which is
    /// not present is added.
    pub fn set_block(&mut self, name: BlockName, raw: Vec<u8>) -> Result<()> {
        check_block(name, &raw)?;
        match name {
            BlockName::Header => self.header = raw,
            BlockName::LogicalScreenDesc => {
                let lsd = LogicalScreenDesc::unpack(&raw)?;
                if lsd.color_table_size() != self.global_color_table.len() {
                    return Err(Error::MalformedBlock(name));
                }
                self.screen_desc = raw;
            }
            BlockName::GlobalColorTable => {
                let lsd: LogicalScreenDesc = self.record()?;
                if lsd.color_table_size() != raw.len() {
                    return Err(Error::MalformedBlock(name));
                }
                self.global_color_table = raw;
            }
            BlockName::Trailer => (),
            BlockName::ImageDesc => {
                let desc = ImageDesc::unpack(&raw)?;
                let frame = self.current_frame_mut(name)?;
                if desc.color_table_size() != frame.local_color_table.len() {
                    return Err(Error::MalformedBlock(name));
                }
                frame.image_desc = raw;
            }
            BlockName::LocalColorTable => {
                let desc: ImageDesc = self.record()?;
                if desc.color_table_size() != raw.len() {
                    return Err(Error::MalformedBlock(name));
                }
                self.current_frame_mut(name)?.local_color_table = raw;
            }
            _ => {
                if !self.current_frame_mut(name)?.set_block(name, raw) {
                    return Err(Error::MalformedBlock(name));
                }
            }
        }
        Ok(())
    }

    /// Get the current frame for replacing a block
    fn current_frame_mut(&mut self, name: BlockName) -> Result<&mut Frame> {
        let index = self.frame();
        self.frames.get_mut(index).ok_or(Error::MissingBlock(name))
    }

    /// Unpack a record from its block
    pub fn record<R: Record>(&self) -> Result<R> {
        R::unpack(self.block(R::BLOCK)?)
    }

    /// Pack a record, replacing its block
    pub fn set_record<R: Record>(&mut self, rec: &R) -> Result<()> {
        self.set_block(R::BLOCK, rec.pack())
    }

    /// Get a global or local color table
    pub fn color_table(&self, name: BlockName) -> Result<ColorTable> {
        match name {
            BlockName::GlobalColorTable | BlockName::LocalColorTable => {
                ColorTable::unpack(name, self.block(name)?)
            }
            _ => Err(Error::MissingBlock(name)),
        }
    }

    /// Replace a global or local color table.
    ///
    /// The table is padded with black to the next power-of-two size, and the
    /// flags of its descriptor are updated to match.  An empty global table
    /// is written as two black entries with its flag cleared.
    pub fn set_color_table(
        &mut self,
        name: BlockName,
        table: &ColorTable,
    ) -> Result<()> {
        if table.len() > MAX_COLORS {
            return Err(Error::MalformedBlock(name));
        }
        let present = !table.is_empty();
        let size_field = if present { table.size_field() } else { 0 };
        let mut raw = table.pack();
        match name {
            BlockName::GlobalColorTable => {
                let mut lsd: LogicalScreenDesc = self.record()?;
                lsd.flags.global_color_table = present;
                lsd.flags.table_size = size_field;
                raw.resize(lsd.color_table_size(), 0);
                self.screen_desc = lsd.pack();
                self.global_color_table = raw;
            }
            BlockName::LocalColorTable => {
                let mut desc: ImageDesc = self.record()?;
                desc.flags.local_color_table = present;
                desc.flags.table_size = size_field;
                raw.resize(desc.color_table_size(), 0);
                let frame = self.current_frame_mut(name)?;
                frame.image_desc = desc.pack();
                frame.local_color_table = raw;
            }
            _ => return Err(Error::MalformedBlock(name)),
        }
        Ok(())
    }

    /// Decompress color indices of the current frame
    pub fn indices(&self) -> Result<Vec<u8>> {
        lzw::decode(self.block(BlockName::ImageData)?)
    }

    /// Compress color indices, replacing the image data of the current
    /// frame.
    ///
    /// The minimum code size is chosen from the local color table, or the
    /// global color table if there is none.
    pub fn set_indices(&mut self, indices: &[u8]) -> Result<()> {
        let mut table = self.color_table(BlockName::LocalColorTable)?;
        if table.is_empty() {
            let lsd: LogicalScreenDesc = self.record()?;
            if lsd.flags.global_color_table {
                table = self.color_table(BlockName::GlobalColorTable)?;
            }
        }
        let data = lzw::encode(indices, Some(&table))?;
        self.set_block(BlockName::ImageData, data)
    }

    /// Decompress and compress image data of every frame
    pub fn recompress(&mut self) -> Result<()> {
        let mut gif = self.clone();
        for index in 0..gif.frame_count() {
            gif.cursor = Some(index);
            let indices = gif.indices()?;
            gif.set_indices(&indices)?;
            trace!("recompressed frame {}", index);
        }
        gif.cursor = self.cursor;
        *self = gif;
        Ok(())
    }
}

/// Check that a raw block would be parsed back in place
fn check_block(name: BlockName, raw: &[u8]) -> Result<()> {
    let valid = match name {
        BlockName::Trailer => raw == [TRAILER],
        BlockName::ImageDesc => raw.first() == Some(&IMAGE_SEPARATOR),
        BlockName::ImageData => {
            raw.len() > 1 && split_sub_blocks(&raw[1..]).is_some()
        }
        _ => match name.extension_code() {
            Some(code) => {
                raw.len() > 2
                    && raw[0] == EXTENSION_INTRODUCER
                    && raw[1] == u8::from(code)
                    && split_sub_blocks(&raw[2..]).is_some()
            }
            None => true,
        },
    };
    let sized = name.size().map_or(true, |sz| sz == raw.len());
    if valid && sized {
        Ok(())
    } else {
        Err(Error::MalformedBlock(name))
    }
}
