// decode.rs
//
// Copyright (c) 2026  Douglas Lau
//
//! Block parser
use crate::block::*;
use crate::error::{Error, Result};
use crate::field::{ImageDesc, LogicalScreenDesc, Record};
use crate::private::Gif;

/// Parser state: source buffer and position of the next block
#[derive(Clone, Copy, Debug)]
struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor at the start of a buffer
    fn new(buf: &'a [u8]) -> Self {
        Cursor { buf, pos: 0 }
    }

    /// Get the bytes remaining after the cursor
    fn remaining(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }

    /// Peek at a byte after the cursor
    fn peek(&self, offset: usize) -> Option<u8> {
        self.remaining().get(offset).copied()
    }

    /// Take one block of `len` bytes
    fn take(self, name: BlockName, len: usize) -> Result<(&'a [u8], Self)> {
        match self.remaining().get(..len) {
            Some(block) => {
                debug!("  block  : {} @{} {:?}", name, self.pos, len);
                let pos = self.pos + len;
                Ok((block, Cursor { pos, ..self }))
            }
            None => Err(Error::UnexpectedEndOfFile),
        }
    }

    /// Get the length of a sub-block chain starting at `offset`, including
    /// the block terminator
    fn sub_blocks_len(&self, offset: usize) -> Result<usize> {
        let buf = self.remaining();
        let mut i = offset;
        loop {
            let sz = *buf.get(i).ok_or(Error::UnexpectedEndOfFile)? as usize;
            i += sz + 1;
            if sz == 0 {
                break;
            }
            trace!("sub-block: {:?}", sz);
        }
        if i <= buf.len() {
            Ok(i - offset)
        } else {
            Err(Error::UnexpectedEndOfFile)
        }
    }
}

/// Parse a complete GIF document
pub(crate) fn parse(buf: &[u8]) -> Result<Gif> {
    let cur = Cursor::new(buf);
    let (header, cur) = take_fixed(cur, BlockName::Header)?;
    let (screen_desc, cur) = take_fixed(cur, BlockName::LogicalScreenDesc)?;
    let sz = LogicalScreenDesc::unpack(screen_desc)?.color_table_size();
    let (global_color_table, mut cur) =
        cur.take(BlockName::GlobalColorTable, sz)?;
    let mut frames = vec![];
    let (pos, err) = loop {
        match parse_frame(cur) {
            Ok((frame, next)) => {
                debug!("frame {}: {} bytes", frames.len(), frame.size());
                frames.push(frame);
                cur = next;
            }
            Err(e) => break (cur.pos, e),
        }
    };
    let (trailing_extensions, cur) =
        parse_extensions(cur).unwrap_or((vec![], cur));
    if cur.remaining() != [TRAILER] {
        warn!("frame loop stopped @{}: {}", pos, err);
        return Err(Error::InvalidTrailer(cur.remaining().to_vec()));
    }
    if !trailing_extensions.is_empty() {
        debug!("{} trailing extensions @{}", trailing_extensions.len(), pos);
    }
    info!("parsed GIF: {} frames, {} bytes", frames.len(), buf.len());
    Ok(Gif::new(
        header.to_vec(),
        screen_desc.to_vec(),
        global_color_table.to_vec(),
        frames,
        trailing_extensions,
    ))
}

/// Take a fixed-length block
fn take_fixed(cur: Cursor, name: BlockName) -> Result<(&[u8], Cursor)> {
    cur.take(name, name.size().unwrap_or_default())
}

/// Parse all blocks of one frame
fn parse_frame(cur: Cursor) -> Result<(Frame, Cursor)> {
    let (extensions, cur) = parse_extensions(cur)?;
    if cur.peek(0) != Some(IMAGE_SEPARATOR) {
        return Err(Error::MalformedBlock(BlockName::ImageDesc));
    }
    let (image_desc, cur) = take_fixed(cur, BlockName::ImageDesc)?;
    let sz = ImageDesc::unpack(image_desc)?.color_table_size();
    let (local_color_table, cur) = cur.take(BlockName::LocalColorTable, sz)?;
    // LZW minimum code size, then data sub-blocks
    let sz = 1 + cur.sub_blocks_len(1)?;
    let (image_data, cur) = cur.take(BlockName::ImageData, sz)?;
    let frame = Frame {
        extensions,
        image_desc: image_desc.to_vec(),
        local_color_table: local_color_table.to_vec(),
        image_data: image_data.to_vec(),
    };
    Ok((frame, cur))
}

/// Parse extension blocks until something else is found
fn parse_extensions(mut cur: Cursor) -> Result<(Vec<Extension>, Cursor)> {
    let mut extensions = vec![];
    while cur.peek(0) == Some(EXTENSION_INTRODUCER) {
        let label = cur.peek(1).ok_or(Error::UnexpectedEndOfFile)?;
        let code = ExtensionCode::from(label);
        // introducer and label, then sub-blocks
        let sz = 2 + cur.sub_blocks_len(2)?;
        let (raw, next) = cur.take(code.block(), sz)?;
        if let Some(fixed) = code.block().size() {
            if fixed != sz {
                warn!("{} has unexpected length: {}", code.block(), sz);
            }
        }
        extensions.push(Extension::with_raw(raw.to_vec()));
        cur = next;
    }
    Ok((extensions, cur))
}
