// encode.rs
//
// Copyright (c) 2026  Douglas Lau
//
//! Serializer
use crate::error::Result;
use crate::private::Gif;
use std::io::{BufWriter, Write};
use std::iter::once;

/// Get all raw blocks of a document, in stream order
pub(crate) fn blocks(gif: &Gif) -> impl Iterator<Item = &[u8]> {
    once(gif.header())
        .chain(once(gif.screen_desc()))
        .chain(once(gif.global_color_table()))
        .chain(gif.frames().iter().flat_map(|f| f.blocks()))
        .chain(gif.trailing_extensions().iter().map(|e| e.raw()))
        .chain(once(gif.trailer()))
}

/// Block serializer
pub struct Encoder<W: Write> {
    writer: BufWriter<W>,
}

impl<W: Write> Encoder<W> {
    /// Create a new serializer
    pub fn new(w: W) -> Self {
        Encoder {
            writer: BufWriter::new(w),
        }
    }

    /// Write all blocks of a document
    pub fn encode(&mut self, gif: &Gif) -> Result<()> {
        let mut len = 0;
        for block in blocks(gif) {
            self.writer.write_all(block)?;
            len += block.len();
        }
        self.writer.flush()?;
        debug!("encoded GIF: {} frames, {} bytes", gif.frame_count(), len);
        Ok(())
    }
}
