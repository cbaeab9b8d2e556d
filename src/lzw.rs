// lzw.rs
//
// Copyright (c) 2026  Douglas Lau
//
//! Lempel-Ziv-Welch compression for GIF.
//!
//! Both directions are single-pass iterators: a [Compressor] pulls color
//! indices and yields compressed bytes, a [BlockEncoder] frames those bytes
//! into an image data block, and a [Decompressor] pulls codes from an image
//! data block and yields color indices.
//!
//! [BlockEncoder]: struct.BlockEncoder.html
//! [Compressor]: struct.Compressor.html
//! [Decompressor]: struct.Decompressor.html
use crate::error::{Error, Result};
use crate::field::ColorTable;
use std::cmp::Ordering;
use std::collections::VecDeque;
use std::ops::AddAssign;

/// Maximum length of a data sub-block
const SUB_BLOCK_SZ: usize = 0xFF;

/// Code Bits
#[derive(Clone, Copy, Debug, PartialEq)]
struct Bits(u8);

impl From<u8> for Bits {
    fn from(bits: u8) -> Self {
        Bits(bits.min(Self::MAX.0))
    }
}

impl From<Bits> for u8 {
    fn from(bits: Bits) -> Self {
        bits.0
    }
}

impl AddAssign<u8> for Bits {
    fn add_assign(&mut self, rhs: u8) {
        self.0 = (self.0 + rhs).min(Self::MAX.0)
    }
}

impl Bits {
    /// Maximum code bits allowed for GIF
    const MAX: Self = Bits(12);

    /// Get the number of entries
    fn entries(self) -> u16 {
        1 << (self.0 as u16)
    }

    /// Get the bit mask
    fn mask(self) -> u32 {
        (1 << (self.0 as u32)) - 1
    }
}

/// Code type
type Code = u16;

/// Node for code dictionary
trait Node {
    /// Create a new node
    fn new(next: Option<Code>, byte: u8) -> Self;

    /// Get the byte value
    fn byte(self) -> u8;
}

/// Node for Compressor
#[derive(Clone, Copy, Debug)]
struct CNode {
    /// Next node code
    next: Option<Code>,
    /// Left node code
    left: Option<Code>,
    /// Right node code
    right: Option<Code>,
    /// Byte value
    byte: u8,
}

/// Node for Decompressor
#[derive(Clone, Copy, Debug)]
struct DNode {
    /// Prefix node code
    prefix: Option<Code>,
    /// Byte value
    byte: u8,
}

/// Code dictionary trie
#[derive(Debug)]
struct Trie<N: Node> {
    /// Table of codes
    table: Vec<N>,
    /// Minimum code bits
    min_code_bits: u8,
}

impl Node for CNode {
    fn new(next: Option<Code>, byte: u8) -> Self {
        CNode {
            next,
            left: None,
            right: None,
            byte,
        }
    }

    fn byte(self) -> u8 {
        self.byte
    }
}

impl Node for DNode {
    fn new(prefix: Option<Code>, byte: u8) -> Self {
        DNode { prefix, byte }
    }

    fn byte(self) -> u8 {
        self.byte
    }
}

impl CNode {
    /// Get a link code
    fn link(&self, ordering: Ordering) -> Option<Code> {
        match ordering {
            Ordering::Less => self.left,
            Ordering::Equal => self.next,
            Ordering::Greater => self.right,
        }
    }

    /// Set a link code
    fn set_link(&mut self, ordering: Ordering, code: Code) {
        match ordering {
            Ordering::Less => self.left = Some(code),
            Ordering::Equal => self.next = Some(code),
            Ordering::Greater => self.right = Some(code),
        }
    }
}

impl<N: Node> Trie<N> {
    /// Create a new code dictionary
    fn new(min_code_bits: u8) -> Self {
        let mut trie = Trie {
            table: Vec::with_capacity(Bits::MAX.entries().into()),
            min_code_bits,
        };
        trie.reset();
        trie
    }

    /// Get the clear code
    fn clear_code(&self) -> Code {
        1 << self.min_code_bits
    }

    /// Get the end code
    fn end_code(&self) -> Code {
        self.clear_code() + 1
    }

    /// Get the next available code
    fn next_code(&self) -> Code {
        self.table.len() as Code
    }

    /// Check if the dictionary is full
    fn is_full(&self) -> bool {
        self.next_code() >= Bits::MAX.entries()
    }

    /// Reset the dictionary
    fn reset(&mut self) {
        self.table.clear();
        for byte in 0..self.clear_code() {
            self.push_node(None, byte as u8);
        }
        self.push_node(None, 0); // clear code
        self.push_node(None, 0); // end code
    }

    /// Push a node into the dictionary
    fn push_node(&mut self, next: Option<Code>, byte: u8) {
        self.table.push(N::new(next, byte))
    }

    /// Get a mutable node
    fn node_mut(&mut self, code: Code) -> &mut N {
        debug_assert!(code < self.next_code());
        &mut self.table[code as usize]
    }
}

impl Trie<CNode> {
    /// Search for a node, inserting it if not found
    fn search_insert(&mut self, code: Option<Code>, byte: u8) -> Option<Code> {
        match code {
            Some(code) => self.insert(code, byte),
            None => Some(byte as Code),
        }
    }

    /// Insert a node, returning its code if it was already present
    fn insert(&mut self, code: Code, byte: u8) -> Option<Code> {
        let next_code = self.next_code();
        let mut node = self.node_mut(code);
        let mut ordering = Ordering::Equal;
        while let Some(code) = node.link(ordering) {
            node = self.node_mut(code);
            ordering = byte.cmp(&node.byte());
            if ordering == Ordering::Equal {
                return Some(code);
            }
        }
        node.set_link(ordering, next_code);
        self.push_node(None, byte);
        None
    }
}

impl Trie<DNode> {
    /// Lookup the first byte of a code
    fn first_byte(&self, code: Code) -> u8 {
        let mut node = self.table[code as usize];
        while let Some(code) = node.prefix {
            node = self.table[code as usize];
        }
        node.byte()
    }

    /// Decompress a code into a buffer (reversed)
    fn decompress_reversed(&self, code: Code, buffer: &mut Vec<u8>) {
        let mut node = self.table[code as usize];
        while let Some(code) = node.prefix {
            buffer.push(node.byte());
            node = self.table[code as usize];
        }
        buffer.push(node.byte());
    }
}

/// Get the LZW minimum code size for a color table length (entries).
///
/// This is the bit length of the largest index, but never less than 2.
pub fn min_code_size(table_len: usize) -> u8 {
    let max_idx = table_len.saturating_sub(1);
    let bits = usize::BITS - max_idx.leading_zeros();
    (bits as u8).clamp(2, 8)
}

/// Stage of compression
#[derive(Clone, Copy, Debug, PartialEq)]
enum Stage {
    /// Clear code not yet packed
    Start,
    /// Packing data codes
    Data,
    /// End code packed
    Done,
}

/// LZW Data Compressor.
///
/// An `Iterator` of compressed bytes (without sub-block framing), pulling
/// color indices from another `Iterator`.
pub struct Compressor<I: Iterator<Item = u8>> {
    /// Color indices
    symbols: I,
    /// Code dictionary
    trie: Trie<CNode>,
    /// Minimum code bits
    min_code_bits: u8,
    /// Current code bits
    code_bits: Bits,
    /// Code of pending prefix
    prefix: Option<Code>,
    /// Compression stage
    stage: Stage,
    /// Current code
    code: u32,
    /// Number of bits in current code
    n_bits: u8,
    /// Packed bytes ready for output
    bytes: VecDeque<u8>,
}

impl<I: Iterator<Item = u8>> Compressor<I> {
    /// Create a new compressor
    pub fn new(min_code_bits: u8, symbols: I) -> Self {
        let min_code_bits = min_code_bits.clamp(2, 8);
        Compressor {
            symbols,
            trie: Trie::new(min_code_bits),
            min_code_bits,
            code_bits: Bits::from(min_code_bits + 1),
            prefix: None,
            stage: Stage::Start,
            code: 0,
            n_bits: 0,
            bytes: VecDeque::new(),
        }
    }

    /// Pack a code
    fn pack(&mut self, code: Code) {
        self.code |= (code as u32) << self.n_bits;
        self.n_bits += u8::from(self.code_bits);
        while self.n_bits >= 8 {
            self.bytes.push_back(self.code as u8);
            self.code >>= 8;
            self.n_bits -= 8;
        }
    }

    /// Pack any remaining bits, padded with zeros
    fn pack_finish(&mut self) {
        if self.n_bits > 0 {
            self.bytes.push_back(self.code as u8);
            self.code = 0;
            self.n_bits = 0;
        }
    }

    /// Compress one color index
    fn compress(&mut self, byte: u8) -> Result<()> {
        if byte as Code >= self.trie.clear_code() {
            return Err(Error::InvalidColorIndex(byte));
        }
        match self.trie.search_insert(self.prefix, byte) {
            Some(code) => self.prefix = Some(code),
            None => {
                if let Some(code) = self.prefix {
                    self.pack(code);
                }
                self.prefix = Some(byte as Code);
                let next_code = self.trie.next_code();
                if self.trie.is_full() {
                    trace!("LZW table full at {} codes", next_code);
                    self.pack(self.trie.clear_code());
                    self.trie.reset();
                    self.code_bits = Bits::from(self.min_code_bits + 1);
                } else if next_code > self.code_bits.entries() {
                    self.code_bits += 1;
                }
            }
        }
        Ok(())
    }

    /// Pack codes until a byte is ready
    fn advance(&mut self) -> Result<()> {
        match self.stage {
            Stage::Start => {
                self.pack(self.trie.clear_code());
                self.stage = Stage::Data;
            }
            Stage::Data => match self.symbols.next() {
                Some(byte) => self.compress(byte)?,
                None => {
                    if let Some(code) = self.prefix.take() {
                        self.pack(code);
                    }
                    self.pack(self.trie.end_code());
                    self.pack_finish();
                    self.stage = Stage::Done;
                }
            },
            Stage::Done => (),
        }
        Ok(())
    }
}

impl<I: Iterator<Item = u8>> Iterator for Compressor<I> {
    type Item = Result<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(byte) = self.bytes.pop_front() {
                return Some(Ok(byte));
            }
            if self.stage == Stage::Done {
                return None;
            }
            if let Err(e) = self.advance() {
                self.stage = Stage::Done;
                self.bytes.clear();
                return Some(Err(e));
            }
        }
    }
}

/// Image data block encoder.
///
/// An `Iterator` of all bytes in an image data block: LZW minimum code size,
/// compressed data sub-blocks and block terminator.
pub struct BlockEncoder<I: Iterator<Item = u8>> {
    /// Compressed data
    compressor: Compressor<I>,
    /// Minimum code size not yet produced
    min_code_size: Option<u8>,
    /// Current sub-block
    block: Vec<u8>,
    /// Position within current sub-block
    pos: usize,
    /// Block terminator produced
    done: bool,
}

impl<I: Iterator<Item = u8>> BlockEncoder<I> {
    /// Create a new image data block encoder
    pub fn new(min_code_size: u8, symbols: I) -> Self {
        let compressor = Compressor::new(min_code_size, symbols);
        let min_code_size = Some(compressor.min_code_bits);
        BlockEncoder {
            compressor,
            min_code_size,
            block: Vec::with_capacity(SUB_BLOCK_SZ),
            pos: 0,
            done: false,
        }
    }

    /// Fill the next sub-block, returning its length
    fn fill_block(&mut self) -> Result<u8> {
        self.block.clear();
        self.pos = 0;
        while self.block.len() < SUB_BLOCK_SZ {
            match self.compressor.next() {
                Some(Ok(byte)) => self.block.push(byte),
                Some(Err(e)) => {
                    self.block.clear();
                    return Err(e);
                }
                None => break,
            }
        }
        trace!("sub-block: {}", self.block.len());
        Ok(self.block.len() as u8)
    }
}

impl<I: Iterator<Item = u8>> Iterator for BlockEncoder<I> {
    type Item = Result<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(sz) = self.min_code_size.take() {
            return Some(Ok(sz));
        }
        if let Some(byte) = self.block.get(self.pos) {
            self.pos += 1;
            return Some(Ok(*byte));
        }
        if self.done {
            return None;
        }
        let len = self.fill_block();
        // an empty sub-block is the block terminator
        if !matches!(len, Ok(l) if l > 0) {
            self.done = true;
        }
        Some(len)
    }
}

/// Reader for data sub-blocks
#[derive(Debug)]
struct SubBlocks<'a> {
    /// Sub-block data
    buf: &'a [u8],
    /// Position within buffer
    pos: usize,
    /// Bytes remaining in current sub-block
    remaining: usize,
    /// Block terminator found
    done: bool,
}

impl<'a> SubBlocks<'a> {
    /// Create a sub-block reader
    fn new(buf: &'a [u8]) -> Self {
        SubBlocks {
            buf,
            pos: 0,
            remaining: 0,
            done: false,
        }
    }

    /// Read the next data byte, skipping sub-block lengths
    fn next_byte(&mut self) -> Result<Option<u8>> {
        while self.remaining == 0 {
            if self.done {
                return Ok(None);
            }
            let len =
                *self.buf.get(self.pos).ok_or(Error::IncompleteImageData)?;
            self.pos += 1;
            self.remaining = len.into();
            self.done = len == 0;
        }
        let byte = *self.buf.get(self.pos).ok_or(Error::IncompleteImageData)?;
        self.pos += 1;
        self.remaining -= 1;
        Ok(Some(byte))
    }
}

/// LZW Data Decompressor.
///
/// An `Iterator` of color indices, decoded from an image data block.
#[derive(Debug)]
pub struct Decompressor<'a> {
    /// Data sub-blocks
    sub_blocks: SubBlocks<'a>,
    /// Code dictionary
    trie: Trie<DNode>,
    /// Minimum code bits
    min_code_bits: u8,
    /// Current code bits
    code_bits: Bits,
    /// Last code
    last: Option<Code>,
    /// Current code
    code: u32,
    /// Number of bits in current code
    n_bits: u8,
    /// Decompressed indices (reversed)
    pending: Vec<u8>,
    /// End code found (or error)
    done: bool,
}

impl<'a> Decompressor<'a> {
    /// Create a new decompressor for an image data block.
    ///
    /// The first byte of the block is the LZW minimum code size.
    pub fn new(block: &'a [u8]) -> Result<Self> {
        let (min_code_bits, data) = match block.split_first() {
            Some((sz, data)) => (*sz, data),
            None => return Err(Error::IncompleteImageData),
        };
        if !(2..=8).contains(&min_code_bits) {
            return Err(Error::InvalidCodeSize(min_code_bits));
        }
        Ok(Decompressor {
            sub_blocks: SubBlocks::new(data),
            trie: Trie::new(min_code_bits),
            min_code_bits,
            code_bits: Bits::from(min_code_bits + 1),
            last: None,
            code: 0,
            n_bits: 0,
            pending: Vec::with_capacity(SUB_BLOCK_SZ),
            done: false,
        })
    }

    /// Unpack the next code
    fn unpack(&mut self) -> Result<Option<Code>> {
        let b = u8::from(self.code_bits);
        while self.n_bits < b {
            match self.sub_blocks.next_byte()? {
                Some(byte) => {
                    self.code |= (byte as u32) << self.n_bits;
                    self.n_bits += 8;
                }
                None => return Ok(None),
            }
        }
        let code = (self.code & self.code_bits.mask()) as Code;
        self.code >>= b;
        self.n_bits -= b;
        Ok(Some(code))
    }

    /// Decompress one code
    fn decompress_code(&mut self, code: Code) -> Result<()> {
        if code == self.trie.clear_code() {
            trace!("LZW clear at {} codes", self.trie.next_code());
            self.trie.reset();
            self.code_bits = Bits::from(self.min_code_bits + 1);
            self.last = None;
        } else if code == self.trie.end_code() {
            self.done = true;
        } else {
            self.decompress_reversed(code)?;
            self.last = Some(code);
        }
        Ok(())
    }

    /// Decompress one code into pending buffer (reversed)
    fn decompress_reversed(&mut self, code: Code) -> Result<()> {
        let next_code = self.trie.next_code();
        let last = match self.last {
            Some(last) => last,
            None if code < self.trie.clear_code() => {
                self.pending.push(code as u8);
                return Ok(());
            }
            None => return Err(Error::InvalidLzwData),
        };
        match code.cmp(&next_code) {
            Ordering::Less => {
                self.trie.decompress_reversed(code, &mut self.pending);
                if !self.trie.is_full() {
                    let byte = self.pending.last().copied().unwrap_or_default();
                    self.trie.push_node(Some(last), byte);
                }
            }
            Ordering::Equal if !self.trie.is_full() => {
                let byte = self.trie.first_byte(last);
                self.trie.push_node(Some(last), byte);
                self.trie.decompress_reversed(code, &mut self.pending);
            }
            _ => return Err(Error::InvalidLzwData),
        }
        if self.trie.next_code() == self.code_bits.entries() {
            self.code_bits += 1;
        }
        Ok(())
    }

    /// Decompress codes until an index is pending
    fn advance(&mut self) -> Result<()> {
        match self.unpack()? {
            Some(code) => self.decompress_code(code),
            None => Err(Error::IncompleteImageData),
        }
    }
}

impl Iterator for Decompressor<'_> {
    type Item = Result<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(idx) = self.pending.pop() {
                return Some(Ok(idx));
            }
            if self.done {
                return None;
            }
            if let Err(e) = self.advance() {
                self.done = true;
                return Some(Err(e));
            }
        }
    }
}

/// Compress color indices into an image data block.
///
/// The minimum code size is taken from the color table, or from the largest
/// index when there is no table.
pub fn encode(indices: &[u8], table: Option<&ColorTable>) -> Result<Vec<u8>> {
    let table_len = match table {
        Some(table) if !table.is_empty() => table.len(),
        _ => indices.iter().max().map_or(0, |m| *m as usize + 1),
    };
    BlockEncoder::new(min_code_size(table_len), indices.iter().copied())
        .collect()
}

/// Decompress an image data block into color indices
pub fn decode(block: &[u8]) -> Result<Vec<u8>> {
    Decompressor::new(block)?.collect()
}

#[cfg(test)]
mod test {
    use super::*;

    /// Image from "simple_1" sample (10x10, 4 colors)
    #[rustfmt::skip]
    const IMAGE: [u8; 100] = [
        1, 1, 1, 1, 1, 2, 2, 2, 2, 2,
        1, 1, 1, 1, 1, 2, 2, 2, 2, 2,
        1, 1, 1, 1, 1, 2, 2, 2, 2, 2,
        1, 1, 1, 0, 0, 0, 0, 2, 2, 2,
        1, 1, 1, 0, 0, 0, 0, 2, 2, 2,
        2, 2, 2, 0, 0, 0, 0, 1, 1, 1,
        2, 2, 2, 0, 0, 0, 0, 1, 1, 1,
        2, 2, 2, 2, 2, 1, 1, 1, 1, 1,
        2, 2, 2, 2, 2, 1, 1, 1, 1, 1,
        2, 2, 2, 2, 2, 1, 1, 1, 1, 1,
    ];

    const BLOCK: [u8; 25] = [
        0x02, 0x16, 0x8C, 0x2D, 0x99, 0x87, 0x2A, 0x1C, 0xDC, 0x33, 0xA0,
        0x02, 0x75, 0xEC, 0x95, 0xFA, 0xA8, 0xDE, 0x60, 0x8C, 0x04, 0x91,
        0x4C, 0x01, 0x00,
    ];

    #[test]
    fn code_size() {
        assert_eq!(min_code_size(0), 2);
        assert_eq!(min_code_size(2), 2);
        assert_eq!(min_code_size(4), 2);
        assert_eq!(min_code_size(5), 3);
        assert_eq!(min_code_size(16), 4);
        assert_eq!(min_code_size(17), 5);
        assert_eq!(min_code_size(256), 8);
        assert_eq!(min_code_size(1000), 8);
    }

    #[test]
    fn compress_simple() {
        let table = ColorTable::with_colors(&[[0; 3]; 4]);
        assert_eq!(encode(&IMAGE, Some(&table)).unwrap(), BLOCK);
        // largest index is 2, so no table gives the same code size
        assert_eq!(encode(&IMAGE, None).unwrap(), BLOCK);
    }

    #[test]
    fn decompress_simple() {
        assert_eq!(decode(&BLOCK).unwrap(), IMAGE);
    }

    #[test]
    fn tiny() {
        assert_eq!(encode(&[], None).unwrap(), [2, 1, 0x2C, 0]);
        assert_eq!(encode(&[0], None).unwrap(), [2, 2, 0x44, 0x01, 0]);
        assert_eq!(encode(&[1, 1, 1, 1], None).unwrap(), [2, 2, 0x8C, 0x53, 0]);
        assert_eq!(decode(&[2, 1, 0x2C, 0]).unwrap(), []);
        assert_eq!(decode(&[2, 2, 0x44, 0x01, 0]).unwrap(), [0]);
        assert_eq!(decode(&[2, 2, 0x8C, 0x53, 0]).unwrap(), [1, 1, 1, 1]);
    }

    #[test]
    fn kwkwk() {
        let data = [3u8; 1000];
        let block = encode(&data, None).unwrap();
        assert_eq!(decode(&block).unwrap(), data);
    }

    #[test]
    fn invalid_index() {
        let table = ColorTable::with_colors(&[[0; 3]; 4]);
        assert!(matches!(
            encode(&[0, 1, 4], Some(&table)),
            Err(Error::InvalidColorIndex(4))
        ));
    }

    #[test]
    fn invalid_code_size() {
        assert!(matches!(decode(&[0, 0]), Err(Error::InvalidCodeSize(0))));
        assert!(matches!(decode(&[9, 0]), Err(Error::InvalidCodeSize(9))));
        assert!(matches!(decode(&[]), Err(Error::IncompleteImageData)));
    }

    #[test]
    fn incomplete() {
        // missing end code
        assert!(matches!(
            decode(&BLOCK[..BLOCK.len() - 3]),
            Err(Error::IncompleteImageData)
        ));
        // terminator before end code
        assert!(matches!(
            decode(&[2, 2, 0x8C, 0]),
            Err(Error::IncompleteImageData)
        ));
    }

    #[test]
    fn desync() {
        // clear, then code 7 with an empty dictionary
        assert!(matches!(decode(&[2, 1, 0x3C, 0]), Err(Error::InvalidLzwData)));
    }

    #[test]
    fn lazy_decode() {
        let mut dec = Decompressor::new(&BLOCK).unwrap();
        let first: Vec<u8> = dec.by_ref().take(5).map(|i| i.unwrap()).collect();
        assert_eq!(first, [1; 5]);
        assert_eq!(dec.count(), 95);
    }

    #[test]
    fn sub_blocks() {
        let data: Vec<u8> = (0..2000).map(|i| (i * 7 % 251) as u8).collect();
        let block = encode(&data, None).unwrap();
        assert_eq!(block[0], 8);
        assert_eq!(block[1], 0xFF);
        assert_eq!(block[block.len() - 1], 0);
        assert_eq!(decode(&block).unwrap(), data);
    }
}
