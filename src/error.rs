// error.rs
//
// Copyright (c) 2026  Douglas Lau
//
use crate::block::BlockName;
use crate::lookup::Field;
use std::fmt;
use std::io;

/// Errors encountered while parsing, accessing or compressing GIF data
#[derive(Debug)]
pub enum Error {
    /// A wrapped I/O error.
    Io(io::Error),
    /// Data ends in the middle of a block.
    UnexpectedEndOfFile,
    /// Bytes remaining after the last frame are not a single trailer
    /// (`0x3B`).
    InvalidTrailer(Vec<u8>),
    /// A raw block does not match the layout of its record.
    MalformedBlock(BlockName),
    /// [Block](block/enum.BlockName.html) not present in the document or
    /// current frame.
    MissingBlock(BlockName),
    /// Frame cursor set outside of `0..count`.
    FrameOutOfRange {
        /// Requested frame index
        index: usize,
        /// Number of frames in the document
        count: usize,
    },
    /// LZW minimum code size not supported.
    InvalidCodeSize(u8),
    /// Compressed LZW data invalid or corrupt.
    InvalidLzwData,
    /// Compressed LZW data ends before the end code.
    IncompleteImageData,
    /// Color index too large for the LZW code size.
    InvalidColorIndex(u8),
    /// Color table entry is not a 6-digit hex color.
    InvalidColor(String),
    /// Field name not recognized.
    UnknownField(String),
    /// Value has the wrong kind or does not fit the field.
    InvalidFieldValue(Field),
}

/// Result type for this crate
pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(fmt),
            Error::InvalidTrailer(rem) => {
                write!(fmt, "invalid trailer: {} bytes remain", rem.len())
            }
            Error::MalformedBlock(name) => write!(fmt, "malformed {}", name),
            Error::MissingBlock(name) => write!(fmt, "{} not present", name),
            Error::FrameOutOfRange { index, count } => {
                write!(fmt, "frame {} out of range (count {})", index, count)
            }
            Error::InvalidCodeSize(sz) => {
                write!(fmt, "invalid LZW minimum code size: {}", sz)
            }
            Error::InvalidColor(c) => write!(fmt, "invalid color: {:?}", c),
            Error::UnknownField(f) => write!(fmt, "unknown field: {:?}", f),
            Error::InvalidFieldValue(f) => {
                write!(fmt, "invalid value for {}", f)
            }
            _ => fmt::Debug::fmt(self, fmt),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            Error::Io(ref err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}
