// block.rs
//
// Copyright (c) 2026  Douglas Lau
//
//! Raw GIF blocks
use std::fmt;

/// Number of bytes in one color table entry
pub(crate) const CHANNELS: usize = 3;

/// Extension introducer (`!`)
pub const EXTENSION_INTRODUCER: u8 = 0x21;

/// Image separator (`,`)
pub const IMAGE_SEPARATOR: u8 = 0x2C;

/// GIF trailer (`;`)
pub const TRAILER: u8 = 0x3B;

/// Name of a block within a GIF document
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockName {
    Header,
    LogicalScreenDesc,
    GlobalColorTable,
    GraphicControl,
    Application,
    PlainText,
    Comment,
    UnknownExtension,
    ImageDesc,
    LocalColorTable,
    ImageData,
    Trailer,
}

impl BlockName {
    /// Size of a fixed-length block, in bytes
    pub fn size(self) -> Option<usize> {
        use self::BlockName::*;
        match self {
            Header => Some(6),
            LogicalScreenDesc => Some(7),
            GraphicControl => Some(8),
            Application => Some(19),
            ImageDesc => Some(10),
            Trailer => Some(1),
            _ => None,
        }
    }

    /// Check if the block belongs to a frame
    pub fn is_frame_block(self) -> bool {
        use self::BlockName::*;
        !matches!(self, Header | LogicalScreenDesc | GlobalColorTable | Trailer)
    }

    /// Get the extension code of an extension block
    pub fn extension_code(self) -> Option<ExtensionCode> {
        use self::BlockName::*;
        match self {
            GraphicControl => Some(ExtensionCode::GraphicControl),
            Application => Some(ExtensionCode::Application),
            PlainText => Some(ExtensionCode::PlainText),
            Comment => Some(ExtensionCode::Comment),
            _ => None,
        }
    }
}

impl fmt::Display for BlockName {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        use self::BlockName::*;
        let name = match self {
            Header => "Header",
            LogicalScreenDesc => "Logical Screen Descriptor",
            GlobalColorTable => "Global Color Table",
            GraphicControl => "Graphics Control Extension",
            Application => "Application Extension",
            PlainText => "Plain Text Extension",
            Comment => "Comment Extension",
            UnknownExtension => "Unknown Extension",
            ImageDesc => "Image Descriptor",
            LocalColorTable => "Local Color Table",
            ImageData => "Image Data Block",
            Trailer => "Trailer",
        };
        fmt.write_str(name)
    }
}

/// Extension label (second byte of an extension block)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExtensionCode {
    PlainText,
    GraphicControl,
    Comment,
    Application,
    Unknown(u8),
}

impl From<u8> for ExtensionCode {
    fn from(n: u8) -> Self {
        use self::ExtensionCode::*;
        match n {
            0x01 => PlainText,
            0xF9 => GraphicControl,
            0xFE => Comment,
            0xFF => Application,
            _ => Unknown(n),
        }
    }
}

impl From<ExtensionCode> for u8 {
    fn from(t: ExtensionCode) -> Self {
        use self::ExtensionCode::*;
        match t {
            PlainText => 0x01,
            GraphicControl => 0xF9,
            Comment => 0xFE,
            Application => 0xFF,
            Unknown(n) => n,
        }
    }
}

impl ExtensionCode {
    /// Get the block name
    pub fn block(self) -> BlockName {
        use self::ExtensionCode::*;
        match self {
            PlainText => BlockName::PlainText,
            GraphicControl => BlockName::GraphicControl,
            Comment => BlockName::Comment,
            Application => BlockName::Application,
            Unknown(_) => BlockName::UnknownExtension,
        }
    }
}

/// Get the size of a color table (in bytes) from a packed size field
pub fn color_table_size(size_field: u8) -> usize {
    CHANNELS * (2 << (size_field & 0b0111))
}

/// Raw extension block, from introducer through block terminator
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Extension {
    code: ExtensionCode,
    raw: Vec<u8>,
}

impl Extension {
    /// Create an extension from a raw block.
    ///
    /// The code is taken from the label byte.
    pub fn with_raw(raw: Vec<u8>) -> Self {
        let code = raw
            .get(1)
            .copied()
            .map_or(ExtensionCode::Unknown(0), ExtensionCode::from);
        Extension { code, raw }
    }
    pub fn code(&self) -> ExtensionCode {
        self.code
    }
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }
    pub(crate) fn set_raw(&mut self, raw: Vec<u8>) {
        self.raw = raw;
    }
}

/// Raw blocks of one image within a document
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    /// Extension blocks, in stream order
    pub(crate) extensions: Vec<Extension>,
    /// Image descriptor (10 bytes)
    pub(crate) image_desc: Vec<u8>,
    /// Local color table (may be empty)
    pub(crate) local_color_table: Vec<u8>,
    /// LZW minimum code size, data sub-blocks and terminator
    pub(crate) image_data: Vec<u8>,
}

impl Frame {
    /// Get all extension blocks, in stream order
    pub fn extensions(&self) -> &[Extension] {
        &self.extensions
    }

    /// Get the first extension with a code
    pub fn extension(&self, code: ExtensionCode) -> Option<&Extension> {
        self.extensions.iter().find(|e| e.code == code)
    }

    pub fn image_desc(&self) -> &[u8] {
        &self.image_desc
    }

    pub fn local_color_table(&self) -> &[u8] {
        &self.local_color_table
    }

    pub fn image_data(&self) -> &[u8] {
        &self.image_data
    }

    /// Get a raw block by name
    pub fn block(&self, name: BlockName) -> Option<&[u8]> {
        match name {
            BlockName::ImageDesc => Some(&self.image_desc),
            BlockName::LocalColorTable => Some(&self.local_color_table),
            BlockName::ImageData => Some(&self.image_data),
            _ => name
                .extension_code()
                .and_then(|code| self.extension(code))
                .map(|e| e.raw()),
        }
    }

    /// Replace a raw block by name.
    ///
    /// An extension not yet present is added after any others.
    pub(crate) fn set_block(&mut self, name: BlockName, raw: Vec<u8>) -> bool {
        match name {
            BlockName::ImageDesc => self.image_desc = raw,
            BlockName::LocalColorTable => self.local_color_table = raw,
            BlockName::ImageData => self.image_data = raw,
            _ => match name.extension_code() {
                Some(code) => {
                    match self.extensions.iter_mut().find(|e| e.code == code) {
                        Some(ext) => ext.set_raw(raw),
                        None => self.extensions.push(Extension { code, raw }),
                    }
                }
                None => return false,
            },
        }
        true
    }

    /// Get all raw blocks, in stream order
    pub fn blocks(&self) -> impl Iterator<Item = &[u8]> {
        self.extensions
            .iter()
            .map(|e| e.raw())
            .chain(std::iter::once(&self.image_desc[..]))
            .chain(std::iter::once(&self.local_color_table[..]))
            .chain(std::iter::once(&self.image_data[..]))
    }

    /// Get the total size of all blocks, in bytes
    pub fn size(&self) -> usize {
        self.blocks().map(|b| b.len()).sum()
    }
}
