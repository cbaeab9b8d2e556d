// lookup.rs
//
// Copyright (c) 2026  Douglas Lau
//
//! Field lookup by name
use crate::block::BlockName;
use crate::field::{
    Application, Comment, GraphicControl, Header, ImageDesc,
    LogicalScreenDesc, Record,
};
use crate::private::Gif;
use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Structured field within a block
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Signature,
    Version,
    ScreenWidth,
    ScreenHeight,
    GlobalColorTable,
    ColorResolution,
    GlobalSorted,
    GlobalTableSize,
    BackgroundColorIdx,
    PixelAspectRatio,
    ControlBlockSize,
    ControlReserved,
    DisposalMethod,
    UserInput,
    TransparentColor,
    DelayTime,
    TransparentColorIdx,
    ImageSeparator,
    Left,
    Top,
    Width,
    Height,
    LocalColorTable,
    Interlaced,
    LocalSorted,
    ImageReserved,
    LocalTableSize,
    AppBlockSize,
    AppId,
    AuthCode,
    AppSubBlockLen,
    LoopIndicator,
    LoopCount,
    Comment,
}

impl Field {
    /// All fields, in stream order
    pub const ALL: [Field; 34] = [
        Field::Signature,
        Field::Version,
        Field::ScreenWidth,
        Field::ScreenHeight,
        Field::GlobalColorTable,
        Field::ColorResolution,
        Field::GlobalSorted,
        Field::GlobalTableSize,
        Field::BackgroundColorIdx,
        Field::PixelAspectRatio,
        Field::ControlBlockSize,
        Field::ControlReserved,
        Field::DisposalMethod,
        Field::UserInput,
        Field::TransparentColor,
        Field::DelayTime,
        Field::TransparentColorIdx,
        Field::ImageSeparator,
        Field::Left,
        Field::Top,
        Field::Width,
        Field::Height,
        Field::LocalColorTable,
        Field::Interlaced,
        Field::LocalSorted,
        Field::ImageReserved,
        Field::LocalTableSize,
        Field::AppBlockSize,
        Field::AppId,
        Field::AuthCode,
        Field::AppSubBlockLen,
        Field::LoopIndicator,
        Field::LoopCount,
        Field::Comment,
    ];

    /// Get the block holding the field
    pub fn block(self) -> BlockName {
        match self {
            Field::Signature | Field::Version => BlockName::Header,
            Field::ScreenWidth
            | Field::ScreenHeight
            | Field::GlobalColorTable
            | Field::ColorResolution
            | Field::GlobalSorted
            | Field::GlobalTableSize
            | Field::BackgroundColorIdx
            | Field::PixelAspectRatio => BlockName::LogicalScreenDesc,
            Field::ControlBlockSize
            | Field::ControlReserved
            | Field::DisposalMethod
            | Field::UserInput
            | Field::TransparentColor
            | Field::DelayTime
            | Field::TransparentColorIdx => BlockName::GraphicControl,
            Field::ImageSeparator
            | Field::Left
            | Field::Top
            | Field::Width
            | Field::Height
            | Field::LocalColorTable
            | Field::Interlaced
            | Field::LocalSorted
            | Field::ImageReserved
            | Field::LocalTableSize => BlockName::ImageDesc,
            Field::AppBlockSize
            | Field::AppId
            | Field::AuthCode
            | Field::AppSubBlockLen
            | Field::LoopIndicator
            | Field::LoopCount => BlockName::Application,
            Field::Comment => BlockName::Comment,
        }
    }

    /// Check if the field is scoped to the current frame
    pub fn is_frame_field(self) -> bool {
        self.block().is_frame_block()
    }

    fn name(self) -> &'static str {
        match self {
            Field::Signature => "signature",
            Field::Version => "version",
            Field::ScreenWidth => "screen width",
            Field::ScreenHeight => "screen height",
            Field::GlobalColorTable => "global color table",
            Field::ColorResolution => "color resolution",
            Field::GlobalSorted => "global sorted",
            Field::GlobalTableSize => "global table size",
            Field::BackgroundColorIdx => "background color",
            Field::PixelAspectRatio => "pixel aspect ratio",
            Field::ControlBlockSize => "control block size",
            Field::ControlReserved => "control reserved",
            Field::DisposalMethod => "disposal method",
            Field::UserInput => "user input",
            Field::TransparentColor => "transparent color",
            Field::DelayTime => "delay time",
            Field::TransparentColorIdx => "transparent color index",
            Field::ImageSeparator => "image separator",
            Field::Left => "left",
            Field::Top => "top",
            Field::Width => "width",
            Field::Height => "height",
            Field::LocalColorTable => "local color table",
            Field::Interlaced => "interlaced",
            Field::LocalSorted => "local sorted",
            Field::ImageReserved => "image reserved",
            Field::LocalTableSize => "local table size",
            Field::AppBlockSize => "application block size",
            Field::AppId => "application id",
            Field::AuthCode => "auth code",
            Field::AppSubBlockLen => "application sub-block length",
            Field::LoopIndicator => "loop indicator",
            Field::LoopCount => "loop count",
            Field::Comment => "comment",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.write_str(self.name())
    }
}

/// Normalize a field name, ignoring case and separators
fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

impl FromStr for Field {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let name = normalize(s);
        Field::ALL
            .iter()
            .find(|f| normalize(f.name()) == name)
            .copied()
            .ok_or_else(|| Error::UnknownField(s.to_string()))
    }
}

/// Value of a structured field
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldValue {
    /// Integer (or enumerated) value
    Int(u16),
    /// Single-bit flag
    Flag(bool),
    /// Byte string (ASCII recommended)
    Text(Vec<u8>),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FieldValue::Int(v) => write!(fmt, "{}", v),
            FieldValue::Flag(v) => write!(fmt, "{}", v),
            FieldValue::Text(v) => {
                write!(fmt, "{:?}", String::from_utf8_lossy(v))
            }
        }
    }
}

impl FieldValue {
    /// Get an integer value, no larger than `max`
    fn int(self, field: Field, max: u16) -> Result<u16> {
        match self {
            FieldValue::Int(v) if v <= max => Ok(v),
            _ => Err(Error::InvalidFieldValue(field)),
        }
    }

    /// Get an integer value which fits in a number of bits
    fn bits(self, field: Field, bits: u32) -> Result<u8> {
        Ok(self.int(field, (1 << bits) - 1)? as u8)
    }

    fn flag(self, field: Field) -> Result<bool> {
        match self {
            FieldValue::Flag(v) => Ok(v),
            _ => Err(Error::InvalidFieldValue(field)),
        }
    }

    /// Get a text value of exactly `N` bytes
    fn text<const N: usize>(self, field: Field) -> Result<[u8; N]> {
        match self {
            FieldValue::Text(v) => {
                v.try_into().map_err(|_| Error::InvalidFieldValue(field))
            }
            _ => Err(Error::InvalidFieldValue(field)),
        }
    }
}

/// Records with fields accessible by name
trait Fields: Record {
    /// Get a field value
    fn get(&self, field: Field) -> Result<FieldValue>;

    /// Set a field value
    fn set(&mut self, field: Field, value: FieldValue) -> Result<()>;
}

/// Error for a field not held by a record
fn not_held(field: Field) -> Error {
    Error::UnknownField(field.to_string())
}

impl Fields for Header {
    fn get(&self, field: Field) -> Result<FieldValue> {
        match field {
            Field::Signature => Ok(FieldValue::Text(self.signature.to_vec())),
            Field::Version => Ok(FieldValue::Text(self.version.to_vec())),
            _ => Err(not_held(field)),
        }
    }

    fn set(&mut self, field: Field, value: FieldValue) -> Result<()> {
        match field {
            Field::Signature => self.signature = value.text(field)?,
            Field::Version => self.version = value.text(field)?,
            _ => return Err(not_held(field)),
        }
        Ok(())
    }
}

impl Fields for LogicalScreenDesc {
    fn get(&self, field: Field) -> Result<FieldValue> {
        use FieldValue::*;
        let flags = &self.flags;
        Ok(match field {
            Field::ScreenWidth => Int(self.screen_width),
            Field::ScreenHeight => Int(self.screen_height),
            Field::GlobalColorTable => Flag(flags.global_color_table),
            Field::ColorResolution => Int(flags.color_resolution.into()),
            Field::GlobalSorted => Flag(flags.sorted),
            Field::GlobalTableSize => Int(flags.table_size.into()),
            Field::BackgroundColorIdx => Int(self.background_color_idx.into()),
            Field::PixelAspectRatio => Int(self.pixel_aspect_ratio.into()),
            _ => return Err(not_held(field)),
        })
    }

    fn set(&mut self, field: Field, value: FieldValue) -> Result<()> {
        let flags = &mut self.flags;
        match field {
            Field::ScreenWidth => self.screen_width = value.int(field, !0)?,
            Field::ScreenHeight => self.screen_height = value.int(field, !0)?,
            Field::GlobalColorTable => {
                flags.global_color_table = value.flag(field)?
            }
            Field::ColorResolution => {
                flags.color_resolution = value.bits(field, 3)?
            }
            Field::GlobalSorted => flags.sorted = value.flag(field)?,
            Field::GlobalTableSize => flags.table_size = value.bits(field, 3)?,
            Field::BackgroundColorIdx => {
                self.background_color_idx = value.bits(field, 8)?
            }
            Field::PixelAspectRatio => {
                self.pixel_aspect_ratio = value.bits(field, 8)?
            }
            _ => return Err(not_held(field)),
        }
        Ok(())
    }
}

impl Fields for GraphicControl {
    fn get(&self, field: Field) -> Result<FieldValue> {
        use FieldValue::*;
        let flags = &self.flags;
        Ok(match field {
            Field::ControlBlockSize => Int(self.block_size.into()),
            Field::ControlReserved => Int(flags.reserved.into()),
            Field::DisposalMethod => {
                Int(u8::from(flags.disposal_method).into())
            }
            Field::UserInput => Flag(flags.user_input),
            Field::TransparentColor => Flag(flags.transparent_color),
            Field::DelayTime => Int(self.delay_time_cs),
            Field::TransparentColorIdx => {
                Int(self.transparent_color_idx.into())
            }
            _ => return Err(not_held(field)),
        })
    }

    fn set(&mut self, field: Field, value: FieldValue) -> Result<()> {
        let flags = &mut self.flags;
        match field {
            Field::ControlBlockSize => {
                self.block_size = value.bits(field, 8)?
            }
            Field::ControlReserved => flags.reserved = value.bits(field, 3)?,
            Field::DisposalMethod => {
                flags.disposal_method = value.bits(field, 3)?.into()
            }
            Field::UserInput => flags.user_input = value.flag(field)?,
            Field::TransparentColor => {
                flags.transparent_color = value.flag(field)?
            }
            Field::DelayTime => self.delay_time_cs = value.int(field, !0)?,
            Field::TransparentColorIdx => {
                self.transparent_color_idx = value.bits(field, 8)?
            }
            _ => return Err(not_held(field)),
        }
        Ok(())
    }
}

impl Fields for ImageDesc {
    fn get(&self, field: Field) -> Result<FieldValue> {
        use FieldValue::*;
        let flags = &self.flags;
        Ok(match field {
            Field::ImageSeparator => Int(self.separator.into()),
            Field::Left => Int(self.left),
            Field::Top => Int(self.top),
            Field::Width => Int(self.width),
            Field::Height => Int(self.height),
            Field::LocalColorTable => Flag(flags.local_color_table),
            Field::Interlaced => Flag(flags.interlaced),
            Field::LocalSorted => Flag(flags.sorted),
            Field::ImageReserved => Int(flags.reserved.into()),
            Field::LocalTableSize => Int(flags.table_size.into()),
            _ => return Err(not_held(field)),
        })
    }

    fn set(&mut self, field: Field, value: FieldValue) -> Result<()> {
        let flags = &mut self.flags;
        match field {
            Field::ImageSeparator => self.separator = value.bits(field, 8)?,
            Field::Left => self.left = value.int(field, !0)?,
            Field::Top => self.top = value.int(field, !0)?,
            Field::Width => self.width = value.int(field, !0)?,
            Field::Height => self.height = value.int(field, !0)?,
            Field::LocalColorTable => {
                flags.local_color_table = value.flag(field)?
            }
            Field::Interlaced => flags.interlaced = value.flag(field)?,
            Field::LocalSorted => flags.sorted = value.flag(field)?,
            Field::ImageReserved => flags.reserved = value.bits(field, 2)?,
            Field::LocalTableSize => flags.table_size = value.bits(field, 3)?,
            _ => return Err(not_held(field)),
        }
        Ok(())
    }
}

impl Fields for Application {
    fn get(&self, field: Field) -> Result<FieldValue> {
        use FieldValue::*;
        Ok(match field {
            Field::AppBlockSize => Int(self.block_size.into()),
            Field::AppId => Text(self.app_id.to_vec()),
            Field::AuthCode => Text(self.auth_code.to_vec()),
            Field::AppSubBlockLen => Int(self.sub_block_len.into()),
            Field::LoopIndicator => Int(self.sub_block_id.into()),
            Field::LoopCount => Int(self.loop_count),
            _ => return Err(not_held(field)),
        })
    }

    fn set(&mut self, field: Field, value: FieldValue) -> Result<()> {
        match field {
            Field::AppBlockSize => self.block_size = value.bits(field, 8)?,
            Field::AppId => self.app_id = value.text(field)?,
            Field::AuthCode => self.auth_code = value.text(field)?,
            Field::AppSubBlockLen => {
                self.sub_block_len = value.bits(field, 8)?
            }
            Field::LoopIndicator => self.sub_block_id = value.bits(field, 8)?,
            Field::LoopCount => self.loop_count = value.int(field, !0)?,
            _ => return Err(not_held(field)),
        }
        Ok(())
    }
}

impl Fields for Comment {
    fn get(&self, field: Field) -> Result<FieldValue> {
        match field {
            Field::Comment => Ok(FieldValue::Text(self.text())),
            _ => Err(not_held(field)),
        }
    }

    fn set(&mut self, field: Field, value: FieldValue) -> Result<()> {
        match (field, value) {
            (Field::Comment, FieldValue::Text(text)) => {
                // keep sub-block boundaries if the text is unchanged
                if text != self.text() {
                    self.comments = Comment::with_text(&text).comments;
                }
                Ok(())
            }
            (Field::Comment, _) => Err(Error::InvalidFieldValue(field)),
            _ => Err(not_held(field)),
        }
    }
}

/// Get a field from a record in a document
fn get_in<R: Fields>(gif: &Gif, field: Field) -> Result<FieldValue> {
    gif.record::<R>()?.get(field)
}

/// Set a field of a record in a document
fn set_in<R: Fields>(
    gif: &mut Gif,
    field: Field,
    value: FieldValue,
) -> Result<()> {
    let mut rec = gif.record::<R>()?;
    rec.set(field, value)?;
    gif.set_record(&rec)
}

impl Gif {
    /// Get a structured field.
    ///
    /// Frame fields are taken from the current frame.
    pub fn field(&self, field: Field) -> Result<FieldValue> {
        match field.block() {
            BlockName::Header => get_in::<Header>(self, field),
            BlockName::LogicalScreenDesc => {
                get_in::<LogicalScreenDesc>(self, field)
            }
            BlockName::GraphicControl => get_in::<GraphicControl>(self, field),
            BlockName::ImageDesc => get_in::<ImageDesc>(self, field),
            BlockName::Application => get_in::<Application>(self, field),
            BlockName::Comment => get_in::<Comment>(self, field),
            _ => Err(not_held(field)),
        }
    }

    /// Set a structured field.
    ///
    /// The owning block is unpacked, changed and packed again.
    pub fn set_field(&mut self, field: Field, value: FieldValue) -> Result<()> {
        match field.block() {
            BlockName::Header => set_in::<Header>(self, field, value),
            BlockName::LogicalScreenDesc => {
                set_in::<LogicalScreenDesc>(self, field, value)
            }
            BlockName::GraphicControl => {
                set_in::<GraphicControl>(self, field, value)
            }
            BlockName::ImageDesc => set_in::<ImageDesc>(self, field, value),
            BlockName::Application => {
                set_in::<Application>(self, field, value)
            }
            BlockName::Comment => set_in::<Comment>(self, field, value),
            _ => Err(not_held(field)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[rustfmt::skip]
    const SIMPLE: &[u8] = &[
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

    #[test]
    fn names() {
        for field in Field::ALL {
            assert_eq!(field.to_string().parse::<Field>().unwrap(), field);
        }
        assert_eq!("DELAY_TIME".parse::<Field>().unwrap(), Field::DelayTime);
        assert_eq!("loopCount".parse::<Field>().unwrap(), Field::LoopCount);
        assert!(matches!(
            "frame rate".parse::<Field>(),
            Err(Error::UnknownField(_))
        ));
        assert_eq!(Field::Width.block(), BlockName::ImageDesc);
        assert!(Field::Width.is_frame_field());
        assert!(!Field::ScreenWidth.is_frame_field());
    }

    #[test]
    fn get() -> Result<()> {
        let gif = Gif::from_bytes(SIMPLE)?;
        let get = |f| gif.field(f);
        assert_eq!(get(Field::Signature)?, FieldValue::Text(b"GIF".to_vec()));
        assert_eq!(get(Field::Version)?, FieldValue::Text(b"89a".to_vec()));
        assert_eq!(get(Field::ScreenWidth)?, FieldValue::Int(10));
        assert_eq!(get(Field::GlobalColorTable)?, FieldValue::Flag(true));
        assert_eq!(get(Field::GlobalTableSize)?, FieldValue::Int(1));
        assert_eq!(get(Field::DisposalMethod)?, FieldValue::Int(0));
        assert_eq!(get(Field::Height)?, FieldValue::Int(10));
        assert_eq!(get(Field::LocalColorTable)?, FieldValue::Flag(false));
        assert_eq!(get(Field::ControlBlockSize)?, FieldValue::Int(4));
        assert_eq!(get(Field::ControlReserved)?, FieldValue::Int(0));
        assert_eq!(get(Field::ImageSeparator)?, FieldValue::Int(0x2C));
        assert_eq!(get(Field::ImageReserved)?, FieldValue::Int(0));
        assert!(matches!(
            get(Field::LoopCount),
            Err(Error::MissingBlock(BlockName::Application))
        ));
        assert!(matches!(
            get(Field::Comment),
            Err(Error::MissingBlock(BlockName::Comment))
        ));
        Ok(())
    }

    #[test]
    fn set_unchanged() -> Result<()> {
        let mut gif = Gif::from_bytes(SIMPLE)?;
        for field in Field::ALL {
            if let Ok(value) = gif.field(field) {
                gif.set_field(field, value)?;
            }
        }
        assert_eq!(gif.to_bytes(), SIMPLE);
        Ok(())
    }

    #[test]
    fn set() -> Result<()> {
        let mut gif = Gif::from_bytes(SIMPLE)?;
        gif.set_field(Field::DelayTime, FieldValue::Int(500))?;
        gif.set_field(Field::DisposalMethod, FieldValue::Int(2))?;
        gif.set_field(Field::Left, FieldValue::Int(3))?;
        gif.set_field(Field::Version, FieldValue::Text(b"87a".to_vec()))?;
        assert_eq!(gif.field(Field::DelayTime)?, FieldValue::Int(500));
        assert_eq!(gif.field(Field::DisposalMethod)?, FieldValue::Int(2));
        let buf = gif.to_bytes();
        assert_eq!(&buf[..6], b"GIF87a");
        assert_eq!(&buf[28..31], [0b0000_1000, 0xF4, 0x01]);
        assert_eq!(&buf[34..36], [3, 0]);
        Ok(())
    }

    #[test]
    fn reserved_fields() -> Result<()> {
        let mut gif = Gif::from_bytes(SIMPLE)?;
        gif.set_field(Field::ControlReserved, FieldValue::Int(0b101))?;
        gif.set_field(Field::ImageReserved, FieldValue::Int(0b11))?;
        let buf = gif.to_bytes();
        assert_eq!(buf[28], 0b1010_0000);
        assert_eq!(buf[42], 0b0001_1000);
        assert!(matches!(
            gif.set_field(Field::ImageReserved, FieldValue::Int(4)),
            Err(Error::InvalidFieldValue(Field::ImageReserved))
        ));
        assert!(matches!(
            gif.set_field(Field::ImageSeparator, FieldValue::Int(0x21)),
            Err(Error::MalformedBlock(BlockName::ImageDesc))
        ));
        gif.set_record(&Application::with_loop_count(3))?;
        let get = |f| gif.field(f);
        assert_eq!(get(Field::AppBlockSize)?, FieldValue::Int(11));
        assert_eq!(get(Field::AppSubBlockLen)?, FieldValue::Int(3));
        assert_eq!(get(Field::LoopIndicator)?, FieldValue::Int(1));
        assert_eq!(get(Field::LoopCount)?, FieldValue::Int(3));
        gif.set_field(Field::LoopIndicator, FieldValue::Int(2))?;
        let app: Application = gif.record()?;
        assert_eq!(app.looping(), None);
        Ok(())
    }

    #[test]
    fn invalid_values() -> Result<()> {
        let mut gif = Gif::from_bytes(SIMPLE)?;
        let invalid = |r: Result<()>, f| {
            assert!(matches!(r, Err(Error::InvalidFieldValue(x)) if x == f))
        };
        invalid(
            gif.set_field(Field::DisposalMethod, FieldValue::Int(8)),
            Field::DisposalMethod,
        );
        invalid(
            gif.set_field(Field::Interlaced, FieldValue::Int(1)),
            Field::Interlaced,
        );
        invalid(
            gif.set_field(Field::Version, FieldValue::Text(b"89".to_vec())),
            Field::Version,
        );
        invalid(
            gif.set_field(Field::BackgroundColorIdx, FieldValue::Int(256)),
            Field::BackgroundColorIdx,
        );
        assert_eq!(gif.to_bytes(), SIMPLE);
        Ok(())
    }

    #[test]
    fn comment() -> Result<()> {
        let mut gif = Gif::from_bytes(SIMPLE)?;
        let mut cmt = Comment::with_text(b"");
        cmt.comments = vec![b"ab".to_vec(), b"c".to_vec()];
        gif.set_record(&cmt)?;
        let text = FieldValue::Text(b"abc".to_vec());
        assert_eq!(gif.field(Field::Comment)?, text);
        let before = gif.to_bytes();
        gif.set_field(Field::Comment, text)?;
        assert_eq!(gif.to_bytes(), before);
        gif.set_field(Field::Comment, FieldValue::Text(b"xyz!".to_vec()))?;
        let raw = gif.block(BlockName::Comment)?;
        assert_eq!(raw, b"\x21\xFE\x04xyz!\x00");
        Ok(())
    }
}
