// lib.rs      gifraffe crate.
//
// Copyright (c) 2026  Douglas Lau
//
//! A library for reading and editing GIF blocks without re-encoding.
//!
//! A [Gif] keeps every block exactly as parsed.  Fields are read and written
//! by name through [Field], or as whole [records](field/index.html), and
//! image data can be decompressed with the [lzw] module.
//!
//! [Field]: enum.Field.html
//! [Gif]: struct.Gif.html
//! [lzw]: lzw/index.html
#![forbid(unsafe_code)]

#[macro_use]
extern crate log;

pub mod block;
mod decode;
mod encode;
mod error;
pub mod field;
mod lookup;
pub mod lzw;
mod private;

pub use crate::encode::Encoder;
pub use crate::error::{Error, Result};
pub use crate::lookup::{Field, FieldValue};
pub use crate::private::Gif;
