// main.rs      gifraffe command
//
// Copyright (c) 2026  Douglas Lau
//
#![forbid(unsafe_code)]

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use gifraffe::block::{BlockName, ExtensionCode, Frame};
use gifraffe::field::{
    Application, Comment, DisposalMethod, GraphicControl, Header, ImageDesc,
    LogicalScreenDesc, Record,
};
use gifraffe::{lzw, Field, Gif};
use std::error::Error;
use std::ffi::OsStr;
use std::fs;
use std::io::Write;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Crate version
const VERSION: &str = std::env!("CARGO_PKG_VERSION");

/// Main entry point
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::builder().format_timestamp(None).init();
    let mut out = StandardStream::stdout(ColorChoice::Always);
    match create_app().get_matches().subcommand() {
        ("show", Some(matches)) => show(&mut out, matches)?,
        ("get", Some(matches)) => get(&mut out, matches)?,
        ("check", Some(matches)) => check(&mut out, matches)?,
        _ => (),
    }
    out.reset()?;
    Ok(())
}

/// Create clap App
fn create_app() -> App<'static, 'static> {
    App::new("gifraffe")
        .version(VERSION)
        .setting(AppSettings::GlobalVersion)
        .about("GIF block utility")
        .setting(AppSettings::ArgRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("show")
                .about("Show GIF block table")
                .arg(
                    Arg::with_name("files")
                        .required(true)
                        .min_values(1)
                        .help("input file(s)"),
                ),
        )
        .subcommand(
            SubCommand::with_name("get")
                .about("Get one field of a GIF")
                .arg(Arg::with_name("field").required(true).help("field name"))
                .arg(Arg::with_name("file").required(true).help("input file"))
                .arg(
                    Arg::with_name("frame")
                        .long("frame")
                        .takes_value(true)
                        .help("frame number"),
                ),
        )
        .subcommand(
            SubCommand::with_name("check")
                .about("Check round-trip of GIF blocks and image data")
                .arg(
                    Arg::with_name("files")
                        .required(true)
                        .min_values(1)
                        .help("input file(s)"),
                ),
        )
}

/// Color specs for output
struct Colors {
    dflt: ColorSpec,
    bold: ColorSpec,
    red: ColorSpec,
    green: ColorSpec,
    yellow: ColorSpec,
    cyan: ColorSpec,
    magenta: ColorSpec,
}

impl Colors {
    fn new() -> Self {
        let mut dflt = ColorSpec::new();
        dflt.set_fg(Some(Color::White));
        let mut bold = ColorSpec::new();
        bold.set_fg(Some(Color::White))
            .set_intense(true)
            .set_bold(true);
        let mut red = ColorSpec::new();
        red.set_fg(Some(Color::Red)).set_intense(true);
        let mut green = ColorSpec::new();
        green.set_fg(Some(Color::Green)).set_intense(true);
        let mut yellow = ColorSpec::new();
        yellow.set_fg(Some(Color::Yellow)).set_intense(true);
        let mut cyan = ColorSpec::new();
        cyan.set_fg(Some(Color::Cyan)).set_intense(true);
        let mut magenta = ColorSpec::new();
        magenta.set_fg(Some(Color::Magenta));
        Colors {
            dflt,
            bold,
            red,
            green,
            yellow,
            cyan,
            magenta,
        }
    }
}

/// Handle show subcommand
fn show(
    out: &mut StandardStream,
    matches: &ArgMatches,
) -> Result<(), Box<dyn Error>> {
    for path in matches.values_of_os("files").into_iter().flatten() {
        show_file(out, path)?;
    }
    Ok(())
}

/// Show one GIF file
fn show_file(
    out: &mut StandardStream,
    path: &OsStr,
) -> Result<(), Box<dyn Error>> {
    let clr = Colors::new();
    let gif = Gif::from_bytes(&fs::read(path)?)?;
    let header: Header = gif.record()?;
    let screen: LogicalScreenDesc = gif.record()?;
    let frame_digits = digits(gif.frame_count()).max(3);
    let width = screen.screen_width;
    let height = screen.screen_height;
    let size_digits = 4.max(1 + digits(width) + digits(height));
    let mut comments = vec![];
    let extensions = gif
        .frames()
        .iter()
        .flat_map(|f| f.extensions())
        .chain(gif.trailing_extensions());
    for ext in extensions.filter(|e| e.code() == ExtensionCode::Comment) {
        let text = Comment::unpack(ext.raw())?.text();
        for l in String::from_utf8_lossy(&text).split('\n') {
            let l = l.trim();
            if !l.is_empty() {
                comments.push(l.to_string());
            }
        }
    }
    out.set_color(&clr.magenta)?;
    writeln!(out, "{:?}", path)?;
    out.set_color(&clr.bold)?;
    let version = String::from_utf8_lossy(&header.version).to_string();
    write!(out, "GIF{}, frames: {}", version, gif.frame_count())?;
    if let Some(c) = loop_count(&gif)? {
        write!(out, ", repeat: ")?;
        if c == 0 {
            write!(out, "∞")?;
        } else {
            write!(out, "{}", c)?;
        }
    }
    if comments.is_empty() {
        writeln!(out)?;
    } else {
        out.set_color(&clr.cyan)?;
        for c in comments {
            writeln!(out, "  # {}", c)?;
        }
    }
    out.set_color(&clr.yellow)?;
    write!(out, " {:>w$}", "Fr#", w = frame_digits)?;
    write!(out, "  Delay Disp")?;
    write!(out, " {:>w$}", "Size", w = size_digits)?;
    write!(out, " {:>w$}", "X,Y", w = size_digits)?;
    writeln!(out, " Clrs Trn Ext     Bytes")?;
    let global_clr = if screen.flags.global_color_table {
        gif.global_color_table().len() / 3
    } else {
        0
    };
    for (number, frame) in gif.frames().iter().enumerate() {
        let layout = Layout {
            width,
            height,
            global_clr,
            number,
            frame_digits,
            size_digits,
        };
        show_frame(out, &clr, frame, &layout)?;
    }
    Ok(())
}

/// Get the loop count from the first frame
fn loop_count(gif: &Gif) -> Result<Option<u16>, Box<dyn Error>> {
    let ext = gif
        .frames()
        .first()
        .and_then(|f| f.extension(ExtensionCode::Application));
    match ext {
        Some(ext) if ext.raw().len() == 19 => {
            Ok(Application::unpack(ext.raw())?.looping())
        }
        _ => Ok(None),
    }
}

/// Layout of a frame table row
struct Layout {
    width: u16,
    height: u16,
    global_clr: usize,
    number: usize,
    frame_digits: usize,
    size_digits: usize,
}

/// Show one frame of a GIF file
fn show_frame(
    out: &mut StandardStream,
    clr: &Colors,
    frame: &Frame,
    layout: &Layout,
) -> Result<(), Box<dyn Error>> {
    let image_desc = ImageDesc::unpack(frame.image_desc())?;
    let control = match frame.extension(ExtensionCode::GraphicControl) {
        Some(ext) if ext.raw().len() == 8 => {
            Some(GraphicControl::unpack(ext.raw())?)
        }
        _ => None,
    };
    out.set_color(&clr.dflt)?;
    let interlaced = if image_desc.flags.interlaced { 'i' } else { ' ' };
    write!(out, "{}", interlaced)?;
    out.set_color(&clr.bold)?;
    write!(out, "{:>w$}", layout.number, w = layout.frame_digits)?;
    let d = control.map_or(0, |gc| gc.delay_time_cs);
    if d == 0 {
        out.set_color(&clr.dflt)?;
    }
    write!(out, " {:6.2}", d as f32 / 100f32)?;
    let d = match control.map(|gc| gc.flags.disposal_method) {
        Some(DisposalMethod::NoAction) => "none",
        Some(DisposalMethod::Keep) => "keep",
        Some(DisposalMethod::Background) => "bg",
        Some(DisposalMethod::Previous) => "prev",
        Some(DisposalMethod::Reserved(_)) => "res",
        None => "-",
    };
    out.set_color(match d {
        "none" | "-" => &clr.dflt,
        "res" => &clr.red,
        _ => &clr.bold,
    })?;
    write!(out, " {:>4}", d)?;
    if layout.width == image_desc.width && layout.height == image_desc.height
    {
        out.set_color(&clr.dflt)?;
    } else {
        out.set_color(&clr.bold)?;
    }
    write!(
        out,
        " {:>w$}",
        &format!("{}x{}", image_desc.width, image_desc.height),
        w = layout.size_digits
    )?;
    if image_desc.left == 0 && image_desc.top == 0 {
        out.set_color(&clr.dflt)?;
    } else {
        out.set_color(&clr.bold)?;
    }
    write!(
        out,
        " {:>w$}",
        &format!("{},{}", image_desc.left, image_desc.top),
        w = layout.size_digits
    )?;
    let c = frame.local_color_table().len() / 3;
    if c > 0 {
        out.set_color(&clr.bold)?;
        write!(out, "  {:3}", c)?;
    } else {
        out.set_color(&clr.dflt)?;
        write!(out, " {:3}g", layout.global_clr)?;
    }
    let tc = match control.and_then(|gc| gc.transparent_color()) {
        Some(tc) => {
            out.set_color(&clr.bold)?;
            tc.to_string()
        }
        None => {
            out.set_color(&clr.dflt)?;
            "-".to_string()
        }
    };
    write!(out, " {:>3}", tc)?;
    out.set_color(&clr.cyan)?;
    let ext: String =
        frame.extensions().iter().map(|e| ext_char(e.code())).collect();
    write!(out, " {:<4}", ext)?;
    out.set_color(&clr.dflt)?;
    writeln!(out, " {:>9}", frame.size())?;
    Ok(())
}

/// Get a character for an extension code
fn ext_char(code: ExtensionCode) -> char {
    match code {
        ExtensionCode::GraphicControl => 'g',
        ExtensionCode::Application => 'a',
        ExtensionCode::Comment => 'c',
        ExtensionCode::PlainText => 't',
        ExtensionCode::Unknown(_) => '?',
    }
}

/// Handle get subcommand
fn get(
    out: &mut StandardStream,
    matches: &ArgMatches,
) -> Result<(), Box<dyn Error>> {
    let field: Field = matches.value_of("field").unwrap_or_default().parse()?;
    let path = matches.value_of_os("file").unwrap_or_default();
    let mut gif = Gif::from_bytes(&fs::read(path)?)?;
    if let Some(frame) = matches.value_of("frame") {
        gif.set_frame(frame.parse()?)?;
    }
    let value = gif.field(field)?;
    let clr = Colors::new();
    out.set_color(&clr.yellow)?;
    write!(out, "{}", field)?;
    if field.is_frame_field() {
        write!(out, " [{}]", gif.frame())?;
    }
    out.set_color(&clr.bold)?;
    writeln!(out, ": {}", value)?;
    Ok(())
}

/// Handle check subcommand
fn check(
    out: &mut StandardStream,
    matches: &ArgMatches,
) -> Result<(), Box<dyn Error>> {
    let clr = Colors::new();
    for path in matches.values_of_os("files").into_iter().flatten() {
        out.set_color(&clr.magenta)?;
        write!(out, "{:?}", path)?;
        match check_file(path) {
            Ok(frames) => {
                out.set_color(&clr.green)?;
                writeln!(out, " ok ({} frames)", frames)?;
            }
            Err(e) => {
                out.set_color(&clr.red)?;
                writeln!(out, " FAIL: {}", e)?;
            }
        }
    }
    Ok(())
}

/// Check round-trip of one GIF file
fn check_file(path: &OsStr) -> Result<usize, Box<dyn Error>> {
    let buf = fs::read(path)?;
    let mut gif = Gif::from_bytes(&buf)?;
    if !gif.record::<Header>()?.is_gif() {
        log::warn!("{:?}: not a GIF87a/GIF89a signature", path);
    }
    if gif.to_bytes() != buf {
        return Err("serialized bytes differ".into());
    }
    while let Ok(frame) = gif.advance() {
        let indices = gif.indices()?;
        let desc: ImageDesc = gif.record()?;
        if indices.len() != desc.image_sz() {
            return Err(format!(
                "frame {}: {} indices, expected {}",
                frame,
                indices.len(),
                desc.image_sz()
            )
            .into());
        }
        let data = lzw::encode(&indices, None)?;
        if lzw::decode(&data)? != indices {
            return Err(format!("frame {}: LZW round-trip", frame).into());
        }
        let block = gif.block(BlockName::ImageData)?;
        log::debug!("frame {}: {} / {} bytes", frame, block.len(), data.len());
    }
    Ok(gif.frame_count())
}

/// Calculate digits in a number
fn digits<T: Into<usize>>(v: T) -> usize {
    let v = v.into();
    match v {
        0..=9 => 1,
        10..=99 => 2,
        100..=999 => 3,
        1000..=9999 => 4,
        _ => 5,
    }
}
