// logging.rs
//
// Copyright (c) 2026  Douglas Lau
//
mod common;

use common::animation;
use gifraffe::Gif;
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::sync::Mutex;

/// Logger which keeps warnings
struct Warnings(Mutex<Vec<String>>);

impl Log for Warnings {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Warn
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            if let Ok(mut warnings) = self.0.lock() {
                warnings.push(record.args().to_string());
            }
        }
    }

    fn flush(&self) {}
}

static WARNINGS: Warnings = Warnings(Mutex::new(Vec::new()));

fn take_warnings() -> Vec<String> {
    std::mem::take(&mut *WARNINGS.0.lock().unwrap())
}

#[test]
fn warnings() {
    log::set_logger(&WARNINGS).unwrap();
    log::set_max_level(LevelFilter::Warn);
    // trailing comment after the last frame
    let buf = animation(8, 8, 3);
    Gif::from_bytes(&buf).unwrap();
    assert_eq!(take_warnings(), Vec::<String>::new());
    let mut bad = buf.clone();
    bad.insert(buf.len() - 1, 0x00);
    assert!(Gif::from_bytes(&bad).is_err());
    let warnings = take_warnings();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].starts_with("frame loop stopped"));
}
