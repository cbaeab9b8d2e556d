// lzw.rs
//
// Copyright (c) 2026  Douglas Lau
//
use gifraffe::field::ColorTable;
use gifraffe::lzw::{self, Decompressor};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Get the lengths of all data sub-blocks in an image data block
fn sub_block_lengths(block: &[u8]) -> Vec<usize> {
    let mut lengths = vec![];
    let mut i = 1;
    while i < block.len() {
        let len = block[i] as usize;
        lengths.push(len);
        i += len + 1;
    }
    assert_eq!(i, block.len());
    lengths
}

fn random_indices(seed: u64, len: usize, colors: u16) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen_range(0..colors) as u8).collect()
}

#[test]
fn random_9999() {
    let data = random_indices(9999, 9999, 256);
    let block = lzw::encode(&data, None).unwrap();
    assert_eq!(block[0], 8);
    assert_eq!(lzw::decode(&block).unwrap(), data);
}

#[test]
fn sub_block_framing() {
    let data = random_indices(1, 4000, 256);
    let block = lzw::encode(&data, None).unwrap();
    let lengths = sub_block_lengths(&block);
    assert!(lengths.len() > 2);
    let (last, full) = lengths.split_last().unwrap();
    assert_eq!(*last, 0);
    let (tail, full) = full.split_last().unwrap();
    assert!(full.iter().all(|len| *len == 255));
    assert!(*tail > 0 && *tail <= 255);
}

#[test]
fn dictionary_reset() {
    for colors in [2, 4, 16, 256] {
        let data = random_indices(colors as u64, 60_000, colors);
        let table = ColorTable::with_colors(&vec![[0; 3]; colors as usize]);
        let block = lzw::encode(&data, Some(&table)).unwrap();
        assert_eq!(block[0], lzw::min_code_size(colors as usize));
        assert_eq!(lzw::decode(&block).unwrap(), data);
    }
}

#[test]
fn runs() {
    let mut data = vec![];
    for i in 0..200u16 {
        data.extend(std::iter::repeat((i % 7) as u8).take(i as usize));
    }
    let block = lzw::encode(&data, None).unwrap();
    assert!(block.len() < data.len() / 3);
    assert_eq!(lzw::decode(&block).unwrap(), data);
}

#[test]
fn lazy_prefix() {
    let data = random_indices(7, 5000, 16);
    let block = lzw::encode(&data, None).unwrap();
    let prefix: Vec<u8> = Decompressor::new(&block)
        .unwrap()
        .take(100)
        .map(|i| i.unwrap())
        .collect();
    assert_eq!(prefix, data[..100]);
}

#[test]
fn corrupt_stream() {
    let data = random_indices(3, 3000, 256);
    let mut block = lzw::encode(&data, None).unwrap();
    // truncated before end code
    let len = block.len();
    block.truncate(len - 40);
    block.push(0);
    assert!(lzw::decode(&block).is_err());
}

proptest! {
    #[test]
    fn roundtrip_no_table(
        data in prop::collection::vec(any::<u8>(), 0..3000),
    ) {
        let block = lzw::encode(&data, None).unwrap();
        prop_assert_eq!(lzw::decode(&block).unwrap(), data);
    }

    #[test]
    fn roundtrip_table(
        bits in 1u32..=8,
        seed in any::<u64>(),
        len in 0usize..5000,
    ) {
        let colors = 1u16 << bits;
        let data = random_indices(seed, len, colors);
        let table = ColorTable::with_colors(&vec![[0; 3]; colors as usize]);
        let block = lzw::encode(&data, Some(&table)).unwrap();
        prop_assert_eq!(block[0], lzw::min_code_size(colors as usize));
        prop_assert_eq!(lzw::decode(&block).unwrap(), data);
    }

    #[test]
    fn decode_never_panics(
        block in prop::collection::vec(any::<u8>(), 0..600),
    ) {
        let _ = lzw::decode(&block);
    }
}
