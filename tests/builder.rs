//! Exercises the [`Bsdiff`]/[`Bspatch`] builder APIs directly, including
//! the optional compression-level and buffer-size knobs.

use std::io;

use bsdiff4::{Bsdiff, Bspatch, Compression};

#[test]
fn builder_roundtrip_default() {
    let source = b"lorem ipsum dolor sit amet, consectetur adipiscing elit".repeat(8);
    let mut target = source.clone();
    target.extend_from_slice(b" sed do eiusmod tempor incididunt ut labore");

    let mut p = Vec::new();
    Bsdiff::new(&source).compare(&target, io::Cursor::new(&mut p)).unwrap();

    let patcher = Bspatch::new(&p).unwrap();
    let mut out = Vec::with_capacity(patcher.hint_target_size() as usize);
    patcher.apply(&source, io::Cursor::new(&mut out)).unwrap();
    assert_eq!(out, target);
}

#[test]
fn builder_roundtrip_with_fastest_compression_and_small_buffer() {
    let source: Vec<u8> = (0u32..5000).map(|x| (x % 97) as u8).collect();
    let mut target = source.clone();
    target.reverse();

    let mut p = Vec::new();
    Bsdiff::new(&source)
        .compression_level(Compression::Fastest)
        .buffer_size(256)
        .compare(&target, io::Cursor::new(&mut p))
        .unwrap();

    let patcher = Bspatch::new(&p).unwrap();
    let mut out = Vec::with_capacity(patcher.hint_target_size() as usize);
    patcher.apply(&source, io::Cursor::new(&mut out)).unwrap();
    assert_eq!(out, target);
}

#[test]
fn reused_bsdiff_compares_same_source_against_several_targets() {
    let source = b"a shared baseline document used for several revisions".to_vec();
    let bsdiff = Bsdiff::new(&source);

    for suffix in ["v1", "v2-longer-suffix", ""] {
        let mut target = source.clone();
        target.extend_from_slice(suffix.as_bytes());

        let mut p = Vec::new();
        bsdiff.compare(&target, io::Cursor::new(&mut p)).unwrap();

        let patcher = Bspatch::new(&p).unwrap();
        let mut out = Vec::with_capacity(patcher.hint_target_size() as usize);
        patcher.apply(&source, io::Cursor::new(&mut out)).unwrap();
        assert_eq!(out, target);
    }
}
