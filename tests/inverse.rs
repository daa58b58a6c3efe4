//! Round-trip properties: for any `(source, target)` pair, diffing then
//! patching must reproduce `target` exactly.

use std::io;

use bsdiff4::{diff, patch};

fn roundtrip(source: &[u8], target: &[u8]) -> io::Result<bool> {
    let p = diff(source, target).map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    let t = patch(source, &p).map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    Ok(t == target)
}

#[test]
fn both_empty() {
    assert!(roundtrip(b"", b"").unwrap());
}

#[test]
fn empty_source() {
    assert!(roundtrip(b"", b"hello world").unwrap());
}

#[test]
fn empty_target() {
    assert!(roundtrip(b"hello world", b"").unwrap());
}

#[test]
fn identical_buffers() {
    let buf = b"the quick brown fox jumps over the lazy dog".repeat(37);
    assert!(roundtrip(&buf, &buf).unwrap());
}

#[test]
fn single_byte_diff_in_large_buffer() {
    let mut source = vec![0u8; 64 * 1024];
    for (i, b) in source.iter_mut().enumerate() {
        *b = (i % 251) as u8;
    }
    let mut target = source.clone();
    target[32_000] ^= 0xff;
    assert!(roundtrip(&source, &target).unwrap());
}

#[test]
fn full_reversal() {
    let source: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
    let target: Vec<u8> = source.iter().rev().copied().collect();
    assert!(roundtrip(&source, &target).unwrap());
}

#[test]
fn repeated_byte_source_pathological() {
    let source = vec![b'a'; 10_000];
    let target = b"prefix".repeat(10).into_iter().chain(vec![b'a'; 5000]).collect::<Vec<u8>>();
    assert!(roundtrip(&source, &target).unwrap());
}

#[test]
fn target_prepended_and_appended() {
    let source = b"the middle section stays the same across versions".to_vec();
    let mut target = b"HEADER-".to_vec();
    target.extend_from_slice(&source);
    target.extend_from_slice(b"-TRAILER");
    assert!(roundtrip(&source, &target).unwrap());
}

#[quickcheck_macros::quickcheck]
fn invert_random(s: Vec<u8>, t: Vec<u8>) -> io::Result<bool> {
    roundtrip(&s, &t)
}
