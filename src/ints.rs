//! Eight-byte signed sign-magnitude little-endian integer codec used
//! throughout the BSDIFF40 container: the header lengths and every
//! field of a control triple are encoded this way.

use byteorder::{ByteOrder, LE};

const SIGN_BIT: u64 = 1 << 63;

/// Decodes an eight-byte sign-magnitude little-endian integer.
///
/// `b` must be at least 8 bytes long; only the first 8 are read.
#[inline]
pub fn decode_int(b: &[u8]) -> i64 {
    let y = LE::read_u64(b);
    let magnitude = (y & !SIGN_BIT) as i64;
    if y & SIGN_BIT == 0 {
        magnitude
    } else {
        -magnitude
    }
}

/// Encodes `x` as an eight-byte sign-magnitude little-endian integer into `b`.
///
/// `b` must be at least 8 bytes long; only the first 8 are written.
///
/// Does not round-trip `i64::MIN`, whose magnitude does not fit in 63
/// bits; callers must not pass it (no control-stream field or header
/// length ever reaches that magnitude for inputs bounded by available
/// memory).
#[inline]
pub fn encode_int(x: i64, b: &mut [u8]) {
    if x < 0 {
        LE::write_u64(b, x.wrapping_neg() as u64 | SIGN_BIT);
    } else {
        LE::write_u64(b, x as u64);
    }
}
