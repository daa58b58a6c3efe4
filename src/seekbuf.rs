//! Growable seek-write byte buffer, used by the differ to reserve the
//! 32-byte header slot, stream the three bzip2 sections through it,
//! then rewind and overwrite the header with the finalized lengths.
//!
//! Grounded on the reference `bufWriter`/`BufWriter`: append-write past
//! the current length extends it, filling any gap with zeros; seeking
//! supports start/current/end-relative offsets and rejects a negative
//! resulting position.

use std::io::{self, Read, Seek, SeekFrom, Write};

use crate::error::Error;

/// In-memory buffer implementing [`Write`] + [`Seek`].
#[derive(Default)]
pub struct SeekBuf {
    buf: Vec<u8>,
    pos: usize,
}

impl SeekBuf {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        SeekBuf::default()
    }

    /// Current logical length of the buffer.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Consumes the buffer, returning its contents.
    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

impl Write for SeekBuf {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let end = self.pos + data.len();
        if end > self.buf.len() {
            self.buf.resize(end, 0);
        }
        self.buf[self.pos..end].copy_from_slice(data);
        self.pos = end;
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Read for SeekBuf {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        let avail = self.buf.len().saturating_sub(self.pos);
        let n = Ord::min(avail, out.len());
        out[..n].copy_from_slice(&self.buf[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

impl Seek for SeekBuf {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let base = match pos {
            SeekFrom::Start(n) => n as i64,
            SeekFrom::Current(n) => self.pos as i64 + n,
            SeekFrom::End(n) => self.buf.len() as i64 + n,
        };
        if base < 0 {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, Error::Seek));
        }
        self.pos = base as usize;
        Ok(self.pos as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_extends_length() {
        let mut b = SeekBuf::new();
        b.write_all(b"hello").unwrap();
        assert_eq!(b.len(), 5);
        assert_eq!(b.into_inner(), b"hello");
    }

    #[test]
    fn write_at_position_fills_zero_gap() {
        let mut b = SeekBuf::new();
        b.seek(SeekFrom::Start(4)).unwrap();
        b.write_all(b"x").unwrap();
        assert_eq!(b.into_inner(), vec![0, 0, 0, 0, b'x']);
    }

    #[test]
    fn seek_start_then_overwrite() {
        let mut b = SeekBuf::new();
        b.write_all(b"0123456789").unwrap();
        b.seek(SeekFrom::Start(0)).unwrap();
        b.write_all(b"AB").unwrap();
        assert_eq!(b.into_inner(), b"AB23456789");
    }

    #[test]
    fn seek_current_and_end() {
        let mut b = SeekBuf::new();
        b.write_all(b"0123456789").unwrap();
        b.seek(SeekFrom::Current(-5)).unwrap();
        assert_eq!(b.pos, 5);
        b.seek(SeekFrom::End(-2)).unwrap();
        assert_eq!(b.pos, 8);
    }

    #[test]
    fn negative_seek_is_error() {
        let mut b = SeekBuf::new();
        assert!(b.seek(SeekFrom::Current(-1)).is_err());
    }

    #[test]
    fn read_after_rewind() {
        let mut b = SeekBuf::new();
        b.write_all(b"hello world").unwrap();
        b.seek(SeekFrom::Start(0)).unwrap();
        let mut out = [0u8; 5];
        b.read_exact(&mut out).unwrap();
        assert_eq!(&out, b"hello");
    }
}
