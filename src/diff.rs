//! Diff construction: scans `new` against a suffix array of `old`,
//! extends approximate matches, and assembles the BSDIFF40 patch
//! container.
//!
//! The scan/extend/overlap-resolution loop is a direct port of the
//! reference `bsdiff` algorithm (`oldscore`, the `len > oldscore + 8`
//! dismatch threshold, forward/backward extension scored by
//! `2*matched - length`). The threshold is preserved exactly: it does
//! not affect decodability, but an encoder using a different threshold
//! would emit a different (still valid) patch, and this crate aims to
//! reproduce the reference encoder's output shape.

use std::io::{Seek, SeekFrom, Write};

use bzip2::write::BzEncoder;
pub use bzip2::Compression;

use crate::error::Result;
use crate::ints::encode_int;
use crate::seekbuf::SeekBuf;
use crate::suffix::SuffixArray;

/// Default bzip2 compression level.
pub const LEVEL: Compression = Compression::Default;

/// Default size of the internal delta scratch buffer.
pub const BUFFER_SIZE: usize = 16384;

/// Builder for constructing a BSDIFF40 patch from a source buffer.
///
/// Sorts the suffix array of `source` eagerly on construction, so a
/// single [`Bsdiff`] can be reused to compare the same source against
/// several targets without re-sorting.
pub struct Bsdiff<'s> {
    source: &'s [u8],
    sa: SuffixArray,
    level: Compression,
    bsize: usize,
}

impl<'s> Bsdiff<'s> {
    /// Prepares for delta compression and immediately sorts the suffix array.
    pub fn new(source: &'s [u8]) -> Self {
        Bsdiff {
            source,
            sa: SuffixArray::build(source),
            level: LEVEL,
            bsize: BUFFER_SIZE,
        }
    }

    /// Sets the bzip2 compression level (default [`LEVEL`]).
    ///
    /// Affects only the size of the resulting patch, never its
    /// decodability.
    pub fn compression_level(mut self, level: Compression) -> Self {
        self.level = level;
        self
    }

    /// Sets the scratch-buffer size used while building diff bytes
    /// (`bs >= 128`, default [`BUFFER_SIZE`]).
    pub fn buffer_size(mut self, mut bs: usize) -> Self {
        if bs < 128 {
            bs = 128;
        }
        self.bsize = bs;
        self
    }

    /// Compares `target` against the source and writes a BSDIFF40
    /// patch to `patch`. Returns the size in bytes of the patch.
    pub fn compare<W: Write>(&self, target: &[u8], patch: W) -> Result<u64> {
        compare(self.source, &self.sa, target, self.level, self.bsize, patch)
    }
}

/// Computes a BSDIFF40-compatible patch turning `old` into `new`.
pub fn diff(old: &[u8], new: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    Bsdiff::new(old).compare(new, &mut out)?;
    Ok(out)
}

fn compare<W: Write>(
    old: &[u8],
    sa: &SuffixArray,
    new: &[u8],
    level: Compression,
    bsize: usize,
    mut patch: W,
) -> Result<u64> {
    let mut buf = SeekBuf::new();

    // Reserve the 32-byte header slot; lengths are back-patched below
    // once the compressed stream sizes are known.
    let mut header = [0u8; 32];
    header[0..8].copy_from_slice(b"BSDIFF40");
    encode_int(new.len() as i64, &mut header[24..32]);
    buf.write_all(&header)?;

    let (db, eb) = {
        let mut ctrls = BzEncoder::new(buf, level);
        let (d, e) = scan(old, new, sa, &mut ctrls)?;
        buf = ctrls.finish()?;
        (d, e)
    };

    let ctrl_end = buf.len();
    encode_int((ctrl_end - 32) as i64, &mut header[8..16]);

    buf = {
        let mut diff_enc = BzEncoder::new(buf, level);
        write_in_chunks(&mut diff_enc, &db, bsize)?;
        diff_enc.finish()?
    };
    let diff_end = buf.len();
    encode_int((diff_end - ctrl_end) as i64, &mut header[16..24]);

    buf = {
        let mut extra_enc = BzEncoder::new(buf, level);
        write_in_chunks(&mut extra_enc, &eb, bsize)?;
        extra_enc.finish()?
    };

    buf.seek(SeekFrom::Start(0))?;
    buf.write_all(&header)?;

    let bytes = buf.into_inner();
    let total = bytes.len() as u64;
    patch.write_all(&bytes)?;
    patch.flush()?;
    Ok(total)
}

/// Writes `data` through `w` in `bsize`-sized chunks, rather than one
/// large `write_all`, so a single diff/extra stream never demands an
/// allocation larger than the configured scratch size from the
/// underlying bzip2 encoder.
fn write_in_chunks<W: Write>(w: &mut W, data: &[u8], bsize: usize) -> Result<()> {
    for chunk in data.chunks(bsize.max(1)) {
        w.write_all(chunk)?;
    }
    Ok(())
}

/// Drives the scan over `new`, writing encoded control triples to
/// `ctrls` as they are found and returning the accumulated diff/extra
/// byte streams (compressed separately once the scan completes, since
/// their total length is only known at the end).
fn scan<W: Write>(
    old: &[u8],
    new: &[u8],
    sa: &SuffixArray,
    ctrls: &mut W,
) -> Result<(Vec<u8>, Vec<u8>)> {
    let mut db = Vec::with_capacity(new.len());
    let mut eb = Vec::with_capacity(new.len());

    let mut scan = 0usize;
    let mut len = 0usize;
    let mut pos = 0usize;
    let mut lastscan = 0usize;
    let mut lastpos = 0usize;
    let mut lastoffset: isize = 0;

    while scan < new.len() {
        let mut oldscore = 0isize;
        scan += len;
        let mut scsc = scan;

        while scan < new.len() {
            let (p, l) = sa.search(old, &new[scan..]);
            pos = p;
            len = l;

            while scsc < scan + len {
                if (scsc as isize + lastoffset) >= 0
                    && (scsc as isize + lastoffset) < old.len() as isize
                    && old[(scsc as isize + lastoffset) as usize] == new[scsc]
                {
                    oldscore += 1;
                }
                scsc += 1;
            }

            if (len as isize == oldscore && len != 0) || len as isize > oldscore + 8 {
                break;
            }

            if (scan as isize + lastoffset) >= 0
                && (scan as isize + lastoffset) < old.len() as isize
                && old[(scan as isize + lastoffset) as usize] == new[scan]
            {
                oldscore -= 1;
            }
            scan += 1;
        }

        if len != oldscore as usize || scan == new.len() {
            // Forward extension from (lastscan, lastpos).
            let mut s = 0isize;
            let mut sf = 0isize;
            let mut lenf = 0usize;
            let mut i = 0usize;
            while lastscan + i < scan && lastpos + i < old.len() {
                if old[lastpos + i] == new[lastscan + i] {
                    s += 1;
                }
                i += 1;
                if s * 2 - i as isize > sf * 2 - lenf as isize {
                    sf = s;
                    lenf = i;
                }
            }

            // Backward extension from (scan, pos).
            let mut lenb = 0usize;
            if scan < new.len() {
                let mut s = 0isize;
                let mut sb = 0isize;
                let mut i = 1usize;
                while scan >= lastscan + i && pos >= i {
                    if old[pos - i] == new[scan - i] {
                        s += 1;
                    }
                    if s * 2 - i as isize > sb * 2 - lenb as isize {
                        sb = s;
                        lenb = i;
                    }
                    i += 1;
                }
            }

            // Overlap resolution.
            if lastscan + lenf > scan - lenb {
                let overlap = (lastscan + lenf) - (scan - lenb);
                let mut s = 0isize;
                let mut ss = 0isize;
                let mut lens = 0usize;
                for i in 0..overlap {
                    if new[lastscan + lenf - overlap + i] == old[lastpos + lenf - overlap + i] {
                        s += 1;
                    }
                    if new[scan - lenb + i] == old[pos - lenb + i] {
                        s -= 1;
                    }
                    if s > ss {
                        ss = s;
                        lens = i + 1;
                    }
                }
                lenf = lenf + lens - overlap;
                lenb -= lens;
            }

            for i in 0..lenf {
                db.push(new[lastscan + i].wrapping_sub(old[lastpos + i]));
            }
            let extra_len = (scan - lenb) - (lastscan + lenf);
            for i in 0..extra_len {
                eb.push(new[lastscan + lenf + i]);
            }

            let mut ctl = [0u8; 24];
            encode_int(lenf as i64, &mut ctl[0..8]);
            encode_int(extra_len as i64, &mut ctl[8..16]);
            encode_int(
                (pos as i64 - lenb as i64) - (lastpos as i64 + lenf as i64),
                &mut ctl[16..24],
            );
            ctrls.write_all(&ctl)?;

            lastscan = scan - lenb;
            lastpos = pos - lenb;
            lastoffset = pos as isize - scan as isize;
        }
    }

    Ok((db, eb))
}
