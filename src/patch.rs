//! Patch application: parses the BSDIFF40 header, opens the three
//! independently-positioned decompressed streams, and replays control
//! triples against `old` to reconstruct `new`.
//!
//! A direct port of the reference `Patch`: the only deliberate
//! divergence is that short reads across the compressed streams are
//! looped rather than treated as fatal on the first partial read,
//! since a bzip2 reader may legitimately return less than requested
//! per call.

use std::io::{Cursor, Read, Write};

use bzip2::read::BzDecoder;

use crate::error::{Error, Result};
use crate::ints::decode_int;
use crate::Control;

const HEADER_SIZE: usize = 32;
const MAGIC: &[u8; 8] = b"BSDIFF40";

/// Parsed BSDIFF40 patch, ready to be applied to a source buffer.
pub struct Bspatch<'p> {
    patch: &'p [u8],
    ctrl_start: usize,
    diff_start: usize,
    extra_start: usize,
    tsize: u64,
}

impl<'p> Bspatch<'p> {
    /// Parses the patch header.
    ///
    /// Returns [`Error::CorruptHeader`] if the patch is shorter than 32
    /// bytes, the magic does not match, any header length field decodes
    /// negative, or the declared section lengths overrun the patch.
    pub fn new(patch: &'p [u8]) -> Result<Self> {
        if patch.len() < HEADER_SIZE || &patch[..8] != MAGIC {
            return Err(Error::CorruptHeader);
        }

        let csize = decode_int(&patch[8..16]);
        let dsize = decode_int(&patch[16..24]);
        let tsize = decode_int(&patch[24..32]);
        if csize < 0 || dsize < 0 || tsize < 0 {
            return Err(Error::CorruptHeader);
        }
        let (csize, dsize) = (csize as usize, dsize as usize);

        let ctrl_start = HEADER_SIZE;
        let diff_start = ctrl_start.checked_add(csize).ok_or(Error::CorruptHeader)?;
        let extra_start = diff_start.checked_add(dsize).ok_or(Error::CorruptHeader)?;
        if extra_start > patch.len() {
            return Err(Error::CorruptHeader);
        }

        Ok(Bspatch {
            patch,
            ctrl_start,
            diff_start,
            extra_start,
            tsize: tsize as u64,
        })
    }

    /// Hints the final target buffer size, decoded from the header.
    pub fn hint_target_size(&self) -> u64 {
        self.tsize
    }

    /// Applies the patch to `source`, writing the reconstructed target
    /// to `target`. Returns the number of bytes written.
    pub fn apply<W: Write>(self, source: &[u8], target: W) -> Result<u64> {
        let ctrls = BzDecoder::new(Cursor::new(&self.patch[self.ctrl_start..self.diff_start]));
        let delta = BzDecoder::new(Cursor::new(&self.patch[self.diff_start..self.extra_start]));
        let extra = BzDecoder::new(Cursor::new(&self.patch[self.extra_start..]));

        let ctx = Context {
            source,
            target,
            ctrls,
            delta,
            extra,
            tsize: self.tsize,
        };
        ctx.apply()
    }
}

/// Applies a BSDIFF40 `patch` to `old`, returning the reconstructed buffer.
pub fn patch(old: &[u8], patch_bytes: &[u8]) -> Result<Vec<u8>> {
    let bspatch = Bspatch::new(patch_bytes)?;
    let mut out = Vec::with_capacity(bspatch.hint_target_size() as usize);
    bspatch.apply(old, &mut out)?;
    Ok(out)
}

struct Context<'s, W> {
    source: &'s [u8],
    target: W,
    ctrls: BzDecoder<Cursor<&'s [u8]>>,
    delta: BzDecoder<Cursor<&'s [u8]>>,
    extra: BzDecoder<Cursor<&'s [u8]>>,
    tsize: u64,
}

impl<'s, W: Write> Context<'s, W> {
    fn apply(mut self) -> Result<u64> {
        let newsize = self.tsize as usize;
        let mut newbuf = vec![0u8; newsize];
        let mut oldpos: i64 = 0;
        let mut newpos: usize = 0;

        while newpos < newsize {
            let Control { add, copy, seek } = self.next_control()?;
            let (add, copy) = (add as usize, copy as usize);

            if newpos.checked_add(add).ok_or(Error::SanityFailure)? > newsize {
                return Err(Error::SanityFailure);
            }
            read_exact_stream(&mut self.delta, &mut newbuf[newpos..newpos + add])?;
            for i in 0..add {
                let op = oldpos + i as i64;
                if op >= 0 && (op as usize) < self.source.len() {
                    newbuf[newpos + i] = newbuf[newpos + i].wrapping_add(self.source[op as usize]);
                }
            }
            newpos += add;
            oldpos += add as i64;

            if newpos.checked_add(copy).ok_or(Error::SanityFailure)? > newsize {
                return Err(Error::SanityFailure);
            }
            read_exact_stream(&mut self.extra, &mut newbuf[newpos..newpos + copy])?;
            newpos += copy;
            oldpos += seek;
        }

        self.target.write_all(&newbuf)?;
        self.target.flush()?;
        Ok(newsize as u64)
    }

    /// Reads the next control triple. `add`/`copy` are guaranteed
    /// non-negative here; a negative encoding is [`Error::CorruptStream`]
    /// since only a malformed control stream could produce one (a
    /// correct encoder never emits negative lengths for these fields).
    fn next_control(&mut self) -> Result<Control> {
        let mut ctl = [0u8; 8];
        read_exact_stream(&mut self.ctrls, &mut ctl)?;
        let add = decode_int(&ctl);
        read_exact_stream(&mut self.ctrls, &mut ctl)?;
        let copy = decode_int(&ctl);
        read_exact_stream(&mut self.ctrls, &mut ctl)?;
        let seek = decode_int(&ctl);

        if add < 0 || copy < 0 {
            return Err(Error::CorruptStream);
        }
        Ok(Control {
            add: add as u64,
            copy: copy as u64,
            seek,
        })
    }
}

/// Reads exactly `buf.len()` bytes from `r`, looping across short
/// reads (a bzip2 reader may satisfy a request over several calls).
/// Any EOF before `buf` is filled is [`Error::CorruptStream`].
fn read_exact_stream<R: Read>(r: &mut R, buf: &mut [u8]) -> Result<()> {
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => return Err(Error::CorruptStream),
            Ok(n) => filled += n,
            Err(ref e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(Error::from(e)),
        }
    }
    Ok(())
}
