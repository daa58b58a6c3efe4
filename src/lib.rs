/*!
BSDIFF40-compatible binary delta compressor and patcher.

Builds the patch format popularized by Colin Percival's `bsdiff`: a
suffix-array-driven approximate block match over the old buffer, three
bzip2-compressed streams (control triples, byte-wise diffs, literal
extras), and a 32-byte header. The suffix sort, match search and
control-stream assembly are implemented in this crate rather than
delegated to an external suffix-array library, so the only third-party
dependency on the hot path is the bzip2 codec itself.

Add the dependency to `Cargo.toml`:
```toml
[dependencies]
bsdiff4 = "0.1"
```

Build the `bsdiff`/`bspatch` command-line tools with:
```shell
$ cargo build --release --bins --features cmd
$ target/release/bsdiff -h
$ target/release/bspatch -h
```

Examples
--------

Apply a patch to a source buffer and produce the target data:
```rust
use std::io;
use bsdiff4::Bspatch;

fn bspatch(source: &[u8], patch: &[u8]) -> Result<Vec<u8>, bsdiff4::Error> {
    let patcher = Bspatch::new(patch)?;
    let mut target = Vec::with_capacity(patcher.hint_target_size() as usize);
    patcher.apply(source, io::Cursor::new(&mut target))?;
    Ok(target)
}
```

Compare a source and target buffer, producing a patch:
```rust
use std::io;
use bsdiff4::Bsdiff;

fn bsdiff(source: &[u8], target: &[u8]) -> Result<Vec<u8>, bsdiff4::Error> {
    let mut patch = Vec::new();
    Bsdiff::new(source).compare(target, io::Cursor::new(&mut patch))?;
    Ok(patch)
}
```

This crate does not promise byte-for-byte identical patches to the
reference `bsdiff(1)` implementation — only that the patch *format* is
compatible, so a patch produced by one can always be applied by the
other.
*/

mod diff;
mod error;
mod ints;
mod patch;
mod seekbuf;
mod suffix;

pub use diff::{diff, Bsdiff, Compression};
pub use error::{Error, Result};
pub use patch::{patch, Bspatch};

/// Single bsdiff control instruction: add `add` bytes of `old`-relative
/// delta, then copy `copy` literal bytes, then seek `seek` bytes in `old`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Control {
    pub add: u64,
    pub copy: u64,
    pub seek: i64,
}
