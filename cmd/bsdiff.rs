#![forbid(unsafe_code)]
use std::fs;
use std::io;
use std::io::prelude::*;
use std::process;
use std::time::Instant;

use bsdiff4::{Bsdiff, Compression};
use clap::Parser;

#[derive(Parser, Debug)]
#[clap(
    name = "bsdiff",
    version,
    about = "BSDIFF40-compatible binary delta compressor",
    long_about = None,
)]
struct BsdiffArgs {
    /// source file ("-" for stdin)
    #[clap(value_name = "SOURCE")]
    source_path: String,

    /// target file ("-" for stdin)
    #[clap(value_name = "TARGET")]
    target_path: String,

    /// patch file ("-" for stdout)
    #[clap(value_name = "PATCH")]
    patch_path: String,

    /// bzip2 compression level: fastest, default, or best
    #[clap(short = 'z', value_name = "LEVEL")]
    compression_level: Option<String>,

    /// internal scratch-buffer size
    #[clap(short = 'b', value_name = "BUFFER")]
    buffer_size: Option<usize>,
}

fn main() {
    env_logger::init();

    let args = BsdiffArgs::parse();
    if let Err(e) = execute(args) {
        log::error!("{}", e);
        process::exit(1);
    }
}

fn execute(args: BsdiffArgs) -> io::Result<()> {
    if args.source_path == "-" && args.target_path == "-" {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "source and target could not both be stdin",
        ));
    }

    let mut source = read_input(&args.source_path)?;
    source.shrink_to_fit();
    let mut target = read_input(&args.target_path)?;
    target.shrink_to_fit();

    let mut patch: Box<dyn Write> = if args.patch_path == "-" {
        Box::new(io::stdout())
    } else {
        Box::new(fs::File::create(&args.patch_path)?)
    };

    let mut bsdiff = Bsdiff::new(&source[..]);
    if let Some(level) = args.compression_level {
        let level = match level.as_str() {
            "fastest" => Compression::Fastest,
            "best" => Compression::Best,
            "default" => Compression::Default,
            other => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("unknown compression level {:?} (want fastest, default, or best)", other),
                ))
            }
        };
        bsdiff = bsdiff.compression_level(level);
    }
    if let Some(bsize) = args.buffer_size {
        bsdiff = bsdiff.buffer_size(bsize);
    }

    let started = Instant::now();
    let size = bsdiff
        .compare(&target[..], &mut patch)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    log::info!(
        "wrote {} byte patch ({} -> {} bytes) in {:?}",
        size,
        source.len(),
        target.len(),
        started.elapsed()
    );
    Ok(())
}

fn read_input(path: &str) -> io::Result<Vec<u8>> {
    if path == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        Ok(buf)
    } else {
        fs::read(path)
    }
}
