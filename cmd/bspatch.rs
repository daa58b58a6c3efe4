#![forbid(unsafe_code)]
use std::fs;
use std::io;
use std::io::prelude::*;
use std::process;
use std::time::Instant;

use bsdiff4::Bspatch;
use clap::Parser;

#[derive(Parser, Debug)]
#[clap(
    name = "bspatch",
    version,
    about = "BSDIFF40-compatible binary patch applier",
    long_about = None,
)]
struct BspatchArgs {
    /// source file ("-" for stdin)
    #[clap(value_name = "SOURCE")]
    source_path: String,

    /// target file ("-" for stdout)
    #[clap(value_name = "TARGET")]
    target_path: String,

    /// patch file ("-" for stdin)
    #[clap(value_name = "PATCH")]
    patch_path: String,
}

fn main() {
    env_logger::init();

    let args = BspatchArgs::parse();
    if let Err(e) = execute(args) {
        log::error!("{}", e);
        process::exit(1);
    }
}

fn execute(args: BspatchArgs) -> io::Result<()> {
    if args.source_path == "-" && args.patch_path == "-" {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "source and patch could not both be stdin",
        ));
    }

    let mut source = read_input(&args.source_path)?;
    source.shrink_to_fit();
    let mut patch_bytes = read_input(&args.patch_path)?;
    patch_bytes.shrink_to_fit();

    let mut target: Box<dyn Write> = if args.target_path == "-" {
        Box::new(io::stdout())
    } else {
        Box::new(fs::File::create(&args.target_path)?)
    };

    let bspatch = Bspatch::new(&patch_bytes)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    log::info!("patch declares a {} byte target", bspatch.hint_target_size());

    let started = Instant::now();
    let size = bspatch
        .apply(&source, &mut target)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    log::info!("wrote {} bytes in {:?}", size, started.elapsed());
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
