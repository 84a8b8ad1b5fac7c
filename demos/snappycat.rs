//! Decompresses hadoop-snappy files to stdout.
#[path = "common/logsetup.rs"]
mod logsetup;

use std::{fs, io, process};

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::Parser;
use log::*;

#[derive(Parser, Debug)]
struct Args {
    /// Verbosity (-v, -vv, -vvv, etc.)
    #[clap(short, long, parse(from_occurrences))]
    verbose: u8,

    #[clap(short, long, arg_enum, default_value = "auto")]
    color: logsetup::Color,

    /// Reject blocks larger than this many bytes
    #[clap(long)]
    block_limit: Option<usize>,

    files: Vec<Utf8PathBuf>,
}

fn cat(path: &Utf8PathBuf, options: &hadoop_snappy::ReaderOptions) -> Result<u64> {
    let fd = fs::File::open(path).with_context(|| format!("Couldn't open {path}"))?;
    let mut reader =
        hadoop_snappy::Reader::new_with_options(io::BufReader::new(fd), options.clone());
    let stdout = io::stdout();
    io::copy(&mut reader, &mut stdout.lock()).with_context(|| format!("Couldn't decompress {path}"))
}

fn run() -> Result<()> {
    let args = Args::parse();
    logsetup::init_logger(args.verbose, args.color)?;

    let mut options = hadoop_snappy::ReaderOptions::default();
    if let Some(limit) = args.block_limit {
        options = options.with_block_length_limit(limit);
    }

    for path in &args.files {
        let written = cat(path, &options)?;
        info!("{path}: {written} bytes");
    }
    Ok(())
}

fn main() {
    run().unwrap_or_else(|e| {
        error!("{:?}", e);
        process::exit(1);
    });
}
