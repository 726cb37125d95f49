//! Drives the parallel decode pipeline over a zstd-compressed corpus file.

use std::path::PathBuf;

use clap::Parser;

use allisbns::pipeline::run_pipeline;
use allisbns::Result;

/// Aggregates a zstandard-compressed, OCLC-grouped bibliographic JSONL
/// corpus into the compact binary ISBN side-table format.
#[derive(Parser, Debug)]
#[command(name = "processor")]
#[command(about = "Decodes a bibliographic corpus into the binary ISBN side-table format")]
struct Args {
    /// Input .jsonl.seekable.zst corpus file
    input: PathBuf,

    /// Output path for the binary side-table
    output: PathBuf,

    /// Number of chunks decoded concurrently
    #[arg(long, default_value_t = 4)]
    workers: usize,

    /// Number of independently decodable corpus ranges; defaults to
    /// `--workers`
    #[arg(long)]
    chunks: Option<usize>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let chunks = args.chunks.unwrap_or(args.workers);

    let stats = run_pipeline(&args.input, &args.output, args.workers, chunks)?;
    println!(
        "wrote {} ({} records, {} uncompressed bytes read)",
        args.output.display(),
        stats.records,
        stats.uncompressed_bytes
    );
    Ok(())
}
