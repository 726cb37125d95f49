//! Builds the publisher-prefix index from a zstd-compressed JSONL stream
//! of ISBN-registration-group records, sharding it into JSON files and a
//! flat list of every prefix seen.

use std::path::PathBuf;

use clap::Parser;

use allisbns::publishers::{build_publisher_index, write_shards};
use allisbns::Result;

/// Indexes publisher names by ISBN prefix and shards the result to disk.
#[derive(Parser, Debug)]
#[command(name = "extract_publishers")]
#[command(about = "Builds the publisher-prefix index from a zstd-compressed registrant stream")]
struct Args {
    /// Input zstd-compressed JSONL stream of registration-group records
    input: PathBuf,

    /// Directory to write the sharded JSON index into
    output_dir: PathBuf,

    /// Path for the flat, sorted, newline-delimited prefix list
    output_prefixes: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let file = std::fs::File::open(&args.input)?;
    let index = build_publisher_index(file)?;
    let shards = write_shards(&index, &args.output_dir)?;

    let default_list = args.output_dir.join("prefixes.txt");
    if default_list != args.output_prefixes {
        std::fs::rename(&default_list, &args.output_prefixes)?;
    }

    println!(
        "wrote {shards} shard(s) and {} prefixes to {}",
        index.len(),
        args.output_dir.display()
    );
    Ok(())
}
