//! Renders the year/holdings attribute tensors into a multi-scale PNG
//! tile pyramid, split into `in`/`out` halves against the `md5` coverage
//! set from an ISBN-runs bundle.

use std::path::PathBuf;

use clap::Parser;

use allisbns::bencode::read_bundle;
use allisbns::runs::decode_runs;
use allisbns::tiles::attributes::{build_tensors, MaskedChannelPlane};
use allisbns::tiles::coverage::bitmaps_from_blocks;
use allisbns::tiles::{generate_pyramid, ATTRIBUTE_SCALES};
use allisbns::Result;

const CATEGORIES: [&str; 2] = ["years", "holdings"];

/// Tiles the per-prefix year/holdings attribute tensors decoded from a
/// binary side-table file.
#[derive(Parser, Debug)]
#[command(name = "render_tile_props")]
#[command(about = "Renders ISBN year/holdings attributes into tile pyramids")]
struct Args {
    /// Binary side-table produced by `processor`
    binary: PathBuf,

    /// Output directory
    output_dir: PathBuf,

    /// Bencoded, zstd-compressed ISBN-runs bundle containing the `md5` set
    #[arg(long)]
    isbncodes: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let data = std::fs::read(&args.binary)?;
    let (tensors, _zero_holdings) = build_tensors(&data)?;

    let bundle_file = std::fs::File::open(&args.isbncodes)?;
    let bundle = read_bundle(bundle_file)?;
    let md5_runs = bundle
        .get("md5")
        .ok_or_else(|| allisbns::Error::Other("bundle has no md5 set".into()))?;
    let md5_blocks = decode_runs(md5_runs);
    let md5_bitmaps = bitmaps_from_blocks(&md5_blocks);

    for category in CATEGORIES {
        std::fs::create_dir_all(args.output_dir.join(format!("{category}_in")))?;
        std::fs::create_dir_all(args.output_dir.join(format!("{category}_out")))?;
    }

    let mut prefixes: Vec<&u32> = md5_bitmaps.keys().collect();
    prefixes.sort();
    for &prefix in prefixes {
        let Some(tensor) = tensors.get(&prefix) else {
            log::warn!("prefix {prefix} not found in tensors");
            continue;
        };
        let mask = &md5_bitmaps[&prefix];

        for (channel, category) in CATEGORIES.iter().enumerate() {
            let in_plane = MaskedChannelPlane::new(tensor, channel, mask, false);
            generate_pyramid(
                prefix,
                &in_plane,
                ATTRIBUTE_SCALES,
                &args.output_dir.join(format!("{category}_in")),
            )?;

            let out_plane = MaskedChannelPlane::new(tensor, channel, mask, true);
            generate_pyramid(
                prefix,
                &out_plane,
                ATTRIBUTE_SCALES,
                &args.output_dir.join(format!("{category}_out")),
            )?;
        }
    }

    println!("tiles written to {}", args.output_dir.display());
    Ok(())
}
