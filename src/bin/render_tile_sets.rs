//! Renders every named coverage set in an ISBN-runs bundle into a
//! multi-scale PNG tile pyramid: the `md5` reference set on its own, every
//! other set split `in`/`out` against `md5`, and an aggregate `all`
//! union of every non-reference set, also split against `md5`.

use std::collections::HashMap;
use std::path::PathBuf;

use clap::Parser;

use allisbns::bencode::read_bundle;
use allisbns::runs::decode_runs;
use allisbns::tiles::coverage::{bitmaps_from_blocks, split_against_reference, union_all, Bitmap};
use allisbns::tiles::{generate_pyramid, COVERAGE_SCALES};
use allisbns::Result;

/// Tiles every named coverage bitmap in an ISBN-runs bundle.
#[derive(Parser, Debug)]
#[command(name = "render_tile_sets")]
#[command(about = "Renders coverage bitmaps from an ISBN-runs bundle into tile pyramids")]
struct Args {
    /// Bencoded, zstd-compressed ISBN-runs bundle
    bundle: PathBuf,

    /// Output directory
    output_dir: PathBuf,
}

fn render_set(bitmaps: &HashMap<u32, Bitmap>, out_dir: &std::path::Path) -> Result<()> {
    let mut prefixes: Vec<&u32> = bitmaps.keys().collect();
    prefixes.sort();
    for &prefix in prefixes {
        generate_pyramid(prefix, &bitmaps[&prefix], COVERAGE_SCALES, out_dir)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let file = std::fs::File::open(&args.bundle)?;
    let bundle = read_bundle(file)?;

    let md5_runs = bundle
        .get("md5")
        .ok_or_else(|| allisbns::Error::Other("bundle has no md5 set".into()))?;
    let md5_bitmaps = bitmaps_from_blocks(&decode_runs(md5_runs));
    render_set(&md5_bitmaps, &args.output_dir.join("md5"))?;

    let mut all_in: HashMap<u32, Bitmap> = HashMap::new();
    let mut all_out: HashMap<u32, Bitmap> = HashMap::new();

    for (set_name, packed) in &bundle {
        if set_name == "md5" {
            continue;
        }
        let bitmaps = bitmaps_from_blocks(&decode_runs(packed));
        let (in_maps, out_maps) = split_against_reference(&md5_bitmaps, &bitmaps);
        render_set(&in_maps, &args.output_dir.join(format!("{set_name}_in")))?;
        render_set(&out_maps, &args.output_dir.join(format!("{set_name}_out")))?;

        all_in = union_all([&all_in, &in_maps].into_iter());
        all_out = union_all([&all_out, &out_maps].into_iter());
    }

    render_set(&all_in, &args.output_dir.join("all_in"))?;
    render_set(&all_out, &args.output_dir.join("all_out"))?;

    println!("tiles written to {}", args.output_dir.display());
    Ok(())
}
