//! Plots registration-agency prefix ranges from the `{prefix: agency}`
//! JSON map into a single low-resolution overview PNG, one filled
//! rectangle per prefix.

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::Parser;
use image::{GrayImage, Luma};

use allisbns::isbn::{get_pos_str, HEIGHT, WIDTH};
use allisbns::Result;

/// Renders registration-agency ranges into a single overview PNG.
#[derive(Parser, Debug)]
#[command(name = "plot_agencies")]
#[command(about = "Plots registration-agency ISBN prefix ranges into one overview PNG")]
struct Args {
    /// Input `{prefix: agency}` JSON map
    input: PathBuf,

    /// Output PNG path
    output: PathBuf,
}

/// The pixel extent of one prefix's range on the full canvas: `10,000 x
/// 10,000` for a 2-digit prefix, or whatever a same-length probe string
/// maps to otherwise.
fn prefix_extent(prefix: &str) -> (i64, i64) {
    if prefix.len() == 2 {
        return (10_000, 10_000);
    }
    get_pos_str(&format!("{}{}", "0".repeat(prefix.len() - 2), "11"))
}

fn fill_rect(image: &mut GrayImage, x0: i64, y0: i64, x1: i64, y1: i64) {
    let (width, height) = (image.width() as i64, image.height() as i64);
    let x0 = x0.clamp(0, width - 1);
    let y0 = y0.clamp(0, height - 1);
    let x1 = x1.clamp(0, width - 1);
    let y1 = y1.clamp(0, height - 1);
    for y in y0..=y1 {
        for x in x0..=x1 {
            image.put_pixel(x as u32, y as u32, Luma([255]));
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let raw = std::fs::read_to_string(&args.input)?;
    let agencies: BTreeMap<String, serde_json::Value> =
        serde_json::from_str(&raw).map_err(allisbns::Error::Json)?;

    let mut image = GrayImage::new(WIDTH / 100, HEIGHT / 100);
    for prefix in agencies.keys() {
        let (x, y) = get_pos_str(prefix);
        let (w, h) = prefix_extent(prefix);
        fill_rect(
            &mut image,
            x / 100,
            y / 100,
            (x + w) / 100 - 1,
            (y + h) / 100 - 1,
        );
    }
    image.save(&args.output)?;

    println!("wrote {}", args.output.display());
    Ok(())
}
