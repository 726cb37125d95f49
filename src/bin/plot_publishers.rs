//! Plots publisher-prefix ranges from a flat, newline-delimited prefix
//! list (as produced by `extract_publishers`) into the `PlotSet` preview
//! images.

use std::io::BufRead;
use std::path::PathBuf;

use clap::Parser;

use allisbns::plot::PlotSet;
use allisbns::Result;

/// Renders a flat prefix list into per-length overview PNGs.
#[derive(Parser, Debug)]
#[command(name = "plot_publishers")]
#[command(about = "Plots publisher ISBN prefix ranges from a flat prefix list")]
struct Args {
    /// Newline-delimited prefix list
    input: PathBuf,

    /// Output directory for the preview images
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let file = std::fs::File::open(&args.input)?;
    let mut set = PlotSet::new();
    for line in std::io::BufReader::new(file).lines() {
        let line = line?;
        let isbn = line.trim();
        if isbn.is_empty() {
            continue;
        }
        set.set(isbn);
    }
    set.save(&args.output)?;

    println!("wrote previews to {}", args.output.display());
    Ok(())
}
