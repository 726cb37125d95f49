//! Extracts the `{prefix: agency}` map from the ISBN range-allocation XML.

use std::path::PathBuf;

use clap::Parser;

use allisbns::agencies::extract_agencies;
use allisbns::Result;

/// Parses the ISBN range-allocation XML into a prefix-to-agency JSON map.
#[derive(Parser, Debug)]
#[command(name = "extract_agencies")]
#[command(about = "Extracts the prefix-to-agency map from the ISBN range-allocation XML")]
struct Args {
    /// Input RangeMessage.xml
    xml: PathBuf,

    /// Output JSON path
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let xml = std::fs::read_to_string(&args.xml)?;
    let agencies = extract_agencies(&xml)?;

    let file = std::fs::File::create(&args.output)?;
    serde_json::to_writer(file, &agencies).map_err(allisbns::Error::Json)?;

    println!("wrote {} agencies to {}", agencies.len(), args.output.display());
    Ok(())
}
