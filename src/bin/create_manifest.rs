//! Prints a directory manifest JSON for one or more paths: for each path,
//! the sorted, extension-stripped list of files in its directory.

use std::path::PathBuf;

use clap::Parser;

use allisbns::manifest::build_manifest;
use allisbns::Result;

/// Builds a `{directory name: [file stems]}` manifest for the given paths.
#[derive(Parser, Debug)]
#[command(name = "create_manifest")]
#[command(about = "Builds a directory manifest JSON for one or more paths")]
struct Args {
    /// One or more directories, or files (whose parent directory is used)
    #[arg(required = true)]
    paths: Vec<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let refs: Vec<&std::path::Path> = args.paths.iter().map(|p| p.as_path()).collect();
    let manifest = build_manifest(&refs)?;

    println!("{}", serde_json::to_string(&manifest).map_err(allisbns::Error::Json)?);
    Ok(())
}
