//! Plots every registration group's publisher-allocation ranges from the
//! ISBN range-allocation XML into the `PlotSet` preview images.
//!
//! Unlike [`allisbns::agencies`], which only needs each `Group`'s
//! `Prefix`/`Agency` pair, this walks every `Rules/Rule`'s `Range` and
//! `Length` to enumerate the numeric publisher ranges themselves.

use std::path::PathBuf;

use clap::Parser;
use indicatif::ProgressBar;
use quick_xml::events::Event;
use quick_xml::reader::Reader;

use allisbns::isbn::normalize_isbn;
use allisbns::plot::PlotSet;
use allisbns::{Error, Result};

/// Renders ISBN registration-group allocation ranges into per-length
/// overview PNGs.
#[derive(Parser, Debug)]
#[command(name = "plot_allocations")]
#[command(about = "Plots ISBN publisher allocation ranges from the range-allocation XML")]
struct Args {
    /// Input RangeMessage.xml
    input: PathBuf,

    /// Output directory for the preview images
    output: PathBuf,
}

struct Rule {
    range: String,
    length: i64,
}

fn plot_rule(set: &mut PlotSet, prefix: &str, rule: &Rule) {
    if rule.length <= 0 {
        return;
    }
    let length = rule.length as usize;
    let size = prefix.len() + length;
    if !(4..=9).contains(&size) {
        return;
    }

    let bounds: Vec<u64> = rule
        .range
        .split('-')
        .filter_map(|part| {
            let truncated: String = part.chars().take(length).collect();
            format!("{prefix}{truncated}").parse().ok()
        })
        .collect();
    let (Some(&start), Some(&end)) = (bounds.first(), bounds.last()) else {
        return;
    };

    for i in start..=end {
        let isbn = format!("{i:0width$}", width = size);
        set.set(&isbn);
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let xml = std::fs::read_to_string(&args.input)?;
    let mut reader = Reader::from_str(&xml);
    reader.config_mut().trim_text(true);

    let mut set = PlotSet::new();
    let mut in_group = false;
    let mut in_rule = false;
    let mut current_tag = String::new();
    let mut prefix = String::new();
    let mut range: Option<String> = None;
    let mut length: Option<i64> = None;
    let bar = ProgressBar::new_spinner();

    loop {
        match reader.read_event().map_err(|e| Error::Xml(e.into()))? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if name == "Group" {
                    in_group = true;
                    prefix.clear();
                } else if name == "Rule" {
                    in_rule = true;
                    range = None;
                    length = None;
                } else {
                    current_tag = name;
                }
            }
            Event::Text(t) => {
                let decoded = t.decode().map_err(|e| Error::Xml(e.into()))?;
                let text = quick_xml::escape::unescape(&decoded)
                    .map_err(|e| Error::Xml(e.into()))?
                    .to_string();
                if in_rule {
                    match current_tag.as_str() {
                        "Range" => range = Some(text),
                        "Length" => length = text.trim().parse().ok(),
                        _ => {}
                    }
                } else if in_group && current_tag == "Prefix" {
                    prefix = normalize_isbn(&text, true);
                }
            }
            Event::End(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if name == "Rule" {
                    in_rule = false;
                    if let (Some(range), Some(length)) = (range.take(), length.take()) {
                        plot_rule(&mut set, &prefix, &Rule { range, length });
                        bar.inc(1);
                    }
                } else if name == "Group" {
                    in_group = false;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    bar.finish_and_clear();

    set.save(&args.output)?;
    println!("wrote previews to {}", args.output.display());
    Ok(())
}
