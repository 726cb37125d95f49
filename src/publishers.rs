//! Builds a `{prefix: [publisher names]}` index from a zstd-compressed
//! JSONL stream of ISBN-registration-group records, then shards it into
//! ~100 KB JSON files plus a flat sorted list of every prefix seen.

use std::collections::BTreeMap;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;

use serde::Deserialize;

use crate::error::Result;
use crate::isbn::normalize_isbn;
use crate::zstdio;

const SHARD_TARGET_BYTES: usize = 100_000;

#[derive(Deserialize)]
struct RegistrantRecord {
    metadata: Option<RegistrantMetadata>,
}

#[derive(Deserialize)]
struct RegistrantMetadata {
    record: Option<RegistrantInner>,
}

#[derive(Deserialize)]
struct RegistrantInner {
    registrant_name: Option<String>,
    isbns: Option<Vec<IsbnEntry>>,
}

#[derive(Deserialize)]
struct IsbnEntry {
    isbn_type: String,
    isbn: String,
}

/// Reads a zstd-compressed JSONL stream of registration records and
/// groups registrant names by normalized prefix.
///
/// A record's `isbns` list may mix `"prefix"` entries (the prefix is
/// used directly, hyphens stripped) with `"isbn13"` entries (the
/// agency-publisher segment of the hyphenated ISBN-13, i.e. its first
/// two dash-separated parts). A prefix with no associated registrant
/// name still gets an entry in the index, so every prefix this stream
/// ever mentions ends up in `prefixes.txt`.
pub fn build_publisher_index<R: Read>(reader: R) -> Result<BTreeMap<String, Vec<String>>> {
    let decoder = zstdio::open(reader)?;
    let mut index: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for line in BufReader::new(decoder).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: RegistrantRecord = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(_) => continue,
        };
        let Some(inner) = record.metadata.and_then(|m| m.record) else {
            continue;
        };
        let Some(isbns) = inner.isbns else {
            continue;
        };

        for entry in &isbns {
            let prefix = match entry.isbn_type.as_str() {
                "prefix" => Some(normalize_isbn(&entry.isbn, true)),
                "isbn13" => {
                    let normalized = normalize_isbn(&entry.isbn, false);
                    let agency_publisher: String =
                        normalized.split('-').take(2).collect::<Vec<_>>().join("");
                    Some(agency_publisher)
                }
                _ => None,
            };
            let Some(prefix) = prefix else { continue };

            let bucket = index.entry(prefix).or_default();
            if entry.isbn_type == "prefix" {
                if let Some(name) = &inner.registrant_name {
                    bucket.push(name.clone());
                }
            }
        }
    }

    Ok(index)
}

/// Writes `index` as size-bucketed JSON shard files under `out_dir`, each
/// holding roughly `SHARD_TARGET_BYTES` bytes of JSON and named after the
/// first prefix written into it, plus a flat `prefixes.txt` newline list
/// of every prefix, sorted, with no trailing newline after the last
/// entry.
pub fn write_shards(index: &BTreeMap<String, Vec<String>>, out_dir: &Path) -> Result<usize> {
    std::fs::create_dir_all(out_dir)?;

    let mut chunk: BTreeMap<&String, &Vec<String>> = BTreeMap::new();
    let mut chunk_bytes = 0usize;
    let mut shards_written = 0usize;

    for (prefix, names) in index {
        chunk.insert(prefix, names);
        chunk_bytes += prefix.len() + names.iter().map(|n| n.len()).sum::<usize>();

        if chunk_bytes > SHARD_TARGET_BYTES {
            flush_shard(&chunk, out_dir)?;
            shards_written += 1;
            chunk.clear();
            chunk_bytes = 0;
        }
    }
    if !chunk.is_empty() {
        flush_shard(&chunk, out_dir)?;
        shards_written += 1;
    }

    let prefixes: Vec<&String> = index.keys().collect();
    let list_path = out_dir.join("prefixes.txt");
    let mut file = std::fs::File::create(list_path)?;
    let joined = prefixes
        .iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    file.write_all(joined.as_bytes())?;

    Ok(shards_written)
}

fn flush_shard(chunk: &BTreeMap<&String, &Vec<String>>, out_dir: &Path) -> Result<()> {
    let first = match chunk.keys().next() {
        Some(first) => first,
        None => return Ok(()),
    };
    let path = out_dir.join(format!("{first}.json"));
    let json = serde_json::to_string(chunk)?;
    std::fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shards_and_prefix_list_round_trip_a_small_index() {
        let dir = std::env::temp_dir().join(format!(
            "allisbns-publishers-test-{}",
            std::process::id()
        ));
        let mut index = BTreeMap::new();
        index.insert("012345678".to_string(), vec!["Example Press".to_string()]);
        write_shards(&index, &dir).unwrap();
        let contents = std::fs::read_to_string(dir.join("prefixes.txt")).unwrap();
        assert_eq!(contents, "012345678");
        assert!(dir.join("012345678.json").exists());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn a_prefix_with_no_registrant_name_still_appears_in_the_index() {
        let dir = std::env::temp_dir().join(format!(
            "allisbns-publishers-empty-test-{}",
            std::process::id()
        ));
        let mut index = BTreeMap::new();
        index.insert("099999999".to_string(), Vec::new());
        write_shards(&index, &dir).unwrap();
        let contents = std::fs::read_to_string(dir.join("prefixes.txt")).unwrap();
        assert_eq!(contents, "099999999");
        let _ = std::fs::remove_dir_all(&dir);
    }
}
