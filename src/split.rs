//! Finds byte offsets within the corpus file that are both zstd frame
//! boundaries and OCLC-group boundaries, so the file can be divided into
//! independently decodable ranges for the parallel driver.

use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};
use std::sync::Arc;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::io::{ByteSource, ByteSourceCursor};
use crate::zstdio;

/// Little-endian zstd frame magic number.
const ZSTD_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];
const SCAN_CHUNK: usize = 4096;

/// A byte offset (a zstd frame start) together with the `aacid` of the
/// first record a worker beginning there should accept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitPoint {
    pub offset: u64,
    pub aacid: String,
}

/// Finds `num_splits - 1` split points, evenly spaced by target byte
/// offset, each refined to the nearest frame start containing a valid
/// OCLC-group boundary.
pub fn find_split_points(source: &Arc<dyn ByteSource>, num_splits: usize) -> Result<Vec<SplitPoint>> {
    let file_size = source.len();
    let mut points = Vec::with_capacity(num_splits.saturating_sub(1));
    for k in 1..num_splits {
        let target = (k as u64 * file_size) / num_splits as u64;
        points.push(find_next_valid_split(source, target)?);
    }
    Ok(points)
}

fn find_next_valid_split(source: &Arc<dyn ByteSource>, mut scan_pos: u64) -> Result<SplitPoint> {
    let file_size = source.len();
    loop {
        let frame_pos = find_next_frame(source, scan_pos)?;
        match read_boundary_at_frame(source, frame_pos)? {
            Some(point) => return Ok(point),
            None => {
                scan_pos = frame_pos + 1;
                if scan_pos >= file_size {
                    return Err(Error::NoSplitBoundary);
                }
            }
        }
    }
}

/// Scans forward from `start` for the next zstd frame magic, backing up
/// three bytes each miss so a magic spanning a chunk boundary is not
/// missed.
fn find_next_frame(source: &Arc<dyn ByteSource>, start: u64) -> Result<u64> {
    let file_size = source.len();
    let mut pos = start;
    loop {
        if pos >= file_size {
            return Err(Error::NoSplitFrame { offset: start });
        }
        let len = SCAN_CHUNK.min((file_size - pos) as usize);
        let chunk = source.read_at(pos, len)?;
        if let Some(idx) = memchr::memmem::find(&chunk, &ZSTD_MAGIC) {
            return Ok(pos + idx as u64);
        }
        pos += (len.saturating_sub(3)).max(1) as u64;
    }
}

/// Attaches a decoder at `frame_pos` and scans its JSON lines for the
/// first pair of consecutive records whose `oclc_number` differs; that
/// boundary is the split point. Returns `None` if the frame's JSON stream
/// never finds such a boundary (the caller should retry from the next
/// frame).
fn read_boundary_at_frame(source: &Arc<dyn ByteSource>, frame_pos: u64) -> Result<Option<SplitPoint>> {
    let mut cursor = ByteSourceCursor::new(Arc::clone(source));
    cursor.seek(SeekFrom::Start(frame_pos))?;
    let decoder = zstdio::open(cursor)?;
    let mut lines = BufReader::new(decoder).lines();

    let mut prev: Option<(String, String)> = None;
    while let Some(line) = lines.next() {
        let line = match line {
            Ok(l) => l,
            Err(_) => continue,
        };
        let value: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(_) => continue,
        };
        let aacid = value
            .get("aacid")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string();
        let oclc = value
            .pointer("/metadata/oclcNumber")
            .or_else(|| value.pointer("/metadata/oclc_number"))
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string();

        if let Some((prev_oclc, _)) = &prev {
            if *prev_oclc != oclc {
                return Ok(Some(SplitPoint {
                    offset: frame_pos,
                    aacid,
                }));
            }
        }
        prev = Some((oclc, aacid));
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemorySource;

    #[test]
    fn find_next_frame_locates_magic_spanning_scan_boundary() {
        let mut data = vec![0u8; SCAN_CHUNK - 2];
        data.extend_from_slice(&ZSTD_MAGIC);
        data.extend_from_slice(b"rest");
        let source: Arc<dyn ByteSource> = Arc::new(MemorySource::new(data));
        let pos = find_next_frame(&source, 0).unwrap();
        assert_eq!(pos, (SCAN_CHUNK - 2) as u64);
    }

    #[test]
    fn find_next_frame_errors_when_absent() {
        let source: Arc<dyn ByteSource> = Arc::new(MemorySource::new(vec![0u8; 100]));
        assert!(find_next_frame(&source, 0).is_err());
    }
}
