//! End-to-end check that splitting a corpus into independently decodable
//! ranges and decoding them in parallel produces byte-identical output to
//! a single worker decoding the whole file.
//!
//! There is no zstd encoder anywhere in this crate (decoding is handled by
//! the pure-Rust, decode-only `ruzstd`), so the synthetic corpus here is
//! built as a sequence of minimal valid zstd frames assembled by hand: a
//! frame header with `Single_Segment_flag` set (so no window descriptor is
//! needed) and a one-byte frame content size, followed by a single
//! `Raw_Block` (uncompressed) holding the frame's payload. Concatenating
//! many such frames exercises exactly the multi-frame structure the real
//! corpus has, one frame per record.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use allisbns::io::{ByteSource, MemorySource};
use allisbns::pipeline::worker::{run_worker, WorkerRange};
use allisbns::split::{find_split_points, SplitPoint};

/// Wraps `data` (must be <= 255 bytes) in a minimal single-segment,
/// one-raw-block zstd frame.
fn zstd_raw_frame(data: &[u8]) -> Vec<u8> {
    assert!(data.len() <= 255, "test payload too large for a 1-byte FCS field");
    let mut out = Vec::new();
    out.extend_from_slice(&[0x28, 0xB5, 0x2F, 0xFD]); // magic number
    out.push(0x20); // Frame_Header_Descriptor: Single_Segment_flag set, FCS_flag=0 (1-byte field)
    out.push(data.len() as u8); // Frame_Content_Size
    let block_size = data.len() as u32;
    let header_val: u32 = 1 | (block_size << 3); // Last_Block=1, Block_Type=Raw_Block(0)
    out.push((header_val & 0xFF) as u8);
    out.push(((header_val >> 8) & 0xFF) as u8);
    out.push(((header_val >> 16) & 0xFF) as u8);
    out.extend_from_slice(data);
    out
}

fn record_line(aacid: &str, oclc: &str, isbn: &str, holdings: u32) -> String {
    format!(
        r#"{{"aacid":"{aacid}","metadata":{{"oclc_number":"{oclc}","record":{{"isbns":["{isbn}"],"totalHoldingCount":{holdings}}}}}}}"#
    )
}

/// Builds a corpus of `n` one-line, one-frame book groups, each with a
/// distinct `oclc_number` so every frame boundary is also a group
/// boundary (guaranteeing the split finder succeeds immediately wherever
/// it lands).
fn build_corpus(n: usize) -> Vec<u8> {
    let isbns = ["9780000000014", "0306406152", "9791234567896"];
    let mut out = Vec::new();
    for i in 0..n {
        let line = record_line(
            &format!("id-{i}"),
            &format!("group-{i}"),
            isbns[i % isbns.len()],
            (i as u32 % 20) + 1,
        );
        let mut payload = line.into_bytes();
        payload.push(b'\n');
        out.extend_from_slice(&zstd_raw_frame(&payload));
    }
    out
}

fn decode_range(source: &Arc<dyn ByteSource>, start: SplitPoint, end: SplitPoint) -> Vec<u8> {
    let (result_tx, result_rx) = crossbeam_channel::unbounded();
    let (progress_tx, progress_rx) = crossbeam_channel::unbounded();
    let cancel = Arc::new(AtomicBool::new(false));
    run_worker(
        0,
        Arc::clone(source),
        WorkerRange { start, end },
        cancel,
        result_tx,
        progress_tx,
        usize::MAX,
    )
    .unwrap();
    drop(progress_rx);
    result_rx.into_iter().flatten().collect()
}

fn whole_file_range(file_size: u64) -> (SplitPoint, SplitPoint) {
    (
        SplitPoint { offset: 0, aacid: String::new() },
        SplitPoint { offset: file_size + 1, aacid: String::new() },
    )
}

#[test]
fn concatenated_parallel_decode_matches_single_worker_decode() {
    let data = build_corpus(24);
    let source: Arc<dyn ByteSource> = Arc::new(MemorySource::new(data));
    let file_size = source.len();

    let (start, end) = whole_file_range(file_size);
    let baseline = decode_range(&source, start, end);
    assert!(!baseline.is_empty());

    let splits = find_split_points(&source, 4).unwrap();
    assert_eq!(splits.len(), 3);

    let mut boundaries = vec![SplitPoint { offset: 0, aacid: String::new() }];
    boundaries.extend(splits);
    boundaries.push(SplitPoint { offset: file_size + 1, aacid: String::new() });

    let mut parallel = Vec::new();
    for window in boundaries.windows(2) {
        parallel.extend(decode_range(&source, window[0].clone(), window[1].clone()));
    }

    assert_eq!(parallel, baseline);
}

#[test]
fn split_points_land_on_distinct_group_boundaries() {
    let data = build_corpus(24);
    let source: Arc<dyn ByteSource> = Arc::new(MemorySource::new(data));
    let splits = find_split_points(&source, 4).unwrap();
    let aacids: Vec<&str> = splits.iter().map(|s| s.aacid.as_str()).collect();
    let unique: std::collections::HashSet<&str> = aacids.iter().copied().collect();
    assert_eq!(unique.len(), aacids.len(), "split aacids should be distinct");
}
