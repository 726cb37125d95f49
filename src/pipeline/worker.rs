//! A single worker thread's view of the pipeline: read one byte range of
//! the corpus, feed it through a [`BookAggregator`], and hand off flushed
//! bytes and progress to the driver.

use std::io::{BufReader, Read, Seek, SeekFrom};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Sender, TrySendError};
use serde_json::Value;

use crate::aggregator::{BookAggregator, RawRecord};
use crate::error::Result;
use crate::io::{ByteSource, ByteSourceCursor};
use crate::split::SplitPoint;
use crate::zstdio;

/// A half-open `[start, end)` range of the corpus assigned to one worker,
/// expressed as split points. An empty `aacid` on either end means "no
/// arming/stopping needed" (used for the first and last worker).
#[derive(Debug, Clone)]
pub struct WorkerRange {
    pub start: SplitPoint,
    pub end: SplitPoint,
}

/// Incremental progress, emitted roughly once per physical read.
#[derive(Debug, Clone, Copy)]
pub struct ProgressUpdate {
    pub worker_id: usize,
    pub compressed_delta: u64,
    pub uncompressed_delta: u64,
    pub records_delta: u64,
}

/// Default buffer threshold (bytes of encoded output) before a worker
/// pushes its buffer to the result sink.
pub const DEFAULT_BATCH_SIZE: usize = 4096;

struct CountingReader<R> {
    inner: R,
    total: Arc<AtomicU64>,
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.total.fetch_add(n as u64, Ordering::Relaxed);
        Ok(n)
    }
}

/// Runs one worker to completion (or until cancelled).
///
/// `result_tx` carries flushed, encoded record bytes in the order they are
/// produced; the driver is responsible for writing each worker's bytes out
/// in worker-id order, not arrival order, per the ordering guarantee this
/// pipeline provides over the naive single-queue original.
pub fn run_worker(
    worker_id: usize,
    source: Arc<dyn ByteSource>,
    range: WorkerRange,
    cancel: Arc<AtomicBool>,
    result_tx: Sender<Vec<u8>>,
    progress_tx: Sender<ProgressUpdate>,
    batch_size: usize,
) -> Result<()> {
    let mut cursor = ByteSourceCursor::new(Arc::clone(&source));
    cursor.seek(SeekFrom::Start(range.start.offset))?;
    let bytes_read = Arc::new(AtomicU64::new(0));
    let counting = CountingReader {
        inner: cursor,
        total: Arc::clone(&bytes_read),
    };
    let decoder = zstdio::open(counting)?;
    let mut lines = BufReader::new(decoder).lines();

    let mut aggregator = BookAggregator::new();
    let mut buffer: Vec<u8> = Vec::new();
    let mut arming = !range.start.aacid.is_empty();
    let mut last_reported: u64 = 0;
    let mut records_since_report: u64 = 0;
    let mut uncompressed_since_report: u64 = 0;

    while let Some(line) = lines.next() {
        if cancel.load(Ordering::Relaxed) {
            break;
        }
        let line = match line {
            Ok(l) => l,
            Err(_) => continue,
        };
        uncompressed_since_report += line.len() as u64 + 1;

        let value: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(_) => {
                log::warn!("worker {worker_id}: skipping malformed JSON line");
                continue;
            }
        };
        let aacid = value
            .get("aacid")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string();

        if arming {
            if aacid == range.start.aacid {
                arming = false;
            } else {
                continue;
            }
        }

        if !range.end.aacid.is_empty() && aacid == range.end.aacid {
            break;
        }

        let record: RawRecord = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(_) => {
                log::warn!("worker {worker_id}: skipping malformed record line");
                continue;
            }
        };
        if let Some(flushed) = aggregator.process(Some(&record)) {
            records_since_report += 1;
            buffer.extend_from_slice(&flushed);
        }

        if buffer.len() >= batch_size {
            send_buffer(&result_tx, &mut buffer, &cancel)?;
        }

        let compressed_total = bytes_read.load(Ordering::Relaxed);
        if compressed_total != last_reported {
            let _ = progress_tx.try_send(ProgressUpdate {
                worker_id,
                compressed_delta: compressed_total - last_reported,
                uncompressed_delta: uncompressed_since_report,
                records_delta: records_since_report,
            });
            last_reported = compressed_total;
            uncompressed_since_report = 0;
            records_since_report = 0;
        }
    }

    if let Some(flushed) = aggregator.process(None) {
        records_since_report += 1;
        buffer.extend_from_slice(&flushed);
    }
    if !buffer.is_empty() {
        send_buffer(&result_tx, &mut buffer, &cancel)?;
    }
    let _ = progress_tx.try_send(ProgressUpdate {
        worker_id,
        compressed_delta: 0,
        uncompressed_delta: uncompressed_since_report,
        records_delta: records_since_report,
    });

    Ok(())
}

fn send_buffer(
    result_tx: &Sender<Vec<u8>>,
    buffer: &mut Vec<u8>,
    cancel: &Arc<AtomicBool>,
) -> Result<()> {
    let mut payload = std::mem::take(buffer);
    loop {
        match result_tx.try_send(payload) {
            Ok(()) => return Ok(()),
            Err(TrySendError::Full(returned)) => {
                if cancel.load(Ordering::Relaxed) {
                    return Ok(());
                }
                payload = returned;
                std::thread::sleep(Duration::from_millis(10));
            }
            Err(TrySendError::Disconnected(_)) => return Ok(()),
        }
    }
}
