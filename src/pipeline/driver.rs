//! Spawns one thread per split range (chunk), caps how many run their
//! decode work concurrently via a permit semaphore, aggregates progress
//! into a single bar, and writes the output in strict chunk order
//! regardless of the order buffers actually arrive from the channel.
//!
//! Each chunk streams its flushed bytes into its own part file rather
//! than a single shared output, so a slow early chunk never backs up a
//! faster later one; once every chunk finishes, the driver concatenates
//! the part files in chunk order and removes them.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{bounded, unbounded};
use indicatif::{ProgressBar, ProgressStyle};

use crate::error::Result;
use crate::io::{ByteSource, FileSource};
use crate::split::{find_split_points, SplitPoint};

use super::worker::{run_worker, ProgressUpdate, WorkerRange, DEFAULT_BATCH_SIZE};

/// Final tallies printed when a run completes.
pub struct RunStats {
    pub uncompressed_bytes: u64,
    pub records: u64,
}

fn part_path(output: &Path, worker_id: usize) -> PathBuf {
    let mut name = output
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(format!(".part{worker_id}"));
    output.with_file_name(name)
}

/// Drains one worker's result channel into its own part file, honoring
/// backpressure on the bounded channel between the worker and this thread.
fn drain_to_part_file(
    result_rx: crossbeam_channel::Receiver<Vec<u8>>,
    path: PathBuf,
) -> std::io::Result<()> {
    let file = File::create(&path)?;
    let mut writer = BufWriter::new(file);
    for bytes in result_rx {
        writer.write_all(&bytes)?;
    }
    writer.flush()
}

/// Runs the full parallel decode pipeline over `input`, writing the
/// concatenated, chunk-ordered encoded output to `output`.
///
/// `num_chunks` splits the corpus into that many independently decodable
/// ranges; `num_workers` caps how many of those chunks are decoded
/// concurrently (a chunk whose turn hasn't come yet simply blocks on a
/// permit before doing any work). `num_chunks` is typically equal to
/// `num_workers`, but a larger chunk count smooths out load when ranges
/// take uneven time to decode.
pub fn run_pipeline(
    input: &Path,
    output: &Path,
    num_workers: usize,
    num_chunks: usize,
) -> Result<RunStats> {
    let file = File::open(input)?;
    let source: Arc<dyn ByteSource> = Arc::new(FileSource::new(file)?);
    let file_size = source.len();

    let mut splits = find_split_points(&source, num_chunks)?;
    let mut boundaries = Vec::with_capacity(num_chunks + 1);
    boundaries.push(SplitPoint {
        offset: 0,
        aacid: String::new(),
    });
    boundaries.append(&mut splits);
    boundaries.push(SplitPoint {
        offset: file_size + 1,
        aacid: String::new(),
    });

    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = Arc::clone(&cancel);
        ctrlc::set_handler(move || {
            cancel.store(true, Ordering::SeqCst);
        })
        .map_err(|e| crate::error::Error::Other(e.to_string()))?;
    }

    let (progress_tx, progress_rx) = unbounded::<ProgressUpdate>();
    let bar = ProgressBar::new(file_size);
    bar.set_style(
        ProgressStyle::with_template(
            "{spinner} [{elapsed_precise}] {bar:40.cyan/blue} {bytes}/{total_bytes} ({eta})",
        )
        .unwrap(),
    );

    // A pre-filled token channel doubles as a counting semaphore: each
    // chunk thread blocks on a `recv()` for a permit before doing its
    // heavy decode work, and returns it when done, capping concurrency
    // at `num_workers` regardless of how many chunks there are.
    let (permit_tx, permit_rx) = bounded::<()>(num_workers);
    for _ in 0..num_workers {
        permit_tx.send(()).expect("permit channel just created");
    }

    let mut worker_handles = Vec::with_capacity(num_chunks);
    let mut drain_handles = Vec::with_capacity(num_chunks);
    let mut part_paths = Vec::with_capacity(num_chunks);

    for chunk_id in 0..num_chunks {
        let range = WorkerRange {
            start: boundaries[chunk_id].clone(),
            end: boundaries[chunk_id + 1].clone(),
        };
        let (result_tx, result_rx) = bounded::<Vec<u8>>(64);
        let path = part_path(output, chunk_id);
        part_paths.push(path.clone());
        drain_handles.push(thread::spawn(move || drain_to_part_file(result_rx, path)));

        let source = Arc::clone(&source);
        let cancel = Arc::clone(&cancel);
        let progress_tx = progress_tx.clone();
        let permit_rx = permit_rx.clone();
        let permit_tx = permit_tx.clone();
        worker_handles.push(thread::spawn(move || {
            let _permit = permit_rx.recv();
            let result = run_worker(
                chunk_id,
                source,
                range,
                cancel,
                result_tx,
                progress_tx,
                DEFAULT_BATCH_SIZE,
            );
            let _ = permit_tx.send(());
            result
        }));
    }
    drop(progress_tx);
    drop(permit_rx);
    drop(permit_tx);

    let mut total_uncompressed: u64 = 0;
    let mut total_records: u64 = 0;
    for update in progress_rx {
        total_uncompressed += update.uncompressed_delta;
        total_records += update.records_delta;
        bar.inc(update.compressed_delta);
    }
    bar.finish();

    for handle in worker_handles {
        handle
            .join()
            .map_err(|_| crate::error::Error::Other("worker thread panicked".into()))??;
    }
    for handle in drain_handles {
        handle
            .join()
            .map_err(|_| crate::error::Error::Other("drain thread panicked".into()))??;
    }

    if cancel.load(Ordering::SeqCst) {
        for path in &part_paths {
            let _ = fs::remove_file(path);
        }
        return Err(crate::error::Error::Other("cancelled".into()));
    }

    let out_file = File::create(output)?;
    let mut writer = BufWriter::new(out_file);
    for path in &part_paths {
        let mut part = File::open(path)?;
        std::io::copy(&mut part, &mut writer)?;
    }
    writer.flush()?;
    for path in &part_paths {
        fs::remove_file(path)?;
    }

    Ok(RunStats {
        uncompressed_bytes: total_uncompressed,
        records: total_records,
    })
}
