//! Thin wrapper around the pure-Rust zstd decoder used everywhere this
//! crate reads the corpus: the split finder's frame-magic probes and each
//! worker's sequential decode both attach a fresh decoder at a byte offset
//! known (by construction) to be a zstd frame boundary.
//!
//! `ruzstd`'s streaming decoder already handles a reader containing
//! multiple concatenated frames transparently, which is the corpus's wire
//! format (many small per-OCLC-group frames back to back), so callers can
//! just keep reading past a frame's end without re-attaching anything.

use std::io::Read;

use ruzstd::streaming_decoder::StreamingDecoder;
use ruzstd::FrameDecoder;

use crate::error::{Error, Result};

/// Attaches a zstd decoder to `reader`, which must be positioned at the
/// start of a valid zstd frame.
pub fn open<R: Read>(reader: R) -> Result<StreamingDecoder<R, FrameDecoder>> {
    StreamingDecoder::new(reader).map_err(|e| Error::Zstd(e.to_string()))
}
