//! Error types for the all-isbns pipeline.

use thiserror::Error;

/// Structural failures that abort a driver. Data-quality problems
/// (a malformed date string, an ISBN that fails its checksum) are not
/// represented here — they are logged and the offending record or line is
/// dropped in place, per the error taxonomy in DESIGN.md.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("zstd decode error: {0}")]
    Zstd(String),

    #[error("JSON decode error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("bencode decode error: {0}")]
    Bencode(String),

    #[error("no zstd frame found scanning for a split point at or after byte {offset}")]
    NoSplitFrame { offset: u64 },

    #[error("no valid OCLC-group boundary found in any frame while splitting")]
    NoSplitBoundary,

    #[error("truncated record: stream ended mid-record")]
    IncompleteRecord,

    #[error("PNG encode error: {0}")]
    Image(#[from] image::ImageError),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
