//! # allisbns
//!
//! Turns a zstd-compressed, OCLC-grouped bibliographic JSONL corpus into a
//! compact binary ISBN side-table, then rasterizes that table plus a
//! bencoded manifest of named ISBN sets into a multi-scale PNG tile
//! pyramid covering the full addressable ISBN space.
//!
//! ## Pipeline shape
//!
//! ```text
//! corpus.jsonl.zst -> split finder -> N worker threads -> aggregator -> codec
//!                                                                          |
//!                                                                          v
//!                                                              isbn_props.bin
//!                                                                          |
//!                              +-------------------+----------------------+
//!                              v                                          v
//!                    tiles::attributes                          tiles::coverage
//!                    (year/holdings PNGs)                     (coverage bitmap PNGs)
//! ```
//!
//! Each stage here has a dedicated module; the `src/bin/` binaries are
//! thin CLI wrappers around them.

pub mod aggregator;
pub mod agencies;
pub mod bencode;
pub mod codec;
pub mod error;
pub mod io;
pub mod isbn;
pub mod manifest;
pub mod pipeline;
pub mod plot;
pub mod publishers;
pub mod runs;
pub mod split;
pub mod tiles;
pub mod year;
pub mod zstdio;

pub use error::{Error, Result};
