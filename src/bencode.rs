//! Reads the ISBN-runs bundle: a zstd-compressed, bencoded dict mapping
//! each named ISBN set (e.g. `md5`, or a registrant-specific set) to its
//! packed-runs blob.

use std::collections::BTreeMap;
use std::io::Read;

use serde_bytes::ByteBuf;

use crate::error::{Error, Result};
use crate::zstdio;

/// Decodes a bencoded `{set_name: packed_runs_bytes}` bundle already held
/// in memory as raw (uncompressed) bencode bytes.
pub fn decode_bundle(data: &[u8]) -> Result<BTreeMap<String, Vec<u8>>> {
    let raw: BTreeMap<String, ByteBuf> =
        serde_bencode::from_bytes(data).map_err(|e| Error::Bencode(e.to_string()))?;
    Ok(raw
        .into_iter()
        .map(|(name, blob)| (name, blob.into_vec()))
        .collect())
}

/// Reads a zstd-compressed bencoded bundle from `reader`, decompressing
/// it fully before handing the result to [`decode_bundle`]. This is the
/// on-disk form the tile-rendering binaries actually consume.
pub fn read_bundle<R: Read>(reader: R) -> Result<BTreeMap<String, Vec<u8>>> {
    let mut decoder = zstdio::open(reader)?;
    let mut buf = Vec::new();
    decoder.read_to_end(&mut buf)?;
    decode_bundle(&buf)
}
