//! Bit-packed binary encoding for `(isbn positions, holdings, year)` records.
//!
//! Each record occupies one or more back-to-back chunks sharing the same
//! flag bits. Chunk layout:
//!
//! ```text
//! byte 0:  bit 7 = has_count, bit 6 = has_year, bits 5..0 = position count
//! byte 1:  holdings (optional, present iff bit 7 of byte 0 is set)
//! byte 2:  year byte (optional, present iff bit 6 of byte 0 is set),
//!          value = clamp(0, 255, 2025 - year)
//! bytes .. count*4: big-endian u32 ISBN positions
//! ```
//!
//! A single record is split into chunks of at most 15 positions each; every
//! chunk from the same record repeats the holdings/year flags and bytes.

use crate::error::{Error, Result};

const MAX_POSITIONS_PER_CHUNK: usize = 15;
const YEAR_BASE: i32 = 2025;

/// One fully decoded chunk from the byte stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedChunk {
    pub holdings: Option<u32>,
    pub year: Option<i32>,
    pub positions: Vec<u32>,
}

/// Encodes one flushed record (already deduped/sorted ascending positions)
/// into its on-wire byte chunks.
pub fn encode_record(positions: &[u32], holdings: Option<u32>, year: Option<i32>) -> Vec<u8> {
    let mut out = Vec::new();
    if positions.is_empty() {
        return out;
    }
    for chunk in positions.chunks(MAX_POSITIONS_PER_CHUNK) {
        let has_count = holdings.is_some();
        let has_year = year.is_some();
        let count = chunk.len() as u8;
        let mut flags = count & 0x3F;
        if has_count {
            flags |= 0x80;
        }
        if has_year {
            flags |= 0x40;
        }
        out.push(flags);
        if has_count {
            let h = holdings.unwrap_or(0).min(255) as u8;
            out.push(h);
        }
        if has_year {
            let y = year.unwrap();
            let offset = (YEAR_BASE - y).clamp(0, 255);
            out.push(offset as u8);
        }
        for pos in chunk {
            out.extend_from_slice(&pos.to_be_bytes());
        }
    }
    out
}

/// A streaming decoder over a byte slice, yielding one [`DecodedChunk`] per
/// `next()` call. Returns `Err(Error::IncompleteRecord)` if the stream ends
/// mid-chunk.
pub struct Decoder<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Decodes the next chunk, or `Ok(None)` at a clean end of stream.
    pub fn next_chunk(&mut self) -> Result<Option<DecodedChunk>> {
        if self.pos >= self.data.len() {
            return Ok(None);
        }
        let flags = self.data[self.pos];
        self.pos += 1;
        let has_count = flags & 0x80 != 0;
        let has_year = flags & 0x40 != 0;
        let count = (flags & 0x3F) as usize;

        let holdings = if has_count {
            let b = self.take(1)?;
            Some(b[0] as u32)
        } else {
            None
        };
        let year = if has_year {
            let b = self.take(1)?;
            Some(YEAR_BASE - b[0] as i32)
        } else {
            None
        };
        let position_bytes = self.take(count * 4)?;
        let positions = position_bytes
            .chunks_exact(4)
            .map(|c| u32::from_be_bytes([c[0], c[1], c[2], c[3]]))
            .collect();

        Ok(Some(DecodedChunk {
            holdings,
            year,
            positions,
        }))
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        if self.pos + len > self.data.len() {
            return Err(Error::IncompleteRecord);
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }
}

impl<'a> Iterator for Decoder<'a> {
    type Item = Result<DecodedChunk>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_chunk() {
            Ok(Some(chunk)) => Some(Ok(chunk)),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_single_record_scenario() {
        // holdings=5, year=2000, one position=25.
        let bytes = encode_record(&[25], Some(5), Some(2000));
        assert_eq!(bytes[0], 0xC1);
        assert_eq!(bytes[1], 5);
        assert_eq!(bytes[2], 25);
        assert_eq!(bytes.len(), 7);
    }

    #[test]
    fn round_trips_single_chunk() {
        let bytes = encode_record(&[1, 2, 3], Some(10), Some(1999));
        let mut decoder = Decoder::new(&bytes);
        let chunk = decoder.next_chunk().unwrap().unwrap();
        assert_eq!(chunk.holdings, Some(10));
        assert_eq!(chunk.year, Some(1999));
        assert_eq!(chunk.positions, vec![1, 2, 3]);
        assert!(decoder.next_chunk().unwrap().is_none());
    }

    #[test]
    fn splits_into_multiple_chunks_past_fifteen_positions() {
        let positions: Vec<u32> = (0..20).collect();
        let bytes = encode_record(&positions, None, None);
        let mut decoder = Decoder::new(&bytes);
        let first = decoder.next_chunk().unwrap().unwrap();
        assert_eq!(first.positions.len(), 15);
        let second = decoder.next_chunk().unwrap().unwrap();
        assert_eq!(second.positions.len(), 5);
        assert!(decoder.next_chunk().unwrap().is_none());
    }

    #[test]
    fn empty_positions_encode_to_nothing() {
        assert!(encode_record(&[], Some(1), Some(2000)).is_empty());
    }

    #[test]
    fn truncated_stream_is_incomplete() {
        let bytes = encode_record(&[1, 2], Some(1), None);
        let truncated = &bytes[..bytes.len() - 1];
        let mut decoder = Decoder::new(truncated);
        match decoder.next_chunk() {
            Err(Error::IncompleteRecord) => {}
            other => panic!("expected IncompleteRecord, got {other:?}"),
        }
    }

    #[test]
    fn year_offset_clamps_to_byte_range() {
        let bytes = encode_record(&[1], None, Some(1000));
        // 2025 - 1000 = 1025, clamps to 255.
        assert_eq!(bytes[1], 255);
    }
}
