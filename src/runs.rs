//! Decodes the run-length-encoded "packed ISBN runs" format: an array of
//! alternating present/gap run lengths that, walked cumulatively, yields
//! the set of occupied integer positions in the ISBN address space.

use crate::isbn::{get_isbn_code_pos, BLOCK_POSITIONS};

/// One fully-decoded prefix block: which prefix (`position / 10^8`) it
/// covers, and the set of `(col, row)` pixels present within that block's
/// 10,000x10,000 grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixBlock {
    pub prefix: u32,
    pub pixels: Vec<(u32, u32)>,
}

/// Walks a little-endian `u32` array alternating `present_count,
/// gap_count, ...` (starting with a present run) and groups the resulting
/// present positions into per-prefix blocks.
pub fn decode_runs(data: &[u8]) -> Vec<PrefixBlock> {
    let counts: Vec<u32> = data
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();

    let mut blocks = Vec::new();
    let mut position: u64 = 0;
    let mut offset: u64 = 0;
    let mut current_prefix = 0u32;
    let mut current_pixels: Vec<(u32, u32)> = Vec::new();
    let mut started = false;

    for (i, &count) in counts.iter().enumerate() {
        let is_present = i % 2 == 0;
        if is_present {
            for _ in 0..count {
                if position - offset >= BLOCK_POSITIONS as u64 {
                    if started {
                        blocks.push(PrefixBlock {
                            prefix: current_prefix,
                            pixels: std::mem::take(&mut current_pixels),
                        });
                    }
                    offset = (position / BLOCK_POSITIONS as u64) * BLOCK_POSITIONS as u64;
                    current_prefix = (offset / BLOCK_POSITIONS as u64) as u32;
                    started = true;
                }
                if !started {
                    started = true;
                    current_prefix = (offset / BLOCK_POSITIONS as u64) as u32;
                }
                let local = (position - offset) as u32;
                current_pixels.push(get_isbn_code_pos(local));
                position += 1;
            }
        } else {
            position += count as u64;
        }
    }

    if started {
        blocks.push(PrefixBlock {
            prefix: current_prefix,
            pixels: current_pixels,
        });
    }

    blocks
}
