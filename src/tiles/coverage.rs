//! Coverage bitmaps: which ISBN positions are present in a given named
//! set, split against a reference set (conventionally `md5`) into an
//! "in"/"out" pair, and unioned across sets for the aggregate view.

use std::collections::HashMap;

use crate::isbn::BLOCK_SIZE;
use crate::runs::PrefixBlock;

use super::Plane;

/// A per-prefix `BLOCK_SIZE x BLOCK_SIZE` boolean coverage bitmap.
#[derive(Clone)]
pub struct Bitmap {
    pub prefix: u32,
    bits: Vec<bool>,
}

impl Bitmap {
    pub fn new(prefix: u32) -> Self {
        Self {
            prefix,
            bits: vec![false; (BLOCK_SIZE * BLOCK_SIZE) as usize],
        }
    }

    fn index(col: u32, row: u32) -> usize {
        (row * BLOCK_SIZE + col) as usize
    }

    pub fn set(&mut self, col: u32, row: u32) {
        self.bits[Self::index(col, row)] = true;
    }

    pub fn is_set(&self, col: u32, row: u32) -> bool {
        self.bits[Self::index(col, row)]
    }

    /// Bitwise-and against `mask`, keeping only pixels present in both.
    pub fn intersect(&self, mask: &Bitmap) -> Bitmap {
        let mut out = Bitmap::new(self.prefix);
        for i in 0..self.bits.len() {
            out.bits[i] = self.bits[i] && mask.bits[i];
        }
        out
    }

    /// Bitwise-and-not against `mask`, keeping pixels present in `self`
    /// but absent from `mask`.
    pub fn subtract(&self, mask: &Bitmap) -> Bitmap {
        let mut out = Bitmap::new(self.prefix);
        for i in 0..self.bits.len() {
            out.bits[i] = self.bits[i] && !mask.bits[i];
        }
        out
    }

    /// Bitwise-or, used to build the `all_in`/`all_out` aggregate views
    /// across every non-reference set.
    pub fn union(&self, other: &Bitmap) -> Bitmap {
        let mut out = Bitmap::new(self.prefix);
        for i in 0..self.bits.len() {
            out.bits[i] = self.bits[i] || other.bits[i];
        }
        out
    }
}

impl Plane for Bitmap {
    fn get(&self, col: u32, row: u32) -> u8 {
        if self.is_set(col, row) {
            255
        } else {
            0
        }
    }

    fn remap_large_factors(&self) -> bool {
        true
    }
}

/// Builds one [`Bitmap`] per prefix referenced by `blocks`.
pub fn bitmaps_from_blocks(blocks: &[PrefixBlock]) -> HashMap<u32, Bitmap> {
    let mut bitmaps = HashMap::new();
    for block in blocks {
        let bitmap = bitmaps
            .entry(block.prefix)
            .or_insert_with(|| Bitmap::new(block.prefix));
        for &(col, row) in &block.pixels {
            bitmap.set(col, row);
        }
    }
    bitmaps
}

/// Splits every prefix's bitmap in `sets` against `reference`'s matching
/// prefix (missing in the reference means everything is "out"), returning
/// the `(in, out)` maps alongside their `all_in`/`all_out` unions.
pub fn split_against_reference(
    reference: &HashMap<u32, Bitmap>,
    target: &HashMap<u32, Bitmap>,
) -> (HashMap<u32, Bitmap>, HashMap<u32, Bitmap>) {
    let mut in_maps = HashMap::new();
    let mut out_maps = HashMap::new();
    for (&prefix, bitmap) in target {
        match reference.get(&prefix) {
            Some(mask) => {
                in_maps.insert(prefix, bitmap.intersect(mask));
                out_maps.insert(prefix, bitmap.subtract(mask));
            }
            None => {
                out_maps.insert(prefix, bitmap.subtract(&Bitmap::new(prefix)));
            }
        }
    }
    (in_maps, out_maps)
}

/// Unions a collection of per-prefix bitmap maps (e.g. every named set's
/// `in` or `out` map) into a single aggregate map.
pub fn union_all<'a>(maps: impl Iterator<Item = &'a HashMap<u32, Bitmap>>) -> HashMap<u32, Bitmap> {
    let mut aggregate: HashMap<u32, Bitmap> = HashMap::new();
    for map in maps {
        for (&prefix, bitmap) in map {
            aggregate
                .entry(prefix)
                .and_modify(|existing| *existing = existing.union(bitmap))
                .or_insert_with(|| bitmap.clone());
        }
    }
    aggregate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runs::decode_runs;

    fn runs_bytes(runs: &[u32]) -> Vec<u8> {
        runs.iter().flat_map(|r| r.to_le_bytes()).collect()
    }

    #[test]
    fn builds_bitmap_from_decoded_blocks() {
        let blocks = decode_runs(&runs_bytes(&[3]));
        let bitmaps = bitmaps_from_blocks(&blocks);
        assert_eq!(bitmaps.len(), 1);
    }

    #[test]
    fn intersect_and_subtract_partition_the_bitmap() {
        let mut a = Bitmap::new(0);
        a.set(1, 1);
        a.set(2, 2);
        let mut mask = Bitmap::new(0);
        mask.set(1, 1);

        let inside = a.intersect(&mask);
        let outside = a.subtract(&mask);
        assert!(inside.is_set(1, 1));
        assert!(!inside.is_set(2, 2));
        assert!(!outside.is_set(1, 1));
        assert!(outside.is_set(2, 2));
    }

    #[test]
    fn union_combines_disjoint_bitmaps() {
        let mut a = Bitmap::new(0);
        a.set(0, 0);
        let mut b = Bitmap::new(0);
        b.set(1, 1);
        let combined = a.union(&b);
        assert!(combined.is_set(0, 0));
        assert!(combined.is_set(1, 1));
    }
}
