//! Builds the per-prefix year/holdings attribute tensors from the encoded
//! record stream.

use std::collections::HashMap;

use crate::codec::Decoder;
use crate::error::Result;
use crate::isbn::{get_isbn_code_pos, BLOCK_POSITIONS, BLOCK_SIZE};
use crate::tiles::coverage::Bitmap;
use crate::tiles::Plane;

const CURRENT_YEAR: i32 = 2025;

/// A lazily-allocated `BLOCK_SIZE x BLOCK_SIZE x 2` tensor for one prefix.
/// Channel 0 holds a year-offset byte, channel 1 a holdings-rarity byte.
pub struct AttributeTensor {
    pub prefix: u32,
    data: Vec<[u8; 2]>,
}

impl AttributeTensor {
    fn new(prefix: u32) -> Self {
        Self {
            prefix,
            data: vec![[0u8; 2]; (BLOCK_SIZE * BLOCK_SIZE) as usize],
        }
    }

    fn index(col: u32, row: u32) -> usize {
        (row * BLOCK_SIZE + col) as usize
    }

    pub fn get(&self, col: u32, row: u32) -> [u8; 2] {
        self.data[Self::index(col, row)]
    }

    pub fn width(&self) -> u32 {
        BLOCK_SIZE
    }

    pub fn height(&self) -> u32 {
        BLOCK_SIZE
    }

    fn update(&mut self, col: u32, row: u32, holdings: Option<u32>, year: Option<i32>) {
        let idx = Self::index(col, row);
        let cell = &mut self.data[idx];
        if let Some(year) = year {
            let offset = (CURRENT_YEAR - year + 1).clamp(0, 255) as u8;
            cell[0] = cell[0].max(offset);
        }
        if let Some(holdings) = holdings {
            if holdings > 0 {
                let encoded = (256u32.saturating_sub(holdings)).max(1).min(255) as u8;
                cell[1] = if cell[1] == 0 {
                    encoded
                } else {
                    cell[1].min(encoded)
                };
            }
        }
    }
}

/// A single channel of an [`AttributeTensor`], restricted to the pixels
/// where `mask` is set (or, with `invert`, where it isn't). Lets the
/// `in`/`out` split against a reference coverage bitmap (conventionally
/// `md5`) be rendered straight from the tensor and a borrowed [`Bitmap`],
/// without materializing separate masked tensors the way the source
/// tool's `split_tensor()` does.
pub struct MaskedChannelPlane<'a> {
    tensor: &'a AttributeTensor,
    channel: usize,
    mask: &'a Bitmap,
    invert: bool,
}

impl<'a> MaskedChannelPlane<'a> {
    pub fn new(tensor: &'a AttributeTensor, channel: usize, mask: &'a Bitmap, invert: bool) -> Self {
        Self {
            tensor,
            channel,
            mask,
            invert,
        }
    }
}

impl Plane for MaskedChannelPlane<'_> {
    fn get(&self, col: u32, row: u32) -> u8 {
        if self.mask.is_set(col, row) != self.invert {
            self.tensor.get(col, row)[self.channel]
        } else {
            0
        }
    }
}

/// Tracks, per prefix, which pixels have been seen with exactly zero
/// holdings (styling-only; not written into the tensor itself).
#[derive(Default)]
pub struct ZeroHoldings {
    seen: HashMap<u32, Vec<bool>>,
}

impl ZeroHoldings {
    fn mark(&mut self, prefix: u32, col: u32, row: u32) {
        let bitmap = self
            .seen
            .entry(prefix)
            .or_insert_with(|| vec![false; (BLOCK_SIZE * BLOCK_SIZE) as usize]);
        bitmap[(row * BLOCK_SIZE + col) as usize] = true;
    }

    pub fn is_zero(&self, prefix: u32, col: u32, row: u32) -> bool {
        self.seen
            .get(&prefix)
            .map(|b| b[(row * BLOCK_SIZE + col) as usize])
            .unwrap_or(false)
    }
}

/// Decodes the full `EncodedRecord` stream and builds one [`AttributeTensor`]
/// per prefix actually referenced, plus the parallel zero-holdings map.
pub fn build_tensors(data: &[u8]) -> Result<(HashMap<u32, AttributeTensor>, ZeroHoldings)> {
    let mut tensors: HashMap<u32, AttributeTensor> = HashMap::new();
    let mut zero_holdings = ZeroHoldings::default();

    let mut decoder = Decoder::new(data);
    while let Some(chunk) = decoder.next_chunk()? {
        for position in chunk.positions {
            let prefix = position / BLOCK_POSITIONS;
            let remainder = position % BLOCK_POSITIONS;
            let (col, row) = get_isbn_code_pos(remainder);

            if chunk.holdings == Some(0) {
                zero_holdings.mark(prefix, col, row);
            }
            tensors
                .entry(prefix)
                .or_insert_with(|| AttributeTensor::new(prefix))
                .update(col, row, chunk.holdings, chunk.year);
        }
    }

    Ok((tensors, zero_holdings))
}
