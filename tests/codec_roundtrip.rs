//! Round-trip and chunking laws for the bit-packed record codec.

use std::collections::BTreeSet;

use proptest::prelude::*;

use allisbns::codec::{encode_record, Decoder};

proptest! {
    #[test]
    fn decode_of_encode_recovers_sorted_unique_positions_and_fields(
        raw_positions in prop::collection::vec(any::<u32>(), 0..200),
        holdings in prop::option::of(0u32..=255),
        year in prop::option::of(1770i32..=2025),
    ) {
        let positions: Vec<u32> = raw_positions.into_iter().collect::<BTreeSet<_>>().into_iter().collect();

        let bytes = encode_record(&positions, holdings, year);
        if positions.is_empty() {
            prop_assert!(bytes.is_empty());
            return Ok(());
        }

        let mut decoder = Decoder::new(&bytes);
        let mut recovered = Vec::new();
        while let Some(chunk) = decoder.next_chunk().unwrap() {
            prop_assert_eq!(chunk.holdings, holdings);
            prop_assert_eq!(chunk.year, year);
            recovered.extend(chunk.positions);
        }

        prop_assert_eq!(recovered, positions);
    }
}

#[test]
fn a_record_of_twenty_positions_splits_into_two_chunks() {
    let positions: Vec<u32> = (0..20).collect();
    let bytes = encode_record(&positions, None, None);
    let mut decoder = Decoder::new(&bytes);

    let first = decoder.next_chunk().unwrap().unwrap();
    assert_eq!(first.positions.len(), 15);
    let second = decoder.next_chunk().unwrap().unwrap();
    assert_eq!(second.positions.len(), 5);
    assert_eq!(first.holdings, second.holdings);
    assert_eq!(first.year, second.year);
    assert!(decoder.next_chunk().unwrap().is_none());
}
