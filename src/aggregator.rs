//! Groups a stream of raw JSON bibliographic lines by OCLC number into one
//! flushed, encoded record per group.

use std::collections::HashSet;

use serde::Deserialize;

use crate::codec::encode_record;
use crate::isbn::{filter_invalid_isbns, isbn_position, verify_isbn};
use crate::year::extract_most_likely_year;

/// One input JSON line's metadata, as much as the aggregator needs of it.
#[derive(Debug, Deserialize, Default)]
pub struct RawRecord {
    pub metadata: Option<RawMetadata>,
}

#[derive(Debug, Deserialize, Default)]
pub struct RawMetadata {
    #[serde(alias = "oclcNumber")]
    pub oclc_number: Option<String>,
    #[serde(default)]
    pub record: RawBookRecord,
}

/// The nested `metadata.record` object carrying the fields the aggregator
/// actually merges; everything else on it is ignored.
#[derive(Debug, Deserialize, Default)]
pub struct RawBookRecord {
    pub isbns: Option<Vec<String>>,
    pub isbn13: Option<String>,
    #[serde(alias = "totalHoldingCount")]
    pub total_holding_count: Option<u32>,
    #[serde(alias = "machineReadableDate")]
    pub machine_readable_date: Option<String>,
    #[serde(alias = "publicationDate")]
    pub publication_date: Option<String>,
    pub date: Option<String>,
}

/// Accumulated state for the OCLC group currently being aggregated.
#[derive(Default)]
pub struct BookAggregator {
    current_id: Option<String>,
    isbns: HashSet<String>,
    holdings: Option<u32>,
    year: Option<i32>,
}

impl BookAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one parsed line through the state machine.
    ///
    /// Returns the encoded bytes of the group that was just flushed, if
    /// any. Pass `None` to signal end-of-batch: if a group is in progress
    /// it is flushed and reset; otherwise this is a no-op.
    pub fn process(&mut self, record: Option<&RawRecord>) -> Option<Vec<u8>> {
        let Some(record) = record else {
            return if self.current_id.is_some() {
                self.flush_and_reset()
            } else {
                None
            };
        };

        let oclc_id = record
            .metadata
            .as_ref()
            .and_then(|m| m.oclc_number.as_ref())
            .filter(|id| !id.is_empty());

        let flushed = match (&self.current_id, oclc_id) {
            (Some(current), Some(new_id)) if current != new_id => {
                let flushed = self.flush_and_reset();
                self.current_id = Some(new_id.clone());
                flushed
            }
            (None, Some(new_id)) => {
                self.current_id = Some(new_id.clone());
                None
            }
            (_, None) => {
                // An empty OCLC id on a line forces the current group closed;
                // the line's own fields still get merged into the (now
                // id-less) reset state below.
                self.flush_and_reset()
            }
            _ => None,
        };

        self.merge(record);
        flushed
    }

    fn merge(&mut self, record: &RawRecord) {
        let Some(metadata) = record.metadata.as_ref() else {
            return;
        };
        let book = &metadata.record;
        if let Some(isbns) = &book.isbns {
            self.isbns.extend(isbns.iter().cloned());
        }
        if let Some(isbn13) = &book.isbn13 {
            self.isbns.insert(isbn13.clone());
        }
        if let Some(holdings) = book.total_holding_count {
            self.holdings = Some(self.holdings.map_or(holdings, |h| h.max(holdings)));
        }

        let mut date_fields = Vec::new();
        if let Some(d) = &book.machine_readable_date {
            date_fields.push(Some(d.as_str()));
        }
        if let Some(d) = &book.publication_date {
            date_fields.push(Some(d.as_str()));
        }
        if let Some(d) = &book.date {
            date_fields.push(Some(d.as_str()));
        }
        if !date_fields.is_empty() {
            if let Some(extracted) = extract_most_likely_year(&date_fields) {
                self.year = Some(self.year.map_or(extracted, |y| y.min(extracted)));
            }
        }
    }

    fn flush_and_reset(&mut self) -> Option<Vec<u8>> {
        let bytes = self.create_bytes();
        self.current_id = None;
        self.isbns.clear();
        self.holdings = None;
        self.year = None;
        bytes
    }

    fn create_bytes(&self) -> Option<Vec<u8>> {
        if self.isbns.is_empty() {
            return None;
        }
        let verified: HashSet<String> = self
            .isbns
            .iter()
            .filter(|isbn| verify_isbn(isbn))
            .cloned()
            .collect();
        if verified.is_empty() {
            return None;
        }
        let filtered = filter_invalid_isbns(&verified);

        let mut positions: Vec<u32> = filtered.iter().filter_map(|s| isbn_position(s)).collect();
        positions.sort_unstable();
        positions.dedup();

        if positions.is_empty() || (self.holdings.is_none() && self.year.is_none()) {
            return None;
        }

        Some(encode_record(&positions, self.holdings, self.year))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, isbns: &[&str], holdings: Option<u32>, date: Option<&str>) -> RawRecord {
        RawRecord {
            metadata: Some(RawMetadata {
                oclc_number: Some(id.to_string()),
                record: RawBookRecord {
                    isbns: Some(isbns.iter().map(|s| s.to_string()).collect()),
                    isbn13: None,
                    total_holding_count: holdings,
                    machine_readable_date: date.map(|d| d.to_string()),
                    publication_date: None,
                    date: None,
                },
            }),
        }
    }

    #[test]
    fn single_record_processing_matches_reference_bytes() {
        let mut agg = BookAggregator::new();
        let rec = record("1", &["0306406152"], Some(5), Some("2000"));
        assert!(agg.process(Some(&rec)).is_none());
        let flushed = agg.process(None).unwrap();
        assert_eq!(flushed[0], 0xC1);
        assert_eq!(flushed[1], 5);
        assert_eq!(flushed.len(), 7);
    }

    #[test]
    fn new_oclc_id_flushes_previous_group() {
        let mut agg = BookAggregator::new();
        let rec1 = record("1", &["0306406152"], Some(5), Some("2000"));
        let rec2 = record("2", &["9791234567896"], Some(1), Some("2001"));
        assert!(agg.process(Some(&rec1)).is_none());
        let flushed = agg.process(Some(&rec2)).unwrap();
        assert!(!flushed.is_empty());
    }

    #[test]
    fn holdings_take_the_max_across_lines() {
        let mut agg = BookAggregator::new();
        let rec1 = record("1", &["0306406152"], Some(3), None);
        let rec2 = record("1", &[], Some(9), None);
        assert!(agg.process(Some(&rec1)).is_none());
        assert!(agg.process(Some(&rec2)).is_none());
        let flushed = agg.process(None).unwrap();
        assert_eq!(flushed[1], 9);
    }

    #[test]
    fn year_takes_the_min_across_lines() {
        let mut agg = BookAggregator::new();
        let rec1 = record("1", &["0306406152"], None, Some("2000"));
        let rec2 = record("1", &[], None, Some("1998"));
        assert!(agg.process(Some(&rec1)).is_none());
        assert!(agg.process(Some(&rec2)).is_none());
        let flushed = agg.process(None).unwrap();
        // has_count (holdings) is false since holdings never set, so byte 1
        // is the year offset: 2025 - 1998 = 27.
        assert_eq!(flushed[1], 27);
    }

    #[test]
    fn group_with_no_isbns_produces_nothing() {
        let mut agg = BookAggregator::new();
        let rec = RawRecord {
            metadata: Some(RawMetadata {
                oclc_number: Some("1".to_string()),
                ..Default::default()
            }),
        };
        let _ = agg.process(Some(&rec));
        assert!(agg.process(None).is_none());
    }

    #[test]
    fn group_with_isbns_but_no_holdings_or_year_is_dropped() {
        let mut agg = BookAggregator::new();
        let rec = record("1", &["0306406152"], None, None);
        assert!(agg.process(Some(&rec)).is_none());
        assert!(agg.process(None).is_none());
    }

    #[test]
    fn end_of_batch_with_no_active_group_is_a_no_op() {
        let mut agg = BookAggregator::new();
        assert!(agg.process(None).is_none());
    }

    #[test]
    fn empty_oclc_id_flushes_the_current_group() {
        let mut agg = BookAggregator::new();
        let rec1 = record("1", &["0306406152"], Some(5), Some("2000"));
        let rec2 = RawRecord {
            metadata: Some(RawMetadata {
                oclc_number: Some(String::new()),
                record: RawBookRecord {
                    isbns: Some(vec!["9791234567896".to_string()]),
                    ..Default::default()
                },
            }),
        };
        assert!(agg.process(Some(&rec1)).is_none());
        let flushed = agg.process(Some(&rec2)).unwrap();
        assert_eq!(flushed[1], 5);
        // The id-less line's ISBN was merged into the reset state, which
        // has no holdings/year of its own so it never flushes again.
        assert!(agg.process(None).is_none());
    }
}
