//! Reconciles a book's raw ISBN-10/ISBN-13 set down to the set that should
//! actually be counted, discarding ISBN-13s that are just the 978-rewrite
//! of an ISBN-10 already present, while keeping independent 979 ISBNs.

use std::collections::HashSet;

/// Applies the base/prefix reconciliation algorithm described in the
/// book aggregator's flush step.
///
/// `isbns` is the raw, deduplicated set of ISBN-10 and ISBN-13 strings
/// attached to one book record (already checksum-verified by the caller).
pub fn filter_invalid_isbns(isbns: &HashSet<String>) -> HashSet<String> {
    let isbn10s: HashSet<&String> = isbns.iter().filter(|s| s.len() == 10).collect();
    let mut bases: HashSet<String> = isbn10s.iter().map(|s| s[..9].to_string()).collect();

    let isbn13s: Vec<&String> = isbns.iter().filter(|s| s.len() == 13).collect();

    let valid_isbn13s: HashSet<&String> = isbn13s
        .iter()
        .copied()
        .filter(|s| s.starts_with("978") && bases.contains(&s[3..12]))
        .collect();

    let mut remaining: Vec<&String> = isbn13s
        .iter()
        .copied()
        .filter(|s| !valid_isbn13s.contains(s))
        .collect();

    let mut isbns_978: HashSet<String> = HashSet::new();
    let mut still_remaining = Vec::new();
    for s in &remaining {
        if s.starts_with("978") {
            isbns_978.insert((*s).clone());
            bases.insert(s[3..12].to_string());
        } else {
            still_remaining.push(*s);
        }
    }
    remaining = still_remaining;
    // Re-filter `remaining` now that `bases` has grown with the 978 dupes
    // just discovered, so a 979 ISBN sharing a base with one of them is
    // recognized as a duplicate too.
    let isbns_978_set: HashSet<&String> = isbns_978.iter().collect();
    let isbns_979: HashSet<String> = remaining
        .into_iter()
        .filter(|s| !isbns_978_set.contains(s))
        .filter(|s| !(s.starts_with("979") && bases.contains(&s[3..12])))
        .cloned()
        .collect();

    let mut result: HashSet<String> = isbn10s.into_iter().cloned().collect();
    result.extend(valid_isbn13s.into_iter().cloned());
    result.extend(isbns_978);
    result.extend(isbns_979);
    result
}
