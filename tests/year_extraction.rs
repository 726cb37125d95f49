//! Literal year-extraction scenarios covering the frequency/proximity
//! tiebreaker heuristic.

use allisbns::year::extract_most_likely_year;

fn fields(values: &[&str]) -> Vec<Option<&str>> {
    values.iter().map(|v| Some(*v)).collect()
}

#[test]
fn frequency_breaks_a_tie_among_candidates() {
    assert_eq!(
        extract_most_likely_year(&fields(&["1966", "1966", "1967"])),
        Some(1966)
    );
}

#[test]
fn distant_tie_is_broken_by_the_more_recent_year() {
    assert_eq!(
        extract_most_likely_year(&fields(&["1555", "1555", "1966", "1966"])),
        Some(1966)
    );
}

#[test]
fn close_tie_is_broken_by_the_earlier_year() {
    assert_eq!(
        extract_most_likely_year(&fields(&["1965", "1966", "1967"])),
        Some(1965)
    );
}

#[test]
fn a_year_before_the_minimum_is_rejected() {
    assert_eq!(extract_most_likely_year(&fields(&["1449"])), None);
}

#[test]
fn an_eight_digit_run_has_no_four_digit_boundary() {
    assert_eq!(extract_most_likely_year(&fields(&["19661967"])), None);
}
