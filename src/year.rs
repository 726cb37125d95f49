//! Picks the single most plausible publication year out of a handful of
//! free-text date fields attached to a bibliographic record.

use std::collections::HashMap;

const MIN_YEAR: i32 = 1450;
const CURRENT_YEAR: i32 = 2025;

/// Finds all 4-digit runs in `text` that are not themselves part of a
/// longer run of digits (i.e. bounded by a non-digit or string edge on
/// both sides), keeping only those within `[1450, 2025]`.
fn extract_candidate_years(text: &str) -> Vec<i32> {
    let chars: Vec<char> = text.chars().collect();
    let mut years = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        if chars[i].is_ascii_digit() {
            let start = i;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
            let run_len = i - start;
            if run_len == 4 {
                let run: String = chars[start..i].iter().collect();
                if let Ok(year) = run.parse::<i32>() {
                    if (MIN_YEAR..=CURRENT_YEAR).contains(&year) {
                        years.push(year);
                    }
                }
            }
        } else {
            i += 1;
        }
    }
    years
}

/// Extracts the most likely publication year from a set of optional
/// free-text date fields.
///
/// Candidates are every plausible 4-digit run across all inputs. Picks by
/// frequency first; ties are broken by finding the earliest of any pair of
/// candidates (sorted ascending) within 5 years of each other, and failing
/// that by taking the largest candidate.
pub fn extract_most_likely_year(fields: &[Option<&str>]) -> Option<i32> {
    let mut counts: HashMap<i32, usize> = HashMap::new();
    for field in fields.iter().flatten() {
        for year in extract_candidate_years(field) {
            *counts.entry(year).or_insert(0) += 1;
        }
    }
    if counts.is_empty() {
        return None;
    }

    let max_count = *counts.values().max().unwrap();
    let mut top: Vec<i32> = counts
        .iter()
        .filter(|(_, &c)| c == max_count)
        .map(|(&y, _)| y)
        .collect();
    top.sort_unstable();

    if top.len() == 1 {
        return Some(top[0]);
    }

    for pair in top.windows(2) {
        if (pair[1] - pair[0]).abs() <= 5 {
            return Some(pair[0]);
        }
    }

    top.into_iter().max()
}
