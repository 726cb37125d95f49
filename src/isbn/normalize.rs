//! ISBN string normalization and checksum verification.

/// Rewrites a `978-`/`979-` prefix to its single-digit GS1 equivalent (`0`/`1`)
/// and, by default, strips all hyphens.
///
/// This mirrors the addressing scheme used throughout the pixel-mapping
/// code: an ISBN-13 beginning `978-` occupies the same coordinate space as
/// an ISBN-10 beginning with the digit it is rewritten to.
pub fn normalize_isbn(isbn: &str, strip_hyphens: bool) -> String {
    let rewritten = if let Some(rest) = isbn.strip_prefix("978-") {
        format!("0{rest}")
    } else if let Some(rest) = isbn.strip_prefix("979-") {
        format!("1{rest}")
    } else {
        isbn.to_string()
    };
    if strip_hyphens {
        rewritten.replace('-', "")
    } else {
        rewritten
    }
}

/// Verifies an ISBN-10 checksum.
///
/// The first nine characters must be digits; the tenth may be a digit or
/// `X` (valued 10). Valid iff `sum(digit[i] * (10 - i) for i in 0..10) % 11 == 0`.
pub fn verify_isbn10(isbn: &str) -> bool {
    let cleaned: String = isbn.chars().filter(|c| *c != '-' && *c != ' ').collect();
    if cleaned.len() != 10 {
        return false;
    }
    let chars: Vec<char> = cleaned.chars().collect();
    if !chars[..9].iter().all(|c| c.is_ascii_digit()) {
        return false;
    }
    let last = chars[9];
    let last_value = if last == 'X' || last == 'x' {
        10
    } else if last.is_ascii_digit() {
        last.to_digit(10).unwrap()
    } else {
        return false;
    };

    let mut sum = 0u32;
    for (i, c) in chars[..9].iter().enumerate() {
        let digit = c.to_digit(10).unwrap();
        sum += digit * (10 - i as u32);
    }
    sum += last_value * (10 - 9);
    sum % 11 == 0
}

/// Verifies an ISBN-13 checksum (all 13 characters must be digits).
pub fn verify_isbn13(isbn: &str) -> bool {
    if isbn.len() != 13 || !isbn.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    let digits: Vec<u32> = isbn.chars().map(|c| c.to_digit(10).unwrap()).collect();
    let sum: u32 = digits[..12]
        .iter()
        .enumerate()
        .map(|(i, d)| if i % 2 == 0 { *d } else { *d * 3 })
        .sum();
    let check = (10 - sum % 10) % 10;
    check == digits[12]
}

/// Dispatches to [`verify_isbn10`] or [`verify_isbn13`] by length after
/// stripping hyphens and spaces.
pub fn verify_isbn(isbn: &str) -> bool {
    let cleaned: String = isbn.chars().filter(|c| *c != '-' && *c != ' ').collect();
    match cleaned.len() {
        10 => verify_isbn10(&cleaned),
        13 => verify_isbn13(&cleaned),
        _ => false,
    }
}
