//! ISBN-to-integer-position mapping and the two pixel coordinate systems
//! used when rasterizing the ISBN space.

/// Width/height of the full canvas used by [`get_pos`].
pub const WIDTH: u32 = 50_000;
pub const HEIGHT: u32 = 40_000;

/// Size of a single prefix block's square grid, used by [`get_isbn_code_pos`].
pub const BLOCK_SIZE: u32 = 10_000;

/// Number of positions covered by one prefix block.
pub const BLOCK_POSITIONS: u32 = 100_000_000;

const MIS_PREFIX_LOW: u32 = 1_000_000_000;
const AGENCY_RANGE_START: u32 = 1_100_000_000;
const AGENCY_RANGE_END: u32 = 1_140_000_000;
const WIDE_RANGE_START: u32 = 1_800_000_000;
const WIDE_RANGE_END: u32 = 1_900_000_000;

/// Computes the `u32` position of an ISBN within the addressable space.
///
/// Strips non-digit characters, drops the trailing check digit, and takes
/// the last 12 remaining digits (conceptually left-padded with `978`) as an
/// integer offset from `978_000_000_000`. Returns `None` if the result does
/// not fit in the addressable `u32` range, or corrects a common 979-prefix
/// mistake back into the 978 block.
pub fn isbn_position(isbn: &str) -> Option<u32> {
    let digits: String = isbn.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    // Drop the check digit.
    let body = &digits[..digits.len() - 1];
    // Left-pad short bodies (e.g. an ISBN-10's 9-digit body) by prepending
    // "978" rather than zeros, so a bare ISBN-10 lands in the same 978
    // block as its ISBN-13 equivalent instead of underflowing the base.
    let body = if body.len() < 12 {
        format!("978{body}")
    } else {
        body.to_string()
    };
    let body = if body.len() > 12 {
        body[body.len() - 12..].to_string()
    } else {
        body
    };
    let full: u64 = body.parse().ok()?;
    let base: u64 = 978_000_000_000;
    if full < base {
        return None;
    }
    let mut pos = full - base;
    if pos >= u32::MAX as u64 {
        return None;
    }
    let mut pos = pos as u32;
    if pos >= MIS_PREFIX_LOW
        && !(AGENCY_RANGE_START..AGENCY_RANGE_END).contains(&pos)
        && !(WIDE_RANGE_START..WIDE_RANGE_END).contains(&pos)
    {
        pos -= MIS_PREFIX_LOW;
    }
    Some(pos)
}

/// Maps a position within a single 10^8-sized prefix block to an (x, y)
/// coordinate on a 10,000x10,000 grid, by walking `code`'s decimal digits
/// from least-significant: even digit-index contributes to x, odd to y.
pub fn get_isbn_code_pos(code: u32) -> (u32, u32) {
    let mut x: u64 = 0;
    let mut y: u64 = 0;
    let mut remaining = code as u64;
    let mut i = 0u32;
    while remaining > 0 || i < 8 {
        let digit = remaining % 10;
        remaining /= 10;
        let power = 10u64.pow(i / 2);
        if i % 2 == 0 {
            x += digit * power;
        } else {
            y += digit * power;
        }
        i += 1;
        if i >= 8 {
            break;
        }
    }
    (x as u32, y as u32)
}

/// Maps a full addressable position (prefix block included) onto the
/// 50,000x40,000 canvas.
///
/// Walks the position's decimal digits left to right in (y, x) pairs, each
/// pair weighted by a shared power of ten starting at `10^4` and decreasing
/// by one per pair. After the first pair the accumulator is folded once
/// (`y = 2*y + x/50_000; x = x % 50_000`) to map the doubled-width first
/// digit onto the canvas's 5:4 aspect ratio.
pub fn get_pos(isbn_position_value: u32) -> (u32, u32) {
    let (x, y) = get_pos_str(&format!("{isbn_position_value:010}"));
    (x as u32, y as u32)
}

/// The digit-string-generic form of [`get_pos`], used directly by the
/// plotting binaries on ISBN prefixes of varying digit length (4-10
/// digits) rather than only full 10-digit positions.
///
/// Walks `digits` left to right in `(y, x)` pairs weighted by a shared
/// power of ten starting at `10^4` and decreasing by one per pair,
/// folding the first pair once to map a doubled-width leading digit onto
/// a 5:4 canvas. A string shorter than 10 digits simply stops early,
/// matching the original's habit of calling this on short prefix strings.
pub fn get_pos_str(digits: &str) -> (i64, i64) {
    let digits: Vec<i64> = digits.chars().map(|c| c.to_digit(10).unwrap() as i64).collect();
    let mut x: i64 = 0;
    let mut y: i64 = 0;
    let mut n = 4i64;
    let mut first_pair = true;
    for pair in digits.chunks(2) {
        let power = 10i64.pow(n.max(0) as u32);
        y += pair[0] * power;
        if pair.len() > 1 {
            x += pair[1] * power;
            if first_pair {
                first_pair = false;
                y = 2 * y + x / 50_000;
                x %= 50_000;
            }
            n -= 1;
        }
    }
    (x, y)
}
