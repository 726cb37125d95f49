//! ISBN string handling: normalization, checksum verification, the
//! invalid-ISBN reconciliation filter, and the two pixel coordinate systems.

mod filter;
mod normalize;
mod position;

pub use filter::filter_invalid_isbns;
pub use normalize::{normalize_isbn, verify_isbn, verify_isbn10, verify_isbn13};
pub use position::{
    get_isbn_code_pos, get_pos, get_pos_str, isbn_position, BLOCK_POSITIONS, BLOCK_SIZE, HEIGHT,
    WIDTH,
};
