//! Generator-row construction for the Cauchy Reed-Solomon code.
//!
//! The conceptual generator matrix has `k` columns and 256 rows, in three
//! regions:
//!
//! ```text
//! row 0..k      identity          systematic packets pass through
//! row k         all ones          single-loss decode is a plain XOR
//! row k+1..256  Cauchy tail       1 / (x_r + y_c), MDS by construction
//! ```
//!
//! For the Cauchy tail, x_r = 255 - r and y_c = 255 - k + c + 1. The x
//! values fall in [0, 254-k] and the y values in [256-k, 255]; the ranges
//! are disjoint, so x_r + y_c (an XOR of distinct bytes) is never zero and
//! every entry is well defined. The Cauchy construction makes every square
//! submatrix invertible, which is exactly the MDS property the decoder
//! relies on.

use crate::gf256::Gf256;

/// Highest generator row index a batch can use.
pub const MAX_ROW_INDEX: usize = 255;

/// Maximum number of output packets per batch. The field has 256 elements,
/// so the code cannot produce more linearly independent rows.
pub const MAX_BATCH_PACKETS: usize = 256;

/// Writes row `index` of the generator matrix for batch size `k` into
/// `row`, which must hold exactly `k` coefficients.
///
/// # Panics
///
/// Panics if `row.len() != k`, if `k` is outside `1..=256`, or if `index`
/// exceeds [`MAX_ROW_INDEX`].
pub fn generator_row(row: &mut [u8], index: usize, k: usize) {
    assert!(k >= 1 && k <= MAX_BATCH_PACKETS, "batch size out of range");
    assert!(index <= MAX_ROW_INDEX, "generator row index out of range");
    assert_eq!(row.len(), k, "row view does not match batch size");

    // Identity region.
    if index < k {
        row.fill(0);
        row[index] = 1;
        return;
    }

    // Row of ones.
    if index == k {
        row.fill(1);
        return;
    }

    // Cauchy tail. The slot x = 255 - k is never used as it belongs to the
    // row of ones.
    let x = (255 - index) as u8;
    for (c, slot) in row.iter_mut().enumerate() {
        let y = (255 - k + c + 1) as u8;
        *slot = Gf256::new(x ^ y).inv().raw();
    }
}
