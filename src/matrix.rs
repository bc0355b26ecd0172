//! Dense matrix algebra over GF(2^8).
//!
//! Provides the small dense-matrix toolkit the encoder and decoder are built
//! on: row-major storage with a power-of-two stride, shape-checked
//! elementwise and product operations, borrowed row views, and Gauss-Jordan
//! inversion.
//!
//! # Design goals
//!
//! - **Explicit allocation**: [`Matrix::mul`] allocates its result,
//!   [`Matrix::mul_into`] writes into a caller-provided target and
//!   allocates nothing.
//! - **Borrowed row views**: [`Matrix::row`] / [`Matrix::row_mut`] alias
//!   the backing store; their lifetimes are bound to the matrix borrow, so
//!   a view can never outlive its parent.
//! - **Deterministic**: pivot selection takes the first non-zero candidate;
//!   in an exact field any non-zero pivot is as good as any other.

use crate::error::MatrixError;
use crate::gf256::{gf256_add_slice, gf256_addmul_slice, gf256_mul_slice, Gf256};

/// A dense row-major matrix over GF(2^8).
///
/// Element (r, c) lives at offset `r * stride + c` in the backing store,
/// where `stride` is the smallest power of two that fits a row. Each matrix
/// exclusively owns its backing store.
#[derive(Debug, Clone)]
pub struct Matrix {
    data: Vec<u8>,
    rows: usize,
    cols: usize,
    stride: usize,
}

impl Matrix {
    /// Creates a zero-filled matrix of the given shape.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        let stride = if cols == 0 { 0 } else { cols.next_power_of_two() };
        Self {
            data: vec![0; rows * stride],
            rows,
            cols,
            stride,
        }
    }

    /// Number of rows.
    #[inline]
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the element at (row, col).
    ///
    /// Bounds are checked with debug assertions only; use [`Matrix::at`]
    /// for an always-checked read.
    #[inline]
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Gf256 {
        debug_assert!(row < self.rows && col < self.cols);
        Gf256::new(self.data[row * self.stride + col])
    }

    /// Returns the element at (row, col), checking bounds.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` is out of bounds.
    #[inline]
    #[must_use]
    pub fn at(&self, row: usize, col: usize) -> Gf256 {
        assert!(
            row < self.rows && col < self.cols,
            "matrix index ({row}, {col}) out of bounds for {}x{}",
            self.rows,
            self.cols
        );
        self.get(row, col)
    }

    /// Sets the element at (row, col).
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: Gf256) {
        debug_assert!(row < self.rows && col < self.cols);
        self.data[row * self.stride + col] = value.raw();
    }

    /// Borrows row `row` as a byte slice of length `cols`.
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of bounds.
    #[inline]
    #[must_use]
    pub fn row(&self, row: usize) -> &[u8] {
        assert!(row < self.rows, "row {row} out of bounds");
        let start = row * self.stride;
        &self.data[start..start + self.cols]
    }

    /// Mutably borrows row `row` as a byte slice of length `cols`.
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of bounds.
    #[inline]
    #[must_use]
    pub fn row_mut(&mut self, row: usize) -> &mut [u8] {
        assert!(row < self.rows, "row {row} out of bounds");
        let start = row * self.stride;
        &mut self.data[start..start + self.cols]
    }

    /// Fills the matrix with `value` on the diagonal and zero elsewhere.
    pub fn identity(&mut self, value: Gf256) {
        self.data.fill(0);
        for i in 0..self.rows.min(self.cols) {
            self.set(i, i, value);
        }
    }

    /// Swaps two rows in place.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn swap_rows(&mut self, a: usize, b: usize) {
        assert!(a < self.rows && b < self.rows, "row index out of bounds");
        if a == b {
            return;
        }
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let (head, tail) = self.data.split_at_mut(hi * self.stride);
        let lo_start = lo * self.stride;
        head[lo_start..lo_start + self.cols].swap_with_slice(&mut tail[..self.cols]);
    }

    /// Elementwise sum, shape-checked.
    pub fn add(&self, rhs: &Self) -> Result<Self, MatrixError> {
        self.check_same_shape(rhs)?;
        let mut out = self.clone();
        for r in 0..self.rows {
            gf256_add_slice(out.row_mut(r), rhs.row(r));
        }
        Ok(out)
    }

    /// Elementwise difference, shape-checked. Coincides with [`Matrix::add`]
    /// in characteristic 2.
    pub fn sub(&self, rhs: &Self) -> Result<Self, MatrixError> {
        self.add(rhs)
    }

    /// Matrix product into a freshly allocated result.
    pub fn mul(&self, rhs: &Self) -> Result<Self, MatrixError> {
        let mut out = Self::new(self.rows, rhs.cols);
        self.mul_into(rhs, &mut out)?;
        Ok(out)
    }

    /// Matrix product written into a preallocated `target`.
    ///
    /// `target` must have shape (self.rows, rhs.cols). The borrows guarantee
    /// the target never aliases an input, so the product is accumulated
    /// directly into it, one scaled row of `rhs` at a time.
    pub fn mul_into(&self, rhs: &Self, target: &mut Self) -> Result<(), MatrixError> {
        if self.cols != rhs.rows {
            return Err(MatrixError::ShapeMismatch {
                left: (self.rows, self.cols),
                right: (rhs.rows, rhs.cols),
            });
        }
        if target.rows != self.rows || target.cols != rhs.cols {
            return Err(MatrixError::ShapeMismatch {
                left: (self.rows, rhs.cols),
                right: (target.rows, target.cols),
            });
        }
        for r in 0..self.rows {
            target.row_mut(r).fill(0);
            for m in 0..self.cols {
                let coeff = self.get(r, m);
                if coeff.is_zero() {
                    continue;
                }
                gf256_addmul_slice(target.row_mut(r), rhs.row(m), coeff);
            }
        }
        Ok(())
    }

    /// Inverts the matrix in place by Gauss-Jordan elimination.
    ///
    /// Maintains an inverse initialized to identity and applies every
    /// elementary row operation to both matrices; when the input has been
    /// reduced to identity, the inverse is swapped into its storage. On
    /// failure the matrix is left partially reduced.
    ///
    /// A zero diagonal triggers a search below the pivot for any non-zero
    /// entry; exact field arithmetic needs no partial pivoting. If no pivot
    /// exists the matrix is singular.
    pub fn invert(&mut self) -> Result<(), MatrixError> {
        if self.rows != self.cols {
            return Err(MatrixError::NotSquare {
                rows: self.rows,
                cols: self.cols,
            });
        }
        let n = self.rows;
        let mut inverse = Self::new(n, n);
        inverse.identity(Gf256::ONE);

        for p in 0..n {
            let mut pivot = self.get(p, p);
            if pivot.is_zero() {
                for r in p + 1..n {
                    if !self.get(r, p).is_zero() {
                        self.swap_rows(r, p);
                        inverse.swap_rows(r, p);
                        pivot = self.get(p, p);
                        break;
                    }
                }
                if pivot.is_zero() {
                    return Err(MatrixError::Singular);
                }
            }

            let pivot_inv = pivot.inv();
            gf256_mul_slice(self.row_mut(p), pivot_inv);
            gf256_mul_slice(inverse.row_mut(p), pivot_inv);

            let pivot_row = self.row(p).to_vec();
            let pivot_inverse_row = inverse.row(p).to_vec();
            for r in 0..n {
                if r == p {
                    continue;
                }
                let factor = self.get(r, p);
                if factor.is_zero() {
                    continue;
                }
                gf256_addmul_slice(self.row_mut(r), &pivot_row, factor);
                gf256_addmul_slice(inverse.row_mut(r), &pivot_inverse_row, factor);
            }
        }

        std::mem::swap(&mut self.data, &mut inverse.data);
        Ok(())
    }

    fn check_same_shape(&self, rhs: &Self) -> Result<(), MatrixError> {
        if self.rows != rhs.rows || self.cols != rhs.cols {
            return Err(MatrixError::ShapeMismatch {
                left: (self.rows, self.cols),
                right: (rhs.rows, rhs.cols),
            });
        }
        Ok(())
    }
}

impl PartialEq for Matrix {
    fn eq(&self, other: &Self) -> bool {
        if self.rows != other.rows || self.cols != other.cols {
            return false;
        }
        (0..self.rows).all(|r| self.row(r) == other.row(r))
    }
}

impl Eq for Matrix {}
