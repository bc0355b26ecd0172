//! GF(2^8) arithmetic for the Cauchy Reed-Solomon codec.
//!
//! Implements the Galois field GF(2^8) with the irreducible polynomial
//! x^8 + x^4 + x^3 + x + 1 (0x11B over GF(2)) and the primitive element
//! 0x87, which generates the full multiplicative group of order 255.
//!
//! # Representation
//!
//! Elements are stored as `u8` values where each bit is a coefficient of a
//! degree-7 polynomial over GF(2). Addition is XOR; multiplication and
//! division use precomputed log/exp tables for O(1) operations.
//!
//! # Table layout
//!
//! The exp table holds three back-to-back periods of the generator's power
//! sequence (256 + 255 + 255 entries). Lookups use the fixed index form
//! `EXP[LOG[a] + LOG[b] + 255]`, which stays in range for any pair of log
//! values without a mod-255 reduction, on the multiply and divide paths
//! alike.
//!
//! # Determinism
//!
//! Table generation is `const`-evaluated at compile time. The tables are
//! immutable process-wide state: no runtime initialization is required and
//! reads are safe from any number of threads.

/// The irreducible polynomial x^8 + x^4 + x^3 + x + 1, all nine bits.
const POLY: u16 = 0x11B;

/// A primitive element of the field. 0x87 has multiplicative order 255,
/// so its powers enumerate every non-zero element exactly once.
const GENERATOR: u8 = 0x87;

/// Number of exp entries: one full period plus two replicas.
const EXP_LEN: usize = 256 + 255 + 255;

/// Exponential table: `EXP[i]` = `GENERATOR^i`, periodic with period 255.
static EXP: [u8; EXP_LEN] = build_exp_table();

/// Logarithm table: `LOG[a]` = discrete log base `GENERATOR` of `a`, in
/// [0, 254]. `LOG[1]` is 0. `LOG[0]` is undefined and stored as 0.
static LOG: [u8; 256] = build_log_table();

// ============================================================================
// Table generation (const)
// ============================================================================

/// Bit-serial polynomial multiplication modulo `POLY`.
///
/// Only used to seed the tables; runtime multiplication goes through them.
const fn mul_slow(a: u8, b: u8) -> u8 {
    let mut product: u16 = 0;
    let mut i = 0;
    while i < 8 {
        if (b >> i) & 1 != 0 {
            product ^= (a as u16) << i;
        }
        i += 1;
    }
    let mut bit = 15;
    while bit >= 8 {
        if (product >> bit) & 1 != 0 {
            product ^= POLY << (bit - 8);
        }
        bit -= 1;
    }
    product as u8
}

const fn build_exp_table() -> [u8; EXP_LEN] {
    let mut table = [0u8; EXP_LEN];
    let mut val: u8 = 1;
    let mut i = 0;
    while i < 255 {
        table[i] = val;
        table[i + 255] = val;
        table[i + 510] = val;
        val = mul_slow(val, GENERATOR);
        i += 1;
    }
    // The loop covers every slot except the very last one of the third
    // replica, which wraps back to GENERATOR^0.
    table[EXP_LEN - 1] = 1;
    table
}

const fn build_log_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut val: u8 = 1;
    let mut i: u8 = 0;
    loop {
        table[val as usize] = i;
        val = mul_slow(val, GENERATOR);
        if i == 254 {
            break;
        }
        i += 1;
    }
    table
}

// ============================================================================
// Field element wrapper
// ============================================================================

/// An element of GF(2^8).
///
/// Wraps a `u8` and provides field arithmetic. All operations are table
/// lookups or XOR.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Gf256(pub u8);

impl Gf256 {
    /// The additive identity.
    pub const ZERO: Self = Self(0);

    /// The multiplicative identity.
    pub const ONE: Self = Self(1);

    /// Creates a field element from a raw byte.
    #[inline]
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Returns the raw byte value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Returns true if this is the zero element.
    #[inline]
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Field addition (XOR).
    #[inline]
    #[must_use]
    pub const fn add(self, rhs: Self) -> Self {
        Self(self.0 ^ rhs.0)
    }

    /// Field subtraction. Coincides with addition in characteristic 2.
    #[inline]
    #[must_use]
    pub const fn sub(self, rhs: Self) -> Self {
        self.add(rhs)
    }

    /// Field multiplication via the log/exp tables.
    ///
    /// Returns `ZERO` if either operand is zero.
    #[inline]
    #[must_use]
    pub fn mul_field(self, rhs: Self) -> Self {
        if self.0 == 0 || rhs.0 == 0 {
            return Self::ZERO;
        }
        Self(EXP[LOG[self.0 as usize] as usize + LOG[rhs.0 as usize] as usize + 255])
    }

    /// Multiplicative inverse.
    ///
    /// # Panics
    ///
    /// Panics if `self` is zero (zero has no multiplicative inverse).
    #[inline]
    #[must_use]
    pub fn inv(self) -> Self {
        assert!(!self.is_zero(), "cannot invert zero in GF(2^8)");
        Self(EXP[255 - LOG[self.0 as usize] as usize])
    }

    /// Field division: `self / rhs`.
    ///
    /// Returns `ZERO` when the numerator is zero.
    ///
    /// # Panics
    ///
    /// Panics if `rhs` is zero. Dividing by zero is a programmer error and
    /// is raised eagerly.
    #[inline]
    #[must_use]
    pub fn div_field(self, rhs: Self) -> Self {
        assert!(!rhs.is_zero(), "division by zero in GF(2^8)");
        if self.0 == 0 {
            return Self::ZERO;
        }
        Self(EXP[255 + LOG[self.0 as usize] as usize - LOG[rhs.0 as usize] as usize])
    }
}

impl std::fmt::Debug for Gf256 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Gf256(0x{:02x})", self.0)
    }
}

impl std::fmt::Display for Gf256 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u8> for Gf256 {
    #[inline]
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl std::ops::Add for Gf256 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::add(self, rhs)
    }
}

impl std::ops::Sub for Gf256 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::sub(self, rhs)
    }
}

impl std::ops::Mul for Gf256 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self::mul_field(self, rhs)
    }
}

impl std::ops::Div for Gf256 {
    type Output = Self;
    #[inline]
    fn div(self, rhs: Self) -> Self {
        Self::div_field(self, rhs)
    }
}

impl std::ops::AddAssign for Gf256 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = Self::add(*self, rhs);
    }
}

impl std::ops::SubAssign for Gf256 {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = Self::sub(*self, rhs);
    }
}

impl std::ops::MulAssign for Gf256 {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = Self::mul_field(*self, rhs);
    }
}

// ============================================================================
// Bulk operations on byte slices (row-level XOR + scale)
// ============================================================================

/// Minimum slice length to amortise building a 256-byte scalar table.
///
/// The table build costs 255 lookups; above this threshold the single
/// lookup per element beats the branch + double lookup of the scalar path.
const SCALAR_TABLE_THRESHOLD: usize = 64;

/// Builds a 256-entry table mapping `x` to `x * c`, where `offset_log_c`
/// is `LOG[c] + 255` for a non-zero scalar `c`.
fn scalar_table(offset_log_c: usize) -> [u8; 256] {
    let mut table = [0u8; 256];
    for i in 1..256 {
        table[i] = EXP[LOG[i] as usize + offset_log_c];
    }
    table
}

/// XOR `src` into `dst` element-wise: `dst[i] ^= src[i]`.
///
/// This is row addition (and subtraction) over GF(2^8).
///
/// # Panics
///
/// Panics if `src.len() != dst.len()`.
#[inline]
pub fn gf256_add_slice(dst: &mut [u8], src: &[u8]) {
    assert_eq!(dst.len(), src.len(), "slice length mismatch");
    for (d, s) in dst.iter_mut().zip(src) {
        *d ^= s;
    }
}

/// Multiply every element of `dst` by the scalar `c`.
///
/// Zero `c` clears the slice; one is a no-op. Long slices use a pre-built
/// scalar table instead of per-element double lookups.
#[inline]
pub fn gf256_mul_slice(dst: &mut [u8], c: Gf256) {
    if c.is_zero() {
        dst.fill(0);
        return;
    }
    if c == Gf256::ONE {
        return;
    }
    let offset_log_c = LOG[c.0 as usize] as usize + 255;
    if dst.len() >= SCALAR_TABLE_THRESHOLD {
        let table = scalar_table(offset_log_c);
        for d in dst.iter_mut() {
            *d = table[*d as usize];
        }
    } else {
        for d in dst.iter_mut() {
            if *d != 0 {
                *d = EXP[LOG[*d as usize] as usize + offset_log_c];
            }
        }
    }
}

/// Multiply-accumulate: `dst[i] += c * src[i]`.
///
/// This is the fundamental row operation of Gauss-Jordan elimination and of
/// the row-by-row matrix multiply.
///
/// # Panics
///
/// Panics if `src.len() != dst.len()`.
#[inline]
pub fn gf256_addmul_slice(dst: &mut [u8], src: &[u8], c: Gf256) {
    assert_eq!(dst.len(), src.len(), "slice length mismatch");
    if c.is_zero() {
        return;
    }
    if c == Gf256::ONE {
        gf256_add_slice(dst, src);
        return;
    }
    let offset_log_c = LOG[c.0 as usize] as usize + 255;
    if src.len() >= SCALAR_TABLE_THRESHOLD {
        let table = scalar_table(offset_log_c);
        for (d, s) in dst.iter_mut().zip(src) {
            *d ^= table[*s as usize];
        }
    } else {
        for (d, s) in dst.iter_mut().zip(src) {
            if *s != 0 {
                *d ^= EXP[LOG[*s as usize] as usize + offset_log_c];
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
