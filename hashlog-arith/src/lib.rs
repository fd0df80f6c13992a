// File: hashlog-arith/src/lib.rs
//! Binary decomposition of leaf counts.
//!
//! A tree with `n` leaves is a forest of perfect subtrees whose sizes are the
//! powers of two in the binary expansion of `n`, largest first. Everything
//! here is integer bit arithmetic, exact over the whole `i64`/`u64` range.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Greatest `k` with `2^k <= n`. `log2_floor(0)` is 0 by convention.
pub fn log2_floor(n: i64) -> Result<u32> {
    if n < 0 {
        return Err(Error::InvalidArgument(format!("logarithm of negative number {n}")));
    }
    if n == 0 { return Ok(0); }
    Ok(u64::BITS - 1 - (n as u64).leading_zeros())
}

/// Exponents of the binary expansion of `n`, descending. Empty for `n <= 0`.
pub fn decompose(n: i64) -> Vec<u32> {
    if n <= 0 { return Vec::new(); }
    exponents(n as u64)
}

/// Unsigned form of [`decompose`].
pub fn exponents(n: u64) -> Vec<u32> {
    let mut out = Vec::with_capacity(n.count_ones() as usize);
    let mut rest = n;
    while rest != 0 {
        let e = u64::BITS - 1 - rest.leading_zeros();
        out.push(e);
        rest ^= 1 << e;
    }
    out
}

/// Sum of `2^e` over `exponents`. Inverse of [`decompose`].
pub fn compose(exponents: &[u32]) -> Result<u64> {
    exponents.iter().try_fold(0u64, |acc, &e| {
        let term = 1u64
            .checked_shl(e)
            .ok_or_else(|| Error::InvalidArgument(format!("exponent {e} exceeds 63")))?;
        acc.checked_add(term)
            .ok_or_else(|| Error::InvalidArgument(format!("sum of powers overflows at exponent {e}")))
    })
}

/// Sizes of the perfect subtrees of an `n`-leaf forest, largest first.
pub fn subtree_sizes(n: u64) -> Vec<u64> {
    exponents(n).into_iter().map(|e| 1u64 << e).collect()
}

/// `(offset, height)` of every perfect subtree of an `n`-leaf forest, left to right.
pub fn subtree_offsets(n: u64) -> Vec<(u64, u32)> {
    let mut offset = 0u64;
    exponents(n)
        .into_iter()
        .map(|e| {
            let start = offset;
            offset += 1 << e;
            (start, e)
        })
        .collect()
}

/// Height of the smallest (rightmost) subtree of an `n`-leaf forest.
#[inline]
pub fn trailing_height(n: u64) -> Option<u32> {
    if n == 0 { None } else { Some(n.trailing_zeros()) }
}

/// Position in the `n`-leaf forest of the subtree holding leaf `index`,
/// together with that subtree's offset and height.
pub fn locate(n: u64, index: u64) -> Option<(usize, u64, u32)> {
    if index >= n { return None; }
    subtree_offsets(n)
        .into_iter()
        .enumerate()
        .find(|(_, (offset, height))| index < offset + (1u64 << height))
        .map(|(pos, (offset, height))| (pos, offset, height))
}
