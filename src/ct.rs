//! Constant-time comparison and selection primitives.
//!
//! Every place a secret-dependent branch would otherwise appear (implicit
//! rejection, public-key and ciphertext flip-bit selection) goes through
//! one of these instead. Built on `subtle` rather than hand-rolled masking,
//! matching how the rest of the crate leans on vetted constant-time
//! building blocks instead of re-deriving them.

use subtle::{Choice, ConditionallySelectable, ConditionallySwappable, ConstantTimeEq};

/// Constant-time equality check over two equal-length byte slices.
///
/// # Panics
/// Panics if `a.len() != b.len()` - both sides are always fixed-size
/// buffers at the call sites in this crate, so a mismatch is a bug.
#[must_use]
pub(crate) fn verify(a: &[u8], b: &[u8]) -> Choice {
    assert_eq!(a.len(), b.len());
    a.ct_eq(b)
}

/// Conditionally overwrites `dst` with `src` (byte buffers) in constant time.
pub(crate) fn cmov_bytes(dst: &mut [u8], src: &[u8], choice: Choice) {
    assert_eq!(dst.len(), src.len());
    for (d, s) in dst.iter_mut().zip(src.iter()) {
        d.conditional_assign(s, choice);
    }
}

/// Conditionally overwrites `dst` with `src` (a single ring element) in
/// constant time.
pub(crate) fn poly_cmov(dst: &mut [i16; 256], src: &[i16; 256], choice: Choice) {
    for (d, s) in dst.iter_mut().zip(src.iter()) {
        d.conditional_assign(s, choice);
    }
}

/// Conditionally overwrites `dst` with `src` (a `K`-element vector of ring
/// elements) in constant time.
pub(crate) fn polyvec_cmov<const K: usize>(
    dst: &mut [[i16; 256]; K], src: &[[i16; 256]; K], choice: Choice,
) {
    for (d, s) in dst.iter_mut().zip(src.iter()) {
        poly_cmov(d, s, choice);
    }
}

/// Conditionally swaps `a` and `b` (each a `K`-element vector) in constant
/// time, leaving both unchanged when `choice` is false.
pub(crate) fn polyvec_cswap<const K: usize>(
    a: &mut [[i16; 256]; K], b: &mut [[i16; 256]; K], choice: Choice,
) {
    for (x, y) in a.iter_mut().zip(b.iter_mut()) {
        for (xc, yc) in x.iter_mut().zip(y.iter_mut()) {
            i16::conditional_swap(xc, yc, choice);
        }
    }
}
