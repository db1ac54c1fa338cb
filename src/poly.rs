//! Operations on a single ring element `f in R_q = Z_q[X]/(X^256+1)`.
//!
//! A ring element is represented as a plain `[i16; 256]` coefficient array
//! rather than a newtype; see [`crate::field`] for the domain conventions
//! (plain vs. Montgomery) that callers need to track by context.

use crate::byte_fns::{compress_coeff, decompress_coeff, pack_bits, unpack_bits};
use crate::field::{fqmul, to_canonical_u16, MONT_SQ_MOD_Q};
use crate::ntt::{inv_ntt, ntt, poly_basemul_montgomery};
use crate::sampling::sample_poly_cbd;
use crate::symmetric::prf;
use crate::Q;

pub(crate) type Poly = [i16; 256];

#[must_use]
pub(crate) fn poly_add(a: &Poly, b: &Poly) -> Poly {
    core::array::from_fn(|i| a[i] + b[i])
}

#[must_use]
pub(crate) fn poly_sub(a: &Poly, b: &Poly) -> Poly {
    core::array::from_fn(|i| a[i] - b[i])
}

/// Barrett-reduces every coefficient into `(-Q, Q)`.
#[must_use]
pub(crate) fn poly_reduce(a: &Poly) -> Poly {
    core::array::from_fn(|i| crate::field::barrett_reduce(a[i]))
}

/// Enters the Montgomery domain: multiplies every coefficient by `R^2 mod Q`
/// so that a subsequent `fqmul` by a Montgomery-domain value lands back in
/// the Montgomery domain.
#[must_use]
pub(crate) fn poly_tomont(a: &Poly) -> Poly {
    core::array::from_fn(|i| fqmul(a[i], MONT_SQ_MOD_Q))
}

#[must_use]
pub(crate) fn poly_ntt(a: &Poly) -> Poly {
    let mut r = *a;
    ntt(&mut r);
    r
}

/// Inverse NTT followed by leaving the Montgomery domain (see
/// [`crate::ntt::inv_ntt`]).
#[must_use]
pub(crate) fn poly_invntt_tomont(a: &Poly) -> Poly {
    let mut r = *a;
    inv_ntt(&mut r);
    r
}

#[must_use]
pub(crate) fn poly_basemul(a: &Poly, b: &Poly) -> Poly {
    poly_basemul_montgomery(a, b)
}

/// Draws a centered binomial noise polynomial at parameter `eta`, keyed by
/// `seed` and domain-separated by `nonce`.
#[must_use]
pub(crate) fn poly_getnoise<const ETA_64: usize>(seed: &[u8; 32], nonce: u8) -> Poly {
    let bytes: [u8; ETA_64] = prf(seed, nonce);
    sample_poly_cbd(&bytes)
}

/// Packs a fully-reduced polynomial into 384 bytes at 12 bits/coefficient.
#[must_use]
pub(crate) fn poly_tobytes(a: &Poly) -> [u8; 384] {
    let coeffs: [u16; 256] = core::array::from_fn(|i| to_canonical_u16(a[i]));
    let mut out = [0u8; 384];
    pack_bits(12, &coeffs, &mut out);
    out
}

#[must_use]
pub(crate) fn poly_frombytes(bytes: &[u8; 384]) -> Poly {
    let mut coeffs = [0u16; 256];
    unpack_bits(12, bytes, &mut coeffs);
    core::array::from_fn(|i| coeffs[i] as i16)
}

/// Packs the 32-byte message into a ring element via `Decompress_1`, one bit
/// per coefficient: set bit -> `Q/2`, clear bit -> `0`.
#[must_use]
pub(crate) fn poly_frommsg(msg: &[u8; 32]) -> Poly {
    core::array::from_fn(|i| {
        let byte = msg[i / 8];
        let bit = (byte >> (i % 8)) & 1;
        decompress_coeff(1, u16::from(bit)) as i16
    })
}

/// Inverse of [`poly_frommsg`]: rounds each coefficient to the nearer of `0`
/// or `Q/2` via `Compress_1`.
#[must_use]
pub(crate) fn poly_tomsg(a: &Poly) -> [u8; 32] {
    let mut msg = [0u8; 32];
    for i in 0..256 {
        let x = to_canonical_u16(a[i]);
        let bit = compress_coeff(1, x);
        msg[i / 8] |= (bit as u8) << (i % 8);
    }
    msg
}

/// Packs a fully-reduced polynomial at `d` bits/coefficient (`d` in `{4, 5}`)
/// into `out`, which must be exactly `32 * d` bytes.
pub(crate) fn poly_compress(d: u32, a: &Poly, out: &mut [u8]) {
    let coeffs: [u16; 256] = core::array::from_fn(|i| compress_coeff(d, to_canonical_u16(a[i])));
    pack_bits(d, &coeffs, out);
}

#[must_use]
pub(crate) fn poly_decompress(d: u32, bytes: &[u8]) -> Poly {
    let mut packed = [0u16; 256];
    unpack_bits(d, bytes, &mut packed);
    core::array::from_fn(|i| decompress_coeff(d, packed[i]) as i16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tobytes_frombytes_round_trip() {
        let a: Poly = core::array::from_fn(|i| (i as i16) % i16::from(Q));
        let a = poly_reduce(&a);
        let canon: Poly = core::array::from_fn(|i| to_canonical_u16(a[i]) as i16);
        let bytes = poly_tobytes(&canon);
        let back = poly_frombytes(&bytes);
        assert_eq!(canon, back);
    }

    #[test]
    fn frommsg_tomsg_round_trip() {
        let msg = [0xA5u8; 32];
        let p = poly_frommsg(&msg);
        let back = poly_tomsg(&p);
        assert_eq!(msg, back);
    }
}
