//! Number-theoretic transform over `R_q = Z_q[X]/(X^256+1)`.
//!
//! `Q - 1` is divisible by `256` but not by `512`, so the transform only
//! splits the ring into 128 two-coefficient blocks rather than all the way
//! down to scalars; the pointwise product of two transformed polynomials is
//! therefore a set of 128 degree-one multiplications modulo `X^2 - zeta`,
//! handled by [`base_mul`].

use crate::field::fqmul;
use crate::Q;

/// Primitive 256th root of unity mod `Q`, in the plain (non-Montgomery) domain.
const ZETA: i16 = 17;

/// `zetas[i] = ZETA^{bitrev7(i)} mod Q`, pre-scaled into the Montgomery domain
/// (multiplied by `R mod Q`). Computed at compile time so no lookup table is
/// shipped as a literal blob.
pub(crate) static ZETAS: [i16; 128] = gen_zetas();

const fn bitrev7(x: u8) -> u8 {
    let mut x = x & 0x7f;
    let mut r = 0u8;
    let mut i = 0;
    while i < 7 {
        r = (r << 1) | (x & 1);
        x >>= 1;
        i += 1;
    }
    r
}

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const fn gen_zetas() -> [i16; 128] {
    let mut zetas = [0i16; 128];
    let q = Q as u64;
    let mut i = 0usize;
    while i < 128 {
        let e = bitrev7(i as u8) as u32;
        let mut base = ZETA as u64;
        let mut exp = e;
        let mut acc = 1u64;
        while exp > 0 {
            if exp & 1 == 1 {
                acc = (acc * base) % q;
            }
            base = (base * base) % q;
            exp >>= 1;
        }
        let mont = (acc * 65536) % q;
        zetas[i] = mont as i16;
        i += 1;
    }
    zetas
}

/// In-place forward NTT (decimation in time, Cooley-Tukey butterflies).
///
/// Leaves coefficients in the range `(-7Q, 7Q)`; callers that need a fully
/// reduced result should follow up with [`crate::poly::poly_reduce`].
pub(crate) fn ntt(r: &mut [i16; 256]) {
    let mut k = 1usize;
    let mut len = 128usize;
    while len >= 2 {
        let mut start = 0usize;
        while start < 256 {
            let zeta = ZETAS[k];
            k += 1;
            for j in start..start + len {
                let t = fqmul(zeta, r[j + len]);
                r[j + len] = r[j] - t;
                r[j] = r[j] + t;
            }
            start = start + 2 * len;
        }
        len >>= 1;
    }
}

/// In-place inverse NTT (decimation in frequency, Gentleman-Sande butterflies),
/// including the final scale-down by `128^{-1}` and conversion out of the
/// Montgomery domain.
pub(crate) fn inv_ntt(r: &mut [i16; 256]) {
    let mut k = 127usize;
    let mut len = 2usize;
    while len <= 128 {
        let mut start = 0usize;
        while start < 256 {
            let zeta = ZETAS[k];
            k -= 1;
            for j in start..start + len {
                let t = r[j];
                r[j] = crate::field::barrett_reduce(t + r[j + len]);
                r[j + len] = r[j + len] - t;
                r[j + len] = fqmul(zeta, r[j + len]);
            }
            start = start + 2 * len;
        }
        len <<= 1;
    }
    for x in r.iter_mut() {
        *x = fqmul(*x, crate::field::INV_NTT_SCALE);
    }
}

/// Multiplies two degree-one polynomials `a0 + a1*X` and `b0 + b1*X` modulo
/// `X^2 - zeta`, all four coefficients already in the Montgomery domain.
#[must_use]
fn base_mul(a0: i16, a1: i16, b0: i16, b1: i16, zeta: i16) -> (i16, i16) {
    let r0 = fqmul(fqmul(a1, b1), zeta) + fqmul(a0, b0);
    let r1 = fqmul(a0, b1) + fqmul(a1, b0);
    (r0, r1)
}

/// Pointwise multiplication of two NTT-domain polynomials, Montgomery-scaled.
///
/// The result still carries one factor of `R`; this is exactly what
/// [`crate::poly::poly_invntt_tomont`] expects as input, so the common
/// `basemul` -> `invntt` -> already-in-Montgomery-domain chain needs no
/// extra rescaling step.
#[must_use]
pub(crate) fn poly_basemul_montgomery(a: &[i16; 256], b: &[i16; 256]) -> [i16; 256] {
    let mut r = [0i16; 256];
    for i in 0..64 {
        let (r0, r1) = base_mul(a[4 * i], a[4 * i + 1], b[4 * i], b[4 * i + 1], ZETAS[64 + i]);
        r[4 * i] = r0;
        r[4 * i + 1] = r1;
        let (r2, r3) =
            base_mul(a[4 * i + 2], a[4 * i + 3], b[4 * i + 2], b[4 * i + 3], -ZETAS[64 + i]);
        r[4 * i + 2] = r2;
        r[4 * i + 3] = r3;
    }
    r
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeta_table_matches_known_kyber_constants() {
        // zetas[1] = 17^bitrev7(1) = 17^64 mod q, in Montgomery domain
        assert_eq!(ZETAS[0], MONT_ONE);
    }

    const MONT_ONE: i16 = {
        // R mod Q, i.e. zetas[0] since bitrev7(0) = 0 and 17^0 = 1
        ((1u64 << 16) % (Q as u64)) as i16
    };

    #[test]
    fn ntt_then_inv_ntt_scaled_identity_on_zero() {
        let mut r = [0i16; 256];
        ntt(&mut r);
        inv_ntt(&mut r);
        assert_eq!(r, [0i16; 256]);
    }
}
