//! Operations on length-`K` vectors of ring elements.

use crate::poly::{
    poly_add, poly_basemul, poly_compress, poly_decompress, poly_frombytes, poly_invntt_tomont,
    poly_ntt, poly_reduce, poly_sub, poly_tobytes, Poly,
};

pub(crate) type PolyVec<const K: usize> = [Poly; K];

#[must_use]
pub(crate) fn polyvec_add<const K: usize>(a: &PolyVec<K>, b: &PolyVec<K>) -> PolyVec<K> {
    core::array::from_fn(|i| poly_add(&a[i], &b[i]))
}

#[must_use]
pub(crate) fn polyvec_sub<const K: usize>(a: &PolyVec<K>, b: &PolyVec<K>) -> PolyVec<K> {
    core::array::from_fn(|i| poly_sub(&a[i], &b[i]))
}

#[must_use]
pub(crate) fn polyvec_reduce<const K: usize>(a: &PolyVec<K>) -> PolyVec<K> {
    core::array::from_fn(|i| poly_reduce(&a[i]))
}

#[must_use]
pub(crate) fn polyvec_ntt<const K: usize>(a: &PolyVec<K>) -> PolyVec<K> {
    core::array::from_fn(|i| poly_ntt(&a[i]))
}

#[must_use]
pub(crate) fn polyvec_invntt_tomont<const K: usize>(a: &PolyVec<K>) -> PolyVec<K> {
    core::array::from_fn(|i| poly_invntt_tomont(&a[i]))
}

/// Inner product `sum_i a[i] * b[i]` of two NTT-domain vectors, reduced to a
/// single fully-Barrett-reduced ring element.
#[must_use]
pub(crate) fn polyvec_basemul_acc_montgomery<const K: usize>(
    a: &PolyVec<K>, b: &PolyVec<K>,
) -> Poly {
    let mut acc = poly_basemul(&a[0], &b[0]);
    for i in 1..K {
        acc = poly_add(&acc, &poly_basemul(&a[i], &b[i]));
    }
    poly_reduce(&acc)
}

/// Matrix-vector product `A * u`, one row at a time via
/// [`polyvec_basemul_acc_montgomery`].
#[must_use]
pub(crate) fn matrix_vec_mul<const K: usize>(
    a: &[PolyVec<K>; K], u: &PolyVec<K>,
) -> PolyVec<K> {
    core::array::from_fn(|i| polyvec_basemul_acc_montgomery(&a[i], u))
}

/// Packs a `K`-element vector at 12 bits/coefficient into `out`
/// (`K * 384` bytes).
pub(crate) fn polyvec_tobytes<const K: usize>(a: &PolyVec<K>, out: &mut [u8]) {
    debug_assert_eq!(out.len(), K * 384);
    for (i, p) in a.iter().enumerate() {
        out[i * 384..(i + 1) * 384].copy_from_slice(&poly_tobytes(p));
    }
}

#[must_use]
pub(crate) fn polyvec_frombytes<const K: usize>(bytes: &[u8]) -> PolyVec<K> {
    debug_assert_eq!(bytes.len(), K * 384);
    core::array::from_fn(|i| {
        let chunk: [u8; 384] = bytes[i * 384..(i + 1) * 384].try_into().unwrap();
        poly_frombytes(&chunk)
    })
}

/// Packs a `K`-element vector at `d` bits/coefficient into `out`
/// (`K * 32 * d` bytes).
pub(crate) fn polyvec_compress<const K: usize>(d: u32, a: &PolyVec<K>, out: &mut [u8]) {
    let chunk = 32 * d as usize;
    for (i, p) in a.iter().enumerate() {
        poly_compress(d, p, &mut out[i * chunk..(i + 1) * chunk]);
    }
}

#[must_use]
pub(crate) fn polyvec_decompress<const K: usize>(d: u32, bytes: &[u8]) -> PolyVec<K> {
    let chunk = 32 * d as usize;
    core::array::from_fn(|i| poly_decompress(d, &bytes[i * chunk..(i + 1) * chunk]))
}
