//! The multi-recipient IND-CPA public-key encryption scheme.
//!
//! This is the inner layer wrapped by [`crate::kem`] into an IND-CCA2 KEM.
//! A keypair here secretly has only one "real" share, but publishes enough
//! information to derive *two* equally plausible public values, `pk0` and
//! `pk1`: the wire public key is `pk_poly || fakeseed`, and
//! `pk1 = pk_poly + Expand(fakeseed)` is reconstructed by every encryptor
//! without the key owner ever transmitting `pk1` directly. A hidden bit `b`
//! recorded in the secret key says whether `pk0` or `pk1` is the genuine
//! key (the other is unkeyed filler), which is what lets the *public* key
//! stay half the size of a batch-of-one scheme while every ciphertext still
//! carries material for both halves.
//!
//! Encryption always produces both halves: `c1` carries a compressed
//! ciphertext vector for each of two independent ephemeral secrets
//! (`sp0`, `sp1`), and each recipient's `c2` encrypts the message against
//! both `pk0` and `pk1` (after an independent per-recipient coin flip
//! decides which ephemeral secret pairs with which pk half) plus a trailing
//! byte recording that flip. `c1` is identical for every recipient in a
//! batch; only `c2` and the flip differ per recipient.

use crate::ct::{poly_cmov, polyvec_cmov, polyvec_cswap};
use crate::poly::{
    poly_add, poly_compress, poly_decompress, poly_frommsg, poly_getnoise, poly_invntt_tomont,
    poly_reduce, poly_sub, poly_tomont, poly_tomsg,
};
use crate::polyvec::{
    matrix_vec_mul, polyvec_add, polyvec_basemul_acc_montgomery, polyvec_compress,
    polyvec_decompress, polyvec_frombytes, polyvec_invntt_tomont, polyvec_ntt, polyvec_reduce,
    polyvec_sub, polyvec_tobytes, PolyVec,
};
use crate::sampling::{gen_matrix, gen_polyvec};
use crate::symmetric::h;
use rand_core::CryptoRngCore;
use subtle::Choice;
use zeroize::Zeroize;

/// Ephemeral per-encryption state forwarded from [`enc_c1`] to [`enc_c2`],
/// both already in the NTT domain. Zeroized on drop since `sp0`/`sp1` are
/// as sensitive as any other encryption randomness.
pub(crate) struct Fwd<const K: usize> {
    pub(crate) sp0: PolyVec<K>,
    pub(crate) sp1: PolyVec<K>,
}

impl<const K: usize> Drop for Fwd<K> {
    fn drop(&mut self) {
        for p in self.sp0.iter_mut().chain(self.sp1.iter_mut()) {
            p.zeroize();
        }
    }
}

/// Generates a derandomized keypair.
///
/// `publicseed` is the 32-byte seed for the shared public matrix `A`
/// (common across a whole batch of recipients, not secret). Returns
/// `(pk_poly, fakeseed, s_hat, b)`: `pk_poly || fakeseed` is the wire
/// public key, `s_hat || b` the wire IND-CPA secret key.
pub(crate) fn keygen<const K: usize, const ETA1_64: usize>(
    rng: &mut impl CryptoRngCore, publicseed: &[u8; 32],
) -> (PolyVec<K>, [u8; 32], PolyVec<K>, u8) {
    let a = gen_matrix::<K>(publicseed, true);

    let mut noiseseed = [0u8; 32];
    rng.fill_bytes(&mut noiseseed);
    let mut order_byte = [0u8; 1];
    rng.fill_bytes(&mut order_byte);

    let mut nonce = 0u8;
    let s: PolyVec<K> = core::array::from_fn(|_| {
        let p = poly_getnoise::<ETA1_64>(&noiseseed, nonce);
        nonce += 1;
        p
    });
    let e: PolyVec<K> = core::array::from_fn(|_| {
        let p = poly_getnoise::<ETA1_64>(&noiseseed, nonce);
        nonce += 1;
        p
    });
    noiseseed.zeroize();

    let s_hat = polyvec_reduce(&polyvec_ntt(&s));
    let e_hat = polyvec_ntt(&e);

    let pk_hat = matrix_vec_mul(&a, &s_hat);
    let pk_hat: PolyVec<K> = core::array::from_fn(|i| poly_tomont(&pk_hat[i]));
    let pk_hat = polyvec_reduce(&polyvec_add(&pk_hat, &e_hat));

    // The raw draw never leaves this function; only its hash is published
    // and used to re-derive the filler half of the key.
    let mut raw_fakeseed = [0u8; 32];
    rng.fill_bytes(&mut raw_fakeseed);
    let fakeseed = h(&raw_fakeseed);
    raw_fakeseed.zeroize();

    let fake_pk = gen_polyvec::<K>(&fakeseed);
    let fake_pk = polyvec_reduce(&polyvec_sub(&pk_hat, &fake_pk));

    let b = order_byte[0] & 1;
    let mut pk_published = pk_hat;
    polyvec_cmov(&mut pk_published, &fake_pk, Choice::from(b));

    (pk_published, fakeseed, s_hat, b)
}

/// Reconstructs both public-key halves from the wire public key:
/// `pk0` is the transmitted half, `pk1 = Expand(fakeseed) + pk0`.
#[must_use]
pub(crate) fn unpack_pk<const K: usize>(
    pk_poly: &PolyVec<K>, fakeseed: &[u8; 32],
) -> (PolyVec<K>, PolyVec<K>) {
    let pk1 = gen_polyvec::<K>(fakeseed);
    let pk1 = polyvec_add(&pk1, pk_poly);
    (*pk_poly, pk1)
}

/// Produces the first, recipient-independent ciphertext component `c1`
/// (two compressed vectors, one per ephemeral secret) and forwards the
/// ephemeral state needed to finish encryption against any recipient.
///
/// `c1_out` must be exactly `2 * K * 32 * du` bytes.
pub(crate) fn enc_c1<const K: usize, const ETA1_64: usize, const ETA2_64: usize>(
    seed_a: &[u8; 32], coins: &[u8; 32], du: u32, c1_out: &mut [u8],
) -> Fwd<K> {
    let at = gen_matrix::<K>(seed_a, false);

    let mut nonce = 0u8;
    let mut draw_eta1 = |seed: &[u8; 32]| {
        let p = poly_getnoise::<ETA1_64>(seed, nonce);
        nonce += 1;
        p
    };
    let sp0: PolyVec<K> = core::array::from_fn(|_| draw_eta1(coins));
    let sp1: PolyVec<K> = core::array::from_fn(|_| draw_eta1(coins));
    let mut draw_eta2 = |seed: &[u8; 32]| {
        let p: crate::poly::Poly = poly_getnoise::<ETA2_64>(seed, nonce);
        nonce += 1;
        p
    };
    let ep0: PolyVec<K> = core::array::from_fn(|_| draw_eta2(coins));
    let ep1: PolyVec<K> = core::array::from_fn(|_| draw_eta2(coins));

    let sp0_hat = polyvec_reduce(&polyvec_ntt(&sp0));
    let sp1_hat = polyvec_reduce(&polyvec_ntt(&sp1));

    let b0 = matrix_vec_mul(&at, &sp0_hat);
    let b0 = polyvec_reduce(&polyvec_add(&polyvec_invntt_tomont(&b0), &ep0));

    let b1 = matrix_vec_mul(&at, &sp1_hat);
    let b1 = polyvec_reduce(&polyvec_add(&polyvec_invntt_tomont(&b1), &ep1));

    let half = 32 * du as usize * K;
    polyvec_compress::<K>(du, &b0, &mut c1_out[..half]);
    polyvec_compress::<K>(du, &b1, &mut c1_out[half..2 * half]);

    Fwd { sp0: sp0_hat, sp1: sp1_hat }
}

/// Produces the second, per-recipient ciphertext component `c2` against
/// recipient public key `(pk_poly, fakeseed)`, reusing the ephemeral state
/// forwarded from [`enc_c1`].
///
/// `coins2` is the public-key-dependent coin (conventionally
/// `H(pk_bytes || msg)`, derived by the caller once per recipient); its low
/// bit decides which ephemeral secret pairs with which public-key half, and
/// that bit is cleared before the remainder seeds the public-key-dependent
/// noise so it is not redundantly reused there. `c2_out`'s final byte
/// records the chosen pairing so [`dec`] can undo it.
pub(crate) fn enc_c2<const K: usize, const ETA2_64: usize>(
    pk_poly: &PolyVec<K>, fakeseed: &[u8; 32], msg: &[u8; 32], coins2: &[u8; 32], dv: u32,
    fwd: &Fwd<K>, c2_out: &mut [u8],
) {
    let flip = coins2[0] & 1;
    let mut seed = *coins2;
    seed[0] &= 0xfe;

    let epp0 = poly_getnoise::<ETA2_64>(&seed, 0);
    let epp1 = poly_getnoise::<ETA2_64>(&seed, 1);

    let k_poly = poly_frommsg(msg);

    let (pk0, pk1) = unpack_pk::<K>(pk_poly, fakeseed);
    let mut pk0 = pk0;
    let mut pk1 = pk1;
    polyvec_cswap(&mut pk0, &mut pk1, Choice::from(flip));

    let v0 = polyvec_basemul_acc_montgomery(&pk0, &fwd.sp0);
    let v0 = poly_reduce(&poly_add(&poly_add(&poly_invntt_tomont(&v0), &epp0), &k_poly));

    let v1 = polyvec_basemul_acc_montgomery(&pk1, &fwd.sp1);
    let v1 = poly_reduce(&poly_add(&poly_add(&poly_invntt_tomont(&v1), &epp1), &k_poly));

    let half = 32 * dv as usize;
    let last = c2_out.len() - 1;
    poly_compress(dv, &v0, &mut c2_out[..half]);
    poly_compress(dv, &v1, &mut c2_out[half..2 * half]);
    c2_out[last] = flip;
}

/// Recovers the 32-byte message from a ciphertext `(c1, c2)` under secret
/// key `(s_hat, b)`. Always succeeds at the ring-element level; an invalid
/// ciphertext simply yields whatever bytes fall out, and it is the outer
/// re-encryption check in [`crate::kem`] that detects and rejects that.
#[must_use]
pub(crate) fn dec<const K: usize>(
    s_hat: &PolyVec<K>, b: u8, du: u32, dv: u32, c1: &[u8], c2: &[u8],
) -> [u8; 32] {
    let half1 = 32 * du as usize * K;
    let mut b0 = polyvec_decompress::<K>(du, &c1[..half1]);
    let b1 = polyvec_decompress::<K>(du, &c1[half1..2 * half1]);
    let flip = c2[c2.len() - 1];
    let sel = Choice::from(b ^ (flip & 1));
    polyvec_cmov(&mut b0, &b1, sel);

    let half2 = 32 * dv as usize;
    let mut v0 = poly_decompress(dv, &c2[..half2]);
    let v1 = poly_decompress(dv, &c2[half2..2 * half2]);
    poly_cmov(&mut v0, &v1, sel);

    let b0_hat = polyvec_ntt(&b0);
    let mp = polyvec_basemul_acc_montgomery(s_hat, &b0_hat);
    let mp = poly_invntt_tomont(&mp);
    let mp = poly_reduce(&poly_sub(&v0, &mp));

    poly_tomsg(&mp)
}

pub(crate) fn pk_tobytes<const K: usize>(pk_poly: &PolyVec<K>, fakeseed: &[u8; 32], out: &mut [u8]) {
    let poly_bytes = K * 384;
    polyvec_tobytes::<K>(pk_poly, &mut out[..poly_bytes]);
    out[poly_bytes..poly_bytes + 32].copy_from_slice(fakeseed);
}

#[must_use]
pub(crate) fn pk_frombytes<const K: usize>(bytes: &[u8]) -> (PolyVec<K>, [u8; 32]) {
    let poly_bytes = K * 384;
    let pk_poly = polyvec_frombytes::<K>(&bytes[..poly_bytes]);
    let mut fakeseed = [0u8; 32];
    fakeseed.copy_from_slice(&bytes[poly_bytes..poly_bytes + 32]);
    (pk_poly, fakeseed)
}

pub(crate) fn sk_tobytes<const K: usize>(s_hat: &PolyVec<K>, b: u8, out: &mut [u8]) {
    let poly_bytes = K * 384;
    polyvec_tobytes::<K>(s_hat, &mut out[..poly_bytes]);
    out[poly_bytes] = b;
}

#[must_use]
pub(crate) fn sk_frombytes<const K: usize>(bytes: &[u8]) -> (PolyVec<K>, u8) {
    let poly_bytes = K * 384;
    let s_hat = polyvec_frombytes::<K>(&bytes[..poly_bytes]);
    (s_hat, bytes[poly_bytes])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symmetric::h as hash_h;
    use rand_chacha::rand_core::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const K: usize = 3;
    const ETA1_64: usize = 128;
    const ETA2_64: usize = 128;
    const DU: u32 = 10;
    const DV: u32 = 4;

    #[test]
    fn keygen_enc_dec_round_trip() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let seed_a = [1u8; 32];
        let (pk_poly, fakeseed, s_hat, b) = keygen::<K, ETA1_64>(&mut rng, &seed_a);

        let mut pk_bytes = [0u8; K * 384 + 32];
        pk_tobytes::<K>(&pk_poly, &fakeseed, &mut pk_bytes);

        let coins = [2u8; 32];
        let mut c1 = [0u8; 2 * K * 32 * DU as usize];
        let fwd = enc_c1::<K, ETA1_64, ETA2_64>(&seed_a, &coins, DU, &mut c1);

        let msg = [0x42u8; 32];
        let mut coins2_input = [0u8; K * 384 + 32 + 32];
        coins2_input[..pk_bytes.len()].copy_from_slice(&pk_bytes);
        coins2_input[pk_bytes.len()..].copy_from_slice(&msg);
        let coins2 = hash_h(&coins2_input);

        let mut c2 = [0u8; 2 * 32 * DV as usize + 1];
        enc_c2::<K, ETA2_64>(&pk_poly, &fakeseed, &msg, &coins2, DV, &fwd, &mut c2);

        let recovered = dec::<K>(&s_hat, b, DU, DV, &c1, &c2);
        assert_eq!(recovered, msg);
    }
}
