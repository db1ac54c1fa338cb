//! The IND-CCA2 multi-recipient KEM built from [`crate::k_pke`] via a
//! Fujisaki-Okamoto transform with implicit rejection.
//!
//! A decapsulation failure never produces an error: it produces a
//! pseudorandom shared secret, computationally indistinguishable from a
//! real one to anyone without the secret key, so that an active attacker
//! submitting malformed ciphertexts learns nothing from the difference
//! between "accepted" and "rejected". See [`mkem_dec`].

use crate::ct::{cmov_bytes, verify};
use crate::k_pke::{self, Fwd};
use crate::polyvec::PolyVec;
use crate::symmetric::{h, kdf};
use rand_core::CryptoRngCore;
use subtle::Choice;
use zeroize::Zeroize;

/// State carried from [`mkem_enc_c1`] to [`mkem_enc_c2`]: the ephemeral
/// vectors forwarded through the underlying PKE, plus the message they
/// encrypt (every recipient's `c2` encrypts the same message, so it is
/// derived once alongside `c1` rather than per recipient).
pub(crate) struct EncapsState<const K: usize> {
    pub(crate) fwd: Fwd<K>,
    pub(crate) msg: [u8; 32],
}

impl<const K: usize> Drop for EncapsState<K> {
    fn drop(&mut self) {
        self.msg.zeroize();
    }
}

fn derive_msg_coins_ss(rng: &mut impl CryptoRngCore) -> ([u8; 32], [u8; 32], [u8; 32]) {
    let mut r = [0u8; 32];
    rng.fill_bytes(&mut r);
    // Don't release raw RNG output as the message: only its hash ever
    // leaves this function.
    let msg = h(&r);
    r.zeroize();
    let coins = h(&msg);
    let ss = kdf(&[&msg]);
    (msg, coins, ss)
}

/// Generates a keypair. `publicseed` seeds the shared public matrix `A` and
/// need not be kept secret; it is typically fresh per keypair but may be
/// shared across a batch of recipients generated together.
///
/// Returns `(pk_bytes, sk_bytes)` sized by the caller's chosen parameter
/// set (`K * 384 + 32` and `2 * (K * 384) + 97` respectively).
pub(crate) fn mkem_keypair<const K: usize, const ETA1_64: usize>(
    rng: &mut impl CryptoRngCore, publicseed: &[u8; 32], pk_out: &mut [u8], sk_out: &mut [u8],
) {
    let (pk_poly, fakeseed, s_hat, b) = k_pke::keygen::<K, ETA1_64>(rng, publicseed);
    k_pke::pk_tobytes::<K>(&pk_poly, &fakeseed, pk_out);

    let poly_bytes = K * 384;
    k_pke::sk_tobytes::<K>(&s_hat, b, &mut sk_out[..poly_bytes + 1]);
    sk_out[poly_bytes + 1..poly_bytes + 1 + pk_out.len()].copy_from_slice(pk_out);
    let off = poly_bytes + 1 + pk_out.len();
    sk_out[off..off + 32].copy_from_slice(publicseed);
    rng.fill_bytes(&mut sk_out[off + 32..off + 64]);
}

/// Produces the shared-across-recipients ciphertext half `c1` and the real
/// shared secret, along with the state needed to finish encryption against
/// each recipient via [`mkem_enc_c2`].
pub(crate) fn mkem_enc_c1<const K: usize, const ETA1_64: usize, const ETA2_64: usize>(
    rng: &mut impl CryptoRngCore, seed_a: &[u8; 32], du: u32, c1_out: &mut [u8],
) -> (EncapsState<K>, [u8; 32]) {
    let (msg, coins, ss) = derive_msg_coins_ss(rng);
    let fwd = k_pke::enc_c1::<K, ETA1_64, ETA2_64>(seed_a, &coins, du, c1_out);
    (EncapsState { fwd, msg }, ss)
}

/// Produces the per-recipient ciphertext half `c2` for `pk_bytes`, given
/// the state from [`mkem_enc_c1`].
pub(crate) fn mkem_enc_c2<const K: usize, const ETA2_64: usize>(
    state: &EncapsState<K>, pk_bytes: &[u8], dv: u32, c2_out: &mut [u8],
) {
    let (pk_poly, fakeseed) = k_pke::pk_frombytes::<K>(pk_bytes);
    let coins2 = pk_dependent_coins(pk_bytes, &state.msg);
    k_pke::enc_c2::<K, ETA2_64>(&pk_poly, &fakeseed, &state.msg, &coins2, dv, &state.fwd, c2_out);
}

fn pk_dependent_coins(pk_bytes: &[u8], msg: &[u8; 32]) -> [u8; 32] {
    // H(pk || msg); computed with a small stack buffer since pk sizes are
    // fixed per parameter set and never more than a few KiB.
    let mut buf = [0u8; 3200];
    debug_assert!(pk_bytes.len() + 32 <= buf.len());
    buf[..pk_bytes.len()].copy_from_slice(pk_bytes);
    buf[pk_bytes.len()..pk_bytes.len() + 32].copy_from_slice(msg);
    h(&buf[..pk_bytes.len() + 32])
}

/// Decapsulates `(c1, c2)` under secret key `sk_bytes`, producing the
/// shared secret established by whoever encrypted it, or, if `(c1, c2)`
/// was not honestly produced that way, a shared secret indistinguishable
/// from a real one to anyone without `sk_bytes`, so the distinction between
/// "valid" and "tampered" ciphertexts never reaches an attacker.
#[must_use]
pub(crate) fn mkem_dec<const K: usize, const ETA1_64: usize, const ETA2_64: usize>(
    sk_bytes: &[u8], du: u32, dv: u32, c1: &[u8], c2: &[u8],
) -> [u8; 32] {
    let poly_bytes = K * 384;
    let (s_hat, b): (PolyVec<K>, u8) = k_pke::sk_frombytes::<K>(&sk_bytes[..poly_bytes + 1]);
    let pk_len = poly_bytes + 32;
    let pk_bytes = &sk_bytes[poly_bytes + 1..poly_bytes + 1 + pk_len];
    let seed_a: [u8; 32] = sk_bytes[poly_bytes + 1 + pk_len..poly_bytes + 1 + pk_len + 32]
        .try_into()
        .unwrap();
    let z: &[u8] = &sk_bytes[poly_bytes + 1 + pk_len + 32..poly_bytes + 1 + pk_len + 64];

    let msg = k_pke::dec::<K>(&s_hat, b, du, dv, c1, c2);
    let t = kdf(&[&msg]);

    let coins = h(&msg);
    let mut cmp1 = alloc_stack(c1.len());
    let fwd = k_pke::enc_c1::<K, ETA1_64, ETA2_64>(&seed_a, &coins, du, cmp1.as_mut());
    let coins2 = pk_dependent_coins(pk_bytes, &msg);
    let (pk_poly, fakeseed) = k_pke::pk_frombytes::<K>(pk_bytes);
    let mut cmp2 = alloc_stack(c2.len());
    k_pke::enc_c2::<K, ETA2_64>(&pk_poly, &fakeseed, &msg, &coins2, dv, &fwd, cmp2.as_mut());

    let ok = verify(c1, cmp1.as_ref()) & verify(c2, cmp2.as_ref());

    let mut buf = alloc_stack(32 + c1.len() + c2.len());
    {
        let b = buf.as_mut();
        b[..32].copy_from_slice(z);
        b[32..32 + c1.len()].copy_from_slice(c1);
        b[32 + c1.len()..].copy_from_slice(c2);
    }
    let reject_key = kdf(&[buf.as_ref()]);

    let mut ss = reject_key;
    cmov_bytes(&mut ss, &t, ok);
    ss
}

/// A small fixed-capacity stack buffer sized generously for any parameter
/// set's ciphertext, avoiding both heap allocation and a second generic
/// parameter threaded through every call in this module purely for buffer
/// sizing.
struct StackBuf {
    data: [u8; 4096],
    len: usize,
}

fn alloc_stack(len: usize) -> StackBuf {
    assert!(len <= 4096);
    StackBuf { data: [0u8; 4096], len }
}

impl StackBuf {
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.data[..self.len]
    }

    fn as_ref(&self) -> &[u8] {
        &self.data[..self.len]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::rand_core::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const K: usize = 2;
    const ETA1_64: usize = 192;
    const ETA2_64: usize = 128;
    const DU: u32 = 10;
    const DV: u32 = 4;
    const POLY_BYTES: usize = K * 384;
    const PK_LEN: usize = POLY_BYTES + 32;
    const SK_LEN: usize = POLY_BYTES + 1 + PK_LEN + 32 + 32;
    const C1_LEN: usize = 2 * K * 32 * DU as usize;
    const C2_LEN: usize = 2 * 32 * DV as usize + 1;

    #[test]
    fn keypair_batch_encaps_decaps_agree() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut seed_a = [0u8; 32];
        rng.fill_bytes(&mut seed_a);

        let mut pk = [0u8; PK_LEN];
        let mut sk = [0u8; SK_LEN];
        mkem_keypair::<K, ETA1_64>(&mut rng, &seed_a, &mut pk, &mut sk);

        let mut c1 = [0u8; C1_LEN];
        let (state, ss_enc) = mkem_enc_c1::<K, ETA1_64, ETA2_64>(&mut rng, &seed_a, DU, &mut c1);
        let mut c2 = [0u8; C2_LEN];
        mkem_enc_c2::<K, ETA2_64>(&state, &pk, DV, &mut c2);

        let ss_dec = mkem_dec::<K, ETA1_64, ETA2_64>(&sk, DU, DV, &c1, &c2);
        assert_eq!(ss_enc, ss_dec);
    }

    #[test]
    fn tampered_ciphertext_does_not_panic_and_differs_from_real_secret() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let mut seed_a = [0u8; 32];
        rng.fill_bytes(&mut seed_a);

        let mut pk = [0u8; PK_LEN];
        let mut sk = [0u8; SK_LEN];
        mkem_keypair::<K, ETA1_64>(&mut rng, &seed_a, &mut pk, &mut sk);

        let mut c1 = [0u8; C1_LEN];
        let (state, ss_enc) = mkem_enc_c1::<K, ETA1_64, ETA2_64>(&mut rng, &seed_a, DU, &mut c1);
        let mut c2 = [0u8; C2_LEN];
        mkem_enc_c2::<K, ETA2_64>(&state, &pk, DV, &mut c2);
        c2[0] ^= 0xFF;

        let ss_dec = mkem_dec::<K, ETA1_64, ETA2_64>(&sk, DU, DV, &c1, &c2);
        assert_ne!(ss_enc, ss_dec);
    }
}
