#![no_std]
#![deny(clippy::pedantic)]
#![deny(warnings)]
#![deny(missing_docs)]
//! A multi-recipient, IND-CCA2-secure key encapsulation mechanism built on
//! Module-LWE.
//!
//! This is a Kyber/ML-KEM-shaped lattice KEM with two deliberate departures
//! from the standard, both aimed at encrypting the same message to many
//! recipients cheaply:
//!
//! - **Derandomized, "fake-seed" public keys.** A wire public key is half
//!   the size of a naive batch-of-two key: instead of publishing two
//!   independent public polyvecs, a keypair publishes one real one plus a
//!   32-byte seed from which every encryptor can *deterministically*
//!   reconstruct a second, equally plausible "filler" public value. Which
//!   of the two is the genuine key is a secret bit held only by the key
//!   owner.
//! - **Shared `c1`, per-recipient `c2`.** Encrypting a message to `n`
//!   recipients produces one recipient-independent ciphertext component
//!   `c1` (the bulk of the cost) plus one small `c2` per recipient, rather
//!   than `n` independent ciphertexts.
//!
//! Each parameter set is a separate module ([`mkem_low`], [`mkem_mid`],
//! [`mkem_high`]) gated by a cargo feature of the same name. A typical flow:
//!
//! 1. Each recipient runs `KG::try_keygen_vt(&seed_a)` to get an
//!    [`traits::SerDes`]-able encapsulation key and a decapsulation key, all
//!    sharing the same matrix seed `seed_a`.
//! 2. The sender runs `KG::try_encaps_c1_vt(&seed_a)` once to get `c1`, an
//!    [`EncapsState`], and the shared secret, then calls
//!    `EncapsState::try_encaps_c2_vt(pk)` once per recipient's public key to
//!    get that recipient's `c2` (or uses `KG::try_encaps_batch_with_rng_vt`
//!    to do both steps for a whole slice of public keys at once).
//! 3. Each recipient calls `decaps_key.decaps_vt(&c1, &c2)` to recover the
//!    shared secret.
//!
//! Decapsulation never fails outright: a ciphertext that was not honestly
//! produced this way still yields *some* shared secret, indistinguishable
//! from a real one without the secret key, via a Fujisaki-Okamoto implicit
//! rejection transform. See [`kem`] for why.

// Functionality map:
//
// field.rs      - Montgomery/Barrett modular arithmetic on i16 coefficients
// ntt.rs        - forward/inverse number-theoretic transform, base multiply
// byte_fns.rs   - generic d-bit (de)compression and (de)packing
// symmetric.rs  - SHA3-256 and SHAKE128/256 wrappers (H, KDF, PRF, XOF)
// sampling.rs   - uniform rejection sampling and centered binomial noise
// ct.rs         - constant-time select/swap/compare built on subtle
// poly.rs       - single ring element operations
// polyvec.rs    - length-K vectors of ring elements
// k_pke.rs      - the derandomized multi-recipient IND-CPA scheme
// kem.rs        - the IND-CCA2 KEM wrapping k_pke.rs via implicit rejection
//
// The parameter sets below are modules with macro-injected code connecting
// them to kem.rs.

mod byte_fns;
mod ct;
mod field;
mod k_pke;
mod kem;
mod ntt;
mod poly;
mod polyvec;
mod sampling;
mod symmetric;

/// All functionality is covered by traits, so that consumers can use trait
/// objects where that is convenient.
pub mod traits;

use traits::SerDes;
use zeroize::{Zeroize, ZeroizeOnDrop};

// Relevant to every parameter set.
pub(crate) const _N: usize = 256;
pub(crate) const Q: u16 = 3329;

/// Shared secret key length, in bytes, common to every parameter set.
pub const SSK_LEN: usize = 32;

/// The (opaque) shared secret established by encapsulation and recovered by
/// decapsulation.
#[derive(Clone, Debug, Zeroize, ZeroizeOnDrop)]
pub struct SharedSecretKey([u8; SSK_LEN]);

impl SharedSecretKey {
    pub(crate) fn new(bytes: [u8; SSK_LEN]) -> Self {
        SharedSecretKey(bytes)
    }
}

impl SerDes for SharedSecretKey {
    type ByteArray = [u8; SSK_LEN];

    fn into_bytes(self) -> Self::ByteArray {
        self.0
    }

    fn try_from_bytes(ssk: Self::ByteArray) -> Result<Self, &'static str> {
        Ok(SharedSecretKey(ssk))
    }
}

// Constant-time equality: this is a secret, so don't let derived PartialEq
// short-circuit on the first mismatching byte.
impl PartialEq for SharedSecretKey {
    fn eq(&self, other: &Self) -> bool {
        use subtle::ConstantTimeEq;
        self.0.ct_eq(&other.0).into()
    }
}

// This common functionality is injected into each parameter set module.
macro_rules! functionality {
    () => {
        const ETA1_64: usize = ETA1 as usize * 64;
        const ETA2_64: usize = ETA2 as usize * 64;

        use crate::kem::{
            mkem_dec, mkem_enc_c1, mkem_enc_c2, mkem_keypair, EncapsState as InnerEncapsState,
        };
        use crate::traits::{Decaps, KeyGen, SerDes};
        use crate::SharedSecretKey;
        use rand_core::CryptoRngCore;
        #[cfg(feature = "default-rng")]
        use rand_core::OsRng;
        use zeroize::{Zeroize, ZeroizeOnDrop};

        /// Correctly sized public ("encapsulation") key for this parameter set.
        ///
        /// Wire layout: the real public polyvec followed by the 32-byte
        /// fake-seed used to reconstruct the filler half.
        #[derive(Clone)]
        pub struct EncapsKey([u8; PK_LEN]);

        /// Correctly sized secret ("decapsulation") key for this parameter set.
        ///
        /// Wire layout: the IND-CPA secret polyvec, the flip bit, the
        /// embedded public key, the shared matrix seed, and the 32-byte
        /// implicit-rejection value `z`.
        #[derive(Clone, Zeroize, ZeroizeOnDrop)]
        pub struct DecapsKey([u8; SK_LEN]);

        /// The recipient-independent ciphertext component, shared across an
        /// entire batch of recipients.
        #[derive(Clone)]
        pub struct CipherTextC1([u8; C1_LEN]);

        /// The per-recipient ciphertext component.
        #[derive(Clone)]
        pub struct CipherTextC2([u8; C2_LEN]);

        impl Default for CipherTextC2 {
            fn default() -> Self {
                CipherTextC2([0u8; C2_LEN])
            }
        }

        /// Key generation entry point for this parameter set.
        pub struct KG();

        impl KeyGen for KG {
            type DecapsKey = DecapsKey;
            type EncapsKey = EncapsKey;

            fn try_keygen_with_rng_vt(
                rng: &mut impl CryptoRngCore, seed_a: &[u8; 32],
            ) -> Result<(EncapsKey, DecapsKey), &'static str> {
                let (mut pk, mut sk) = ([0u8; PK_LEN], [0u8; SK_LEN]);
                mkem_keypair::<K, ETA1_64>(rng, seed_a, &mut pk, &mut sk);
                Ok((EncapsKey(pk), DecapsKey(sk)))
            }

            #[cfg(feature = "default-rng")]
            fn try_keygen_vt(seed_a: &[u8; 32]) -> Result<(EncapsKey, DecapsKey), &'static str> {
                Self::try_keygen_with_rng_vt(&mut OsRng, seed_a)
            }
        }

        /// State carried from the shared `c1` to each recipient's `c2`,
        /// returned by [`KG::try_encaps_c1_with_rng_vt`].
        pub struct EncapsState(InnerEncapsState<K>);

        impl EncapsState {
            /// Finishes encryption against a single recipient's public key,
            /// producing that recipient's `c2`.
            #[must_use]
            pub fn try_encaps_c2_vt(&self, pk: &EncapsKey) -> CipherTextC2 {
                let mut c2 = [0u8; C2_LEN];
                mkem_enc_c2::<K, ETA2_64>(&self.0, &pk.0, DV, &mut c2);
                CipherTextC2(c2)
            }
        }

        impl KG {
            /// Produces the shared `c1` and the secret every recipient's
            /// `c2` will encrypt, using the supplied RNG.
            #[must_use]
            pub fn try_encaps_c1_with_rng_vt(
                rng: &mut impl CryptoRngCore, seed_a: &[u8; 32],
            ) -> (CipherTextC1, EncapsState, SharedSecretKey) {
                let mut c1 = [0u8; C1_LEN];
                let (state, ss) = mkem_enc_c1::<K, ETA1_64, ETA2_64>(rng, seed_a, DU, &mut c1);
                (CipherTextC1(c1), EncapsState(state), SharedSecretKey::new(ss))
            }

            /// Produces the shared `c1` and shared secret using the system
            /// default RNG.
            #[cfg(feature = "default-rng")]
            #[must_use]
            pub fn try_encaps_c1_vt(seed_a: &[u8; 32]) -> (CipherTextC1, EncapsState, SharedSecretKey) {
                Self::try_encaps_c1_with_rng_vt(&mut OsRng, seed_a)
            }

            /// Encrypts the same message to every key in `pks`, writing one
            /// `c2` into the matching slot of `c2s_out` (same length as
            /// `pks`) alongside a single shared `c1`.
            ///
            /// # Panics
            /// Panics if `pks.len() != c2s_out.len()`.
            #[must_use]
            pub fn try_encaps_batch_with_rng_vt(
                rng: &mut impl CryptoRngCore, seed_a: &[u8; 32], pks: &[&EncapsKey],
                c2s_out: &mut [CipherTextC2],
            ) -> (CipherTextC1, SharedSecretKey) {
                assert_eq!(pks.len(), c2s_out.len());
                let (c1, state, ss) = Self::try_encaps_c1_with_rng_vt(rng, seed_a);
                for (pk, c2_out) in pks.iter().zip(c2s_out.iter_mut()) {
                    *c2_out = state.try_encaps_c2_vt(pk);
                }
                (c1, ss)
            }
        }

        impl Decaps for DecapsKey {
            type CipherTextC1 = CipherTextC1;
            type CipherTextC2 = CipherTextC2;

            fn decaps_vt(&self, c1: &CipherTextC1, c2: &CipherTextC2) -> SharedSecretKey {
                let ss = mkem_dec::<K, ETA1_64, ETA2_64>(&self.0, DU, DV, &c1.0, &c2.0);
                SharedSecretKey::new(ss)
            }
        }

        impl SerDes for EncapsKey {
            type ByteArray = [u8; PK_LEN];

            fn into_bytes(self) -> Self::ByteArray {
                self.0
            }

            fn try_from_bytes(ek: Self::ByteArray) -> Result<Self, &'static str> {
                // Every byte pattern of the right length decodes to some
                // ring element assignment; there is nothing further to
                // validate here (unlike a scheme that rejects
                // non-canonical coefficient encodings).
                Ok(EncapsKey(ek))
            }
        }

        impl SerDes for DecapsKey {
            type ByteArray = [u8; SK_LEN];

            fn into_bytes(self) -> Self::ByteArray {
                self.0
            }

            fn try_from_bytes(dk: Self::ByteArray) -> Result<Self, &'static str> {
                Ok(DecapsKey(dk))
            }
        }

        impl SerDes for CipherTextC1 {
            type ByteArray = [u8; C1_LEN];

            fn into_bytes(self) -> Self::ByteArray {
                self.0
            }

            fn try_from_bytes(c1: Self::ByteArray) -> Result<Self, &'static str> {
                Ok(CipherTextC1(c1))
            }
        }

        impl SerDes for CipherTextC2 {
            type ByteArray = [u8; C2_LEN];

            fn into_bytes(self) -> Self::ByteArray {
                self.0
            }

            fn try_from_bytes(c2: Self::ByteArray) -> Result<Self, &'static str> {
                Ok(CipherTextC2(c2))
            }
        }
    };
}

/// The `low` parameter set (`K=2`, matching ML-KEM-512's security category).
#[cfg(feature = "mkem-low")]
pub mod mkem_low {
    //! See the [crate root](crate) for the overall usage flow.

    const K: usize = 2;
    const ETA1: u32 = 3;
    const ETA2: u32 = 2;
    const DU: u32 = 10;
    const DV: u32 = 4;

    /// Serialized public key length, in bytes.
    pub const PK_LEN: usize = 800;
    /// Serialized secret key length, in bytes.
    pub const SK_LEN: usize = 1633;
    /// Serialized shared ciphertext component length, in bytes.
    pub const C1_LEN: usize = 1280;
    /// Serialized per-recipient ciphertext component length, in bytes.
    pub const C2_LEN: usize = 257;

    functionality!();
}

/// The `mid` parameter set (`K=3`, matching ML-KEM-768's security category).
#[cfg(feature = "mkem-mid")]
pub mod mkem_mid {
    //! See the [crate root](crate) for the overall usage flow.

    const K: usize = 3;
    const ETA1: u32 = 2;
    const ETA2: u32 = 2;
    const DU: u32 = 10;
    const DV: u32 = 4;

    /// Serialized public key length, in bytes.
    pub const PK_LEN: usize = 1184;
    /// Serialized secret key length, in bytes.
    pub const SK_LEN: usize = 2401;
    /// Serialized shared ciphertext component length, in bytes.
    pub const C1_LEN: usize = 1920;
    /// Serialized per-recipient ciphertext component length, in bytes.
    pub const C2_LEN: usize = 257;

    functionality!();
}

/// The `high` parameter set (`K=4`, matching ML-KEM-1024's security category).
#[cfg(feature = "mkem-high")]
pub mod mkem_high {
    //! See the [crate root](crate) for the overall usage flow.

    const K: usize = 4;
    const ETA1: u32 = 2;
    const ETA2: u32 = 2;
    const DU: u32 = 11;
    const DV: u32 = 5;

    /// Serialized public key length, in bytes.
    pub const PK_LEN: usize = 1568;
    /// Serialized secret key length, in bytes.
    pub const SK_LEN: usize = 3169;
    /// Serialized shared ciphertext component length, in bytes.
    pub const C1_LEN: usize = 2816;
    /// Serialized per-recipient ciphertext component length, in bytes.
    pub const C2_LEN: usize = 321;

    functionality!();
}
