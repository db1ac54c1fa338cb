//! Public traits implemented by each parameter set's types.
//!
//! The multi-recipient shape of this scheme does not fit the usual
//! single-object `Encaps` trait: a batch encryption shares one `c1` across
//! many recipients, so encapsulation is exposed as free functions on each
//! parameter-set module (`try_encaps_batch_with_rng_vt`, and the split
//! `try_encaps_c1_with_rng_vt`/`try_encaps_c2_vt` pair) rather than a
//! method on a single public key. `KeyGen`, `Decaps`, and `SerDes` below
//! still follow the one-object-per-method shape.

use rand_core::CryptoRngCore;

/// Generates a keypair for a shared matrix seed `seed_a`.
///
/// `seed_a` is not secret, but is expected to be shared across every
/// keypair a batch of ciphertexts will target: the public matrix `A`
/// derived from it is what makes the public-key-dependent half of
/// encryption interoperable across recipients.
pub trait KeyGen {
    /// Wire-format public ("encapsulation") key.
    type EncapsKey;
    /// Wire-format secret ("decapsulation") key.
    type DecapsKey;

    /// Generates a keypair using the supplied RNG.
    ///
    /// # Errors
    /// Returns an error only if the RNG itself fails.
    fn try_keygen_with_rng_vt(
        rng: &mut impl CryptoRngCore, seed_a: &[u8; 32],
    ) -> Result<(Self::EncapsKey, Self::DecapsKey), &'static str>;

    /// Generates a keypair using the system default RNG.
    ///
    /// # Errors
    /// Returns an error only if the default RNG fails.
    #[cfg(feature = "default-rng")]
    fn try_keygen_vt(seed_a: &[u8; 32]) -> Result<(Self::EncapsKey, Self::DecapsKey), &'static str>;
}

/// Recovers the shared secret a ciphertext was created with.
///
/// Decapsulation as specified here never rejects: a ciphertext that was
/// not honestly produced by this scheme still yields a (pseudorandom,
/// useless-to-the-attacker) shared secret rather than an error. See the
/// module documentation on [`crate::kem`].
pub trait Decaps {
    /// First, recipient-independent ciphertext component.
    type CipherTextC1;
    /// Second, per-recipient ciphertext component.
    type CipherTextC2;

    /// Decapsulates `(c1, c2)` under `self`.
    fn decaps_vt(&self, c1: &Self::CipherTextC1, c2: &Self::CipherTextC2) -> crate::SharedSecretKey;
}

/// Fixed-size byte (de)serialization for wire types.
pub trait SerDes {
    /// The fixed-size byte array this type serializes to/from.
    type ByteArray;

    /// Serializes `self` to its wire byte representation.
    fn into_bytes(self) -> Self::ByteArray;

    /// Deserializes from a wire byte representation.
    ///
    /// # Errors
    /// Returns an error if the bytes do not encode a well-formed value
    /// (currently: never, since every byte pattern of the right length is
    /// accepted; reserved for future validation).
    fn try_from_bytes(bytes: Self::ByteArray) -> Result<Self, &'static str>
    where
        Self: Sized;
}
