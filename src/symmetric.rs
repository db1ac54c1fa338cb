//! Hash and extendable-output function wrappers.
//!
//! All of the scheme's randomness derivation and domain separation funnels
//! through these few functions, so every other module reasons about bytes
//! in and bytes out rather than about SHA-3 directly.

use sha3::digest::{ExtendableOutput, Update, XofReader};
use sha3::{Digest, Sha3_256, Shake128, Shake256};

/// `H`: SHA3-256, a single 32-byte digest.
#[must_use]
pub(crate) fn h(bytes: &[u8]) -> [u8; 32] {
    let mut hasher = Sha3_256::new();
    Digest::update(&mut hasher, bytes);
    hasher.finalize().into()
}

/// `KDF`: SHAKE256 squeezed to 32 bytes, used both for the real shared
/// secret and the implicit-rejection pseudorandom fallback.
#[must_use]
pub(crate) fn kdf(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Shake256::default();
    parts.iter().for_each(|p| Update::update(&mut hasher, p));
    let mut reader = hasher.finalize_xof();
    let mut out = [0u8; 32];
    reader.read(&mut out);
    out
}

/// `PRF_eta`: SHAKE256 seeded with a 32-byte key and a one-byte nonce,
/// squeezed to `64 * eta` bytes of noise material.
#[must_use]
pub(crate) fn prf<const ETA_64: usize>(s: &[u8; 32], nonce: u8) -> [u8; ETA_64] {
    let mut hasher = Shake256::default();
    hasher.update(s);
    hasher.update(&[nonce]);
    let mut reader = hasher.finalize_xof();
    let mut result = [0u8; ETA_64];
    reader.read(&mut result);
    result
}

/// `XOF`: SHAKE128 absorbing a 32-byte seed and two index bytes, used to
/// generate (pseudo)random ring elements for the public matrix `A` and for
/// `Expand`.
#[must_use]
pub(crate) fn xof(seed: &[u8; 32], i: u8, j: u8) -> impl XofReader {
    let mut hasher = Shake128::default();
    hasher.update(seed);
    hasher.update(&[i]);
    hasher.update(&[j]);
    hasher.finalize_xof()
}
