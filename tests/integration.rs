//! Crate-level correctness properties that need the public API surface
//! rather than a single module's internals.

use mkyber::traits::{Decaps, KeyGen, SerDes};
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;

macro_rules! agreement_test {
    ($test_name:ident, $module:ident) => {
        #[test]
        fn $test_name() {
            use mkyber::$module::KG;

            let mut rng = ChaCha8Rng::seed_from_u64(0xC0FFEE);
            let seed_a = [0x42u8; 32];

            let (ek, dk) = KG::try_keygen_with_rng_vt(&mut rng, &seed_a).unwrap();
            let (c1, state, ss_enc) = KG::try_encaps_c1_with_rng_vt(&mut rng, &seed_a);
            let c2 = state.try_encaps_c2_vt(&ek);

            let ss_dec = dk.decaps_vt(&c1, &c2);
            assert_eq!(ss_enc, ss_dec);
        }
    };
}

#[cfg(feature = "mkem-low")]
agreement_test!(low_keypair_encaps_decaps_agree, mkem_low);
#[cfg(feature = "mkem-mid")]
agreement_test!(mid_keypair_encaps_decaps_agree, mkem_mid);
#[cfg(feature = "mkem-high")]
agreement_test!(high_keypair_encaps_decaps_agree, mkem_high);

#[cfg(feature = "mkem-mid")]
#[test]
fn batch_encaps_to_many_recipients_all_decapsulate_to_same_secret() {
    use mkyber::mkem_mid::{CipherTextC2, KG};

    let mut rng = ChaCha8Rng::seed_from_u64(0xBADA55);
    let seed_a = [0x17u8; 32];

    const N: usize = 5;
    let mut eks = Vec::with_capacity(N);
    let mut dks = Vec::with_capacity(N);
    for _ in 0..N {
        let (ek, dk) = KG::try_keygen_with_rng_vt(&mut rng, &seed_a).unwrap();
        eks.push(ek);
        dks.push(dk);
    }
    let ek_refs: Vec<&_> = eks.iter().collect();

    let mut c2s: Vec<CipherTextC2> = (0..N).map(|_| CipherTextC2::default()).collect();
    let (c1, ss_enc) = KG::try_encaps_batch_with_rng_vt(&mut rng, &seed_a, &ek_refs, &mut c2s);

    for (dk, c2) in dks.iter().zip(c2s.iter()) {
        let ss_dec = dk.decaps_vt(&c1, c2);
        assert_eq!(ss_enc, ss_dec);
    }

    // Distinct recipients get distinct per-recipient ciphertext halves.
    assert_ne!(c2s[0].clone().into_bytes(), c2s[1].clone().into_bytes());
}

#[cfg(feature = "mkem-mid")]
#[test]
fn tampered_c1_byte_breaks_agreement() {
    use mkyber::mkem_mid::KG;

    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let seed_a = [9u8; 32];

    let (ek, dk) = KG::try_keygen_with_rng_vt(&mut rng, &seed_a).unwrap();
    let (c1, state, ss_enc) = KG::try_encaps_c1_with_rng_vt(&mut rng, &seed_a);
    let c2 = state.try_encaps_c2_vt(&ek);

    let mut c1_bytes = c1.into_bytes();
    c1_bytes[0] ^= 1;
    let c1_tampered = mkyber::mkem_mid::CipherTextC1::try_from_bytes(c1_bytes).unwrap();

    let ss_dec = dk.decaps_vt(&c1_tampered, &c2);
    assert_ne!(ss_enc, ss_dec);
}

#[cfg(feature = "mkem-mid")]
#[test]
fn decaps_with_unrelated_secret_key_differs_from_real_secret() {
    use mkyber::mkem_mid::KG;

    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let seed_a = [3u8; 32];

    let (ek, _dk) = KG::try_keygen_with_rng_vt(&mut rng, &seed_a).unwrap();
    let (_other_ek, other_dk) = KG::try_keygen_with_rng_vt(&mut rng, &seed_a).unwrap();

    let (c1, state, ss_enc) = KG::try_encaps_c1_with_rng_vt(&mut rng, &seed_a);
    let c2 = state.try_encaps_c2_vt(&ek);

    let ss_dec = other_dk.decaps_vt(&c1, &c2);
    assert_ne!(ss_enc, ss_dec);
}
