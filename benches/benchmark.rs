use criterion::{criterion_group, criterion_main, Criterion};

use mkyber::traits::{Decaps, KeyGen};
use mkyber::{mkem_high, mkem_low, mkem_mid};

const SEED_A: [u8; 32] = [7u8; 32];

#[allow(clippy::redundant_closure)]
pub fn criterion_benchmark(c: &mut Criterion) {
    let (ek_low, dk_low) = mkem_low::KG::try_keygen_vt(&SEED_A).unwrap();
    let (c1_low, state_low, _) = mkem_low::KG::try_encaps_c1_vt(&SEED_A);
    let c2_low = state_low.try_encaps_c2_vt(&ek_low);

    let (ek_mid, dk_mid) = mkem_mid::KG::try_keygen_vt(&SEED_A).unwrap();
    let (c1_mid, state_mid, _) = mkem_mid::KG::try_encaps_c1_vt(&SEED_A);
    let c2_mid = state_mid.try_encaps_c2_vt(&ek_mid);

    let (ek_high, dk_high) = mkem_high::KG::try_keygen_vt(&SEED_A).unwrap();
    let (c1_high, state_high, _) = mkem_high::KG::try_encaps_c1_vt(&SEED_A);
    let c2_high = state_high.try_encaps_c2_vt(&ek_high);

    c.bench_function("mkem_low KeyGen", |b| b.iter(|| mkem_low::KG::try_keygen_vt(&SEED_A)));
    c.bench_function("mkem_low Encaps c1", |b| b.iter(|| mkem_low::KG::try_encaps_c1_vt(&SEED_A)));
    c.bench_function("mkem_low Encaps c2", |b| b.iter(|| state_low.try_encaps_c2_vt(&ek_low)));
    c.bench_function("mkem_low Decaps", |b| b.iter(|| dk_low.decaps_vt(&c1_low, &c2_low)));

    c.bench_function("mkem_mid KeyGen", |b| b.iter(|| mkem_mid::KG::try_keygen_vt(&SEED_A)));
    c.bench_function("mkem_mid Encaps c1", |b| b.iter(|| mkem_mid::KG::try_encaps_c1_vt(&SEED_A)));
    c.bench_function("mkem_mid Encaps c2", |b| b.iter(|| state_mid.try_encaps_c2_vt(&ek_mid)));
    c.bench_function("mkem_mid Decaps", |b| b.iter(|| dk_mid.decaps_vt(&c1_mid, &c2_mid)));

    c.bench_function("mkem_high KeyGen", |b| b.iter(|| mkem_high::KG::try_keygen_vt(&SEED_A)));
    c.bench_function("mkem_high Encaps c1", |b| b.iter(|| mkem_high::KG::try_encaps_c1_vt(&SEED_A)));
    c.bench_function("mkem_high Encaps c2", |b| b.iter(|| state_high.try_encaps_c2_vt(&ek_high)));
    c.bench_function("mkem_high Decaps", |b| b.iter(|| dk_high.decaps_vt(&c1_high, &c2_high)));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
