use criterion::{criterion_group, criterion_main, Criterion};

use bike_kem::traits::{Decaps, Encaps, KeyGen};
use bike_kem::{bike_l1, bike_l3, bike_l5};

#[allow(clippy::redundant_closure)]
pub fn criterion_benchmark(c: &mut Criterion) {
    let (ek_l1, dk_l1) = bike_l1::KG::try_keygen().unwrap();
    let (_, ct_l1) = ek_l1.try_encaps().unwrap();
    let (ek_l3, dk_l3) = bike_l3::KG::try_keygen().unwrap();
    let (_, ct_l3) = ek_l3.try_encaps().unwrap();
    let (ek_l5, dk_l5) = bike_l5::KG::try_keygen().unwrap();
    let (_, ct_l5) = ek_l5.try_encaps().unwrap();

    c.bench_function("bike_l1 KeyGen", |b| b.iter(|| bike_l1::KG::try_keygen()));
    c.bench_function("bike_l1 Encaps", |b| b.iter(|| ek_l1.try_encaps()));
    c.bench_function("bike_l1 Decaps", |b| b.iter(|| dk_l1.try_decaps(&ct_l1)));

    c.bench_function("bike_l3 KeyGen", |b| b.iter(|| bike_l3::KG::try_keygen()));
    c.bench_function("bike_l3 Encaps", |b| b.iter(|| ek_l3.try_encaps()));
    c.bench_function("bike_l3 Decaps", |b| b.iter(|| dk_l3.try_decaps(&ct_l3)));

    c.bench_function("bike_l5 KeyGen", |b| b.iter(|| bike_l5::KG::try_keygen()));
    c.bench_function("bike_l5 Encaps", |b| b.iter(|| ek_l5.try_encaps()));
    c.bench_function("bike_l5 Decaps", |b| b.iter(|| dk_l5.try_decaps(&ct_l5)));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
