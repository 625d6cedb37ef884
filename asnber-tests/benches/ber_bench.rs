use asnber_tests::{certificate_like, version_mapper};
use asnber_transcoder::ber::{Ber, BerDecoder};
use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn certificate() -> asnber_grammar::Asn1Value {
    certificate_like(
        Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2053, 1, 1, 0, 0, 0).unwrap(),
    )
}

fn decode_certificate(c: &mut Criterion) {
    let encoded = Ber::encode(&certificate()).unwrap();

    c.bench_with_input(BenchmarkId::new("Decode certificate", ""), &encoded, |b, i| {
        b.iter(|| Ber::decode(black_box(i)).unwrap());
    });

    let mapped = BerDecoder::new().with_mapper(2, version_mapper);
    c.bench_with_input(
        BenchmarkId::new("Decode certificate with mapper", ""),
        &encoded,
        |b, i| {
            b.iter(|| mapped.decode(black_box(i)).unwrap());
        },
    );
}

fn encode_certificate(c: &mut Criterion) {
    let value = certificate();

    c.bench_with_input(BenchmarkId::new("Encode certificate", ""), &value, |b, v| {
        b.iter(|| Ber::encode(black_box(v)).unwrap());
    });
}

criterion_group!(benches, decode_certificate, encode_certificate);
criterion_main!(benches);
