// ABOUTME: Benchmark suite for the SMS PDU codec hot paths
// ABOUTME: Measures septet packing/unpacking and full encode/decode across message sizes

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use tc35::pdu::{alphabet, decode_sms_deliver, encode_sms_submit, septets};

const DELIVER_GSM7: &str =
    "07913306000000F0040B913306010203F40000423070415003400AE8329BFD4697D9EC37";

fn bench_septet_packing(c: &mut Criterion) {
    let text = "The quick brown fox jumps over the lazy dog".repeat(3);
    let unpacked = alphabet::to_septets(&text).unwrap();
    let packed = septets::pack_septets(&unpacked, 0);

    c.bench_function("pack_septets_129", |b| {
        b.iter(|| septets::pack_septets(black_box(&unpacked), 0))
    });
    c.bench_function("unpack_septets_129", |b| {
        b.iter(|| septets::unpack_septets(black_box(&packed), unpacked.len(), 0))
    });
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_sms_submit");
    for (label, len) in [("single", 100), ("two_parts", 300), ("five_parts", 750)] {
        let text = "a".repeat(len);
        group.bench_with_input(BenchmarkId::from_parameter(label), &text, |b, text| {
            b.iter(|| encode_sms_submit(black_box("+33601020304"), black_box(text), 0x2A))
        });
    }
    group.finish();
}

fn bench_encode_ucs2(c: &mut Criterion) {
    let text = "Привет мир ".repeat(10);
    c.bench_function("encode_sms_submit_ucs2", |b| {
        b.iter(|| encode_sms_submit(black_box("+33601020304"), black_box(&text), 0x2A))
    });
}

fn bench_decode(c: &mut Criterion) {
    c.bench_function("decode_sms_deliver", |b| {
        b.iter(|| decode_sms_deliver(black_box(DELIVER_GSM7)))
    });
}

criterion_group!(
    benches,
    bench_septet_packing,
    bench_encode,
    bench_encode_ucs2,
    bench_decode
);
criterion_main!(benches);
