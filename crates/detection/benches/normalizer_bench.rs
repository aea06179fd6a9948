//! 정규화 벤치마크
//!
//! JSON / 텍스트 본문의 정규화 처리량을 측정합니다.

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use socshield_core::types::RawLog;
use socshield_detection::normalizer::LogNormalizer;

fn bench_text_normalize(c: &mut Criterion) {
    let normalizer = LogNormalizer::default();
    let raw = RawLog::new("2024-01-15T12:00:00Z FAILED_LOGIN src=10.0.0.5 dst=10.0.0.1 user=root port=22");

    let mut group = c.benchmark_group("normalize_text");
    group.throughput(Throughput::Bytes(raw.raw_log.len() as u64));

    group.bench_function("key_value_line", |b| {
        b.iter(|| normalizer.normalize(black_box(&raw)).unwrap())
    });

    group.finish();
}

fn bench_json_normalize(c: &mut Criterion) {
    let normalizer = LogNormalizer::default();
    let raw = RawLog::new(
        r#"{"timestamp":"2024-01-15T12:00:00Z","event":"FAILED_LOGIN","src":"10.0.0.5","dst":"10.0.0.1","user":"root","meta":{"region":"us-east","zone":"a"}}"#,
    );

    let mut group = c.benchmark_group("normalize_json");
    group.throughput(Throughput::Bytes(raw.raw_log.len() as u64));

    group.bench_function("nested_object", |b| {
        b.iter(|| normalizer.normalize(black_box(&raw)).unwrap())
    });

    group.finish();
}

fn bench_plain_text_normalize(c: &mut Criterion) {
    let normalizer = LogNormalizer::default();
    let raw = RawLog::new("user successfully completed checkout flow without incident");

    let mut group = c.benchmark_group("normalize_plain");
    group.throughput(Throughput::Bytes(raw.raw_log.len() as u64));

    group.bench_function("prose_line", |b| {
        b.iter(|| normalizer.normalize(black_box(&raw)).unwrap())
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_text_normalize,
    bench_json_normalize,
    bench_plain_text_normalize
);
criterion_main!(benches);
