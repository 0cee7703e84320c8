use confile::{decode_binary, encode_binary, parse_text, print_text, to_value, ConOptions, Value};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde::Serialize;

#[derive(Serialize, Clone)]
struct Product {
    sku: String,
    name: String,
    price: f64,
    quantity: u32,
}

fn products(size: u32) -> Value {
    let products: Vec<Product> = (0..size)
        .map(|i| Product {
            sku: format!("SKU{}", i),
            name: format!("Product {}", i),
            price: 9.99 + f64::from(i),
            quantity: i,
        })
        .collect();
    to_value(&products).unwrap()
}

fn benchmark_encode_binary(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_binary");
    let options = ConOptions::default();

    for size in [10, 100, 1000].iter() {
        let value = products(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &value, |b, value| {
            b.iter(|| encode_binary(black_box(value), &options))
        });
    }
    group.finish();
}

fn benchmark_encode_binary_uncompressed(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_binary_uncompressed");
    let options = ConOptions::new().without_compression();

    for size in [10, 100, 1000].iter() {
        let value = products(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &value, |b, value| {
            b.iter(|| encode_binary(black_box(value), &options))
        });
    }
    group.finish();
}

fn benchmark_decode_binary(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_binary");

    for size in [10, 100, 1000].iter() {
        let bytes = encode_binary(&products(*size), &ConOptions::default()).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &bytes, |b, bytes| {
            b.iter(|| decode_binary(black_box(bytes)))
        });
    }
    group.finish();
}

fn benchmark_text(c: &mut Criterion) {
    let value = products(100);
    let text = print_text(&value);

    c.bench_function("print_text_100", |b| {
        b.iter(|| print_text(black_box(&value)))
    });
    c.bench_function("parse_text_100", |b| {
        b.iter(|| parse_text(black_box(&text)))
    });
}

fn benchmark_comparison_with_json(c: &mut Criterion) {
    let mut group = c.benchmark_group("con_vs_json");
    let value = products(100);
    let json: serde_json::Value = serde_json::from_str(&print_text(&value)).unwrap();

    group.bench_function("con_binary", |b| {
        b.iter(|| encode_binary(black_box(&value), &ConOptions::default()))
    });
    group.bench_function("json", |b| b.iter(|| serde_json::to_vec(black_box(&json))));
    group.finish();
}

criterion_group!(
    benches,
    benchmark_encode_binary,
    benchmark_encode_binary_uncompressed,
    benchmark_decode_binary,
    benchmark_text,
    benchmark_comparison_with_json
);
criterion_main!(benches);
