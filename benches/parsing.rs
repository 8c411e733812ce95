use std::fs;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rust_vcf::{Header, Reader};

const PATH: &str = "resources/example.vcf";

fn benchmark_header(c: &mut Criterion) {
    let text = fs::read_to_string(PATH).unwrap();
    c.bench_with_input(BenchmarkId::new("HEADER", PATH), &text, |b, text| {
        b.iter(|| black_box(text.parse::<Header>().unwrap()))
    });
}

fn benchmark_records(c: &mut Criterion) {
    let text = fs::read_to_string(PATH).unwrap();
    c.bench_with_input(BenchmarkId::new("RECORDS", PATH), &text, |b, text| {
        b.iter(|| {
            let mut reader = Reader::new(text.as_bytes()).unwrap();
            black_box(reader.read_all_records().0)
        })
    });
}

fn benchmark_genotypes(c: &mut Criterion) {
    let text = fs::read_to_string(PATH).unwrap();
    let mut group = c.benchmark_group("GENOTYPES");
    group.bench_with_input(BenchmarkId::new("FIRST", PATH), &text, |b, text| {
        b.iter(|| {
            let mut reader = Reader::new(text.as_bytes()).unwrap();
            let (records, _) = reader.read_all_records();
            let samples = reader.header().samples();
            for record in &records {
                black_box(record.decode_genotype("NA00001", samples).unwrap());
            }
        })
    });
    group.bench_with_input(BenchmarkId::new("ALL", PATH), &text, |b, text| {
        b.iter(|| {
            let mut reader = Reader::new(text.as_bytes()).unwrap();
            let (records, _) = reader.read_all_records();
            let samples = reader.header().samples();
            for record in &records {
                black_box(record.decode_all_genotypes(samples));
            }
        })
    });
    group.finish();
}

criterion_group!(benches, benchmark_header, benchmark_records, benchmark_genotypes);
criterion_main!(benches);
