//! Performance benchmarks for vcf2exac
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use vcf2exac::core::{CandidateSet, RecordPolicy, Resolver};
use vcf2exac::formats::vcf::{assemble_row, read_variant_rows_from};

const SNP_LINE: &str = "14\t21853913\t.\tT\tC\t1503.2\t.\tAB=0;AC=4;AF=0.02;DP=100;TYPE=snp\tGT:DP:RO:QR:AO:QA\t0/0:100:100:3700:0:0\t0/1:100:82:3000:18:650";
const MULTI_LINE: &str = "2\t500\t.\tACGTT\tA\t88.1\t.\tAB=0;AC=5,3,3;AF=0.1,0.05,0.05;DP=60;TYPE=snp,del,ins\tGT:DP:RO:QR:AO:QA\t0/0:60:60:2000:0,0,0:0,0,0\t0/1:60:30:1100:12,9,9:400,300,300";

/// Benchmark resolution of a tied del/ins candidate set
fn bench_resolve(c: &mut Criterion) {
    let candidates = CandidateSet::parse("snp,del,ins", "5,3,3", "0.1,0.05,0.05").unwrap();
    let mut resolver = Resolver::seeded(42);

    c.bench_function("resolve_tied_del_ins", |b| {
        b.iter(|| black_box(resolver.resolve(black_box(&candidates)).unwrap()))
    });
}

/// Benchmark single-line assembly
fn bench_assemble(c: &mut Criterion) {
    let mut resolver = Resolver::seeded(42);
    let mut group = c.benchmark_group("assemble_row");

    for (name, line) in [("single_type", SNP_LINE), ("multi_type", MULTI_LINE)] {
        group.bench_with_input(BenchmarkId::from_parameter(name), line, |b, line| {
            b.iter(|| black_box(assemble_row(black_box(line), &mut resolver).unwrap()))
        });
    }

    group.finish();
}

/// Benchmark reading a batch of records from memory
fn bench_read_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_variant_rows");

    for size in [100, 1000, 10000] {
        let input: String = (0..size)
            .map(|i| if i % 4 == 0 { MULTI_LINE } else { SNP_LINE })
            .collect::<Vec<_>>()
            .join("\n");

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &input, |b, input| {
            let mut resolver = Resolver::seeded(42);
            b.iter(|| {
                let batch =
                    read_variant_rows_from(input.as_bytes(), &mut resolver, RecordPolicy::FailFast)
                        .unwrap();
                black_box(batch)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_resolve, bench_assemble, bench_read_rows);
criterion_main!(benches);
