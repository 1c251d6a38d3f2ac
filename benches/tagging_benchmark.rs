//! Criterion benchmarks for tag detection and ranked search
//!
//! These benchmarks measure:
//! - Tag detection over short queries and full entry texts
//! - Ranking throughput as the knowledge base grows

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use licita_kb::knowledge::demo_entries;
use licita_kb::models::Entry;
use licita_kb::search::search;
use licita_kb::tagging::{detect_entry_tags, detect_tags};

const QUERIES: &[&str] = &[
    "pregão",
    "dispensa eletrônica para obras",
    "recurso contra inabilitação no pregão art. 165",
    "prazo de 3 dias úteis para impugnação do edital",
];

/// Entries cycling over a few realistic texts so the corpus is not uniform
fn corpus(size: usize) -> Vec<Entry> {
    let seeds = demo_entries("Capivari");
    (0..size)
        .map(|i| {
            let seed = &seeds[i % seeds.len()];
            let mut entry = Entry::new(
                format!("{} ({})", seed.title, i),
                seed.question.clone(),
                seed.answer.clone(),
                seed.author.clone(),
                seed.campus.clone(),
            );
            entry.id = i as u64 + 1;
            entry
        })
        .collect()
}

fn bench_detect_tags(c: &mut Criterion) {
    let mut group = c.benchmark_group("detect_tags");

    for query in QUERIES {
        group.bench_with_input(BenchmarkId::new("query", query.len()), query, |b, q| {
            b.iter(|| detect_tags(black_box(q)));
        });
    }

    for (i, entry) in demo_entries("Capivari").iter().enumerate() {
        let bytes = entry.title.len() + entry.question.len() + entry.answer.len();
        group.throughput(Throughput::Bytes(bytes as u64));
        group.bench_with_input(BenchmarkId::new("entry", i), entry, |b, e| {
            b.iter(|| detect_entry_tags(black_box(&e.title), &e.question, &e.answer));
        });
    }

    group.finish();
}

fn bench_ranked_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("ranked_search");

    for size in [10usize, 100, 1_000] {
        let entries = corpus(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &entries, |b, entries| {
            b.iter(|| search(black_box(QUERIES[2]), entries));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_detect_tags, bench_ranked_search);
criterion_main!(benches);
