use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tempfile::TempDir;

use plagdex::index::IndexBuilder;
use plagdex::models::Document;
use plagdex::SearchEngine;

struct BenchEnv {
    _tmp: TempDir,
    engine: SearchEngine,
}

fn doc_text(id: usize, tokens: usize) -> String {
    (0..tokens)
        .map(|i| format!("term{}", (id * 7 + i * 13) % 5000))
        .collect::<Vec<_>>()
        .join(" ")
}

fn build_env(doc_count: usize) -> BenchEnv {
    let tmp = TempDir::new().unwrap();
    let mut builder = IndexBuilder::new();
    for i in 0..doc_count {
        builder.add_document(&Document::new(format!("doc-{i}"), doc_text(i, 120)));
    }
    builder.finish(tmp.path()).unwrap();

    let engine = SearchEngine::new();
    engine.load_index(tmp.path()).unwrap();

    BenchEnv { _tmp: tmp, engine }
}

fn bench_search(c: &mut Criterion) {
    let counts = [1_000usize, 5_000, 10_000];
    let mut envs: Vec<(usize, BenchEnv)> = Vec::new();
    for &count in &counts {
        envs.push((count, build_env(count)));
    }

    let query = doc_text(42, 60);

    let mut group = c.benchmark_group("search_text");
    for (count, env) in envs.iter() {
        group.bench_with_input(BenchmarkId::from_parameter(count), env, |b, env| {
            b.iter(|| {
                black_box(env.engine.search_text(&query, 10).unwrap());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_search);
criterion_main!(benches);
