use criterion::{black_box, criterion_group, criterion_main, Criterion};
use phrasebook_core::{Dataset, Normalizer, SearchEngine, SearchOptions};

fn bench_normalize(c: &mut Criterion) {
    let normalizer = Normalizer::default();
    let text = "Hei! Hvordan har du det? Сколько это стоит, и где автобус?";
    c.bench_function("normalize_query", |b| b.iter(|| normalizer.tokenize(black_box(text))));
}

fn bench_search(c: &mut Criterion) {
    let dataset = Dataset::builtin();
    let engine = SearchEngine::new(dataset.records);
    let options = SearchOptions::default();
    let queries = ["привет", "hvor mye koster det", "кофе", "xyz123"];

    c.bench_function("search_builtin", |b| {
        b.iter(|| {
            for q in queries {
                black_box(engine.search(black_box(q), &options));
            }
        })
    });
}

criterion_group!(benches, bench_normalize, bench_search);
criterion_main!(benches);
