use criterion::{criterion_group, criterion_main, Criterion};
use search_core::{Index, IndexingProcess, Query, RawDocument, RegexTokenizer, TfIdfIndex};

fn synthetic_corpus(n: usize) -> Vec<RawDocument> {
    const WORDS: &[&str] = &["rust", "index", "query", "term", "cat", "dog", "search", "rank", "token", "file"];
    (0..n)
        .map(|i| {
            let text: Vec<&str> = (0..40).map(|j| WORDS[(i * 7 + j * 3 + j / 4) % WORDS.len()]).collect();
            RawDocument::new(i.to_string(), text.join(" "), "")
        })
        .collect()
}

fn bench_search(c: &mut Criterion) {
    let index: TfIdfIndex = IndexingProcess::new(RegexTokenizer).run(synthetic_corpus(5_000));
    let query = Query::new(vec!["rust".into(), "query".into()], 10);
    c.bench_function("search_two_terms", |b| b.iter(|| index.search(&query)));
}

fn bench_build(c: &mut Criterion) {
    let corpus = synthetic_corpus(1_000);
    let process = IndexingProcess::new(RegexTokenizer);
    c.bench_function("build_1k_docs", |b| b.iter(|| process.run::<TfIdfIndex, _>(corpus.clone())));
}

criterion_group!(benches, bench_search, bench_build);
criterion_main!(benches);
