use ascent_core::config::RankingConfig;
use ascent_core::{CorpusMatrix, CorpusStore, DocRecord, FitOptions, SearchEngine, VocabularyModel};
use criterion::{criterion_group, criterion_main, Criterion};
use std::collections::HashMap;

fn synthetic_engine(num_docs: usize) -> SearchEngine {
    let words = ["river", "mountain", "city", "forest", "engine", "harbor", "desert", "castle", "orbit", "garden"];
    let texts: Vec<String> = (0..num_docs)
        .map(|i| (0..12).map(|j| format!("{}{}", words[(i * 7 + j * 3) % words.len()], (i + j) % 97)).collect::<Vec<_>>().join(" "))
        .collect();
    let model = VocabularyModel::fit(texts.iter().map(String::as_str), &FitOptions::default()).expect("fit");
    let mut matrix = CorpusMatrix::new(model.vocab_size());
    let mut docs = HashMap::new();
    for (i, text) in texts.iter().enumerate() {
        matrix.push_row(i as u32, &model.project(text)).expect("row");
        docs.insert(i as u32, DocRecord {
            external_id: i.to_string(),
            title: format!("doc {i}"),
            content: text.clone(),
            readability_score: (i % 100) as f32,
            url: None,
        });
    }
    let corpus = CorpusStore::new(matrix, docs).expect("corpus");
    SearchEngine::new(model, corpus, RankingConfig::default()).expect("engine")
}

fn bench_window(c: &mut Criterion) {
    let engine = synthetic_engine(5_000);
    c.bench_function("window_5k_docs", |b| b.iter(|| engine.window("river12 castle40 orbit7")));
}

criterion_group!(benches, bench_window);
criterion_main!(benches);
