#![allow(dead_code)]

use ascent_core::{CorpusMatrix, CorpusStore, DocId, DocRecord, FitOptions, VocabularyModel};
use std::collections::HashMap;

pub const ARTICLES: &[(&str, &str, f32)] = &[
    ("Rust", "Rust ownership and borrowing let the compiler enforce memory safety.", 40.0),
    ("Python", "Python is an interpreted scripting language with dynamic typing.", 70.0),
    ("Compilers", "A compiler runs a lexer and a parser, then optimization passes. Rust has one.", 30.0),
    ("Gardening", "Garden soil, plants, water and sunlight.", 80.0),
    ("Baking", "Bake bread in the kitchen oven following a recipe.", 60.0),
];

pub fn record(id: DocId, title: &str, content: &str, score: f32) -> DocRecord {
    DocRecord {
        external_id: format!("doc-{id}"),
        title: title.to_string(),
        content: content.to_string(),
        readability_score: score,
        url: None,
    }
}

/// Fit a vocabulary over `articles` and vectorize them as rows `0..n`.
pub fn build(articles: &[(&str, &str, f32)]) -> (VocabularyModel, CorpusStore) {
    let model = VocabularyModel::fit(articles.iter().map(|a| a.1), &FitOptions::default()).unwrap();
    let mut matrix = CorpusMatrix::new(model.vocab_size());
    let mut docs = HashMap::new();
    for (i, (title, content, score)) in articles.iter().enumerate() {
        let id = i as DocId;
        matrix.push_row(id, &model.project(content)).unwrap();
        docs.insert(id, record(id, title, content, *score));
    }
    (model, CorpusStore::new(matrix, docs).unwrap())
}

pub fn small_corpus() -> (VocabularyModel, CorpusStore) {
    build(ARTICLES)
}

/// Fifty-plus synthetic articles over a handful of shared topics, each with
/// a distinct readability score.
pub fn large_corpus(n: usize) -> (VocabularyModel, CorpusStore) {
    let topics = ["river boat", "mountain climb", "river fish", "city train", "forest hike"];
    let owned: Vec<(String, String, f32)> = (0..n)
        .map(|i| {
            let content = format!("{} story{} {}", topics[i % topics.len()], i, topics[(i + 1) % topics.len()]);
            (format!("Article {i}"), content, (i as f32 * 7.0) % 101.0 + i as f32 * 0.001)
        })
        .collect();
    let borrowed: Vec<(&str, &str, f32)> = owned.iter().map(|(t, c, s)| (t.as_str(), c.as_str(), *s)).collect();
    build(&borrowed)
}
