mod common;

use ascent_core::{AscentError, CorpusMatrix, CorpusStore, FeatureSelector, QueryVector, SimilarityRanker};
use common::{large_corpus, record, small_corpus};
use std::collections::HashMap;

#[test]
fn returns_top_n_or_whole_corpus() {
    let (model, corpus) = small_corpus();
    let ranker = SimilarityRanker::new(&model, &corpus).unwrap();
    assert_eq!(ranker.rank_documents("rust compiler", 20, 3).unwrap().len(), 3);
    assert_eq!(ranker.rank_documents("rust compiler", 20, 10).unwrap().len(), corpus.len());
}

#[test]
fn distances_never_decrease() {
    let (model, corpus) = large_corpus(60);
    let ranker = SimilarityRanker::new(&model, &corpus).unwrap();
    for query in ["river boat", "city train forest", "nothing in vocabulary", ""] {
        let ranked = ranker.rank_documents(query, 20, 60).unwrap();
        assert!(ranked.windows(2).all(|w| w[0].distance <= w[1].distance), "query {query:?}");
    }
}

#[test]
fn shared_terms_rank_first() {
    let (model, corpus) = small_corpus();
    let ranker = SimilarityRanker::new(&model, &corpus).unwrap();
    let ranked = ranker.rank_documents("rust compiler", 2, 5).unwrap();
    let mut top: Vec<u32> = ranked[..2].iter().map(|r| r.doc_id).collect();
    top.sort();
    assert_eq!(top, vec![0, 2]);
}

#[test]
fn repeated_queries_are_identical() {
    let (model, corpus) = large_corpus(55);
    let ranker = SimilarityRanker::new(&model, &corpus).unwrap();
    let first = ranker.rank_documents("mountain fish", 20, 55).unwrap();
    for _ in 0..5 {
        assert_eq!(ranker.rank_documents("mountain fish", 20, 55).unwrap(), first);
    }
}

#[test]
fn empty_query_ranks_by_row_norm() {
    let (model, corpus) = small_corpus();
    let ranker = SimilarityRanker::new(&model, &corpus).unwrap();
    let ranked = ranker.rank_documents("", 4, 5).unwrap();
    assert_eq!(ranked.len(), 5);

    // a zero query selects columns 0..4 in index order
    let matrix = corpus.matrix();
    for r in &ranked {
        let row = matrix.row_ids().iter().position(|&id| id == r.doc_id).unwrap();
        let norm = (0..4).map(|c| matrix.value(row, c).powi(2)).sum::<f32>().sqrt();
        assert!((norm - r.distance).abs() < 1e-6);
    }
}

#[test]
fn oversized_feature_width_matches_full_vocabulary() {
    let (model, corpus) = small_corpus();
    let ranker = SimilarityRanker::new(&model, &corpus).unwrap();
    let full = ranker.rank_documents("bread and water", model.vocab_size(), 5).unwrap();
    let oversized = ranker.rank_documents("bread and water", model.vocab_size() + 100, 5).unwrap();
    assert_eq!(full, oversized);
}

#[test]
fn ties_keep_corpus_order() {
    let mut matrix = CorpusMatrix::new(2);
    let mut docs = HashMap::new();
    for id in [4, 1, 3] {
        matrix.push_row(id, &QueryVector::new(2, vec![(0, 0.5)])).unwrap();
        docs.insert(id, record(id, "same", "same", 1.0));
    }
    let (model, _) = small_corpus();
    let corpus = CorpusStore::new(matrix, docs).unwrap();
    let err = SimilarityRanker::new(&model, &corpus).unwrap_err();
    assert!(matches!(err, AscentError::DimensionMismatch { .. }));

    let (model2, _) = common::build(&[("a", "alpha", 1.0), ("b", "beta", 1.0)]);
    let ranker = SimilarityRanker::new(&model2, &corpus).unwrap();
    let ids: Vec<u32> = ranker.rank_documents("alpha", 2, 3).unwrap().iter().map(|r| r.doc_id).collect();
    assert_eq!(ids, vec![4, 1, 3]);
}

#[test]
fn feature_ranking_is_a_permutation() {
    let (model, _) = small_corpus();
    let query = model.project("rust rust python garden");
    let ranking = FeatureSelector::new(20).rank(&query);
    let mut seen = ranking.indices().to_vec();
    seen.sort();
    assert_eq!(seen, (0..model.vocab_size()).collect::<Vec<_>>());

    let dense = query.to_dense();
    for pair in ranking.indices().windows(2) {
        let (a, b) = (pair[0], pair[1]);
        assert!(dense[a] > dense[b] || (dense[a] == dense[b] && a < b));
    }
}
