use serde::{Deserialize, Serialize};

pub mod cache;
pub mod config;
pub mod corpus;
pub mod curator;
pub mod engine;
pub mod error;
pub mod features;
pub mod persist;
pub mod ranker;
pub mod readability;
pub mod tokenizer;
pub mod vector;
pub mod vocabulary;

pub use corpus::{CorpusMatrix, CorpusStore};
pub use curator::{ResultCurator, SingleBest, WindowRow};
pub use engine::SearchEngine;
pub use error::{AscentError, Result};
pub use features::{FeatureRanking, FeatureSelector};
pub use ranker::{RankedDocument, SimilarityRanker};
pub use vector::QueryVector;
pub use vocabulary::{FitOptions, Norm, VocabularyModel};

pub type TermId = u32;
pub type DocId = u32;

/// Metadata stored for each corpus document, keyed by [`DocId`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocRecord {
    pub external_id: String,
    pub title: String,
    pub content: String,
    pub readability_score: f32,
    pub url: Option<String>,
}
