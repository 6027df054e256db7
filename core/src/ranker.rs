use crate::corpus::CorpusStore;
use crate::error::{AscentError, Result};
use crate::features::FeatureSelector;
use crate::vector::{euclidean, QueryVector};
use crate::vocabulary::VocabularyModel;
use crate::DocId;
use serde::Serialize;

/// A corpus document with its distance to the query in the reduced space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankedDocument {
    pub doc_id: DocId,
    pub distance: f32,
}

/// Orders corpus documents by Euclidean distance to a query, measured only
/// over the query's own top-weighted vocabulary columns.
#[derive(Debug, Clone, Copy)]
pub struct SimilarityRanker<'a> {
    vocabulary: &'a VocabularyModel,
    corpus: &'a CorpusStore,
}

impl<'a> SimilarityRanker<'a> {
    pub fn new(vocabulary: &'a VocabularyModel, corpus: &'a CorpusStore) -> Result<Self> {
        if corpus.is_empty() {
            return Err(AscentError::EmptyCorpus);
        }
        corpus.check_dimensions(vocabulary.vocab_size())?;
        Ok(Self { vocabulary, corpus })
    }

    /// Nearest `top_n` documents to `query_text`, closest first.
    ///
    /// A query sharing no terms with the vocabulary is still ranked: every
    /// distance is then the row norm over the selected columns.
    pub fn rank_documents(&self, query_text: &str, k_features: usize, top_n: usize) -> Result<Vec<RankedDocument>> {
        let query = self.vocabulary.project(query_text);
        self.rank_vector(&query, k_features, top_n)
    }

    pub fn rank_vector(&self, query: &QueryVector, k_features: usize, top_n: usize) -> Result<Vec<RankedDocument>> {
        let matrix = self.corpus.matrix();
        if query.dim() != matrix.n_cols() {
            return Err(AscentError::DimensionMismatch { expected: matrix.n_cols(), actual: query.dim() });
        }

        let selector = FeatureSelector::new(k_features);
        let ranking = selector.rank(query);
        let columns = selector.select_top_k(&ranking)?;
        let reduced_query = selector.restrict_vector(query, columns);
        let reduced_corpus = selector.restrict_matrix(matrix, columns);

        let mut ranked: Vec<RankedDocument> = reduced_corpus
            .rows()
            .enumerate()
            .map(|(row, values)| RankedDocument { doc_id: matrix.row_id(row), distance: euclidean(&reduced_query, values) })
            .collect();
        // stable: equal distances keep corpus row order
        ranked.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        ranked.truncate(top_n);

        tracing::trace!(columns = columns.len(), returned = ranked.len(), zero_query = query.is_zero(), "ranked corpus");
        Ok(ranked)
    }
}
