use crate::config::RankingConfig;
use crate::corpus::CorpusStore;
use crate::curator::{ResultCurator, SingleBest, WindowRow};
use crate::error::{AscentError, Result};
use crate::features::FeatureSelector;
use crate::persist::{load_artifacts, ArtifactPaths};
use crate::ranker::{RankedDocument, SimilarityRanker};
use crate::vocabulary::VocabularyModel;
use crate::{DocId, DocRecord};

/// Read-only query state shared by every request.
///
/// Construction checks the corpus against the vocabulary and the ranking
/// settings, so queries never discover a broken setup midway.
#[derive(Debug)]
pub struct SearchEngine {
    vocabulary: VocabularyModel,
    corpus: CorpusStore,
    config: RankingConfig,
    terms: Vec<String>,
}

impl SearchEngine {
    pub fn new(vocabulary: VocabularyModel, corpus: CorpusStore, config: RankingConfig) -> Result<Self> {
        config.validate()?;
        if corpus.is_empty() {
            return Err(AscentError::EmptyCorpus);
        }
        corpus.check_dimensions(vocabulary.vocab_size())?;
        let terms = vocabulary.index_to_term()?;
        Ok(Self { vocabulary, corpus, config, terms })
    }

    pub fn from_artifacts(paths: &ArtifactPaths, config: RankingConfig) -> Result<Self> {
        let (vocabulary, corpus, _manifest) = load_artifacts(paths)?;
        Self::new(vocabulary, corpus, config)
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    pub fn vocabulary(&self) -> &VocabularyModel {
        &self.vocabulary
    }

    pub fn corpus(&self) -> &CorpusStore {
        &self.corpus
    }

    pub fn document(&self, id: DocId) -> Option<&DocRecord> {
        self.corpus.document(id)
    }

    fn ranker(&self) -> Result<SimilarityRanker<'_>> {
        SimilarityRanker::new(&self.vocabulary, &self.corpus)
    }

    /// Nearest `top_n` documents using the configured feature width.
    pub fn rank(&self, text: &str, top_n: usize) -> Result<Vec<RankedDocument>> {
        self.ranker()?.rank_documents(text, self.config.k_features, top_n)
    }

    /// The single nearest document, with the readability-sorted pool it was
    /// drawn from.
    pub fn nearest(&self, text: &str) -> Result<SingleBest> {
        let ranked = self.rank(text, self.config.single_best_pool)?;
        ResultCurator::new(&self.corpus)
            .single_best(&ranked, self.config.single_best_pool)
            .ok_or(AscentError::EmptyCorpus)
    }

    /// The readability-ordered display list with its visibility window.
    pub fn window(&self, text: &str) -> Result<Vec<WindowRow>> {
        let cfg = &self.config;
        let ranked = self.rank(text, cfg.window_pool)?;
        Ok(ResultCurator::new(&self.corpus).window(&ranked, cfg.window_pool, cfg.window_start, cfg.window_end))
    }

    /// Vocabulary terms the query is compared on, strongest first. Selected
    /// columns the query does not contain are left out.
    pub fn query_terms(&self, text: &str) -> Result<Vec<(String, f32)>> {
        let query = self.vocabulary.project(text);
        let selector = FeatureSelector::new(self.config.k_features);
        let ranking = selector.rank(&query);
        Ok(selector
            .select_top_k(&ranking)?
            .iter()
            .map(|&idx| (idx, query.get(idx)))
            .filter(|&(_, w)| w != 0.0)
            .map(|(idx, w)| (self.terms[idx].clone(), w))
            .collect())
    }
}
