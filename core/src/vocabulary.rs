use crate::error::{AscentError, Result};
use crate::tokenizer::term_counts;
use crate::vector::QueryVector;
use crate::TermId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Norm {
    #[default]
    L2,
    None,
}

/// Vocabulary pruning and weighting options used by [`VocabularyModel::fit`].
#[derive(Debug, Clone, PartialEq)]
pub struct FitOptions {
    /// Minimum number of documents a term must appear in.
    pub min_df: u32,
    /// Maximum fraction of documents a term may appear in.
    pub max_df: f32,
    /// Keep only this many terms, by total corpus frequency.
    pub max_features: Option<usize>,
    /// Use `1 + ln(tf)` instead of the raw count.
    pub sublinear_tf: bool,
    /// Add one to document frequencies, as if an extra document held every term.
    pub smooth_idf: bool,
    pub norm: Norm,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self { min_df: 1, max_df: 1.0, max_features: None, sublinear_tf: false, smooth_idf: true, norm: Norm::L2 }
    }
}

/// Fitted TF-IDF weighting: term indices plus one IDF weight per term.
///
/// Immutable after construction. Indices are a dense permutation of
/// `[0, vocab_size)`, checked by [`VocabularyModel::from_parts`] and on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyModel {
    term_to_index: HashMap<String, TermId>,
    idf: Vec<f32>,
    sublinear_tf: bool,
    norm: Norm,
}

impl VocabularyModel {
    /// Learn the vocabulary and IDF weights from a corpus.
    pub fn fit<'a, I>(documents: I, options: &FitOptions) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        if options.max_df <= 0.0 || options.max_df > 1.0 {
            return Err(AscentError::Configuration(format!("max_df {} outside (0, 1]", options.max_df)));
        }

        let mut num_docs = 0usize;
        let mut df: HashMap<String, u32> = HashMap::new();
        let mut total: HashMap<String, u64> = HashMap::new();
        for doc in documents {
            num_docs += 1;
            for (term, count) in term_counts(doc) {
                *total.entry(term.clone()).or_insert(0) += count as u64;
                *df.entry(term).or_insert(0) += 1;
            }
        }

        let max_doc_count = (options.max_df as f64 * num_docs as f64).floor() as u32;
        let mut kept: Vec<(String, u32)> = df
            .into_iter()
            .filter(|(_, d)| *d >= options.min_df && *d <= max_doc_count)
            .collect();

        if let Some(limit) = options.max_features {
            // most frequent first; ties by term so the cut is deterministic
            kept.sort_by(|a, b| total[&b.0].cmp(&total[&a.0]).then_with(|| a.0.cmp(&b.0)));
            kept.truncate(limit);
        }
        if kept.is_empty() {
            return Err(AscentError::Configuration(
                "empty vocabulary: no term survives the document-frequency limits".into(),
            ));
        }
        kept.sort_by(|a, b| a.0.cmp(&b.0));

        let n = num_docs as f32;
        let mut term_to_index = HashMap::with_capacity(kept.len());
        let mut idf = Vec::with_capacity(kept.len());
        for (idx, (term, d)) in kept.into_iter().enumerate() {
            let d = d as f32;
            let weight = if options.smooth_idf { ((1.0 + n) / (1.0 + d)).ln() + 1.0 } else { (n / d).ln() + 1.0 };
            idf.push(weight);
            term_to_index.insert(term, idx as TermId);
        }

        tracing::debug!(num_docs, vocab_size = idf.len(), "fitted vocabulary");
        Ok(Self { term_to_index, idf, sublinear_tf: options.sublinear_tf, norm: options.norm })
    }

    /// Assemble a model from stored parts, rejecting non-dense index maps.
    pub fn from_parts(term_to_index: HashMap<String, TermId>, idf: Vec<f32>, sublinear_tf: bool, norm: Norm) -> Result<Self> {
        let model = Self { term_to_index, idf, sublinear_tf, norm };
        model.validate()?;
        Ok(model)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.idf.len() != self.term_to_index.len() {
            return Err(AscentError::Configuration(format!(
                "vocabulary has {} terms but {} idf weights",
                self.term_to_index.len(),
                self.idf.len()
            )));
        }
        self.index_to_term().map(|_| ())
    }

    pub fn vocab_size(&self) -> usize {
        self.idf.len()
    }

    pub fn index_of(&self, term: &str) -> Option<TermId> {
        self.term_to_index.get(term).copied()
    }

    pub fn idf(&self) -> &[f32] {
        &self.idf
    }

    /// Invert `term_to_index` into a positional term table.
    pub fn index_to_term(&self) -> Result<Vec<String>> {
        let size = self.term_to_index.len();
        let mut terms: Vec<Option<&str>> = vec![None; size];
        for (term, &idx) in &self.term_to_index {
            let slot = terms.get_mut(idx as usize).ok_or_else(|| {
                AscentError::Configuration(format!("term {term:?} has index {idx} outside [0, {size})"))
            })?;
            if slot.replace(term.as_str()).is_some() {
                return Err(AscentError::Configuration(format!("index {idx} is assigned to more than one term")));
            }
        }
        // every slot is filled: size keys landed in size distinct slots
        Ok(terms.into_iter().flatten().map(str::to_owned).collect())
    }

    /// Weight raw text against the fitted vocabulary.
    ///
    /// Out-of-vocabulary terms contribute nothing; text with no known terms
    /// projects to the zero vector.
    pub fn project(&self, text: &str) -> QueryVector {
        let mut entries: Vec<(TermId, f32)> = term_counts(text)
            .into_iter()
            .filter_map(|(term, count)| {
                let idx = self.index_of(&term)?;
                let tf = if self.sublinear_tf { 1.0 + (count as f32).ln() } else { count as f32 };
                Some((idx, tf * self.idf[idx as usize]))
            })
            .collect();

        if self.norm == Norm::L2 {
            let norm = entries.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
            if norm > 0.0 {
                for (_, w) in entries.iter_mut() {
                    *w /= norm;
                }
            }
        }
        QueryVector::new(self.vocab_size(), entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fitted() -> VocabularyModel {
        let docs = ["rust systems programming", "python scripting", "rust compiler"];
        VocabularyModel::fit(docs, &FitOptions::default()).unwrap()
    }

    #[test]
    fn indices_follow_term_order() {
        let model = fitted();
        let terms = model.index_to_term().unwrap();
        let mut sorted = terms.clone();
        sorted.sort();
        assert_eq!(terms, sorted);
        assert_eq!(terms.len(), model.vocab_size());
    }

    #[test]
    fn rarer_terms_get_higher_idf() {
        let model = fitted();
        let rust = model.idf()[model.index_of("rust").unwrap() as usize];
        let python = model.idf()[model.index_of("python").unwrap() as usize];
        assert!(python > rust);
    }

    #[test]
    fn projection_is_unit_length() {
        let v = fitted().project("rust compiler rust");
        let norm: f32 = v.entries().iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn unknown_text_projects_to_zero() {
        let model = fitted();
        assert!(model.project("").is_zero());
        assert!(model.project("haskell monads").is_zero());
        assert_eq!(model.project("haskell").dim(), model.vocab_size());
    }

    #[test]
    fn from_parts_rejects_gaps() {
        let mut map = HashMap::new();
        map.insert("a".to_string(), 0);
        map.insert("b".to_string(), 2);
        let err = VocabularyModel::from_parts(map, vec![1.0, 1.0], false, Norm::L2).unwrap_err();
        assert!(matches!(err, AscentError::Configuration(_)));
    }

    #[test]
    fn from_parts_rejects_duplicates() {
        let mut map = HashMap::new();
        map.insert("a".to_string(), 1);
        map.insert("b".to_string(), 1);
        assert!(VocabularyModel::from_parts(map, vec![1.0, 1.0], false, Norm::L2).is_err());
    }

    #[test]
    fn min_df_prunes_rare_terms() {
        let docs = ["rust systems", "rust compiler"];
        let opts = FitOptions { min_df: 2, ..FitOptions::default() };
        let model = VocabularyModel::fit(docs, &opts).unwrap();
        assert_eq!(model.index_to_term().unwrap(), vec!["rust".to_string()]);
    }

    #[test]
    fn nothing_survives_is_an_error() {
        let opts = FitOptions { min_df: 5, ..FitOptions::default() };
        assert!(VocabularyModel::fit(["rust"], &opts).is_err());
    }

    #[test]
    fn max_df_below_one_document_keeps_nothing() {
        // 0.4 of 2 documents floors to 0, so even df=1 terms are too common
        let opts = FitOptions { max_df: 0.4, ..FitOptions::default() };
        let err = VocabularyModel::fit(["rust systems", "python scripts"], &opts).unwrap_err();
        assert!(matches!(err, AscentError::Configuration(_)));
    }

    #[test]
    fn max_df_prunes_common_terms() {
        let opts = FitOptions { max_df: 0.5, ..FitOptions::default() };
        let model = VocabularyModel::fit(["rust systems", "rust compiler"], &opts).unwrap();
        assert_eq!(model.vocab_size(), 2);
        let rust = crate::tokenizer::tokenize("rust");
        assert!(model.index_of(&rust[0]).is_none());
    }
}
