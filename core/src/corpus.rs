use crate::error::{AscentError, Result};
use crate::vector::QueryVector;
use crate::{DocId, DocRecord, TermId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Precomputed document vectors in compressed sparse row form.
///
/// Row `r` holds the non-zero columns `indices[indptr[r]..indptr[r + 1]]`,
/// sorted ascending, and belongs to document `row_ids[r]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusMatrix {
    n_cols: usize,
    row_ids: Vec<DocId>,
    indptr: Vec<usize>,
    indices: Vec<TermId>,
    data: Vec<f32>,
}

impl CorpusMatrix {
    pub fn new(n_cols: usize) -> Self {
        Self { n_cols, row_ids: Vec::new(), indptr: vec![0], indices: Vec::new(), data: Vec::new() }
    }

    /// Append one document's vector as the next row.
    pub fn push_row(&mut self, doc_id: DocId, vector: &QueryVector) -> Result<()> {
        if vector.dim() != self.n_cols {
            return Err(AscentError::DimensionMismatch { expected: self.n_cols, actual: vector.dim() });
        }
        for &(idx, w) in vector.entries() {
            self.indices.push(idx);
            self.data.push(w);
        }
        self.row_ids.push(doc_id);
        self.indptr.push(self.indices.len());
        Ok(())
    }

    pub fn n_rows(&self) -> usize {
        self.row_ids.len()
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    pub fn row_ids(&self) -> &[DocId] {
        &self.row_ids
    }

    pub fn row_id(&self, row: usize) -> DocId {
        self.row_ids[row]
    }

    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    /// Value at `(row, col)`; absent entries are zero.
    pub fn value(&self, row: usize, col: usize) -> f32 {
        let (start, end) = (self.indptr[row], self.indptr[row + 1]);
        self.indices[start..end]
            .binary_search(&(col as TermId))
            .map(|pos| self.data[start + pos])
            .unwrap_or(0.0)
    }

    /// Check the CSR layout of a decoded matrix.
    pub(crate) fn validate(&self) -> std::result::Result<(), String> {
        if self.indptr.len() != self.row_ids.len() + 1 || self.indptr.first() != Some(&0) {
            return Err(format!("row pointer length {} for {} rows", self.indptr.len(), self.row_ids.len()));
        }
        if self.indices.len() != self.data.len() || self.indptr.last() != Some(&self.indices.len()) {
            return Err("column index and value arrays disagree".into());
        }
        for row in 0..self.n_rows() {
            let (start, end) = (self.indptr[row], self.indptr[row + 1]);
            if start > end || end > self.indices.len() {
                return Err(format!("row {row} has an invalid row pointer"));
            }
            let cols = &self.indices[start..end];
            if cols.windows(2).any(|w| w[0] >= w[1]) || cols.iter().any(|&c| c as usize >= self.n_cols) {
                return Err(format!("row {row} has unsorted or out-of-range columns"));
            }
        }
        Ok(())
    }
}

/// The corpus matrix joined with its document metadata by [`DocId`].
#[derive(Debug, Clone)]
pub struct CorpusStore {
    matrix: CorpusMatrix,
    docs: HashMap<DocId, DocRecord>,
}

impl CorpusStore {
    /// Join a matrix with its metadata. Every row id must have exactly one
    /// record and no record may be left without a row.
    pub fn new(matrix: CorpusMatrix, docs: HashMap<DocId, DocRecord>) -> Result<Self> {
        if matrix.n_rows() == 0 {
            return Err(AscentError::EmptyCorpus);
        }
        if matrix.n_rows() != docs.len() {
            return Err(AscentError::Configuration(format!(
                "corpus matrix has {} rows but metadata has {} documents",
                matrix.n_rows(),
                docs.len()
            )));
        }
        let mut seen = HashSet::with_capacity(matrix.n_rows());
        for &id in matrix.row_ids() {
            if !seen.insert(id) {
                return Err(AscentError::Configuration(format!("document {id} appears in more than one row")));
            }
            if !docs.contains_key(&id) {
                return Err(AscentError::Configuration(format!("document {id} has a vector but no metadata")));
            }
        }
        Ok(Self { matrix, docs })
    }

    /// Fail unless the matrix has one column per vocabulary term.
    pub fn check_dimensions(&self, vocab_size: usize) -> Result<()> {
        if self.matrix.n_cols() != vocab_size {
            return Err(AscentError::DimensionMismatch { expected: vocab_size, actual: self.matrix.n_cols() });
        }
        Ok(())
    }

    pub fn matrix(&self) -> &CorpusMatrix {
        &self.matrix
    }

    pub fn len(&self) -> usize {
        self.matrix.n_rows()
    }

    pub fn is_empty(&self) -> bool {
        self.matrix.n_rows() == 0
    }

    pub fn document(&self, id: DocId) -> Option<&DocRecord> {
        self.docs.get(&id)
    }

    pub fn documents(&self) -> &HashMap<DocId, DocRecord> {
        &self.docs
    }

    /// Split back into parts, e.g. for persisting.
    pub fn into_parts(self) -> (CorpusMatrix, HashMap<DocId, DocRecord>) {
        (self.matrix, self.docs)
    }
}
