//! Presentation of ranked documents: the single-best answer and the
//! readability-ordered display window.

use crate::corpus::CorpusStore;
use crate::ranker::RankedDocument;
use crate::DocId;
use serde::Serialize;

/// Outcome of the single-best selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SingleBest {
    /// The nearest document by distance.
    pub document: RankedDocument,
    /// The candidate pool re-sorted by ascending readability score. It does
    /// not influence `document`.
    pub readability_order: Vec<RankedDocument>,
}

/// One row of the windowed display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowRow {
    pub doc_id: DocId,
    pub distance: f32,
    pub readability_score: f32,
    /// Reverse position in the readability order: the first row has the
    /// highest rank, the last row rank zero.
    pub rank: usize,
    pub visible: bool,
}

pub struct ResultCurator<'a> {
    corpus: &'a CorpusStore,
}

impl<'a> ResultCurator<'a> {
    pub fn new(corpus: &'a CorpusStore) -> Self {
        Self { corpus }
    }

    fn score(&self, id: DocId) -> f32 {
        self.corpus.document(id).map(|d| d.readability_score).unwrap_or(0.0)
    }

    /// Nearest document out of the first `pool` ranked entries.
    ///
    /// The pool is also sorted by readability, but the nearest document is
    /// returned regardless of where it lands in that order.
    pub fn single_best(&self, ranked: &[RankedDocument], pool: usize) -> Option<SingleBest> {
        let candidates = &ranked[..pool.min(ranked.len())];
        let document = *candidates.first()?;
        let mut readability_order = candidates.to_vec();
        readability_order.sort_by(|a, b| self.score(a.doc_id).total_cmp(&self.score(b.doc_id)));
        Some(SingleBest { document, readability_order })
    }

    /// Readability-ordered window over the first `pool` ranked entries.
    ///
    /// Rows are sorted by descending readability and numbered from `n - 1`
    /// down to `0`; only ranks in `[start, end)` are visible. Every row is
    /// returned.
    pub fn window(&self, ranked: &[RankedDocument], pool: usize, start: usize, end: usize) -> Vec<WindowRow> {
        let candidates = &ranked[..pool.min(ranked.len())];
        let mut rows: Vec<WindowRow> = candidates
            .iter()
            .map(|r| WindowRow {
                doc_id: r.doc_id,
                distance: r.distance,
                readability_score: self.score(r.doc_id),
                rank: 0,
                visible: false,
            })
            .collect();
        rows.sort_by(|a, b| b.readability_score.total_cmp(&a.readability_score));

        let n = rows.len();
        for (pos, row) in rows.iter_mut().enumerate() {
            row.rank = n - 1 - pos;
            row.visible = (start..end).contains(&row.rank);
        }
        rows
    }
}
