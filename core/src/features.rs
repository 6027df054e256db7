use crate::corpus::CorpusMatrix;
use crate::error::{AscentError, Result};
use crate::vector::QueryVector;

/// Vocabulary indices ordered by descending query weight.
///
/// Equal weights keep ascending index order, so the same query always
/// selects the same columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureRanking(Vec<usize>);

impl FeatureRanking {
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Dense row-major matrix restricted to the selected feature columns.
#[derive(Debug, Clone, PartialEq)]
pub struct ReducedMatrix {
    width: usize,
    values: Vec<f32>,
}

impl ReducedMatrix {
    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        // a zero-width matrix holds no values, so it yields no rows
        self.values.chunks_exact(self.width.max(1))
    }
}

/// Picks the query's top-weighted vocabulary columns and projects onto them.
#[derive(Debug, Clone, Copy)]
pub struct FeatureSelector {
    k: usize,
}

impl FeatureSelector {
    pub fn new(k: usize) -> Self {
        Self { k }
    }

    /// Order every vocabulary index by the query's weight, highest first.
    ///
    /// Equivalent to a stable descending sort of the dense vector, without
    /// materialising it: positive weights, then zero columns in index order,
    /// then negative weights.
    pub fn rank(&self, vector: &QueryVector) -> FeatureRanking {
        let mut positive: Vec<(usize, f32)> = Vec::new();
        let mut negative: Vec<(usize, f32)> = Vec::new();
        for &(idx, w) in vector.entries() {
            if w > 0.0 {
                positive.push((idx as usize, w));
            } else {
                negative.push((idx as usize, w));
            }
        }
        // entries arrive in index order and sort_by is stable
        positive.sort_by(|a, b| b.1.total_cmp(&a.1));
        negative.sort_by(|a, b| b.1.total_cmp(&a.1));

        let mut order = Vec::with_capacity(vector.dim());
        order.extend(positive.iter().map(|&(idx, _)| idx));
        let mut nonzero = vector.entries().iter().map(|&(idx, _)| idx as usize).peekable();
        for idx in 0..vector.dim() {
            if nonzero.peek() == Some(&idx) {
                nonzero.next();
                continue;
            }
            order.push(idx);
        }
        order.extend(negative.iter().map(|&(idx, _)| idx));
        FeatureRanking(order)
    }

    /// The first `k` ranked columns, with `k` clamped to the vocabulary size.
    pub fn select_top_k<'r>(&self, ranking: &'r FeatureRanking) -> Result<&'r [usize]> {
        if ranking.is_empty() {
            return Err(AscentError::Configuration("cannot select features from an empty vocabulary".into()));
        }
        if self.k == 0 {
            return Err(AscentError::Configuration("k_features must be at least 1".into()));
        }
        let k = self.k.min(ranking.len());
        Ok(&ranking.indices()[..k])
    }

    pub fn restrict_vector(&self, vector: &QueryVector, columns: &[usize]) -> Vec<f32> {
        columns.iter().map(|&col| vector.get(col)).collect()
    }

    pub fn restrict_matrix(&self, matrix: &CorpusMatrix, columns: &[usize]) -> ReducedMatrix {
        let mut values = Vec::with_capacity(matrix.n_rows() * columns.len());
        for row in 0..matrix.n_rows() {
            values.extend(columns.iter().map(|&col| matrix.value(row, col)));
        }
        ReducedMatrix { width: columns.len(), values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dense(weights: &[f32]) -> QueryVector {
        let entries = weights.iter().enumerate().map(|(i, &w)| (i as u32, w)).collect();
        QueryVector::new(weights.len(), entries)
    }

    #[test]
    fn ranks_descending_with_stable_ties() {
        let v = dense(&[0.1, 0.5, 0.0, 0.5, 0.0, 0.2]);
        let ranking = FeatureSelector::new(20).rank(&v);
        assert_eq!(ranking.indices(), &[1, 3, 5, 0, 2, 4]);
    }

    #[test]
    fn negative_weights_sort_after_zero_columns() {
        let v = dense(&[-0.3, 0.0, 0.4, -0.1]);
        let ranking = FeatureSelector::new(20).rank(&v);
        assert_eq!(ranking.indices(), &[2, 1, 3, 0]);
    }

    #[test]
    fn matches_stable_sort_of_dense_vector() {
        let weights: [f32; 8] = [0.0, 0.3, 0.3, 0.0, 0.9, 0.1, 0.0, 0.3];
        let mut expected: Vec<usize> = (0..weights.len()).collect();
        expected.sort_by(|&a, &b| weights[b].total_cmp(&weights[a]));
        assert_eq!(FeatureSelector::new(3).rank(&dense(&weights)).indices(), expected.as_slice());
    }

    #[test]
    fn zero_vector_ranks_in_index_order() {
        let ranking = FeatureSelector::new(2).rank(&QueryVector::zeros(4));
        assert_eq!(ranking.indices(), &[0, 1, 2, 3]);
    }

    #[test]
    fn k_is_clamped_to_vocabulary() {
        let selector = FeatureSelector::new(50);
        let ranking = selector.rank(&dense(&[0.2, 0.7, 0.1]));
        assert_eq!(selector.select_top_k(&ranking).unwrap(), &[1, 0, 2]);
    }

    #[test]
    fn empty_vocabulary_fails_loudly() {
        let selector = FeatureSelector::new(20);
        let ranking = selector.rank(&QueryVector::zeros(0));
        assert!(matches!(selector.select_top_k(&ranking), Err(AscentError::Configuration(_))));
    }

    #[test]
    fn restricts_matrix_columns_in_ranking_order() {
        let mut m = CorpusMatrix::new(3);
        m.push_row(0, &dense(&[1.0, 2.0, 3.0])).unwrap();
        m.push_row(1, &dense(&[4.0, 0.0, 6.0])).unwrap();
        let reduced = FeatureSelector::new(2).restrict_matrix(&m, &[2, 1]);
        let rows: Vec<&[f32]> = reduced.rows().collect();
        assert_eq!(rows, vec![&[3.0, 2.0][..], &[6.0, 0.0][..]]);
    }
}
