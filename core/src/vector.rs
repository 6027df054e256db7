use crate::TermId;

/// A projected query: sparse `(term, weight)` entries over `dim` columns.
///
/// Entries are sorted by term index and hold only non-zero weights. An empty
/// entry list is the all-zero vector, which is a valid projection.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryVector {
    dim: usize,
    entries: Vec<(TermId, f32)>,
}

impl QueryVector {
    /// Build from unordered entries. Zero weights are dropped, entries are
    /// sorted by index; indices must be below `dim`.
    pub fn new(dim: usize, mut entries: Vec<(TermId, f32)>) -> Self {
        entries.retain(|&(idx, w)| w != 0.0 && (idx as usize) < dim);
        entries.sort_by_key(|&(idx, _)| idx);
        Self { dim, entries }
    }

    pub fn zeros(dim: usize) -> Self {
        Self { dim, entries: Vec::new() }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn entries(&self) -> &[(TermId, f32)] {
        &self.entries
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> f32 {
        self.entries
            .binary_search_by_key(&(index as TermId), |&(idx, _)| idx)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    pub fn to_dense(&self) -> Vec<f32> {
        let mut dense = vec![0.0; self.dim];
        for &(idx, w) in &self.entries {
            dense[idx as usize] = w;
        }
        dense
    }
}

/// Euclidean distance between two equal-length dense rows.
pub fn euclidean(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = (*x as f64) - (*y as f64);
            d * d
        })
        .sum::<f64>()
        .sqrt() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_zero_weights_and_sorts() {
        let v = QueryVector::new(5, vec![(3, 0.5), (1, 0.0), (0, 0.25)]);
        assert_eq!(v.entries(), &[(0, 0.25), (3, 0.5)]);
        assert_eq!(v.get(1), 0.0);
        assert_eq!(v.to_dense(), vec![0.25, 0.0, 0.0, 0.5, 0.0]);
    }

    #[test]
    fn euclidean_matches_pythagoras() {
        assert!((euclidean(&[0.0, 0.0], &[3.0, 4.0]) - 5.0).abs() < 1e-6);
    }
}
