use rustc_hash::FxHashSet;

use crate::errors::SplitError;
use crate::sequence::SequenceSet;

/// A dense, symmetric matrix of pairwise sequence distances.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    size: usize,
    values: Vec<f64>,
}

impl DistanceMatrix {
    pub fn new(size: usize) -> Self {
        DistanceMatrix { size, values: vec![0.0; size * size] }
    }

    /// Build a matrix from row-major values. Fails if the values do not form a square matrix.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, SplitError> {
        let size = rows.len();
        if rows.iter().any(|r| r.len() != size) {
            return Err(SplitError::AlignmentError("distance matrix is not square".to_string()));
        }

        Ok(DistanceMatrix { size, values: rows.into_iter().flatten().collect() })
    }

    #[inline(always)]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.size + j]
    }

    /// Set both `(i, j)` and `(j, i)`
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        self.values[i * self.size + j] = value;
        self.values[j * self.size + i] = value;
    }
}

/// Jaccard distance between the minimizer value sets of every pair of sequences.
pub fn minimizer_distance_matrix(sequences: &SequenceSet) -> DistanceMatrix {
    let value_sets: Vec<FxHashSet<u64>> = sequences.iter()
        .map(|r| r.minimizers().iter().map(|m| m.value).collect())
        .collect();

    let mut matrix = DistanceMatrix::new(sequences.len());
    for i in 0..value_sets.len() {
        for j in i + 1..value_sets.len() {
            let shared = value_sets[i].intersection(&value_sets[j]).count();
            let union = value_sets[i].len() + value_sets[j].len() - shared;

            let distance = if union == 0 { 1.0 } else { 1.0 - shared as f64 / union as f64 };
            matrix.set(i, j, distance);
        }
    }

    matrix
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::record_from_values;

    #[test]
    fn test_jaccard_distances() {
        let set: SequenceSet = [
            record_from_values("a", &[1, 2, 3, 4]),
            record_from_values("b", &[3, 4, 5, 6]),
            record_from_values("c", &[1, 2, 3, 4]),
            record_from_values("d", &[]),
        ].into_iter().collect();

        let matrix = minimizer_distance_matrix(&set);

        assert_eq!(matrix.size(), 4);
        assert_eq!(matrix.get(0, 0), 0.0);
        assert!((matrix.get(0, 1) - (1.0 - 2.0 / 6.0)).abs() < 1e-12);
        assert_eq!(matrix.get(1, 0), matrix.get(0, 1));
        assert_eq!(matrix.get(0, 2), 0.0);
        assert_eq!(matrix.get(0, 3), 1.0);
    }

    #[test]
    fn test_from_rows() {
        assert!(DistanceMatrix::from_rows(vec![vec![0.0, 1.0], vec![1.0]]).is_err());

        let matrix = DistanceMatrix::from_rows(vec![vec![0.0, 0.5], vec![0.5, 0.0]]).unwrap();
        assert_eq!(matrix.get(1, 0), 0.5);
    }
}
