//! Exact nearest-neighbor search over a flat, in-memory vector set.
//!
//! The index is write-once: all vectors are supplied at construction and it is
//! read-many afterwards. Distances are squared Euclidean (L2); ties are broken
//! by insertion order.

use std::cmp::Ordering;

use crate::error::{RagError, Result};

/// Flat L2 index mapping each vector to a payload of type `T`.
#[derive(Debug, Clone)]
pub struct FlatL2Index<T> {
    dim: usize,
    /// Row-major storage, `len * dim` floats.
    data: Vec<f32>,
    payloads: Vec<T>,
}

/// One search hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor<'a, T> {
    pub payload: &'a T,
    /// Squared L2 distance to the query.
    pub distance: f32,
    /// Insertion position of the hit.
    pub position: usize,
}

impl<T> FlatL2Index<T> {
    /// Builds an index over `vectors`, pairing each with the payload at the same position.
    ///
    /// # Errors
    /// - [`RagError::EmptyInput`] if `vectors` is empty
    /// - [`RagError::LengthMismatch`] if the two sequences differ in length
    /// - [`RagError::DimensionMismatch`] if vectors differ in length
    /// - [`RagError::InvalidConfiguration`] for zero-dimensional vectors
    pub fn build(vectors: Vec<Vec<f32>>, payloads: Vec<T>) -> Result<Self> {
        let Some(first) = vectors.first() else {
            return Err(RagError::EmptyInput);
        };
        if vectors.len() != payloads.len() {
            return Err(RagError::LengthMismatch {
                vectors: vectors.len(),
                payloads: payloads.len(),
            });
        }

        let dim = first.len();
        if dim == 0 {
            return Err(RagError::InvalidConfiguration(
                "embedding dimension must be greater than zero".into(),
            ));
        }

        let mut data = Vec::with_capacity(vectors.len() * dim);
        for v in &vectors {
            if v.len() != dim {
                return Err(RagError::DimensionMismatch {
                    expected: dim,
                    got: v.len(),
                });
            }
            data.extend_from_slice(v);
        }

        Ok(Self {
            dim,
            data,
            payloads,
        })
    }

    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dim
    }

    /// Returns the `min(k, len)` nearest payloads in ascending distance order.
    ///
    /// # Errors
    /// [`RagError::DimensionMismatch`] if `query` has the wrong length.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor<'_, T>>> {
        if query.len() != self.dim {
            return Err(RagError::DimensionMismatch {
                expected: self.dim,
                got: query.len(),
            });
        }

        let mut hits: Vec<Neighbor<'_, T>> = self
            .data
            .chunks_exact(self.dim)
            .zip(&self.payloads)
            .enumerate()
            .map(|(position, (row, payload))| Neighbor {
                payload,
                distance: squared_l2(row, query),
                position,
            })
            .collect();

        let k = k.min(hits.len());
        if k == 0 {
            return Ok(Vec::new());
        }
        if k < hits.len() {
            hits.select_nth_unstable_by(k - 1, by_distance_then_position);
            hits.truncate(k);
        }
        hits.sort_by(by_distance_then_position);
        Ok(hits)
    }
}

fn by_distance_then_position<T>(a: &Neighbor<'_, T>, b: &Neighbor<'_, T>) -> Ordering {
    a.distance
        .total_cmp(&b.distance)
        .then(a.position.cmp(&b.position))
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> FlatL2Index<&'static str> {
        FlatL2Index::build(
            vec![
                vec![0.0, 0.0],
                vec![1.0, 0.0],
                vec![0.0, 2.0],
                vec![1.0, 0.0],
            ],
            vec!["origin", "east", "north", "east-dup"],
        )
        .unwrap()
    }

    #[test]
    fn nearest_neighbor_has_minimum_distance() {
        let idx = index();
        let hits = idx.search(&[0.9, 0.1], 1).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(*hits[0].payload, "east");
        assert!((hits[0].distance - 0.02).abs() < 1e-6);
    }

    #[test]
    fn results_are_sorted_and_ties_keep_insertion_order() {
        let idx = index();
        let hits = idx.search(&[1.0, 0.0], 4).unwrap();
        let names: Vec<_> = hits.iter().map(|h| *h.payload).collect();
        assert_eq!(names, ["east", "east-dup", "origin", "north"]);
        assert!(hits.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[test]
    fn k_is_clamped_to_index_size() {
        let idx = index();
        assert_eq!((idx.len(), idx.is_empty(), idx.dimension()), (4, false, 2));
        assert_eq!(idx.search(&[0.0, 0.0], 10).unwrap().len(), 4);
        assert!(idx.search(&[0.0, 0.0], 0).unwrap().is_empty());
    }

    #[test]
    fn partial_selection_matches_full_sort() {
        let vectors: Vec<Vec<f32>> = (0..50).map(|i| vec![((i * 37) % 50) as f32]).collect();
        let idx = FlatL2Index::build(vectors, (0..50).collect::<Vec<usize>>()).unwrap();
        let top: Vec<f32> = idx
            .search(&[10.2], 5)
            .unwrap()
            .iter()
            .map(|h| h.distance)
            .collect();
        let all: Vec<f32> = idx
            .search(&[10.2], 50)
            .unwrap()
            .iter()
            .take(5)
            .map(|h| h.distance)
            .collect();
        assert_eq!(top, all);
    }

    #[test]
    fn degenerate_inputs_are_rejected() {
        assert!(matches!(
            FlatL2Index::<()>::build(vec![], vec![]),
            Err(RagError::EmptyInput)
        ));
        assert!(matches!(
            FlatL2Index::build(vec![vec![1.0, 2.0], vec![1.0]], vec![1, 2]),
            Err(RagError::DimensionMismatch {
                expected: 2,
                got: 1
            })
        ));
        assert!(matches!(
            FlatL2Index::build(vec![vec![1.0]], vec![1, 2]),
            Err(RagError::LengthMismatch { .. })
        ));
        assert!(matches!(
            index().search(&[1.0], 1),
            Err(RagError::DimensionMismatch { .. })
        ));
    }
}
