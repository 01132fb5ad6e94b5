//! Quality graph and maximum spanning tree
//!
//! `SuperposeOrderer` stores an optional score for each unordered pair of
//! items and selects a maximum-score spanning tree over them (Kruskal's
//! algorithm with a `DisjointSet`). Pairs without a score are never used as
//! tree edges.

use std::cmp::Ordering;

use crate::disjoint_set::DisjointSet;
use crate::{AlgoError, AlgoResult};

/// A spanning-tree edge `(i, j)` with `i < j`
pub type TreeEdge = (usize, usize);

/// Symmetric, sparse pairwise scores over `num_items` items
#[derive(Debug, Clone)]
pub struct SuperposeOrderer {
    num_items: usize,
    /// Lower-triangle half matrix: pair (i, j) with i < j is at j*(j-1)/2 + i
    scores: Vec<Option<f64>>,
}

impl SuperposeOrderer {
    /// Create an orderer over `num_items` items with no scores
    pub fn new(num_items: usize) -> AlgoResult<Self> {
        if num_items == 0 {
            return Err(AlgoError::NoItems);
        }
        Ok(SuperposeOrderer {
            num_items,
            scores: vec![None; num_items * (num_items - 1) / 2],
        })
    }

    /// Create an orderer from `((i, j), score)` entries
    pub fn from_scores<I>(num_items: usize, scores: I) -> AlgoResult<Self>
    where
        I: IntoIterator<Item = (TreeEdge, f64)>,
    {
        let mut orderer = SuperposeOrderer::new(num_items)?;
        for ((i, j), score) in scores {
            orderer.set_score(i, j, score)?;
        }
        Ok(orderer)
    }

    /// Number of items
    pub fn num_items(&self) -> usize {
        self.num_items
    }

    fn slot(&self, i: usize, j: usize) -> AlgoResult<usize> {
        if i == j || i >= self.num_items || j >= self.num_items {
            return Err(AlgoError::InvalidPair {
                i,
                j,
                num_items: self.num_items,
            });
        }
        let (lo, hi) = if i < j { (i, j) } else { (j, i) };
        Ok(hi * (hi - 1) / 2 + lo)
    }

    /// Record the score for the pair (i, j); order of i and j is irrelevant
    pub fn set_score(&mut self, i: usize, j: usize, score: f64) -> AlgoResult<()> {
        if !score.is_finite() {
            return Err(AlgoError::NonFiniteScore { i, j, score });
        }
        let slot = self.slot(i, j)?;
        self.scores[slot] = Some(score);
        Ok(())
    }

    /// Check whether the pair (i, j) has a score
    pub fn has_score(&self, i: usize, j: usize) -> bool {
        self.get_score(i, j).is_some()
    }

    /// Score for the pair (i, j), if any
    pub fn get_score(&self, i: usize, j: usize) -> Option<f64> {
        self.slot(i, j).ok().and_then(|slot| self.scores[slot])
    }

    /// Number of scored pairs
    pub fn num_scores(&self) -> usize {
        self.scores.iter().filter(|s| s.is_some()).count()
    }

    /// All scored pairs as `(i, j, score)` with `i < j`, in `(i, j)` order
    pub fn scored_pairs(&self) -> Vec<(usize, usize, f64)> {
        let mut pairs = Vec::with_capacity(self.num_scores());
        for i in 0..self.num_items {
            for j in (i + 1)..self.num_items {
                if let Some(score) = self.get_score(i, j) {
                    pairs.push((i, j, score));
                }
            }
        }
        pairs
    }

    /// Select a maximum-score spanning tree.
    ///
    /// Edges are returned in descending score order, ties broken by `(i, j)`.
    /// Fails if the scored pairs do not connect all items.
    pub fn spanning_tree_ordered_by_desc_score(&self) -> AlgoResult<Vec<TreeEdge>> {
        let mut candidates = self.scored_pairs();
        candidates.sort_by(|a, b| match b.2.total_cmp(&a.2) {
            Ordering::Equal => (a.0, a.1).cmp(&(b.0, b.1)),
            other => other,
        });

        let mut components = DisjointSet::new(self.num_items);
        let mut edges = Vec::with_capacity(self.num_items - 1);
        for (i, j, score) in candidates {
            if edges.len() + 1 == self.num_items {
                break;
            }
            if components.union(i, j) {
                log::debug!("Spanning tree edge ({}, {}) with score {:.4}", i, j, score);
                edges.push((i, j));
            }
        }

        if edges.len() + 1 != self.num_items {
            return Err(AlgoError::DisconnectedSpanningTree {
                num_items: self.num_items,
                num_edges: edges.len(),
            });
        }
        Ok(edges)
    }
}
