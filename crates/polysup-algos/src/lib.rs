//! Computational algorithms for polysup
//!
//! This crate provides the numerical and graph algorithms behind
//! multi-structure superposition:
//! - Analytical 3×3 SVD decomposition and a row-major `Rotation` type
//! - Least-squares rigid fitting of one coordinate list onto another
//! - Disjoint-set (union-find) over item indices
//! - Quality graph with maximum spanning tree selection

pub mod disjoint_set;
pub mod linalg;
pub mod orderer;
pub mod rigid_fit;

pub use disjoint_set::DisjointSet;
pub use linalg::{svd3, Rotation, Svd3};
pub use orderer::{SuperposeOrderer, TreeEdge};
pub use rigid_fit::{calc_rmsd, centroid, fit_second_to_first, superposed_rmsd, RigidFit};

/// Errors from fitting and tree-selection algorithms
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AlgoError {
    #[error("Coordinate lists have different lengths: {0} vs {1}")]
    LengthMismatch(usize, usize),

    #[error("Cannot fit empty coordinate lists")]
    EmptyCoords,

    #[error("Cannot order zero items")]
    NoItems,

    #[error("Invalid pair ({i}, {j}) for {num_items} items")]
    InvalidPair { i: usize, j: usize, num_items: usize },

    #[error("Score {score} for pair ({i}, {j}) is not finite")]
    NonFiniteScore { i: usize, j: usize, score: f64 },

    #[error("Unable to find tree to span all {num_items} items (only {num_edges} edges could be added)")]
    DisconnectedSpanningTree { num_items: usize, num_edges: usize },
}

/// Result type alias for algorithm operations
pub type AlgoResult<T> = Result<T, AlgoError>;
