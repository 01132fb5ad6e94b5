//! Error types for structure data
//!
//! Provides the error type shared by residue and protein operations.

use thiserror::Error;

/// Errors that can occur when working with protein structure data
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MolError {
    /// Residue index is out of bounds
    #[error("Residue index {index} is out of bounds for {protein} (length: {len})")]
    ResidueIndexOutOfBounds {
        protein: String,
        index: usize,
        len: usize,
    },

    /// A residue lacks the atom required by the caller
    #[error("Residue {residue} has no {atom} atom")]
    MissingAtom { residue: String, atom: String },

    /// Residue identifier text could not be parsed
    #[error("Invalid residue identifier: {0:?}")]
    InvalidResidueId(String),

    /// An atom record was added before any residue could be opened
    #[error("Atom {0} cannot be added without residue information")]
    OrphanAtom(String),
}

/// Result type alias for structure operations
pub type MolResult<T> = Result<T, MolError>;
