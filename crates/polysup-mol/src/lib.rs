//! Protein structure data for polysup
//!
//! This crate provides the structure types consumed by alignment and
//! superposition code:
//! - `ResidueId`: chain label, residue number and insert code
//! - `Residue`: a residue with its one-letter code and named atom coordinates
//! - `Protein`: an ordered residue sequence with lookup helpers
//! - `ProteinBuilder`: assembles a `Protein` from per-atom records
//! - Amino-acid code tables
//!
//! # Example
//!
//! ```
//! use lin_alg::f64::Vec3;
//! use polysup_mol::ProteinBuilder;
//!
//! let mut builder = ProteinBuilder::new("1abc");
//! builder.add_atom('A', 1, None, "ALA", "N", Vec3::new(0.0, 0.0, 0.0)).unwrap();
//! builder.add_atom('A', 1, None, "ALA", "CA", Vec3::new(1.5, 0.0, 0.0)).unwrap();
//! let protein = builder.build();
//! assert_eq!(protein.len(), 1);
//! assert_eq!(protein.sequence(), "A");
//! ```

pub mod error;
pub mod protein;
pub mod residue;

pub use error::{MolError, MolResult};
pub use protein::{Protein, ProteinBuilder};
pub use residue::{three_to_one, Residue, ResidueId, UNKNOWN_AMINO_ACID};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{MolError, MolResult};
    pub use crate::protein::{Protein, ProteinBuilder};
    pub use crate::residue::{Residue, ResidueId};
}
