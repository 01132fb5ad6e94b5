//! Spanning-tree driven multi-structure superposition
//!
//! This crate ties the pieces together:
//! - `AlignmentAcquirer`: where the alignment and pair qualities come from
//! - `get_alignment_and_spanning_tree`: the maximum-quality tree of pairs
//! - `compose_superposition`: pairwise fits along the tree, composed into
//!   one transform per structure
//! - `SuperpositionContext`: structures, names, superposition and alignment
//!
//! # Example
//!
//! ```no_run
//! use polysup_superpose::{superpose, AlignmentAcquirer, SuperposeParams};
//! # fn load() -> Vec<polysup_mol::Protein> { Vec::new() }
//!
//! let proteins = load();
//! let names = proteins.iter().map(|p| p.name.clone()).collect();
//! match superpose(&AlignmentAcquirer::ResidueName, proteins, names, &SuperposeParams::default()) {
//!     Ok(context) => println!("{}", context.superposition()),
//!     Err(err) => std::process::exit(err.return_code().code()),
//! }
//! ```

pub mod acquirer;
pub mod composer;
pub mod context;
pub mod error;
pub mod params;
pub mod superposition;

pub use acquirer::{get_alignment_and_spanning_tree, score_pairs_by_common_coords, AlignmentAcquirer};
pub use composer::{compose_superposition, superpose};
pub use context::SuperpositionContext;
pub use error::{ReturnCode, SuperposeError, SuperposeResult};
pub use params::SuperposeParams;
pub use superposition::{IndexedCoordPair, Superposition};

/// Commonly used types
pub mod prelude {
    pub use crate::{
        superpose, AlignmentAcquirer, ReturnCode, SuperposeError, SuperposeParams, SuperposeResult, Superposition,
        SuperpositionContext,
    };
    pub use polysup_align::{Alignment, CommonAtomPolicy, CommonResiduePolicy};
    pub use polysup_mol::{Protein, ResidueId};
}
