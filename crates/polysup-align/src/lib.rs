//! Multi-entry structural alignments for polysup
//!
//! This crate provides:
//! - `AlignmentBuilder` / `Alignment`: sparse per-entry position tables,
//!   optionally scored; positions are frozen once scores are attached
//! - Common residue and common atom selection policies
//! - Extraction of matched coordinate lists for a pair of entries
//! - Alignment by residue identifiers, and gluing of pair alignments
//! - Readers for legacy alignment formats (SSAP `.list`, CORA, FASTA) and
//!   SSAP score files

pub mod alignment;
pub mod coord_extractor;
pub mod io;
pub mod multi_align;
pub mod policy;
pub mod residue_name_align;
pub mod scores;

pub use alignment::{Alignment, AlignmentBuilder};
pub use coord_extractor::{get_common_coords, get_common_residues, CommonCoords};
pub use multi_align::glue_pair_alignments;
pub use policy::{CommonAtomPolicy, CommonResiduePolicy};
pub use residue_name_align::align_by_residue_ids;
pub use scores::AlignmentResidueScores;

use polysup_mol::MolError;

/// Errors from alignment construction, queries and parsing
#[derive(Debug, thiserror::Error)]
pub enum AlignError {
    #[error("An alignment must have at least one entry")]
    NoEntries,

    #[error("Entry {entry} is out of range for an alignment of {num_entries} entries")]
    EntryOutOfRange { entry: usize, num_entries: usize },

    #[error("Index {index} is out of range for an alignment of length {length}")]
    IndexOutOfRange { index: usize, length: usize },

    #[error("Entry {entry} has no position at index {index}")]
    PositionAbsent { entry: usize, index: usize },

    #[error("Entry position lists have different lengths: {0} vs {1}")]
    InconsistentLengths(usize, usize),

    #[error("No entry is present at alignment index {index}")]
    EmptyColumn { index: usize },

    #[error("Cannot modify positions of an alignment that has been scored")]
    AlreadyScored,

    #[error("Alignment has no scores")]
    NotScored,

    #[error("Scores do not match alignment: {0}")]
    ScoresMismatch(String),

    #[error("Invalid value {value} for {name}")]
    InvalidPolicyParameter { name: &'static str, value: f64 },

    #[error("Residue selection policy {0} requires a scored alignment")]
    PolicyRequiresScores(String),

    #[error("Selected alignment indices are not strictly increasing")]
    SelectionNotIncreasing,

    #[error("Entry {entry} jumps from position {previous} to {next} at index {index}")]
    NonConsecutivePositions {
        entry: usize,
        index: usize,
        previous: usize,
        next: usize,
    },

    #[error("Residue id alignment failed: {0}")]
    ResidueIdAlign(String),

    #[error("Cannot glue pair alignments: {0}")]
    Glue(String),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("FASTA error: {0}")]
    Fasta(String),

    #[error(transparent)]
    Mol(#[from] MolError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AlignError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        AlignError::Parse {
            line,
            message: message.into(),
        }
    }
}

/// Result type alias for alignment operations
pub type AlignResult<T> = Result<T, AlignError>;
