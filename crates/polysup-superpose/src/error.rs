//! Error types for superposition

use std::path::PathBuf;

use polysup_algos::AlgoError;
use polysup_align::AlignError;
use polysup_mol::MolError;

/// Errors from acquiring alignments and composing superpositions
#[derive(Debug, thiserror::Error)]
pub enum SuperposeError {
    #[error("Cannot construct a tree connecting all structures with pairs overlapping by at least {min_common_residues} residues")]
    InsufficientOverlap { min_common_residues: usize },

    #[error("Only {found} common coordinates between entries {entry_a} and {entry_b} (need at least {required})")]
    TooFewCommonCoords {
        entry_a: usize,
        entry_b: usize,
        found: usize,
        required: usize,
    },

    #[error("Alignment has {found} entries but there are {expected} structures")]
    EntryCountMismatch { expected: usize, found: usize },

    #[error("There are {names} names for {structures} structures")]
    NameCountMismatch { names: usize, structures: usize },

    #[error("Acquirer {acquirer} needs {expected} structures, got {found}")]
    WrongStructureCount {
        acquirer: String,
        expected: usize,
        found: usize,
    },

    #[error("Superposition context has no alignment")]
    NoAlignment,

    #[error("Entry {entry} is out of range for a superposition of {num_entries} entries")]
    EntryOutOfRange { entry: usize, num_entries: usize },

    #[error("Cannot build superposition: {0}")]
    InvalidTree(String),

    #[error("Cannot find alignment file for {name_a} and {name_b} at {path}")]
    MissingAlignmentFile {
        name_a: String,
        name_b: String,
        path: PathBuf,
    },

    #[error("Cannot read {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: Box<SuperposeError>,
    },

    #[error(transparent)]
    Align(#[from] AlignError),

    #[error(transparent)]
    Algo(#[from] AlgoError),

    #[error(transparent)]
    Mol(#[from] MolError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid parameters: {0}")]
    Params(#[from] serde_json::Error),

    #[error("Invalid value {value} for parameter {name}: {requirement}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        requirement: &'static str,
    },
}

impl SuperposeError {
    /// Attach a file path to an error raised while reading that file
    pub(crate) fn in_file(self, path: impl Into<PathBuf>) -> Self {
        SuperposeError::File {
            path: path.into(),
            source: Box::new(self),
        }
    }

    /// The process return code for this error
    pub fn return_code(&self) -> ReturnCode {
        match self {
            SuperposeError::InsufficientOverlap { .. } => ReturnCode::InsufficientResidueNameOverlaps,
            SuperposeError::File { source, .. } => source.return_code(),
            _ => ReturnCode::GenericFailure,
        }
    }
}

/// Process return codes for superposition failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReturnCode {
    GenericFailure,
    InsufficientResidueNameOverlaps,
}

impl ReturnCode {
    /// Non-zero exit code
    pub fn code(self) -> i32 {
        match self {
            ReturnCode::GenericFailure => 1,
            ReturnCode::InsufficientResidueNameOverlaps => 2,
        }
    }
}

/// Result type alias for superposition operations
pub type SuperposeResult<T> = Result<T, SuperposeError>;
