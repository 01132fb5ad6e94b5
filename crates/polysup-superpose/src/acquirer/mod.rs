//! Alignment acquirers
//!
//! Each acquirer produces an alignment of all the structures together with
//! a `SuperposeOrderer` holding pair qualities, from which the spanning
//! tree for superposition is chosen.
//!
//! - `ResidueName`: align by residue identifiers, score pairs by fitting
//! - `SsapAlignmentFile`: one SSAP `.list` pair alignment of two structures
//! - `SsapScoresFile`: SSAP scores choose the tree; `.list` files give the alignment
//! - `CoraFile` / `FastaFile`: read a multiple alignment, score pairs by fitting

pub mod pair_scores;
pub mod ssap;

pub use pair_scores::score_pairs_by_common_coords;
pub use ssap::alignment_and_orderer_from_ssap_scores;

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use polysup_algos::{AlgoError, SuperposeOrderer, TreeEdge};
use polysup_align::io::{read_cora_alignment, read_fasta_alignment};
use polysup_align::{align_by_residue_ids, AlignResult, Alignment};
use polysup_mol::Protein;

use crate::error::{SuperposeError, SuperposeResult};
use crate::params::SuperposeParams;

/// Source of the alignment and pair qualities for a superposition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AlignmentAcquirer {
    /// Match residues by identifier across all structures
    ResidueName,
    /// SSAP legacy alignment of exactly two structures
    SsapAlignmentFile { path: PathBuf },
    /// SSAP scores file plus the pair alignments next to it
    SsapScoresFile { path: PathBuf },
    /// CORA multiple alignment
    CoraFile { path: PathBuf },
    /// Gapped FASTA multiple alignment
    FastaFile { path: PathBuf },
}

pub(crate) fn open_file(path: &Path) -> SuperposeResult<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|err| SuperposeError::from(err).in_file(path))
}

/// Read an alignment file with `read`, then score its pairs
fn read_and_score(
    path: &Path,
    proteins: &[Protein],
    params: &SuperposeParams,
    read: impl FnOnce(BufReader<File>) -> AlignResult<Alignment>,
) -> SuperposeResult<(Alignment, SuperposeOrderer)> {
    let alignment = read(open_file(path)?).map_err(|err| SuperposeError::from(err).in_file(path))?;
    let orderer = score_pairs_by_common_coords(&alignment, proteins, params)?;
    Ok((alignment, orderer))
}

/// Maximum spanning tree of an orderer; a disconnected graph is an insufficient overlap
pub(crate) fn spanning_tree(orderer: &SuperposeOrderer, params: &SuperposeParams) -> SuperposeResult<Vec<TreeEdge>> {
    orderer
        .spanning_tree_ordered_by_desc_score()
        .map_err(|err| match err {
            AlgoError::DisconnectedSpanningTree { .. } => SuperposeError::InsufficientOverlap {
                min_common_residues: params.min_common_residues,
            },
            other => other.into(),
        })
}

impl AlignmentAcquirer {
    /// Short human-readable name
    pub fn descriptive_name(&self) -> String {
        match self {
            AlignmentAcquirer::ResidueName => "residue_name_alignment".to_string(),
            AlignmentAcquirer::SsapAlignmentFile { path } => format!("ssap_alignment_file[{}]", path.display()),
            AlignmentAcquirer::SsapScoresFile { path } => format!("ssap_scores_file[{}]", path.display()),
            AlignmentAcquirer::CoraFile { path } => format!("cora_alignment_file[{}]", path.display()),
            AlignmentAcquirer::FastaFile { path } => format!("fasta_alignment_file[{}]", path.display()),
        }
    }

    /// Acquire an alignment of `proteins` and the pair qualities over them
    pub fn get_alignment_and_orderer(
        &self,
        proteins: &[Protein],
        params: &SuperposeParams,
    ) -> SuperposeResult<(Alignment, SuperposeOrderer)> {
        log::info!(
            "Acquiring alignment of {} structures by {}",
            proteins.len(),
            self.descriptive_name()
        );
        match self {
            AlignmentAcquirer::ResidueName => {
                let ids: Vec<_> = proteins.iter().map(Protein::residue_ids).collect();
                let alignment = align_by_residue_ids(&ids)?;
                let orderer = score_pairs_by_common_coords(&alignment, proteins, params)?;
                Ok((alignment, orderer))
            }
            AlignmentAcquirer::SsapAlignmentFile { path } => {
                let [protein_a, protein_b] = proteins else {
                    return Err(SuperposeError::WrongStructureCount {
                        acquirer: self.descriptive_name(),
                        expected: 2,
                        found: proteins.len(),
                    });
                };
                let alignment = ssap::read_ssap_pair_alignment(path, protein_a, protein_b)?;
                let orderer = score_pairs_by_common_coords(&alignment, proteins, params)?;
                Ok((alignment, orderer))
            }
            AlignmentAcquirer::SsapScoresFile { path } => {
                alignment_and_orderer_from_ssap_scores(path, proteins, params)
            }
            AlignmentAcquirer::CoraFile { path } => {
                read_and_score(path, proteins, params, |reader| read_cora_alignment(reader, proteins))
            }
            AlignmentAcquirer::FastaFile { path } => {
                read_and_score(path, proteins, params, |reader| read_fasta_alignment(reader, proteins))
            }
        }
    }
}

impl fmt::Display for AlignmentAcquirer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.descriptive_name())
    }
}

/// Acquire an alignment and choose the spanning tree for superposing `proteins`.
///
/// The alignment and orderer must cover every structure. If the pair
/// qualities cannot connect all structures, the result is
/// [`SuperposeError::InsufficientOverlap`].
pub fn get_alignment_and_spanning_tree(
    acquirer: &AlignmentAcquirer,
    proteins: &[Protein],
    params: &SuperposeParams,
) -> SuperposeResult<(Alignment, Vec<TreeEdge>)> {
    let (alignment, orderer) = acquirer.get_alignment_and_orderer(proteins, params)?;
    for found in [alignment.num_entries(), orderer.num_items()] {
        if found != proteins.len() {
            return Err(SuperposeError::EntryCountMismatch {
                expected: proteins.len(),
                found,
            });
        }
    }

    let tree = spanning_tree(&orderer, params)?;
    if tree.len() + 1 != proteins.len() {
        return Err(SuperposeError::InvalidTree(format!(
            "spanning tree has {} edges for {} structures",
            tree.len(),
            proteins.len()
        )));
    }
    for (i, j) in &tree {
        log::debug!(
            "Tree edge {} - {} (score {:.4})",
            proteins[*i].name,
            proteins[*j].name,
            orderer.get_score(*i, *j).unwrap_or(f64::NAN)
        );
    }
    Ok((alignment, tree))
}
