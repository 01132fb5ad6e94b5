//! Alignments built from SSAP output
//!
//! A SSAP scores file lists pairwise scores; the maximum spanning tree over
//! those scores picks which pair alignments (`<name_a><name_b>.list`, in
//! the scores file's directory) are read and glued together.

use std::path::{Path, PathBuf};

use polysup_algos::{SuperposeOrderer, TreeEdge};
use polysup_align::io::{read_ssap_legacy_alignment, read_ssap_scores_file, scores_between};
use polysup_align::{glue_pair_alignments, Alignment};
use polysup_mol::Protein;

use super::{open_file, spanning_tree};
use crate::error::{SuperposeError, SuperposeResult};
use crate::params::SuperposeParams;

/// Path of the `.list` alignment of two named structures
pub fn ssap_alignment_path(dir: &Path, name_a: &str, name_b: &str) -> PathBuf {
    dir.join(format!("{}{}.list", name_a, name_b))
}

/// Read one SSAP pair alignment, returning it with its row entries
pub fn read_ssap_pair_alignment(path: &Path, protein_a: &Protein, protein_b: &Protein) -> SuperposeResult<Alignment> {
    read_ssap_legacy_alignment(open_file(path)?, protein_a, protein_b)
        .map_err(|err| SuperposeError::from(err).in_file(path))
}

/// Find and read the pair alignment for a tree edge, in either name order
fn read_edge_alignment(
    dir: &Path,
    proteins: &[Protein],
    (entry_a, entry_b): TreeEdge,
) -> SuperposeResult<(usize, usize, Alignment)> {
    let (protein_a, protein_b) = (&proteins[entry_a], &proteins[entry_b]);
    let forward = ssap_alignment_path(dir, &protein_a.name, &protein_b.name);
    if forward.is_file() {
        return Ok((entry_a, entry_b, read_ssap_pair_alignment(&forward, protein_a, protein_b)?));
    }
    let backward = ssap_alignment_path(dir, &protein_b.name, &protein_a.name);
    if backward.is_file() {
        return Ok((entry_b, entry_a, read_ssap_pair_alignment(&backward, protein_b, protein_a)?));
    }
    Err(SuperposeError::MissingAlignmentFile {
        name_a: protein_a.name.clone(),
        name_b: protein_b.name.clone(),
        path: forward,
    })
}

/// Alignment of one entry holding every residue
fn single_entry_alignment(protein: &Protein) -> SuperposeResult<Alignment> {
    Ok(Alignment::from_positions(vec![(0..protein.len()).map(Some).collect()])?)
}

/// Orderer scored from a SSAP scores file, and the alignment glued along its spanning tree
pub fn alignment_and_orderer_from_ssap_scores(
    scores_path: &Path,
    proteins: &[Protein],
    params: &SuperposeParams,
) -> SuperposeResult<(Alignment, SuperposeOrderer)> {
    let entries =
        read_ssap_scores_file(open_file(scores_path)?).map_err(|err| SuperposeError::from(err).in_file(scores_path))?;
    let names: Vec<String> = proteins.iter().map(|protein| protein.name.clone()).collect();

    let mut orderer = SuperposeOrderer::new(proteins.len())?;
    for (i, j, score) in scores_between(&entries, &names) {
        orderer.set_score(i, j, score)?;
    }
    log::info!(
        "Read {} SSAP scores ({} between the given structures) from {}",
        entries.len(),
        orderer.num_scores(),
        scores_path.display()
    );

    if let [protein] = proteins {
        return Ok((single_entry_alignment(protein)?, orderer));
    }

    let tree = spanning_tree(&orderer, params)?;
    let dir = scores_path.parent().unwrap_or_else(|| Path::new(""));
    let edges = tree
        .into_iter()
        .map(|edge| read_edge_alignment(dir, proteins, edge))
        .collect::<SuperposeResult<Vec<_>>>()?;
    let alignment = glue_pair_alignments(proteins.len(), &edges)?;
    Ok((alignment, orderer))
}
