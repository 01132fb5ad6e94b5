//! Pair quality scores from common coordinates

use rayon::prelude::*;

use polysup_algos::{superposed_rmsd, SuperposeOrderer};
use polysup_align::{get_common_coords, Alignment, CommonResiduePolicy};
use polysup_mol::Protein;

use crate::error::{SuperposeError, SuperposeResult};
use crate::params::SuperposeParams;

fn score_pair(
    alignment: &Alignment,
    proteins: &[Protein],
    params: &SuperposeParams,
    (entry_a, entry_b): (usize, usize),
) -> SuperposeResult<Option<f64>> {
    let common = get_common_coords(
        alignment,
        &proteins[entry_a],
        &proteins[entry_b],
        &CommonResiduePolicy::SelectAll,
        &params.atom_policy,
        entry_a,
        entry_b,
    )?;
    if common.len() < params.min_common_residues.max(1) {
        log::debug!(
            "Not scoring {} and {}: only {} common residues",
            proteins[entry_a].name,
            proteins[entry_b].name,
            common.len()
        );
        return Ok(None);
    }
    let rmsd = superposed_rmsd(&common.coords_a, &common.coords_b)?;
    let score = params.pair_quality(common.len(), rmsd);
    log::debug!(
        "Pair {} and {}: {} common residues, RMSD {:.4}, score {:.4}",
        proteins[entry_a].name,
        proteins[entry_b].name,
        common.len(),
        rmsd,
        score
    );
    Ok(Some(score))
}

/// Score every pair of entries by `count / (K + rmsd)` over all their common residues.
///
/// Pairs with fewer than `params.min_common_residues` common residues get
/// no score. Scores are computed in parallel when `params.parallel_scoring`
/// is set and are always recorded in pair order.
pub fn score_pairs_by_common_coords(
    alignment: &Alignment,
    proteins: &[Protein],
    params: &SuperposeParams,
) -> SuperposeResult<SuperposeOrderer> {
    params.validate()?;
    if alignment.num_entries() != proteins.len() {
        return Err(SuperposeError::EntryCountMismatch {
            expected: proteins.len(),
            found: alignment.num_entries(),
        });
    }
    let num_entries = proteins.len();
    let pairs: Vec<(usize, usize)> = (0..num_entries)
        .flat_map(|j| (0..j).map(move |i| (i, j)))
        .collect();

    let scores: Vec<Option<f64>> = if params.parallel_scoring {
        pairs
            .par_iter()
            .map(|&pair| score_pair(alignment, proteins, params, pair))
            .collect::<SuperposeResult<_>>()?
    } else {
        pairs
            .iter()
            .map(|&pair| score_pair(alignment, proteins, params, pair))
            .collect::<SuperposeResult<_>>()?
    };

    let mut orderer = SuperposeOrderer::new(num_entries)?;
    for (&(i, j), score) in pairs.iter().zip(scores) {
        if let Some(score) = score {
            orderer.set_score(i, j, score)?;
        }
    }
    Ok(orderer)
}
