//! Composition of a superposition from an alignment and a spanning tree

use polysup_algos::{fit_second_to_first, TreeEdge};
use polysup_align::{get_common_coords, Alignment};
use polysup_mol::Protein;

use crate::acquirer::{get_alignment_and_spanning_tree, AlignmentAcquirer};
use crate::context::SuperpositionContext;
use crate::error::{SuperposeError, SuperposeResult};
use crate::params::SuperposeParams;
use crate::superposition::{IndexedCoordPair, Superposition};

/// Fit each tree edge's common coordinates and compose the per-entry transforms.
///
/// Every edge must yield at least `params.min_common_residues` coordinate
/// pairs under the configured policies. After composition, each edge's
/// composed RMSD is compared with its direct pairwise RMSD and
/// disagreements are logged.
pub fn compose_superposition(
    alignment: &Alignment,
    proteins: &[Protein],
    spanning_tree: &[TreeEdge],
    params: &SuperposeParams,
) -> SuperposeResult<Superposition> {
    if alignment.num_entries() != proteins.len() {
        return Err(SuperposeError::EntryCountMismatch {
            expected: proteins.len(),
            found: alignment.num_entries(),
        });
    }

    let mut pairs = Vec::with_capacity(spanning_tree.len());
    let mut direct_rmsds = Vec::with_capacity(spanning_tree.len());
    for &(entry_a, entry_b) in spanning_tree {
        for entry in [entry_a, entry_b] {
            if entry >= proteins.len() {
                return Err(SuperposeError::EntryOutOfRange {
                    entry,
                    num_entries: proteins.len(),
                });
            }
        }
        let common = get_common_coords(
            alignment,
            &proteins[entry_a],
            &proteins[entry_b],
            &params.residue_policy,
            &params.atom_policy,
            entry_a,
            entry_b,
        )?;
        let required = params.min_common_residues.max(1);
        if common.len() < required {
            return Err(SuperposeError::TooFewCommonCoords {
                entry_a,
                entry_b,
                found: common.len(),
                required,
            });
        }
        let (coords_a, coords_b) = common.into_pair();
        direct_rmsds.push(fit_second_to_first(&coords_a, &coords_b)?.rmsd);
        pairs.push(IndexedCoordPair::new(entry_a, entry_b, coords_a, coords_b));
    }

    let superposition = Superposition::from_tree_edges(proteins.len(), &pairs)?;

    for (pair, direct) in pairs.iter().zip(direct_rmsds) {
        let composed = superposition.rmsd_between_superposed_entries(
            pair.entry_a,
            &pair.coords_a,
            pair.entry_b,
            &pair.coords_b,
        )?;
        if !params.rmsds_agree(composed, direct) {
            log::warn!(
                "Superposed RMSD between {} and {} is {:.4}, but the direct pairwise RMSD is {:.4}",
                proteins[pair.entry_a].name,
                proteins[pair.entry_b].name,
                composed,
                direct
            );
        }
    }
    Ok(superposition)
}

/// Superpose `proteins`: acquire an alignment, choose a spanning tree and compose the transforms
pub fn superpose(
    acquirer: &AlignmentAcquirer,
    proteins: Vec<Protein>,
    names: Vec<String>,
    params: &SuperposeParams,
) -> SuperposeResult<SuperpositionContext> {
    params.validate()?;
    if names.len() != proteins.len() {
        return Err(SuperposeError::NameCountMismatch {
            names: names.len(),
            structures: proteins.len(),
        });
    }
    let (alignment, spanning_tree) = get_alignment_and_spanning_tree(acquirer, &proteins, params)?;
    let superposition = compose_superposition(&alignment, &proteins, &spanning_tree, params)?;
    log::info!(
        "Superposed {} structures using {} and {}",
        proteins.len(),
        params.residue_policy,
        params.atom_policy
    );
    SuperpositionContext::new(proteins, names, superposition, Some(alignment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lin_alg::f64::Vec3;
    use polysup_align::CommonResiduePolicy;
    use polysup_mol::{Residue, ResidueId};

    fn protein(name: &str, coords: &[Vec3]) -> Protein {
        let residues = coords
            .iter()
            .enumerate()
            .map(|(i, coord)| Residue::with_ca(ResidueId::new('A', i as i32 + 1, None), 'G', *coord))
            .collect();
        Protein::new(name, residues)
    }

    fn coords() -> Vec<Vec3> {
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(3.8, 0.0, 0.0),
            Vec3::new(5.0, 3.5, 0.0),
            Vec3::new(4.0, 5.0, 3.0),
        ]
    }

    #[test]
    fn test_compose_translated_pair() {
        let a = coords();
        let b: Vec<Vec3> = a.iter().map(|c| *c + Vec3::new(5.0, 0.0, 0.0)).collect();
        let proteins = vec![protein("a", &a), protein("b", &b)];
        let alignment = Alignment::from_positions(vec![
            (0..4).map(Some).collect(),
            (0..4).map(Some).collect(),
        ])
        .unwrap();
        let superposition =
            compose_superposition(&alignment, &proteins, &[(0, 1)], &SuperposeParams::default()).unwrap();
        let t1 = superposition.translation(1).unwrap();
        assert!((t1 - Vec3::new(-5.0, 0.0, 0.0)).magnitude() < 1e-9);
    }

    #[test]
    fn test_too_few_common_coords() {
        let a = coords();
        let proteins = vec![protein("a", &a), protein("b", &a)];
        let alignment = Alignment::from_positions(vec![
            vec![Some(0), Some(1), Some(2), Some(3), None],
            vec![None, None, Some(0), Some(1), Some(2)],
        ])
        .unwrap();
        let result = compose_superposition(&alignment, &proteins, &[(0, 1)], &SuperposeParams::default());
        assert!(matches!(
            result,
            Err(SuperposeError::TooFewCommonCoords { found: 2, required: 3, .. })
        ));
    }

    #[test]
    fn test_score_policy_on_unscored_alignment_fails() {
        let a = coords();
        let proteins = vec![protein("a", &a), protein("b", &a)];
        let alignment = Alignment::from_positions(vec![
            (0..4).map(Some).collect(),
            (0..4).map(Some).collect(),
        ])
        .unwrap();
        let params = SuperposeParams {
            residue_policy: CommonResiduePolicy::MinScore { min_score: 10.0 },
            ..SuperposeParams::default()
        };
        assert!(matches!(
            compose_superposition(&alignment, &proteins, &[(0, 1)], &params),
            Err(SuperposeError::Align(_))
        ));
    }
}
