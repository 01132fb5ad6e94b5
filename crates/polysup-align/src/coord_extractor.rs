//! Extraction of matched coordinates from an alignment
//!
//! For a pair of entries, the residue policy picks the common indices and
//! the atom policy picks one coordinate from each aligned residue. The
//! resulting lists are parallel: element k of one corresponds to element k
//! of the other.

use lin_alg::f64::Vec3;

use polysup_mol::Protein;

use crate::alignment::Alignment;
use crate::policy::{CommonAtomPolicy, CommonResiduePolicy};
use crate::AlignResult;

/// Parallel coordinate lists for two entries
#[derive(Debug, Clone, Default)]
pub struct CommonCoords {
    pub coords_a: Vec<Vec3>,
    pub coords_b: Vec<Vec3>,
}

impl CommonCoords {
    /// Number of coordinate pairs
    pub fn len(&self) -> usize {
        self.coords_a.len()
    }

    /// Check if there are no coordinate pairs
    pub fn is_empty(&self) -> bool {
        self.coords_a.is_empty()
    }

    /// Split into the two lists
    pub fn into_pair(self) -> (Vec<Vec3>, Vec<Vec3>) {
        (self.coords_a, self.coords_b)
    }
}

/// Positions of the common residues of two entries, as `(position_a, position_b)` pairs
pub fn get_common_residues(
    alignment: &Alignment,
    residue_policy: &CommonResiduePolicy,
    entry_a: usize,
    entry_b: usize,
) -> AlignResult<Vec<(usize, usize)>> {
    residue_policy
        .select_common_residues(alignment, entry_a, entry_b)?
        .into_iter()
        .map(|index| {
            Ok((
                alignment.get_position(entry_a, index)?,
                alignment.get_position(entry_b, index)?,
            ))
        })
        .collect()
}

/// Matched coordinates of two entries' common residues.
///
/// A recorded position outside a protein's residue range is an error.
/// No common residues gives empty lists.
pub fn get_common_coords(
    alignment: &Alignment,
    protein_a: &Protein,
    protein_b: &Protein,
    residue_policy: &CommonResiduePolicy,
    atom_policy: &CommonAtomPolicy,
    entry_a: usize,
    entry_b: usize,
) -> AlignResult<CommonCoords> {
    let common = get_common_residues(alignment, residue_policy, entry_a, entry_b)?;
    let mut coords = CommonCoords {
        coords_a: Vec::with_capacity(common.len()),
        coords_b: Vec::with_capacity(common.len()),
    };
    for (position_a, position_b) in common {
        let residue_a = protein_a.residue(position_a)?;
        let residue_b = protein_b.residue(position_b)?;
        let (coord_a, coord_b) = atom_policy.atom_coords(residue_a, residue_b)?;
        coords.coords_a.push(coord_a);
        coords.coords_b.push(coord_b);
    }
    Ok(coords)
}
