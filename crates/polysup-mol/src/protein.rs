//! Protein container
//!
//! A `Protein` is an ordered sequence of residues. Alignment positions are
//! offsets into this sequence.

use ahash::AHashMap;

use lin_alg::f64::Vec3;

use crate::error::{MolError, MolResult};
use crate::residue::{three_to_one, Residue, ResidueId, UNKNOWN_AMINO_ACID};

/// An ordered sequence of residues with a display name
#[derive(Debug, Clone, Default)]
pub struct Protein {
    /// Name of the structure (typically a domain or PDB identifier)
    pub name: String,
    /// Residues in sequence order
    residues: Vec<Residue>,
}

impl Protein {
    /// Create a protein from a list of residues
    pub fn new(name: impl Into<String>, residues: Vec<Residue>) -> Self {
        Protein {
            name: name.into(),
            residues,
        }
    }

    /// Number of residues
    #[inline]
    pub fn len(&self) -> usize {
        self.residues.len()
    }

    /// Check if the protein has no residues
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    /// Get a residue by its offset in the sequence
    pub fn residue(&self, index: usize) -> MolResult<&Residue> {
        self.residues
            .get(index)
            .ok_or_else(|| MolError::ResidueIndexOutOfBounds {
                protein: self.name.clone(),
                index,
                len: self.residues.len(),
            })
    }

    /// All residues in sequence order
    pub fn residues(&self) -> &[Residue] {
        &self.residues
    }

    /// Iterate over residues
    pub fn iter(&self) -> impl Iterator<Item = &Residue> {
        self.residues.iter()
    }

    /// Residue identifiers in sequence order
    pub fn residue_ids(&self) -> Vec<ResidueId> {
        self.residues.iter().map(|residue| residue.id).collect()
    }

    /// Map from residue identifier to sequence offset (first occurrence wins)
    pub fn residue_index_map(&self) -> AHashMap<ResidueId, usize> {
        let mut map = AHashMap::with_capacity(self.residues.len());
        for (index, residue) in self.residues.iter().enumerate() {
            map.entry(residue.id).or_insert(index);
        }
        map
    }

    /// Find the offset of a residue, searching forward from `from` and then wrapping around
    pub fn find_residue(&self, id: &ResidueId, from: usize) -> Option<usize> {
        let start = from.min(self.residues.len());
        self.residues[start..]
            .iter()
            .position(|residue| residue.id == *id)
            .map(|offset| start + offset)
            .or_else(|| {
                self.residues[..start]
                    .iter()
                    .position(|residue| residue.id == *id)
            })
    }

    /// One-letter amino-acid sequence
    pub fn sequence(&self) -> String {
        self.residues.iter().map(|residue| residue.amino_acid).collect()
    }

    /// Alpha-carbon coordinates of all residues
    pub fn ca_coords(&self) -> MolResult<Vec<Vec3>> {
        self.residues.iter().map(Residue::ca).collect()
    }
}

/// Builder that groups per-atom records into residues
///
/// Consecutive atoms that share chain, residue number and insert code are
/// placed in the same residue.
#[derive(Debug)]
pub struct ProteinBuilder {
    name: String,
    residues: Vec<Residue>,
}

impl ProteinBuilder {
    /// Start building a protein with the given name
    pub fn new(name: impl Into<String>) -> Self {
        ProteinBuilder {
            name: name.into(),
            residues: Vec::new(),
        }
    }

    /// Add an atom record
    pub fn add_atom(
        &mut self,
        chain: char,
        number: i32,
        insert: Option<char>,
        resn: &str,
        atom_name: &str,
        coord: Vec3,
    ) -> MolResult<&mut Self> {
        let atom_name = atom_name.trim();
        if atom_name.is_empty() {
            return Err(MolError::OrphanAtom(format!("{}:{}", chain, number)));
        }
        let id = ResidueId::new(chain, number, insert);
        let starts_new_residue = self
            .residues
            .last()
            .map_or(true, |residue| residue.id != id);
        if starts_new_residue {
            let amino_acid = three_to_one(resn).unwrap_or(UNKNOWN_AMINO_ACID);
            self.residues.push(Residue::new(id, amino_acid));
        }
        if let Some(residue) = self.residues.last_mut() {
            residue.push_atom(atom_name, coord);
        }
        Ok(self)
    }

    /// Add a complete residue
    pub fn add_residue(&mut self, residue: Residue) -> &mut Self {
        self.residues.push(residue);
        self
    }

    /// Number of residues added so far
    pub fn len(&self) -> usize {
        self.residues.len()
    }

    /// Check if no residues have been added
    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    /// Finish building
    pub fn build(self) -> Protein {
        Protein::new(self.name, self.residues)
    }
}
