//! Residue identifiers and residue data
//!
//! A residue is identified by its chain label, residue number and optional
//! insert code, matching the way PDB-derived alignment files refer to residues.

use std::fmt;
use std::str::FromStr;

use lin_alg::f64::Vec3;
use phf::phf_map;
use serde::{Deserialize, Serialize};

use crate::error::{MolError, MolResult};

/// One-letter code used for residues with no known amino-acid mapping
pub const UNKNOWN_AMINO_ACID: char = 'X';

/// Name of the alpha-carbon atom
pub const CA_ATOM: &str = "CA";

/// Name of the beta-carbon atom
pub const CB_ATOM: &str = "CB";

/// Identifier for a residue within a protein
///
/// Ordering is by chain, then number, then insert code (no insert first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResidueId {
    /// Chain label
    pub chain: char,
    /// Residue sequence number
    pub number: i32,
    /// Insertion code
    pub insert: Option<char>,
}

impl ResidueId {
    /// Create a new residue identifier
    pub fn new(chain: char, number: i32, insert: Option<char>) -> Self {
        ResidueId {
            chain,
            number,
            insert,
        }
    }

    /// Create an identifier for chain `chain` from residue-name text such as `"12"` or `"12B"`
    pub fn parse_with_chain(chain: char, text: &str) -> MolResult<Self> {
        let text = text.trim();
        let (digits, insert) = match text.chars().last() {
            Some(last) if last.is_ascii_alphabetic() => (&text[..text.len() - 1], Some(last)),
            Some(_) => (text, None),
            None => return Err(MolError::InvalidResidueId(text.to_string())),
        };
        let number = digits
            .parse::<i32>()
            .map_err(|_| MolError::InvalidResidueId(text.to_string()))?;
        Ok(ResidueId::new(chain, number, insert))
    }

    /// Residue number and insert code without the chain, e.g. `"12B"`
    pub fn name_without_chain(&self) -> String {
        match self.insert {
            Some(insert) => format!("{}{}", self.number, insert),
            None => self.number.to_string(),
        }
    }
}

impl fmt::Display for ResidueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chain, self.name_without_chain())
    }
}

impl FromStr for ResidueId {
    type Err = MolError;

    /// Parse `"A:12"` or `"A:12B"`
    fn from_str(s: &str) -> MolResult<Self> {
        let (chain, rest) = s
            .split_once(':')
            .ok_or_else(|| MolError::InvalidResidueId(s.to_string()))?;
        let mut chain_chars = chain.chars();
        match (chain_chars.next(), chain_chars.next()) {
            (Some(c), None) => ResidueId::parse_with_chain(c, rest),
            _ => Err(MolError::InvalidResidueId(s.to_string())),
        }
    }
}

/// A single residue: its identifier, one-letter amino-acid code and atoms
#[derive(Debug, Clone)]
pub struct Residue {
    /// Residue identifier
    pub id: ResidueId,
    /// One-letter amino-acid code
    pub amino_acid: char,
    /// Named atom coordinates, in file order
    pub atoms: Vec<(String, Vec3)>,
}

impl Residue {
    /// Create a residue with no atoms
    pub fn new(id: ResidueId, amino_acid: char) -> Self {
        Residue {
            id,
            amino_acid,
            atoms: Vec::new(),
        }
    }

    /// Create a residue holding only an alpha-carbon
    pub fn with_ca(id: ResidueId, amino_acid: char, ca: Vec3) -> Self {
        Residue {
            id,
            amino_acid,
            atoms: vec![(CA_ATOM.to_string(), ca)],
        }
    }

    /// Add a named atom
    pub fn push_atom(&mut self, name: impl Into<String>, coord: Vec3) {
        self.atoms.push((name.into(), coord));
    }

    /// Coordinate of the first atom with the given name
    pub fn atom(&self, name: &str) -> Option<Vec3> {
        self.atoms
            .iter()
            .find(|(atom_name, _)| atom_name == name)
            .map(|(_, coord)| *coord)
    }

    /// Coordinate of an atom, or an error naming the missing atom
    pub fn require_atom(&self, name: &str) -> MolResult<Vec3> {
        self.atom(name).ok_or_else(|| MolError::MissingAtom {
            residue: self.id.to_string(),
            atom: name.to_string(),
        })
    }

    /// Alpha-carbon coordinate
    pub fn ca(&self) -> MolResult<Vec3> {
        self.require_atom(CA_ATOM)
    }

    /// Beta-carbon coordinate, using the alpha-carbon for glycine
    pub fn cb(&self) -> MolResult<Vec3> {
        match self.atom(CB_ATOM) {
            Some(coord) => Ok(coord),
            None if self.amino_acid == 'G' => self.ca(),
            None => Err(MolError::MissingAtom {
                residue: self.id.to_string(),
                atom: CB_ATOM.to_string(),
            }),
        }
    }
}

// ============================================================================
// Amino-acid code table (compile-time perfect hash)
// ============================================================================

static THREE_TO_ONE: phf::Map<&'static str, char> = phf_map! {
    // Standard amino acids
    "ALA" => 'A', "ARG" => 'R', "ASN" => 'N', "ASP" => 'D', "CYS" => 'C',
    "GLN" => 'Q', "GLU" => 'E', "GLY" => 'G', "HIS" => 'H', "ILE" => 'I',
    "LEU" => 'L', "LYS" => 'K', "MET" => 'M', "PHE" => 'F', "PRO" => 'P',
    "SER" => 'S', "THR" => 'T', "TRP" => 'W', "TYR" => 'Y', "VAL" => 'V',
    // Rare genetically encoded
    "SEC" => 'U', "PYL" => 'O',
    // Common modified residues mapped to their parent
    "MSE" => 'M', "FME" => 'M',
    "HID" => 'H', "HIE" => 'H', "HIP" => 'H', "HSD" => 'H', "HSE" => 'H', "HSP" => 'H', "NEP" => 'H',
    "CYX" => 'C', "CSO" => 'C', "CSD" => 'C', "CME" => 'C', "OCS" => 'C', "SMC" => 'C',
    "SEP" => 'S', "TPO" => 'T', "PTR" => 'Y', "TYS" => 'Y',
    "MLY" => 'K', "M3L" => 'K', "KCX" => 'K',
    "HYP" => 'P',
    "ASX" => 'B', "GLX" => 'Z',
    "UNK" => 'X',
};

/// Convert a three-letter residue name to its one-letter amino-acid code
pub fn three_to_one(resn: &str) -> Option<char> {
    THREE_TO_ONE.get(resn.trim()).copied()
}
