//! Readers for alignment and score files
//!
//! - `ssap_legacy`: SSAP pair alignment `.list` files
//! - `cora`: CORA multiple alignment files
//! - `fasta`: gapped FASTA multiple alignments
//! - `ssap_scores`: SSAP pairwise score summaries

pub mod cora;
pub mod fasta;
pub mod ssap_legacy;
pub mod ssap_scores;

pub use cora::read_cora_alignment;
pub use fasta::{align_sequence_to_amino_acids, read_fasta_alignment, read_ids_and_sequences_from_fasta};
pub use ssap_legacy::read_ssap_legacy_alignment;
pub use ssap_scores::{read_ssap_scores_file, scores_between, SsapScoreEntry};

use ahash::AHashMap;
use polysup_mol::Protein;

use crate::{AlignError, AlignResult};

/// Fixed-width field `start..start + len` of an ASCII line
pub(crate) fn field(line: &str, line_number: usize, start: usize, len: usize) -> AlignResult<&str> {
    line.get(start..start + len).ok_or_else(|| {
        AlignError::parse(
            line_number,
            format!("line too short for columns {}..{}: {:?}", start, start + len, line),
        )
    })
}

/// Single character at `index` of an ASCII line
pub(crate) fn char_at(line: &str, line_number: usize, index: usize) -> AlignResult<char> {
    field(line, line_number, index, 1)?
        .chars()
        .next()
        .ok_or_else(|| AlignError::parse(line_number, "missing character"))
}

/// Parse a trimmed numeric field
pub(crate) fn parse_number<T: std::str::FromStr>(
    text: &str,
    line_number: usize,
    what: &str,
) -> AlignResult<T> {
    text.trim()
        .parse::<T>()
        .map_err(|_| AlignError::parse(line_number, format!("invalid {}: {:?}", what, text.trim())))
}

/// Insert code from a column where `blank` means "no insert"
pub(crate) fn insert_code(insert: char, blank: char) -> Option<char> {
    if insert == blank || insert == ' ' {
        None
    } else {
        Some(insert)
    }
}

/// Locates residues named in an alignment file within one protein.
///
/// Alignment files do not record chains, so the protein must lie on one
/// chain. Lookups move forward through the protein: each residue must come
/// after the previously located one. Jumps over residues and amino acids
/// that disagree with the structure are logged.
pub(crate) struct ResidueLocator<'a> {
    protein: &'a Protein,
    /// Indices of each (number, insert code), ascending
    indices: AHashMap<(i32, Option<char>), Vec<usize>>,
    single_chain: bool,
    next: usize,
    num_mismatches: usize,
}

impl<'a> ResidueLocator<'a> {
    pub(crate) fn new(protein: &'a Protein) -> Self {
        let mut indices: AHashMap<(i32, Option<char>), Vec<usize>> = AHashMap::new();
        for (index, residue) in protein.iter().enumerate() {
            indices
                .entry((residue.id.number, residue.id.insert))
                .or_default()
                .push(index);
        }
        let single_chain = protein
            .residues()
            .first()
            .map_or(true, |first| protein.iter().all(|r| r.id.chain == first.id.chain));
        ResidueLocator {
            protein,
            indices,
            single_chain,
            next: 0,
            num_mismatches: 0,
        }
    }

    /// Number of located residues whose amino acid disagreed with the file
    pub(crate) fn num_mismatches(&self) -> usize {
        self.num_mismatches
    }

    /// Warn once with the total number of amino-acid mismatches
    pub(crate) fn warn_on_mismatches(&self) {
        if self.num_mismatches() > 0 {
            log::warn!(
                "{} residue(s) of {} have a different amino acid in the alignment file",
                self.num_mismatches(),
                self.protein.name
            );
        }
    }

    /// Locate the residue `number`/`insert` after the previous one.
    ///
    /// Returns `None` for an absent residue (amino acid `'0'`); a present
    /// residue that cannot be found is an error.
    pub(crate) fn locate(
        &mut self,
        amino_acid: char,
        number: i32,
        insert: Option<char>,
        line_number: usize,
    ) -> AlignResult<Option<usize>> {
        if amino_acid == '0' {
            return Ok(None);
        }
        if !self.single_chain {
            return Err(AlignError::parse(
                line_number,
                "residues span multiple chains but the alignment format has no chain labels",
            ));
        }
        let from = self.next;
        let found = self
            .indices
            .get(&(number, insert))
            .and_then(|indices| indices.get(indices.partition_point(|&index| index < from)))
            .copied()
            .ok_or_else(|| {
                AlignError::parse(
                    line_number,
                    format!(
                        "unable to find residue {}{} of {} from position {}",
                        number,
                        insert.map(String::from).unwrap_or_default(),
                        self.protein.name,
                        from
                    ),
                )
            })?;

        let protein = self.protein;
        let residue = &protein.residues()[found];
        if found > from {
            log::warn!(
                "Missing some residues whilst loading alignment: jumped {} position(s) to residue {} of {}",
                found - from,
                residue.id,
                protein.name
            );
        }
        if !residue.amino_acid.eq_ignore_ascii_case(&amino_acid) {
            self.num_mismatches += 1;
            log::warn!(
                "Alignment file has amino acid '{}' for residue {} of {}, but the structure has '{}'",
                amino_acid,
                residue.id,
                protein.name,
                residue.amino_acid
            );
        }
        self.next = found + 1;
        Ok(Some(found))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use lin_alg::f64::Vec3;
    use polysup_mol::{Residue, ResidueId};

    fn protein(residues: &[(char, i32, Option<char>, char)]) -> Protein {
        let residues = residues
            .iter()
            .map(|&(chain, number, insert, aa)| {
                Residue::with_ca(ResidueId::new(chain, number, insert), aa, Vec3::new(number as f64, 0.0, 0.0))
            })
            .collect();
        Protein::new("p", residues)
    }

    fn chain_a() -> Protein {
        protein(&[
            ('A', 1, None, 'M'),
            ('A', 2, None, 'K'),
            ('A', 2, Some('A'), 'G'),
            ('A', 5, None, 'L'),
        ])
    }

    #[test]
    fn test_fields() {
        let line = "  12 abc";
        assert_eq!(field(line, 1, 0, 4).unwrap(), "  12");
        assert_eq!(char_at(line, 1, 5).unwrap(), 'a');
        assert!(field(line, 1, 6, 4).is_err());
        assert_eq!(parse_number::<i32>(" 12 ", 1, "number").unwrap(), 12);
        assert!(parse_number::<i32>("x", 1, "number").is_err());
    }

    #[test]
    fn test_insert_code() {
        assert_eq!(insert_code('0', '0'), None);
        assert_eq!(insert_code(' ', '0'), None);
        assert_eq!(insert_code('A', '0'), Some('A'));
    }

    #[test]
    fn test_locate_moves_forward() {
        let protein = chain_a();
        let mut locator = ResidueLocator::new(&protein);
        assert_eq!(locator.locate('G', 2, Some('A'), 1).unwrap(), Some(2));
        assert_eq!(locator.locate('0', 2, None, 2).unwrap(), None);
        assert_eq!(locator.locate('L', 5, None, 3).unwrap(), Some(3));
        // Residue 1 lies before the previous match
        assert!(locator.locate('M', 1, None, 4).is_err());
        assert_eq!(locator.num_mismatches(), 0);
    }

    #[test]
    fn test_locate_counts_amino_acid_mismatches() {
        let protein = chain_a();
        let mut locator = ResidueLocator::new(&protein);
        assert_eq!(locator.locate('m', 1, None, 1).unwrap(), Some(0));
        assert_eq!(locator.locate('W', 2, None, 2).unwrap(), Some(1));
        assert_eq!(locator.num_mismatches(), 1);
    }

    #[test]
    fn test_locate_rejects_multiple_chains() {
        let protein = protein(&[('A', 1, None, 'M'), ('B', 1, None, 'M')]);
        let mut locator = ResidueLocator::new(&protein);
        assert_eq!(locator.locate('0', 1, None, 1).unwrap(), None);
        assert!(locator.locate('M', 1, None, 2).is_err());
    }
}
