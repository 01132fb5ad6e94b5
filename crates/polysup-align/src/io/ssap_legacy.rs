//! SSAP legacy pair alignment (`.list`) reader
//!
//! Each line describes one alignment index in fixed columns:
//!
//! ```text
//!   columns  0..4   residue number in protein A
//!   column   7      insert code of A ('0' for none)
//!   column   9      amino acid of A ('0' if absent)
//!   columns 12..15  SSAP residue score (0-100)
//!   column  17      amino acid of B ('0' if absent)
//!   column  19      insert code of B ('0' for none)
//!   columns 23..27  residue number in protein B
//! ```

use std::io::BufRead;

use polysup_mol::Protein;

use super::{char_at, field, insert_code, parse_number, ResidueLocator};
use crate::alignment::{Alignment, AlignmentBuilder};
use crate::scores::AlignmentResidueScores;
use crate::{AlignError, AlignResult};

/// Read a SSAP legacy pair alignment of `protein_a` and `protein_b`.
///
/// Residues are located by number and insert code. Indices where both
/// residues are present get the line's score on both entries; other
/// indices are unscored.
pub fn read_ssap_legacy_alignment<R: BufRead>(
    reader: R,
    protein_a: &Protein,
    protein_b: &Protein,
) -> AlignResult<Alignment> {
    let mut builder = AlignmentBuilder::new(2)?;
    let mut scores: [Vec<Option<f64>>; 2] = [Vec::new(), Vec::new()];
    let mut locator_a = ResidueLocator::new(protein_a);
    let mut locator_b = ResidueLocator::new(protein_b);

    for (line_index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = line_index + 1;
        if line.trim().is_empty() {
            continue;
        }
        if !line.is_ascii() {
            return Err(AlignError::parse(line_number, "non-ASCII characters in alignment line"));
        }

        let number_a: i32 = parse_number(field(&line, line_number, 0, 4)?, line_number, "residue number")?;
        let insert_a = char_at(&line, line_number, 7)?;
        let amino_acid_a = char_at(&line, line_number, 9)?;
        let score: u32 = parse_number(field(&line, line_number, 12, 3)?, line_number, "score")?;
        let amino_acid_b = char_at(&line, line_number, 17)?;
        let insert_b = char_at(&line, line_number, 19)?;
        let number_b: i32 = parse_number(field(&line, line_number, 23, 4)?, line_number, "residue number")?;

        let found_a = locator_a.locate(amino_acid_a, number_a, insert_code(insert_a, '0'), line_number)?;
        let found_b = locator_b.locate(amino_acid_b, number_b, insert_code(insert_b, '0'), line_number)?;

        if found_a.is_none() && found_b.is_none() {
            return Err(AlignError::parse(
                line_number,
                "alignment line has neither residue populated",
            ));
        }
        let score = (found_a.is_some() && found_b.is_some()).then_some(f64::from(score));
        builder.append_column(&[found_a, found_b])?;
        for (entry_scores, found) in scores.iter_mut().zip([found_a, found_b]) {
            entry_scores.push(found.and(score));
        }
    }

    locator_a.warn_on_mismatches();
    locator_b.warn_on_mismatches();
    let [scores_a, scores_b] = scores;
    builder.build_scored(AlignmentResidueScores::new(vec![scores_a, scores_b])?)
}
