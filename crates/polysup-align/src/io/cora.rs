//! CORA multiple alignment reader
//!
//! ```text
//! #FM CORA_FORMAT 1.1
//! #CC any number of comment lines
//! 3
//! 1cnsA0 1hvq00 1jkyA0
//! 194
//!    1    0    1    0  0  0    0  0  0    1B M  0   0 0    0   0  0
//! ```
//!
//! Body lines are fixed width: a 14 character start block (alignment
//! position, template count, number of entries present), one 11 character
//! block per protein (residue number, insert code, amino acid, secondary
//! structure) and an 18 character end block whose last two characters hold
//! the structural conservation score.

use std::io::BufRead;

use polysup_mol::Protein;

use super::{char_at, field, insert_code, parse_number, ResidueLocator};
use crate::alignment::{Alignment, AlignmentBuilder};
use crate::scores::AlignmentResidueScores;
use crate::{AlignError, AlignResult};

const FORMAT_LINE_PREFIX: &str = "#FM CORA_FORMAT ";
const SUPPORTED_VERSION: &str = "1.1";
const LINE_START_WIDTH: usize = 14;
const LINE_PROTEIN_WIDTH: usize = 11;
const LINE_END_WIDTH: usize = 18;

/// Read a CORA alignment of `proteins`.
///
/// The file's protein count must match. Each index's conservation score
/// is attached to every entry present at that index.
pub fn read_cora_alignment<R: BufRead>(reader: R, proteins: &[Protein]) -> AlignResult<Alignment> {
    if proteins.is_empty() {
        return Err(AlignError::NoEntries);
    }
    let mut locators: Vec<ResidueLocator> = proteins.iter().map(ResidueLocator::new).collect();
    let num_proteins = proteins.len();

    let mut lines = reader.lines().enumerate().map(|(i, line)| (i + 1, line));
    let mut next_line = |what: &str| -> AlignResult<(usize, String)> {
        match lines.next() {
            Some((number, line)) => Ok((number, line?)),
            None => Err(AlignError::parse(0, format!("CORA file ends before {}", what))),
        }
    };

    let (line_number, line) = next_line("the format line")?;
    let Some(version) = line.strip_prefix(FORMAT_LINE_PREFIX) else {
        return Err(AlignError::parse(line_number, "no CORA header file format line"));
    };
    if version.trim() != SUPPORTED_VERSION {
        return Err(AlignError::parse(
            line_number,
            format!("unsupported CORA format version {:?}, expected {}", version.trim(), SUPPORTED_VERSION),
        ));
    }

    let (line_number, line) = loop {
        let (line_number, line) = next_line("the protein count")?;
        if !line.starts_with('#') {
            break (line_number, line);
        }
    };
    let file_proteins: usize = parse_number(&line, line_number, "protein count")?;
    if file_proteins != num_proteins {
        return Err(AlignError::parse(
            line_number,
            format!(
                "CORA file has {} proteins but {} were given",
                file_proteins, num_proteins
            ),
        ));
    }

    let (line_number, line) = next_line("the names line")?;
    let num_names = line.split_whitespace().count();
    if num_names != num_proteins {
        return Err(AlignError::parse(
            line_number,
            format!("names line has {} names, expected {}", num_names, num_proteins),
        ));
    }

    let (line_number, line) = next_line("the position count")?;
    let num_positions: usize = parse_number(&line, line_number, "position count")?;
    let line_width = LINE_START_WIDTH + num_proteins * LINE_PROTEIN_WIDTH + LINE_END_WIDTH;

    let mut builder = AlignmentBuilder::new(num_proteins)?;
    let mut index_scores = Vec::with_capacity(num_positions);

    for (line_number, line) in lines {
        let line = line?;
        if line.len() != line_width || !line.is_ascii() {
            return Err(AlignError::parse(
                line_number,
                format!("data line has {} characters, expected {}", line.len(), line_width),
            ));
        }

        let alignment_position: usize =
            parse_number(field(&line, line_number, 0, 4)?, line_number, "alignment position")?;
        if alignment_position != builder.length() + 1 {
            return Err(AlignError::parse(
                line_number,
                format!(
                    "alignment position counter {} does not match {}",
                    alignment_position,
                    builder.length() + 1
                ),
            ));
        }
        let num_present_expected: usize =
            parse_number(field(&line, line_number, 10, 4)?, line_number, "entry count")?;

        let mut column = Vec::with_capacity(num_proteins);
        for (protein, locator) in locators.iter_mut().enumerate() {
            let offset = LINE_START_WIDTH + protein * LINE_PROTEIN_WIDTH;
            let number: i32 =
                parse_number(field(&line, line_number, offset + 1, 4)?, line_number, "residue number")?;
            let insert = char_at(&line, line_number, offset + 5)?;
            let amino_acid = char_at(&line, line_number, offset + 7)?;
            column.push(locator.locate(amino_acid, number, insert_code(insert, ' '), line_number)?);
        }

        let num_present = column.iter().flatten().count();
        if num_present != num_present_expected {
            return Err(AlignError::parse(
                line_number,
                format!(
                    "alignment position {} has {} entries present, not {}",
                    alignment_position, num_present, num_present_expected
                ),
            ));
        }

        let end_offset = LINE_START_WIDTH + num_proteins * LINE_PROTEIN_WIDTH;
        let score: u32 =
            parse_number(field(&line, line_number, end_offset + 16, 2)?, line_number, "conservation score")?;
        builder.append_column(&column)?;
        index_scores.push(f64::from(score));
    }

    if builder.length() != num_positions {
        return Err(AlignError::parse(
            0,
            format!(
                "CORA alignment has {} positions, not {}",
                builder.length(),
                num_positions
            ),
        ));
    }

    for locator in &locators {
        locator.warn_on_mismatches();
    }

    let scores = (0..num_proteins)
        .map(|entry| {
            index_scores
                .iter()
                .enumerate()
                .map(|(index, &score)| builder.position_of(entry, index).map(|_| score))
                .collect()
        })
        .collect();
    builder.build_scored(AlignmentResidueScores::new(scores)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lin_alg::f64::Vec3;
    use polysup_mol::{Residue, ResidueId};
    use std::io::Cursor;

    fn protein(name: &str, residues: &[(i32, char)]) -> Protein {
        let residues = residues
            .iter()
            .map(|&(number, aa)| {
                Residue::with_ca(ResidueId::new('A', number, None), aa, Vec3::new(number as f64, 0.0, 0.0))
            })
            .collect();
        Protein::new(name, residues)
    }

    /// One body line; `None` entries are written as absent
    fn body_line(position: usize, entries: &[Option<(i32, char)>], score: u32) -> String {
        let present = entries.iter().flatten().count();
        let mut line = format!("{:>4} {:>4} {:>4}", position, 0, present);
        for entry in entries {
            let (number, aa) = entry.unwrap_or((0, '0'));
            line.push_str(&format!(" {:>4}  {}  0", number, aa));
        }
        line.push_str(&format!("   0 {:>4} {:>4}  {:>2}", 0, 0, score));
        line
    }

    fn cora_text(names: &[&str], lines: &[String], num_positions: usize) -> String {
        let mut text = format!(
            "#FM CORA_FORMAT 1.1\n#CC a comment\n{}\n{}\n{}\n",
            names.len(),
            names.join(" "),
            num_positions
        );
        for line in lines {
            text.push_str(line);
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_body_line_width() {
        let line = body_line(1, &[Some((1, 'M')), None], 7);
        assert_eq!(line.len(), LINE_START_WIDTH + 2 * LINE_PROTEIN_WIDTH + LINE_END_WIDTH);
    }

    #[test]
    fn test_read_cora_alignment() {
        let proteins = vec![
            protein("p1", &[(1, 'M'), (2, 'K'), (3, 'L')]),
            protein("p2", &[(10, 'K'), (11, 'L')]),
        ];
        let lines = vec![
            body_line(1, &[Some((1, 'M')), None], 0),
            body_line(2, &[Some((2, 'K')), Some((10, 'K'))], 8),
            body_line(3, &[Some((3, 'L')), Some((11, 'L'))], 6),
        ];
        let text = cora_text(&["p1", "p2"], &lines, 3);
        let alignment = read_cora_alignment(Cursor::new(text), &proteins).unwrap();
        assert_eq!(
            alignment.to_string(),
            "alignment[3 positions: 0 <-> -; 1 <-> 0; 2 <-> 1]"
        );
        assert_eq!(alignment.score_of(0, 0).unwrap(), Some(0.0));
        assert_eq!(alignment.score_of(1, 0).unwrap(), None);
        assert_eq!(alignment.score_of(1, 1).unwrap(), Some(8.0));
        assert_eq!(alignment.score_of(0, 2).unwrap(), Some(6.0));
    }

    #[test]
    fn test_amino_acid_mismatch_is_not_fatal() {
        let proteins = vec![protein("p1", &[(1, 'M'), (2, 'K')]), protein("p2", &[(1, 'M'), (2, 'K')])];
        let lines = vec![
            body_line(1, &[Some((1, 'M')), Some((1, 'M'))], 9),
            body_line(2, &[Some((2, 'K')), Some((2, 'R'))], 9),
        ];
        let alignment = read_cora_alignment(Cursor::new(cora_text(&["p1", "p2"], &lines, 2)), &proteins).unwrap();
        assert_eq!(alignment.num_positions_with_all_entries(), 2);
    }

    #[test]
    fn test_errors() {
        let proteins = vec![protein("p1", &[(1, 'M')]), protein("p2", &[(1, 'M')])];
        let good = vec![body_line(1, &[Some((1, 'M')), Some((1, 'M'))], 9)];

        assert!(matches!(
            read_cora_alignment(Cursor::new(cora_text(&["p1", "p2"], &good, 1)), &[]),
            Err(AlignError::NoEntries)
        ));
        let no_header = cora_text(&["p1", "p2"], &good, 1).replacen("#FM", "#XX", 1);
        assert!(read_cora_alignment(Cursor::new(no_header), &proteins).is_err());
        let old_version = cora_text(&["p1", "p2"], &good, 1).replacen("CORA_FORMAT 1.1", "CORA_FORMAT 1.0", 1);
        assert!(matches!(
            read_cora_alignment(Cursor::new(old_version), &proteins),
            Err(AlignError::Parse { line: 1, .. })
        ));
        assert!(read_cora_alignment(Cursor::new(cora_text(&["p1"], &good, 1)), &proteins).is_err());
        assert!(read_cora_alignment(Cursor::new(cora_text(&["p1", "p2"], &good, 2)), &proteins).is_err());

        let bad_counter = vec![body_line(2, &[Some((1, 'M')), Some((1, 'M'))], 9)];
        assert!(read_cora_alignment(Cursor::new(cora_text(&["p1", "p2"], &bad_counter, 1)), &proteins).is_err());

        let truncated = vec![good[0][..good[0].len() - 1].to_string()];
        assert!(read_cora_alignment(Cursor::new(cora_text(&["p1", "p2"], &truncated, 1)), &proteins).is_err());

        let mut bad_count = good[0].clone();
        bad_count.replace_range(10..14, "   1");
        assert!(read_cora_alignment(Cursor::new(cora_text(&["p1", "p2"], &[bad_count], 1)), &proteins).is_err());
    }
}
