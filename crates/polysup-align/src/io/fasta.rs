//! Gapped FASTA multiple alignment reader

use std::io::Read;

use needletail::parse_fastx_reader;
use polysup_mol::Protein;

use crate::alignment::{Alignment, AlignmentBuilder};
use crate::{AlignError, AlignResult};

/// Minimum fraction of a structure's residues that its sequence must cover
pub const MIN_FRAC_OF_RESIDUES_IN_SEQUENCE: f64 = 0.7;

const GAP: char = '-';

/// Parse FASTA records into `(id, sequence)` pairs.
///
/// Whitespace inside sequences is removed and letters are converted to
/// upper case. Only letters and `-` are accepted in sequences.
pub fn read_ids_and_sequences_from_fasta<R: Read + Send + 'static>(
    reader: R,
) -> AlignResult<Vec<(String, String)>> {
    let mut parser = parse_fastx_reader(reader).map_err(|e| AlignError::Fasta(e.to_string()))?;
    let mut records = Vec::new();
    while let Some(record) = parser.next() {
        let record = record.map_err(|e| AlignError::Fasta(e.to_string()))?;
        let number = records.len() + 1;
        let id = std::str::from_utf8(record.id())
            .map_err(|e| AlignError::Fasta(format!("record {} has an invalid ID: {}", number, e)))?;
        if id.is_empty() {
            return Err(AlignError::Fasta(format!(
                "record {} has no characters after '>'",
                number
            )));
        }
        if id.chars().any(char::is_control) {
            return Err(AlignError::Fasta(format!(
                "header of record {} contains non-printing characters",
                number
            )));
        }

        let mut sequence = String::with_capacity(record.seq().len());
        for &byte in record.seq().iter().filter(|b| !b.is_ascii_whitespace()) {
            let c = char::from(byte);
            if !(c.is_ascii_alphabetic() || c == GAP) {
                return Err(AlignError::Fasta(format!(
                    "sequence of {} contains {:?}, which is neither a letter nor '-'",
                    id, c
                )));
            }
            sequence.push(c.to_ascii_uppercase());
        }
        records.push((id.to_string(), sequence));
    }
    Ok(records)
}

/// Map a gapped sequence onto a structure's amino acids.
///
/// Each letter is matched to the next residue with the same amino acid;
/// residues passed over are missing from the sequence and are reported
/// with a warning. Running out of residues is an error, as is skipping
/// more than `1 - MIN_FRAC_OF_RESIDUES_IN_SEQUENCE` of the structure.
pub fn align_sequence_to_amino_acids(
    sequence: &str,
    amino_acids: &[char],
    name: &str,
) -> AlignResult<Vec<Option<usize>>> {
    let mut positions = Vec::with_capacity(sequence.len());
    let mut skipped = Vec::new();
    let mut next = 0usize;

    for (offset, letter) in sequence.chars().enumerate() {
        if letter == GAP {
            positions.push(None);
            continue;
        }
        while next < amino_acids.len() && !amino_acids[next].eq_ignore_ascii_case(&letter) {
            skipped.push(next);
            next += 1;
        }
        if next >= amino_acids.len() {
            return Err(AlignError::Fasta(format!(
                "could not match '{}' at character {} of the sequence for {:?} to a residue",
                letter,
                offset + 1,
                name
            )));
        }
        positions.push(Some(next));
        next += 1;
    }

    // Residues after the last match count as covered
    let num_found = amino_acids.len() - skipped.len();
    if !amino_acids.is_empty() {
        let fraction = num_found as f64 / amino_acids.len() as f64;
        if fraction < MIN_FRAC_OF_RESIDUES_IN_SEQUENCE {
            return Err(AlignError::Fasta(format!(
                "sequence for {:?} only covers {} of its {} residues",
                name,
                num_found,
                amino_acids.len()
            )));
        }
    }
    if !skipped.is_empty() {
        log::warn!(
            "Sequence for {:?} is missing {} of its {} residues (indices {:?})",
            name,
            skipped.len(),
            amino_acids.len(),
            skipped
        );
    }
    Ok(positions)
}

/// Read a gapped FASTA alignment of `proteins`, one record per protein in order.
///
/// Each record's header ID must contain its protein's name, ignoring case.
/// All sequences must have the same length. Columns in which every
/// sequence has a gap carry no information and are dropped.
pub fn read_fasta_alignment<R: Read + Send + 'static>(reader: R, proteins: &[Protein]) -> AlignResult<Alignment> {
    if proteins.is_empty() {
        return Err(AlignError::NoEntries);
    }
    let records = read_ids_and_sequences_from_fasta(reader)?;
    if records.len() != proteins.len() {
        return Err(AlignError::Fasta(format!(
            "FASTA input has {} sequences but {} structures were given",
            records.len(),
            proteins.len()
        )));
    }

    let length = records[0].1.len();
    let mut rows = Vec::with_capacity(proteins.len());
    for (entry, ((id, sequence), protein)) in records.iter().zip(proteins).enumerate() {
        if sequence.len() != length {
            return Err(AlignError::Fasta(format!(
                "sequence {} ({}) has length {}, but the first has length {}",
                entry + 1,
                id,
                sequence.len(),
                length
            )));
        }
        if !id.to_lowercase().contains(&protein.name.to_lowercase()) {
            return Err(AlignError::Fasta(format!(
                "name {:?} of entry {} is not found in its FASTA header ID {:?}",
                protein.name,
                entry + 1,
                id
            )));
        }
        let amino_acids: Vec<char> = protein.iter().map(|residue| residue.amino_acid).collect();
        rows.push(align_sequence_to_amino_acids(sequence, &amino_acids, &protein.name)?);
    }

    let mut builder = AlignmentBuilder::new(proteins.len())?;
    let mut num_dropped = 0usize;
    for index in 0..length {
        let column: Vec<Option<usize>> = rows.iter().map(|row| row[index]).collect();
        if column.iter().all(Option::is_none) {
            num_dropped += 1;
            continue;
        }
        builder.append_column(&column)?;
    }
    if num_dropped > 0 {
        log::debug!("Dropped {} all-gap columns from FASTA alignment", num_dropped);
    }
    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lin_alg::f64::Vec3;
    use polysup_mol::{Residue, ResidueId};
    use std::io::Cursor;

    fn protein(name: &str, sequence: &str) -> Protein {
        let residues = sequence
            .chars()
            .enumerate()
            .map(|(i, aa)| Residue::with_ca(ResidueId::new('A', i as i32 + 1, None), aa, Vec3::new(i as f64, 0.0, 0.0)))
            .collect();
        Protein::new(name, residues)
    }

    #[test]
    fn test_read_ids_and_sequences() {
        let text = ">first\nMK-L\n  v e\n>second\nmkqlve\n";
        let records = read_ids_and_sequences_from_fasta(Cursor::new(text)).unwrap();
        assert_eq!(
            records,
            vec![
                ("first".to_string(), "MK-LVE".to_string()),
                ("second".to_string(), "MKQLVE".to_string()),
            ]
        );
    }

    #[test]
    fn test_read_ids_and_sequences_errors() {
        assert!(read_ids_and_sequences_from_fasta(Cursor::new("MKL\n")).is_err());
        assert!(read_ids_and_sequences_from_fasta(Cursor::new(">\nMKL\n")).is_err());
        assert!(read_ids_and_sequences_from_fasta(Cursor::new(">a\nMK1\n")).is_err());
        assert!(read_ids_and_sequences_from_fasta(Cursor::new(">a\nMK\u{7}L\n")).is_err());
    }

    #[test]
    fn test_align_sequence_to_amino_acids() {
        let amino_acids: Vec<char> = "MKQLVE".chars().collect();
        assert_eq!(
            align_sequence_to_amino_acids("MK-QLVE", &amino_acids, "p").unwrap(),
            vec![Some(0), Some(1), None, Some(2), Some(3), Some(4), Some(5)]
        );
        // One skipped residue is tolerated
        assert_eq!(
            align_sequence_to_amino_acids("MKLVE", &amino_acids, "p").unwrap(),
            vec![Some(0), Some(1), Some(3), Some(4), Some(5)]
        );
        // Overrun
        assert!(align_sequence_to_amino_acids("MKQLVEW", &amino_acids, "p").is_err());
        // Four of six residues skipped before the last match
        assert!(align_sequence_to_amino_acids("M--E", &amino_acids, "p").is_err());
    }

    #[test]
    fn test_unmatched_tail_counts_as_covered() {
        let amino_acids: Vec<char> = "MKQLVEWYRS".chars().collect();
        assert_eq!(
            align_sequence_to_amino_acids("MKQLVE", &amino_acids, "p").unwrap(),
            vec![Some(0), Some(1), Some(2), Some(3), Some(4), Some(5)]
        );
        // Skipping the first four of ten leaves 60% coverage
        assert!(align_sequence_to_amino_acids("VEWYRS", &amino_acids, "p").is_err());
    }

    #[test]
    fn test_read_fasta_alignment() {
        let proteins = vec![protein("a", "MKQL"), protein("b", "KQLV")];
        let text = ">a\nMKQL--\n>b\n-KQL-V\n";
        let alignment = read_fasta_alignment(Cursor::new(text), &proteins).unwrap();
        assert_eq!(
            alignment.to_string(),
            "alignment[5 positions: 0 <-> -; 1 <-> 0; 2 <-> 1; 3 <-> 2; - <-> 3]"
        );
        assert!(!alignment.is_scored());
    }

    #[test]
    fn test_header_must_contain_protein_name() {
        let proteins = vec![protein("alpha", "AAAAA"), protein("beta", "AAAAA")];
        let swapped = ">beta\nAAAAA\n>alpha\nAAAAA\n";
        assert!(matches!(
            read_fasta_alignment(Cursor::new(swapped), &proteins),
            Err(AlignError::Fasta(_))
        ));
        let decorated = ">ALPHA01 chopped domain\nAAAAA\n>Beta\nAAAAA\n";
        assert!(read_fasta_alignment(Cursor::new(decorated), &proteins).is_ok());
    }

    #[test]
    fn test_read_fasta_alignment_errors() {
        let proteins = vec![protein("a", "MKQL"), protein("b", "KQLV")];
        assert!(matches!(read_fasta_alignment(Cursor::new(">a\nMKQL\n"), &[]), Err(AlignError::NoEntries)));
        assert!(read_fasta_alignment(Cursor::new(">a\nMKQL\n"), &proteins).is_err());
        assert!(read_fasta_alignment(Cursor::new(">a\nMKQL\n>b\nKQLV-\n"), &proteins).is_err());
    }
}
