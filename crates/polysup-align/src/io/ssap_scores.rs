//! SSAP scores file reader
//!
//! One line per comparison, whitespace separated:
//!
//! ```text
//! 1cukA01  1hjp001  48  44  94.26  44  91.67  95  0.53
//! name_1   name_2   len len score  aligned overlap% seq_id% rmsd
//! ```

use std::io::BufRead;

use super::parse_number;
use crate::{AlignError, AlignResult};

const MIN_FIELDS: usize = 5;

/// One pairwise comparison from a SSAP scores file
#[derive(Debug, Clone, PartialEq)]
pub struct SsapScoreEntry {
    pub name_1: String,
    pub name_2: String,
    pub length_1: usize,
    pub length_2: usize,
    pub ssap_score: f64,
    pub num_aligned: Option<usize>,
    pub overlap_pct: Option<f64>,
    pub seq_id_pct: Option<f64>,
    pub rmsd: Option<f64>,
}

/// Read all comparisons from a SSAP scores file. Blank lines are skipped.
pub fn read_ssap_scores_file<R: BufRead>(reader: R) -> AlignResult<Vec<SsapScoreEntry>> {
    let mut entries = Vec::new();
    for (line_index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = line_index + 1;
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        if fields.len() < MIN_FIELDS {
            return Err(AlignError::parse(
                line_number,
                format!("SSAP scores line has {} fields, need at least {}", fields.len(), MIN_FIELDS),
            ));
        }
        let optional = |index: usize, what: &str| -> AlignResult<Option<f64>> {
            fields
                .get(index)
                .map(|text| parse_number::<f64>(text, line_number, what))
                .transpose()
        };
        entries.push(SsapScoreEntry {
            name_1: fields[0].to_string(),
            name_2: fields[1].to_string(),
            length_1: parse_number(fields[2], line_number, "length")?,
            length_2: parse_number(fields[3], line_number, "length")?,
            ssap_score: parse_number(fields[4], line_number, "SSAP score")?,
            num_aligned: fields
                .get(5)
                .map(|text| parse_number::<usize>(text, line_number, "aligned count"))
                .transpose()?,
            overlap_pct: optional(6, "overlap")?,
            seq_id_pct: optional(7, "sequence identity")?,
            rmsd: optional(8, "RMSD")?,
        });
    }
    Ok(entries)
}

/// Scores between the named structures, as `(index_1, index_2, ssap_score)`.
///
/// Comparisons involving other structures are ignored, as are comparisons
/// of a structure with itself.
pub fn scores_between(entries: &[SsapScoreEntry], names: &[String]) -> Vec<(usize, usize, f64)> {
    let index_of = |name: &str| names.iter().position(|n| n == name);
    entries
        .iter()
        .filter_map(|entry| {
            let i = index_of(&entry.name_1)?;
            let j = index_of(&entry.name_2)?;
            (i != j).then_some((i, j, entry.ssap_score))
        })
        .collect()
}
