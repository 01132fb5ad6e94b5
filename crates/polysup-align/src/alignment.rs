//! Alignment data model
//!
//! An alignment records, for each of `num_entries` structures and each of
//! `length` alignment indices ("columns"), either nothing or the position
//! (residue offset) of that entry's residue in that column.
//!
//! Positions are built with an [`AlignmentBuilder`], which is consumed to
//! produce an [`Alignment`]. Scores can be attached to an `Alignment`
//! once; after that its positions cannot be changed, since
//! [`Alignment::into_builder`] refuses scored alignments.

use std::fmt;

use crate::scores::AlignmentResidueScores;
use crate::{AlignError, AlignResult};

type PositionTable = Vec<Vec<Option<usize>>>;

fn check_entry(entry: usize, num_entries: usize) -> AlignResult<()> {
    if entry >= num_entries {
        return Err(AlignError::EntryOutOfRange { entry, num_entries });
    }
    Ok(())
}

/// Mutable position table used to construct an [`Alignment`]
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentBuilder {
    positions: PositionTable,
    length: usize,
}

impl AlignmentBuilder {
    /// Create an empty (zero-length) builder for `num_entries` entries
    pub fn new(num_entries: usize) -> AlignResult<Self> {
        AlignmentBuilder::with_length(num_entries, 0)
    }

    /// Create a builder of the given length with every position absent
    pub fn with_length(num_entries: usize, length: usize) -> AlignResult<Self> {
        if num_entries == 0 {
            return Err(AlignError::NoEntries);
        }
        Ok(AlignmentBuilder {
            positions: vec![vec![None; length]; num_entries],
            length,
        })
    }

    /// Create a builder from per-entry position lists.
    ///
    /// All lists must have the same length and every index must have at
    /// least one present position.
    pub fn from_positions(positions: PositionTable) -> AlignResult<Self> {
        let length = positions.first().ok_or(AlignError::NoEntries)?.len();
        if let Some(bad) = positions.iter().find(|list| list.len() != length) {
            return Err(AlignError::InconsistentLengths(length, bad.len()));
        }
        if let Some(index) =
            (0..length).find(|&index| positions.iter().all(|list| list[index].is_none()))
        {
            return Err(AlignError::EmptyColumn { index });
        }
        Ok(AlignmentBuilder { positions, length })
    }

    /// Number of entries
    pub fn num_entries(&self) -> usize {
        self.positions.len()
    }

    /// Number of alignment indices
    pub fn length(&self) -> usize {
        self.length
    }

    /// Position of an entry at an index, if present
    pub fn position_of(&self, entry: usize, index: usize) -> Option<usize> {
        self.positions
            .get(entry)
            .and_then(|list| list.get(index))
            .copied()
            .flatten()
    }

    /// Set the position of an entry at an index.
    ///
    /// `index` may equal the current length, in which case a new index is
    /// appended with all other entries absent.
    pub fn set_position(&mut self, entry: usize, index: usize, position: usize) -> AlignResult<()> {
        check_entry(entry, self.num_entries())?;
        if index > self.length {
            return Err(AlignError::IndexOutOfRange {
                index,
                length: self.length,
            });
        }
        if index == self.length {
            for list in &mut self.positions {
                list.push(None);
            }
            self.length += 1;
        }
        self.positions[entry][index] = Some(position);
        Ok(())
    }

    /// Append a complete index (one optional position per entry)
    pub fn append_column(&mut self, column: &[Option<usize>]) -> AlignResult<()> {
        if column.len() != self.num_entries() {
            return Err(AlignError::InconsistentLengths(self.num_entries(), column.len()));
        }
        for (list, position) in self.positions.iter_mut().zip(column) {
            list.push(*position);
        }
        self.length += 1;
        Ok(())
    }

    /// Finish building an unscored alignment
    pub fn build(self) -> Alignment {
        Alignment {
            positions: self.positions,
            length: self.length,
            scores: None,
        }
    }

    /// Finish building and attach scores
    pub fn build_scored(self, scores: AlignmentResidueScores) -> AlignResult<Alignment> {
        self.build().with_scores(scores)
    }
}

/// A multi-entry alignment, optionally carrying per-position scores
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    positions: PositionTable,
    length: usize,
    scores: Option<AlignmentResidueScores>,
}

impl Alignment {
    /// Create an alignment directly from per-entry position lists
    pub fn from_positions(positions: PositionTable) -> AlignResult<Self> {
        Ok(AlignmentBuilder::from_positions(positions)?.build())
    }

    /// Number of entries
    pub fn num_entries(&self) -> usize {
        self.positions.len()
    }

    /// Number of alignment indices
    pub fn length(&self) -> usize {
        self.length
    }

    /// Check whether scores are attached
    pub fn is_scored(&self) -> bool {
        self.scores.is_some()
    }

    /// Attached scores
    pub fn scores(&self) -> AlignResult<&AlignmentResidueScores> {
        self.scores.as_ref().ok_or(AlignError::NotScored)
    }

    /// Attach scores, which must match the alignment's shape and only
    /// score present positions.
    pub fn with_scores(mut self, scores: AlignmentResidueScores) -> AlignResult<Self> {
        if self.is_scored() {
            return Err(AlignError::AlreadyScored);
        }
        if scores.num_entries() != self.num_entries() {
            return Err(AlignError::ScoresMismatch(format!(
                "{} score entries for {} alignment entries",
                scores.num_entries(),
                self.num_entries()
            )));
        }
        if scores.length() != self.length {
            return Err(AlignError::ScoresMismatch(format!(
                "scores of length {} for alignment of length {}",
                scores.length(),
                self.length
            )));
        }
        for entry in 0..self.num_entries() {
            for index in 0..self.length {
                if scores.has_score(entry, index) && !self.has_position_of_entry_of_index(entry, index) {
                    return Err(AlignError::ScoresMismatch(format!(
                        "entry {} has a score but no position at index {}",
                        entry, index
                    )));
                }
            }
        }
        self.scores = Some(scores);
        Ok(self)
    }

    /// Attach zero scores at every present position
    pub fn with_empty_scores(self) -> AlignResult<Self> {
        let scores = self
            .positions
            .iter()
            .map(|list| list.iter().map(|p| p.map(|_| 0.0)).collect())
            .collect();
        self.with_scores(AlignmentResidueScores::new(scores)?)
    }

    /// Return to a builder to change positions; fails for scored alignments
    pub fn into_builder(self) -> AlignResult<AlignmentBuilder> {
        if self.is_scored() {
            return Err(AlignError::AlreadyScored);
        }
        Ok(AlignmentBuilder {
            positions: self.positions,
            length: self.length,
        })
    }

    /// Per-index positions of one entry
    pub fn entry_positions(&self, entry: usize) -> AlignResult<&[Option<usize>]> {
        check_entry(entry, self.num_entries())?;
        Ok(&self.positions[entry])
    }

    // ------------------------------------------------------------------
    // Position queries
    // ------------------------------------------------------------------

    /// Position of an entry at an index, if present
    pub fn position_of(&self, entry: usize, index: usize) -> Option<usize> {
        self.positions
            .get(entry)
            .and_then(|list| list.get(index))
            .copied()
            .flatten()
    }

    /// Position of an entry at an index, or an error if absent
    pub fn get_position(&self, entry: usize, index: usize) -> AlignResult<usize> {
        check_entry(entry, self.num_entries())?;
        if index >= self.length {
            return Err(AlignError::IndexOutOfRange {
                index,
                length: self.length,
            });
        }
        self.position_of(entry, index)
            .ok_or(AlignError::PositionAbsent { entry, index })
    }

    pub fn has_position_of_entry_of_index(&self, entry: usize, index: usize) -> bool {
        self.position_of(entry, index).is_some()
    }

    pub fn has_position_of_both_entries_of_index(&self, entry_a: usize, entry_b: usize, index: usize) -> bool {
        self.has_position_of_entry_of_index(entry_a, index)
            && self.has_position_of_entry_of_index(entry_b, index)
    }

    pub fn has_position_of_all_entries_of_index(&self, index: usize) -> bool {
        (0..self.num_entries()).all(|entry| self.has_position_of_entry_of_index(entry, index))
    }

    /// Check whether an entry has any position in `begin..end`
    pub fn has_positions_of_entry_in_index_range(&self, entry: usize, begin: usize, end: usize) -> bool {
        (begin..end.min(self.length)).any(|index| self.has_position_of_entry_of_index(entry, index))
    }

    /// Entries with a position at an index
    pub fn entries_present_at_index(&self, index: usize) -> Vec<usize> {
        (0..self.num_entries())
            .filter(|&entry| self.has_position_of_entry_of_index(entry, index))
            .collect()
    }

    /// Entries with a position anywhere in `begin..end`
    pub fn entries_present_in_index_range(&self, begin: usize, end: usize) -> Vec<usize> {
        (0..self.num_entries())
            .filter(|&entry| self.has_positions_of_entry_in_index_range(entry, begin, end))
            .collect()
    }

    pub fn num_present_positions_of_index(&self, index: usize) -> usize {
        self.entries_present_at_index(index).len()
    }

    /// Present positions of an entry, in index order
    pub fn present_positions_of_entry(&self, entry: usize) -> Vec<usize> {
        self.positions
            .get(entry)
            .map(|list| list.iter().flatten().copied().collect())
            .unwrap_or_default()
    }

    pub fn num_present_positions_of_entry(&self, entry: usize) -> usize {
        self.positions
            .get(entry)
            .map_or(0, |list| list.iter().filter(|p| p.is_some()).count())
    }

    /// Number of present positions of every entry
    pub fn num_present_positions_by_entry(&self) -> Vec<usize> {
        (0..self.num_entries())
            .map(|entry| self.num_present_positions_of_entry(entry))
            .collect()
    }

    /// Number of present entries at every index
    pub fn num_present_positions_by_index(&self) -> Vec<usize> {
        (0..self.length)
            .map(|index| self.num_present_positions_of_index(index))
            .collect()
    }

    pub fn first_present_index_of_entry(&self, entry: usize) -> Option<usize> {
        (0..self.length).find(|&index| self.has_position_of_entry_of_index(entry, index))
    }

    pub fn last_present_index_of_entry(&self, entry: usize) -> Option<usize> {
        (0..self.length).rev().find(|&index| self.has_position_of_entry_of_index(entry, index))
    }

    pub fn first_present_index_of_both_entries(&self, entry_a: usize, entry_b: usize) -> Option<usize> {
        (0..self.length).find(|&index| self.has_position_of_both_entries_of_index(entry_a, entry_b, index))
    }

    pub fn last_present_index_of_both_entries(&self, entry_a: usize, entry_b: usize) -> Option<usize> {
        (0..self.length)
            .rev()
            .find(|&index| self.has_position_of_both_entries_of_index(entry_a, entry_b, index))
    }

    /// First index at which any entry is present
    pub fn first_present_index(&self) -> Option<usize> {
        (0..self.length).find(|&index| self.num_present_positions_of_index(index) > 0)
    }

    /// Last index at which any entry is present
    pub fn last_present_index(&self) -> Option<usize> {
        (0..self.length).rev().find(|&index| self.num_present_positions_of_index(index) > 0)
    }

    pub fn first_present_position_of_entry(&self, entry: usize) -> Option<usize> {
        self.first_present_index_of_entry(entry)
            .and_then(|index| self.position_of(entry, index))
    }

    pub fn last_present_position_of_entry(&self, entry: usize) -> Option<usize> {
        self.last_present_index_of_entry(entry)
            .and_then(|index| self.position_of(entry, index))
    }

    /// Largest last-present position over all entries
    pub fn max_last_present_position(&self) -> Option<usize> {
        (0..self.num_entries())
            .filter_map(|entry| self.last_present_position_of_entry(entry))
            .max()
    }

    pub fn num_positions_with_both_entries(&self, entry_a: usize, entry_b: usize) -> usize {
        (0..self.length)
            .filter(|&index| self.has_position_of_both_entries_of_index(entry_a, entry_b, index))
            .count()
    }

    pub fn num_positions_with_all_entries(&self) -> usize {
        (0..self.length)
            .filter(|&index| self.has_position_of_all_entries_of_index(index))
            .count()
    }

    /// First place where an entry's present positions are not consecutive.
    ///
    /// Returns `(entry, index, previous_position, next_position)`.
    pub fn first_non_consecutive_entry_positions(&self) -> Option<(usize, usize, usize, usize)> {
        for (entry, list) in self.positions.iter().enumerate() {
            let mut previous: Option<usize> = None;
            for (index, position) in list.iter().enumerate() {
                if let Some(position) = *position {
                    if let Some(prev) = previous {
                        if position != prev + 1 {
                            return Some((entry, index, prev, position));
                        }
                    }
                    previous = Some(position);
                }
            }
        }
        None
    }

    /// Fail if any entry's present positions are not consecutive
    pub fn check_entry_positions_are_consecutive(&self) -> AlignResult<()> {
        match self.first_non_consecutive_entry_positions() {
            Some((entry, index, previous, next)) => Err(AlignError::NonConsecutivePositions {
                entry,
                index,
                previous,
                next,
            }),
            None => Ok(()),
        }
    }

    // ------------------------------------------------------------------
    // Score queries
    // ------------------------------------------------------------------

    /// Score of an entry at an index (`None` if that cell is unscored)
    pub fn score_of(&self, entry: usize, index: usize) -> AlignResult<Option<f64>> {
        Ok(self.scores()?.score(entry, index))
    }

    /// Mean of two entries' scores at an index; missing scores count as zero
    pub fn pair_score_of_index(&self, entry_a: usize, entry_b: usize, index: usize) -> AlignResult<f64> {
        let scores = self.scores()?;
        let a = scores.score(entry_a, index).unwrap_or(0.0);
        let b = scores.score(entry_b, index).unwrap_or(0.0);
        Ok((a + b) / 2.0)
    }

    /// Sum of all entries' scores at an index
    pub fn total_score_of_index(&self, index: usize) -> AlignResult<f64> {
        let scores = self.scores()?;
        Ok((0..self.num_entries())
            .filter_map(|entry| scores.score(entry, index))
            .sum())
    }

    /// Mean of the scores present at an index (zero if none)
    pub fn mean_score_of_index(&self, index: usize) -> AlignResult<f64> {
        let num_scored = self.scores()?.num_scored_entries_of_index(index);
        if num_scored == 0 {
            return Ok(0.0);
        }
        Ok(self.total_score_of_index(index)? / num_scored as f64)
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "alignment[{} positions: ", self.length)?;
        for index in 0..self.length {
            if index > 0 {
                write!(f, "; ")?;
            }
            for entry in 0..self.num_entries() {
                if entry > 0 {
                    write!(f, " <-> ")?;
                }
                match self.position_of(entry, index) {
                    Some(position) => write!(f, "{}", position)?,
                    None => write!(f, "-")?,
                }
            }
        }
        write!(f, "]")
    }
}
