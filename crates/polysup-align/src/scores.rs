//! Per-position alignment scores

use serde::{Deserialize, Serialize};

use crate::{AlignError, AlignResult};

/// Scores for each (entry, index) cell of an alignment
///
/// A cell has a score only where the alignment has a position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentResidueScores {
    scores: Vec<Vec<Option<f64>>>,
}

impl AlignmentResidueScores {
    /// Create scores from per-entry lists
    pub fn new(scores: Vec<Vec<Option<f64>>>) -> AlignResult<Self> {
        let first_len = scores.first().ok_or(AlignError::NoEntries)?.len();
        if let Some(bad) = scores.iter().find(|list| list.len() != first_len) {
            return Err(AlignError::InconsistentLengths(first_len, bad.len()));
        }
        if let Some(score) = scores.iter().flatten().flatten().find(|s| !s.is_finite()) {
            return Err(AlignError::ScoresMismatch(format!(
                "score {} is not finite",
                score
            )));
        }
        Ok(AlignmentResidueScores { scores })
    }

    /// Number of entries
    pub fn num_entries(&self) -> usize {
        self.scores.len()
    }

    /// Number of alignment indices
    pub fn length(&self) -> usize {
        self.scores.first().map_or(0, Vec::len)
    }

    /// Score of an entry at an index, if present
    pub fn score(&self, entry: usize, index: usize) -> Option<f64> {
        self.scores
            .get(entry)
            .and_then(|list| list.get(index))
            .copied()
            .flatten()
    }

    /// Check whether an entry has a score at an index
    pub fn has_score(&self, entry: usize, index: usize) -> bool {
        self.score(entry, index).is_some()
    }

    /// Number of entries with a score at an index
    pub fn num_scored_entries_of_index(&self, index: usize) -> usize {
        (0..self.num_entries())
            .filter(|&entry| self.has_score(entry, index))
            .count()
    }

    /// Per-entry score lists
    pub fn entry_scores(&self) -> &[Vec<Option<f64>>] {
        &self.scores
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_checks() {
        assert!(matches!(
            AlignmentResidueScores::new(vec![]),
            Err(AlignError::NoEntries)
        ));
        assert!(matches!(
            AlignmentResidueScores::new(vec![vec![Some(1.0)], vec![]]),
            Err(AlignError::InconsistentLengths(1, 0))
        ));
        assert!(matches!(
            AlignmentResidueScores::new(vec![vec![Some(f64::INFINITY)]]),
            Err(AlignError::ScoresMismatch(_))
        ));
    }

    #[test]
    fn test_lookup() {
        let scores =
            AlignmentResidueScores::new(vec![vec![Some(1.0), None], vec![Some(2.0), Some(3.0)]])
                .unwrap();
        assert_eq!(scores.num_entries(), 2);
        assert_eq!(scores.length(), 2);
        assert_eq!(scores.score(1, 1), Some(3.0));
        assert_eq!(scores.score(0, 1), None);
        assert_eq!(scores.score(5, 0), None);
        assert_eq!(scores.num_scored_entries_of_index(0), 2);
        assert_eq!(scores.num_scored_entries_of_index(1), 1);
    }
}
