//! Gluing pair alignments into one multi-entry alignment
//!
//! Pair alignments along the edges of a spanning tree are merged one by
//! one. Two partial alignments that share an entry are merged by walking
//! both in step and matching indices through the shared entry's positions.

use crate::alignment::{Alignment, AlignmentBuilder};
use crate::scores::AlignmentResidueScores;
use crate::{AlignError, AlignResult};

/// A partial alignment over a subset of the entries
#[derive(Debug, Clone)]
struct GlueGroup {
    /// Global entry index of each row
    entries: Vec<usize>,
    positions: Vec<Vec<Option<usize>>>,
    scores: Vec<Vec<Option<f64>>>,
    scored: bool,
}

impl GlueGroup {
    fn from_pair(entry_a: usize, entry_b: usize, alignment: &Alignment) -> AlignResult<Self> {
        if alignment.num_entries() != 2 {
            return Err(AlignError::Glue(format!(
                "pair alignment for ({}, {}) has {} entries",
                entry_a,
                entry_b,
                alignment.num_entries()
            )));
        }
        let positions = vec![
            alignment.entry_positions(0)?.to_vec(),
            alignment.entry_positions(1)?.to_vec(),
        ];
        let (scores, scored) = match alignment.scores() {
            Ok(scores) => (scores.entry_scores().to_vec(), true),
            Err(_) => (vec![vec![None; alignment.length()]; 2], false),
        };
        Ok(GlueGroup {
            entries: vec![entry_a, entry_b],
            positions,
            scores,
            scored,
        })
    }

    fn len(&self) -> usize {
        self.positions.first().map_or(0, Vec::len)
    }

    fn row_of(&self, entry: usize) -> Option<usize> {
        self.entries.iter().position(|&e| e == entry)
    }

    fn check_increasing(&self, row: usize) -> AlignResult<()> {
        let present: Vec<usize> = self.positions[row].iter().flatten().copied().collect();
        if present.windows(2).any(|w| w[0] >= w[1]) {
            return Err(AlignError::Glue(format!(
                "positions of entry {} are not increasing",
                self.entries[row]
            )));
        }
        Ok(())
    }

    /// Merge `other` into `self` through an entry present in both
    fn merge(mut self, other: GlueGroup, shared: usize) -> AlignResult<GlueGroup> {
        let (Some(row_x), Some(row_y)) = (self.row_of(shared), other.row_of(shared)) else {
            return Err(AlignError::Glue(format!(
                "entry {} is not shared by the alignments being merged",
                shared
            )));
        };
        self.check_increasing(row_x)?;
        other.check_increasing(row_y)?;

        let other_rows: Vec<usize> = (0..other.entries.len()).filter(|&r| r != row_y).collect();
        let num_rows = self.entries.len() + other_rows.len();
        let mut positions = vec![Vec::new(); num_rows];
        let mut scores = vec![Vec::new(); num_rows];

        let (len_x, len_y) = (self.len(), other.len());
        let (mut ix, mut iy) = (0usize, 0usize);
        while ix < len_x || iy < len_y {
            let px = (ix < len_x).then(|| self.positions[row_x][ix]).flatten();
            let py = (iy < len_y).then(|| other.positions[row_y][iy]).flatten();
            let (take_x, take_y) = if ix >= len_x {
                (false, true)
            } else if iy >= len_y {
                (true, false)
            } else {
                match (px, py) {
                    (None, _) => (true, false),
                    (_, None) => (false, true),
                    (Some(p), Some(q)) if p == q => (true, true),
                    (Some(p), Some(q)) => (p < q, q < p),
                }
            };

            for row in 0..self.entries.len() {
                let (position, score) = if take_x {
                    (self.positions[row][ix], self.scores[row][ix])
                } else if row == row_x {
                    (py, other.scores[row_y][iy])
                } else {
                    (None, None)
                };
                let score = match (take_x, take_y, row == row_x) {
                    (true, true, true) => score.or(other.scores[row_y][iy]),
                    _ => score,
                };
                positions[row].push(position);
                scores[row].push(score);
            }
            for (offset, &row) in other_rows.iter().enumerate() {
                let target = self.entries.len() + offset;
                let (position, score) = if take_y {
                    (other.positions[row][iy], other.scores[row][iy])
                } else {
                    (None, None)
                };
                positions[target].push(position);
                scores[target].push(score);
            }

            if take_x {
                ix += 1;
            }
            if take_y {
                iy += 1;
            }
        }

        self.entries
            .extend(other_rows.iter().map(|&row| other.entries[row]));
        Ok(GlueGroup {
            entries: self.entries,
            positions,
            scores,
            scored: self.scored || other.scored,
        })
    }
}

/// Glue pair alignments along tree edges into one alignment of `num_entries` entries.
///
/// Each edge is `(entry_a, entry_b, alignment)` where row 0 of the
/// two-entry alignment is `entry_a` and row 1 is `entry_b`. The edges must
/// form a spanning tree over the entries. Scores are carried over; where
/// two pair alignments score the same cell, the first one wins.
pub fn glue_pair_alignments(
    num_entries: usize,
    edges: &[(usize, usize, Alignment)],
) -> AlignResult<Alignment> {
    if num_entries == 0 {
        return Err(AlignError::NoEntries);
    }
    if edges.len() + 1 != num_entries {
        return Err(AlignError::Glue(format!(
            "{} pair alignments cannot span {} entries",
            edges.len(),
            num_entries
        )));
    }
    if num_entries == 1 {
        return Err(AlignError::Glue(
            "a single entry has no pair alignments to glue".to_string(),
        ));
    }

    let mut groups: Vec<GlueGroup> = Vec::new();
    for (entry_a, entry_b, alignment) in edges {
        let (entry_a, entry_b) = (*entry_a, *entry_b);
        for entry in [entry_a, entry_b] {
            if entry >= num_entries {
                return Err(AlignError::EntryOutOfRange { entry, num_entries });
            }
        }
        let pair = GlueGroup::from_pair(entry_a, entry_b, alignment)?;
        let group_a = groups.iter().position(|g| g.row_of(entry_a).is_some());
        let group_b = groups.iter().position(|g| g.row_of(entry_b).is_some());

        let merged = match (group_a, group_b) {
            (Some(ga), Some(gb)) if ga == gb => {
                return Err(AlignError::Glue(format!(
                    "edge ({}, {}) would form a loop",
                    entry_a, entry_b
                )));
            }
            (None, None) => pair,
            (Some(ga), None) => groups.remove(ga).merge(pair, entry_a)?,
            (None, Some(gb)) => groups.remove(gb).merge(pair, entry_b)?,
            (Some(ga), Some(gb)) => {
                let (first, second) = if ga > gb {
                    (groups.remove(ga), groups.remove(gb))
                } else {
                    let second = groups.remove(gb);
                    (groups.remove(ga), second)
                };
                first.merge(pair, entry_a)?.merge(second, entry_b)?
            }
        };
        groups.push(merged);
    }

    let Some(group) = groups.pop().filter(|_| groups.is_empty()) else {
        return Err(AlignError::Glue(
            "pair alignments do not connect all entries".to_string(),
        ));
    };

    // Reorder rows into entry order
    let mut positions = vec![Vec::new(); num_entries];
    let mut scores = vec![Vec::new(); num_entries];
    for (row, &entry) in group.entries.iter().enumerate() {
        positions[entry] = group.positions[row].clone();
        scores[entry] = group.scores[row].clone();
    }

    let builder = AlignmentBuilder::from_positions(positions)?;
    if group.scored {
        builder.build_scored(AlignmentResidueScores::new(scores)?)
    } else {
        Ok(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(a: &[Option<usize>], b: &[Option<usize>]) -> Alignment {
        Alignment::from_positions(vec![a.to_vec(), b.to_vec()]).unwrap()
    }

    #[test]
    fn test_chain_of_three() {
        // 0-1: 0<->0, 1<->1, 2<->-
        // 1-2: -<->0, 0<->1, 1<->2
        let edges = vec![
            (0, 1, pair(&[Some(0), Some(1), Some(2)], &[Some(0), Some(1), None])),
            (1, 2, pair(&[None, Some(0), Some(1)], &[Some(0), Some(1), Some(2)])),
        ];
        let alignment = glue_pair_alignments(3, &edges).unwrap();
        assert_eq!(alignment.num_entries(), 3);
        assert_eq!(
            alignment.to_string(),
            "alignment[4 positions: - <-> - <-> 0; 0 <-> 0 <-> 1; 1 <-> 1 <-> 2; 2 <-> - <-> -]"
        );
        assert!(!alignment.is_scored());
    }

    #[test]
    fn test_disjoint_edges_joined_later() {
        let edges = vec![
            (2, 3, pair(&[Some(0), Some(1)], &[Some(0), Some(1)])),
            (0, 1, pair(&[Some(0), Some(1)], &[Some(0), Some(1)])),
            (1, 2, pair(&[Some(0), Some(1)], &[Some(0), Some(1)])),
        ];
        let alignment = glue_pair_alignments(4, &edges).unwrap();
        assert_eq!(alignment.length(), 2);
        assert_eq!(alignment.num_positions_with_all_entries(), 2);
    }

    #[test]
    fn test_scores_are_carried() {
        let scored = pair(&[Some(0), Some(1)], &[Some(0), Some(1)])
            .with_scores(
                AlignmentResidueScores::new(vec![
                    vec![Some(10.0), Some(20.0)],
                    vec![Some(10.0), Some(20.0)],
                ])
                .unwrap(),
            )
            .unwrap();
        let edges = vec![
            (0, 1, scored),
            (1, 2, pair(&[Some(1)], &[Some(5)])),
        ];
        let alignment = glue_pair_alignments(3, &edges).unwrap();
        assert!(alignment.is_scored());
        assert_eq!(alignment.score_of(1, 1).unwrap(), Some(20.0));
        assert_eq!(alignment.position_of(2, 1), Some(5));
        assert_eq!(alignment.score_of(2, 1).unwrap(), None);
    }

    #[test]
    fn test_errors() {
        let simple = || pair(&[Some(0)], &[Some(0)]);
        assert!(matches!(
            glue_pair_alignments(3, &[(0, 1, simple())]),
            Err(AlignError::Glue(_))
        ));
        assert!(matches!(
            glue_pair_alignments(3, &[(0, 1, simple()), (1, 0, simple())]),
            Err(AlignError::Glue(_))
        ));
        assert!(matches!(
            glue_pair_alignments(2, &[(0, 5, simple())]),
            Err(AlignError::EntryOutOfRange { entry: 5, .. })
        ));
        let triple = Alignment::from_positions(vec![vec![Some(0)]; 3]).unwrap();
        assert!(matches!(
            glue_pair_alignments(2, &[(0, 1, triple)]),
            Err(AlignError::Glue(_))
        ));
    }
}
