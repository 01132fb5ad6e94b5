//! Alignment of several structures by matching residue identifiers
//!
//! Residues with the same identifier (chain, number, insert code) in
//! different structures are placed in the same alignment index. Residues
//! must appear in the same relative order in every list that contains them.

use ahash::AHashMap;

use polysup_mol::ResidueId;

use crate::alignment::{Alignment, AlignmentBuilder};
use crate::{AlignError, AlignResult};

fn index_map(entry: usize, ids: &[ResidueId]) -> AlignResult<AHashMap<ResidueId, usize>> {
    let mut map = AHashMap::with_capacity(ids.len());
    for (position, id) in ids.iter().enumerate() {
        if map.insert(*id, position).is_some() {
            return Err(AlignError::ResidueIdAlign(format!(
                "residue {} appears more than once in list {}",
                id, entry
            )));
        }
    }
    Ok(map)
}

/// Align lists of residue identifiers.
///
/// At each step, every entry with residues left proposes its next residue.
/// A proposal is usable if no list holds that residue further ahead than
/// its own next residue (which would force that list to skip residues).
/// Among usable proposals the one from the longest list wins, and a new
/// index is added holding that residue for every list whose next residue
/// it is.
pub fn align_by_residue_ids(lists: &[Vec<ResidueId>]) -> AlignResult<Alignment> {
    if lists.is_empty() {
        return Err(AlignError::NoEntries);
    }
    if lists.iter().all(Vec::is_empty) {
        return Err(AlignError::ResidueIdAlign(
            "all residue lists are empty".to_string(),
        ));
    }

    let maps = lists
        .iter()
        .enumerate()
        .map(|(entry, ids)| index_map(entry, ids))
        .collect::<AlignResult<Vec<_>>>()?;

    let num_entries = lists.len();
    let mut next = vec![0usize; num_entries];
    let mut builder = AlignmentBuilder::new(num_entries)?;

    while (0..num_entries).any(|entry| next[entry] < lists[entry].len()) {
        let mut chosen: Option<(usize, Vec<Option<usize>>)> = None;

        for entry in 0..num_entries {
            let Some(id) = lists[entry].get(next[entry]) else {
                continue;
            };
            let mut column = vec![None; num_entries];
            let mut skips = false;
            for (other, map) in maps.iter().enumerate() {
                let Some(&position) = map.get(id) else {
                    continue;
                };
                if position < next[other] {
                    return Err(AlignError::ResidueIdAlign(format!(
                        "residue {} is out of order in list {}",
                        id, other
                    )));
                }
                if position > next[other] {
                    skips = true;
                    break;
                }
                column[other] = Some(position);
            }
            if skips {
                continue;
            }
            let longer = chosen
                .as_ref()
                .map_or(true, |(best, _)| lists[entry].len() > lists[*best].len());
            if longer {
                chosen = Some((entry, column));
            }
        }

        let Some((_, column)) = chosen else {
            return Err(AlignError::ResidueIdAlign(
                "no residue can be added without breaking the order of another list".to_string(),
            ));
        };
        for (entry, position) in column.iter().enumerate() {
            if position.is_some() {
                next[entry] += 1;
            }
        }
        builder.append_column(&column)?;
    }

    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(numbers: &[i32]) -> Vec<ResidueId> {
        numbers.iter().map(|&n| ResidueId::new('A', n, None)).collect()
    }

    #[test]
    fn test_identical_lists() {
        let alignment = align_by_residue_ids(&[ids(&[1, 2, 3]), ids(&[1, 2, 3])]).unwrap();
        assert_eq!(alignment.length(), 3);
        assert_eq!(alignment.num_positions_with_all_entries(), 3);
    }

    #[test]
    fn test_partial_overlap() {
        let alignment = align_by_residue_ids(&[ids(&[1, 2, 3, 4]), ids(&[2, 3, 5])]).unwrap();
        assert_eq!(
            alignment.to_string(),
            "alignment[5 positions: 0 <-> -; 1 <-> 0; 2 <-> 1; 3 <-> -; - <-> 2]"
        );
    }

    #[test]
    fn test_three_lists() {
        let alignment =
            align_by_residue_ids(&[ids(&[1, 2, 3]), ids(&[3, 4]), ids(&[0, 1, 4])]).unwrap();
        assert_eq!(alignment.num_entries(), 3);
        assert_eq!(alignment.num_positions_with_both_entries(0, 1), 1);
        assert_eq!(alignment.num_positions_with_both_entries(0, 2), 1);
        assert_eq!(alignment.num_positions_with_both_entries(1, 2), 1);
        assert!(alignment.check_entry_positions_are_consecutive().is_ok());
        for entry in 0..3 {
            assert_eq!(
                alignment.num_present_positions_of_entry(entry),
                [3, 2, 3][entry]
            );
        }
    }

    #[test]
    fn test_insert_codes_distinguish_residues() {
        let a = vec![ResidueId::new('A', 5, None), ResidueId::new('A', 5, Some('A'))];
        let b = vec![ResidueId::new('A', 5, Some('A'))];
        let alignment = align_by_residue_ids(&[a, b]).unwrap();
        assert_eq!(alignment.length(), 2);
        assert_eq!(alignment.position_of(1, 1), Some(0));
    }

    #[test]
    fn test_one_empty_list() {
        let alignment = align_by_residue_ids(&[ids(&[1, 2]), vec![]]).unwrap();
        assert_eq!(alignment.length(), 2);
        assert_eq!(alignment.num_present_positions_of_entry(1), 0);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(align_by_residue_ids(&[]), Err(AlignError::NoEntries)));
        assert!(matches!(
            align_by_residue_ids(&[vec![], vec![]]),
            Err(AlignError::ResidueIdAlign(_))
        ));
        assert!(matches!(
            align_by_residue_ids(&[ids(&[1, 2]), ids(&[2, 1])]),
            Err(AlignError::ResidueIdAlign(_))
        ));
        assert!(matches!(
            align_by_residue_ids(&[ids(&[1, 1])]),
            Err(AlignError::ResidueIdAlign(_))
        ));
    }
}
