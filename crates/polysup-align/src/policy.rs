//! Common residue and common atom selection policies
//!
//! A residue policy decides which alignment indices count as "common" for
//! a pair of entries; an atom policy decides which coordinate each of the
//! two aligned residues contributes.
//!
//! - `SelectAll`: every index where both entries are present
//! - `BestScorePercent`: the best-scoring indices whose cumulative score
//!   stays within a percentage of the total
//! - `MinScore`: indices whose score is strictly above a minimum

use std::cmp::Ordering;
use std::fmt;

use lin_alg::f64::Vec3;
use serde::{Deserialize, Serialize};

use polysup_mol::Residue;

use crate::alignment::Alignment;
use crate::{AlignError, AlignResult};

/// Default percentage for [`CommonResiduePolicy::BestScorePercent`]
pub const DEFAULT_BEST_SCORE_PERCENT: f64 = 70.0;

/// Default minimum for [`CommonResiduePolicy::MinScore`]
pub const DEFAULT_MIN_SCORE: f64 = 0.0;

/// Policy selecting which aligned indices are common to two entries
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommonResiduePolicy {
    /// All indices at which both entries are present
    #[default]
    SelectAll,
    /// Best-scoring indices whose cumulative score is within `percent`% of the total
    BestScorePercent { percent: f64 },
    /// Indices whose score is strictly greater than `min_score`
    MinScore { min_score: f64 },
}

fn check_parameter(name: &'static str, value: f64) -> AlignResult<f64> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(AlignError::InvalidPolicyParameter { name, value });
    }
    Ok(value)
}

impl CommonResiduePolicy {
    /// Best-score-percent policy; `percent` must be within 0..=100
    pub fn best_score_percent(percent: f64) -> AlignResult<Self> {
        let percent = check_parameter("best score percent", percent)?;
        Ok(CommonResiduePolicy::BestScorePercent { percent })
    }

    /// Minimum-score policy; `min_score` must be within 0..=100
    pub fn min_score(min_score: f64) -> AlignResult<Self> {
        let min_score = check_parameter("minimum score", min_score)?;
        Ok(CommonResiduePolicy::MinScore { min_score })
    }

    /// Check the parameters of a policy built without a constructor (e.g. deserialized)
    pub fn validated(self) -> AlignResult<Self> {
        match self {
            CommonResiduePolicy::SelectAll => Ok(self),
            CommonResiduePolicy::BestScorePercent { percent } => Self::best_score_percent(percent),
            CommonResiduePolicy::MinScore { min_score } => Self::min_score(min_score),
        }
    }

    /// Whether the policy needs a scored alignment
    pub fn requires_scores(&self) -> bool {
        !matches!(self, CommonResiduePolicy::SelectAll)
    }

    /// Short human-readable name including any parameter
    pub fn descriptive_name(&self) -> String {
        match self {
            CommonResiduePolicy::SelectAll => "select_all".to_string(),
            CommonResiduePolicy::BestScorePercent { percent } => {
                format!("best_score_percent[{}]", percent)
            }
            CommonResiduePolicy::MinScore { min_score } => format!("min_score[{}]", min_score),
        }
    }

    fn variant_rank(&self) -> u8 {
        match self {
            CommonResiduePolicy::SelectAll => 0,
            CommonResiduePolicy::BestScorePercent { .. } => 1,
            CommonResiduePolicy::MinScore { .. } => 2,
        }
    }

    fn parameter(&self) -> f64 {
        match self {
            CommonResiduePolicy::SelectAll => 0.0,
            CommonResiduePolicy::BestScorePercent { percent } => *percent,
            CommonResiduePolicy::MinScore { min_score } => *min_score,
        }
    }

    /// Select the common indices of two entries, in ascending order
    pub fn select_common_residues(
        &self,
        alignment: &Alignment,
        entry_a: usize,
        entry_b: usize,
    ) -> AlignResult<Vec<usize>> {
        let num_entries = alignment.num_entries();
        for entry in [entry_a, entry_b] {
            if entry >= num_entries {
                return Err(AlignError::EntryOutOfRange { entry, num_entries });
            }
        }
        let candidates: Vec<usize> = (0..alignment.length())
            .filter(|&index| alignment.has_position_of_both_entries_of_index(entry_a, entry_b, index))
            .collect();
        let selected = self.filter_candidates(alignment, &candidates, entry_a, entry_b)?;
        if selected.windows(2).any(|w| w[0] >= w[1]) {
            return Err(AlignError::SelectionNotIncreasing);
        }
        Ok(selected)
    }

    /// Filter a list of candidate indices (each with both entries present)
    pub fn filter_candidates(
        &self,
        alignment: &Alignment,
        candidates: &[usize],
        entry_a: usize,
        entry_b: usize,
    ) -> AlignResult<Vec<usize>> {
        if self.requires_scores() && !alignment.is_scored() {
            return Err(AlignError::PolicyRequiresScores(self.descriptive_name()));
        }
        match *self {
            CommonResiduePolicy::SelectAll => Ok(candidates.to_vec()),
            CommonResiduePolicy::BestScorePercent { percent } => {
                let mut scored = Vec::with_capacity(candidates.len());
                for &index in candidates {
                    scored.push((index, alignment.pair_score_of_index(entry_a, entry_b, index)?));
                }
                scored.sort_by(|a, b| match b.1.total_cmp(&a.1) {
                    Ordering::Equal => a.0.cmp(&b.0),
                    other => other,
                });
                let total: f64 = scored.iter().map(|(_, score)| score).sum();
                let limit = total * percent / 100.0;

                let mut selected = Vec::new();
                let mut cumulative = 0.0;
                for (index, score) in scored {
                    cumulative += score;
                    if cumulative > limit {
                        break;
                    }
                    selected.push(index);
                }
                selected.sort_unstable();
                Ok(selected)
            }
            CommonResiduePolicy::MinScore { min_score } => {
                let mut selected = Vec::new();
                for &index in candidates {
                    if alignment.pair_score_of_index(entry_a, entry_b, index)? > min_score {
                        selected.push(index);
                    }
                }
                Ok(selected)
            }
        }
    }
}

impl PartialEq for CommonResiduePolicy {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CommonResiduePolicy {}

impl PartialOrd for CommonResiduePolicy {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CommonResiduePolicy {
    fn cmp(&self, other: &Self) -> Ordering {
        self.variant_rank()
            .cmp(&other.variant_rank())
            .then_with(|| self.parameter().total_cmp(&other.parameter()))
    }
}

impl fmt::Display for CommonResiduePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.descriptive_name())
    }
}

/// Policy selecting which atom of each aligned residue is compared
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CommonAtomPolicy {
    /// Alpha-carbon of each residue
    #[default]
    SelectCa,
    /// Beta-carbon of each residue (alpha-carbon for glycine)
    SelectCb,
}

impl CommonAtomPolicy {
    /// Coordinates of the selected atom in each of two aligned residues
    pub fn atom_coords(&self, residue_a: &Residue, residue_b: &Residue) -> AlignResult<(Vec3, Vec3)> {
        let coords = match self {
            CommonAtomPolicy::SelectCa => (residue_a.ca()?, residue_b.ca()?),
            CommonAtomPolicy::SelectCb => (residue_a.cb()?, residue_b.cb()?),
        };
        Ok(coords)
    }

    /// Short human-readable name
    pub fn descriptive_name(&self) -> &'static str {
        match self {
            CommonAtomPolicy::SelectCa => "select_ca",
            CommonAtomPolicy::SelectCb => "select_cb",
        }
    }
}

impl fmt::Display for CommonAtomPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.descriptive_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::AlignmentBuilder;
    use crate::scores::AlignmentResidueScores;
    use polysup_mol::ResidueId;

    const SCORES: [f64; 20] = [
        47.7, 1.0, 94.2, 94.9, 52.8, 35.2, 67.3, 29.0, 12.8, 30.9, 27.6, 79.9, 35.0, 8.3, 21.6,
        88.1, 4.4, 45.7, 9.1, 95.9,
    ];

    /// Two fully-aligned entries whose per-index scores are `SCORES`
    fn scored_alignment() -> Alignment {
        let positions: Vec<Option<usize>> = (0..SCORES.len()).map(Some).collect();
        let scores: Vec<Option<f64>> = SCORES.iter().copied().map(Some).collect();
        Alignment::from_positions(vec![positions.clone(), positions])
            .unwrap()
            .with_scores(AlignmentResidueScores::new(vec![scores.clone(), scores]).unwrap())
            .unwrap()
    }

    fn select(policy: CommonResiduePolicy) -> Vec<usize> {
        policy.select_common_residues(&scored_alignment(), 0, 1).unwrap()
    }

    #[test]
    fn test_select_all() {
        assert_eq!(select(CommonResiduePolicy::SelectAll), (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_best_score_percent() {
        assert!(select(CommonResiduePolicy::best_score_percent(0.0).unwrap()).is_empty());
        assert_eq!(
            select(CommonResiduePolicy::best_score_percent(90.0).unwrap()),
            vec![0, 2, 3, 4, 5, 6, 9, 11, 12, 15, 17, 19]
        );
        assert_eq!(
            select(CommonResiduePolicy::best_score_percent(DEFAULT_BEST_SCORE_PERCENT).unwrap()),
            vec![2, 3, 4, 6, 11, 15, 19]
        );
        assert_eq!(
            select(CommonResiduePolicy::best_score_percent(100.0).unwrap()),
            (0..20).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_min_score() {
        assert_eq!(
            select(CommonResiduePolicy::min_score(0.0).unwrap()),
            (0..20).collect::<Vec<_>>()
        );
        assert_eq!(
            select(CommonResiduePolicy::min_score(DEFAULT_MIN_SCORE).unwrap()),
            (0..20).collect::<Vec<_>>()
        );
        assert_eq!(
            select(CommonResiduePolicy::min_score(35.0).unwrap()),
            vec![0, 2, 3, 4, 5, 6, 11, 15, 17, 19]
        );
        assert!(select(CommonResiduePolicy::min_score(100.0).unwrap()).is_empty());
    }

    #[test]
    fn test_parameter_validation() {
        for bad in [-0.5, 100.001, f64::NAN, f64::INFINITY] {
            assert!(CommonResiduePolicy::best_score_percent(bad).is_err());
            assert!(CommonResiduePolicy::min_score(bad).is_err());
        }
        let deserialized = CommonResiduePolicy::MinScore { min_score: -1.0 };
        assert!(deserialized.validated().is_err());
    }

    #[test]
    fn test_score_policies_reject_unscored_alignment() {
        let unscored = Alignment::from_positions(vec![vec![Some(0)], vec![Some(0)]]).unwrap();
        for policy in [
            CommonResiduePolicy::best_score_percent(50.0).unwrap(),
            CommonResiduePolicy::min_score(1.0).unwrap(),
        ] {
            assert!(matches!(
                policy.select_common_residues(&unscored, 0, 1),
                Err(AlignError::PolicyRequiresScores(_))
            ));
        }
        assert_eq!(
            CommonResiduePolicy::SelectAll
                .select_common_residues(&unscored, 0, 1)
                .unwrap(),
            vec![0]
        );
    }

    #[test]
    fn test_empty_alignment_selects_nothing() {
        let empty = AlignmentBuilder::new(2).unwrap().build().with_empty_scores().unwrap();
        for policy in [
            CommonResiduePolicy::SelectAll,
            CommonResiduePolicy::best_score_percent(70.0).unwrap(),
            CommonResiduePolicy::min_score(0.0).unwrap(),
        ] {
            assert!(policy.select_common_residues(&empty, 0, 1).unwrap().is_empty());
        }
    }

    #[test]
    fn test_only_indices_with_both_entries_are_candidates() {
        let alignment = Alignment::from_positions(vec![
            vec![Some(0), None, Some(1), Some(2)],
            vec![Some(0), Some(1), None, Some(2)],
        ])
        .unwrap();
        assert_eq!(
            CommonResiduePolicy::SelectAll
                .select_common_residues(&alignment, 0, 1)
                .unwrap(),
            vec![0, 3]
        );
        assert!(matches!(
            CommonResiduePolicy::SelectAll.select_common_residues(&alignment, 0, 2),
            Err(AlignError::EntryOutOfRange { entry: 2, .. })
        ));
    }

    #[test]
    fn test_selection_is_deterministic() {
        let alignment = scored_alignment();
        let policy = CommonResiduePolicy::best_score_percent(55.0).unwrap();
        let first = policy.select_common_residues(&alignment, 0, 1).unwrap();
        let second = policy.select_common_residues(&alignment, 0, 1).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_ordering_and_names() {
        let mut policies = vec![
            CommonResiduePolicy::min_score(5.0).unwrap(),
            CommonResiduePolicy::best_score_percent(90.0).unwrap(),
            CommonResiduePolicy::SelectAll,
            CommonResiduePolicy::best_score_percent(70.0).unwrap(),
        ];
        policies.sort();
        let names: Vec<String> = policies.iter().map(|p| p.descriptive_name()).collect();
        assert_eq!(
            names,
            vec![
                "select_all",
                "best_score_percent[70]",
                "best_score_percent[90]",
                "min_score[5]"
            ]
        );
        assert_eq!(CommonResiduePolicy::default(), CommonResiduePolicy::SelectAll);
    }

    #[test]
    fn test_policy_serde() {
        let policy = CommonResiduePolicy::best_score_percent(80.0).unwrap();
        let json = serde_json::to_string(&policy).unwrap();
        assert_eq!(json, r#"{"kind":"best_score_percent","percent":80.0}"#);
        let back: CommonResiduePolicy = serde_json::from_str(&json).unwrap();
        assert_eq!(back, policy);
    }

    #[test]
    fn test_atom_policies() {
        let mut residue_a = polysup_mol::Residue::with_ca(ResidueId::new('A', 1, None), 'A', Vec3::new(1.0, 0.0, 0.0));
        residue_a.push_atom("CB", Vec3::new(1.0, 1.0, 0.0));
        let residue_b = polysup_mol::Residue::with_ca(ResidueId::new('A', 7, None), 'G', Vec3::new(2.0, 0.0, 0.0));

        let (a, b) = CommonAtomPolicy::SelectCa.atom_coords(&residue_a, &residue_b).unwrap();
        assert_eq!((a.x, b.x), (1.0, 2.0));
        let (a, b) = CommonAtomPolicy::SelectCb.atom_coords(&residue_a, &residue_b).unwrap();
        assert_eq!((a.y, b.x), (1.0, 2.0));

        let no_cb = polysup_mol::Residue::with_ca(ResidueId::new('A', 3, None), 'L', Vec3::new(0.0, 0.0, 0.0));
        assert!(matches!(
            CommonAtomPolicy::SelectCb.atom_coords(&residue_a, &no_cb),
            Err(AlignError::Mol(_))
        ));
    }
}
