//! Superposition parameters

use serde::{Deserialize, Serialize};

use polysup_align::{CommonAtomPolicy, CommonResiduePolicy};

use crate::error::{SuperposeError, SuperposeResult};

/// Minimum number of common residues for a pair to be scored or superposed
pub const DEFAULT_MIN_COMMON_RESIDUES: usize = 3;

/// Offset `K` in the pair quality `common_count / (K + rmsd)`
pub const DEFAULT_QUALITY_RMSD_OFFSET: f64 = 1.0;

/// Parameters controlling pair scoring and superposition composition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuperposeParams {
    /// Pairs sharing fewer residues are not scored, and tree edges with
    /// fewer common coordinates are rejected during composition
    pub min_common_residues: usize,
    /// Offset added to the RMSD when scoring a pair
    pub quality_rmsd_offset: f64,
    /// Absolute tolerance (Å) for the composed vs direct RMSD check
    pub rmsd_tolerance: f64,
    /// Relative tolerance for the composed vs direct RMSD check
    pub rmsd_relative_tolerance: f64,
    /// Residues used when fitting tree edges
    pub residue_policy: CommonResiduePolicy,
    /// Atom taken from each residue
    pub atom_policy: CommonAtomPolicy,
    /// Score pairs on the rayon thread pool
    pub parallel_scoring: bool,
}

impl Default for SuperposeParams {
    fn default() -> Self {
        Self {
            min_common_residues: DEFAULT_MIN_COMMON_RESIDUES,
            quality_rmsd_offset: DEFAULT_QUALITY_RMSD_OFFSET,
            rmsd_tolerance: 1e-3,
            rmsd_relative_tolerance: 1e-3,
            residue_policy: CommonResiduePolicy::default(),
            atom_policy: CommonAtomPolicy::default(),
            parallel_scoring: true,
        }
    }
}

impl SuperposeParams {
    /// Parse parameters from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> SuperposeResult<Self> {
        let params: SuperposeParams = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    /// Check that the quality offset is finite and positive, the tolerances
    /// are finite and non-negative, and the residue policy is valid
    pub fn validate(&self) -> SuperposeResult<()> {
        if !(self.quality_rmsd_offset.is_finite() && self.quality_rmsd_offset > 0.0) {
            return Err(SuperposeError::InvalidParameter {
                name: "quality_rmsd_offset",
                value: self.quality_rmsd_offset,
                requirement: "must be finite and greater than 0",
            });
        }
        for (name, value) in [
            ("rmsd_tolerance", self.rmsd_tolerance),
            ("rmsd_relative_tolerance", self.rmsd_relative_tolerance),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SuperposeError::InvalidParameter {
                    name,
                    value,
                    requirement: "must be finite and not negative",
                });
            }
        }
        self.residue_policy.validated()?;
        Ok(())
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> SuperposeResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Pair quality for `count` common coordinates fitted with `rmsd`
    #[inline]
    pub fn pair_quality(&self, count: usize, rmsd: f64) -> f64 {
        count as f64 / (self.quality_rmsd_offset + rmsd)
    }

    /// Check whether a composed RMSD agrees with the direct pairwise RMSD
    pub fn rmsds_agree(&self, composed: f64, direct: f64) -> bool {
        let difference = (composed - direct).abs();
        difference <= self.rmsd_tolerance || difference <= self.rmsd_relative_tolerance * direct.abs()
    }
}
