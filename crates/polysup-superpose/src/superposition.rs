//! Per-entry rigid transforms placing all entries in one frame
//!
//! Entry `i` maps a coordinate `x` to `R_i · (x + t_i)`. Entry 0 is the
//! reference and keeps the identity; every other entry is placed by
//! composing pairwise fits along the tree edges that lead to it.

use std::fmt;

use lin_alg::f64::Vec3;

use polysup_algos::{calc_rmsd, fit_second_to_first, Rotation};

use crate::error::{SuperposeError, SuperposeResult};

/// Corresponding coordinates of two entries, used to place one relative to the other
#[derive(Debug, Clone)]
pub struct IndexedCoordPair {
    pub entry_a: usize,
    pub entry_b: usize,
    pub coords_a: Vec<Vec3>,
    pub coords_b: Vec<Vec3>,
}

impl IndexedCoordPair {
    pub fn new(entry_a: usize, entry_b: usize, coords_a: Vec<Vec3>, coords_b: Vec<Vec3>) -> Self {
        IndexedCoordPair {
            entry_a,
            entry_b,
            coords_a,
            coords_b,
        }
    }
}

/// A rigid transform for each of a set of entries
#[derive(Debug, Clone)]
pub struct Superposition {
    translations: Vec<Vec3>,
    rotations: Vec<Rotation>,
}

impl Superposition {
    /// Identity transforms for `num_entries` entries
    pub fn identity(num_entries: usize) -> Self {
        Superposition {
            translations: vec![Vec3::new(0.0, 0.0, 0.0); num_entries],
            rotations: vec![Rotation::IDENTITY; num_entries],
        }
    }

    /// Build from explicit per-entry transforms
    pub fn from_transforms(translations: Vec<Vec3>, rotations: Vec<Rotation>) -> SuperposeResult<Self> {
        if translations.len() != rotations.len() {
            return Err(SuperposeError::InvalidTree(format!(
                "{} translations but {} rotations",
                translations.len(),
                rotations.len()
            )));
        }
        Ok(Superposition {
            translations,
            rotations,
        })
    }

    /// Compose a superposition from coordinate pairs along the edges of a spanning tree.
    ///
    /// Entry 0 keeps the identity. An edge is used once one of its entries
    /// has been placed, so the result does not depend on the edge order.
    /// An edge joining two already-placed entries is a loop; entries the
    /// edges never reach are an error.
    pub fn from_tree_edges(num_entries: usize, pairs: &[IndexedCoordPair]) -> SuperposeResult<Self> {
        if num_entries == 0 {
            return Err(SuperposeError::InvalidTree("no entries".to_string()));
        }
        for pair in pairs {
            for entry in [pair.entry_a, pair.entry_b] {
                if entry >= num_entries {
                    return Err(SuperposeError::EntryOutOfRange { entry, num_entries });
                }
            }
            if pair.entry_a == pair.entry_b {
                return Err(SuperposeError::InvalidTree(format!(
                    "edge joins entry {} to itself",
                    pair.entry_a
                )));
            }
        }
        if pairs.len() + 1 != num_entries {
            return Err(SuperposeError::InvalidTree(format!(
                "{} edges cannot form a spanning tree over {} entries",
                pairs.len(),
                num_entries
            )));
        }

        let mut superposition = Superposition::identity(num_entries);
        let mut placed = vec![false; num_entries];
        placed[0] = true;
        let mut pending: Vec<&IndexedCoordPair> = pairs.iter().collect();

        while !pending.is_empty() {
            let before = pending.len();
            let mut deferred = Vec::with_capacity(before);
            for pair in pending {
                let (fixed, fixed_coords, moving, moving_coords) =
                    match (placed[pair.entry_a], placed[pair.entry_b]) {
                        (true, true) => {
                            return Err(SuperposeError::InvalidTree(format!(
                                "edge ({}, {}) forms a loop",
                                pair.entry_a, pair.entry_b
                            )));
                        }
                        (false, false) => {
                            deferred.push(pair);
                            continue;
                        }
                        (true, false) => (pair.entry_a, &pair.coords_a, pair.entry_b, &pair.coords_b),
                        (false, true) => (pair.entry_b, &pair.coords_b, pair.entry_a, &pair.coords_a),
                    };
                superposition.place_relative(fixed, fixed_coords, moving, moving_coords)?;
                placed[moving] = true;
            }
            if deferred.len() == before {
                return Err(SuperposeError::InvalidTree(format!(
                    "{} edges do not connect to entry 0",
                    deferred.len()
                )));
            }
            pending = deferred;
        }
        Ok(superposition)
    }

    /// Set `moving`'s transform so its coordinates land on `fixed`'s transformed coordinates
    fn place_relative(
        &mut self,
        fixed: usize,
        fixed_coords: &[Vec3],
        moving: usize,
        moving_coords: &[Vec3],
    ) -> SuperposeResult<()> {
        let fit = fit_second_to_first(fixed_coords, moving_coords)?;
        // T_fixed(F(x)) = R_f·R (x + t + Rᵀ·t_f)
        let rotation = self.rotations[fixed] * fit.rotation;
        let translation = fit.translation + fit.rotation.transpose().apply(self.translations[fixed]);
        self.rotations[moving] = rotation;
        self.translations[moving] = translation;
        log::debug!(
            "Placed entry {} from entry {} (pair RMSD {:.4})",
            moving,
            fixed,
            fit.rmsd
        );
        Ok(())
    }

    /// Number of entries
    pub fn num_entries(&self) -> usize {
        self.translations.len()
    }

    fn check_entry(&self, entry: usize) -> SuperposeResult<()> {
        if entry >= self.num_entries() {
            return Err(SuperposeError::EntryOutOfRange {
                entry,
                num_entries: self.num_entries(),
            });
        }
        Ok(())
    }

    /// Translation of an entry (applied before its rotation)
    pub fn translation(&self, entry: usize) -> SuperposeResult<Vec3> {
        self.check_entry(entry)?;
        Ok(self.translations[entry])
    }

    /// Rotation of an entry
    pub fn rotation(&self, entry: usize) -> SuperposeResult<Rotation> {
        self.check_entry(entry)?;
        Ok(self.rotations[entry])
    }

    /// Apply an entry's transform to one coordinate
    pub fn transform(&self, entry: usize, coord: Vec3) -> SuperposeResult<Vec3> {
        self.check_entry(entry)?;
        Ok(self.rotations[entry].apply(coord + self.translations[entry]))
    }

    /// Apply an entry's transform to a list of coordinates
    pub fn transform_coords(&self, entry: usize, coords: &[Vec3]) -> SuperposeResult<Vec<Vec3>> {
        coords.iter().map(|coord| self.transform(entry, *coord)).collect()
    }

    /// RMSD between two entries' corresponding coordinates once both are superposed
    pub fn rmsd_between_superposed_entries(
        &self,
        entry_a: usize,
        coords_a: &[Vec3],
        entry_b: usize,
        coords_b: &[Vec3],
    ) -> SuperposeResult<f64> {
        let moved_a = self.transform_coords(entry_a, coords_a)?;
        let moved_b = self.transform_coords(entry_b, coords_b)?;
        Ok(calc_rmsd(&moved_a, &moved_b)?)
    }

    /// Check whether two superpositions have the same transforms within `tolerance`
    pub fn are_close(&self, other: &Superposition, tolerance: f64) -> bool {
        self.num_entries() == other.num_entries()
            && self
                .rotations
                .iter()
                .zip(&other.rotations)
                .all(|(a, b)| a.is_close(b, tolerance))
            && self
                .translations
                .iter()
                .zip(&other.translations)
                .all(|(a, b)| (*a - *b).magnitude() <= tolerance)
    }
}

impl fmt::Display for Superposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "superposition[")?;
        for (entry, (translation, rotation)) in self.translations.iter().zip(&self.rotations).enumerate() {
            if entry > 0 {
                write!(f, ", ")?;
            }
            write!(
                f,
                "(translation: ({:.4}, {:.4}, {:.4}), rotation: {})",
                translation.x, translation.y, translation.z, rotation
            )?;
        }
        write!(f, "]")
    }
}
