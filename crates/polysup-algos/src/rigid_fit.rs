//! Least-squares rigid fitting
//!
//! Given two lists of corresponding 3D points, finds the rotation and
//! translation that move the second list onto the first with minimal RMSD
//! (Kabsch / orthogonal Procrustes via SVD).
//!
//! Transforms use the convention `x' = R · (x + t)`: translate first,
//! then rotate. This is the same convention used by `Superposition`, so a
//! fit can be stored as an entry's transform directly.

use std::fmt;

use lin_alg::f64::Vec3;

use crate::linalg::{svd3, Rotation};
use crate::{AlgoError, AlgoResult};

/// A rigid transform together with the RMSD it achieves
#[derive(Debug, Clone, Copy)]
pub struct RigidFit {
    /// Rotation, applied after the translation
    pub rotation: Rotation,
    /// Translation, applied before the rotation
    pub translation: Vec3,
    /// RMSD between the first list and the transformed second list
    pub rmsd: f64,
}

impl RigidFit {
    /// The identity transform with zero RMSD
    pub fn identity() -> Self {
        RigidFit {
            rotation: Rotation::IDENTITY,
            translation: Vec3::new(0.0, 0.0, 0.0),
            rmsd: 0.0,
        }
    }

    /// Apply the transform to a point
    #[inline]
    pub fn apply(&self, coord: Vec3) -> Vec3 {
        self.rotation.apply(coord + self.translation)
    }
}

impl fmt::Display for RigidFit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rigid_fit[translation: ({:.4}, {:.4}, {:.4}), rotation: {}, rmsd: {:.4}]",
            self.translation.x, self.translation.y, self.translation.z, self.rotation, self.rmsd
        )
    }
}

fn check_lengths(first: &[Vec3], second: &[Vec3]) -> AlgoResult<()> {
    if first.len() != second.len() {
        return Err(AlgoError::LengthMismatch(first.len(), second.len()));
    }
    if first.is_empty() {
        return Err(AlgoError::EmptyCoords);
    }
    Ok(())
}

/// Centre of gravity of a coordinate list
pub fn centroid(coords: &[Vec3]) -> AlgoResult<Vec3> {
    if coords.is_empty() {
        return Err(AlgoError::EmptyCoords);
    }
    let sum = coords
        .iter()
        .fold(Vec3::new(0.0, 0.0, 0.0), |acc, coord| acc + *coord);
    Ok(sum * (1.0 / coords.len() as f64))
}

/// RMSD between two corresponding coordinate lists, without any fitting
pub fn calc_rmsd(first: &[Vec3], second: &[Vec3]) -> AlgoResult<f64> {
    check_lengths(first, second)?;
    let sum_sq: f64 = first
        .iter()
        .zip(second)
        .map(|(a, b)| {
            let d = *a - *b;
            d.dot(d)
        })
        .sum();
    Ok((sum_sq / first.len() as f64).sqrt())
}

/// Find the rigid transform that moves `second` onto `first`.
///
/// Both lists must have the same, non-zero length. The returned rotation
/// is always proper (determinant +1).
pub fn fit_second_to_first(first: &[Vec3], second: &[Vec3]) -> AlgoResult<RigidFit> {
    check_lengths(first, second)?;

    let centre_first = centroid(first)?;
    let centre_second = centroid(second)?;

    // Cross-covariance H = Σ b·aᵀ over centred points (b from `second`)
    let mut h = [[0.0f64; 3]; 3];
    for (a, b) in first.iter().zip(second) {
        let a = *a - centre_first;
        let b = *b - centre_second;
        let a = [a.x, a.y, a.z];
        let b = [b.x, b.y, b.z];
        for (row, b_row) in h.iter_mut().zip(b) {
            for (value, a_col) in row.iter_mut().zip(a) {
                *value += b_row * a_col;
            }
        }
    }

    // R = V · Uᵀ; svd3 keeps both factors right-handed
    let svd = svd3(&h);
    let v = Rotation::from_rows(svd.v);
    let u = Rotation::from_rows(svd.u);
    let rotation = v * u.transpose();

    // R · (x + t) = R · (x - c2) + c1  =>  t = Rᵀ · c1 - c2
    let translation = rotation.transpose().apply(centre_first) - centre_second;

    let mut fit = RigidFit {
        rotation,
        translation,
        rmsd: 0.0,
    };
    let moved: Vec<Vec3> = second.iter().map(|coord| fit.apply(*coord)).collect();
    fit.rmsd = calc_rmsd(first, &moved)?;
    Ok(fit)
}

/// RMSD between two lists after optimally superposing the second onto the first
pub fn superposed_rmsd(first: &[Vec3], second: &[Vec3]) -> AlgoResult<f64> {
    Ok(fit_second_to_first(first, second)?.rmsd)
}
