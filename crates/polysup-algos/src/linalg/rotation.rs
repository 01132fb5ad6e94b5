//! Row-major 3×3 rotation matrices

use std::fmt;
use std::ops::Mul;

use lin_alg::f64::Vec3;

use super::Mat3;

/// A 3×3 rotation matrix, row-major: `m[row][col]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    pub m: Mat3,
}

impl Rotation {
    /// The identity rotation
    pub const IDENTITY: Rotation = Rotation {
        m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    /// Build from rows
    pub fn from_rows(m: Mat3) -> Self {
        Rotation { m }
    }

    /// Rotation of `angle` radians about `axis` (right-hand rule)
    pub fn from_axis_angle(axis: Vec3, angle: f64) -> Self {
        let len = axis.magnitude();
        if len < 1e-15 {
            return Rotation::IDENTITY;
        }
        let (x, y, z) = (axis.x / len, axis.y / len, axis.z / len);
        let (s, c) = angle.sin_cos();
        let t = 1.0 - c;
        Rotation {
            m: [
                [t * x * x + c, t * x * y - s * z, t * x * z + s * y],
                [t * x * y + s * z, t * y * y + c, t * y * z - s * x],
                [t * x * z - s * y, t * y * z + s * x, t * z * z + c],
            ],
        }
    }

    /// Apply the rotation to a vector
    #[inline]
    pub fn apply(&self, v: Vec3) -> Vec3 {
        let m = &self.m;
        Vec3::new(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
        )
    }

    /// The transpose, which for a rotation is its inverse
    pub fn transpose(&self) -> Rotation {
        let mut t = [[0.0f64; 3]; 3];
        for (i, row) in t.iter_mut().enumerate() {
            for (j, value) in row.iter_mut().enumerate() {
                *value = self.m[j][i];
            }
        }
        Rotation { m: t }
    }

    /// Determinant (+1 for a proper rotation)
    pub fn determinant(&self) -> f64 {
        let m = &self.m;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Largest absolute element-wise difference from another rotation
    pub fn max_abs_diff(&self, other: &Rotation) -> f64 {
        self.m
            .iter()
            .flatten()
            .zip(other.m.iter().flatten())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }

    /// Check whether two rotations agree element-wise within `tolerance`
    pub fn is_close(&self, other: &Rotation, tolerance: f64) -> bool {
        self.max_abs_diff(other) <= tolerance
    }

    /// Angle of rotation in radians
    pub fn angle(&self) -> f64 {
        let trace = self.m[0][0] + self.m[1][1] + self.m[2][2];
        ((trace - 1.0) / 2.0).clamp(-1.0, 1.0).acos()
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Rotation::IDENTITY
    }
}

impl Mul for Rotation {
    type Output = Rotation;

    fn mul(self, rhs: Rotation) -> Rotation {
        let mut m = [[0.0f64; 3]; 3];
        for (i, row) in m.iter_mut().enumerate() {
            for (j, value) in row.iter_mut().enumerate() {
                *value = (0..3).map(|k| self.m[i][k] * rhs.m[k][j]).sum();
            }
        }
        Rotation { m }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: Vec<String> = self
            .m
            .iter()
            .map(|row| format!("[{:.6}, {:.6}, {:.6}]", row[0], row[1], row[2]))
            .collect();
        write!(f, "[{}]", rows.join(", "))
    }
}
