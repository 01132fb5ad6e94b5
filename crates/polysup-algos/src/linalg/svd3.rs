//! Analytical 3×3 SVD decomposition
//!
//! Computes A = U · diag(S) · Vᵀ using the Jacobi eigenvalue algorithm on
//! AᵀA (symmetric positive semi-definite).
//!
//! Matrices are row-major (`m[row][col]`); the singular vectors are the
//! columns of `u` and `v`. Both U and V are returned right-handed
//! (determinant +1), so V·Uᵀ is always a proper rotation. When A has a
//! negative determinant this means the last column of U is flipped, which
//! is exactly the reflection correction needed by rigid fitting.

use super::Mat3;

const SINGULAR_EPS: f64 = 1e-10;
const RELATIVE_SINGULAR_EPS: f64 = 1e-6;

/// Result of a 3×3 SVD decomposition
#[derive(Debug, Clone)]
pub struct Svd3 {
    /// Left singular vectors as columns
    pub u: Mat3,
    /// Singular values, sorted descending, non-negative
    pub s: [f64; 3],
    /// Right singular vectors as columns
    pub v: Mat3,
}

/// Compute the SVD of a row-major 3×3 matrix
pub fn svd3(a: &Mat3) -> Svd3 {
    let ata = transpose_times_self(a);
    let (eigenvalues, eigenvectors) = jacobi_eigen(&ata);

    let mut order = [0usize, 1, 2];
    order.sort_by(|&i, &j| eigenvalues[j].total_cmp(&eigenvalues[i]));

    let s = order.map(|k| eigenvalues[k].max(0.0).sqrt());
    let mut v_cols = order.map(|k| eigenvectors[k]);
    if triple_product(&v_cols[0], &v_cols[1], &v_cols[2]) < 0.0 {
        v_cols[2] = negate(&v_cols[2]);
    }

    // Singular values this far below the largest are treated as zero
    let cutoff = SINGULAR_EPS.max(s[0] * RELATIVE_SINGULAR_EPS);

    // u_i = A · v_i / s_i
    let mut u_cols = [[0.0f64; 3]; 3];
    for i in 0..3 {
        if s[i] > cutoff {
            let av = mat_vec(a, &v_cols[i]);
            u_cols[i] = av.map(|x| x / s[i]);
        }
    }

    if s[0] <= SINGULAR_EPS {
        u_cols = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
    } else if s[1] <= cutoff {
        u_cols[1] = arbitrary_perpendicular(&u_cols[0]);
        u_cols[2] = normalized(&cross(&u_cols[0], &u_cols[1]));
    } else if s[2] <= cutoff {
        u_cols[2] = normalized(&cross(&u_cols[0], &u_cols[1]));
    }

    if triple_product(&u_cols[0], &u_cols[1], &u_cols[2]) < 0.0 {
        u_cols[2] = negate(&u_cols[2]);
    }

    Svd3 {
        u: from_columns(&u_cols),
        s,
        v: from_columns(&v_cols),
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn from_columns(cols: &[[f64; 3]; 3]) -> Mat3 {
    let mut m = [[0.0f64; 3]; 3];
    for (col, values) in cols.iter().enumerate() {
        for (row, value) in values.iter().enumerate() {
            m[row][col] = *value;
        }
    }
    m
}

/// AᵀA for a row-major A
fn transpose_times_self(a: &Mat3) -> Mat3 {
    let mut result = [[0.0f64; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            result[i][j] = (0..3).map(|k| a[k][i] * a[k][j]).sum();
        }
    }
    result
}

fn mat_vec(a: &Mat3, v: &[f64; 3]) -> [f64; 3] {
    [
        a[0][0] * v[0] + a[0][1] * v[1] + a[0][2] * v[2],
        a[1][0] * v[0] + a[1][1] * v[1] + a[1][2] * v[2],
        a[2][0] * v[0] + a[2][1] * v[1] + a[2][2] * v[2],
    ]
}

fn cross(a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn negate(v: &[f64; 3]) -> [f64; 3] {
    v.map(|x| -x)
}

fn triple_product(a: &[f64; 3], b: &[f64; 3], c: &[f64; 3]) -> f64 {
    let bc = cross(b, c);
    a[0] * bc[0] + a[1] * bc[1] + a[2] * bc[2]
}

fn normalized(v: &[f64; 3]) -> [f64; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if len > 1e-15 {
        v.map(|x| x / len)
    } else {
        *v
    }
}

fn arbitrary_perpendicular(v: &[f64; 3]) -> [f64; 3] {
    let candidate = if v[0].abs() < v[1].abs() && v[0].abs() < v[2].abs() {
        [1.0, 0.0, 0.0]
    } else if v[1].abs() < v[2].abs() {
        [0.0, 1.0, 0.0]
    } else {
        [0.0, 0.0, 1.0]
    };
    normalized(&cross(v, &candidate))
}

/// Cyclic Jacobi eigen-decomposition of a symmetric 3×3 matrix.
///
/// Returns the eigenvalues and the matching eigenvectors (as arrays).
fn jacobi_eigen(m: &Mat3) -> ([f64; 3], [[f64; 3]; 3]) {
    let mut a = *m;
    let mut v = [[1.0f64, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

    for _ in 0..50 {
        let off = a[0][1] * a[0][1] + a[0][2] * a[0][2] + a[1][2] * a[1][2];
        if off < 1e-30 {
            break;
        }
        for (p, q) in [(0usize, 1usize), (0, 2), (1, 2)] {
            if a[p][q].abs() >= 1e-15 {
                jacobi_rotate(&mut a, &mut v, p, q);
            }
        }
    }

    let eigenvalues = [a[0][0], a[1][1], a[2][2]];
    let eigenvectors = [
        [v[0][0], v[1][0], v[2][0]],
        [v[0][1], v[1][1], v[2][1]],
        [v[0][2], v[1][2], v[2][2]],
    ];
    (eigenvalues, eigenvectors)
}

/// Apply one Givens rotation that zeroes `a[p][q]`
fn jacobi_rotate(a: &mut Mat3, v: &mut Mat3, p: usize, q: usize) {
    let app = a[p][p];
    let aqq = a[q][q];
    let apq = a[p][q];

    let (c, s) = if (app - aqq).abs() < 1e-15 {
        let h = std::f64::consts::FRAC_1_SQRT_2;
        (h, if apq > 0.0 { h } else { -h })
    } else {
        let tau = (aqq - app) / (2.0 * apq);
        let t = tau.signum() / (tau.abs() + (1.0 + tau * tau).sqrt());
        let c = 1.0 / (1.0 + t * t).sqrt();
        (c, t * c)
    };

    a[p][p] = c * c * app - 2.0 * s * c * apq + s * s * aqq;
    a[q][q] = s * s * app + 2.0 * s * c * apq + c * c * aqq;
    a[p][q] = 0.0;
    a[q][p] = 0.0;

    let r = 3 - p - q;
    let arp = a[r][p];
    let arq = a[r][q];
    a[r][p] = c * arp - s * arq;
    a[p][r] = a[r][p];
    a[r][q] = s * arp + c * arq;
    a[q][r] = a[r][q];

    for row in v.iter_mut() {
        let vp = row[p];
        let vq = row[q];
        row[p] = c * vp - s * vq;
        row[q] = s * vp + c * vq;
    }
}
