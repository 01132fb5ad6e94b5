//! Small fixed-size linear algebra
//!
//! Row-major 3×3 rotations and an analytical 3×3 SVD, both in `f64`.

mod rotation;
mod svd3;

pub use rotation::Rotation;
pub use svd3::{svd3, Svd3};

/// Row-major 3×3 matrix: `m[row][col]`
pub type Mat3 = [[f64; 3]; 3];
