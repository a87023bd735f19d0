// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Accumulator of the 2x2 structure tensor and mismatch vector
//! of one Lucas-Kanade iteration.
//!
//! With `A = [[a1, a2], [a2, a3]]` and `b = (b1, b2)`,
//! the displacement increment solves `A * d = -b`.

use crate::misc::type_aliases::{Float, Mat2, Vec2};

/// Sums of weighted gradient products over a window.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StructureTensor {
    /// Sum of `w * fx * fx`.
    pub a1: Float,
    /// Sum of `w * fx * fy`.
    pub a2: Float,
    /// Sum of `w * fy * fy`.
    pub a3: Float,
    /// Sum of `w * fx * ft`.
    pub b1: Float,
    /// Sum of `w * fy * ft`.
    pub b2: Float,
}

impl StructureTensor {
    /// Initialize with zeros.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the contribution of one pixel with horizontal gradient `fx`,
    /// vertical gradient `fy` and temporal difference `ft`.
    #[inline]
    pub fn add_weighted(&mut self, weight: Float, fx: Float, fy: Float, ft: Float) {
        let wx = weight * fx;
        let wy = weight * fy;
        self.a1 += wx * fx;
        self.a2 += wx * fy;
        self.a3 += wy * fy;
        self.b1 += wx * ft;
        self.b2 += wy * ft;
    }

    /// Trackability score `(a1 + a3) - sqrt((a1 - a3)^2 + a2^2)`.
    ///
    /// Close to twice the smallest eigenvalue of the tensor,
    /// except that `a2` is not doubled under the square root.
    /// Not normalized by the number of pixels.
    #[inline]
    pub fn corner_response(&self) -> Float {
        let diff = self.a1 - self.a3;
        (self.a1 + self.a3) - (diff * diff + self.a2 * self.a2).sqrt()
    }

    /// Determinant `a1 * a3 - a2^2` of the tensor.
    #[inline]
    pub fn determinant(&self) -> Float {
        self.a1 * self.a3 - self.a2 * self.a2
    }

    /// Solve for the displacement increment `(d_row, d_col)`.
    ///
    /// Returns `None` if the tensor is singular (zero determinant).
    #[inline]
    pub fn solve(&self) -> Option<Vec2> {
        let det = self.determinant();
        if det == 0.0 {
            None
        } else {
            let d_col = (self.a2 * self.b2 - self.a3 * self.b1) / det;
            let d_row = (self.a2 * self.b1 - self.a1 * self.b2) / det;
            Some(Vec2::new(d_row, d_col))
        }
    }

    /// The tensor `A` as a matrix, in `(x, y)` order.
    pub fn to_mat(&self) -> Mat2 {
        Mat2::new(self.a1, self.a2, self.a2, self.a3)
    }
}

// TESTS #############################################################

#[cfg(test)]
mod tests {

    use super::*;
    use approx;
    use quickcheck_macros;

    const EPSILON: Float = 1e-3;

    #[test]
    fn empty_tensor() {
        let tensor = StructureTensor::new();
        assert_eq!(tensor.corner_response(), 0.0);
        assert_eq!(tensor.solve(), None);
    }

    #[test]
    fn aperture_problem_is_singular() {
        // Only horizontal gradients: the vertical motion is unobservable.
        let mut tensor = StructureTensor::new();
        for _ in 0..9 {
            tensor.add_weighted(1.0, 2.0, 0.0, 1.0);
        }
        assert_eq!(tensor.determinant(), 0.0);
        assert_eq!(tensor.solve(), None);
    }

    #[test]
    fn corner_response_of_diagonal_tensor() {
        let tensor = StructureTensor {
            a1: 5.0,
            a2: 0.0,
            a3: 2.0,
            b1: 0.0,
            b2: 0.0,
        };
        approx::assert_relative_eq!(tensor.corner_response(), 4.0);
    }

    #[test]
    fn corner_response_keeps_single_cross_term() {
        let tensor = StructureTensor {
            a1: 4.0,
            a2: 3.0,
            a3: 4.0,
            b1: 0.0,
            b2: 0.0,
        };
        // 8 - sqrt(0 + 9), and not 8 - sqrt(0 + 36).
        approx::assert_relative_eq!(tensor.corner_response(), 5.0);
    }

    #[test]
    fn solve_known_system() {
        // A = [[2, 1], [1, 3]], d = (d_col, d_row) = (1, -2)  =>  b = -A d = (0, 5)
        let tensor = StructureTensor {
            a1: 2.0,
            a2: 1.0,
            a3: 3.0,
            b1: 0.0,
            b2: 5.0,
        };
        let d = tensor.solve().unwrap();
        approx::assert_relative_eq!(d, Vec2::new(-2.0, 1.0), epsilon = 1e-6);
    }

    // PROPERTY TESTS ################################################

    #[quickcheck_macros::quickcheck]
    fn solve_inverts_the_tensor(a1: i8, a2: i8, a3: i8, b1: i8, b2: i8) -> bool {
        let tensor = StructureTensor {
            a1: Float::from(a1),
            a2: Float::from(a2),
            a3: Float::from(a3),
            b1: Float::from(b1),
            b2: Float::from(b2),
        };
        match tensor.solve() {
            None => tensor.determinant() == 0.0,
            Some(d) => {
                // A * (d_col, d_row) + b == 0
                let residual = tensor.to_mat() * Vec2::new(d[1], d[0]) + Vec2::new(tensor.b1, tensor.b2);
                let scale = 1.0 + tensor.b1.abs() + tensor.b2.abs() + tensor.to_mat().norm() * d.norm();
                approx::relative_eq!(residual.norm() / scale, 0.0, epsilon = EPSILON)
            }
        }
    }

    #[quickcheck_macros::quickcheck]
    fn corner_response_bounded_by_trace(gradients: Vec<(i8, i8)>) -> bool {
        let mut tensor = StructureTensor::new();
        for &(gx, gy) in &gradients {
            tensor.add_weighted(1.0, Float::from(gx), Float::from(gy), 0.0);
        }
        let response = tensor.corner_response();
        response <= tensor.a1 + tensor.a3 && tensor.b1 == 0.0 && tensor.b2 == 0.0
    }
}
