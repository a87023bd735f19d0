// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Sub-pixel sampling of matrices.

use nalgebra::{DMatrix, Scalar};
use num_traits::AsPrimitive;

use crate::misc::type_aliases::Float;

/// Bilinear interpolation of a matrix at the fractional position `(row, col)`.
///
/// Positions outside of the matrix are clamped to its border.
/// The matrix must not be empty.
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_sign_loss)]
#[allow(clippy::cast_precision_loss)]
pub fn bilinear<T>(mat: &DMatrix<T>, row: Float, col: Float) -> Float
where
    T: Scalar + AsPrimitive<Float>,
{
    let (nb_rows, nb_cols) = mat.shape();
    debug_assert!(nb_rows > 0 && nb_cols > 0);
    let row = row.max(0.0).min((nb_rows - 1) as Float);
    let col = col.max(0.0).min((nb_cols - 1) as Float);

    let i0 = row.floor() as usize;
    let j0 = col.floor() as usize;
    let i1 = (i0 + 1).min(nb_rows - 1);
    let j1 = (j0 + 1).min(nb_cols - 1);
    let a = row - i0 as Float;
    let b = col - j0 as Float;

    let v00: Float = mat[(i0, j0)].as_();
    let v10: Float = mat[(i1, j0)].as_();
    let v01: Float = mat[(i0, j1)].as_();
    let v11: Float = mat[(i1, j1)].as_();

    let top = v00 + b * (v01 - v00);
    let bottom = v10 + b * (v11 - v10);
    top + a * (bottom - top)
}

// TESTS #############################################################
