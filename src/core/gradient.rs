// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Gradients restricted to the regions of interest of the tracked points.
//!
//! Gradients are never computed over the whole frame,
//! only where an inclusion mask, union of all clipped search windows, is set.

use nalgebra::DMatrix;
use rayon::prelude::*;

use crate::core::window::ClippedWindow;
use crate::misc::type_aliases::{Float, Mat3};

/// Convert an 8 bits image into a floating point intensity field.
///
/// Columns are converted in parallel.
pub fn to_float(mat: &DMatrix<u8>) -> DMatrix<Float> {
    let (nb_rows, nb_cols) = mat.shape();
    let mut field = DMatrix::zeros(nb_rows, nb_cols);
    if nb_rows == 0 {
        return field;
    }
    field
        .as_mut_slice()
        .par_chunks_mut(nb_rows)
        .zip(mat.as_slice().par_chunks(nb_rows))
        .for_each(|(dst, src)| {
            dst.iter_mut()
                .zip(src)
                .for_each(|(d, &s)| *d = Float::from(s));
        });
    field
}

/// Sobel kernels `(kx, ky)` for the horizontal and vertical derivatives.
///
/// Kernels are normalized (divided by 8) so that the response on a ramp
/// is its slope in intensity per pixel.
/// They are applied by correlation: `kernel[(1 + di, 1 + dj)]` weights the pixel at `(i + di, j + dj)`.
pub fn sobel_kernels() -> (Mat3, Mat3) {
    #[rustfmt::skip]
    let kx = Mat3::new(
        -1.0, 0.0, 1.0,
        -2.0, 0.0, 2.0,
        -1.0, 0.0, 1.0,
    ) / 8.0;
    (kx, kx.transpose())
}

/// Mask of the pixels covered by at least one of the clipped windows.
pub fn inclusion_mask(shape: (usize, usize), windows: &[ClippedWindow]) -> DMatrix<bool> {
    let mut mask = DMatrix::repeat(shape.0, shape.1, false);
    for w in windows {
        mask.view_mut((w.row_begin, w.col_begin), (w.height(), w.width()))
            .fill(true);
    }
    mask
}

/// Correlate a field with a 3x3 kernel, only where the mask is set.
///
/// Output pixels outside of the mask are 0.
/// Neighbors outside of the field are clamped to its border.
pub fn convolve_masked(field: &DMatrix<Float>, mask: &DMatrix<bool>, kernel: &Mat3) -> DMatrix<Float> {
    assert_eq!(field.shape(), mask.shape());
    let (nb_rows, nb_cols) = field.shape();
    let mut out = DMatrix::zeros(nb_rows, nb_cols);
    if nb_rows == 0 {
        return out;
    }
    out.as_mut_slice()
        .par_chunks_mut(nb_rows)
        .enumerate()
        .for_each(|(j, column)| {
            for (i, value) in column.iter_mut().enumerate() {
                if mask[(i, j)] {
                    *value = correlate_at(field, kernel, i, j);
                }
            }
        });
    out
}

fn correlate_at(field: &DMatrix<Float>, kernel: &Mat3, i: usize, j: usize) -> Float {
    let (nb_rows, nb_cols) = field.shape();
    let mut acc = 0.0;
    for ki in 0..3 {
        let ii = (i + ki).saturating_sub(1).min(nb_rows - 1);
        for kj in 0..3 {
            let k = kernel[(ki, kj)];
            if k != 0.0 {
                let jj = (j + kj).saturating_sub(1).min(nb_cols - 1);
                acc += k * field[(ii, jj)];
            }
        }
    }
    acc
}

/// Horizontal and vertical gradients `(fx, fy)` of a field, restricted to a mask.
pub fn masked_gradients(
    field: &DMatrix<Float>,
    mask: &DMatrix<bool>,
) -> (DMatrix<Float>, DMatrix<Float>) {
    let (kx, ky) = sobel_kernels();
    (
        convolve_masked(field, mask, &kx),
        convolve_masked(field, mask, &ky),
    )
}

// TESTS #############################################################
