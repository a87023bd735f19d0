// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Visualization of tracking results.

use image::RgbImage;
use nalgebra::DMatrix;

use crate::misc::interop;
use crate::misc::type_aliases::{Float, Vec2};

const POINT_COLOR: (u8, u8, u8) = (255, 0, 0);
const FLOW_COLOR: (u8, u8, u8) = (0, 255, 0);

/// Create an RGB image containing the gray image
/// with flow vectors overimposed in green and tracked points in red.
///
/// Flow vectors are multiplied by `scale` to make small motions visible.
pub fn flow_on_image(img: &DMatrix<u8>, points: &[Vec2], flow: &[Vec2], scale: Float) -> RgbImage {
    let mut rgb_mat = img.map(|i| (i, i, i));
    for (point, f) in points.iter().zip(flow) {
        draw_segment(&mut rgb_mat, point, &(point + scale * f), FLOW_COLOR);
        set_color(&mut rgb_mat, point, POINT_COLOR);
    }
    interop::rgb_from_matrix(&rgb_mat)
}

#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_sign_loss)]
#[allow(clippy::cast_precision_loss)]
fn draw_segment(mat: &mut DMatrix<(u8, u8, u8)>, start: &Vec2, end: &Vec2, color: (u8, u8, u8)) {
    let (nb_rows, nb_cols) = mat.shape();
    let delta = end - start;
    let length = delta.amax().ceil();
    // Step count is bounded by the image size.
    let nb_steps = if length.is_finite() {
        (length as usize).min(nb_rows + nb_cols).max(1)
    } else {
        return;
    };
    for k in 0..=nb_steps {
        let t = k as Float / nb_steps as Float;
        set_color(mat, &(start + t * delta), color);
    }
}

#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_sign_loss)]
fn set_color(mat: &mut DMatrix<(u8, u8, u8)>, pos: &Vec2, color: (u8, u8, u8)) {
    let (nb_rows, nb_cols) = mat.shape();
    let (i, j) = (pos[0].round(), pos[1].round());
    if i >= 0.0 && j >= 0.0 && (i as usize) < nb_rows && (j as usize) < nb_cols {
        mat[(i as usize, j as usize)] = color;
    }
}
