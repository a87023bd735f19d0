// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Spatial weighting of the pixels of a search window.

use crate::misc::type_aliases::{Float, Vec2};

/// Signature of a custom weighting function:
/// `(pixel, window_center, sigma) -> weight`, positions in `(row, col)`.
pub type WeightFn = fn(Vec2, Vec2, Float) -> Float;

/// Strategy used to weight each pixel contribution to the structure tensor.
///
/// `Uniform` is the default and ignores `sigma`.
/// `Gaussian` must be explicitly selected and changes the results.
#[derive(Clone, Copy, Debug, Default)]
pub enum SpatialWeighting {
    /// Every pixel has a weight of 1.
    #[default]
    Uniform,
    /// `exp(-dist^2 / (2 sigma^2))` with `dist` the distance to the window center.
    Gaussian,
    /// User provided weighting.
    Custom(WeightFn),
}

impl SpatialWeighting {
    /// Weight of a pixel in a window centered on `center`.
    #[inline]
    pub fn weight(&self, pixel: Vec2, center: Vec2, sigma: Float) -> Float {
        match self {
            SpatialWeighting::Uniform => 1.0,
            SpatialWeighting::Gaussian => gaussian(pixel, center, sigma),
            SpatialWeighting::Custom(f) => f(pixel, center, sigma),
        }
    }
}

fn gaussian(pixel: Vec2, center: Vec2, sigma: Float) -> Float {
    let dist_sq = (pixel - center).norm_squared();
    (-dist_sq / (2.0 * sigma * sigma)).exp()
}
