// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Type aliases for common types used all over the code base.

use nalgebra as na;

/// At the moment, the library is focused on f32 computation.
pub type Float = f32;

/// A vector with two Float coordinates.
///
/// Points and flows are ordered `(row, col)`, like matrix indices.
pub type Vec2 = na::Vector2<Float>;

/// A 2x2 matrix of Floats.
pub type Mat2 = na::Matrix2<Float>;

/// A 3x3 matrix of Floats, used for convolution kernels.
pub type Mat3 = na::Matrix3<Float>;
