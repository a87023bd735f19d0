// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tracked points, their search windows, and window clipping.

use itertools::iproduct;

use crate::error::FlowError;
use crate::misc::type_aliases::Vec2;

/// Size of the search window centered on a tracked point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchWindow {
    /// Number of rows.
    pub height: usize,
    /// Number of columns.
    pub width: usize,
}

impl SearchWindow {
    /// Window of `height` rows and `width` columns.
    pub fn new(height: usize, width: usize) -> Self {
        Self { height, width }
    }
}

/// A tracked point `(row, col)` paired with its search window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Target {
    /// Point position, `(row, col)`.
    pub point: Vec2,
    /// Window centered on the point.
    pub window: SearchWindow,
}

/// Pair points with their windows.
/// Fails if both sequences do not have the same length.
pub fn pair(points: &[Vec2], windows: &[SearchWindow]) -> Result<Vec<Target>, FlowError> {
    if points.len() != windows.len() {
        return Err(FlowError::LengthMismatch {
            points: points.len(),
            windows: windows.len(),
        });
    }
    Ok(points
        .iter()
        .zip(windows)
        .map(|(&point, &window)| Target { point, window })
        .collect())
}

/// Pixel bounds of a search window once clipped to the image interior.
///
/// Bounds are half-open: rows `row_begin..row_end`, columns `col_begin..col_end`.
/// A one pixel border is never part of a clipped window
/// since the gradient kernel needs the neighbors of every pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClippedWindow {
    /// First row.
    pub row_begin: usize,
    /// One past the last row.
    pub row_end: usize,
    /// First column.
    pub col_begin: usize,
    /// One past the last column.
    pub col_end: usize,
}

impl ClippedWindow {
    /// Clip the window of a target to the interior `[1, nb_rows-1) x [1, nb_cols-1)`
    /// of an image of the given shape.
    ///
    /// The window spans `[p - size/2, p + size/2)` on each axis, with `p` the floored point.
    /// Returns `None` if the clipped window has a zero or negative height or width
    /// (degenerate window), including for non finite points.
    #[allow(clippy::cast_possible_truncation)]
    #[allow(clippy::cast_possible_wrap)]
    #[allow(clippy::cast_sign_loss)]
    pub fn clip(target: &Target, shape: (usize, usize)) -> Option<Self> {
        if !(target.point[0].is_finite() && target.point[1].is_finite()) {
            return None;
        }
        let (nb_rows, nb_cols) = shape;
        // Float to int casts saturate for points far outside the image.
        let row = target.point[0].floor() as isize;
        let col = target.point[1].floor() as isize;
        let half_h = (target.window.height / 2) as isize;
        let half_w = (target.window.width / 2) as isize;

        let row_begin = row.saturating_sub(half_h).max(1);
        let row_end = row.saturating_add(half_h).min(nb_rows as isize - 1);
        let col_begin = col.saturating_sub(half_w).max(1);
        let col_end = col.saturating_add(half_w).min(nb_cols as isize - 1);

        if row_end <= row_begin || col_end <= col_begin {
            None
        } else {
            Some(Self {
                row_begin: row_begin as usize,
                row_end: row_end as usize,
                col_begin: col_begin as usize,
                col_end: col_end as usize,
            })
        }
    }

    /// Number of rows of the clipped window.
    pub fn height(&self) -> usize {
        self.row_end - self.row_begin
    }

    /// Number of columns of the clipped window.
    pub fn width(&self) -> usize {
        self.col_end - self.col_begin
    }

    /// Number of pixels inside the clipped window.
    pub fn nb_pixels(&self) -> usize {
        self.height() * self.width()
    }

    /// Iterate over the `(row, col)` pixels of the window.
    /// Columns are the outer loop, following the column major storage of matrices.
    pub fn pixels(&self) -> impl Iterator<Item = (usize, usize)> {
        iproduct!(self.col_begin..self.col_end, self.row_begin..self.row_end).map(|(j, i)| (i, j))
    }
}

// TESTS #############################################################

#[cfg(test)]
mod tests {

    use super::*;
    use quickcheck_macros;

    fn target(row: f32, col: f32, height: usize, width: usize) -> Target {
        Target {
            point: Vec2::new(row, col),
            window: SearchWindow::new(height, width),
        }
    }

    #[test]
    fn pair_length_mismatch() {
        let points = vec![Vec2::new(1.0, 1.0); 3];
        let windows = vec![SearchWindow::new(3, 3); 2];
        match pair(&points, &windows) {
            Err(FlowError::LengthMismatch { points, windows }) => {
                assert_eq!((points, windows), (3, 2))
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn interior_window_is_untouched() {
        let clipped = ClippedWindow::clip(&target(10.0, 12.0, 5, 7), (30, 30)).unwrap();
        assert_eq!(
            clipped,
            ClippedWindow {
                row_begin: 8,
                row_end: 12,
                col_begin: 9,
                col_end: 15,
            }
        );
        assert_eq!((clipped.height(), clipped.width()), (4, 6));
        assert_eq!(clipped.nb_pixels(), 24);
        assert_eq!(clipped.pixels().count(), 24);
    }

    #[test]
    fn window_is_clipped_to_interior() {
        let clipped = ClippedWindow::clip(&target(2.0, 2.0, 21, 21), (5, 5)).unwrap();
        assert_eq!(
            clipped,
            ClippedWindow {
                row_begin: 1,
                row_end: 4,
                col_begin: 1,
                col_end: 4,
            }
        );
    }

    #[test]
    fn corner_point_with_small_window_is_degenerate() {
        assert_eq!(ClippedWindow::clip(&target(0.0, 0.0, 1, 1), (5, 5)), None);
    }

    #[test]
    fn unit_window_has_zero_height() {
        assert_eq!(ClippedWindow::clip(&target(8.0, 8.0, 1, 1), (16, 16)), None);
        assert_eq!(ClippedWindow::clip(&target(8.0, 8.0, 1, 5), (16, 16)), None);
        assert_eq!(ClippedWindow::clip(&target(8.0, 8.0, 5, 0), (16, 16)), None);
    }

    #[test]
    fn far_and_non_finite_points_are_degenerate() {
        let shape = (10, 10);
        for &coord in &[1e30, -1e30, f32::MAX, f32::MIN, f32::INFINITY, f32::NEG_INFINITY, f32::NAN] {
            assert_eq!(ClippedWindow::clip(&target(coord, 3.0, 5, 5), shape), None);
            assert_eq!(ClippedWindow::clip(&target(3.0, coord, 5, 5), shape), None);
        }
        // Huge windows saturate instead of overflowing.
        let clipped = ClippedWindow::clip(&target(3.0, 3.0, usize::MAX, usize::MAX), shape);
        assert_eq!(clipped.map(|w| w.nb_pixels()), Some(64));
    }

    #[test]
    fn point_outside_image_is_degenerate() {
        assert_eq!(ClippedWindow::clip(&target(-20.0, 3.0, 5, 5), (10, 10)), None);
        assert_eq!(ClippedWindow::clip(&target(3.0, 40.0, 5, 5), (10, 10)), None);
    }

    #[test]
    fn tiny_image_has_no_interior() {
        assert_eq!(ClippedWindow::clip(&target(1.0, 1.0, 9, 9), (2, 9)), None);
    }

    #[test]
    fn pixels_are_column_major() {
        let clipped = ClippedWindow::clip(&target(2.0, 2.0, 3, 3), (5, 5)).unwrap();
        let pixels: Vec<_> = clipped.pixels().take(4).collect();
        assert_eq!(clipped.nb_pixels(), 4);
        assert_eq!(pixels, vec![(1, 1), (2, 1), (1, 2), (2, 2)]);
    }

    // PROPERTY TESTS ################################################

    #[quickcheck_macros::quickcheck]
    fn clipped_window_inside_interior(
        row: i16,
        col: i16,
        height: u8,
        width: u8,
        nb_rows: u8,
        nb_cols: u8,
    ) -> bool {
        let (nb_rows, nb_cols) = (nb_rows as usize, nb_cols as usize);
        let t = target(row as f32, col as f32, height as usize, width as usize);
        match ClippedWindow::clip(&t, (nb_rows, nb_cols)) {
            None => true,
            Some(w) => {
                w.row_begin >= 1
                    && w.col_begin >= 1
                    && w.row_begin < w.row_end
                    && w.col_begin < w.col_end
                    && w.row_end + 1 <= nb_rows
                    && w.col_end + 1 <= nb_cols
                    && w.pixels().count() == w.nb_pixels()
            }
        }
    }
}
