// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Interoperability conversions between the image and matrix types.

use image::{DynamicImage, GrayImage, Rgb, RgbImage};
use nalgebra::DMatrix;
use std::path::Path;

use crate::error::FlowError;

/// Convert an `(u8,u8,8)` matrix into an `RgbImage`.
///
/// Performs a transposition to accomodate for the
/// column major matrix into the row major image.
#[allow(clippy::cast_possible_truncation)]
pub fn rgb_from_matrix(mat: &DMatrix<(u8, u8, u8)>) -> RgbImage {
    let (nb_rows, nb_cols) = mat.shape();
    let mut img_buf = RgbImage::new(nb_cols as u32, nb_rows as u32);
    for (x, y, pixel) in img_buf.enumerate_pixels_mut() {
        let (r, g, b) = mat[(y as usize, x as usize)];
        *pixel = Rgb([r, g, b]);
    }
    img_buf
}

/// Convert a `GrayImage` into an `u8` matrix.
/// Image pixel `(x, y)` becomes matrix entry `(y, x)`.
pub fn matrix_from_image(img: GrayImage) -> DMatrix<u8> {
    let (width, height) = img.dimensions();
    DMatrix::from_row_slice(height as usize, width as usize, &img.into_raw())
}

/// Convert a decoded image into an `u8` matrix.
///
/// Only 8 bits gray images are accepted, no implicit color conversion is done.
pub fn matrix_from_dynamic(img: DynamicImage) -> Result<DMatrix<u8>, FlowError> {
    match img {
        DynamicImage::ImageLuma8(gray) => Ok(matrix_from_image(gray)),
        other => Err(FlowError::UnsupportedFormat(other.color())),
    }
}

/// Read an 8 bits gray image file into an `u8` matrix.
pub fn read_frame<P: AsRef<Path>>(file_path: P) -> Result<DMatrix<u8>, FlowError> {
    matrix_from_dynamic(image::open(file_path)?)
}

#[cfg(test)]
mod tests {

    use super::*;
    use image::Luma;

    #[test]
    fn gray_image_keeps_orientation() {
        let img = GrayImage::from_fn(5, 3, |x, y| Luma([(10 * y + x) as u8]));
        let mat = matrix_from_image(img);
        assert_eq!(mat.shape(), (3, 5));
        assert_eq!(mat[(2, 4)], 24);
        assert_eq!(mat, DMatrix::from_fn(3, 5, |i, j| (10 * i + j) as u8));
    }

    #[test]
    fn rgb_matrix_keeps_orientation() {
        let mat = DMatrix::from_fn(2, 4, |i, j| (i as u8, j as u8, 7));
        let img = rgb_from_matrix(&mat);
        assert_eq!(img.dimensions(), (4, 2));
        assert_eq!(img.get_pixel(3, 1), &Rgb([1, 3, 7]));
    }

    #[test]
    fn color_image_is_rejected() {
        let rgb = DynamicImage::ImageRgb8(RgbImage::new(4, 4));
        assert!(matches!(
            matrix_from_dynamic(rgb),
            Err(FlowError::UnsupportedFormat(image::ColorType::Rgb8))
        ));
    }

    #[test]
    fn sixteen_bits_image_is_rejected() {
        let gray16 = DynamicImage::new_luma16(4, 4);
        assert!(matches!(
            matrix_from_dynamic(gray16),
            Err(FlowError::UnsupportedFormat(image::ColorType::L16))
        ));
    }

    #[test]
    fn gray_dynamic_image_is_accepted() {
        let gray = DynamicImage::ImageLuma8(GrayImage::from_pixel(6, 2, Luma([9])));
        let mat = matrix_from_dynamic(gray).unwrap();
        assert_eq!(mat.shape(), (2, 6));
        assert!(mat.iter().all(|&v| v == 9));
    }
}
