// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors reported by the library.
//!
//! Only contract violations are reported.
//! Points near borders or in flat regions are not errors,
//! their corner response must be inspected instead.

/// Errors returned by the flow evaluation and its helpers.
#[derive(thiserror::Error, Debug)]
pub enum FlowError {
    /// One of the frames has no pixel.
    #[error("frames must not be empty")]
    EmptyFrame,
    /// Frames do not have the same `(rows, cols)` shape.
    #[error("frames must have the same size, got {first:?} and {second:?}")]
    FrameSizeMismatch {
        /// Shape of the first frame.
        first: (usize, usize),
        /// Shape of the second frame.
        second: (usize, usize),
    },
    /// Points and search windows are not paired one to one.
    #[error("expected one search window per point, got {points} points and {windows} windows")]
    LengthMismatch {
        /// Number of points.
        points: usize,
        /// Number of windows.
        windows: usize,
    },
    /// Continuation was requested without one previous flow per point.
    #[error("continuing from a previous flow requires {expected} entries, found {found}")]
    MissingPreviousFlow {
        /// Number of points.
        expected: usize,
        /// Length of the provided flow.
        found: usize,
    },
    /// The image is not 8 bits gray.
    #[error("only 8 bits single channel images are supported, got {0:?}")]
    UnsupportedFormat(image::ColorType),
    /// A line of a points file could not be parsed.
    #[error("parsing error at line {line}: {content:?}")]
    Parse {
        /// Line number, starting at 1.
        line: usize,
        /// Content of the line.
        content: String,
    },
    /// Image decoding or encoding error.
    #[error(transparent)]
    Image(#[from] image::ImageError),
}
