// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Sparse optical flow in Rust (lkrs)
//!
//! Estimates the 2D displacement of a set of tracked points between two gray frames
//! with the iterative Lucas-Kanade method.
//!
//! ```no_run
//! use lucas_kanade_rs::core::{track::lucas_kanade::Config, window::SearchWindow};
//! use lucas_kanade_rs::misc::type_aliases::Vec2;
//! # let (frame_1, frame_2) = (nalgebra::DMatrix::<u8>::zeros(32, 32), nalgebra::DMatrix::<u8>::zeros(32, 32));
//!
//! let mut tracker = Config::default().init();
//! let points = [Vec2::new(16.0, 16.0)];
//! let windows = [SearchWindow::new(11, 11)];
//! let flow = tracker.evaluate(&frame_1, &frame_2, &points, &windows)?;
//! let trackability = tracker.corner_responses();
//! # Ok::<(), lucas_kanade_rs::error::FlowError>(())
//! ```

#![warn(missing_docs)]

pub mod core;
pub mod dataset;
pub mod error;
pub mod math;
pub mod misc;
