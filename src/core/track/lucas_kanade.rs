// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Types and functions to estimate sparse optical flow with the iterative Lucas-Kanade method.
//!
//! For each tracked point, a translation is estimated such that the search window
//! around the point in the first frame best matches the second frame.
//! Gradients of the first frame are computed once, restricted to the union of windows.
//! Then each point iterates a fixed number of times:
//! accumulate the structure tensor and mismatch over its window,
//! warping the second frame with bilinear interpolation,
//! and add the solved increment to its flow.
//!
//! Points are independent and processed in parallel,
//! each one writing only its own flow and corner response.

use log::{debug, trace};
use nalgebra::DMatrix;
use rayon::prelude::*;

use crate::core::{
    gradient,
    interpolation,
    track::weighting::SpatialWeighting,
    window::{self, ClippedWindow, SearchWindow, Target},
};
use crate::error::FlowError;
use crate::math::structure_tensor::StructureTensor;
use crate::misc::type_aliases::{Float, Vec2};

/// Configuration of the Tracker.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Width of the spatial weighting.
    /// Unused with the default `Uniform` weighting.
    pub sigma: Float,
    /// Number of refinement iterations per point.
    pub nb_iterations: usize,
    /// Weighting of the pixels inside a search window.
    pub weighting: SpatialWeighting,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sigma: 1.0,
            nb_iterations: 10,
            weighting: SpatialWeighting::Uniform,
        }
    }
}

impl Config {
    /// Initialize a tracker with this configuration.
    pub fn init(self) -> Tracker {
        Tracker {
            config: self,
            corner_responses: Vec::new(),
        }
    }
}

/// Struct used to evaluate the flow of tracked points between two frames.
/// Can only be constructed by initialization from a `Config`.
pub struct Tracker {
    config: Config,
    corner_responses: Vec<Float>,
}

/// Shared read-only data of one evaluation.
struct Fields<'a> {
    frame_1: &'a DMatrix<Float>,
    frame_2: &'a DMatrix<Float>,
    fx: &'a DMatrix<Float>,
    fy: &'a DMatrix<Float>,
}

impl Tracker {
    /// Configuration of the tracker.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Corner responses of the points of the last evaluation.
    ///
    /// One value per point. Points with a degenerate window
    /// (nothing left after clipping to the image interior) have a NaN response.
    pub fn corner_responses(&self) -> &[Float] {
        &self.corner_responses
    }

    /// Evaluate the flow `(d_row, d_col)` of each point, starting from a zero flow.
    ///
    /// `points` and `windows` must have the same length.
    /// Both frames must be non-empty and of the same size.
    pub fn evaluate(
        &mut self,
        frame_1: &DMatrix<u8>,
        frame_2: &DMatrix<u8>,
        points: &[Vec2],
        windows: &[SearchWindow],
    ) -> Result<Vec<Vec2>, FlowError> {
        let mut flow = Vec::with_capacity(points.len());
        self.evaluate_into(frame_1, frame_2, points, windows, &mut flow, false)?;
        Ok(flow)
    }

    /// Evaluate the flow of each point into a caller provided buffer.
    ///
    /// If `use_previous` is true, the buffer must already contain one flow per point,
    /// used as initial estimates and refined in place.
    /// Otherwise it is resized to the number of points and zeroed.
    /// The buffer is never reallocated if it already has the right length.
    ///
    /// Points whose window is degenerate keep their flow untouched.
    pub fn evaluate_into(
        &mut self,
        frame_1: &DMatrix<u8>,
        frame_2: &DMatrix<u8>,
        points: &[Vec2],
        windows: &[SearchWindow],
        flow: &mut Vec<Vec2>,
        use_previous: bool,
    ) -> Result<(), FlowError> {
        check_frames(frame_1, frame_2)?;
        let targets = window::pair(points, windows)?;
        if use_previous {
            if flow.len() != targets.len() {
                return Err(FlowError::MissingPreviousFlow {
                    expected: targets.len(),
                    found: flow.len(),
                });
            }
        } else {
            flow.clear();
            flow.resize(targets.len(), Vec2::zeros());
        }

        // Gradients only inside the windows.
        let shape = frame_1.shape();
        let clipped: Vec<Option<ClippedWindow>> = targets
            .iter()
            .map(|t| ClippedWindow::clip(t, shape))
            .collect();
        let surviving: Vec<ClippedWindow> = clipped.iter().flatten().copied().collect();
        let mask = gradient::inclusion_mask(shape, &surviving);
        let (field_1, field_2) = rayon::join(
            || gradient::to_float(frame_1),
            || gradient::to_float(frame_2),
        );
        let (fx, fy) = gradient::masked_gradients(&field_1, &mask);
        debug!(
            "Evaluating flow of {} points ({} degenerate windows, {} masked pixels)",
            targets.len(),
            targets.len() - surviving.len(),
            mask.iter().filter(|&&m| m).count()
        );

        let fields = Fields {
            frame_1: &field_1,
            frame_2: &field_2,
            fx: &fx,
            fy: &fy,
        };
        let config = &self.config;
        self.corner_responses.clear();
        self.corner_responses.resize(targets.len(), Float::NAN);
        flow.par_iter_mut()
            .zip(self.corner_responses.par_iter_mut())
            .zip(targets.par_iter().zip(clipped.par_iter()))
            .enumerate()
            .for_each(|(id, ((flow, response), (target, clipped)))| match clipped {
                Some(win) => refine(config, &fields, target, win, flow, response),
                None => trace!("Point {} has a degenerate window, skipped", id),
            });
        Ok(())
    }
} // impl Tracker

/// Positions `point + flow` of the points in the second frame.
pub fn tracked_positions(points: &[Vec2], flow: &[Vec2]) -> Vec<Vec2> {
    points.iter().zip(flow).map(|(p, f)| p + f).collect()
}

// Helper ######################################################################

fn check_frames(frame_1: &DMatrix<u8>, frame_2: &DMatrix<u8>) -> Result<(), FlowError> {
    if frame_1.is_empty() || frame_2.is_empty() {
        Err(FlowError::EmptyFrame)
    } else if frame_1.shape() != frame_2.shape() {
        Err(FlowError::FrameSizeMismatch {
            first: frame_1.shape(),
            second: frame_2.shape(),
        })
    } else {
        Ok(())
    }
}

/// Iteratively refine the flow of one point.
/// The corner response of the last iteration is kept.
fn refine(
    config: &Config,
    fields: &Fields,
    target: &Target,
    win: &ClippedWindow,
    flow: &mut Vec2,
    response: &mut Float,
) {
    for _ in 0..config.nb_iterations {
        let tensor = accumulate(config, fields, target, win, flow);
        *response = tensor.corner_response();
        if let Some(delta) = tensor.solve() {
            *flow += delta;
        }
    }
}

/// Accumulate the structure tensor and mismatch of one iteration.
///
/// Warped positions are only checked against `[0, row_end] x [0, col_end]`
/// of the clipped window (ends included), not against the image nor the window beginning.
#[allow(clippy::cast_precision_loss)]
fn accumulate(
    config: &Config,
    fields: &Fields,
    target: &Target,
    win: &ClippedWindow,
    flow: &Vec2,
) -> StructureTensor {
    let row_max = win.row_end as Float;
    let col_max = win.col_end as Float;
    let mut tensor = StructureTensor::new();
    for (i, j) in win.pixels() {
        let pixel = Vec2::new(i as Float, j as Float);
        let warped = pixel + flow;
        if warped[0] < 0.0 || warped[1] < 0.0 || warped[0] > row_max || warped[1] > col_max {
            continue;
        }
        let ft = interpolation::bilinear(fields.frame_2, warped[0], warped[1])
            - fields.frame_1[(i, j)];
        let weight = config.weighting.weight(pixel, target.point, config.sigma);
        tensor.add_weighted(weight, fields.fx[(i, j)], fields.fy[(i, j)], ft);
    }
    tensor
}

// TESTS #############################################################
