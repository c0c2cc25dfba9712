//! minimizer::contour — radial contour tracing around a minimum.
//!
//! Purpose
//! -------
//! Find `n_points` points of the boundary `P(x, y) = f_min + error_def`,
//! where `P` is the objective profiled over every other free parameter.
//!
//! Key behaviors
//! -------------
//! - Points sit on rays from the minimum at equally spaced angles, so they
//!   come out ordered around a closed curve.
//! - Each ray is scaled by the two parameter errors, which makes the
//!   boundary of a quadratic objective sit near `t = sqrt(error_def)`.
//! - The crossing is bracketed by doubling `t` and then solved with
//!   Argmin's `BrentRoot`.
//! - With more than two free parameters every evaluation along a ray is a
//!   profile fit, warm-started from the previous one.
//!
//! Invariants & assumptions
//! ------------------------
//! - The region is star-shaped around the minimum (true for convex and
//!   near-quadratic objectives).
//! - A failure at any angle fails the whole contour; no partial result is
//!   returned.
use std::cell::RefCell;
use std::f64::consts::TAU;

use crate::{
    optimization::{
        errors::{OptError, OptResult},
        minimizer::{
            adapter::ParameterSpace,
            api::profile,
            traits::{ContourRequest, Objective},
            types::{ContourPoint, FunctionMinimum},
        },
    },
    parameters::FitParameter,
    session::SessionOptions,
};
use argmin::{
    core::{CostFunction, Error, Executor, State, TerminationReason, TerminationStatus},
    solver::brent::BrentRoot,
};

/// Maximum number of times a ray is doubled while bracketing the boundary.
pub const MAX_BRACKET_DOUBLINGS: usize = 40;

/// Absolute tolerance of the root search, in units of the scaled ray.
pub const ROOT_TOLERANCE: f64 = 1e-9;

const MAX_ROOT_ITERS: u64 = 200;

/// validate_request — reject contour requests no engine could serve.
///
/// Errors
/// ------
/// - `InvalidPointCount` for `n_points == 0`.
/// - `SameContourParameter` when both axes are the same parameter.
/// - `IndexOutOfRange` for an axis beyond the snapshot.
/// - `ParameterFixed` when an axis parameter is fixed.
pub fn validate_request(params: &[FitParameter], request: &ContourRequest) -> OptResult<()> {
    if request.n_points == 0 {
        return Err(OptError::InvalidPointCount {
            n_points: 0,
            reason: "A contour needs at least one point.",
        });
    }
    if request.par_x == request.par_y {
        return Err(OptError::SameContourParameter { index: request.par_x });
    }
    for index in [request.par_x, request.par_y] {
        let param = params
            .get(index)
            .ok_or(OptError::IndexOutOfRange { index, n_params: params.len() })?;
        if param.is_fixed() {
            return Err(OptError::ParameterFixed { index });
        }
    }
    Ok(())
}

/// trace_contour — boundary points of the confidence region.
///
/// Parameters
/// ----------
/// - `f`: objective.
/// - `params`: registry snapshot the minimum was computed from.
/// - `minimum`: the minimum to trace around.
/// - `request`: axes, point count and error definition.
/// - `opts`: settings for the profile fits.
///
/// Returns
/// -------
/// `OptResult<Vec<ContourPoint>>`
///   Exactly `request.n_points` points, counter-clockwise from angle 0.
///
/// Errors
/// ------
/// - Request validation errors (see [`validate_request`]).
/// - `ContourBracketFailed` when a ray leaves the parameter limits or never
///   rises above the threshold.
/// - `ContourProfileFailed` when a profile fit does not converge.
/// - Objective errors.
pub fn trace_contour<F: Objective + ?Sized>(
    f: &F, params: &[FitParameter], minimum: &FunctionMinimum, request: &ContourRequest,
    opts: &SessionOptions,
) -> OptResult<Vec<ContourPoint>> {
    validate_request(params, request)?;
    let space = ParameterSpace::new(params).restarted_at(&minimum.x);
    let (px, py) = (request.par_x, request.par_y);
    let origin = (minimum.x[px], minimum.x[py]);
    let scale = (axis_scale(minimum, params, px), axis_scale(minimum, params, py));
    let error_def = request.error_def.value();
    let warm = RefCell::new(minimum.x.clone());

    let mut points = Vec::with_capacity(request.n_points);
    for k in 0..request.n_points {
        let angle = TAU * k as f64 / request.n_points as f64;
        let ray = Ray {
            f,
            space: &space,
            axes: (px, py),
            origin,
            direction: (scale.0 * angle.cos(), scale.1 * angle.sin()),
            threshold: minimum.min_value + error_def,
            angle,
            opts,
            warm: &warm,
        };
        let t = ray.crossing(error_def.sqrt())?;
        let (x, y) = ray.point(t);
        points.push(ContourPoint::new(x, y));
    }
    Ok(points)
}

// ---- Helper methods ----

/// Step scale of one axis: its error at unit error definition, or the
/// parameter step when no usable error exists.
fn axis_scale(minimum: &FunctionMinimum, params: &[FitParameter], index: usize) -> f64 {
    let error = minimum.errors.get(index).copied().unwrap_or(0.0) / minimum.error_def.sqrt();
    if error.is_finite() && error > 0.0 { error } else { params[index].step() }
}

/// One ray `origin + t·direction` in the contour plane.
struct Ray<'a, F: Objective + ?Sized> {
    f: &'a F,
    space: &'a ParameterSpace,
    axes: (usize, usize),
    origin: (f64, f64),
    direction: (f64, f64),
    threshold: f64,
    angle: f64,
    opts: &'a SessionOptions,
    warm: &'a RefCell<Vec<f64>>,
}

impl<F: Objective + ?Sized> Ray<'_, F> {
    fn point(&self, t: f64) -> (f64, f64) {
        (self.origin.0 + t * self.direction.0, self.origin.1 + t * self.direction.1)
    }

    /// Largest `t` keeping both axis parameters inside their limits.
    fn max_t(&self) -> f64 {
        let along = |index: usize, start: f64, d: f64| -> f64 {
            let (lo, hi) = self.space.limits_of(index);
            match (d > 0.0, d < 0.0) {
                (true, _) => hi.map_or(f64::INFINITY, |hi| (hi - start) / d),
                (_, true) => lo.map_or(f64::INFINITY, |lo| (lo - start) / d),
                _ => f64::INFINITY,
            }
        };
        along(self.axes.0, self.origin.0, self.direction.0)
            .min(along(self.axes.1, self.origin.1, self.direction.1))
    }

    /// Profiled objective minus the threshold at `t`.
    fn excess(&self, t: f64) -> OptResult<f64> {
        let (x, y) = self.point(t);
        let pinned = self
            .space
            .restarted_at(&self.warm.borrow())
            .pinned(&[(self.axes.0, x), (self.axes.1, y)]);
        let fit = profile(self.f, &pinned, self.opts)?;
        if !fit.converged {
            return Err(OptError::ContourProfileFailed { angle: self.angle, status: fit.status });
        }
        *self.warm.borrow_mut() = fit.x;
        Ok(fit.value - self.threshold)
    }

    /// Bracket the crossing by doubling from `t0`, then solve it.
    fn crossing(&self, t0: f64) -> OptResult<f64> {
        let t_max = self.max_t() * (1.0 - 1e-9);
        let mut lo = 0.0;
        let mut hi = t0.min(t_max);
        for _ in 0..MAX_BRACKET_DOUBLINGS {
            let g = self.excess(hi)?;
            if g == 0.0 {
                return Ok(hi);
            }
            if g > 0.0 {
                return self.solve(lo, hi);
            }
            if hi >= t_max {
                return Err(OptError::ContourBracketFailed {
                    angle: self.angle,
                    reason: "parameter limit reached below the threshold",
                });
            }
            lo = hi;
            hi = (2.0 * hi).min(t_max);
        }
        Err(OptError::ContourBracketFailed {
            angle: self.angle,
            reason: "objective does not rise above the threshold",
        })
    }

    fn solve(&self, lo: f64, hi: f64) -> OptResult<f64> {
        let solver = BrentRoot::new(lo, hi, ROOT_TOLERANCE);
        let result = Executor::new(RayProblem(self), solver)
            .configure(|state| state.max_iters(MAX_ROOT_ITERS))
            .run()?;
        let state = result.state();
        if let TerminationStatus::Terminated(TerminationReason::MaxItersReached) =
            state.get_termination_status()
        {
            return Err(OptError::ContourBracketFailed {
                angle: self.angle,
                reason: "root search did not converge",
            });
        }
        state.get_param().copied().ok_or(OptError::MissingThetaHat)
    }
}

/// `argmin` view of a ray: `t ↦ P(origin + t·direction) − threshold`.
struct RayProblem<'r, 'a, F: Objective + ?Sized>(&'r Ray<'a, F>);

impl<F: Objective + ?Sized> CostFunction for RayProblem<'_, '_, F> {
    type Param = f64;
    type Output = f64;

    fn cost(&self, t: &Self::Param) -> Result<Self::Output, Error> {
        Ok(self.0.excess(*t)?)
    }
}
