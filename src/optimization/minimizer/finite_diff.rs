//! minimizer::finite_diff — finite-difference gradients and Hessians.
//!
//! Purpose
//! -------
//! Provide the derivative approximations the minimizer needs when the
//! objective does not supply them: a gradient for the solver's internal
//! space, and a Hessian in external coordinates for the error analysis.
//!
//! Key behaviors
//! -------------
//! - [`run_fd_diff`]: forward-difference gradient with error capture, the
//!   fallback when the central gradient is unusable.
//! - [`compute_hessian_from_grad`]: central-difference Hessian of an
//!   analytic gradient (forward fallback), for objectives that provide one.
//! - [`probe_curvature`]: second differences of objective *values* with a
//!   per-parameter step tuned so each probe raises the objective by a fixed
//!   relative amount. Returns the Hessian and the matching central gradient.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every matrix leaving this module passes [`validate_hessian`] and is
//!   exactly symmetric.
//! - Probes never step outside the parameter limits: steps are capped at
//!   half the distance to the nearest limit.
//!
//! Conventions
//! -----------
//! - Errors raised by the objective inside a `finitediff` closure are routed
//!   through a `RefCell` slot and returned once the closure finishes.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the error capture of [`run_fd_diff`], symmetric and
//!   exact Hessians on quadratics for both paths, step refinement on a badly
//!   scaled quadratic, and the limit cap.
use crate::optimization::{
    errors::{OptError, OptResult},
    minimizer::{
        types::{Grad, Hessian, Theta},
        validation::{validate_grad, validate_hessian, validate_value},
    },
};
use argmin::core::Error;
use finitediff::FiniteDiff;
use ndarray::Array1;
use std::cell::RefCell;

/// Rise of the objective aimed for by each diagonal probe, relative to
/// `max(|f|, 1)`.
pub const PROBE_TARGET_REL: f64 = 1e-6;

/// Maximum number of step rescalings per parameter in [`probe_curvature`].
pub const MAX_STEP_REFINEMENTS: usize = 6;

/// Smallest step ever used by a curvature probe.
const MIN_PROBE_STEP: f64 = 1e-10;

/// Result of [`probe_curvature`]: the Hessian, central gradient and the
/// final step used for each coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct CurvatureProbe {
    pub hessian: Hessian,
    pub gradient: Grad,
    pub steps: Vec<f64>,
}

/// run_fd_diff — forward-difference gradient with error capture.
///
/// Parameters
/// ----------
/// - `theta`: point to differentiate at.
/// - `func`: infallible closure; errors are parked in `closure_err` and the
///   closure returns `NaN`.
/// - `closure_err`: slot the closure writes its first error into.
///
/// Errors
/// ------
/// - The parked objective error, converted into [`OptError`].
/// - `OptError::InvalidGradient` when any entry is non-finite.
pub fn run_fd_diff<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> OptResult<Grad> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(func);
    let dim = theta.len();
    if let Some(err) = closure_err.take() {
        return Err(err.into());
    }
    validate_grad(&fd_grad, dim)?;
    Ok(fd_grad)
}

/// compute_hessian_from_grad — Hessian of an analytic gradient.
///
/// Central differences first; forward differences if the central matrix
/// fails validation. The result is symmetrized.
///
/// Errors
/// ------
/// - Parked gradient errors from `closure_err`.
/// - `OptError::InvalidHessian` / `HessianDimMismatch` when both paths fail
///   validation.
pub fn compute_hessian_from_grad<F: Fn(&Array1<f64>) -> Array1<f64>>(
    grad: &F, z: &Array1<f64>, closure_err: &RefCell<Option<Error>>,
) -> OptResult<Hessian> {
    let dim = z.len();
    closure_err.replace(None);
    let mut cent_hess = z.central_hessian(grad);
    if let Some(err) = closure_err.take() {
        return Err(err.into());
    }
    match validate_hessian(&cent_hess, dim) {
        Ok(_) => {
            symmetrize_hess(&mut cent_hess);
            Ok(cent_hess)
        }
        Err(_) => {
            let mut forward_hess = z.forward_hessian(grad);
            if let Some(err) = closure_err.take() {
                return Err(err.into());
            }
            validate_hessian(&forward_hess, dim)?;
            symmetrize_hess(&mut forward_hess);
            Ok(forward_hess)
        }
    }
}

/// probe_curvature — value-based Hessian and gradient at `z`.
///
/// Parameters
/// ----------
/// - `f`: objective over the free parameters in external coordinates.
/// - `z`: point to probe, usually the best fit.
/// - `hints`: initial step per coordinate (the parameters' step sizes).
/// - `limits`: `(lower, upper)` per coordinate.
///
/// Returns
/// -------
/// `OptResult<CurvatureProbe>`
///   Symmetric Hessian `H[i][j] ≈ ∂²f/∂z_i∂z_j`, central gradient and the
///   steps that produced them.
///
/// Errors
/// ------
/// - Objective errors, or `NonFiniteCost` for a non-finite probe value.
/// - `OptError::InvalidHessian` if a second difference is not finite.
///
/// Notes
/// -----
/// - Diagonal step `h_i` is rescaled up to [`MAX_STEP_REFINEMENTS`] times
///   toward `½(f(z+h) + f(z−h)) − f(z) ≈ PROBE_TARGET_REL · max(|f(z)|, 1)`,
///   which keeps round-off small relative to the curvature signal whatever
///   the magnitude of `f`.
/// - Off-diagonal entries use the four-point formula with the final steps.
pub fn probe_curvature<F: Fn(&Array1<f64>) -> OptResult<f64>>(
    f: &F, z: &Array1<f64>, hints: &[f64], limits: &[(Option<f64>, Option<f64>)],
) -> OptResult<CurvatureProbe> {
    let n = z.len();
    let f0 = f(z)?;
    validate_value(f0)?;
    let target = PROBE_TARGET_REL * f0.abs().max(1.0);
    let mut hessian = Hessian::zeros((n, n));
    let mut gradient = Grad::zeros(n);
    let mut steps = vec![0.0; n];

    for i in 0..n {
        let room = limit_room(z[i], limits[i]);
        let mut h = initial_step(z[i], hints[i]).min(room);
        let mut fp = value_at(f, z, &[(i, h)])?;
        let mut fm = value_at(f, z, &[(i, -h)])?;
        for _ in 0..MAX_STEP_REFINEMENTS {
            let rise = 0.5 * (fp + fm) - f0;
            // No measurable rise: the step is lost in round-off (or the
            // direction is flat), so widen it.
            let scale = if rise > 0.0 { (target / rise).sqrt().clamp(0.1, 10.0) } else { 10.0 };
            let next = (h * scale).min(room).max(MIN_PROBE_STEP);
            if (next / h - 1.0).abs() < 0.5 {
                break;
            }
            h = next;
            fp = value_at(f, z, &[(i, h)])?;
            fm = value_at(f, z, &[(i, -h)])?;
        }
        steps[i] = h;
        hessian[[i, i]] = (fp + fm - 2.0 * f0) / (h * h);
        gradient[i] = (fp - fm) / (2.0 * h);
    }

    for i in 0..n {
        for j in 0..i {
            let (hi, hj) = (steps[i], steps[j]);
            let fpp = value_at(f, z, &[(i, hi), (j, hj)])?;
            let fpm = value_at(f, z, &[(i, hi), (j, -hj)])?;
            let fmp = value_at(f, z, &[(i, -hi), (j, hj)])?;
            let fmm = value_at(f, z, &[(i, -hi), (j, -hj)])?;
            let hij = (fpp - fpm - fmp + fmm) / (4.0 * hi * hj);
            hessian[[i, j]] = hij;
            hessian[[j, i]] = hij;
        }
    }

    validate_hessian(&hessian, n)?;
    validate_grad(&gradient, n)?;
    Ok(CurvatureProbe { hessian, gradient, steps })
}

// ---- Helper methods ----

fn symmetrize_hess(hess: &mut Hessian) {
    for i in 0..hess.nrows() {
        for j in 0..i {
            let avg = 0.5 * (hess[[i, j]] + hess[[j, i]]);
            hess[[i, j]] = avg;
            hess[[j, i]] = avg;
        }
    }
}

fn initial_step(z: f64, hint: f64) -> f64 {
    if hint.is_finite() && hint > 0.0 { hint } else { 1e-3 * z.abs().max(1.0) }
}

/// Half the distance to the nearest limit, or infinity when unbounded.
fn limit_room(z: f64, (lower, upper): (Option<f64>, Option<f64>)) -> f64 {
    let below = lower.map_or(f64::INFINITY, |lo| z - lo);
    let above = upper.map_or(f64::INFINITY, |hi| hi - z);
    let room = 0.5 * below.min(above);
    if room > 0.0 { room } else { MIN_PROBE_STEP }
}

fn value_at<F: Fn(&Array1<f64>) -> OptResult<f64>>(
    f: &F, z: &Array1<f64>, shifts: &[(usize, f64)],
) -> OptResult<f64> {
    let mut p = z.clone();
    for &(k, d) in shifts {
        p[k] += d;
    }
    let value = f(&p)?;
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(value)
}
