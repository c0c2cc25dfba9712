//! High-level entry points of the argmin-backed minimizer.
//!
//! [`minimize`] maps the registry snapshot into the solver's internal space,
//! picks an L-BFGS solver from the strategy, runs it (twice for the
//! thorough strategy), then performs the error analysis at the best point
//! and decides validity. [`profile`] is the reduced version used by contour
//! tracing: minimize over whatever is still free, no error analysis.
use std::cell::RefCell;

use crate::{
    inference::hessian::{
        covariance_from_hessian, errors_from_covariance, estimated_distance_to_minimum,
    },
    optimization::{
        errors::{OptError, OptResult},
        minimizer::{
            adapter::{ArgMinAdapter, EvalTracker, ParameterSpace},
            builders::{build_optimizer_hager_zhang, build_optimizer_more_thuente},
            finite_diff::{compute_hessian_from_grad, probe_curvature},
            run::{RawRun, run_lbfgs},
            traits::Objective,
            types::{FunctionMinimum, Grad, Hessian},
            validation::validate_value,
        },
    },
    parameters::FitParameter,
    session::{LineSearcher, SessionOptions},
};
use argmin::core::Error;
use ndarray::Array1;

/// minimize — full minimization with error analysis.
///
/// Parameters
/// ----------
/// - `f`: objective over the full parameter vector.
/// - `params`: registry snapshot, ordered by index.
/// - `opts`: session configuration.
///
/// Returns
/// -------
/// `OptResult<FunctionMinimum>`
///   Best point, errors scaled to `opts.error_def`, covariance and validity.
///
/// Errors
/// ------
/// - `OptError::NoParameters` for an empty snapshot.
/// - Objective errors or `NonFiniteCost` at the starting point.
///
/// Notes
/// -----
/// - Validity requires solver convergence (or a stall), a positive-definite
///   Hessian and `EDM <= tolerance · error_def`. Anything else yields
///   `is_valid == false` with the reason in `status`.
/// - When no parameter is free the objective is evaluated once and the
///   starting point is returned as a valid minimum.
pub fn minimize<F: Objective + ?Sized>(
    f: &F, params: &[FitParameter], opts: &SessionOptions,
) -> OptResult<FunctionMinimum> {
    if params.is_empty() {
        return Err(OptError::NoParameters);
    }
    let space = ParameterSpace::new(params);
    let initial = space.template().to_vec();
    let f0 = f.value(&initial)?;
    validate_value(f0)?;
    if space.n_free() == 0 {
        return Ok(FunctionMinimum::at_point(initial, f0, opts.error_def, "no free parameters"));
    }

    let tracker = EvalTracker::new();
    let mut run = solve(f, &space, opts, &tracker)?;
    let mut iterations = run.iterations;
    if opts.strategy.polishes() && run.converged {
        let restarted = space.restarted_at(&space.to_external(&run.theta_hat));
        let polish = solve(f, &restarted, opts, &tracker)?;
        iterations += polish.iterations;
        if polish.value <= run.value {
            run = polish;
        }
    }

    let x = space.to_external(&run.theta_hat);
    let mut minimum = FunctionMinimum {
        initial,
        errors: vec![0.0; x.len()],
        x,
        covariance: None,
        free: space.free_indices().to_vec(),
        min_value: run.value,
        edm: f64::NAN,
        is_valid: false,
        status: run.status.clone(),
        iterations,
        fn_evals: tracker.calls(),
        error_def: opts.error_def,
    };

    let analysis = match analyze(f, &space, &minimum.x, opts.error_def) {
        Ok(analysis) => analysis,
        Err(err) => {
            minimum.status = format!("{}; error analysis failed: {err}", run.status);
            return Ok(minimum);
        }
    };
    for (&i, &e) in space.free_indices().iter().zip(analysis.errors.iter()) {
        minimum.errors[i] = e;
    }
    minimum.covariance = Some(analysis.covariance);
    minimum.edm = analysis.edm;

    let edm_limit = opts.tolerance * opts.error_def;
    (minimum.is_valid, minimum.status) = if !run.converged {
        (false, run.status)
    } else if !analysis.positive_definite {
        (false, format!("{}; Hessian not positive definite", run.status))
    } else if analysis.edm > edm_limit {
        (false, format!("{}; EDM {:.3e} above {:.3e}", run.status, analysis.edm, edm_limit))
    } else if run.stalled {
        (true, format!("converged (solver stopped: {})", run.status))
    } else {
        (true, run.status)
    };
    Ok(minimum)
}

/// ProfilePoint — minimum over the free parameters of a pinned space.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfilePoint {
    pub x: Vec<f64>,
    pub value: f64,
    pub converged: bool,
    pub status: String,
}

/// profile — minimize over the free parameters of `space`, no error
/// analysis. With nothing free the objective is just evaluated.
pub fn profile<F: Objective + ?Sized>(
    f: &F, space: &ParameterSpace, opts: &SessionOptions,
) -> OptResult<ProfilePoint> {
    if space.n_free() == 0 {
        let x = space.template().to_vec();
        let value = f.value(&x)?;
        validate_value(value)?;
        return Ok(ProfilePoint { x, value, converged: true, status: "evaluated".to_string() });
    }
    let tracker = EvalTracker::new();
    let run = solve(f, space, opts, &tracker)?;
    Ok(ProfilePoint {
        x: space.to_external(&run.theta_hat),
        value: run.value,
        converged: run.converged,
        status: run.status,
    })
}

// ---- Helper methods ----

fn solve<F: Objective + ?Sized>(
    f: &F, space: &ParameterSpace, opts: &SessionOptions, tracker: &EvalTracker,
) -> OptResult<RawRun> {
    let theta0 = space.to_internal();
    let problem = ArgMinAdapter::new(f, space, tracker, opts.max_function_calls);
    match opts.strategy.line_searcher() {
        LineSearcher::MoreThuente => {
            let solver = build_optimizer_more_thuente(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
        LineSearcher::HagerZhang => {
            let solver = build_optimizer_hager_zhang(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
    }
}

/// Curvature summary at the best point, free parameters only.
struct ErrorAnalysis {
    covariance: Hessian,
    errors: Array1<f64>,
    edm: f64,
    positive_definite: bool,
}

fn analyze<F: Objective + ?Sized>(
    f: &F, space: &ParameterSpace, x: &[f64], error_def: f64,
) -> OptResult<ErrorAnalysis> {
    let z = space.free_values(x);
    let (hessian, gradient) = match f.grad(x) {
        Ok(g) => {
            let gradient: Grad = space.free_values(&g);
            let closure_err: RefCell<Option<Error>> = RefCell::new(None);
            let grad_fn = |z: &Array1<f64>| -> Array1<f64> {
                match f.grad(&space.embed(z)) {
                    Ok(g) => space.free_values(&g),
                    Err(e) => {
                        let mut slot = closure_err.borrow_mut();
                        if slot.is_none() {
                            *slot = Some(e.into());
                        }
                        Array1::from_elem(z.len(), f64::NAN)
                    }
                }
            };
            (compute_hessian_from_grad(&grad_fn, &z, &closure_err)?, gradient)
        }
        Err(OptError::GradientNotImplemented) => {
            let value_fn = |z: &Array1<f64>| f.value(&space.embed(z));
            let probe = probe_curvature(&value_fn, &z, space.steps(), space.limits())?;
            (probe.hessian, probe.gradient)
        }
        Err(e) => return Err(e),
    };
    let (covariance, inverse) = covariance_from_hessian(&hessian, error_def)?;
    let errors = errors_from_covariance(&covariance);
    let edm = estimated_distance_to_minimum(&gradient, &inverse);
    Ok(ErrorAnalysis { covariance, errors, edm, positive_definite: inverse.positive_definite })
}
