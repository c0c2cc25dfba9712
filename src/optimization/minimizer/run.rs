//! Execution helper that runs an `argmin` L-BFGS solver on an adapted
//! objective and condenses the final state into a [`RawRun`].
//!
//! A run that aborts inside the solver (typically a line search that can
//! no longer find a descent step near the minimum) is not an error here:
//! the best point the [`EvalTracker`](super::adapter::EvalTracker) saw is
//! reported with `stalled = true`, and the caller decides from the EDM
//! whether that point is a minimum. Only call-limit hits and errors raised
//! by the objective itself end a run as not converged.
use crate::{
    optimization::{
        errors::{OptError, OptResult},
        minimizer::{
            adapter::ArgMinAdapter,
            traits::Objective,
            types::{Grad, Theta},
            validation::{validate_theta_hat, validate_value},
        },
    },
    session::SessionOptions,
};
#[cfg(feature = "obs_slog")]
use argmin::core::{CostFunction, Gradient};
use argmin::core::{Executor, IterState, Solver, State, TerminationReason, TerminationStatus};
#[cfg(feature = "obs_slog")]
use argmin_math::ArgminL2Norm;

/// RawRun — solver outcome in internal coordinates.
///
/// Fields
/// ------
/// - `theta_hat`: best point, internal coordinates of the free parameters.
/// - `value`: objective at `theta_hat`.
/// - `converged`: the solver met its tolerances, or stalled (see
///   `stalled`).
/// - `stalled`: the solver aborted and `theta_hat` is the best point seen.
/// - `status`: termination reason.
/// - `iterations`: completed iterations (0 when the run aborted).
#[derive(Debug, Clone, PartialEq)]
pub struct RawRun {
    pub theta_hat: Theta,
    pub value: f64,
    pub converged: bool,
    pub stalled: bool,
    pub status: String,
    pub iterations: u64,
}

pub fn run_lbfgs<'a, F, S>(
    theta0: Theta, opts: &SessionOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<RawRun>
where
    F: Objective + ?Sized,
    S: Solver<ArgMinAdapter<'a, F>, IterState<Theta, Grad, (), (), (), f64>> + Send + 'static,
{
    #[cfg(feature = "obs_slog")]
    if opts.print_level >= 1 {
        log_initial_state(&theta0, &problem)?;
    }
    let tracker = problem.tracker;
    let max_iters = opts.max_iterations as u64;
    let mut optimizer = Executor::new(problem, solver);
    optimizer = optimizer.configure(|state| state.param(theta0).max_iters(max_iters));
    #[cfg(feature = "obs_slog")]
    if opts.print_level >= 2 {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }

    match optimizer.run() {
        Ok(result) => {
            let mut state = result.state().clone();
            let iterations = state.get_iter();
            let termination = state.get_termination_status().clone();
            let value = state.get_best_cost();
            let theta_hat = validate_theta_hat(state.take_best_param())?;
            validate_value(value)?;
            let converged = matches!(
                termination,
                TerminationStatus::Terminated(
                    TerminationReason::SolverConverged | TerminationReason::TargetCostReached
                )
            );
            let status = match termination {
                TerminationStatus::Terminated(TerminationReason::MaxItersReached) => {
                    format!("iteration limit of {max_iters} reached")
                }
                other => format!("{other:?}"),
            };
            Ok(RawRun { theta_hat, value, converged, stalled: false, status, iterations })
        }
        Err(err) => {
            let err = OptError::from(err);
            let stalled = is_solver_abort(&err);
            match tracker.best() {
                Some((theta_hat, value)) => Ok(RawRun {
                    theta_hat,
                    value,
                    converged: stalled,
                    stalled,
                    status: err.to_string(),
                    iterations: 0,
                }),
                None => Err(err),
            }
        }
    }
}

// ---- Helper Methods ----

/// Errors raised by Argmin itself (line search or solver), as opposed to
/// limits and errors coming from the objective.
fn is_solver_abort(err: &OptError) -> bool {
    matches!(
        err,
        OptError::InvalidParameter { .. }
            | OptError::NotImplemented { .. }
            | OptError::NotInitialized { .. }
            | OptError::ConditionViolated { .. }
            | OptError::PotentialBug { .. }
            | OptError::ImpossibleError { .. }
            | OptError::BackendError { .. }
            | OptError::UnknownError
    )
}

#[cfg(feature = "obs_slog")]
fn log_initial_state<F>(theta0: &Theta, problem: &ArgMinAdapter<'_, F>) -> OptResult<()>
where
    F: Objective + ?Sized,
{
    let f0 = problem.cost(theta0)?;
    let g0n = problem.gradient(theta0).ok().map(|g| g.l2_norm());

    eprintln!(
        "init: f(x0) = {:.6}{}",
        f0,
        g0n.map(|n| format!(", ||grad|| = {:.6}", n)).unwrap_or_default()
    );
    Ok(())
}
