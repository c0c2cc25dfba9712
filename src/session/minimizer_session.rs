//! session::minimizer_session — the stateful front of the minimizer.
//!
//! Purpose
//! -------
//! Tie an objective, its parameter registry, a validated configuration and a
//! [`MinimizerEngine`] together, and remember the last minimum so that
//! errors, covariance and contours can be asked for after a fit.
//!
//! Key behaviors
//! -------------
//! - Parameter operations pass through to the [`ParameterRegistry`]; any
//!   successful mutation discards the stored minimum.
//! - [`MinimizerSession::minimize`] snapshots the registry, runs the engine
//!   and writes best-fit values and errors back.
//! - [`MinimizerSession::contour`] takes the error definition as an argument;
//!   there is no stateful "current error definition" to race on.
//!
//! Invariants & assumptions
//! ------------------------
//! - The stored minimum, when present, was computed from the current
//!   registry state (apart from the written-back fit results).
//! - Contour and scan calls borrow the session mutably / immutably, so one
//!   session never serves two requests at once.
//!
//! Testing notes
//! -------------
//! - Unit tests use the bowl `mu²/0.01 + (sigma − 1)²/0.04`, fix/release
//!   continuity, and a recording engine to observe what the session hands
//!   over.
use crate::{
    confidence::ErrorDefinition,
    optimization::{
        errors::{OptError, OptResult},
        minimizer::{
            ArgminEngine, ContourPoint, ContourRequest, FunctionMinimum, Hessian, MinimizerEngine,
            Objective, contour::validate_request, validation::verify_tolerance,
        },
    },
    parameters::{FitParameter, ParameterRegistry},
    session::{
        options::{SessionOptions, Strategy, verify_error_def, verify_print_level},
        scan::{ParameterScan, scan_parameter},
    },
};

/// MinimizerSession — objective, parameters, options, engine and last result.
///
/// Type parameters
/// ---------------
/// - `F`: the objective.
/// - `E`: the engine; [`ArgminEngine`] unless a caller plugs in another.
#[derive(Debug)]
pub struct MinimizerSession<F: Objective, E: MinimizerEngine = ArgminEngine> {
    objective: F,
    registry: ParameterRegistry,
    options: SessionOptions,
    engine: E,
    minimum: Option<FunctionMinimum>,
}

impl<F: Objective> MinimizerSession<F> {
    /// Session over `n_params` (still undefined) parameters with the default
    /// engine and options.
    pub fn new(objective: F, n_params: usize) -> Self {
        Self::with_engine(objective, n_params, ArgminEngine)
    }
}

impl<F: Objective, E: MinimizerEngine> MinimizerSession<F, E> {
    pub fn with_engine(objective: F, n_params: usize, engine: E) -> Self {
        Self {
            objective,
            registry: ParameterRegistry::new(n_params),
            options: SessionOptions::default(),
            engine,
            minimum: None,
        }
    }

    // ---- Parameters ----

    /// Define a free, unbounded parameter.
    pub fn set_parameter(&mut self, index: usize, name: &str, value: f64, step: f64) -> OptResult<()> {
        self.mutate(|r| r.define(index, name, value, step).map(drop))
    }

    /// Define a parameter limited to `[lower, upper]`.
    pub fn set_limited_parameter(
        &mut self, index: usize, name: &str, value: f64, step: f64, lower: f64, upper: f64,
    ) -> OptResult<()> {
        self.mutate(|r| r.define_limited(index, name, value, step, lower, upper).map(drop))
    }

    /// Define a parameter that starts out fixed.
    pub fn set_fixed_parameter(&mut self, index: usize, name: &str, value: f64) -> OptResult<()> {
        self.mutate(|r| r.define_fixed(index, name, value).map(drop))
    }

    pub fn set_value(&mut self, index: usize, value: f64) -> OptResult<()> {
        self.mutate(|r| r.set_value(index, value))
    }

    pub fn set_step(&mut self, index: usize, step: f64) -> OptResult<()> {
        self.mutate(|r| r.set_step(index, step))
    }

    pub fn set_limits(&mut self, index: usize, lower: f64, upper: f64) -> OptResult<()> {
        self.mutate(|r| r.set_limits(index, lower, upper))
    }

    pub fn set_lower_limit(&mut self, index: usize, lower: f64) -> OptResult<()> {
        self.mutate(|r| r.set_lower_limit(index, lower))
    }

    pub fn set_upper_limit(&mut self, index: usize, upper: f64) -> OptResult<()> {
        self.mutate(|r| r.set_upper_limit(index, upper))
    }

    pub fn remove_limits(&mut self, index: usize) -> OptResult<()> {
        self.mutate(|r| r.remove_limits(index))
    }

    /// Fix a parameter at its current value.
    pub fn fix(&mut self, index: usize) -> OptResult<()> {
        self.mutate(|r| r.fix(index))
    }

    /// Move a parameter to `value` and fix it there.
    pub fn fix_at(&mut self, index: usize, value: f64) -> OptResult<()> {
        self.mutate(|r| r.set_fixed(index, value))
    }

    /// Release a fixed parameter; it restarts from its last known value.
    pub fn release(&mut self, index: usize) -> OptResult<()> {
        self.mutate(|r| r.release(index))
    }

    // ---- Configuration ----

    pub fn set_tolerance(&mut self, tolerance: f64) -> OptResult<()> {
        verify_tolerance(tolerance)?;
        self.options.tolerance = tolerance;
        Ok(())
    }

    pub fn set_print_level(&mut self, level: u8) -> OptResult<()> {
        verify_print_level(level)?;
        self.options.print_level = level;
        Ok(())
    }

    pub fn set_strategy(&mut self, strategy: Strategy) {
        self.options.strategy = strategy;
    }

    /// Change the error definition used for parameter errors. The stored
    /// minimum is dropped because its errors were scaled by the old value.
    pub fn set_error_def(&mut self, error_def: f64) -> OptResult<()> {
        verify_error_def(error_def)?;
        self.options.error_def = error_def;
        self.minimum = None;
        Ok(())
    }

    /// Replace the whole configuration.
    pub fn set_options(&mut self, options: SessionOptions) -> OptResult<()> {
        options.validate()?;
        if options.error_def != self.options.error_def {
            self.minimum = None;
        }
        self.options = options;
        Ok(())
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn registry(&self) -> &ParameterRegistry {
        &self.registry
    }

    pub fn objective(&self) -> &F {
        &self.objective
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    // ---- Minimization ----

    /// minimize — run the engine from the current registry state.
    ///
    /// Returns
    /// -------
    /// `OptResult<&FunctionMinimum>`
    ///   The new minimum. Non-convergence is reported through
    ///   `is_valid == false`, not as `Err`.
    ///
    /// Errors
    /// ------
    /// - `NoParameters` / `UndefinedParameter` for an incomplete registry.
    /// - Objective errors at the starting point.
    ///
    /// Notes
    /// -----
    /// - On success the registry holds the best-fit values of the free
    ///   parameters and the errors of all parameters.
    pub fn minimize(&mut self) -> OptResult<&FunctionMinimum> {
        self.minimum = None;
        let params = self.registry.parameters()?;
        let minimum = self.engine.minimize(&self.objective, &params, &self.options)?;
        self.registry.apply_fit(&minimum)?;
        Ok(&*self.minimum.insert(minimum))
    }

    pub fn minimum(&self) -> Option<&FunctionMinimum> {
        self.minimum.as_ref()
    }

    /// Best-fit values of the last minimization.
    pub fn x(&self) -> Option<&[f64]> {
        self.minimum.as_ref().map(FunctionMinimum::x)
    }

    /// Parameter errors of the last minimization; fixed parameters report 0.
    pub fn errors(&self) -> Option<&[f64]> {
        self.minimum.as_ref().map(FunctionMinimum::errors)
    }

    pub fn min_value(&self) -> Option<f64> {
        self.minimum.as_ref().map(|m| m.min_value)
    }

    /// Covariance over the free parameters, when the Hessian allowed one.
    pub fn covariance(&self) -> Option<&Hessian> {
        self.minimum.as_ref().and_then(|m| m.covariance.as_ref())
    }

    // ---- Contours and scans ----

    /// contour — `n_points` points of the `error_def` region of two
    /// parameters around the last minimum.
    ///
    /// Errors
    /// ------
    /// - `MinimumNotAvailable` before a successful `minimize` (or after a
    ///   mutation discarded it).
    /// - `InvalidPointCount`, `SameContourParameter`, `IndexOutOfRange`,
    ///   `ParameterFixed` for malformed requests.
    /// - Whatever the engine reports; no partial contour is returned.
    pub fn contour(
        &mut self, par_x: usize, par_y: usize, n_points: usize, error_def: ErrorDefinition,
    ) -> OptResult<Vec<ContourPoint>> {
        let minimum = self.minimum.as_ref().ok_or(OptError::MinimumNotAvailable)?;
        let params = self.registry.parameters()?;
        let request = ContourRequest { par_x, par_y, n_points, error_def };
        validate_request(&params, &request)?;
        let points =
            self.engine.contour(&self.objective, &params, minimum, &request, &self.options)?;
        if points.len() != n_points {
            return Err(OptError::InvalidPointCount {
                n_points: points.len(),
                reason: "Engine returned a different number of points than requested.",
            });
        }
        Ok(points)
    }

    /// scan — objective along one parameter, others at their current values.
    ///
    /// `range = None` scans value ± 2·error after a fit and value ± 2·step
    /// before one. The registry is left untouched.
    pub fn scan(
        &self, index: usize, n_steps: usize, range: Option<(f64, f64)>,
    ) -> OptResult<ParameterScan> {
        let params = self.registry.parameters()?;
        scan_parameter(&self.objective, &params, index, n_steps, range)
    }

    /// Snapshot of the registry, for callers that need names or limits.
    pub fn parameters(&self) -> OptResult<Vec<FitParameter>> {
        self.registry.parameters()
    }

    // ---- Helper methods ----

    fn mutate(
        &mut self, op: impl FnOnce(&mut ParameterRegistry) -> OptResult<()>,
    ) -> OptResult<()> {
        op(&mut self.registry)?;
        self.minimum = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{confidence::threshold_from_sigma, optimization::minimizer::FnObjective};
    use approx::assert_abs_diff_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The quadratic bowl fit and its closed 1-sigma contour.
    // - Fix → minimize → release → minimize continuity.
    // - Invalidation of the stored minimum and contour preconditions.
    // - What the session hands to a custom engine.
    //
    // They intentionally DO NOT cover:
    // - Solver internals (see `optimization::minimizer`).
    // -------------------------------------------------------------------------

    fn bowl(x: &[f64]) -> f64 {
        x[0] * x[0] / 0.01 + (x[1] - 1.0).powi(2) / 0.04
    }

    fn bowl_session() -> MinimizerSession<FnObjective<fn(&[f64]) -> f64>> {
        let mut session = MinimizerSession::new(FnObjective::new(bowl as fn(&[f64]) -> f64), 2);
        session.set_parameter(0, "mu", 0.5, 0.1).unwrap();
        session.set_parameter(1, "sigma", 0.5, 0.1).unwrap();
        session
    }

    #[test]
    // Purpose
    // -------
    // The bowl converges to (0, 1) and its 1-sigma contour is closed and
    // centered there.
    //
    // Given
    // -----
    // - Start (0.5, 0.5), 20 contour points at error_def 2.2977.
    //
    // Expect
    // ------
    // - Valid minimum ≈ (0, 1), value ≈ 0, errors ≈ (0.1, 0.2).
    // - 20 points with centroid ≈ (0, 1) that straddle it on both axes.
    fn bowl_fit_and_one_sigma_contour() {
        let mut session = bowl_session();

        let m = session.minimize().unwrap();
        assert!(m.is_valid, "{m}");
        assert_abs_diff_eq!(m.x[0], 0.0, epsilon = 1e-4);
        assert_abs_diff_eq!(m.x[1], 1.0, epsilon = 1e-4);
        assert_abs_diff_eq!(m.min_value, 0.0, epsilon = 1e-6);
        let errors = session.errors().unwrap();
        assert_abs_diff_eq!(errors[0], 0.1, epsilon = 1e-3);
        assert_abs_diff_eq!(errors[1], 0.2, epsilon = 2e-3);
        assert_eq!(session.registry().get(0).unwrap().error(), Some(errors[0]));

        let level = threshold_from_sigma(1).unwrap();
        let points = session.contour(0, 1, 20, level).unwrap();

        assert_eq!(points.len(), 20);
        let cx = points.iter().map(|p| p.x).sum::<f64>() / 20.0;
        let cy = points.iter().map(|p| p.y).sum::<f64>() / 20.0;
        assert_abs_diff_eq!(cx, 0.0, epsilon = 1e-3);
        assert_abs_diff_eq!(cy, 1.0, epsilon = 1e-3);
        assert!(points.iter().any(|p| p.x > 0.1) && points.iter().any(|p| p.x < -0.1));
        assert!(points.iter().any(|p| p.y > 1.2) && points.iter().any(|p| p.y < 0.8));
    }

    #[test]
    // Purpose
    // -------
    // A fixed parameter keeps its value through a fit and the next fit after
    // release starts from it.
    //
    // Given
    // -----
    // - sigma fixed at 2.0, minimize, release, minimize again.
    //
    // Expect
    // ------
    // - First fit: sigma == 2.0 exactly, error 0, mu ≈ 0.
    // - Second fit starts at (≈0, 2.0) and reaches (0, 1).
    fn fix_minimize_release_minimize() {
        let mut session = bowl_session();
        session.fix_at(1, 2.0).unwrap();

        let first = session.minimize().unwrap().clone();
        assert_eq!(first.x[1], 2.0);
        assert_eq!(first.errors[1], 0.0);
        assert_abs_diff_eq!(first.x[0], 0.0, epsilon = 1e-4);

        session.release(1).unwrap();
        let second = session.minimize().unwrap();

        assert_eq!(second.initial[1], 2.0);
        assert_abs_diff_eq!(second.initial[0], first.x[0], epsilon = 1e-12);
        assert_abs_diff_eq!(second.x[1], 1.0, epsilon = 1e-4);
    }

    #[test]
    // Purpose
    // -------
    // Contours need a current minimum; mutations discard it.
    //
    // Given
    // -----
    // - A fresh session, then a fitted one whose value is changed.
    //
    // Expect
    // ------
    // - `MinimumNotAvailable` in both cases.
    fn contour_requires_current_minimum() {
        let mut session = bowl_session();
        let level = threshold_from_sigma(1).unwrap();
        assert_eq!(session.contour(0, 1, 4, level), Err(OptError::MinimumNotAvailable));

        session.minimize().unwrap();
        session.set_value(0, 0.3).unwrap();

        assert!(session.minimum().is_none());
        assert_eq!(session.contour(0, 1, 4, level), Err(OptError::MinimumNotAvailable));
    }

    #[test]
    // Purpose
    // -------
    // Configuration setters validate their input.
    //
    // Given
    // -----
    // - tolerance −1, print level 9, error_def 0.
    //
    // Expect
    // ------
    // - Errors, options unchanged.
    fn setters_validate() {
        let mut session = bowl_session();
        assert!(session.set_tolerance(-1.0).is_err());
        assert!(session.set_print_level(9).is_err());
        assert!(session.set_error_def(0.0).is_err());
        assert_eq!(session.options(), &SessionOptions::default());
        session.set_strategy(Strategy::Thorough);
        assert_eq!(session.options().strategy, Strategy::Thorough);
    }

    #[test]
    // Purpose
    // -------
    // An incomplete registry is a configuration error.
    //
    // Given
    // -----
    // - Two declared parameters, one defined.
    //
    // Expect
    // ------
    // - `UndefinedParameter { index: 1 }`.
    fn minimize_with_undefined_parameter_fails() {
        let mut session = MinimizerSession::new(FnObjective::new(bowl), 2);
        session.set_parameter(0, "mu", 0.5, 0.1).unwrap();
        assert_eq!(session.minimize().unwrap_err(), OptError::UndefinedParameter { index: 1 });
    }

    /// Engine that returns a fixed minimum and records contour requests.
    #[derive(Debug, Default)]
    struct RecordingEngine {
        requests: Vec<ContourRequest>,
    }

    impl MinimizerEngine for RecordingEngine {
        fn minimize<G: Objective + ?Sized>(
            &mut self, _: &G, params: &[FitParameter], opts: &SessionOptions,
        ) -> OptResult<FunctionMinimum> {
            let x = params.iter().map(FitParameter::value).collect();
            Ok(FunctionMinimum::at_point(x, 0.0, opts.error_def, "recorded"))
        }

        fn contour<G: Objective + ?Sized>(
            &mut self, _: &G, _: &[FitParameter], _: &FunctionMinimum, request: &ContourRequest,
            _: &SessionOptions,
        ) -> OptResult<Vec<ContourPoint>> {
            self.requests.push(*request);
            Ok(vec![ContourPoint::new(0.0, 0.0); request.n_points])
        }
    }

    #[test]
    // Purpose
    // -------
    // The error definition travels with each contour call.
    //
    // Given
    // -----
    // - A recording engine and two calls at 2.2977 and 6.2021.
    //
    // Expect
    // ------
    // - Both requests seen in order with their own error definitions.
    fn error_def_is_passed_per_call() {
        let mut session =
            MinimizerSession::with_engine(FnObjective::new(bowl), 2, RecordingEngine::default());
        session.set_parameter(0, "mu", 0.0, 0.1).unwrap();
        session.set_parameter(1, "sigma", 1.0, 0.1).unwrap();
        session.minimize().unwrap();

        session.contour(0, 1, 3, threshold_from_sigma(1).unwrap()).unwrap();
        session.contour(1, 0, 5, threshold_from_sigma(2).unwrap()).unwrap();

        let seen = &session.engine().requests;
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].error_def.value(), 2.2977);
        assert_eq!((seen[1].par_x, seen[1].n_points), (1, 5));
        assert_eq!(seen[1].error_def.value(), 6.2021);
    }
}
