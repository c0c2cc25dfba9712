//! Public seams of the minimizer.
//!
//! - [`Objective`]: the scalar function of N parameters being minimized
//!   (a chi-square or `-2 ln L` surface), with an optional analytic
//!   gradient.
//! - [`FnObjective`]: wraps a plain closure as an [`Objective`].
//! - [`MinimizerEngine`]: the capability set the session consumes,
//!   minimize and contour. [`ArgminEngine`](super::ArgminEngine) is the
//!   shipped implementation; tests substitute their own.
//! - [`ContourRequest`]: one contour call, error definition included.
//!
//! Objective values and gradients are always in *external* coordinates over
//! the full parameter vector, fixed parameters included. Bound transforms
//! and fixing are the engine's business.
use crate::{
    confidence::ErrorDefinition,
    optimization::{
        errors::{OptError, OptResult},
        minimizer::types::{ContourPoint, FunctionMinimum},
    },
    parameters::FitParameter,
    session::SessionOptions,
};

pub trait Objective {
    // Required methods
    fn value(&self, x: &[f64]) -> OptResult<f64>;

    // Optional methods
    fn grad(&self, _x: &[f64]) -> OptResult<Vec<f64>> {
        Err(OptError::GradientNotImplemented)
    }
}

impl<T: Objective + ?Sized> Objective for &T {
    fn value(&self, x: &[f64]) -> OptResult<f64> {
        (**self).value(x)
    }

    fn grad(&self, x: &[f64]) -> OptResult<Vec<f64>> {
        (**self).grad(x)
    }
}

/// Closure-backed objective without an analytic gradient.
#[derive(Clone)]
pub struct FnObjective<G> {
    f: G,
}

impl<G: Fn(&[f64]) -> f64> FnObjective<G> {
    pub fn new(f: G) -> Self {
        Self { f }
    }
}

impl<G: Fn(&[f64]) -> f64> Objective for FnObjective<G> {
    fn value(&self, x: &[f64]) -> OptResult<f64> {
        Ok((self.f)(x))
    }
}

/// ContourRequest — one contour computation.
///
/// Fields
/// ------
/// - `par_x`, `par_y`: parameter indices spanning the plane; distinct and free.
/// - `n_points`: number of boundary points to return, `>= 1`.
/// - `error_def`: objective rise above the minimum that defines the boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContourRequest {
    pub par_x: usize,
    pub par_y: usize,
    pub n_points: usize,
    pub error_def: ErrorDefinition,
}

/// MinimizerEngine — what a session needs from a minimizer.
///
/// Both calls block until the engine is done. Configuration arrives in
/// [`SessionOptions`]; parameters arrive as a registry snapshot and are never
/// mutated by the engine.
pub trait MinimizerEngine {
    /// Minimize `objective` over the free parameters of `params`.
    ///
    /// # Errors
    /// Only for unusable input (e.g. a non-finite objective at the start).
    /// A run that fails to converge is returned as
    /// `Ok(FunctionMinimum { is_valid: false, .. })`.
    fn minimize<F: Objective + ?Sized>(
        &mut self, objective: &F, params: &[FitParameter], opts: &SessionOptions,
    ) -> OptResult<FunctionMinimum>;

    /// Trace `request.n_points` points of the region where the (profiled)
    /// objective lies within `request.error_def` of `minimum.min_value`.
    ///
    /// # Errors
    /// Any failure, including a failure at a single point; partial contours
    /// are never returned.
    fn contour<F: Objective + ?Sized>(
        &mut self, objective: &F, params: &[FitParameter], minimum: &FunctionMinimum,
        request: &ContourRequest, opts: &SessionOptions,
    ) -> OptResult<Vec<ContourPoint>>;
}
