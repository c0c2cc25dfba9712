//! minimizer::types — shared numeric aliases, solver wiring and results.
//!
//! Purpose
//! -------
//! Centralize the numeric types and solver aliases used by the minimizer,
//! together with the two result types the rest of the crate consumes:
//! [`FunctionMinimum`] (one minimization) and [`ContourPoint`] (one vertex
//! of a traced contour).
//!
//! Key behaviors
//! -------------
//! - Canonical aliases for internal parameter vectors, gradients, Hessians
//!   and scalar costs (`Theta`, `Grad`, `Hessian`, `Cost`).
//! - Pre-wired L-BFGS solver aliases for the More–Thuente and Hager–Zhang
//!   line searches, plus the per-strategy L-BFGS memory sizes.
//! - [`FunctionMinimum`]: best-fit vector, errors, covariance, validity and
//!   run statistics in *external* (user-facing) coordinates.
//!
//! Invariants & assumptions
//! ------------------------
//! - `Theta` / `Grad` live in the internal, unconstrained space of the free
//!   parameters only; `FunctionMinimum` vectors always span every parameter.
//! - `FunctionMinimum::covariance` is indexed by position in
//!   `FunctionMinimum::free`, not by parameter index.
//!
//! Testing notes
//! -------------
//! - Accessor and formatting behavior is covered below; solver aliases are
//!   exercised by the builder and engine tests.
use argmin::solver::{
    linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
    quasinewton::LBFGS,
};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Internal (unconstrained) coordinates of the free parameters.
pub type Theta = Array1<f64>;

/// Gradient of the cost with respect to [`Theta`].
pub type Grad = Array1<f64>;

/// Dense square matrix over the free parameters.
pub type Hessian = Array2<f64>;

/// Objective value.
pub type Cost = f64;

/// L-BFGS history size for [`Strategy::Fast`](crate::session::Strategy::Fast).
pub const FAST_LBFGS_MEM: usize = 5;

/// L-BFGS history size for the default strategy.
pub const DEFAULT_LBFGS_MEM: usize = 7;

/// L-BFGS history size for [`Strategy::Thorough`](crate::session::Strategy::Thorough).
pub const THOROUGH_LBFGS_MEM: usize = 15;

pub type HagerZhangLS = HagerZhangLineSearch<Theta, Grad, Cost>;

pub type MoreThuenteLS = MoreThuenteLineSearch<Theta, Grad, Cost>;

pub type LbfgsHagerZhang = LBFGS<HagerZhangLS, Theta, Grad, Cost>;

pub type LbfgsMoreThuente = LBFGS<MoreThuenteLS, Theta, Grad, Cost>;

/// One vertex of a contour in the plane of two parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContourPoint {
    pub x: f64,
    pub y: f64,
}

impl ContourPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for ContourPoint {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// FunctionMinimum — normalized result of one minimization.
///
/// Fields
/// ------
/// - `initial`: starting vector (all parameters, external coordinates).
/// - `x`: best-fit vector; fixed parameters keep their starting value.
/// - `errors`: per-parameter errors at `error_def`; `0.0` for fixed
///   parameters and for directions the Hessian could not resolve.
/// - `covariance`: covariance of the free parameters (external
///   coordinates), `None` when no parameter is free or the Hessian failed.
/// - `free`: parameter indices of the covariance rows/columns.
/// - `min_value`: objective value at `x`.
/// - `edm`: estimated vertical distance to the minimum, `0.5·gᵀH⁺g`.
/// - `is_valid`: `false` when the run hit a limit, stalled far from a
///   minimum or ended on a Hessian that is not positive definite.
/// - `status`: human-readable termination reason.
/// - `iterations`: solver iterations over all restarts.
/// - `fn_evals`: objective evaluations, including finite differences.
/// - `error_def`: error definition the errors were scaled with.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionMinimum {
    pub initial: Vec<f64>,
    pub x: Vec<f64>,
    pub errors: Vec<f64>,
    pub covariance: Option<Hessian>,
    pub free: Vec<usize>,
    pub min_value: f64,
    pub edm: f64,
    pub is_valid: bool,
    pub status: String,
    pub iterations: u64,
    pub fn_evals: u64,
    pub error_def: f64,
}

impl FunctionMinimum {
    /// A minimum taken as-is at `x`, with no error analysis. Used when no
    /// parameter is free and by test engines.
    pub fn at_point(x: Vec<f64>, min_value: f64, error_def: f64, status: impl Into<String>) -> Self {
        let n = x.len();
        Self {
            initial: x.clone(),
            x,
            errors: vec![0.0; n],
            covariance: None,
            free: Vec::new(),
            min_value,
            edm: 0.0,
            is_valid: true,
            status: status.into(),
            iterations: 0,
            fn_evals: 1,
            error_def,
        }
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn errors(&self) -> &[f64] {
        &self.errors
    }

    pub fn n_free(&self) -> usize {
        self.free.len()
    }

    /// Covariance between parameters `i` and `j` (parameter indices).
    ///
    /// Returns `None` when either parameter is fixed or no covariance is
    /// available.
    pub fn covariance_of(&self, i: usize, j: usize) -> Option<f64> {
        let cov = self.covariance.as_ref()?;
        let a = self.free.iter().position(|&k| k == i)?;
        let b = self.free.iter().position(|&k| k == j)?;
        Some(cov[[a, b]])
    }

    /// Correlation coefficient between parameters `i` and `j`.
    pub fn correlation(&self, i: usize, j: usize) -> Option<f64> {
        let cij = self.covariance_of(i, j)?;
        let cii = self.covariance_of(i, i)?;
        let cjj = self.covariance_of(j, j)?;
        let denom = (cii * cjj).sqrt();
        (denom > 0.0).then(|| cij / denom)
    }
}

impl fmt::Display for FunctionMinimum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "FCN = {:.6e}  EDM = {:.3e}  valid = {}  ({})",
            self.min_value, self.edm, self.is_valid, self.status
        )?;
        writeln!(f, "iterations = {}  calls = {}  up = {}", self.iterations, self.fn_evals, self.error_def)?;
        for (i, (x, e)) in self.x.iter().zip(&self.errors).enumerate() {
            let tag = if self.free.contains(&i) { "" } else { "  (fixed)" };
            writeln!(f, "  p{i:<3} {x:>14.6e} +/- {e:<12.4e}{tag}")?;
        }
        Ok(())
    }
}
