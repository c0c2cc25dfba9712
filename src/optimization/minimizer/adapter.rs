//! Adapter that exposes an [`Objective`] as an `argmin` problem.
//!
//! The solver only sees the *free* parameters, in an unconstrained internal
//! space. [`ParameterSpace`] owns that mapping: fixed parameters are held at
//! their template values and bounded ones go through the stable transforms
//! of `numerical_stability`. Analytic gradients (if provided) are chained
//! into the internal space; otherwise the internal cost is
//! finite-differenced directly, so no chain rule is needed in that branch.
//!
//! Every cost evaluation is counted and the lowest value seen is remembered
//! in an [`EvalTracker`] owned by the caller, so a run that aborts inside a
//! line search still has a best point to report.
use std::cell::{Cell, RefCell};

use crate::{
    optimization::{
        errors::OptError,
        minimizer::{
            finite_diff::run_fd_diff,
            traits::Objective,
            types::{Cost, Grad, Theta},
            validation::{validate_grad, validate_value},
        },
        numerical_stability::{external_derivative, to_external, to_internal},
    },
    parameters::FitParameter,
};
use argmin::core::{CostFunction, Error, Gradient};
use finitediff::FiniteDiff;
use ndarray::Array1;

/// Limits of one parameter, `(lower, upper)`.
pub type Limits = (Option<f64>, Option<f64>);

/// ParameterSpace — external ↔ internal coordinate mapping.
///
/// Fields
/// ------
/// - `template`: full external vector; authoritative for fixed entries.
/// - `free`: parameter indices the solver moves, in internal order.
/// - `limits`: limits of each free parameter, aligned with `free`.
/// - `steps`: step hints of each free parameter, aligned with `free`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParameterSpace {
    template: Vec<f64>,
    free: Vec<usize>,
    limits: Vec<Limits>,
    steps: Vec<f64>,
}

impl ParameterSpace {
    /// Build the space from a registry snapshot (ordered by index).
    pub fn new(params: &[FitParameter]) -> Self {
        let template = params.iter().map(FitParameter::value).collect();
        let mut free = Vec::new();
        let mut limits = Vec::new();
        let mut steps = Vec::new();
        for (i, p) in params.iter().enumerate() {
            if !p.is_fixed() {
                free.push(i);
                limits.push((p.lower(), p.upper()));
                steps.push(p.step());
            }
        }
        Self { template, free, limits, steps }
    }

    pub fn n_params(&self) -> usize {
        self.template.len()
    }

    pub fn n_free(&self) -> usize {
        self.free.len()
    }

    pub fn free_indices(&self) -> &[usize] {
        &self.free
    }

    pub fn template(&self) -> &[f64] {
        &self.template
    }

    pub fn limits(&self) -> &[Limits] {
        &self.limits
    }

    pub fn steps(&self) -> &[f64] {
        &self.steps
    }

    /// Limits of parameter `index`; `(None, None)` if it is not free here.
    pub fn limits_of(&self, index: usize) -> Limits {
        self.free.iter().position(|&i| i == index).map_or((None, None), |k| self.limits[k])
    }

    /// Same space with the template moved to `x` (a warm start).
    pub fn restarted_at(&self, x: &[f64]) -> Self {
        Self { template: x.to_vec(), ..self.clone() }
    }

    /// Same space with each `(index, value)` in `pins` held fixed.
    pub fn pinned(&self, pins: &[(usize, f64)]) -> Self {
        let mut out = Self { template: self.template.clone(), ..Self::default() };
        for (k, &i) in self.free.iter().enumerate() {
            match pins.iter().find(|(j, _)| *j == i) {
                Some(&(_, value)) => out.template[i] = value,
                None => {
                    out.free.push(i);
                    out.limits.push(self.limits[k]);
                    out.steps.push(self.steps[k]);
                }
            }
        }
        out
    }

    /// Internal coordinates of the template.
    pub fn to_internal(&self) -> Theta {
        self.free
            .iter()
            .zip(&self.limits)
            .map(|(&i, &(lo, hi))| to_internal(self.template[i], lo, hi))
            .collect()
    }

    /// Full external vector for internal coordinates `theta`.
    pub fn to_external(&self, theta: &Theta) -> Vec<f64> {
        let mut x = self.template.clone();
        for ((&i, &(lo, hi)), &t) in self.free.iter().zip(&self.limits).zip(theta.iter()) {
            x[i] = to_external(t, lo, hi);
        }
        x
    }

    /// External values of the free parameters in `x`.
    pub fn free_values(&self, x: &[f64]) -> Array1<f64> {
        self.free.iter().map(|&i| x[i]).collect()
    }

    /// Full external vector with the free entries replaced by `z`.
    pub fn embed(&self, z: &Array1<f64>) -> Vec<f64> {
        let mut x = self.template.clone();
        for (&i, &v) in self.free.iter().zip(z.iter()) {
            x[i] = v;
        }
        x
    }

    /// Chain a full external gradient into the internal space.
    pub fn chain_gradient(&self, theta: &Theta, grad_ext: &[f64]) -> Grad {
        self.free
            .iter()
            .zip(&self.limits)
            .zip(theta.iter())
            .map(|((&i, &(lo, hi)), &t)| grad_ext[i] * external_derivative(t, lo, hi))
            .collect()
    }
}

/// EvalTracker — call counter and best point seen during a run.
#[derive(Debug, Default)]
pub struct EvalTracker {
    calls: Cell<u64>,
    best: RefCell<Option<(Theta, Cost)>>,
}

impl EvalTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> u64 {
        self.calls.get()
    }

    /// Lowest evaluated point, internal coordinates.
    pub fn best(&self) -> Option<(Theta, Cost)> {
        self.best.borrow().clone()
    }

    fn bump(&self) -> u64 {
        let calls = self.calls.get() + 1;
        self.calls.set(calls);
        calls
    }

    fn record(&self, theta: &Theta, value: Cost) {
        let mut best = self.best.borrow_mut();
        if best.as_ref().is_none_or(|(_, v)| value < *v) {
            *best = Some((theta.clone(), value));
        }
    }
}

#[derive(Debug, Clone)]
pub struct ArgMinAdapter<'a, F: Objective + ?Sized> {
    pub f: &'a F,
    pub space: &'a ParameterSpace,
    pub tracker: &'a EvalTracker,
    pub max_calls: usize,
}

impl<'a, F: Objective + ?Sized> ArgMinAdapter<'a, F> {
    pub fn new(
        f: &'a F, space: &'a ParameterSpace, tracker: &'a EvalTracker, max_calls: usize,
    ) -> Self {
        Self { f, space, tracker, max_calls }
    }
}

impl<F: Objective + ?Sized> CostFunction for ArgMinAdapter<'_, F> {
    type Param = Theta;
    type Output = Cost;

    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        if self.tracker.bump() > self.max_calls as u64 {
            return Err(OptError::CallLimitReached { limit: self.max_calls }.into());
        }
        let x = self.space.to_external(theta);
        let output = self.f.value(&x)?;
        validate_value(output)?;
        self.tracker.record(theta, output);
        Ok(output)
    }
}

impl<F: Objective + ?Sized> Gradient for ArgMinAdapter<'_, F> {
    type Param = Theta;
    type Gradient = Grad;

    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        let dim = theta.len();
        let x = self.space.to_external(theta);
        match self.f.grad(&x) {
            Ok(g) => {
                if g.len() != self.space.n_params() {
                    return Err(OptError::GradientDimMismatch {
                        expected: self.space.n_params(),
                        found: g.len(),
                    }
                    .into());
                }
                let g = self.space.chain_gradient(theta, &g);
                validate_grad(&g, dim)?;
                Ok(g)
            }
            Err(OptError::GradientNotImplemented) => {
                let closure_err: RefCell<Option<Error>> = RefCell::new(None);
                let cost_func = |theta: &Theta| -> f64 {
                    match self.cost(theta) {
                        Ok(val) => val,
                        Err(e) => {
                            let mut slot = closure_err.borrow_mut();
                            if slot.is_none() {
                                *slot = Some(e);
                            }
                            f64::NAN
                        }
                    }
                };
                let fd_grad = theta.central_diff(&cost_func);
                if closure_err.borrow().is_some() || validate_grad(&fd_grad, dim).is_err() {
                    return Ok(run_fd_diff(theta, &cost_func, &closure_err)?);
                }
                Ok(fd_grad)
            }
            Err(e) => Err(e.into()),
        }
    }
}
