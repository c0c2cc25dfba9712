//! The shipped [`MinimizerEngine`]: Argmin L-BFGS plus radial contour tracing.
use crate::{
    optimization::{
        errors::OptResult,
        minimizer::{
            api::minimize,
            contour::trace_contour,
            traits::{ContourRequest, MinimizerEngine, Objective},
            types::{ContourPoint, FunctionMinimum},
        },
    },
    parameters::FitParameter,
    session::SessionOptions,
};

/// ArgminEngine — stateless engine backed by [`minimize`] and
/// [`trace_contour`].
///
/// Every call is independent; the engine keeps no state between calls, so a
/// single value can serve any number of sessions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArgminEngine;

impl ArgminEngine {
    pub fn new() -> Self {
        Self
    }
}

impl MinimizerEngine for ArgminEngine {
    fn minimize<F: Objective + ?Sized>(
        &mut self, objective: &F, params: &[FitParameter], opts: &SessionOptions,
    ) -> OptResult<FunctionMinimum> {
        minimize(objective, params, opts)
    }

    fn contour<F: Objective + ?Sized>(
        &mut self, objective: &F, params: &[FitParameter], minimum: &FunctionMinimum,
        request: &ContourRequest, opts: &SessionOptions,
    ) -> OptResult<Vec<ContourPoint>> {
        trace_contour(objective, params, minimum, request, opts)
    }
}
