//! minimizer — argmin-powered function minimization with error analysis.
//!
//! Purpose
//! -------
//! Minimize a user objective (typically `−2 ln L` or a chi-square) over the
//! free parameters of a registry snapshot, estimate parameter errors from the
//! curvature at the minimum, and trace two-parameter confidence contours.
//!
//! Key behaviors
//! -------------
//! - [`adapter`] maps bounded external parameters into an unconstrained
//!   internal space and exposes the objective to Argmin, counting calls and
//!   remembering the best point seen.
//! - [`builders`] picks an L-BFGS solver (line search, memory) from the
//!   session strategy; [`run`] executes it and normalizes the outcome.
//! - [`api::minimize`] adds the Hessian-based error analysis and the validity
//!   decision; [`api::profile`] is the reduced form used along contours.
//! - [`contour`] traces the boundary `P(x, y) = f_min + error_def` on rays
//!   from the minimum using Argmin's Brent root finder.
//! - [`engine::ArgminEngine`] packages the above behind [`MinimizerEngine`].
//!
//! Invariants & assumptions
//! ------------------------
//! - The objective is only ever evaluated inside the parameter limits.
//! - Reported errors are `sqrt(diag(2 · error_def · H⁺))` in external
//!   coordinates, `H⁺` the pseudoinverse of the Hessian over free parameters.
//! - A non-converged run is a result (`is_valid == false`), not an error.
//!
//! Conventions
//! -----------
//! - Internal vectors use the `ndarray` aliases [`Theta`], [`Grad`],
//!   [`Hessian`]; external points are plain `Vec<f64>` / `&[f64]` indexed
//!   like the registry.
//! - Errors bubble up as [`OptResult<T>`](crate::optimization::errors::OptResult);
//!   nothing in this module panics on user input.
//!
//! Testing notes
//! -------------
//! - Each submodule tests its own concern on small quadratic objectives with
//!   known minima, errors and contours.
//! - End-to-end fits of a Gaussian likelihood live in the integration tests.

pub mod adapter;
pub mod api;
pub mod builders;
pub mod contour;
pub mod engine;
pub mod finite_diff;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::{ProfilePoint, minimize, profile};
pub use self::contour::trace_contour;
pub use self::engine::ArgminEngine;
pub use self::traits::{ContourRequest, FnObjective, MinimizerEngine, Objective};
pub use self::types::{ContourPoint, Cost, FunctionMinimum, Grad, Hessian, Theta};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::engine::ArgminEngine;
    pub use super::traits::{FnObjective, MinimizerEngine, Objective};
    pub use super::types::{ContourPoint, FunctionMinimum};
}
