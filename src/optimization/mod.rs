//! optimization — minimizer stack, numerical helpers, and unified error surface.
//!
//! Purpose
//! -------
//! Provide the numerical core behind a minimization session: an Argmin-backed
//! minimizer with curvature-based error estimates and contour tracing,
//! numerically stable bound transforms, and a single error/result surface.
//!
//! Key behaviors
//! -------------
//! - `minimizer`: L-BFGS minimization over free parameters, Hessian error
//!   analysis, validity decision, profiling and contour tracing, plus the
//!   [`MinimizerEngine`](minimizer::MinimizerEngine) seam sessions depend on.
//! - `numerical_stability`: maps between bounded parameter values and the
//!   unconstrained space the solver works in.
//! - `errors`: every configuration issue, numerical failure and backend
//!   solver error normalized into [`OptError`](errors::OptError) with the
//!   alias [`OptResult<T>`](errors::OptResult).
//!
//! Invariants & assumptions
//! ------------------------
//! - Solvers operate in an unconstrained internal space and assume inputs are
//!   finite once validation has passed; invalid states are reported as
//!   `OptError`, not panics.
//! - Objective implementations report domain violations as recoverable
//!   errors rather than returning NaN.
//!
//! Conventions
//! -----------
//! - The objective is minimized as given; it is expected to be `−2 ln L` or a
//!   chi-square so that `error_def = 1` yields one-sigma errors.
//! - Public entrypoints that can fail return `OptResult<T>`; callers never
//!   see raw Argmin errors.
//! - Progress output is opt-in through the `obs_slog` feature.
//!
//! Testing notes
//! -------------
//! - Unit tests in the submodules cover solver wiring, finite differences,
//!   bound transforms and error conversions.
//! - Integration tests exercise complete fits and contour batches.

pub mod errors;
pub mod minimizer;
pub mod numerical_stability;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use likelihood_contours::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::minimizer::prelude::*;
    pub use super::numerical_stability::prelude::*;
}
