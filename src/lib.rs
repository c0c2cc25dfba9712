//! likelihood_contours — confidence levels and likelihood contours on top of
//! an argmin-backed minimizer.
//!
//! Purpose
//! -------
//! Fit the parameters of a user objective (a `−2 ln L` or chi-square
//! function), estimate their errors, and extract two-parameter confidence
//! contours for human-meaningful confidence statements ("1 sigma", "95%"),
//! managed per level and exportable as a styled JSON artifact.
//!
//! Key behaviors
//! -------------
//! - `parameters`: indexed, named fit parameters with steps, limits and
//!   fixed/free status; invalid updates are rejected, never coerced.
//! - `session`: [`MinimizerSession`](session::MinimizerSession) owns an
//!   objective, its parameters and [`SessionOptions`](session::SessionOptions),
//!   runs minimizations through a pluggable engine and answers error,
//!   covariance, contour and scan queries.
//! - `optimization`: the L-BFGS engine with bound transforms,
//!   finite-difference Hessians, validity checks and contour tracing.
//! - `inference`: Hessian pseudoinverse, covariance and EDM.
//! - `confidence`: sigma levels and probabilities to chi-square thresholds
//!   and back.
//! - `contour`: per-level contour batches and their export.
//!
//! Invariants & assumptions
//! ------------------------
//! - Everything is synchronous and single-threaded; a session serves one
//!   request at a time by construction (`&mut` borrows).
//! - Non-convergence is data (`FunctionMinimum::is_valid`, `Failed` contour
//!   entries); only invalid configuration is an `Err`.
//!
//! Conventions
//! -----------
//! - Parameter vectors are indexed like the registry.
//! - Errors are hand-written enums per layer (`OptError`, `CLError`,
//!   `ExportError`) with `From` conversions where layers meet.
//! - Progress output is opt-in through the `obs_slog` feature.
//!
//! Downstream usage
//! ----------------
//! - Build a session with [`FnObjective`](optimization::minimizer::FnObjective)
//!   or an own [`Objective`](optimization::minimizer::Objective), define
//!   parameters, `minimize`, then hand the session to a
//!   [`ContourBatch`](contour::ContourBatch) and export with a
//!   [`ContourExporter`](contour::ContourExporter).
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each module; integration tests under `tests/`
//!   fit a Gaussian likelihood on simulated data and run a full contour
//!   batch through export.

pub mod confidence;
pub mod contour;
pub mod inference;
pub mod optimization;
pub mod parameters;
pub mod session;

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use crate::confidence::{ConfidenceSpec, DegreesOfFreedom, ErrorDefinition};
    pub use crate::contour::{ContourBatch, ContourExporter, ContourStatus};
    pub use crate::optimization::prelude::*;
    pub use crate::session::{MinimizerSession, SessionOptions, Strategy};
}
