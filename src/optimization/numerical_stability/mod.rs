//! numerical_stability — bound transforms and shared numeric tolerances.
//!
//! Purpose
//! -------
//! Map bounded fit parameters into the unconstrained space the L-BFGS
//! solver works in, and centralize the small tolerances used by the
//! minimizer and the Hessian-based error estimates.
//!
//! Key behaviors
//! -------------
//! - Stable scalar transforms (`safe_softplus`, `safe_softplus_inv`,
//!   `safe_logistic`, `safe_logit`) that never overflow for finite input.
//! - Per-parameter transforms (`to_external`, `to_internal`,
//!   `external_derivative`) for lower-only, upper-only, double and absent
//!   bounds.
//! - Shared constants `LOGIT_EPS`, `BOUND_EPS`, `EIGEN_EPS`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Bounds handed to the transforms have already been validated by the
//!   parameter registry (finite, lower < upper).
//! - `to_external` always returns a value inside the bounds; `to_internal`
//!   always returns a finite value.
//!
//! Conventions
//! -----------
//! - Pure functions over `f64`; no logging, I/O or global state.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{
    BOUND_EPS, EIGEN_EPS, LOGIT_EPS, external_derivative, safe_logistic, safe_logit,
    safe_softplus, safe_softplus_inv, to_external, to_internal,
};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::transformations::{EIGEN_EPS, to_external, to_internal};
}
