//! parameters — the fit-parameter registry.
//!
//! Purpose
//! -------
//! Manage the mutable state of the parameters being fit: values, step
//! sizes, limits and fixed/free status. The registry is the single owner of
//! this state; the minimizer only reads snapshots of it, and fit results
//! are written back through a registry operation.
//!
//! Key behaviors
//! -------------
//! - Define parameters by index and name, optionally limited or fixed.
//! - Set values, steps and limits with synchronous validation: undefined
//!   indices, malformed bounds and out-of-bound values are rejected, never
//!   coerced.
//! - Fix and release parameters; a released parameter restarts from its
//!   last known value.
//! - Expose value and error vectors ordered by index.
//!
//! Conventions
//! -----------
//! - Errors are reported as [`OptError`](crate::optimization::errors::OptError).

pub mod parameter;
pub mod registry;

pub use self::parameter::FitParameter;
pub use self::registry::ParameterRegistry;
