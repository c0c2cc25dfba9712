//! inference — error analysis at a minimum.
//!
//! Purpose
//! -------
//! Convert curvature information at a best-fit point into the uncertainty
//! summaries a fit reports: covariance, per-parameter errors and the
//! estimated distance to the minimum.
//!
//! Key behaviors
//! -------------
//! - [`hessian`]: eigen-based pseudoinverse of the Hessian, covariance
//!   `2·error_def·H⁺`, errors and EDM.
//!
//! Conventions
//! -----------
//! - Inputs are `ndarray` matrices; `nalgebra` is used internally only.
//! - Functions are pure and report failures as `OptResult`.

pub mod hessian;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::hessian::{
    PseudoInverse, covariance_from_hessian, errors_from_covariance, estimated_distance_to_minimum,
    pseudo_inverse,
};
