//! Validation helpers for the minimizer.
//!
//! - **Option checks**: [`verify_tolerance`], [`verify_precision`] ensure the
//!   convergence settings are finite and strictly positive.
//! - **Gradient validation**: [`validate_grad`] enforces length and finite
//!   entries.
//! - **Estimates**: [`validate_theta_hat`] ensures a best point exists and is
//!   finite.
//! - **Objective values**: [`validate_value`] rejects non-finite values.
//! - **Hessians**: [`validate_hessian`] enforces shape and finite entries.
//!
//! Each helper reports a specific [`OptError`] variant so callers never have
//! to build error payloads themselves.
use crate::optimization::{
    errors::{OptError, OptResult},
    minimizer::types::{Grad, Hessian, Theta},
};

pub fn verify_tolerance(tol: f64) -> OptResult<()> {
    if !tol.is_finite() {
        return Err(OptError::InvalidTolerance { tol, reason: "Tolerance must be finite." });
    }
    if tol <= 0.0 {
        return Err(OptError::InvalidTolerance { tol, reason: "Tolerance must be positive." });
    }
    Ok(())
}

pub fn verify_precision(precision: f64) -> OptResult<()> {
    if !precision.is_finite() {
        return Err(OptError::InvalidPrecision { precision, reason: "Precision must be finite." });
    }
    if precision <= 0.0 {
        return Err(OptError::InvalidPrecision {
            precision,
            reason: "Precision must be positive.",
        });
    }
    Ok(())
}

pub fn validate_grad(grad: &Grad, dim: usize) -> OptResult<()> {
    if grad.len() != dim {
        return Err(OptError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    for (index, &value) in grad.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidGradient {
                index,
                value,
                reason: "Gradient elements must be finite.",
            });
        }
    }
    Ok(())
}

pub fn validate_theta_hat(theta_hat: Option<Theta>) -> OptResult<Theta> {
    let theta = theta_hat.ok_or(OptError::MissingThetaHat)?;
    if let Some((index, &value)) = theta.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(OptError::InvalidThetaHat {
            index,
            value,
            reason: "Parameter estimates must be finite.",
        });
    }
    Ok(theta)
}

pub fn validate_value(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(())
}

pub fn validate_hessian(hessian: &Hessian, dim: usize) -> OptResult<()> {
    if hessian.nrows() != dim || hessian.ncols() != dim {
        return Err(OptError::HessianDimMismatch {
            expected: dim,
            found: (hessian.nrows(), hessian.ncols()),
        });
    }
    for ((i, j), &value) in hessian.indexed_iter() {
        if !value.is_finite() {
            return Err(OptError::InvalidHessian { row: i, col: j, value });
        }
    }
    Ok(())
}
