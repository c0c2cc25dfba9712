//! confidence::mapper — confidence statements to chi-square thresholds.
//!
//! Purpose
//! -------
//! Translate human-meaningful confidence statements ("2 sigma", "95%")
//! into the error definition a minimizer needs to size intervals and
//! contours, and report the confidence that an arbitrary threshold
//! corresponds to.
//!
//! Key behaviors
//! -------------
//! - [`threshold_from_sigma`]: fixed table for the canonical two-dimensional
//!   sigma levels {2.2977, 6.2021, 11.6182}; any other level is rejected.
//! - [`threshold_from_probability`]: chi-square quantile at probability `p`
//!   for one or two degrees of freedom.
//! - [`probability_from_threshold`]: chi-square CDF, the inverse of the
//!   quantile.
//!
//! Invariants & assumptions
//! ------------------------
//! - Thresholds are strictly increasing in the confidence probability.
//! - `threshold_from_sigma(k)` agrees with
//!   `threshold_from_probability(p_k, Two)` to better than 1e-3, where
//!   `p_k ∈ {0.683, 0.955, 0.997}`.
//!
//! Conventions
//! -----------
//! - Quantiles use closed forms: `-2·ln(1 − p)` for two degrees of freedom
//!   and `Φ⁻¹((1 + p) / 2)²` for one. The CDF is `statrs`' `ChiSquared`.
//! - All functions are pure and never panic; invalid input is a [`CLError`].
//!
//! Testing notes
//! -------------
//! - Unit tests cover the sigma table, its agreement with the quantile,
//!   rejection of out-of-set levels, the quantile/CDF round trip on a grid,
//!   and monotonicity in `p`.
use statrs::distribution::{ChiSquared, ContinuousCDF, Normal};

use crate::confidence::{
    errors::{CLError, CLResult},
    levels::{DegreesOfFreedom, ErrorDefinition},
};

/// Error definitions of the 1, 2 and 3 sigma regions for two parameters.
pub const SIGMA_ERROR_DEFS: [f64; 3] = [2.2977, 6.2021, 11.6182];

/// Confidence probabilities conventionally attached to 1, 2 and 3 sigma.
pub const SIGMA_PROBABILITIES: [f64; 3] = [0.683, 0.955, 0.997];

/// threshold_from_sigma — table lookup for the canonical sigma levels.
///
/// Parameters
/// ----------
/// - `level`: `u8`
///   Sigma level; must be 1, 2 or 3.
///
/// Returns
/// -------
/// `CLResult<ErrorDefinition>`
///   The two-degrees-of-freedom threshold for that level.
///
/// Errors
/// ------
/// - `CLError::InvalidSigmaLevel(level)` for any level outside {1, 2, 3}.
///   There is no fallback to the 1-sigma constant.
pub fn threshold_from_sigma(level: u8) -> CLResult<ErrorDefinition> {
    match level {
        1..=3 => ErrorDefinition::new(SIGMA_ERROR_DEFS[level as usize - 1]),
        other => Err(CLError::InvalidSigmaLevel(other)),
    }
}

/// threshold_from_probability — chi-square quantile.
///
/// Parameters
/// ----------
/// - `p`: `f64`
///   Cumulative probability, `0 < p < 1`.
/// - `dof`: [`DegreesOfFreedom`]
///   `One` for a single-parameter interval, `Two` for a joint region.
///
/// Returns
/// -------
/// `CLResult<ErrorDefinition>`
///   The value `q` with `P(χ²_dof ≤ q) = p`.
///
/// Errors
/// ------
/// - `CLError::InvalidProbability(p)` when `p` is not inside (0, 1).
/// - `CLError::Distribution` if the standard normal cannot be built.
/// - `CLError::InvalidErrorDefinition` if the quantile underflows to zero
///   (only for `p` within machine epsilon of 0).
pub fn threshold_from_probability(p: f64, dof: DegreesOfFreedom) -> CLResult<ErrorDefinition> {
    if !p.is_finite() || p <= 0.0 || p >= 1.0 {
        return Err(CLError::InvalidProbability(p));
    }
    let quantile = match dof {
        DegreesOfFreedom::One => {
            let normal = Normal::new(0.0, 1.0).map_err(|e| CLError::Distribution(e.to_string()))?;
            let z = normal.inverse_cdf(0.5 * (1.0 + p));
            z * z
        }
        DegreesOfFreedom::Two => -2.0 * (-p).ln_1p(),
    };
    ErrorDefinition::new(quantile)
}

/// probability_from_threshold — chi-square CDF.
///
/// Parameters
/// ----------
/// - `chi2`: `f64`
///   Threshold; must be finite and non-negative.
/// - `dof`: [`DegreesOfFreedom`]
///
/// Returns
/// -------
/// `CLResult<f64>`
///   `P(χ²_dof ≤ chi2)`, in [0, 1).
///
/// Errors
/// ------
/// - `CLError::InvalidThreshold(chi2)` for negative or non-finite input.
/// - `CLError::Distribution` if `statrs` rejects the degrees of freedom.
pub fn probability_from_threshold(chi2: f64, dof: DegreesOfFreedom) -> CLResult<f64> {
    if !chi2.is_finite() || chi2 < 0.0 {
        return Err(CLError::InvalidThreshold(chi2));
    }
    let dist = ChiSquared::new(dof.as_f64()).map_err(|e| CLError::Distribution(e.to_string()))?;
    Ok(dist.cdf(chi2))
}
