//! Numerical stability utilities.
//!
//! Provides safe implementations of the nonlinear transforms used to map
//! bounded fit parameters into an unconstrained optimizer space and back.
//! The scalar helpers use explicit cutoffs (`x > 20.0`) to keep `f64`
//! arithmetic in a well-conditioned regime.
//!
//! # Provided items
//! - [`safe_softplus`] / [`safe_softplus_inv`]: ℝ ↔ (0, ∞).
//! - [`safe_logistic`] / [`safe_logit`]: ℝ ↔ (0, 1).
//! - [`to_external`] / [`to_internal`] / [`external_derivative`]: the
//!   per-parameter bound transforms built from the helpers above.
//!     - lower bound only: `x = lo + softplus(t)`
//!     - upper bound only: `x = hi − softplus(t)`
//!     - both bounds:      `x = lo + (hi − lo)·logistic(t)`
//!     - no bounds:        `x = t`
//! - Shared tolerances [`LOGIT_EPS`], [`BOUND_EPS`], [`EIGEN_EPS`].

/// Clamp used before taking a logit so values sitting exactly on a bound
/// map to a large finite internal coordinate.
pub const LOGIT_EPS: f64 = 1e-12;

/// Smallest distance from a one-sided bound kept by [`to_internal`].
pub const BOUND_EPS: f64 = 1e-12;

/// Eigenvalues at or below this magnitude are treated as zero when forming
/// pseudoinverses.
pub const EIGEN_EPS: f64 = 1e-12;

/// Numerically stable softplus: `softplus(x) = ln(1 + exp(x))`.
///
/// - For sufficiently large `x`, `softplus(x) ≈ x`.
/// - Otherwise, it falls back to `ln1p(exp(x))`.
pub fn safe_softplus(x: f64) -> f64 {
    if x > 20.0 { x } else { x.exp().ln_1p() }
}

/// Stable inverse of softplus on `(0, ∞)`: returns `t = ln(exp(x) - 1)`.
///
/// - For sufficiently large `x`, `ln(exp(x) - 1) ≈ x`.
/// - Otherwise, it uses `ln(expm1(x))`.
pub fn safe_softplus_inv(x: f64) -> f64 {
    if x > 20.0 { x } else { x.exp_m1().ln() }
}

/// Numerically stable logistic `1 / (1 + exp(-x))`, evaluated on the branch
/// that never exponentiates a large positive number.
pub fn safe_logistic(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Inverse logistic on `(0, 1)`, with `u` clamped into
/// `[LOGIT_EPS, 1 − LOGIT_EPS]`.
pub fn safe_logit(u: f64) -> f64 {
    let u = u.clamp(LOGIT_EPS, 1.0 - LOGIT_EPS);
    (u / (1.0 - u)).ln()
}

/// Map an internal (unconstrained) coordinate to the external parameter value.
pub fn to_external(internal: f64, lower: Option<f64>, upper: Option<f64>) -> f64 {
    match (lower, upper) {
        (Some(lo), Some(hi)) => lo + (hi - lo) * safe_logistic(internal),
        (Some(lo), None) => lo + safe_softplus(internal),
        (None, Some(hi)) => hi - safe_softplus(internal),
        (None, None) => internal,
    }
}

/// Map an external parameter value to its internal coordinate.
///
/// Values on (or numerically past) a bound are pulled inside by
/// [`BOUND_EPS`] / [`LOGIT_EPS`] so the result is always finite.
pub fn to_internal(external: f64, lower: Option<f64>, upper: Option<f64>) -> f64 {
    match (lower, upper) {
        (Some(lo), Some(hi)) => safe_logit((external - lo) / (hi - lo)),
        (Some(lo), None) => safe_softplus_inv((external - lo).max(BOUND_EPS)),
        (None, Some(hi)) => safe_softplus_inv((hi - external).max(BOUND_EPS)),
        (None, None) => external,
    }
}

/// `dx/dt` of [`to_external`], used to chain analytic gradients into the
/// internal space.
pub fn external_derivative(internal: f64, lower: Option<f64>, upper: Option<f64>) -> f64 {
    match (lower, upper) {
        (Some(lo), Some(hi)) => {
            let s = safe_logistic(internal);
            (hi - lo) * s * (1.0 - s)
        }
        (Some(_), None) => safe_logistic(internal),
        (None, Some(_)) => -safe_logistic(internal),
        (None, None) => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Agreement of the stable helpers with naive formulas on safe inputs.
    // - Round trips through the bound transforms for every bound shape.
    // - The analytic derivative against a central difference.
    //
    // They intentionally DO NOT cover:
    // - How the minimizer adapter uses these transforms.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Softplus and logistic agree with their naive formulas where those are
    // well conditioned, and their inverses undo them.
    //
    // Given
    // -----
    // - x ∈ {-5, -0.5, 0, 0.5, 5}.
    //
    // Expect
    // ------
    // - Relative agreement to 1e-12 and round trips to 1e-10.
    fn scalar_helpers_match_naive_formulas_and_invert() {
        for x in [-5.0_f64, -0.5, 0.0, 0.5, 5.0] {
            assert_relative_eq!(safe_softplus(x), (1.0 + x.exp()).ln(), max_relative = 1e-12);
            assert_relative_eq!(safe_logistic(x), 1.0 / (1.0 + (-x).exp()), max_relative = 1e-12);
            assert_relative_eq!(safe_softplus_inv(safe_softplus(x)), x, epsilon = 1e-10);
            assert_relative_eq!(safe_logit(safe_logistic(x)), x, epsilon = 1e-10);
        }
    }

    #[test]
    // Purpose
    // -------
    // External → internal → external is the identity for interior values.
    //
    // Given
    // -----
    // - Double, lower-only, upper-only and no bounds.
    //
    // Expect
    // ------
    // - Round trip within 1e-10 and the external value stays inside bounds.
    fn bound_transforms_round_trip() {
        let cases = [
            (0.3, Some(0.0), Some(1.0)),
            (2.5, Some(1.0), None),
            (-4.0, None, Some(-1.0)),
            (7.25, None, None),
        ];
        for (x, lo, hi) in cases {
            let t = to_internal(x, lo, hi);
            let back = to_external(t, lo, hi);
            assert_relative_eq!(back, x, epsilon = 1e-10);
        }
    }

    #[test]
    // Purpose
    // -------
    // A value sitting exactly on a bound maps to a finite internal value.
    //
    // Given
    // -----
    // - x = lo for a lower-only and a double-bounded parameter.
    //
    // Expect
    // ------
    // - Finite internal coordinates.
    fn values_on_bounds_map_to_finite_internal() {
        assert!(to_internal(1.0, Some(1.0), None).is_finite());
        assert!(to_internal(0.0, Some(0.0), Some(2.0)).is_finite());
        assert!(to_internal(2.0, Some(0.0), Some(2.0)).is_finite());
    }

    #[test]
    // Purpose
    // -------
    // `external_derivative` matches a central difference of `to_external`.
    //
    // Given
    // -----
    // - t = 0.7 for every bound shape.
    //
    // Expect
    // ------
    // - Agreement to 1e-6.
    fn external_derivative_matches_central_difference() {
        let h = 1e-6;
        let t = 0.7;
        for (lo, hi) in [(Some(-1.0), Some(3.0)), (Some(0.0), None), (None, Some(0.0)), (None, None)]
        {
            let fd = (to_external(t + h, lo, hi) - to_external(t - h, lo, hi)) / (2.0 * h);
            assert_relative_eq!(external_derivative(t, lo, hi), fd, epsilon = 1e-6);
        }
    }
}
