//! parameters::parameter — a single fit parameter and its attributes.
use serde::{Deserialize, Serialize};

use crate::optimization::errors::{OptError, OptResult};

/// FitParameter — one entry of the parameter registry.
///
/// Purpose
/// -------
/// Hold the mutable state of a fit parameter: identity, current value,
/// step size, optional limits, fixed/free status and the most recent
/// error estimate.
///
/// Fields
/// ------
/// - `index`: position in the objective's parameter vector.
/// - `name`: human-readable name, unique within a registry.
/// - `value`: current value; the starting point of the next fit.
/// - `step`: initial step size / scale hint, finite and `> 0`.
/// - `lower`, `upper`: optional limits; when both present `lower < upper`.
/// - `fixed`: excluded from minimization when `true`.
/// - `error`: error from the last fit, `None` before any fit.
///
/// Invariants
/// ----------
/// - `value` is finite and lies inside any limits that are set.
/// - Fields are private; every mutation goes through the checked methods
///   below, which the registry calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitParameter {
    index: usize,
    name: String,
    value: f64,
    step: f64,
    lower: Option<f64>,
    upper: Option<f64>,
    fixed: bool,
    error: Option<f64>,
}

impl FitParameter {
    /// Build a free, unbounded parameter.
    ///
    /// # Errors
    /// - [`OptError::InvalidParameterValue`] for a non-finite value.
    /// - [`OptError::InvalidStep`] for a non-finite or non-positive step.
    pub fn new(index: usize, name: impl Into<String>, value: f64, step: f64) -> OptResult<Self> {
        check_value(index, value)?;
        check_step(index, step)?;
        Ok(Self {
            index,
            name: name.into(),
            value,
            step,
            lower: None,
            upper: None,
            fixed: false,
            error: None,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn lower(&self) -> Option<f64> {
        self.lower
    }

    pub fn upper(&self) -> Option<f64> {
        self.upper
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    pub fn is_bounded(&self) -> bool {
        self.lower.is_some() || self.upper.is_some()
    }

    pub fn error(&self) -> Option<f64> {
        self.error
    }

    /// Whether `value` respects the current limits.
    pub fn admits(&self, value: f64) -> bool {
        self.lower.is_none_or(|lo| value >= lo) && self.upper.is_none_or(|hi| value <= hi)
    }

    pub(crate) fn set_value(&mut self, value: f64) -> OptResult<()> {
        check_value(self.index, value)?;
        if !self.admits(value) {
            return Err(self.out_of_bounds(value));
        }
        self.value = value;
        Ok(())
    }

    /// The value a fit result may write back: `value` itself when inside the
    /// limits, the limit when `value` overshoots it by float round-off only.
    ///
    /// # Errors
    /// - [`OptError::InvalidParameterValue`] for a non-finite value.
    /// - [`OptError::ValueOutOfBounds`] for a genuine limit violation.
    pub(crate) fn admissible(&self, value: f64) -> OptResult<f64> {
        check_value(self.index, value)?;
        if self.admits(value) {
            return Ok(value);
        }
        let near = |limit: f64| (value - limit).abs() <= ROUND_OFF * limit.abs().max(1.0);
        match (self.lower, self.upper) {
            (Some(lo), _) if value < lo && near(lo) => Ok(lo),
            (_, Some(hi)) if value > hi && near(hi) => Ok(hi),
            _ => Err(self.out_of_bounds(value)),
        }
    }

    pub(crate) fn set_step(&mut self, step: f64) -> OptResult<()> {
        check_step(self.index, step)?;
        self.step = step;
        Ok(())
    }

    /// Replace both limits at once; `None` removes a side.
    ///
    /// # Errors
    /// - [`OptError::InvalidBounds`] for non-finite limits or `lower >= upper`.
    /// - [`OptError::ValueOutOfBounds`] if the current value would fall
    ///   outside the new limits. The value is never moved silently.
    pub(crate) fn set_limits(&mut self, lower: Option<f64>, upper: Option<f64>) -> OptResult<()> {
        let lo = lower.unwrap_or(f64::NEG_INFINITY);
        let hi = upper.unwrap_or(f64::INFINITY);
        let finite = lower.is_none_or(f64::is_finite) && upper.is_none_or(f64::is_finite);
        if !finite || lo >= hi {
            return Err(OptError::InvalidBounds { index: self.index, lower: lo, upper: hi });
        }
        if self.value < lo || self.value > hi {
            return Err(OptError::ValueOutOfBounds {
                index: self.index,
                value: self.value,
                lower,
                upper,
            });
        }
        self.lower = lower;
        self.upper = upper;
        Ok(())
    }

    pub(crate) fn set_fixed(&mut self, fixed: bool) {
        self.fixed = fixed;
    }

    pub(crate) fn set_error(&mut self, error: Option<f64>) {
        self.error = error;
    }

    fn out_of_bounds(&self, value: f64) -> OptError {
        OptError::ValueOutOfBounds { index: self.index, value, lower: self.lower, upper: self.upper }
    }
}

/// Relative overshoot past a limit still attributed to round-off.
const ROUND_OFF: f64 = 4.0 * f64::EPSILON;

fn check_value(index: usize, value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::InvalidParameterValue { index, value });
    }
    Ok(())
}

fn check_step(index: usize, step: f64) -> OptResult<()> {
    if !step.is_finite() || step <= 0.0 {
        return Err(OptError::InvalidStep { index, step });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Constructor rejects non-finite values and non-positive steps.
    //
    // Given
    // -----
    // - value = NaN, step = 0.
    //
    // Expect
    // ------
    // - `InvalidParameterValue` and `InvalidStep` respectively.
    fn new_rejects_bad_value_and_step() {
        assert!(matches!(
            FitParameter::new(0, "mu", f64::NAN, 0.1),
            Err(OptError::InvalidParameterValue { index: 0, .. })
        ));
        assert_eq!(
            FitParameter::new(1, "sigma", 1.0, 0.0),
            Err(OptError::InvalidStep { index: 1, step: 0.0 })
        );
    }

    #[test]
    // Purpose
    // -------
    // Limits constrain later value updates instead of clamping them.
    //
    // Given
    // -----
    // - A parameter at 0.5 limited to [0, 1].
    //
    // Expect
    // ------
    // - Setting 1.5 fails and leaves the value at 0.5; setting 0.75 works.
    fn limits_reject_out_of_range_updates() {
        // Arrange
        let mut p = FitParameter::new(0, "frac", 0.5, 0.01).unwrap();
        p.set_limits(Some(0.0), Some(1.0)).unwrap();

        // Act
        let rejected = p.set_value(1.5);
        let accepted = p.set_value(0.75);

        // Assert
        assert!(matches!(rejected, Err(OptError::ValueOutOfBounds { .. })));
        assert!(accepted.is_ok());
        assert_eq!(p.value(), 0.75);
    }

    #[test]
    // Purpose
    // -------
    // Malformed limits are rejected.
    //
    // Given
    // -----
    // - lower > upper, lower == upper and a NaN limit.
    //
    // Expect
    // ------
    // - `InvalidBounds` each time and limits left unset.
    fn set_limits_rejects_malformed_bounds() {
        let mut p = FitParameter::new(2, "tau", 0.0, 0.1).unwrap();
        assert!(matches!(p.set_limits(Some(1.0), Some(-1.0)), Err(OptError::InvalidBounds { .. })));
        assert!(matches!(p.set_limits(Some(0.0), Some(0.0)), Err(OptError::InvalidBounds { .. })));
        assert!(matches!(p.set_limits(Some(f64::NAN), None), Err(OptError::InvalidBounds { .. })));
        assert!(!p.is_bounded());
    }

    #[test]
    // Purpose
    // -------
    // New limits that exclude the current value are rejected, not applied.
    //
    // Given
    // -----
    // - A parameter at 3.0 and limits [0, 1].
    //
    // Expect
    // ------
    // - `ValueOutOfBounds` and the value unchanged.
    fn set_limits_excluding_current_value_fails() {
        let mut p = FitParameter::new(0, "a", 3.0, 0.1).unwrap();
        assert!(matches!(
            p.set_limits(Some(0.0), Some(1.0)),
            Err(OptError::ValueOutOfBounds { value, .. }) if value == 3.0
        ));
        assert_eq!(p.value(), 3.0);
    }

    #[test]
    // Purpose
    // -------
    // Fit values a few ulps past a limit settle on it; real violations don't.
    //
    // Given
    // -----
    // - A parameter limited to [0.01, 10].
    //
    // Expect
    // ------
    // - 10 + 1 ulp → 10, 0.01 − 1 ulp → 0.01, 10.5 → `ValueOutOfBounds`,
    //   interior values unchanged.
    fn admissible_absorbs_round_off_only() {
        let mut p = FitParameter::new(1, "sigma", 1.0, 0.1).unwrap();
        p.set_limits(Some(0.01), Some(10.0)).unwrap();

        assert_eq!(p.admissible(f64::from_bits(10.0_f64.to_bits() + 1)), Ok(10.0));
        assert_eq!(p.admissible(f64::from_bits(0.01_f64.to_bits() - 1)), Ok(0.01));
        assert_eq!(p.admissible(2.5), Ok(2.5));
        assert!(matches!(p.admissible(10.5), Err(OptError::ValueOutOfBounds { .. })));
    }
}
