//! session::scan — one-dimensional scans of the objective.
//!
//! A scan moves one parameter across a range while every other parameter
//! stays at its current registry value, recording `(x, f(x))`. It never
//! re-minimizes and never writes back into the registry.
use serde::{Deserialize, Serialize};

use crate::{
    optimization::{
        errors::{OptError, OptResult},
        minimizer::{Objective, validation::validate_value},
    },
    parameters::FitParameter,
};

/// Half-width of the default scan range, in parameter errors (or steps
/// before any fit).
pub const DEFAULT_SCAN_HALF_WIDTH: f64 = 2.0;

/// ParameterScan — sampled objective values along one parameter.
///
/// Fields
/// ------
/// - `index`, `name`: the scanned parameter.
/// - `points`: `(x, f(x))` pairs with increasing `x`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterScan {
    pub index: usize,
    pub name: String,
    pub points: Vec<(f64, f64)>,
}

impl ParameterScan {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sample with the smallest objective value.
    pub fn lowest(&self) -> Option<(f64, f64)> {
        self.points.iter().copied().min_by(|a, b| a.1.total_cmp(&b.1))
    }
}

/// Range used when the caller gives none: value ± 2·error after a fit,
/// value ± 2·step before one, clipped to the parameter limits.
pub fn default_range(param: &FitParameter) -> (f64, f64) {
    let width = match param.error() {
        Some(err) if err.is_finite() && err > 0.0 => err,
        _ => param.step(),
    } * DEFAULT_SCAN_HALF_WIDTH;
    let lo = param.value() - width;
    let hi = param.value() + width;
    (param.lower().map_or(lo, |l| lo.max(l)), param.upper().map_or(hi, |u| hi.min(u)))
}

/// scan_parameter — evaluate `f` on `n_steps` equally spaced values.
///
/// Parameters
/// ----------
/// - `f`: objective.
/// - `params`: registry snapshot; supplies every other coordinate.
/// - `index`: parameter to move.
/// - `n_steps`: number of samples, at least 2; both ends are included.
/// - `range`: explicit `(low, high)`, or `None` for [`default_range`].
///
/// Errors
/// ------
/// - `IndexOutOfRange` for a bad index.
/// - `InvalidPointCount` for fewer than 2 steps.
/// - `InvalidScanRange` for a non-finite or empty range, or one leaving the
///   parameter limits.
/// - Objective errors, and `NonFiniteCost` for a non-finite sample.
pub fn scan_parameter<F: Objective + ?Sized>(
    f: &F, params: &[FitParameter], index: usize, n_steps: usize, range: Option<(f64, f64)>,
) -> OptResult<ParameterScan> {
    let param = params.get(index).ok_or(OptError::IndexOutOfRange { index, n_params: params.len() })?;
    if n_steps < 2 {
        return Err(OptError::InvalidPointCount {
            n_points: n_steps,
            reason: "A scan needs at least two steps.",
        });
    }
    let (low, high) = range.unwrap_or_else(|| default_range(param));
    if !low.is_finite() || !high.is_finite() || low >= high || !param.admits(low) || !param.admits(high)
    {
        return Err(OptError::InvalidScanRange { low, high });
    }

    let mut x: Vec<f64> = params.iter().map(FitParameter::value).collect();
    let mut points = Vec::with_capacity(n_steps);
    for k in 0..n_steps {
        let v = low + (high - low) * k as f64 / (n_steps - 1) as f64;
        x[index] = v;
        let value = f.value(&x)?;
        validate_value(value)?;
        points.push((v, value));
    }
    Ok(ParameterScan { index, name: param.name().to_string(), points })
}
