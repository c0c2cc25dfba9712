//! confidence::levels — value types for confidence statements.
//!
//! Purpose
//! -------
//! Define the small, validated value types the mapper works with:
//! [`SigmaLevel`], [`DegreesOfFreedom`], [`ErrorDefinition`] and the
//! caller-facing [`ConfidenceSpec`].
//!
//! Invariants & assumptions
//! ------------------------
//! - A `SigmaLevel` is always one of 1, 2, 3.
//! - A `ConfidenceSpec::Probability(p)` always satisfies `0 < p < 1` when
//!   built through [`ConfidenceSpec::probability`].
//! - An `ErrorDefinition` is always finite and strictly positive.
//!
//! Conventions
//! -----------
//! - `ConfidenceSpec` is totally ordered (sigma levels first, then
//!   probabilities by `f64::total_cmp`) so it can key a `BTreeMap`.
use std::cmp::Ordering;

use crate::confidence::{
    errors::{CLError, CLResult},
    mapper::{SIGMA_PROBABILITIES, threshold_from_probability, threshold_from_sigma},
};

/// Canonical sigma level of a two-parameter confidence region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SigmaLevel {
    One,
    Two,
    Three,
}

impl SigmaLevel {
    /// All canonical levels in increasing order.
    pub const ALL: [SigmaLevel; 3] = [SigmaLevel::One, SigmaLevel::Two, SigmaLevel::Three];

    /// Build a level from its integer form; anything outside {1, 2, 3} is
    /// rejected with [`CLError::InvalidSigmaLevel`].
    pub fn new(level: u8) -> CLResult<Self> {
        match level {
            1 => Ok(SigmaLevel::One),
            2 => Ok(SigmaLevel::Two),
            3 => Ok(SigmaLevel::Three),
            other => Err(CLError::InvalidSigmaLevel(other)),
        }
    }

    pub fn as_u8(self) -> u8 {
        match self {
            SigmaLevel::One => 1,
            SigmaLevel::Two => 2,
            SigmaLevel::Three => 3,
        }
    }

    /// Confidence probability conventionally attached to this level
    /// (0.683, 0.955, 0.997).
    pub fn probability(self) -> f64 {
        SIGMA_PROBABILITIES[self.as_u8() as usize - 1]
    }
}

impl TryFrom<u8> for SigmaLevel {
    type Error = CLError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        SigmaLevel::new(level)
    }
}

impl std::fmt::Display for SigmaLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}sigma", self.as_u8())
    }
}

/// Dimensionality of the region being sized.
///
/// - `One`: single-parameter interval.
/// - `Two`: joint two-parameter region (contours).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DegreesOfFreedom {
    One,
    #[default]
    Two,
}

impl DegreesOfFreedom {
    pub fn new(dof: u8) -> CLResult<Self> {
        match dof {
            1 => Ok(DegreesOfFreedom::One),
            2 => Ok(DegreesOfFreedom::Two),
            other => Err(CLError::InvalidDegreesOfFreedom(other)),
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            DegreesOfFreedom::One => 1.0,
            DegreesOfFreedom::Two => 2.0,
        }
    }
}

/// Chi-square increment above the minimum that bounds a confidence region.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct ErrorDefinition(f64);

impl ErrorDefinition {
    /// Wrap a raw threshold, rejecting non-finite or non-positive values.
    pub fn new(value: f64) -> CLResult<Self> {
        if !value.is_finite() || value <= 0.0 {
            return Err(CLError::InvalidErrorDefinition(value));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl std::fmt::Display for ErrorDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// ConfidenceSpec — a caller's confidence statement.
///
/// Purpose
/// -------
/// Carry either a canonical sigma level or an arbitrary probability until
/// the point where it is turned into an [`ErrorDefinition`].
///
/// Variants
/// --------
/// - `Sigma(level)`: one of the canonical sigma levels.
/// - `Probability(p)`: any probability with `0 < p < 1`.
///
/// Notes
/// -----
/// - Construct probabilities through [`ConfidenceSpec::probability`] so the
///   range check runs; the variant itself is public for pattern matching.
#[derive(Debug, Clone, Copy)]
pub enum ConfidenceSpec {
    Sigma(SigmaLevel),
    Probability(f64),
}

impl ConfidenceSpec {
    pub fn sigma(level: u8) -> CLResult<Self> {
        Ok(ConfidenceSpec::Sigma(SigmaLevel::new(level)?))
    }

    pub fn probability(p: f64) -> CLResult<Self> {
        if !p.is_finite() || p <= 0.0 || p >= 1.0 {
            return Err(CLError::InvalidProbability(p));
        }
        Ok(ConfidenceSpec::Probability(p))
    }

    /// Confidence probability of this statement.
    pub fn confidence(&self) -> f64 {
        match self {
            ConfidenceSpec::Sigma(level) => level.probability(),
            ConfidenceSpec::Probability(p) => *p,
        }
    }

    /// Resolve to the error definition for a region of `dof` dimensions.
    ///
    /// Sigma levels in two dimensions use the fixed table; in one dimension
    /// they go through the quantile at the level's canonical probability.
    pub fn error_definition(&self, dof: DegreesOfFreedom) -> CLResult<ErrorDefinition> {
        match (self, dof) {
            (ConfidenceSpec::Sigma(level), DegreesOfFreedom::Two) => {
                threshold_from_sigma(level.as_u8())
            }
            (ConfidenceSpec::Sigma(level), DegreesOfFreedom::One) => {
                threshold_from_probability(level.probability(), dof)
            }
            (ConfidenceSpec::Probability(p), _) => threshold_from_probability(*p, dof),
        }
    }

    /// Short identifier used for curve names, e.g. `1sigma`, `p90` or
    /// `p95_5`.
    ///
    /// Probability labels are the percentage written from the shortest
    /// decimal form of `p` that reads back as the same `f64`, with `_` for
    /// the decimal point. Distinct probabilities get distinct labels.
    pub fn label(&self) -> String {
        match self {
            ConfidenceSpec::Sigma(level) => level.to_string(),
            ConfidenceSpec::Probability(p) => format!("p{}", percent_digits(*p)),
        }
    }

    fn sort_key(&self) -> (u8, f64) {
        match self {
            ConfidenceSpec::Sigma(level) => (0, f64::from(level.as_u8())),
            ConfidenceSpec::Probability(p) => (1, *p),
        }
    }
}

impl From<SigmaLevel> for ConfidenceSpec {
    fn from(level: SigmaLevel) -> Self {
        ConfidenceSpec::Sigma(level)
    }
}

impl PartialEq for ConfidenceSpec {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ConfidenceSpec {}

impl PartialOrd for ConfidenceSpec {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ConfidenceSpec {
    fn cmp(&self, other: &Self) -> Ordering {
        let (tag_a, val_a) = self.sort_key();
        let (tag_b, val_b) = other.sort_key();
        tag_a.cmp(&tag_b).then_with(|| val_a.total_cmp(&val_b))
    }
}

impl std::fmt::Display for ConfidenceSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfidenceSpec::Sigma(level) => write!(f, "{level}"),
            ConfidenceSpec::Probability(p) => write!(f, "{:.2}% CL", p * 100.0),
        }
    }
}

/// `p` as a percentage by shifting the decimal point of its shortest
/// round-trip form, so no rounding is involved: 0.955 → `95_5`,
/// 0.9 → `90`, 0.005 → `0_5`.
///
/// Values outside `(0, 1)` can only come from the bare variant; they keep
/// their plain decimal form.
fn percent_digits(p: f64) -> String {
    let text = p.to_string();
    let Some(fraction) = text.strip_prefix("0.") else {
        return text.replace('.', "_");
    };
    let fraction = format!("{fraction:0<2}");
    let (whole, rest) = fraction.split_at(2);
    let whole = match whole.trim_start_matches('0') {
        "" => "0",
        w => w,
    };
    if rest.is_empty() { whole.to_string() } else { format!("{whole}_{rest}") }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Validation in the `SigmaLevel`, `ErrorDefinition` and `ConfidenceSpec`
    //   constructors.
    // - Ordering and labels used when `ConfidenceSpec` keys a contour map.
    //
    // They intentionally DO NOT cover:
    // - Numerical accuracy of thresholds (see `mapper` tests).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Sigma levels outside {1, 2, 3} must be rejected.
    //
    // Given
    // -----
    // - Levels 0 and 4.
    //
    // Expect
    // ------
    // - `CLError::InvalidSigmaLevel` with the same payload.
    fn sigma_level_rejects_out_of_set_values() {
        assert_eq!(SigmaLevel::new(0), Err(CLError::InvalidSigmaLevel(0)));
        assert_eq!(SigmaLevel::try_from(4), Err(CLError::InvalidSigmaLevel(4)));
        assert_eq!(SigmaLevel::new(2), Ok(SigmaLevel::Two));
    }

    #[test]
    // Purpose
    // -------
    // Probabilities must lie strictly inside (0, 1).
    //
    // Given
    // -----
    // - 0.0, 1.0, NaN and 0.9.
    //
    // Expect
    // ------
    // - The first three are rejected, 0.9 is accepted.
    fn confidence_probability_rejects_closed_endpoints_and_nan() {
        assert!(ConfidenceSpec::probability(0.0).is_err());
        assert!(ConfidenceSpec::probability(1.0).is_err());
        assert!(ConfidenceSpec::probability(f64::NAN).is_err());
        assert!(ConfidenceSpec::probability(0.9).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Error definitions must be finite and strictly positive.
    //
    // Given
    // -----
    // - 0.0, -1.0, infinity and 2.3.
    //
    // Expect
    // ------
    // - Only 2.3 is accepted.
    fn error_definition_requires_positive_finite_value() {
        assert!(ErrorDefinition::new(0.0).is_err());
        assert!(ErrorDefinition::new(-1.0).is_err());
        assert!(ErrorDefinition::new(f64::INFINITY).is_err());
        assert_eq!(ErrorDefinition::new(2.3).map(ErrorDefinition::value), Ok(2.3));
    }

    #[test]
    // Purpose
    // -------
    // `ConfidenceSpec` keys a map with one entry per distinct level.
    //
    // Given
    // -----
    // - Inserting 2sigma, p=0.9, 1sigma and 2sigma again.
    //
    // Expect
    // ------
    // - Three keys, sigma levels first in increasing order.
    fn confidence_spec_orders_sigma_before_probability() {
        // Arrange
        let mut map = BTreeMap::new();
        map.insert(ConfidenceSpec::Sigma(SigmaLevel::Two), "a");
        map.insert(ConfidenceSpec::probability(0.9).unwrap(), "b");
        map.insert(ConfidenceSpec::Sigma(SigmaLevel::One), "c");
        map.insert(ConfidenceSpec::Sigma(SigmaLevel::Two), "d");

        // Act
        let keys: Vec<String> = map.keys().map(|k| k.label()).collect();

        // Assert
        assert_eq!(keys, vec!["1sigma", "2sigma", "p90"]);
        assert_eq!(map[&ConfidenceSpec::Sigma(SigmaLevel::Two)], "d");
    }

    #[test]
    // Purpose
    // -------
    // Probability labels keep significant decimals without trailing zeros.
    //
    // Given
    // -----
    // - p = 0.955 and p = 0.5.
    //
    // Expect
    // ------
    // - Labels `p95_5` and `p50`.
    fn probability_label_trims_trailing_zeros() {
        assert_eq!(ConfidenceSpec::probability(0.955).unwrap().label(), "p95_5");
        assert_eq!(ConfidenceSpec::probability(0.5).unwrap().label(), "p50");
        assert_eq!(ConfidenceSpec::probability(0.005).unwrap().label(), "p0_5");
        assert_eq!(ConfidenceSpec::probability(0.05).unwrap().label(), "p5");
    }

    #[test]
    // Purpose
    // -------
    // Probabilities that differ in any digit keep different labels, even
    // where a rounded percentage would merge them.
    //
    // Given
    // -----
    // - p = 0.9 vs 0.900001, and p = 0.9999995 vs 0.9999999.
    //
    // Expect
    // ------
    // - Four distinct labels carrying every significant digit.
    fn probability_labels_are_exact() {
        let label = |p: f64| ConfidenceSpec::probability(p).unwrap().label();

        assert_eq!(label(0.9), "p90");
        assert_eq!(label(0.900_001), "p90_0001");
        assert_eq!(label(0.999_999_5), "p99_99995");
        assert_eq!(label(0.999_999_9), "p99_99999");
    }
}
