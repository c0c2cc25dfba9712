//! confidence::errors — error type for confidence-level mapping.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias for the confidence-level mapper
//! so that invalid sigma levels, probabilities and thresholds are rejected
//! with a precise reason instead of being coerced to a default.
//!
//! Conventions
//! -----------
//! - Every variant carries the offending value so callers can report it
//!   without extra context.
//! - `From<CLError> for OptError` (in `optimization::errors`) lets session
//!   and contour code propagate these with `?`.

pub type CLResult<T> = Result<T, CLError>;

/// CLError — failures when turning a confidence statement into a threshold.
///
/// Variants
/// --------
/// - `InvalidSigmaLevel(level)`
///   The sigma level is outside the closed set {1, 2, 3}.
/// - `InvalidProbability(p)`
///   The probability is not a finite value strictly inside (0, 1).
/// - `InvalidThreshold(chi2)`
///   A chi-square threshold is negative or non-finite.
/// - `InvalidDegreesOfFreedom(dof)`
///   Degrees of freedom outside {1, 2}.
/// - `InvalidErrorDefinition(value)`
///   An error definition that is not finite and strictly positive.
/// - `Distribution(text)`
///   The underlying `statrs` distribution could not be constructed.
#[derive(Debug, Clone, PartialEq)]
pub enum CLError {
    InvalidSigmaLevel(u8),
    InvalidProbability(f64),
    InvalidThreshold(f64),
    InvalidDegreesOfFreedom(u8),
    InvalidErrorDefinition(f64),
    Distribution(String),
}

impl std::error::Error for CLError {}

impl std::fmt::Display for CLError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CLError::InvalidSigmaLevel(level) => {
                write!(f, "Invalid sigma level: {level}. Must be 1, 2 or 3.")
            }
            CLError::InvalidProbability(p) => {
                write!(f, "Invalid confidence probability: {p}. Must satisfy 0 < p < 1.")
            }
            CLError::InvalidThreshold(chi2) => {
                write!(f, "Invalid chi-square threshold: {chi2}. Must be finite and >= 0.")
            }
            CLError::InvalidDegreesOfFreedom(dof) => {
                write!(f, "Invalid degrees of freedom: {dof}. Must be 1 or 2.")
            }
            CLError::InvalidErrorDefinition(value) => {
                write!(f, "Invalid error definition: {value}. Must be finite and > 0.")
            }
            CLError::Distribution(text) => write!(f, "Distribution error: {text}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - `Display` formatting and payload embedding for CLError variants.
    //
    // They intentionally DO NOT cover:
    // - Which mapper entry point raises which variant; see `mapper` tests.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that `CLError::InvalidSigmaLevel` reports the rejected level.
    //
    // Given
    // -----
    // - An `InvalidSigmaLevel` with level = 4.
    //
    // Expect
    // ------
    // - The message contains "4".
    fn cl_error_invalid_sigma_level_includes_payload_in_display() {
        // Arrange
        let err = CLError::InvalidSigmaLevel(4);

        // Act
        let msg = err.to_string();

        // Assert
        assert!(msg.contains('4'), "Display message should include the level.\nGot: {msg}");
    }

    #[test]
    // Purpose
    // -------
    // Verify that `CLError::InvalidProbability` reports the probability.
    //
    // Given
    // -----
    // - An `InvalidProbability` with p = 1.5.
    //
    // Expect
    // ------
    // - The message contains "1.5".
    fn cl_error_invalid_probability_includes_payload_in_display() {
        // Arrange
        let err = CLError::InvalidProbability(1.5);

        // Act
        let msg = err.to_string();

        // Assert
        assert!(msg.contains("1.5"), "Display message should include p.\nGot: {msg}");
    }
}
