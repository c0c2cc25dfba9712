//! optimization::errors — unified error surface for fitting and contours.
//!
//! Purpose
//! -------
//! Collect every configuration, numerical and backend failure that the
//! parameter registry, the minimizer engine and the session can raise into a
//! single enum ([`OptError`]) with a common result alias ([`OptResult`]).
//!
//! Conventions
//! -----------
//! - Invalid configuration (undefined indices, malformed bounds, bad options)
//!   is always an `Err` at the call that introduces it.
//! - Non-convergence is *not* an error: it is reported through
//!   `FunctionMinimum::is_valid` or a failed contour entry.
//! - Raw `argmin` errors never cross module boundaries; they are mapped into
//!   the `Argmin*`-style variants below via `From<argmin::core::Error>`.
use argmin::core::{ArgminError, Error};

use crate::confidence::errors::CLError;

/// Crate-wide result alias for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- Parameter registry ----
    /// Parameter index is not below the declared parameter count.
    IndexOutOfRange {
        index: usize,
        n_params: usize,
    },
    /// A parameter with this index was already defined.
    DuplicateParameter {
        index: usize,
        name: String,
    },
    /// No parameter has been defined at this index.
    UndefinedParameter {
        index: usize,
    },
    /// No parameter with this name exists.
    UnknownParameterName {
        name: String,
    },
    /// Parameter values must be finite.
    InvalidParameterValue {
        index: usize,
        value: f64,
    },
    /// Step sizes must be finite and strictly positive.
    InvalidStep {
        index: usize,
        step: f64,
    },
    /// Bounds must be finite with lower < upper.
    InvalidBounds {
        index: usize,
        lower: f64,
        upper: f64,
    },
    /// A value update or new bound would leave the parameter outside its limits.
    ValueOutOfBounds {
        index: usize,
        value: f64,
        lower: Option<f64>,
        upper: Option<f64>,
    },
    /// The registry declares zero parameters.
    NoParameters,

    // ---- Session options ----
    /// Convergence tolerance needs to be positive and finite.
    InvalidTolerance {
        tol: f64,
        reason: &'static str,
    },
    /// Function precision needs to be positive and finite.
    InvalidPrecision {
        precision: f64,
        reason: &'static str,
    },
    /// Function call cap needs to be positive.
    InvalidMaxFunctionCalls {
        max_calls: usize,
    },
    /// Iteration cap needs to be positive.
    InvalidMaxIter {
        max_iter: usize,
    },
    /// Strategy must be one of 0, 1, 2 or a recognised name.
    InvalidStrategy {
        name: String,
        reason: &'static str,
    },
    /// Print level must be in 0..=3.
    InvalidPrintLevel {
        level: u8,
    },
    /// Error definition needs to be positive and finite.
    InvalidErrorDef {
        value: f64,
    },

    // ---- Results ----
    /// Results were requested before a minimization was run.
    MinimumNotAvailable,

    // ---- Contours and scans ----
    /// Contour or scan requested with an unusable point count.
    InvalidPointCount {
        n_points: usize,
        reason: &'static str,
    },
    /// Contour axes must be two distinct parameters.
    SameContourParameter {
        index: usize,
    },
    /// Contour axis is a fixed parameter. Scans accept fixed parameters.
    ParameterFixed {
        index: usize,
    },
    /// Scan range must be finite with low < high.
    InvalidScanRange {
        low: f64,
        high: f64,
    },
    /// The root bracket along a contour ray could not be found.
    ContourBracketFailed {
        angle: f64,
        reason: &'static str,
    },
    /// A profile minimization along a contour ray did not converge.
    ContourProfileFailed {
        angle: f64,
        status: String,
    },

    // ---- Gradient ----
    /// Implies that finite differences should be used.
    GradientNotImplemented,
    /// Gradient dimensions do not match parameter dimensions.
    GradientDimMismatch {
        expected: usize,
        found: usize,
    },
    /// Gradient elements need to be finite.
    InvalidGradient {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    // ---- Cost function ----
    /// Objective returned a non-finite value.
    NonFiniteCost {
        value: f64,
    },

    // ---- Optimizer outcome ----
    /// Estimated parameters must be finite.
    InvalidThetaHat {
        index: usize,
        value: f64,
        reason: &'static str,
    },
    /// Best parameter vector is missing from the solver state.
    MissingThetaHat,
    CallLimitReached {
        limit: usize,
    },

    // ---- Finite Diffs ----
    /// Hessian matrix dimensions do not match parameter dimensions.
    HessianDimMismatch {
        expected: usize,
        found: (usize, usize),
    },
    /// Hessian values need to be finite.
    InvalidHessian {
        row: usize,
        col: usize,
        value: f64,
    },

    // ---- Confidence levels ----
    /// Wrapper for confidence-level mapping failures.
    ConfidenceLevel(CLError),

    // ---- Argmin ---
    /// Wrapper for argmin::InvalidParameter
    InvalidParameter {
        text: String,
    },
    /// Wrapper for argmin::NotImplemented
    NotImplemented {
        text: String,
    },
    /// Wrapper for argmin::NotInitialized
    NotInitialized {
        text: String,
    },
    /// Wrapper for argmin::ConditionViolated
    ConditionViolated {
        text: String,
    },
    /// Wrapper for argmin::CheckPointNotFound
    CheckPointNotFound {
        text: String,
    },
    /// Wrapper for argmin::PotentialBug
    PotentialBug {
        text: String,
    },
    /// Wrapper for argmin::ImpossibleError
    ImpossibleError {
        text: String,
    },
    /// Wrapper for other argmin::Error types
    BackendError {
        text: String,
    },

    // ---- Fallback ----
    UnknownError,
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Parameter registry ----
            OptError::IndexOutOfRange { index, n_params } => {
                write!(f, "Parameter index {index} out of range for {n_params} declared parameters")
            }
            OptError::DuplicateParameter { index, name } => {
                write!(f, "Parameter {index} is already defined as '{name}'")
            }
            OptError::UndefinedParameter { index } => {
                write!(f, "Parameter {index} has not been defined")
            }
            OptError::UnknownParameterName { name } => {
                write!(f, "No parameter named '{name}'")
            }
            OptError::InvalidParameterValue { index, value } => {
                write!(f, "Invalid value {value} for parameter {index}, must be finite")
            }
            OptError::InvalidStep { index, step } => {
                write!(f, "Invalid step {step} for parameter {index}, must be finite and > 0")
            }
            OptError::InvalidBounds { index, lower, upper } => {
                write!(
                    f,
                    "Invalid bounds [{lower}, {upper}] for parameter {index}: need finite lower < upper"
                )
            }
            OptError::ValueOutOfBounds { index, value, lower, upper } => {
                write!(
                    f,
                    "Value {value} for parameter {index} lies outside its limits ({lower:?}, {upper:?})"
                )
            }
            OptError::NoParameters => {
                write!(f, "No parameters declared")
            }

            // ---- Session options ----
            OptError::InvalidTolerance { tol, reason } => {
                write!(f, "Invalid tolerance {tol}: {reason}")
            }
            OptError::InvalidPrecision { precision, reason } => {
                write!(f, "Invalid precision {precision}: {reason}")
            }
            OptError::InvalidMaxFunctionCalls { max_calls } => {
                write!(f, "Invalid maximum function calls {max_calls}: must be greater than zero")
            }
            OptError::InvalidMaxIter { max_iter } => {
                write!(f, "Invalid maximum iterations {max_iter}: must be greater than zero")
            }
            OptError::InvalidStrategy { name, reason } => {
                write!(f, "Invalid strategy '{name}': {reason}")
            }
            OptError::InvalidPrintLevel { level } => {
                write!(f, "Invalid print level {level}: must be in 0..=3")
            }
            OptError::InvalidErrorDef { value } => {
                write!(f, "Invalid error definition {value}: must be finite and > 0")
            }

            // ---- Results ----
            OptError::MinimumNotAvailable => {
                write!(f, "No minimum available: run minimize() first")
            }

            // ---- Contours and scans ----
            OptError::InvalidPointCount { n_points, reason } => {
                write!(f, "Invalid point count {n_points}: {reason}")
            }
            OptError::SameContourParameter { index } => {
                write!(f, "Contour axes must differ, both are parameter {index}")
            }
            OptError::ParameterFixed { index } => {
                write!(f, "Parameter {index} is fixed")
            }
            OptError::InvalidScanRange { low, high } => {
                write!(f, "Invalid scan range [{low}, {high}]: need finite low < high")
            }
            OptError::ContourBracketFailed { angle, reason } => {
                write!(f, "Contour bracket failed at angle {angle:.4}: {reason}")
            }
            OptError::ContourProfileFailed { angle, status } => {
                write!(f, "Contour profile fit failed at angle {angle:.4}: {status}")
            }

            // ---- Gradient ----
            OptError::GradientNotImplemented => {
                write!(f, "Analytic gradient not implemented")
            }
            OptError::GradientDimMismatch { expected, found } => {
                write!(f, "Gradient dimension mismatch: expected {expected}, found {found}")
            }
            OptError::InvalidGradient { index, value, reason } => {
                write!(f, "Invalid gradient at index {index}: {value}: {reason}")
            }

            // ---- Cost function ----
            OptError::NonFiniteCost { value } => {
                write!(f, "Non-finite objective value: {value}")
            }

            // ---- Optimizer outcome ----
            OptError::InvalidThetaHat { index, value, reason } => {
                write!(f, "Invalid estimated parameter at index {index}: {value}: {reason}")
            }
            OptError::MissingThetaHat => {
                write!(f, "Missing estimated parameters")
            }
            OptError::CallLimitReached { limit } => {
                write!(f, "Objective call limit of {limit} reached")
            }

            // ---- Finite Diffs ----
            OptError::HessianDimMismatch { expected, found } => {
                write!(
                    f,
                    "Hessian dimension mismatch: expected ({expected}, {expected}), found {found:?}"
                )
            }
            OptError::InvalidHessian { row, col, value } => {
                write!(f, "Invalid Hessian at ({row}, {col}): {value}, must be finite")
            }

            // ---- Confidence levels ----
            OptError::ConfidenceLevel(err) => {
                write!(f, "Confidence level error: {err}")
            }

            // ---- Argmin ----
            OptError::InvalidParameter { text } => {
                write!(f, "Invalid parameter: {text}")
            }
            OptError::NotImplemented { text } => {
                write!(f, "Not implemented: {text}")
            }
            OptError::NotInitialized { text } => {
                write!(f, "Not initialized: {text}")
            }
            OptError::ConditionViolated { text } => {
                write!(f, "Condition violated: {text}")
            }
            OptError::CheckPointNotFound { text } => {
                write!(f, "Checkpoint not found: {text}")
            }
            OptError::PotentialBug { text } => {
                write!(f, "Potential bug: {text}")
            }
            OptError::ImpossibleError { text } => {
                write!(f, "Impossible error: {text}")
            }
            OptError::BackendError { text } => {
                write!(f, "Backend error: {text}")
            }

            // ---- Fallback ----
            OptError::UnknownError => {
                write!(f, "Unknown error")
            }
        }
    }
}

impl From<Error> for OptError {
    fn from(original_err: Error) -> Self {
        // Errors raised by our own adapter travel through argmin boxed; unwrap
        // those first so callers see the original variant.
        let original_err = match original_err.downcast::<OptError>() {
            Ok(opt_err) => return opt_err,
            Err(err) => err,
        };
        match original_err.downcast() {
            Ok(argmin_err) => match argmin_err {
                ArgminError::InvalidParameter { text } => OptError::InvalidParameter { text },
                ArgminError::NotImplemented { text } => OptError::NotImplemented { text },
                ArgminError::NotInitialized { text } => OptError::NotInitialized { text },
                ArgminError::ConditionViolated { text } => OptError::ConditionViolated { text },
                ArgminError::CheckpointNotFound { text } => OptError::CheckPointNotFound { text },
                ArgminError::PotentialBug { text } => OptError::PotentialBug { text },
                ArgminError::ImpossibleError { text } => OptError::ImpossibleError { text },
                _ => OptError::UnknownError,
            },
            Err(err) => OptError::BackendError { text: err.to_string() },
        }
    }
}

impl From<CLError> for OptError {
    fn from(err: CLError) -> Self {
        OptError::ConfidenceLevel(err)
    }
}
