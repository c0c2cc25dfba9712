//! session::options — validated minimizer configuration.
//!
//! Purpose
//! -------
//! Hold every knob a [`MinimizerSession`](super::MinimizerSession) passes to
//! its engine: convergence tolerances, call and iteration caps, strategy,
//! verbosity and the error definition used to scale parameter errors.
//!
//! Key behaviors
//! -------------
//! - [`SessionOptions::new`] validates all fields; [`Default`] gives the
//!   conventional settings (tolerance 1e-8, precision 1e-18, 500 000 calls
//!   and iterations, strategy 1, print level 1, error definition 1).
//! - [`Strategy`] parses from its ordinal (0, 1, 2) or its name and decides
//!   the L-BFGS memory, line search and whether a polishing restart runs.
//!
//! Conventions
//! -----------
//! - Fields are public for reading; sessions re-validate through their
//!   setters, so a session never holds an invalid configuration.
use std::str::FromStr;

use crate::optimization::{
    errors::{OptError, OptResult},
    minimizer::{
        types::{DEFAULT_LBFGS_MEM, FAST_LBFGS_MEM, THOROUGH_LBFGS_MEM},
        validation::{verify_precision, verify_tolerance},
    },
};

pub const DEFAULT_TOLERANCE: f64 = 1e-8;
pub const DEFAULT_PRECISION: f64 = 1e-18;
pub const DEFAULT_MAX_FUNCTION_CALLS: usize = 500_000;
pub const DEFAULT_MAX_ITERATIONS: usize = 500_000;
pub const DEFAULT_PRINT_LEVEL: u8 = 1;
pub const MAX_PRINT_LEVEL: u8 = 3;

/// Line search used inside L-BFGS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSearcher {
    MoreThuente,
    HagerZhang,
}

/// Strategy — speed/robustness trade-off of a minimization.
///
/// - `Fast` (0): L-BFGS memory 5, More–Thuente line search.
/// - `Default` (1): memory 7, More–Thuente.
/// - `Thorough` (2): memory 15, Hager–Zhang, then a polishing restart from
///   the first solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    Fast,
    #[default]
    Default,
    Thorough,
}

impl Strategy {
    pub fn as_u8(self) -> u8 {
        match self {
            Strategy::Fast => 0,
            Strategy::Default => 1,
            Strategy::Thorough => 2,
        }
    }

    pub fn lbfgs_mem(self) -> usize {
        match self {
            Strategy::Fast => FAST_LBFGS_MEM,
            Strategy::Default => DEFAULT_LBFGS_MEM,
            Strategy::Thorough => THOROUGH_LBFGS_MEM,
        }
    }

    pub fn line_searcher(self) -> LineSearcher {
        match self {
            Strategy::Fast | Strategy::Default => LineSearcher::MoreThuente,
            Strategy::Thorough => LineSearcher::HagerZhang,
        }
    }

    /// Whether a second run is started from the first solution.
    pub fn polishes(self) -> bool {
        self == Strategy::Thorough
    }
}

impl TryFrom<u8> for Strategy {
    type Error = OptError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            0 => Ok(Strategy::Fast),
            1 => Ok(Strategy::Default),
            2 => Ok(Strategy::Thorough),
            _ => Err(OptError::InvalidStrategy {
                name: level.to_string(),
                reason: "Strategy ordinal must be 0, 1 or 2.",
            }),
        }
    }
}

impl FromStr for Strategy {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fast" | "0" => Ok(Strategy::Fast),
            "default" | "1" => Ok(Strategy::Default),
            "thorough" | "2" => Ok(Strategy::Thorough),
            _ => Err(OptError::InvalidStrategy {
                name: s.to_string(),
                reason: "Valid options are 'fast', 'default', 'thorough' or 0..=2.",
            }),
        }
    }
}

/// SessionOptions — configuration of a minimizer session.
///
/// Fields
/// ------
/// - `tolerance`: gradient-norm tolerance of the solver and, scaled by the
///   error definition, the largest EDM a valid minimum may have.
/// - `precision`: smallest cost change still counted as progress.
/// - `max_function_calls`: cap on objective evaluations per minimization.
/// - `max_iterations`: cap on solver iterations per minimization.
/// - `strategy`: see [`Strategy`].
/// - `print_level`: 0 silent, 1 initial state, 2–3 per-iteration logs
///   (the latter two only with the `obs_slog` feature).
/// - `error_def`: objective rise that defines a one-parameter error.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    pub tolerance: f64,
    pub precision: f64,
    pub max_function_calls: usize,
    pub max_iterations: usize,
    pub strategy: Strategy,
    pub print_level: u8,
    pub error_def: f64,
}

impl SessionOptions {
    /// Build and validate a configuration.
    ///
    /// # Errors
    /// - `InvalidTolerance` / `InvalidPrecision` for non-finite or
    ///   non-positive values.
    /// - `InvalidMaxFunctionCalls` / `InvalidMaxIter` for zero caps.
    /// - `InvalidPrintLevel` above [`MAX_PRINT_LEVEL`].
    /// - `InvalidErrorDef` for a non-finite or non-positive error definition.
    pub fn new(
        tolerance: f64, precision: f64, max_function_calls: usize, max_iterations: usize,
        strategy: Strategy, print_level: u8, error_def: f64,
    ) -> OptResult<Self> {
        let opts = Self {
            tolerance,
            precision,
            max_function_calls,
            max_iterations,
            strategy,
            print_level,
            error_def,
        };
        opts.validate()?;
        Ok(opts)
    }

    pub fn validate(&self) -> OptResult<()> {
        verify_tolerance(self.tolerance)?;
        verify_precision(self.precision)?;
        if self.max_function_calls == 0 {
            return Err(OptError::InvalidMaxFunctionCalls { max_calls: 0 });
        }
        if self.max_iterations == 0 {
            return Err(OptError::InvalidMaxIter { max_iter: 0 });
        }
        verify_print_level(self.print_level)?;
        verify_error_def(self.error_def)
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            precision: DEFAULT_PRECISION,
            max_function_calls: DEFAULT_MAX_FUNCTION_CALLS,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            strategy: Strategy::Default,
            print_level: DEFAULT_PRINT_LEVEL,
            error_def: 1.0,
        }
    }
}

pub(crate) fn verify_print_level(level: u8) -> OptResult<()> {
    if level > MAX_PRINT_LEVEL {
        return Err(OptError::InvalidPrintLevel { level });
    }
    Ok(())
}

pub(crate) fn verify_error_def(value: f64) -> OptResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(OptError::InvalidErrorDef { value });
    }
    Ok(())
}
