//! confidence — confidence statements and their chi-square thresholds.
//!
//! Purpose
//! -------
//! Own the only piece of statistical semantics in the crate: turning
//! "1 sigma", "2 sigma", "95%" into the error definition used to size
//! intervals and contours, and back.
//!
//! Key behaviors
//! -------------
//! - Validated value types ([`SigmaLevel`], [`ConfidenceSpec`],
//!   [`DegreesOfFreedom`], [`ErrorDefinition`]) in [`levels`].
//! - Pure mapping functions in [`mapper`].
//! - A dedicated error enum ([`CLError`]) in [`errors`].
//!
//! Conventions
//! -----------
//! - Contours are joint two-parameter regions, so callers typically use
//!   [`DegreesOfFreedom::Two`]; single-parameter intervals use `One`.
//! - Nothing here touches the minimizer; the session and contour layers
//!   consume the resulting [`ErrorDefinition`].

pub mod errors;
pub mod levels;
pub mod mapper;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{CLError, CLResult};
pub use self::levels::{ConfidenceSpec, DegreesOfFreedom, ErrorDefinition, SigmaLevel};
pub use self::mapper::{
    SIGMA_ERROR_DEFS, SIGMA_PROBABILITIES, probability_from_threshold, threshold_from_probability,
    threshold_from_sigma,
};
