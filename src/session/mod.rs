//! session — stateful minimization sessions.
//!
//! Purpose
//! -------
//! Offer the caller-facing object of the crate: a [`MinimizerSession`] that
//! owns an objective, its parameters and a validated [`SessionOptions`], runs
//! minimizations through a pluggable engine, and answers follow-up questions
//! (errors, covariance, contours, scans) about the last minimum.
//!
//! Key behaviors
//! -------------
//! - [`options`]: configuration with checked construction and the
//!   [`Strategy`] / [`LineSearcher`] choices.
//! - [`minimizer_session`]: parameter pass-throughs, `minimize`, `contour`.
//! - [`scan`]: one-dimensional objective scans.
//!
//! Conventions
//! -----------
//! - Every fallible call returns
//!   [`OptResult`](crate::optimization::errors::OptResult).

pub mod minimizer_session;
pub mod options;
pub mod scan;

pub use self::minimizer_session::MinimizerSession;
pub use self::options::{LineSearcher, SessionOptions, Strategy};
pub use self::scan::ParameterScan;
