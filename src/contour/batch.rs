//! contour::batch — per-level contour requests against a session.
//!
//! Purpose
//! -------
//! Turn confidence statements into contour requests, run them through a
//! [`MinimizerSession`], and keep one outcome per level so that a batch can
//! partially fail and still be exported.
//!
//! Key behaviors
//! -------------
//! - [`ContourBatch::request_contour`] resolves the level to an error
//!   definition (failing fast on an unusable level), passes it explicitly to
//!   the session, and stores `Populated` or `Failed` for that level.
//! - [`ContourBatch::request_standard_contours`] runs sigma levels 1, 2, 3
//!   in order; each level fails independently.
//!
//! Invariants & assumptions
//! ------------------------
//! - A stored contour always has exactly the requested number of points; a
//!   session failure never leaves points behind.
//! - Requests take `&mut MinimizerSession`, so two requests can never run
//!   against one session at the same time.
//!
//! Testing notes
//! -------------
//! - Unit tests drive a scripted engine that fails on chosen error
//!   definitions, covering mixed outcomes, overwrite semantics and
//!   fail-fast level resolution.
use crate::{
    confidence::{ConfidenceSpec, DegreesOfFreedom, SigmaLevel},
    contour::types::{Contour, ContourFailure, ContourSet, ContourStatus},
    optimization::{
        errors::OptResult,
        minimizer::{MinimizerEngine, Objective},
    },
    session::MinimizerSession,
};

/// BatchSummary — outcome of [`ContourBatch::request_standard_contours`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchSummary {
    pub populated: Vec<SigmaLevel>,
    pub failed: Vec<SigmaLevel>,
}

impl BatchSummary {
    pub fn all_populated(&self) -> bool {
        self.failed.is_empty()
    }
}

/// ContourBatch — a [`ContourSet`] plus the dimensionality used to size
/// regions.
///
/// Fields
/// ------
/// - `contours`: one status per requested level.
/// - `dof`: degrees of freedom passed to
///   [`ConfidenceSpec::error_definition`]; `Two` by default since contours
///   are joint two-parameter regions.
#[derive(Debug, Clone, Default)]
pub struct ContourBatch {
    contours: ContourSet,
    dof: DegreesOfFreedom,
}

impl ContourBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dof(dof: DegreesOfFreedom) -> Self {
        Self { contours: ContourSet::new(), dof }
    }

    pub fn dof(&self) -> DegreesOfFreedom {
        self.dof
    }

    pub fn set_dof(&mut self, dof: DegreesOfFreedom) {
        self.dof = dof;
    }

    /// request_contour — trace one level and record the outcome.
    ///
    /// Parameters
    /// ----------
    /// - `session`: a session holding a current minimum.
    /// - `level`: confidence statement to trace.
    /// - `n_points`: number of points of the curve.
    /// - `par_x`, `par_y`: parameter indices of the axes.
    ///
    /// Returns
    /// -------
    /// `OptResult<&ContourStatus>`
    ///   The stored `Populated` or `Failed` entry for `level`, replacing any
    ///   earlier entry.
    ///
    /// Errors
    /// ------
    /// - `ConfidenceLevel` when the level cannot be resolved to an error
    ///   definition. Nothing is stored in that case. Every later failure is
    ///   recorded as `Failed` instead of returned.
    pub fn request_contour<F: Objective, E: MinimizerEngine>(
        &mut self, session: &mut MinimizerSession<F, E>, level: ConfidenceSpec, n_points: usize,
        par_x: usize, par_y: usize,
    ) -> OptResult<&ContourStatus> {
        let error_def = level.error_definition(self.dof)?;
        let slot = self.contours.entry(level).or_insert(ContourStatus::Pending);
        *slot = match session.contour(par_x, par_y, n_points, error_def) {
            Ok(points) => ContourStatus::Populated(Contour {
                level,
                error_def,
                par_x,
                par_y,
                names: (axis_name(session, par_x), axis_name(session, par_y)),
                points,
            }),
            Err(error) => {
                ContourStatus::Failed(ContourFailure { level, par_x, par_y, n_points, error })
            }
        };
        Ok(&*slot)
    }

    /// request_standard_contours — sigma levels 1, 2 and 3, in that order.
    pub fn request_standard_contours<F: Objective, E: MinimizerEngine>(
        &mut self, session: &mut MinimizerSession<F, E>, n_points: usize, par_x: usize,
        par_y: usize,
    ) -> OptResult<BatchSummary> {
        let mut summary = BatchSummary::default();
        for level in SigmaLevel::ALL {
            let status = self.request_contour(session, level.into(), n_points, par_x, par_y)?;
            if status.is_populated() {
                summary.populated.push(level);
            } else {
                summary.failed.push(level);
            }
        }
        Ok(summary)
    }

    pub fn contours(&self) -> &ContourSet {
        &self.contours
    }

    pub fn get(&self, level: &ConfidenceSpec) -> Option<&ContourStatus> {
        self.contours.get(level)
    }

    /// Populated contours in level order.
    pub fn populated(&self) -> impl Iterator<Item = &Contour> {
        self.contours.values().filter_map(ContourStatus::contour)
    }

    /// Recorded failures in level order.
    pub fn failed(&self) -> impl Iterator<Item = &ContourFailure> {
        self.contours.values().filter_map(ContourStatus::failure)
    }

    pub fn clear(&mut self) {
        self.contours.clear();
    }
}

fn axis_name<F: Objective, E: MinimizerEngine>(
    session: &MinimizerSession<F, E>, index: usize,
) -> String {
    session
        .registry()
        .get(index)
        .map_or_else(|_| format!("p{index}"), |p| p.name().to_string())
}
