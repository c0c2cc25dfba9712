//! contour::types — stored contours and their per-level status.
//!
//! Purpose
//! -------
//! Describe what a contour batch remembers per confidence level: either a
//! complete curve, a recorded failure, or a request still in flight.
//!
//! Invariants
//! ----------
//! - A [`Contour`] holds exactly the number of points that was requested;
//!   partially traced curves are never stored.
//! - A [`ContourSet`] has at most one entry per [`ConfidenceSpec`]; a new
//!   request for the same level replaces the old entry.
use std::collections::BTreeMap;

use crate::{
    confidence::{ConfidenceSpec, ErrorDefinition},
    optimization::{errors::OptError, minimizer::ContourPoint},
};

/// Contours keyed by confidence level, sigma levels first.
pub type ContourSet = BTreeMap<ConfidenceSpec, ContourStatus>;

/// Contour — a closed curve in the plane of two named parameters.
///
/// Fields
/// ------
/// - `level`: the confidence statement the curve belongs to.
/// - `error_def`: threshold the engine traced.
/// - `par_x`, `par_y`: parameter indices of the axes.
/// - `names`: parameter names of the axes, `(x, y)`.
/// - `points`: ordered boundary points; the curve closes from the last
///   point back to the first.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    pub level: ConfidenceSpec,
    pub error_def: ErrorDefinition,
    pub par_x: usize,
    pub par_y: usize,
    pub names: (String, String),
    pub points: Vec<ContourPoint>,
}

impl Contour {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Mean of the points, a cheap center estimate for a closed curve.
    pub fn centroid(&self) -> Option<ContourPoint> {
        if self.points.is_empty() {
            return None;
        }
        let n = self.points.len() as f64;
        let (sx, sy) = self.points.iter().fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Some(ContourPoint::new(sx / n, sy / n))
    }
}

/// ContourFailure — why a level has no curve.
///
/// Fields
/// ------
/// - `level`, `par_x`, `par_y`, `n_points`: the request that failed.
/// - `error`: what the session or engine reported.
#[derive(Debug, Clone, PartialEq)]
pub struct ContourFailure {
    pub level: ConfidenceSpec,
    pub par_x: usize,
    pub par_y: usize,
    pub n_points: usize,
    pub error: OptError,
}

impl std::fmt::Display for ContourFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} contour of parameters ({}, {}) with {} points failed: {}",
            self.level, self.par_x, self.par_y, self.n_points, self.error
        )
    }
}

/// ContourStatus — state of one level in a [`ContourSet`].
#[derive(Debug, Clone, PartialEq)]
pub enum ContourStatus {
    Pending,
    Populated(Contour),
    Failed(ContourFailure),
}

impl ContourStatus {
    pub fn is_populated(&self) -> bool {
        matches!(self, ContourStatus::Populated(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ContourStatus::Failed(_))
    }

    pub fn contour(&self) -> Option<&Contour> {
        match self {
            ContourStatus::Populated(contour) => Some(contour),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&ContourFailure> {
        match self {
            ContourStatus::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contour(points: Vec<ContourPoint>) -> Contour {
        Contour {
            level: ConfidenceSpec::sigma(1).unwrap(),
            error_def: ErrorDefinition::new(2.2977).unwrap(),
            par_x: 0,
            par_y: 1,
            names: ("mu".into(), "sigma".into()),
            points,
        }
    }

    #[test]
    // Purpose
    // -------
    // Status accessors expose exactly one payload.
    //
    // Given
    // -----
    // - A populated, a failed and a pending status.
    //
    // Expect
    // ------
    // - `contour()` only for the populated one, `failure()` only for the
    //   failed one.
    fn status_accessors_match_variant() {
        let populated = ContourStatus::Populated(contour(vec![ContourPoint::new(1.0, 2.0)]));
        let failed = ContourStatus::Failed(ContourFailure {
            level: ConfidenceSpec::sigma(2).unwrap(),
            par_x: 0,
            par_y: 1,
            n_points: 10,
            error: OptError::MinimumNotAvailable,
        });

        assert!(populated.is_populated() && populated.contour().is_some());
        assert!(populated.failure().is_none());
        assert!(failed.is_failed() && failed.failure().is_some());
        assert!(failed.contour().is_none());
        assert!(ContourStatus::Pending.contour().is_none());
        assert!(!ContourStatus::Pending.is_failed());
    }

    #[test]
    // Purpose
    // -------
    // The centroid of a symmetric curve is its center.
    //
    // Given
    // -----
    // - Four points of a diamond around (0, 1).
    //
    // Expect
    // ------
    // - Centroid (0, 1); `None` for an empty curve.
    fn centroid_of_symmetric_curve() {
        let diamond = contour(vec![
            ContourPoint::new(1.0, 1.0),
            ContourPoint::new(0.0, 2.0),
            ContourPoint::new(-1.0, 1.0),
            ContourPoint::new(0.0, 0.0),
        ]);
        assert_eq!(diamond.centroid(), Some(ContourPoint::new(0.0, 1.0)));
        assert_eq!(contour(Vec::new()).centroid(), None);
    }
}
