//! contour — confidence contours as a managed, exportable batch.
//!
//! Purpose
//! -------
//! Sit between a fitted [`MinimizerSession`](crate::session::MinimizerSession)
//! and the outside world: request contours per confidence level, remember
//! which levels succeeded, and export the successful ones with display
//! metadata.
//!
//! Key behaviors
//! -------------
//! - [`batch`]: [`ContourBatch`] resolves levels with the confidence mapper,
//!   calls the session and records `Populated` / `Failed` per level.
//! - [`types`]: [`Contour`], [`ContourStatus`], [`ContourFailure`] and the
//!   level-keyed [`ContourSet`].
//! - [`style`] and [`export`]: colors, line width and the JSON artifact.
//!
//! Invariants & assumptions
//! ------------------------
//! - A partial batch failure is data, not an error: it shows up as `Failed`
//!   entries and export proceeds over the populated subset.
//!
//! Testing notes
//! -------------
//! - Batch tests use scripted engines; export tests use temporary files.

pub mod batch;
pub mod errors;
pub mod export;
pub mod style;
pub mod types;

pub use self::batch::{BatchSummary, ContourBatch};
pub use self::errors::{ExportError, ExportResult};
pub use self::export::{ContourArtifact, ContourCurve, ContourExporter, curve_name};
pub use self::style::{ContourStyle, LevelColors};
pub use self::types::{Contour, ContourFailure, ContourSet, ContourStatus};
