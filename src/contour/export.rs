//! contour::export — persist a contour set as a JSON artifact.
//!
//! Purpose
//! -------
//! Write every populated level of a [`ContourSet`] as one named curve with
//! its display metadata, so plots can be produced outside this crate.
//!
//! Key behaviors
//! -------------
//! - Curves are named `contour_<label>`: `contour_1sigma`, `contour_2sigma`,
//!   `contour_3sigma`, and `contour_p90`-style names for probabilities.
//! - Pending and failed levels are skipped silently; an empty set exports an
//!   artifact with no curves.
//! - [`ContourArtifact::read_json`] loads an artifact back.
//!
//! Conventions
//! -----------
//! - Curves appear in level order (sigma levels first, then probabilities
//!   ascending), matching the `ContourSet` ordering.
//! - Output is pretty-printed JSON.
use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::{
    confidence::ConfidenceSpec,
    contour::{
        errors::{ExportError, ExportResult},
        style::ContourStyle,
        types::{ContourSet, ContourStatus},
    },
    optimization::minimizer::ContourPoint,
};

/// ContourCurve — one exported level.
///
/// Fields
/// ------
/// - `name`: `contour_<label>`.
/// - `level`: human-readable level, e.g. `1sigma` or `90.00% CL`.
/// - `confidence`: confidence probability of the level.
/// - `error_def`: threshold the curve was traced at.
/// - `parameters`: axis names `[x, y]`.
/// - `points`: ordered closed curve.
/// - `line_color`, `line_width`, `fill_color`: display metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContourCurve {
    pub name: String,
    pub level: String,
    pub confidence: f64,
    pub error_def: f64,
    pub parameters: [String; 2],
    pub points: Vec<ContourPoint>,
    pub line_color: String,
    pub line_width: f64,
    pub fill_color: String,
}

/// ContourArtifact — the persisted container of curves.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ContourArtifact {
    pub curves: Vec<ContourCurve>,
}

impl ContourArtifact {
    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    pub fn curve(&self, name: &str) -> Option<&ContourCurve> {
        self.curves.iter().find(|c| c.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.curves.iter().map(|c| c.name.as_str()).collect()
    }

    /// Load an artifact written by [`ContourExporter::write_json`].
    ///
    /// # Errors
    /// - [`ExportError::Io`] when the file cannot be opened or read.
    /// - [`ExportError::Json`] when its content is not an artifact.
    pub fn read_json(path: impl AsRef<Path>) -> ExportResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| io_error(path, &e))?;
        Self::read_json_from(BufReader::new(file))
    }

    pub fn read_json_from(reader: impl Read) -> ExportResult<Self> {
        Ok(serde_json::from_reader(reader)?)
    }
}

/// Name of the exported curve for `level`.
pub fn curve_name(level: &ConfidenceSpec) -> String {
    format!("contour_{}", level.label())
}

/// ContourExporter — turns a [`ContourSet`] into a styled artifact.
#[derive(Debug, Clone, Default)]
pub struct ContourExporter {
    style: ContourStyle,
}

impl ContourExporter {
    pub fn new(style: ContourStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &ContourStyle {
        &self.style
    }

    /// One curve per populated level, in level order.
    pub fn to_artifact(&self, contours: &ContourSet) -> ContourArtifact {
        let mut probability_ordinal = 0;
        let mut curves = Vec::new();
        for (level, status) in contours {
            let ContourStatus::Populated(contour) = status else {
                continue;
            };
            let colors = self.style.colors_for(level, probability_ordinal);
            if matches!(level, ConfidenceSpec::Probability(_)) {
                probability_ordinal += 1;
            }
            curves.push(ContourCurve {
                name: curve_name(level),
                level: level.to_string(),
                confidence: level.confidence(),
                error_def: contour.error_def.value(),
                parameters: [contour.names.0.clone(), contour.names.1.clone()],
                points: contour.points.clone(),
                line_color: colors.line.clone(),
                line_width: self.style.line_width,
                fill_color: colors.fill.clone(),
            });
        }
        ContourArtifact { curves }
    }

    /// write_json — build the artifact and write it to `path`.
    ///
    /// Returns the artifact that was written.
    ///
    /// # Errors
    /// - [`ExportError::Io`] naming `path` when it cannot be created or
    ///   written.
    /// - [`ExportError::Json`] if serialization fails.
    pub fn write_json(
        &self, contours: &ContourSet, path: impl AsRef<Path>,
    ) -> ExportResult<ContourArtifact> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| io_error(path, &e))?;
        let mut writer = BufWriter::new(file);
        let artifact = self.write_json_to(contours, &mut writer)?;
        writer.flush().map_err(|e| io_error(path, &e))?;
        Ok(artifact)
    }

    /// Same as [`write_json`](Self::write_json) into any writer.
    pub fn write_json_to(
        &self, contours: &ContourSet, writer: impl Write,
    ) -> ExportResult<ContourArtifact> {
        let artifact = self.to_artifact(contours);
        serde_json::to_writer_pretty(writer, &artifact)?;
        Ok(artifact)
    }
}

fn io_error(path: &Path, err: &std::io::Error) -> ExportError {
    ExportError::Io { path: path.display().to_string(), text: err.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        confidence::ErrorDefinition,
        contour::{
            style::DEFAULT_LINE_WIDTH,
            types::{Contour, ContourFailure},
        },
        optimization::errors::OptError,
    };
    use tempfile::tempdir;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Naming, ordering and omission of non-populated levels.
    // - Writing to a file and reading the artifact back.
    // - I/O failures surfacing as `ExportError::Io`.
    // -------------------------------------------------------------------------

    fn populated(level: ConfidenceSpec, up: f64) -> ContourStatus {
        ContourStatus::Populated(Contour {
            level,
            error_def: ErrorDefinition::new(up).unwrap(),
            par_x: 0,
            par_y: 1,
            names: ("mu".into(), "sigma".into()),
            points: vec![
                ContourPoint::new(1.0, 0.0),
                ContourPoint::new(0.0, 1.0),
                ContourPoint::new(-1.0, 0.0),
            ],
        })
    }

    fn mixed_set() -> ContourSet {
        let one = ConfidenceSpec::sigma(1).unwrap();
        let two = ConfidenceSpec::sigma(2).unwrap();
        let three = ConfidenceSpec::sigma(3).unwrap();
        let mut set = ContourSet::new();
        set.insert(three, populated(three, 11.6182));
        set.insert(
            two,
            ContourStatus::Failed(ContourFailure {
                level: two,
                par_x: 0,
                par_y: 1,
                n_points: 3,
                error: OptError::MinimumNotAvailable,
            }),
        );
        set.insert(one, populated(one, 2.2977));
        set
    }

    #[test]
    // Purpose
    // -------
    // Failed levels are omitted and the rest keep level order.
    //
    // Given
    // -----
    // - Levels 1 and 3 populated, level 2 failed.
    //
    // Expect
    // ------
    // - Curves `contour_1sigma`, `contour_3sigma` with their own colors.
    fn artifact_skips_failed_levels() {
        let exporter = ContourExporter::default();

        let artifact = exporter.to_artifact(&mixed_set());

        assert_eq!(artifact.names(), vec!["contour_1sigma", "contour_3sigma"]);
        let first = artifact.curve("contour_1sigma").unwrap();
        assert_eq!(first.parameters, ["mu".to_string(), "sigma".to_string()]);
        assert_eq!(first.error_def, 2.2977);
        assert_eq!(first.line_width, DEFAULT_LINE_WIDTH);
        assert_ne!(first.fill_color, artifact.curves[1].fill_color);
    }

    #[test]
    // Purpose
    // -------
    // Probability levels are named by percent.
    //
    // Given
    // -----
    // - A populated p = 0.9 level.
    //
    // Expect
    // ------
    // - One curve `contour_p90` with confidence 0.9.
    fn probability_levels_named_by_percent() {
        let p90 = ConfidenceSpec::probability(0.9).unwrap();
        let mut set = ContourSet::new();
        set.insert(p90, populated(p90, 4.6052));

        let artifact = ContourExporter::default().to_artifact(&set);

        assert_eq!(artifact.names(), vec!["contour_p90"]);
        assert_eq!(artifact.curves[0].confidence, 0.9);
    }

    #[test]
    // Purpose
    // -------
    // A written artifact reads back unchanged.
    //
    // Given
    // -----
    // - The mixed set written to a temporary file.
    //
    // Expect
    // ------
    // - `read_json` returns the artifact `write_json` reported.
    fn write_then_read_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("contours.json");
        let exporter = ContourExporter::default();

        let written = exporter.write_json(&mixed_set(), &path).unwrap();
        let read = ContourArtifact::read_json(&path).unwrap();

        assert_eq!(read, written);
        assert_eq!(read.len(), 2);
    }

    #[test]
    // Purpose
    // -------
    // Coordinates survive the JSON text form bit for bit.
    //
    // Given
    // -----
    // - A 1sigma curve with y = 0.9888410191281021 (17 significant digits),
    //   written into a byte buffer.
    //
    // Expect
    // ------
    // - The artifact read back equals the one written, down to that `y`.
    fn full_precision_coordinates_read_back_exactly() {
        let one = ConfidenceSpec::sigma(1).unwrap();
        let mut set = ContourSet::new();
        set.insert(
            one,
            ContourStatus::Populated(Contour {
                level: one,
                error_def: ErrorDefinition::new(2.2977).unwrap(),
                par_x: 0,
                par_y: 1,
                names: ("mu".into(), "sigma".into()),
                points: vec![ContourPoint::new(-0.031_337_024_601_113_93, 0.988_841_019_128_102_1)],
            }),
        );
        let mut buf = Vec::new();

        let written = ContourExporter::default().write_json_to(&set, &mut buf).unwrap();
        let read = ContourArtifact::read_json_from(buf.as_slice()).unwrap();

        assert_eq!(read.curves[0].points[0].y.to_bits(), 0.988_841_019_128_102_1_f64.to_bits());
        assert_eq!(read, written);
    }

    #[test]
    // Purpose
    // -------
    // Distinct probability levels never share a curve name.
    //
    // Given
    // -----
    // - Populated levels p = 0.9, p = 0.900001, p = 0.9999995 and
    //   p = 0.9999999.
    //
    // Expect
    // ------
    // - Four curves, each found by its own name.
    fn nearby_probabilities_get_distinct_names() {
        let mut set = ContourSet::new();
        for p in [0.9, 0.900_001, 0.999_999_5, 0.999_999_9] {
            let level = ConfidenceSpec::probability(p).unwrap();
            set.insert(level, populated(level, 4.6052));
        }

        let artifact = ContourExporter::default().to_artifact(&set);

        assert_eq!(
            artifact.names(),
            vec!["contour_p90", "contour_p90_0001", "contour_p99_99995", "contour_p99_99999"]
        );
        for curve in &artifact.curves {
            assert_eq!(artifact.curve(&curve.name).unwrap().confidence, curve.confidence);
        }
    }

    #[test]
    // Purpose
    // -------
    // An empty set is a valid, empty artifact.
    //
    // Given
    // -----
    // - No contours, written into a byte buffer.
    //
    // Expect
    // ------
    // - JSON with an empty `curves` array.
    fn empty_set_exports_empty_artifact() {
        let mut buf = Vec::new();

        let artifact =
            ContourExporter::default().write_json_to(&ContourSet::new(), &mut buf).unwrap();

        assert!(artifact.is_empty());
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["curves"], serde_json::json!([]));
    }

    #[test]
    // Purpose
    // -------
    // Unwritable and missing paths surface as I/O errors naming the path.
    //
    // Given
    // -----
    // - A path inside a directory that does not exist.
    //
    // Expect
    // ------
    // - `ExportError::Io` for both write and read.
    fn missing_directory_is_io_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("contours.json");

        let write = ContourExporter::default().write_json(&mixed_set(), &path);
        let read = ContourArtifact::read_json(&path);

        assert!(matches!(
            write,
            Err(ExportError::Io { ref path, .. }) if path.ends_with("contours.json")
        ));
        assert!(matches!(read, Err(ExportError::Io { .. })));
    }
}
