//! contour::style — display metadata attached to exported curves.
use serde::{Deserialize, Serialize};

use crate::confidence::ConfidenceSpec;

pub const DEFAULT_LINE_WIDTH: f64 = 2.0;

/// Line and fill color of one band, as `#rrggbb` strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelColors {
    pub line: String,
    pub fill: String,
}

impl LevelColors {
    pub fn new(line: impl Into<String>, fill: impl Into<String>) -> Self {
        Self { line: line.into(), fill: fill.into() }
    }
}

/// ContourStyle — colors per sigma band, a palette for probability levels
/// and one line width for every curve.
///
/// Probability levels take palette entries in level order, wrapping around;
/// an empty palette falls back to the 1-sigma colors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContourStyle {
    pub sigma: [LevelColors; 3],
    pub probability_palette: Vec<LevelColors>,
    pub line_width: f64,
}

impl ContourStyle {
    /// Colors of `level`; `ordinal` is the position of a probability level
    /// among the probability levels being exported.
    pub fn colors_for(&self, level: &ConfidenceSpec, ordinal: usize) -> &LevelColors {
        match level {
            ConfidenceSpec::Sigma(sigma) => &self.sigma[usize::from(sigma.as_u8()) - 1],
            ConfidenceSpec::Probability(_) if self.probability_palette.is_empty() => &self.sigma[0],
            ConfidenceSpec::Probability(_) => {
                &self.probability_palette[ordinal % self.probability_palette.len()]
            }
        }
    }
}

impl Default for ContourStyle {
    fn default() -> Self {
        Self {
            sigma: [
                LevelColors::new("#1b3f8b", "#9ab3e6"),
                LevelColors::new("#1f7a3a", "#a6dcb4"),
                LevelColors::new("#b23a1e", "#f2b8a6"),
            ],
            probability_palette: vec![
                LevelColors::new("#6a3d9a", "#cab2d6"),
                LevelColors::new("#b15928", "#ffdd99"),
                LevelColors::new("#33707a", "#a6d8e0"),
            ],
            line_width: DEFAULT_LINE_WIDTH,
        }
    }
}
