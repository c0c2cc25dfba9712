//! contour::errors — error type for contour export.
//!
//! Exporting never fails because of missing or failed levels; only the
//! filesystem and the JSON encoder can fail, and both are wrapped here.

pub type ExportResult<T> = Result<T, ExportError>;

/// ExportError — failures while writing or reading a contour artifact.
///
/// Variants
/// --------
/// - `Io { path, text }`
///   The artifact file could not be created, written or read. `path` is
///   empty when writing to a caller-supplied writer.
/// - `Json(text)`
///   Serialization or deserialization of the artifact failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    Io { path: String, text: String },
    Json(String),
}

impl std::error::Error for ExportError {}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Io { path, text } if path.is_empty() => write!(f, "I/O error: {text}"),
            ExportError::Io { path, text } => write!(f, "I/O error on '{path}': {text}"),
            ExportError::Json(text) => write!(f, "JSON error: {text}"),
        }
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            ExportError::Io { path: String::new(), text: err.to_string() }
        } else {
            ExportError::Json(err.to_string())
        }
    }
}
