//! Error types for layout operations
//!
//! Provides unified error handling for store mutations, calibration, gesture
//! payloads, and snapshot restore.

use thiserror::Error;

/// Errors that can occur while editing a layout
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// No placed equipment carries this id
    #[error("Unknown equipment id: {0}")]
    UnknownEquipment(String),

    /// An id was used twice in a restored snapshot
    #[error("Duplicate equipment id: {0}")]
    DuplicateId(String),

    /// A computed value was NaN or infinite
    #[error("Non-finite value for {field}")]
    NonFinite { field: &'static str },

    /// A dimension was zero or negative
    #[error("Invalid dimension for {field}: {value}")]
    InvalidDimension { field: &'static str, value: f64 },

    /// Calibration cannot proceed in its current phase or with this input
    #[error("Invalid calibration: {0}")]
    InvalidCalibration(String),

    /// Cross-boundary drag data could not be parsed
    #[error("Malformed drag payload: {0}")]
    MalformedPayload(String),

    /// Snapshot JSON could not be parsed
    #[error("JSON parse error: {0}")]
    Json(String),

    /// Snapshot was written by an incompatible version
    #[error("Unsupported snapshot version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
}

/// Result type alias for layout operations
pub type LayoutResult<T> = Result<T, LayoutError>;

impl From<serde_json::Error> for LayoutError {
    fn from(e: serde_json::Error) -> Self {
        LayoutError::Json(e.to_string())
    }
}

/// Reject non-finite values, naming the field in the error.
#[inline]
pub fn ensure_finite(value: f64, field: &'static str) -> LayoutResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(LayoutError::NonFinite { field })
    }
}

/// Reject non-finite, zero, or negative dimensions.
#[inline]
pub fn ensure_positive(value: f64, field: &'static str) -> LayoutResult<f64> {
    let value = ensure_finite(value, field)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(LayoutError::InvalidDimension { field, value })
    }
}
