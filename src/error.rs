// Error types for the interval editing core

use thiserror::Error;

use crate::models::interval::IntervalId;

/// Why an editing operation was rejected. State is left unchanged in every case.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditorError {
    #[error("No interval with id {0}")]
    UnknownInterval(IntervalId),

    #[error("An interval with id {0} already exists")]
    DuplicateInterval(IntervalId),

    #[error("Invalid grid settings: {0}")]
    InvalidGridSettings(String),

    #[error("Invalid interval: {0}")]
    InvalidInterval(String),

    #[error("Invalid editor settings: {0}")]
    InvalidSettings(String),

    #[error("The interval would overlap an existing interval")]
    Overlap,

    #[error("Scale factor `{0}` must be a positive finite number")]
    InvalidScaleFactor(f64),

    #[error("Viewport bounds are inverted ({min} > {max})")]
    InvalidViewport { min: i64, max: i64 },

    #[error("Nothing is selected")]
    EmptySelection,

    #[error("The clipboard is empty")]
    EmptyClipboard,
}

pub type EditorResult<T> = Result<T, EditorError>;
