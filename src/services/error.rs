//! Error types for the aggregation engine.
//!
//! The taxonomy is deliberately small: filtering and grouping errors abort
//! the whole requested computation so charts are never rendered over
//! silently-dropped data, and anything structurally wrong with the input is
//! rejected at the decode boundary before it reaches the engine.

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    /// Malformed or inverted time bounds. Surfaced immediately; the window
    /// is never coerced into an empty filter.
    #[error("Invalid time window: {message}")]
    InvalidWindow { message: String },

    /// A KPI or aggregate was requested over zero matching records. The
    /// caller decides the user-facing message ("no data in range") instead
    /// of rendering a misleading zero.
    #[error("Empty dataset: {context}")]
    EmptyDataset { context: String },

    /// A record failed basic shape/type assumptions (unparseable date,
    /// non-finite number). Raised only at the decode boundary.
    #[error("Malformed record: {message}")]
    MalformedRecord { message: String },
}

impl EngineError {
    pub fn invalid_window(message: impl Into<String>) -> Self {
        EngineError::InvalidWindow {
            message: message.into(),
        }
    }

    pub fn empty_dataset(context: impl Into<String>) -> Self {
        EngineError::EmptyDataset {
            context: context.into(),
        }
    }

    pub fn malformed_record(message: impl Into<String>) -> Self {
        EngineError::MalformedRecord {
            message: message.into(),
        }
    }

    /// True for the degenerate no-matching-records case, which boundaries
    /// typically map to a "no data" display rather than an error banner.
    pub fn is_empty_dataset(&self) -> bool {
        matches!(self, EngineError::EmptyDataset { .. })
    }
}
