use crate::swing::SwingKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// All errors generated in `jackbot-fib`.
///
/// Only insufficient input data aborts an analysis. Numeric faults inside individual
/// calculations degrade to a [`Fallback`](crate::estimate::Fallback) instead.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Error)]
pub enum AnalysisError {
    #[error("insufficient data: {0}")]
    InsufficientData(#[from] InsufficientData),

    #[error("invalid AnalysisConfig: {0}")]
    InvalidConfig(&'static str),
}

/// Reasons an analysis could not be performed on the provided bar series.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Deserialize, Serialize, Error)]
pub enum InsufficientData {
    #[error("swing detection with window {window} requires at least {required} bars, found {actual}")]
    Bars {
        window: usize,
        required: usize,
        actual: usize,
    },

    #[error("major swing selection requires at least 2 swing points, found {actual}")]
    SwingPoints { actual: usize },

    #[error("no recent swing {0} available for major swing selection")]
    MissingSwingKind(SwingKind),
}

impl AnalysisError {
    /// Determine if this error was caused by the input series being too short or too flat.
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, Self::InsufficientData(_))
    }
}
