use chrono::NaiveDate;
use thiserror::Error;

use crate::FetchKind;

/// Recoverable error state shown next to, never instead of, the last good results.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("Could not load contributors: {0}")]
    Contributors(String),

    #[error("Could not load commits of {author}: {reason}")]
    Commits { author: String, reason: String },

    #[error("Start date {start} is after end date {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },
}

impl FilterError {
    /// Fetch whose next success resolves this error, if any.
    pub fn kind(&self) -> Option<FetchKind> {
        match self {
            FilterError::Contributors(_) => Some(FetchKind::Contributors),
            FilterError::Commits { .. } => Some(FetchKind::Commits),
            FilterError::InvertedRange { .. } => None,
        }
    }
}
