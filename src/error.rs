use thiserror::Error;

/// Why a single source produced no records. Reported per source; never
/// aborts a batch.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The document could not be fetched or read.
    #[error("source unavailable: {location}: {reason}")]
    Unavailable { location: String, reason: String },

    /// An invariant of the extraction pipeline was broken.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SourceError {
    pub fn unavailable(location: &str, reason: impl ToString) -> Self {
        SourceError::Unavailable {
            location: location.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Short machine-readable tag for the run summary.
    pub fn kind(&self) -> &'static str {
        match self {
            SourceError::Unavailable { .. } => "source_unavailable",
            SourceError::Internal(_) => "internal",
        }
    }
}
