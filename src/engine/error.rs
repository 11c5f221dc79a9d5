//! Engine error taxonomy

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Malformed scope descriptor or pagination
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The scope yields no records where at least one is expected
    #[error("No attendance records for {scope}")]
    NotFound { scope: String },

    /// The attendance window singleton is absent
    #[error("Attendance window is not configured (while processing {scope})")]
    ConfigurationMissing { scope: String },

    /// The fork-join batch ran past its budget
    #[error("Aggregation for {scope} exceeded {secs}s")]
    Timeout { scope: String, secs: u64 },

    /// An aggregation pass panicked or was cancelled
    #[error("Aggregation worker failed for {scope}: {reason}")]
    Worker { scope: String, reason: String },
}

pub type EngineResult<T> = Result<T, EngineError>;
