use thiserror::Error;

#[derive(Debug, Error)]
pub enum WireError {
    #[error("truncated {record} record: stream ended mid-record")]
    Truncated { record: &'static str },

    #[error("malformed {record} record: {reason}")]
    Malformed {
        record: &'static str,
        reason: String,
    },

    #[error("{record} count mismatch: declared {declared}, stream held {actual}")]
    CountMismatch {
        record: &'static str,
        declared: u64,
        actual: u64,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl WireError {
    /// Shorthand for a malformed-record error with a formatted reason.
    pub fn malformed(record: &'static str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            record,
            reason: reason.into(),
        }
    }
}

pub type WireResult<T> = Result<T, WireError>;
