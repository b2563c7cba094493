use thiserror::Error;

pub type Result<T, E = DepositError> = std::result::Result<T, E>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DepositError {
    #[error("malformed hex string '{0}'")]
    MalformedHex(String),

    #[error("invalid execution address '{0}', expected 0x followed by 40 hex characters")]
    InvalidAddress(String),

    #[error("withdrawal scheme {0} requires an execution address")]
    MissingAddress(u8),

    #[error("unsupported withdrawal scheme {0}")]
    UnsupportedScheme(u8),

    #[error("invalid {field} length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("validator index range {start} + {count} overflows u32")]
    IndexOverflow { start: u32, count: u32 },

    #[error("unsupported network '{0}'")]
    UnsupportedNetwork(String),

    #[error("{context} failed: {reason}")]
    CollaboratorFailure {
        context: &'static str,
        reason: String,
    },
}

impl DepositError {
    /// Wraps a failure reported by one of the external crates we delegate to
    pub fn collaborator<E: std::fmt::Debug>(context: &'static str, err: E) -> Self {
        DepositError::CollaboratorFailure {
            context,
            reason: format!("{:?}", err),
        }
    }
}
