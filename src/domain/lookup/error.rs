use std::fmt;

use thiserror::Error;

/// Failure reported by a remedy source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkError {
    /// HTTP status, when the server answered
    pub status: Option<u16>,
    pub message: String,
}

impl NetworkError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "HTTP {}: {}", status, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for NetworkError {}

/// Error returned to callers of a cached lookup
#[derive(Debug, Error)]
pub enum FetchError {
    /// The remote lookup failed and no cached answer existed
    #[error("Couldn't fetch results, try again ({cause})")]
    Network {
        #[source]
        cause: NetworkError,
    },

    /// A newer lookup superseded this one
    #[error("Lookup was cancelled")]
    Cancelled,

    #[error("Query is empty")]
    InvalidQuery,
}

impl FetchError {
    pub fn network(cause: NetworkError) -> Self {
        Self::Network { cause }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Network { cause } => cause.status,
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled)
    }
}

impl From<NetworkError> for FetchError {
    fn from(cause: NetworkError) -> Self {
        Self::network(cause)
    }
}
