//! Error types for the library layer.

use std::fmt;

use crate::normalize::DuplicateRow;
use crate::validation::ValidationError;

/// Errors produced by the library layer, wrapping upstream API errors
/// and adding validation, reshape and pagination failures.
#[derive(Debug)]
pub enum CalcbenchError {
    /// An error from the underlying API client.
    Api(calcbench_api::Error),
    /// Caller arguments were rejected before any request was sent.
    InvalidQuery(ValidationError),
    /// JSON serialization or deserialization failed.
    Serialization(serde_json::Error),
    /// Pivoting found rows sharing a key with no revision to pick between them.
    DuplicateKeys(Vec<DuplicateRow>),
    /// Fetching a page of a paginated endpoint failed. Pages count from 1.
    ///
    /// `source` is the transport error exactly as the transport raised it,
    /// or [`calcbench_api::Error::Parse`] when the page body did not decode.
    /// The page index is the only context added.
    Pagination {
        page: usize,
        source: calcbench_api::Error,
    },
    /// The named environment variable holding credentials is unset.
    MissingCredentials(&'static str),
}

impl fmt::Display for CalcbenchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api(e) => write!(f, "API error: {}", e),
            Self::InvalidQuery(e) => write!(f, "Invalid query: {}", e),
            Self::Serialization(e) => write!(f, "Serialization error: {}", e),
            Self::DuplicateKeys(rows) => {
                write!(f, "Duplicate pivot keys in {} rows", rows.len())?;
                for row in rows.iter().take(5) {
                    write!(f, "; {}", row)?;
                }
                if rows.len() > 5 {
                    write!(f, "; ...")?;
                }
                Ok(())
            }
            Self::Pagination { page, source } => {
                write!(f, "Failed to fetch page {}: {}", page, source)
            }
            Self::MissingCredentials(var) => {
                write!(f, "Missing credentials: {} is not set", var)
            }
        }
    }
}

impl CalcbenchError {
    /// The transport's own error, whether it surfaced directly or while
    /// fetching a page.
    pub fn transport_error(&self) -> Option<&calcbench_api::Error> {
        match self {
            Self::Api(e) | Self::Pagination { source: e, .. } => Some(e),
            _ => None,
        }
    }
}

impl std::error::Error for CalcbenchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(e) => Some(e),
            Self::InvalidQuery(e) => Some(e),
            Self::Serialization(e) => Some(e),
            Self::Pagination { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<calcbench_api::Error> for CalcbenchError {
    fn from(e: calcbench_api::Error) -> Self {
        Self::Api(e)
    }
}

impl From<ValidationError> for CalcbenchError {
    fn from(e: ValidationError) -> Self {
        Self::InvalidQuery(e)
    }
}

impl From<serde_json::Error> for CalcbenchError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e)
    }
}
