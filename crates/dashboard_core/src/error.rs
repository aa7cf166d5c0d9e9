use std::fmt;

use thiserror::Error;

/// A persisted or bookmarked descriptor could not be turned back into a query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("invalid value '{value}' for '{key}': expected a non-negative integer")]
    InvalidNumber { key: &'static str, value: String },
    #[error("invalid sort direction '{0}': expected 'asc' or 'desc'")]
    InvalidDirection(String),
    #[error("'{0}' appears more than once")]
    DuplicateKey(&'static str),
    #[error("malformed locator: {0}")]
    MalformedLocator(String),
}

/// A fetch ended without a usable page.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("http {status}: {message}")]
    Http { status: u16, message: String },
    #[error("decode error: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidQuery,
    Network,
    Http(u16),
    Decode,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::InvalidQuery => f.write_str("invalid query"),
            ErrorKind::Network => f.write_str("network"),
            ErrorKind::Http(status) => write!(f, "http {status}"),
            ErrorKind::Decode => f.write_str("decode"),
        }
    }
}

/// Error surfaced to the rendering layer through `CollectionMeta::error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub message: String,
}

impl ErrorInfo {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self.kind {
            ErrorKind::Http(status) => Some(status),
            _ => None,
        }
    }

    pub fn requires_reauth(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl From<FetchError> for ErrorInfo {
    fn from(value: FetchError) -> Self {
        match value {
            FetchError::Network(message) => ErrorInfo::new(ErrorKind::Network, message),
            FetchError::Http { status, message } => {
                ErrorInfo::new(ErrorKind::Http(status), message)
            }
            FetchError::Decode(message) => ErrorInfo::new(ErrorKind::Decode, message),
        }
    }
}

impl From<QueryError> for ErrorInfo {
    fn from(value: QueryError) -> Self {
        ErrorInfo::new(ErrorKind::InvalidQuery, value.to_string())
    }
}
