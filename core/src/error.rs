use std::fmt;
use std::fmt::Write;
use thiserror::Error;

/// The error type for all SDK operations.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<anyhow::Error>,
}

/// The kind of error that occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The key-issuance call failed or returned an unexpected shape.
    CredentialIssuance,

    /// Credentials exist but are invalid/malformed.
    CredentialInvalid,

    /// Credentials are expired.
    CredentialExpired,

    /// A request field value could not be canonicalized for signing.
    Encoding,

    /// Request cannot be built or dispatched (missing fields, bad uri, etc.).
    RequestInvalid,

    /// Configuration error (missing fields, invalid values).
    ConfigInvalid,

    /// The platform answered with a non-zero business code.
    Api,

    /// Unexpected errors (network, I/O, service errors, etc.).
    Unexpected,
}

impl Error {
    /// Create a new error with the given kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error.
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Append a context line to the error message.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        let _ = write!(self.message, ", {}", context.into());
        self
    }

    /// Get the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Check if this is a credential error.
    pub fn is_credential_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::CredentialIssuance
                | ErrorKind::CredentialInvalid
                | ErrorKind::CredentialExpired
        )
    }
}

// Convenience constructors
impl Error {
    /// Create a credential issuance error.
    pub fn credential_issuance(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CredentialIssuance, message)
    }

    /// Create a credential invalid error.
    pub fn credential_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CredentialInvalid, message)
    }

    /// Create a credential expired error.
    pub fn credential_expired(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CredentialExpired, message)
    }

    /// Create an encoding error.
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Encoding, message)
    }

    /// Create a request invalid error.
    pub fn request_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RequestInvalid, message)
    }

    /// Create a config invalid error.
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    /// Create an api error.
    pub fn api(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Api, message)
    }

    /// Create an unexpected error.
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::CredentialIssuance => write!(f, "credential issuance failed"),
            ErrorKind::CredentialInvalid => write!(f, "invalid credentials"),
            ErrorKind::CredentialExpired => write!(f, "expired credentials"),
            ErrorKind::Encoding => write!(f, "unencodable value"),
            ErrorKind::RequestInvalid => write!(f, "invalid request"),
            ErrorKind::ConfigInvalid => write!(f, "invalid configuration"),
            ErrorKind::Api => write!(f, "api error"),
            ErrorKind::Unexpected => write!(f, "unexpected error"),
        }
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, Error>;

// Common From implementations
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(err)
    }
}

impl From<http::Error> for Error {
    fn from(err: http::Error) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::uri::InvalidUri> for Error {
    fn from(err: http::uri::InvalidUri) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_error_grouping() {
        assert!(Error::credential_issuance("boom").is_credential_error());
        assert!(Error::credential_invalid("boom").is_credential_error());
        assert!(!Error::api("code 1").is_credential_error());
        assert!(!Error::encoding("list value").is_credential_error());
    }

    #[test]
    fn test_display_includes_context() {
        let err = Error::credential_issuance("createkey failed")
            .with_context("code: 500")
            .with_context("partner_id: 7201963");

        let s = err.to_string();
        assert!(s.contains("createkey failed"));
        assert!(s.contains("code: 500"));
        assert!(s.contains("partner_id: 7201963"));
    }
}
