use serde::Serialize;
use thiserror::Error;

use crate::validate::ValidationError;

/// Fault class of a fatal import error. Maps onto a transport status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StatusClass {
    /// The submitted data is at fault.
    ClientFault,
    /// Something on our side (or an upstream we depend on) failed.
    ServerFault,
}

impl StatusClass {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::ClientFault => 400,
            Self::ServerFault => 500,
        }
    }
}

/// Aborts an entire import attempt.
///
/// The message is already phrased for the submitter (it contains the
/// offending field path where one exists) and is surfaced unmodified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FatalImportError {
    pub status: StatusClass,
    pub message: String,
}

impl FatalImportError {
    pub fn new(status: StatusClass, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn client(message: impl Into<String>) -> Self {
        Self::new(StatusClass::ClientFault, message)
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::new(StatusClass::ServerFault, message)
    }

    /// Wrap a validation failure as `"<prefix>: <path> | <expected> | Received ..."`.
    pub fn from_validation(err: &ValidationError, prefix: &str) -> Self {
        Self::client(crate::validate::format_validation_error(err, prefix))
    }

    pub fn status_code(&self) -> u16 {
        self.status.status_code()
    }
}

pub type ImportResult<T> = std::result::Result<T, FatalImportError>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Import(#[from] FatalImportError),

    #[error("Config parse error: {0}")]
    ConfigParseError(String),

    #[error("Invalid environment: {0}")]
    InvalidEnvironment(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP {0} error")]
    HttpStatus(u16),

    #[error("{0}")]
    Http(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(feature = "http")]
impl From<ureq::Error> for Error {
    fn from(e: ureq::Error) -> Self {
        match e {
            ureq::Error::StatusCode(code) => Error::HttpStatus(code),
            ureq::Error::Json(e) => Error::Json(e),
            ureq::Error::Timeout(_) => Error::Http(format!("Request timed out: {}", e)),
            ureq::Error::Io(_) => Error::Http(format!("Connection failed: {}", e)),
            _ => Error::Http(format!("HTTP error: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(FatalImportError::client("x").status_code(), 400);
        assert_eq!(FatalImportError::server("x").status_code(), 500);
    }

    #[test]
    fn test_display_is_message() {
        let err = FatalImportError::client("Invalid BATCH-MANUAL (Not an object, recieved boolean.)");
        assert_eq!(
            err.to_string(),
            "Invalid BATCH-MANUAL (Not an object, recieved boolean.)"
        );
    }

    #[test]
    fn test_wraps_into_crate_error() {
        let err: Error = FatalImportError::server("upstream down").into();
        assert_eq!(err.to_string(), "upstream down");
    }
}
