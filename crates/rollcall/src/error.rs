//! Error types for rollcall.
//!
//! This module defines all error types used throughout the rollcall crate.
//! Most of them describe input the interactive shell rejects; none of them
//! are fatal to a session.

use thiserror::Error;

use crate::contact::RecordId;

/// The main error type for rollcall operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Input Errors ===
    /// A required field was empty after trimming.
    #[error("{field} must not be empty")]
    EmptyField {
        /// Name of the empty field.
        field: &'static str,
    },

    /// No record with the given id exists in the roster.
    #[error("no contact with id {id}")]
    UnknownRecord {
        /// The id that was looked up.
        id: RecordId,
    },

    /// The id does not belong to a recipient of the bulk session.
    #[error("contact {id} is not a recipient of this bulk message")]
    UnknownRecipient {
        /// The id that was looked up.
        id: RecordId,
    },

    /// A bulk message was requested with nothing selected.
    #[error("no contacts selected")]
    EmptySelection,

    /// A bulk session command was issued with no session open.
    #[error("no bulk message in progress")]
    NoBulkSession,

    // === Dispatch Errors ===
    /// The outbound link could not be opened.
    #[error("failed to open {url}: {message}")]
    Dispatch {
        /// The link that was being opened.
        url: String,
        /// Description of what went wrong.
        message: String,
    },

    // === I/O Errors ===
    /// File system or terminal operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for rollcall operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create an empty-field error.
    #[must_use]
    pub fn empty_field(field: &'static str) -> Self {
        Self::EmptyField { field }
    }

    /// Create a dispatch error for the given link.
    #[must_use]
    pub fn dispatch(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Dispatch {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this error was caused by rejected user input.
    ///
    /// Input errors are reported and the session carries on.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyField { .. }
                | Self::UnknownRecord { .. }
                | Self::UnknownRecipient { .. }
                | Self::EmptySelection
                | Self::NoBulkSession
        )
    }

    /// Check if this error came from opening a link.
    #[must_use]
    pub fn is_dispatch_error(&self) -> bool {
        matches!(self, Self::Dispatch { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::EmptySelection;
        assert_eq!(err.to_string(), "no contacts selected");

        let err = Error::empty_field("name");
        assert_eq!(err.to_string(), "name must not be empty");
    }

    #[test]
    fn test_unknown_record_display() {
        let err = Error::UnknownRecord { id: RecordId::new(7) };
        assert_eq!(err.to_string(), "no contact with id 7");
    }

    #[test]
    fn test_unknown_recipient_display() {
        let err = Error::UnknownRecipient { id: RecordId::new(3) };
        assert!(err.to_string().contains("not a recipient"));
    }

    #[test]
    fn test_is_input_error() {
        assert!(Error::EmptySelection.is_input_error());
        assert!(Error::NoBulkSession.is_input_error());
        assert!(Error::empty_field("message").is_input_error());
        assert!(!Error::internal("bug").is_input_error());
        assert!(!Error::dispatch("https://wa.me/1", "boom").is_input_error());
    }

    #[test]
    fn test_dispatch_error_display() {
        let err = Error::dispatch("https://wa.me/123?text=hi", "no opener");
        let msg = err.to_string();
        assert!(msg.contains("https://wa.me/123?text=hi"));
        assert!(msg.contains("no opener"));
        assert!(err.is_dispatch_error());
    }

    #[test]
    fn test_internal_error() {
        let err = Error::internal("something went wrong");
        assert_eq!(err.to_string(), "internal error: something went wrong");
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "poll_interval_ms must be greater than 0".to_string(),
        };
        assert!(err.to_string().contains("poll_interval_ms"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "xdg-open not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("xdg-open not found"));
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }
}
