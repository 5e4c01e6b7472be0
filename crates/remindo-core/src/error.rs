// SPDX-FileCopyrightText: 2026 Remindo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for Remindo.
//!
//! [`StorageError`] is the closed taxonomy every entity gateway reports in.
//! [`RemindoError`] is the workspace-wide error used by the engine, the
//! reminder job, and the transport.

use thiserror::Error;

/// Outcome of a failed backend operation.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The requested entity does not exist in the backend.
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    /// The backend rejected the request body, or answered with a body that
    /// could not be decoded.
    #[error("validation failed: {detail}")]
    Validation { detail: String },

    /// A create call conflicted with an existing unique entity.
    #[error("{entity} already exists")]
    Duplicate { entity: &'static str },

    /// Any status the gateway has no mapping for.
    #[error("unexpected response status {status}: {detail}")]
    UnexpectedResponse { status: u16, detail: String },

    /// The credential exchange itself was rejected.
    #[error("authentication failed with status {status}: {detail}")]
    Auth { status: u16, detail: String },

    /// Network-level failure (connect, timeout, broken body stream).
    #[error("transport error: {source}")]
    Transport {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl StorageError {
    /// Whether a conversation flow is expected to handle this error itself.
    ///
    /// Recoverable errors turn into the generic apology at the flow level.
    /// Everything else is a fault that travels up to the dispatch safety net.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::Validation { .. } | Self::Duplicate { .. }
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Shorthand for a [`StorageError::Validation`] with the given detail.
    pub fn validation(detail: impl Into<String>) -> Self {
        Self::Validation {
            detail: detail.into(),
        }
    }
}

/// The primary error type used across Remindo components.
#[derive(Debug, Error)]
pub enum RemindoError {
    /// Configuration errors (invalid TOML, missing required values).
    #[error("configuration error: {0}")]
    Config(String),

    /// A backend gateway call failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Chat transport errors (send or delete rejected by the platform).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RemindoError {
    /// Whether the error is a recoverable storage outcome.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Storage(e) => e.is_recoverable(),
            _ => false,
        }
    }
}

/// Treats "not found" on list queries as an empty collection.
///
/// Listing the children of an entity that has none is a normal outcome, and
/// the backend reports it with a 404.
pub trait NotFoundExt<T> {
    fn or_empty(self) -> Result<Vec<T>, StorageError>;
}

impl<T> NotFoundExt<T> for Result<Vec<T>, StorageError> {
    fn or_empty(self) -> Result<Vec<T>, StorageError> {
        match self {
            Err(StorageError::NotFound { .. }) => Ok(Vec::new()),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recoverable_kinds() {
        assert!(StorageError::NotFound { entity: "theme" }.is_recoverable());
        assert!(StorageError::validation("bad").is_recoverable());
        assert!(StorageError::Duplicate { entity: "user" }.is_recoverable());
        assert!(
            !StorageError::UnexpectedResponse {
                status: 500,
                detail: String::new()
            }
            .is_recoverable()
        );
        assert!(
            !StorageError::Auth {
                status: 400,
                detail: String::new()
            }
            .is_recoverable()
        );
        let transport = StorageError::Transport {
            source: Box::new(std::io::Error::other("reset")),
        };
        assert!(!transport.is_recoverable());
    }

    #[test]
    fn remindo_error_wraps_storage() {
        let err: RemindoError = StorageError::NotFound { entity: "note" }.into();
        assert!(err.is_recoverable());
        assert_eq!(err.to_string(), "storage error: note not found");

        let err = RemindoError::Internal("boom".into());
        assert!(!err.is_recoverable());
    }

    #[test]
    fn or_empty_maps_only_not_found() {
        let empty: Result<Vec<u8>, StorageError> = Err(StorageError::NotFound { entity: "note" });
        assert_eq!(empty.or_empty().unwrap(), Vec::<u8>::new());

        let full: Result<Vec<u8>, StorageError> = Ok(vec![1, 2]);
        assert_eq!(full.or_empty().unwrap(), vec![1, 2]);

        let bad: Result<Vec<u8>, StorageError> = Err(StorageError::validation("x"));
        assert!(matches!(bad.or_empty(), Err(StorageError::Validation { .. })));
    }
}
