//! Error types for docshelf.

use thiserror::Error;

/// Application result type.
pub type AppResult<T> = Result<T, AppError>;

/// Application error type.
///
/// Every failure a docshelf operation can produce is classified here once,
/// at the operation boundary. Callers render [`AppError::user_message`]
/// instead of letting failures propagate as panics or unhandled rejections.
#[derive(Debug, Error)]
pub enum AppError {
    /// Network-level failure: server unreachable, connection reset, timeout.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code of the response.
        status: u16,
        /// Error message extracted from the response body.
        message: String,
    },

    /// Input rejected before any request was issued.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The referenced document no longer exists on the server.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Delete was rejected because the target folder still has documents.
    #[error("Folder is not empty")]
    FolderNotEmpty,

    /// JSON encoding/decoding failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration could not be loaded or parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unexpected internal failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Classify a non-success HTTP status into an error variant.
    ///
    /// `message` is the text extracted from the response body (or the bare
    /// status line when the body carried none).
    #[must_use]
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            404 => Self::NotFound(message),
            _ => Self::Api { status, message },
        }
    }

    /// Returns whether this is a network-level failure.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns whether this is the non-empty-folder delete conflict.
    ///
    /// Callers use this to render the distinct "folder not empty" message
    /// instead of a generic failure notice.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::FolderNotEmpty)
    }

    /// The text a user-facing surface should render for this error.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(_) => "The document server could not be reached".to_string(),
            Self::FolderNotEmpty => {
                "Cannot delete a folder with documents inside; remove its contents first"
                    .to_string()
            }
            Self::NotFound(what) => format!("Not found: {what}"),
            Self::Validation(msg) => msg.clone(),
            Self::Api { message, .. } => message.clone(),
            Self::Serialization(_) | Self::Config(_) | Self::Internal(_) => self.to_string(),
        }
    }
}

// === From implementations ===

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Serialization(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_classifies_not_found() {
        let err = AppError::from_status(404, "Document not found".to_string());
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_from_status_keeps_other_statuses_generic() {
        let err = AppError::from_status(500, "boom".to_string());
        match err {
            AppError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_folder_not_empty_is_conflict() {
        assert!(AppError::FolderNotEmpty.is_conflict());
        assert!(!AppError::Transport("down".to_string()).is_conflict());
    }

    #[test]
    fn test_user_message_is_distinct_for_conflict() {
        let conflict = AppError::FolderNotEmpty.user_message();
        let generic = AppError::Api {
            status: 500,
            message: "Internal Server Error".to_string(),
        }
        .user_message();
        assert_ne!(conflict, generic);
        assert!(conflict.contains("folder"));
    }

    #[test]
    fn test_serde_json_error_converts_to_serialization() {
        let json_err = serde_json::from_str::<i64>("not a number").unwrap_err();
        let err: AppError = json_err.into();
        assert!(matches!(err, AppError::Serialization(_)));
    }
}
