//! Error types for obatch.
//!
//! Uses `thiserror` for structured error types that map to exit codes.
//!
//! ## Error Taxonomy
//!
//! Errors fall into five categories:
//! - **Configuration**: missing credentials, bad config values, bad flags
//! - **Network**: connection failures, timeouts
//! - **Remote**: the batch API answered but with an error or garbage
//! - **Job**: a record/job is missing, not ready, or inconsistent
//! - **Internal**: I/O, serialization, or unclassified bugs
//!
//! Propagation policy: remote failures during bulk reconciliation are
//! downgraded to warnings so already-known local data still displays;
//! everything else during a single-record operation is the operation's
//! outcome.

use thiserror::Error;

use crate::core::batch::BatchStatus;

// =============================================================================
// Error Categories
// =============================================================================

/// High-level error categories for classification and routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Configuration issues (missing API key, invalid values, bad flags).
    Configuration,
    /// Network issues (timeout, connection refused, DNS).
    Network,
    /// Remote API issues (HTTP errors, unparsable responses).
    Remote,
    /// Job lifecycle issues (not found, not ready, inconsistent output).
    Job,
    /// Internal errors (I/O, serialization, bugs).
    Internal,
}

impl ErrorCategory {
    /// Returns a human-readable description of the category.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Configuration => "Configuration error",
            Self::Network => "Network error",
            Self::Remote => "Remote API error",
            Self::Job => "Job error",
            Self::Internal => "Internal error",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

// =============================================================================
// Exit Codes
// =============================================================================

/// Process exit codes for scripted callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// Unexpected failure
    GeneralError = 1,
    /// No record matches the given key
    NotFound = 2,
    /// Job exists but has not completed yet
    NotReady = 3,
    /// Request timeout
    Timeout = 4,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

/// Main error type for obatch operations.
#[derive(Error, Debug)]
pub enum ObatchError {
    // ==========================================================================
    // Configuration errors
    // ==========================================================================
    /// API key environment variable is not set.
    #[error("OPENAI_API_KEY environment variable not set")]
    MissingApiKey,

    /// Generic configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    // ==========================================================================
    // Network errors
    // ==========================================================================
    /// Request timed out.
    #[error("request timeout after {0} seconds")]
    Timeout(u64),

    /// The remote API could not be reached.
    #[error("batch API unavailable: {message}")]
    RemoteUnavailable {
        message: String,
    },

    // ==========================================================================
    // Remote API errors
    // ==========================================================================
    /// The remote API returned a non-success HTTP status.
    #[error("batch API error (HTTP {status_code}): {message}")]
    Api {
        status_code: u16,
        message: String,
    },

    /// The remote response could not be parsed.
    #[error("failed to parse API response: {0}")]
    ParseResponse(String),

    // ==========================================================================
    // Job lifecycle errors
    // ==========================================================================
    /// No local record matches the given key.
    #[error("request not found: {0}")]
    NotFound(String),

    /// The job has not reached a completed status yet.
    #[error("batch not completed (status: {status})")]
    NotReady {
        status: BatchStatus,
    },

    /// The job reports completed but exposes no output handle.
    #[error("batch {request_id} completed but has no output file")]
    MissingOutput {
        request_id: String,
    },

    /// The output payload exists but contains no matching result line.
    #[error("no result for {request_id} in the output file")]
    ExtractionMiss {
        request_id: String,
    },

    // ==========================================================================
    // I/O errors
    // ==========================================================================
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ==========================================================================
    // Generic wrapper
    // ==========================================================================
    /// Catch-all for other errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ObatchError {
    /// Map error to exit code.
    #[must_use]
    pub const fn exit_code(&self) -> ExitCode {
        match self {
            Self::NotFound(_) => ExitCode::NotFound,
            Self::NotReady { .. } => ExitCode::NotReady,
            Self::Timeout(_) => ExitCode::Timeout,
            Self::MissingApiKey
            | Self::Config(_)
            | Self::RemoteUnavailable { .. }
            | Self::Api { .. }
            | Self::ParseResponse(_)
            | Self::MissingOutput { .. }
            | Self::ExtractionMiss { .. }
            | Self::Io(_)
            | Self::Json(_)
            | Self::Other(_) => ExitCode::GeneralError,
        }
    }

    /// Returns the error category for classification and routing.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingApiKey | Self::Config(_) => ErrorCategory::Configuration,
            Self::Timeout(_) | Self::RemoteUnavailable { .. } => ErrorCategory::Network,
            Self::Api { .. } | Self::ParseResponse(_) => ErrorCategory::Remote,
            Self::NotFound(_)
            | Self::NotReady { .. }
            | Self::MissingOutput { .. }
            | Self::ExtractionMiss { .. } => ErrorCategory::Job,
            Self::Io(_) | Self::Json(_) | Self::Other(_) => ErrorCategory::Internal,
        }
    }

    /// Returns whether the error is potentially recoverable by retrying.
    ///
    /// Reconciliation treats these as "try again later" warnings rather
    /// than hard failures.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout(_) | Self::RemoteUnavailable { .. } => true,
            Self::Api { status_code, .. } => {
                *status_code == 429 || *status_code >= 500
            }
            _ => false,
        }
    }
}

/// Result type alias for obatch operations.
pub type Result<T> = std::result::Result<T, ObatchError>;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_correct() {
        assert_eq!(
            ObatchError::NotFound("req-x".to_string()).exit_code(),
            ExitCode::NotFound
        );
        assert_eq!(
            ObatchError::NotReady {
                status: BatchStatus::InProgress
            }
            .exit_code(),
            ExitCode::NotReady
        );
        assert_eq!(ObatchError::Timeout(30).exit_code(), ExitCode::Timeout);
        assert_eq!(
            ObatchError::MissingApiKey.exit_code(),
            ExitCode::GeneralError
        );
        assert_eq!(
            ObatchError::ExtractionMiss {
                request_id: "req-x".to_string()
            }
            .exit_code(),
            ExitCode::GeneralError
        );
    }

    #[test]
    fn categories_are_correct() {
        assert_eq!(
            ObatchError::MissingApiKey.category(),
            ErrorCategory::Configuration
        );
        assert_eq!(
            ObatchError::RemoteUnavailable {
                message: "reset".to_string()
            }
            .category(),
            ErrorCategory::Network
        );
        assert_eq!(
            ObatchError::Api {
                status_code: 500,
                message: "boom".to_string()
            }
            .category(),
            ErrorCategory::Remote
        );
        assert_eq!(
            ObatchError::MissingOutput {
                request_id: "req-x".to_string()
            }
            .category(),
            ErrorCategory::Job
        );
        assert_eq!(
            ObatchError::Other(anyhow::anyhow!("boom")).category(),
            ErrorCategory::Internal
        );
    }

    #[test]
    fn retryable_errors() {
        assert!(ObatchError::Timeout(30).is_retryable());
        assert!(
            ObatchError::RemoteUnavailable {
                message: "connection reset".to_string()
            }
            .is_retryable()
        );
        assert!(
            ObatchError::Api {
                status_code: 429,
                message: "rate limited".to_string()
            }
            .is_retryable()
        );
        assert!(
            ObatchError::Api {
                status_code: 503,
                message: "unavailable".to_string()
            }
            .is_retryable()
        );
        assert!(
            !ObatchError::Api {
                status_code: 401,
                message: "unauthorized".to_string()
            }
            .is_retryable()
        );
        assert!(!ObatchError::MissingApiKey.is_retryable());
        assert!(
            !ObatchError::NotFound("req-x".to_string()).is_retryable()
        );
    }

    #[test]
    fn not_ready_message_carries_status() {
        let err = ObatchError::NotReady {
            status: BatchStatus::Validating,
        };
        assert_eq!(err.to_string(), "batch not completed (status: validating)");
    }

    #[test]
    fn missing_output_and_extraction_miss_are_distinct() {
        let missing = ObatchError::MissingOutput {
            request_id: "req-a".to_string(),
        };
        let miss = ObatchError::ExtractionMiss {
            request_id: "req-a".to_string(),
        };
        assert_ne!(missing.to_string(), miss.to_string());
    }
}
