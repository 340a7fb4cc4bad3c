/*!
 * Error types for the doctran application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions, plus the error
 * category taxonomy consumed by the error policy.
 */

use thiserror::Error;

/// Errors that can occur when talking to a translation provider.
///
/// The runner treats every variant identically (a batch-level provider
/// failure); the variants exist for logging and diagnostics only.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The provider answered but the answer carried no usable text
    #[error("Provider response empty or unrecognised")]
    EmptyResponse,

    /// The provider is misconfigured (bad name, missing API key).
    /// Raised before any document mutation occurs.
    #[error("Provider configuration error: {0}")]
    Configuration(String),
}

/// Category assigned to each handled error, used by the error policy
/// to detect consecutive failures of the same kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad input before any work starts
    Argument,
    /// Missing or unreadable input, colliding output
    FileIo,
    /// Unsupported document type or malformed tagged output
    Format,
    /// Provider failures or missing-segment responses
    Translation,
    /// Setter failures while writing translated text back
    Reinsertion,
    /// Network-level provider failures, distinguished only for logging
    Network,
    /// Anything else
    Other,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Argument => "argument",
            Self::FileIo => "file I/O",
            Self::Format => "format",
            Self::Translation => "translation",
            Self::Reinsertion => "reinsertion",
            Self::Network => "network",
            Self::Other => "other",
        };
        write!(f, "{}", name)
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Bad command line input, rejected before any work starts
    #[error("{0}")]
    Argument(String),

    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// The input document type is not supported
    #[error("{0}")]
    UnsupportedFormat(String),

    /// Writing the output would clobber a file without consent
    #[error("{0}")]
    OverwriteRefused(String),

    /// A translated tagged payload violated the run-tag wire format
    #[error("Tagged output invalid: {0}")]
    TagFormat(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The user elected to abort at an error-policy escalation
    #[error("Translation aborted at your request")]
    Aborted,

    /// The error threshold was crossed with no prompt available
    #[error("Error threshold exceeded in non-interactive mode. Stopping safely")]
    NonInteractiveAbort,

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
