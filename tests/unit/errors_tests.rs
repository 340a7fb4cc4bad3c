/*!
 * Tests for error types and conversions
 */

use doctran::errors::{AppError, ErrorCategory, ProviderError};

#[test]
fn test_providerError_requestFailed_shouldDisplayCorrectly() {
    let error = ProviderError::RequestFailed("Connection timeout".to_string());
    let display = format!("{}", error);
    assert!(display.contains("API request failed"));
    assert!(display.contains("Connection timeout"));
}

#[test]
fn test_providerError_apiError_shouldDisplayStatusAndMessage() {
    let error = ProviderError::ApiError {
        status_code: 429,
        message: "Too many requests".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("429"));
    assert!(display.contains("Too many requests"));
}

#[test]
fn test_providerError_configuration_shouldDisplayCorrectly() {
    let error = ProviderError::Configuration("Missing API key".to_string());
    let display = format!("{}", error);
    assert!(display.contains("configuration"));
    assert!(display.contains("Missing API key"));
}

#[test]
fn test_appError_fromProviderError_shouldWrapCorrectly() {
    let provider_error = ProviderError::ConnectionError("Host unreachable".to_string());
    let app_error: AppError = provider_error.into();
    assert!(matches!(app_error, AppError::Provider(_)));
    assert!(format!("{}", app_error).contains("Host unreachable"));
}

#[test]
fn test_appError_fromIoError_shouldBecomeFileError() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
    let app_error: AppError = io_error.into();
    assert!(matches!(app_error, AppError::File(_)));
}

#[test]
fn test_errorCategory_display_shouldUseReadableNames() {
    assert_eq!(ErrorCategory::FileIo.to_string(), "file I/O");
    assert_eq!(ErrorCategory::Translation.to_string(), "translation");
    assert_eq!(ErrorCategory::Reinsertion.to_string(), "reinsertion");
}

#[test]
fn test_abortErrors_shouldHaveStableMessages() {
    assert!(format!("{}", AppError::Aborted).contains("aborted"));
    assert!(format!("{}", AppError::NonInteractiveAbort).contains("non-interactive"));
}
