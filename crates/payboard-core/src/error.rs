//! Error types for payboard-core
//!
//! Every failure the dashboard can hit maps to one `CoreError` variant with a
//! stable code, a severity, and a serializable detail record for API replies.
//! Nothing here is fatal: validation errors stay on the form, action errors are
//! surfaced as a notification and leave list state untouched.

use crate::forms::FieldError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationFailed,
    TransactionNotFound,
    ActionNotAllowed,
    ActionInFlight,
    NoOpenDialog,
    ActionFailed,
    Unauthorized,
    GatewayUnavailable,
    InvalidFormat,
    InternalError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::ValidationFailed => write!(f, "VALIDATION_FAILED"),
            ErrorCode::TransactionNotFound => write!(f, "TRANSACTION_NOT_FOUND"),
            ErrorCode::ActionNotAllowed => write!(f, "ACTION_NOT_ALLOWED"),
            ErrorCode::ActionInFlight => write!(f, "ACTION_IN_FLIGHT"),
            ErrorCode::NoOpenDialog => write!(f, "NO_OPEN_DIALOG"),
            ErrorCode::ActionFailed => write!(f, "ACTION_FAILED"),
            ErrorCode::Unauthorized => write!(f, "UNAUTHORIZED"),
            ErrorCode::GatewayUnavailable => write!(f, "GATEWAY_UNAVAILABLE"),
            ErrorCode::InvalidFormat => write!(f, "INVALID_FORMAT"),
            ErrorCode::InternalError => write!(f, "INTERNAL_ERROR"),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Field-level validation errors, if any
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub fields: Vec<FieldError>,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    /// Create a new error detail
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            fields: vec![],
            suggestions: vec![],
        }
    }

    /// Attach field errors
    pub fn with_fields(mut self, fields: Vec<FieldError>) -> Self {
        self.fields = fields;
        self
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        for field in &self.fields {
            write!(f, "\n  {}: {}", field.field, field.message)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Main error type for payboard-core
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Validation failed: {} field error(s)", errors.len())]
    ValidationFailed { errors: Vec<FieldError> },

    #[error("Transaction not found: {id}")]
    TransactionNotFound { id: String },

    #[error("Action '{action}' is not available for {status} transaction {id}")]
    ActionNotAllowed { id: String, action: String, status: String },

    #[error("An action is already in progress for transaction {id}")]
    ActionInFlight { id: String },

    #[error("No '{action}' dialog is open for transaction {id}")]
    NoOpenDialog { id: String, action: String },

    #[error("Action failed: {message}")]
    ActionFailed { message: String },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Gateway unavailable: {message}")]
    GatewayUnavailable { message: String },

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl CoreError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            CoreError::TransactionNotFound { .. } => ErrorCode::TransactionNotFound,
            CoreError::ActionNotAllowed { .. } => ErrorCode::ActionNotAllowed,
            CoreError::ActionInFlight { .. } => ErrorCode::ActionInFlight,
            CoreError::NoOpenDialog { .. } => ErrorCode::NoOpenDialog,
            CoreError::ActionFailed { .. } => ErrorCode::ActionFailed,
            CoreError::Unauthorized { .. } => ErrorCode::Unauthorized,
            CoreError::GatewayUnavailable { .. } => ErrorCode::GatewayUnavailable,
            CoreError::InvalidFormat { .. } => ErrorCode::InvalidFormat,
            CoreError::InternalError { .. } => ErrorCode::InternalError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::ValidationFailed { .. } => ErrorSeverity::Info,
            CoreError::TransactionNotFound { .. } => ErrorSeverity::Info,
            CoreError::ActionNotAllowed { .. } => ErrorSeverity::Warning,
            CoreError::ActionInFlight { .. } => ErrorSeverity::Warning,
            CoreError::NoOpenDialog { .. } => ErrorSeverity::Warning,
            CoreError::ActionFailed { .. } => ErrorSeverity::Error,
            CoreError::Unauthorized { .. } => ErrorSeverity::Warning,
            CoreError::GatewayUnavailable { .. } => ErrorSeverity::Error,
            CoreError::InvalidFormat { .. } => ErrorSeverity::Error,
            CoreError::InternalError { .. } => ErrorSeverity::Critical,
        }
    }

    /// Whether the caller may simply retry the same user action
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CoreError::ActionFailed { .. } | CoreError::GatewayUnavailable { .. } | CoreError::ActionInFlight { .. }
        )
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::ValidationFailed { errors } => details.with_fields(errors.clone()),
            CoreError::TransactionNotFound { .. } => details
                .with_suggestion("The transaction may have been removed; refresh the list.".to_string()),
            CoreError::ActionNotAllowed { .. } => details.with_suggestion(
                "Retry applies to failed, mark-paid to pending and refund to completed transactions.".to_string(),
            ),
            CoreError::ActionInFlight { .. } => details
                .with_suggestion("Wait for the current action to finish before trying again.".to_string()),
            CoreError::NoOpenDialog { .. } => details
                .with_suggestion("Open the action dialog before confirming it.".to_string()),
            CoreError::ActionFailed { .. } | CoreError::GatewayUnavailable { .. } => details
                .with_suggestion("The transaction was not changed; you can retry the action.".to_string()),
            CoreError::Unauthorized { .. } => details
                .with_suggestion("Sign in again and retry.".to_string()),
            _ => details,
        }
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

/// Error context for reporting
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Request ID for tracing
    pub request_id: Option<String>,
    /// Operation being performed
    pub operation: String,
    /// Transaction the operation targeted, if any
    pub transaction_id: Option<String>,
}

impl ErrorContext {
    /// Create a new error context
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            request_id: None,
            operation: operation.into(),
            transaction_id: None,
        }
    }

    /// Add request ID
    pub fn with_request_id(mut self, request_id: String) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add the targeted transaction
    pub fn with_transaction(mut self, id: impl Into<String>) -> Self {
        self.transaction_id = Some(id.into());
        self
    }
}

/// Error logger trait
pub trait ErrorLogger: Send + Sync {
    /// Log an error
    fn log_error(&self, error: &CoreError, context: &ErrorContext);
}

/// Default error logger using log crate
#[derive(Default)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext) {
        match error.severity() {
            ErrorSeverity::Info => log::debug!(
                target: "payboard::error",
                "[{}] {} - Operation: {} - Transaction: {:?} - Request: {:?}",
                error.code(),
                error,
                context.operation,
                context.transaction_id,
                context.request_id
            ),
            ErrorSeverity::Warning => log::warn!(
                target: "payboard::error",
                "[{}] {} - Operation: {} - Transaction: {:?} - Request: {:?}",
                error.code(),
                error,
                context.operation,
                context.transaction_id,
                context.request_id
            ),
            ErrorSeverity::Error | ErrorSeverity::Critical => log::error!(
                target: "payboard::error",
                "[{}] {} - Operation: {} - Transaction: {:?} - Request: {:?}",
                error.code(),
                error.to_details(),
                context.operation,
                context.transaction_id,
                context.request_id
            ),
        }
    }
}

// ==================== Tests ====================
