//! Error types for payboard-api

use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use payboard_core::{CoreError, DefaultErrorLogger, ErrorCode, ErrorContext, ErrorLogger};
use thiserror::Error;

/// A core error together with what the request was doing when it happened
#[derive(Error, Debug)]
#[error("{error}")]
pub struct ApiError {
    pub error: CoreError,
    pub context: ErrorContext,
}

impl ApiError {
    pub fn new(error: CoreError, operation: &str) -> Self {
        Self {
            error,
            context: ErrorContext::new(operation),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(CoreError::InvalidFormat { message: message.into() }, "parse request")
    }

    pub fn for_transaction(mut self, id: &str) -> Self {
        self.context = self.context.with_transaction(id);
        self
    }

    pub fn status(&self) -> StatusCode {
        match self.error.code() {
            ErrorCode::ValidationFailed => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::TransactionNotFound => StatusCode::NOT_FOUND,
            ErrorCode::ActionNotAllowed | ErrorCode::ActionInFlight | ErrorCode::NoOpenDialog => StatusCode::CONFLICT,
            ErrorCode::ActionFailed => StatusCode::BAD_GATEWAY,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::GatewayUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::InvalidFormat => StatusCode::BAD_REQUEST,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(error: CoreError) -> Self {
        Self::new(error, "request")
    }
}

/// Extension for tagging core results with the operation they belong to
pub trait ResultExt<T> {
    fn during(self, operation: &str) -> Result<T, ApiError>;
}

impl<T> ResultExt<T> for Result<T, CoreError> {
    fn during(self, operation: &str) -> Result<T, ApiError> {
        self.map_err(|e| ApiError::new(e, operation))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let request_id = payboard_utils::generate_request_id();
        let context = self.context.clone().with_request_id(request_id.clone());
        DefaultErrorLogger.log_error(&self.error, &context);

        let mut response = (self.status(), Json(self.error.to_details())).into_response();
        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response.headers_mut().insert("x-request-id", value);
        }
        response
    }
}
