//! Error types for payboard-client

use payboard_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Backend returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Unexpected response body: {0}")]
    Decode(String),

    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    /// Map onto the core taxonomy; `transaction_id` names the target of an action call
    pub fn into_core(self, transaction_id: Option<&str>) -> CoreError {
        match self {
            ClientError::Transport(e) => CoreError::GatewayUnavailable { message: e.to_string() },
            ClientError::Status { status: 401 | 403, message } => CoreError::Unauthorized { message },
            ClientError::Status { status: 404, message } => match transaction_id {
                Some(id) => CoreError::TransactionNotFound { id: id.to_string() },
                None => CoreError::ActionFailed { message },
            },
            ClientError::Status { message, .. } => CoreError::ActionFailed { message },
            ClientError::Decode(message) => CoreError::InvalidFormat { message },
            ClientError::InvalidUrl(message) => CoreError::InternalError { message },
        }
    }
}

impl From<ClientError> for CoreError {
    fn from(error: ClientError) -> Self {
        error.into_core(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use payboard_core::ErrorCode;

    fn status(status: u16) -> ClientError {
        ClientError::Status { status, message: "nope".to_string() }
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status(401).into_core(None).code(), ErrorCode::Unauthorized);
        assert_eq!(status(403).into_core(Some("t")).code(), ErrorCode::Unauthorized);
        assert_eq!(status(404).into_core(Some("t")).code(), ErrorCode::TransactionNotFound);
        assert_eq!(status(404).into_core(None).code(), ErrorCode::ActionFailed);
        assert_eq!(status(422).into_core(Some("t")).code(), ErrorCode::ActionFailed);
        assert_eq!(status(503).into_core(None).code(), ErrorCode::ActionFailed);
    }

    #[test]
    fn test_decode_mapping() {
        let error: CoreError = ClientError::Decode("missing id".to_string()).into();
        assert_eq!(error.code(), ErrorCode::InvalidFormat);
    }
}
