use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tori_conversation::ConversationError;
use utoipa::ToSchema;

/// Body of every error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub detail: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error(transparent)]
    Conversation(#[from] ConversationError),

    #[error("Request timed out")]
    Timeout,

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Conversation(err) => match err {
                ConversationError::ContentRefused { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                ConversationError::HistoryNotFound { .. } => StatusCode::NOT_FOUND,
                ConversationError::MessageAppendFailed { .. }
                | ConversationError::RunCreationFailed { .. }
                | ConversationError::RunPollFailed { .. }
                | ConversationError::HistoryUnavailable { .. } => StatusCode::BAD_GATEWAY,
                ConversationError::ThreadCreationFailed { .. }
                | ConversationError::SummaryFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Timeout => StatusCode::REQUEST_TIMEOUT,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match self {
            ApiError::Validation(_) => self.to_string(),
            ApiError::Timeout => {
                tracing::warn!("Request exceeded the server timeout");
                self.to_string()
            }
            ApiError::Conversation(ref err) => match err {
                ConversationError::ContentRefused { .. } | ConversationError::HistoryNotFound { .. } => {
                    tracing::info!("Request rejected: {}", err);
                    err.to_string()
                }
                ConversationError::ThreadCreationFailed { .. } | ConversationError::SummaryFailed { .. } => {
                    log_chain(err);
                    err.to_string()
                }
                _ => {
                    log_chain(err);
                    "Upstream service error".to_string()
                }
            },
            ApiError::Internal => {
                tracing::error!("Internal error: {}", self);
                self.to_string()
            }
        };

        (status, Json(ErrorResponse { detail: message })).into_response()
    }
}

/// Log an error together with its source chain
fn log_chain(err: &(dyn std::error::Error + 'static)) {
    let mut chain = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        chain.push_str(": ");
        chain.push_str(&cause.to_string());
        source = cause.source();
    }
    tracing::error!(error = %chain, "Conversation error");
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_is_unprocessable() {
        let error = ApiError::Validation("first_prompt must not be empty".to_string());
        assert_eq!(error.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_timeout_is_request_timeout() {
        assert_eq!(ApiError::Timeout.into_response().status(), StatusCode::REQUEST_TIMEOUT);
    }

    #[test]
    fn test_refusal_is_unprocessable() {
        let error = ApiError::from(ConversationError::ContentRefused {
            refusal: "I can't help with that.".to_string(),
        });
        assert_eq!(error.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_exhaustion_is_internal_error() {
        let error = ApiError::from(ConversationError::ThreadCreationFailed {
            attempts: 4,
            source: anyhow::anyhow!("503"),
        });
        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_transport_failure_is_bad_gateway() {
        let error = ApiError::from(ConversationError::RunPollFailed {
            thread_id: "thread_1".to_string(),
            run_id: "run_1".to_string(),
            source: anyhow::anyhow!("connection reset"),
        });
        assert_eq!(error.status(), StatusCode::BAD_GATEWAY);
    }
}
