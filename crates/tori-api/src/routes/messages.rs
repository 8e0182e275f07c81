use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{
    error::{ApiError, ApiResult, ErrorResponse},
    extract::{require_non_empty, Validate, ValidJson},
    state::AppState,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SendMessageRequest {
    pub thread_id: String,
    pub new_user_message: String,
}

impl Validate for SendMessageRequest {
    fn validate(&self) -> Result<(), ApiError> {
        require_non_empty("thread_id", &self.thread_id)?;
        require_non_empty("new_user_message", &self.new_user_message)
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SendMessageResponse {
    /// Tori's reply, or the fallback message when no reply could be produced
    pub tori_message: String,
}

/// Send a user message and wait for Tori's reply
#[utoipa::path(
    post,
    path = "/send_message",
    request_body = SendMessageRequest,
    responses(
        (status = 200, description = "Reply from Tori", body = SendMessageResponse),
        (status = 422, description = "Invalid request", body = ErrorResponse),
        (status = 502, description = "Upstream assistant failure", body = ErrorResponse)
    ),
    tag = "messages"
)]
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<SendMessageRequest>,
) -> ApiResult<Json<SendMessageResponse>> {
    let tori_message = state
        .service
        .send_message(&req.thread_id, &req.new_user_message)
        .await?;

    Ok(Json(SendMessageResponse { tori_message }))
}
