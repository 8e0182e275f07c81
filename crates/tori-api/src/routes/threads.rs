use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{
    error::{ApiError, ApiResult, ErrorResponse},
    extract::{require_non_empty, Validate, ValidJson},
    state::AppState,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateThreadRequest {
    /// First thing the user said; seeds the new thread
    pub first_prompt: String,
}

impl Validate for CreateThreadRequest {
    fn validate(&self) -> Result<(), ApiError> {
        require_non_empty("first_prompt", &self.first_prompt)
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateThreadResponse {
    #[serde(rename = "new_threadId")]
    pub new_thread_id: String,
}

/// Create a new conversation thread
#[utoipa::path(
    post,
    path = "/create_thread",
    request_body = CreateThreadRequest,
    responses(
        (status = 201, description = "Thread created", body = CreateThreadResponse),
        (status = 422, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Thread creation failed after retries", body = ErrorResponse)
    ),
    tag = "threads"
)]
pub async fn create_thread(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<CreateThreadRequest>,
) -> ApiResult<(StatusCode, Json<CreateThreadResponse>)> {
    let thread_id = state.service.create_thread(&req.first_prompt).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateThreadResponse {
            new_thread_id: thread_id,
        }),
    ))
}
