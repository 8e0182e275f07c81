use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{
    error::{ApiResult, ErrorResponse},
    extract::require_non_empty,
    routes::summary::Turn,
    state::AppState,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HistoryResponse {
    pub thread_id: String,
    /// Stored turns keyed by day (`YYYY-MM-DD`), oldest first
    pub conversations: BTreeMap<String, Vec<Turn>>,
}

/// Get the stored conversation of a thread
#[utoipa::path(
    get,
    path = "/threads/{thread_id}/history",
    params(
        ("thread_id" = String, Path, description = "Upstream thread id")
    ),
    responses(
        (status = 200, description = "Stored conversation by day", body = HistoryResponse),
        (status = 502, description = "Conversation store failure", body = ErrorResponse)
    ),
    tag = "threads"
)]
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Path(thread_id): Path<String>,
) -> ApiResult<Json<HistoryResponse>> {
    require_non_empty("thread_id", &thread_id)?;

    let conversations = state
        .service
        .history(&thread_id)
        .await?
        .into_iter()
        .map(|(date, messages)| (date, messages.into_iter().map(Turn::from).collect()))
        .collect();

    Ok(Json(HistoryResponse {
        thread_id,
        conversations,
    }))
}
