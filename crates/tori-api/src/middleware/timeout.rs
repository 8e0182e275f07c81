use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;

/// Give timed-out requests the usual `{"detail"}` error body
///
/// Must wrap `tower_http::timeout::TimeoutLayer`, which answers with an empty 408.
pub async fn timeout_detail(req: Request, next: Next) -> Response {
    let response = next.run(req).await;

    if response.status() == StatusCode::REQUEST_TIMEOUT {
        return ApiError::Timeout.into_response();
    }

    response
}
