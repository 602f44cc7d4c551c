use axum::{
    extract::{OriginalUri, Request, State},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::app::AppState;
use crate::error::{ApiError, ErrorReport};

/// Final error middleware: outside production, internal errors expose their cause as `stack`
pub async fn error_handler(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let response = next.run(request).await;

    if state.config.is_production() {
        return response;
    }

    let Some(report) = response.extensions().get::<ErrorReport>().cloned() else {
        return response;
    };
    let Some(stack) = report.detail.clone() else {
        return response;
    };

    let body = json!({ "message": report.message, "stack": stack });
    let mut decorated = (response.status(), Json(body)).into_response();
    decorated.extensions_mut().insert(report);
    decorated
}

/// Fallback for unknown routes
pub async fn not_found(OriginalUri(uri): OriginalUri) -> ApiError {
    ApiError::not_found(format!("Not Found - {}", uri))
}
