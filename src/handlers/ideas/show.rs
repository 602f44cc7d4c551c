// handlers/ideas/show.rs - GET /api/ideas/:id handler

use axum::extract::{rejection::PathRejection, Path, State};

use crate::api::idea_id_from_path;
use crate::app::AppState;
use crate::database::Idea;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

use super::IDEA_NOT_FOUND;

pub async fn idea_show(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Idea> {
    let id = idea_id_from_path(path)?;

    match state.store.find(id).await? {
        Some(idea) => Ok(ApiResponse::success(idea)),
        None => Err(ApiError::not_found(IDEA_NOT_FOUND)),
    }
}
