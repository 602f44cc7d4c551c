// handlers/ideas/delete.rs - DELETE /api/ideas/:id handler

use axum::{
    extract::{rejection::PathRejection, Path, State},
    Extension,
};

use crate::api::idea_id_from_path;
use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, Message};

use super::IDEA_NOT_FOUND;

pub const NOT_OWNER: &str = "Not authorized to delete this idea";
pub const DELETED: &str = "Idea deleted successfully";

/// Delete an idea. Ownership is checked before anything is removed.
pub async fn idea_delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Message> {
    let id = idea_id_from_path(path)?;

    let existing = state
        .store
        .find(id)
        .await?
        .ok_or_else(|| ApiError::not_found(IDEA_NOT_FOUND))?;

    if !existing.is_owned_by(&user.id) {
        tracing::warn!("User {} tried to delete idea {} owned by {}", user.id, id, existing.owner);
        return Err(ApiError::forbidden(NOT_OWNER));
    }

    if !state.store.delete_owned(id, &user.id).await? {
        return Err(ApiError::not_found(IDEA_NOT_FOUND));
    }

    tracing::info!("User {} deleted idea {}", user.id, id);
    Ok(ApiResponse::success(Message::new(DELETED)))
}
