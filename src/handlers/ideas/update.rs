// handlers/ideas/update.rs - PUT /api/ideas/:id handler

use axum::{
    extract::{rejection::PathRejection, Path, State},
    Extension,
};

use crate::api::{idea_id_from_path, IdeaBody};
use crate::app::AppState;
use crate::database::Idea;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

use super::IDEA_NOT_FOUND;

pub const NOT_OWNER: &str = "Not authorized to update this idea";

/// Overwrite an idea's editable fields.
///
/// Checks run in order: id format (400), existence (404), body (400), ownership (403).
pub async fn idea_update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<String>, PathRejection>,
    IdeaBody(payload): IdeaBody,
) -> ApiResult<Idea> {
    let id = idea_id_from_path(path)?;

    let existing = state
        .store
        .find(id)
        .await?
        .ok_or_else(|| ApiError::not_found(IDEA_NOT_FOUND))?;

    let draft = payload.into_draft()?;

    if !existing.is_owned_by(&user.id) {
        tracing::warn!("User {} tried to update idea {} owned by {}", user.id, id, existing.owner);
        return Err(ApiError::forbidden(NOT_OWNER));
    }

    // None here means the record vanished after the lookup
    let updated = state
        .store
        .update_owned(id, &user.id, draft)
        .await?
        .ok_or_else(|| ApiError::not_found(IDEA_NOT_FOUND))?;

    tracing::info!("User {} updated idea {}", user.id, id);
    Ok(ApiResponse::success(updated))
}
