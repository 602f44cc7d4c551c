// handlers/ideas/create.rs - POST /api/ideas handler

use axum::{extract::State, Extension};

use crate::api::IdeaBody;
use crate::app::AppState;
use crate::database::Idea;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// Create an idea owned by the caller
pub async fn idea_create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    IdeaBody(payload): IdeaBody,
) -> ApiResult<Idea> {
    let draft = payload.into_draft()?;

    let idea = state.store.insert(draft, &user.id).await?;

    tracing::info!("User {} created idea {}", user.id, idea.id);
    Ok(ApiResponse::created(idea))
}
