// handlers/ideas/list.rs - GET /api/ideas handler

use axum::extract::{RawQuery, State};
use url::form_urlencoded;

use crate::api::parse_limit;
use crate::app::AppState;
use crate::database::Idea;
use crate::middleware::{ApiResponse, ApiResult};

/// Query parameter capping the number of ideas returned
pub const LIMIT_PARAM: &str = "_limit";

pub async fn idea_list(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> ApiResult<Vec<Idea>> {
    let raw_limit = query.as_deref().and_then(first_limit);
    let limit = parse_limit(raw_limit.as_deref());
    let ideas = state.store.list(limit).await?;

    tracing::debug!("Listed {} ideas (limit {:?})", ideas.len(), limit);
    Ok(ApiResponse::success(ideas))
}

/// First `_limit` value in the query string; repeats are ignored
fn first_limit(query: &str) -> Option<String> {
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == LIMIT_PARAM)
        .map(|(_, value)| value.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_limit_wins() {
        assert_eq!(first_limit("_limit=1&_limit=2").as_deref(), Some("1"));
        assert_eq!(first_limit("q=x&_limit=%205").as_deref(), Some(" 5"));
        assert_eq!(first_limit("limit=3"), None);
        assert_eq!(first_limit(""), None);
    }
}
