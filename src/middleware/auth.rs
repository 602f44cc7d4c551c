use axum::{
    extract::{Request, State},
    http::{
        header::{AUTHORIZATION, COOKIE},
        HeaderMap,
    },
    middleware::Next,
    response::Response,
};
use cookie::Cookie;

use crate::app::AppState;
use crate::auth::UserClaim;
use crate::config::TokenSource;
use crate::error::ApiError;

pub const NO_TOKEN: &str = "Not authorized, no token";
pub const TOKEN_FAILED: &str = "Not authorized, token failed";

/// Authenticated caller, injected into request extensions
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub id: String,
}

impl From<UserClaim> for AuthUser {
    fn from(claim: UserClaim) -> Self {
        Self { id: claim.id }
    }
}

/// JWT authentication middleware that validates tokens and extracts user context
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let security = &state.config.security;

    let token = extract_token(request.headers(), security.token_source, &security.cookie_name)
        .ok_or_else(|| {
            tracing::warn!("Rejected {} {}: no token", request.method(), request.uri().path());
            ApiError::unauthorized(NO_TOKEN)
        })?;

    let claim = state.tokens.verify(&token).map_err(|e| {
        tracing::warn!("Rejected {} {}: {}", request.method(), request.uri().path(), e);
        ApiError::unauthorized(TOKEN_FAILED)
    })?;

    tracing::debug!("Authenticated user {}", claim.id);
    request.extensions_mut().insert(AuthUser::from(claim));

    Ok(next.run(request).await)
}

/// Token from the preferred source, falling back to the other one
pub fn extract_token(headers: &HeaderMap, source: TokenSource, cookie_name: &str) -> Option<String> {
    match source {
        TokenSource::Header => {
            bearer_token(headers).or_else(|| cookie_token(headers, cookie_name))
        }
        TokenSource::Cookie => {
            cookie_token(headers, cookie_name).or_else(|| bearer_token(headers))
        }
    }
}

/// Extract JWT token from Authorization header
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth_str = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}

/// Named cookie value, percent-decoded
fn cookie_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| Cookie::split_parse_encoded(value.to_string()))
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == cookie_name)
        .map(|cookie| cookie.value().trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}
