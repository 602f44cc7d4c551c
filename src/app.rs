use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::TokenCodec;
use crate::config::AppConfig;
use crate::database::IdeaStore;
use crate::handlers::{self, ideas};
use crate::middleware::{error_handler, not_found, require_auth};

/// Process-wide state, built once at startup and shared by every request
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tokens: Arc<TokenCodec>,
    pub store: Arc<dyn IdeaStore>,
}

impl AppState {
    pub fn new(config: AppConfig, tokens: TokenCodec, store: Arc<dyn IdeaStore>) -> Self {
        Self {
            config: Arc::new(config),
            tokens: Arc::new(tokens),
            store,
        }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api_routes(state.clone()))
        .fallback(not_found)
        // Unsupported methods on known paths are unknown routes too; set before
        // layering so the fallback skips the auth route_layer
        .method_not_allowed_fallback(not_found)
        // Global middleware
        .layer(from_fn_with_state(state.clone(), error_handler))
        .layer(cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/ideas", get(ideas::idea_list))
        .route("/ideas/:id", get(ideas::idea_show));

    let protected = Router::new()
        .route("/ideas", post(ideas::idea_create))
        .route(
            "/ideas/:id",
            put(ideas::idea_update).delete(ideas::idea_delete),
        )
        .route_layer(from_fn_with_state(state, require_auth));

    public.merge(protected)
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            // Credentialed CORS cannot use a wildcard origin
            Ok(_) if origin == "*" => {
                tracing::warn!("Ignoring wildcard CORS origin; credentials require explicit origins");
                None
            }
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
