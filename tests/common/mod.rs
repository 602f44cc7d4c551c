#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Duration;
use serde_json::Value;
use tower::ServiceExt;

use ideas_api::auth::{TokenCodec, UserClaim};
use ideas_api::config::AppConfig;
use ideas_api::database::{IdeaStore, MemoryIdeaStore};
use ideas_api::{app, AppState};

pub const SECRET: &str = "integration-test-secret";

/// Router wired to an in-memory store, plus handles to inspect it
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryIdeaStore>,
    pub tokens: TokenCodec,
}

pub fn config(vars: &[(&str, &str)]) -> AppConfig {
    let mut map: HashMap<String, String> = HashMap::new();
    map.insert("JWT_SECRET".to_string(), SECRET.to_string());
    for (k, v) in vars {
        map.insert(k.to_string(), v.to_string());
    }
    AppConfig::from_lookup(|name| map.get(name).cloned()).expect("test config")
}

pub fn codec() -> TokenCodec {
    TokenCodec::new(SECRET, Duration::minutes(15)).expect("test codec")
}

pub fn spawn_app() -> TestApp {
    spawn_app_with_config(config(&[]))
}

pub fn spawn_app_with_config(config: AppConfig) -> TestApp {
    let store = Arc::new(MemoryIdeaStore::new());
    let router = router_with_store(config, store.clone());
    TestApp { router, store, tokens: codec() }
}

pub fn router_with_store(config: AppConfig, store: Arc<dyn IdeaStore>) -> Router {
    app(AppState::new(config, codec(), store))
}

impl TestApp {
    pub fn token_for(&self, user: &str) -> String {
        self.tokens
            .sign(&UserClaim { id: user.to_string() })
            .expect("sign token")
    }

    pub async fn get(&self, uri: &str) -> Result<(StatusCode, Value)> {
        send(&self.router, Method::GET, uri, None, None).await
    }

    pub async fn post(&self, uri: &str, user: &str, body: Value) -> Result<(StatusCode, Value)> {
        let token = self.token_for(user);
        send(&self.router, Method::POST, uri, Some(&token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, user: &str, body: Value) -> Result<(StatusCode, Value)> {
        let token = self.token_for(user);
        send(&self.router, Method::PUT, uri, Some(&token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, user: &str) -> Result<(StatusCode, Value)> {
        let token = self.token_for(user);
        send(&self.router, Method::DELETE, uri, Some(&token), None).await
    }

    /// Create an idea as `user` and return its id
    pub async fn create_idea(&self, user: &str, title: &str) -> Result<String> {
        let (status, body) = self
            .post(
                "/api/ideas",
                user,
                serde_json::json!({
                    "title": title,
                    "description": format!("{} description", title),
                    "summary": format!("{} summary", title),
                    "tags": "rust, ideas"
                }),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "create failed: {} {}", status, body);
        body["id"]
            .as_str()
            .map(str::to_string)
            .context("created idea has no id")
    }
}

/// Send a request with an optional bearer token and JSON body
pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    bearer: Option<&str>,
    body: Option<Value>,
) -> Result<(StatusCode, Value)> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json)?))?,
        None => builder.body(Body::empty())?,
    };
    send_request(router, request).await
}

pub async fn send_request(router: &Router, request: Request<Body>) -> Result<(StatusCode, Value)> {
    let response = router.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).with_context(|| {
            format!("non-JSON body: {}", String::from_utf8_lossy(&bytes))
        })?
    };
    Ok((status, body))
}
