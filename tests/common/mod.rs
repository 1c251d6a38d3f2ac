//! Shared helpers for the HTTP integration tests

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use licita_kb::{
    api::{build_router, AppState},
    auth::{encode_basic, Authenticator, DisabledAuthenticator, StaticAuthenticator},
    config::{CacheConfig, KnowledgeConfig, StaticUser},
    knowledge::KnowledgeService,
    state::InMemoryStore,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub fn service() -> Arc<KnowledgeService> {
    Arc::new(KnowledgeService::new(
        Arc::new(InMemoryStore::new()),
        &CacheConfig::default(),
        &KnowledgeConfig::default(),
    ))
}

pub fn disabled_auth() -> Arc<dyn Authenticator> {
    Arc::new(DisabledAuthenticator::new(
        "ifsp.edu.br".to_string(),
        "IFSP".to_string(),
    ))
}

/// Static users `maria`/`senha-maria` and `joao`/`senha-joao`
pub fn static_auth() -> Arc<dyn Authenticator> {
    let user = |username: &str, name: &str| StaticUser {
        username: username.to_string(),
        password: format!("senha-{}", username),
        name: Some(name.to_string()),
        email: None,
        department: Some("Licitações".to_string()),
    };
    Arc::new(StaticAuthenticator::new(
        vec![user("maria", "Maria Santos"), user("joao", "João Silva")],
        "ifsp.edu.br".to_string(),
        "IFSP".to_string(),
    ))
}

pub fn app(service: Arc<KnowledgeService>, authenticator: Arc<dyn Authenticator>) -> Router {
    build_router(AppState::new(service, authenticator))
}

pub fn basic(username: &str) -> String {
    encode_basic(username, &format!("senha-{}", username))
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, body)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: Value, auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(auth) = auth {
        builder = builder.header("authorization", auth);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}
