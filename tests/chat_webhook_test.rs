mod common;

use axum::http::StatusCode;
use common::*;
use licita_kb::{
    api::{build_router, AppState},
    chat::{ChatRelay, ChatSender},
};
use mockito::Matcher;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

async fn wait_for(mock: &mockito::Mock) -> bool {
    for _ in 0..50 {
        if mock.matched_async().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    false
}

#[tokio::test]
async fn test_webhook_disabled_by_default() {
    let app = app(service(), disabled_auth());

    let (status, _) = send(
        &app,
        post_json(
            "/whatsapp/webhook",
            json!({ "message": { "text": "/buscar pregão", "from": "5519" } }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_search_command_is_answered() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/messages")
        .match_header("authorization", "Bearer token-de-teste")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(json!({
                "to": "5519999990000",
                "type": "text"
            })),
            Matcher::Regex("Pregão eletrônico".to_string()),
        ]))
        .with_status(200)
        .create_async()
        .await;

    let service = service();
    service.seed_examples().await.unwrap();
    let sender = ChatSender::new(
        format!("{}/v1/messages", server.url()),
        Some("token-de-teste".to_string()),
        5,
    )
    .unwrap();
    let relay = Arc::new(ChatRelay::new(service.clone(), sender, "/buscar".to_string()));
    let app = build_router(AppState::new(service, disabled_auth()).with_chat(relay));

    let (status, body) = send(
        &app,
        post_json(
            "/whatsapp/webhook",
            json!({ "message": { "text": "/buscar pregão", "from": "5519999990000" } }),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
    assert!(wait_for(&mock).await, "reply was not delivered");
}

#[tokio::test]
async fn test_other_messages_are_ignored() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/messages")
        .expect(0)
        .create_async()
        .await;

    let service = service();
    let sender = ChatSender::new(format!("{}/v1/messages", server.url()), None, 5).unwrap();
    let relay = Arc::new(ChatRelay::new(service.clone(), sender, "/buscar".to_string()));
    let app = build_router(AppState::new(service, disabled_auth()).with_chat(relay));

    let (status, body) = send(
        &app,
        post_json(
            "/whatsapp/webhook",
            json!({ "message": { "text": "bom dia", "from": "5519" } }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    tokio::time::sleep(Duration::from_millis(100)).await;
    mock.assert_async().await;
}

#[tokio::test]
async fn test_delivery_failure_still_acknowledged() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/messages")
        .with_status(503)
        .expect(1)
        .create_async()
        .await;

    let service = service();
    let sender = ChatSender::new(format!("{}/v1/messages", server.url()), None, 5).unwrap();
    let relay = Arc::new(ChatRelay::new(service.clone(), sender, "/buscar".to_string()));
    let app = build_router(AppState::new(service, disabled_auth()).with_chat(relay));

    let (status, body) = send(
        &app,
        post_json(
            "/whatsapp/webhook",
            json!({ "message": { "text": "/buscar recurso", "from": "5519" } }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    assert!(wait_for(&mock).await);
    // no retry after the failure
    tokio::time::sleep(Duration::from_millis(100)).await;
    mock.assert_async().await;
}
