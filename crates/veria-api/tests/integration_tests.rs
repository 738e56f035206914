//! Integration tests for the chat API, each with its own in-memory
//! backend state.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use veria_api::handlers::{ChatResponse, HealthResponse, HistoryResponse};
use veria_api::{create_router, AppState};
use veria_chat::Orchestrator;
use veria_core::VeriaConfig;
use veria_doc::CsvParser;
use veria_isms::InMemoryIsms;

// =============================================================================
// Helpers
// =============================================================================

fn make_app() -> (axum::Router, Arc<InMemoryIsms>) {
    let isms = Arc::new(InMemoryIsms::new());
    isms.add_domain("d1", "Main");
    let orchestrator = Orchestrator::new(
        VeriaConfig::default(),
        Arc::clone(&isms) as Arc<dyn veria_isms::IsmsClient>,
        Arc::new(CsvParser),
        None,
    )
    .unwrap();
    (create_router(AppState::new(orchestrator)), isms)
}

fn post_json(uri: &str, json: &Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(json.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

async fn body_json<T: serde::de::DeserializeOwned>(resp: axum::response::Response) -> T {
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn chat(app: &axum::Router, session_id: Option<Uuid>, message: &str) -> ChatResponse {
    let mut body = json!({ "message": message });
    if let Some(id) = session_id {
        body["session_id"] = json!(id);
    }
    let resp = app
        .clone()
        .oneshot(post_json("/api/chat", &body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    body_json(resp).await
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_health() {
    let (app, _) = make_app();
    let resp = app.oneshot(get("/api/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let health: HealthResponse = body_json(resp).await;
    assert_eq!(health.status, "ok");
}

#[tokio::test]
async fn test_chat_creates_object() {
    let (app, isms) = make_app();
    let reply = chat(&app, None, "create asset named Mail Server").await;
    assert!(reply.response.text.contains("Created asset 'Mail Server'"));
    assert_eq!(isms.object_count(), 1);
}

#[tokio::test]
async fn test_chat_session_continuity() {
    let (app, _) = make_app();
    let first = chat(&app, None, "create asset named Mail Server").await;
    let second = chat(&app, Some(first.session_id), "list assets").await;
    assert_eq!(second.session_id, first.session_id);
    assert!(second.response.text.contains("Found 1 assets"));
}

#[tokio::test]
async fn test_chat_empty_message_is_bad_request() {
    let (app, _) = make_app();
    let resp = app
        .oneshot(post_json("/api/chat", &json!({ "message": "  " })))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = body_json(resp).await;
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_session_history_round_trip() {
    let (app, _) = make_app();
    let reply = chat(&app, None, "hello").await;

    let resp = app
        .clone()
        .oneshot(get(&format!("/api/sessions/{}/history", reply.session_id)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let history: HistoryResponse = body_json(resp).await;
    assert_eq!(history.messages.len(), 2);
    assert_eq!(history.messages[0].role, "user");
    assert_eq!(history.messages[0].content, "hello");
    assert_eq!(history.messages[1].role, "assistant");
}

#[tokio::test]
async fn test_unknown_session_history_is_not_found() {
    let (app, _) = make_app();
    let resp = app
        .oneshot(get(&format!("/api/sessions/{}/history", Uuid::new_v4())))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_attachment_upload_and_import() {
    let (app, isms) = make_app();
    let data: Vec<u8> = b"Asset Name,Description\nMail Server,Primary MTA\nWeb Server,Edge\n".to_vec();

    let resp = app
        .clone()
        .oneshot(post_json(
            "/api/chat",
            &json!({
                "message": "",
                "attachment": { "file_name": "inventory.csv", "data": data }
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let reply: ChatResponse = body_json(resp).await;
    assert!(reply.response.text.contains("found 2 rows"));

    let confirm = chat(&app, Some(reply.session_id), "yes").await;
    assert!(confirm.response.text.contains("Imported 2 of 2 assets"));
    assert_eq!(isms.object_count(), 2);
}

#[tokio::test]
async fn test_unsupported_attachment_is_bad_request() {
    let (app, _) = make_app();
    let resp = app
        .oneshot(post_json(
            "/api/chat",
            &json!({
                "message": "",
                "attachment": { "file_name": "archive.zip", "data": [1, 2, 3] }
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_backend_outage_still_answers_200() {
    let (app, isms) = make_app();
    isms.set_unavailable(true);
    let reply = chat(&app, None, "list assets").await;
    assert!(reply.response.text.contains("not reachable"));
}
