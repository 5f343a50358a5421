//! Opt-in retries for replayable requests.

mod common;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use common::{client, client_with, spawn, GRANT};
use postlane::{Context, Error, FoldersApi, MessagesApi, RetryPolicy, SendMessageRequest, StreamedAttachment};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Replies with `statuses` in order, then 200 forever.
#[derive(Clone)]
struct Script {
    hits: Arc<AtomicUsize>,
    statuses: Arc<Vec<u16>>,
}

impl Script {
    fn new(statuses: &[u16]) -> Self {
        Self {
            hits: Arc::new(AtomicUsize::new(0)),
            statuses: Arc::new(statuses.to_vec()),
        }
    }

    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    fn next(&self) -> StatusCode {
        let hit = self.hits.fetch_add(1, Ordering::SeqCst);
        let code = self.statuses.get(hit).copied().unwrap_or(200);
        StatusCode::from_u16(code).unwrap()
    }
}

async fn folders(State(script): State<Script>) -> (StatusCode, Json<Value>) {
    let status = script.next();
    if status == StatusCode::OK {
        return (status, Json(json!({ "data": [{ "id": "inbox", "name": "Inbox" }] })));
    }
    (status, Json(json!({ "error": { "message": format!("scripted {}", status.as_u16()) } })))
}

async fn send(State(script): State<Script>, _body: Bytes) -> (StatusCode, Json<Value>) {
    let status = script.next();
    (status, Json(json!({ "data": { "id": "sent-1" } })))
}

fn router(script: Script) -> Router {
    Router::new()
        .route("/v3/grants/{grant}/folders", get(folders))
        .route("/v3/grants/{grant}/messages/send", post(send))
        .with_state(script)
}

fn policy() -> RetryPolicy {
    RetryPolicy::new(3).with_base_delay(Duration::from_millis(10))
}

#[tokio::test]
async fn test_retries_transient_statuses() {
    let script = Script::new(&[503, 503]);
    let addr = spawn(router(script.clone())).await;
    let client = client_with(addr, |b| b.retry(policy()));

    let folders = client.list_folders(&Context::background(), GRANT).await.unwrap();

    assert_eq!(folders.len(), 1);
    assert_eq!(script.hits(), 3);
}

#[tokio::test]
async fn test_default_policy_does_not_retry() {
    let script = Script::new(&[503]);
    let addr = spawn(router(script.clone())).await;

    let err = client(addr)
        .list_folders(&Context::background(), GRANT)
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(503));
    assert_eq!(script.hits(), 1);
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    let script = Script::new(&[400]);
    let addr = spawn(router(script.clone())).await;
    let client = client_with(addr, |b| b.retry(policy()));

    let err = client
        .list_folders(&Context::background(), GRANT)
        .await
        .unwrap_err();

    let Error::Api(api) = err else {
        panic!("expected api error, got {err:?}");
    };
    assert_eq!(api.message, "scripted 400");
    assert_eq!(script.hits(), 1);
}

#[tokio::test]
async fn test_gives_up_after_max_retries() {
    let script = Script::new(&[502, 502, 502, 502, 502]);
    let addr = spawn(router(script.clone())).await;
    let client = client_with(addr, |b| b.retry(policy()));

    let err = client
        .list_folders(&Context::background(), GRANT)
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(502));
    assert_eq!(script.hits(), 4);
}

#[tokio::test]
async fn test_streamed_upload_is_not_retried() {
    let script = Script::new(&[503]);
    let addr = spawn(router(script.clone())).await;
    let client = client_with(addr, |b| b.retry(policy()));

    let attachment = StreamedAttachment::new("notes.txt", std::io::Cursor::new(b"notes".to_vec()));
    let err = client
        .send_message_streamed(
            &Context::background(),
            GRANT,
            &SendMessageRequest::new("ada@example.com", "Notes", ""),
            attachment,
        )
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(503));
    assert_eq!(script.hits(), 1);
}
