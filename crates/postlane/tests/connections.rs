//! Connection reuse across successful and failed calls.

mod common;

use axum::extract::{ConnectInfo, Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use common::{client, spawn, GRANT};
use postlane::{Context, Error, MessagesApi};
use serde_json::{json, Value};
use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Peers = Arc<Mutex<HashSet<SocketAddr>>>;

async fn message(
    State(peers): State<Peers>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Path((_grant, id)): Path<(String, String)>,
) -> (StatusCode, Json<Value>) {
    peers.lock().unwrap().insert(peer);
    match id.as_str() {
        "missing" => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": { "type": "not_found_error", "message": "no such message" } })),
        ),
        "bad" => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": { "type": "invalid_request_error", "message": "malformed id" } })),
        ),
        _ => (
            StatusCode::OK,
            Json(json!({ "data": { "id": id, "subject": "hello" } })),
        ),
    }
}

#[tokio::test]
async fn test_connection_reused_after_errors() {
    let peers = Peers::default();
    let app = Router::new()
        .route("/v3/grants/{grant}/messages/{id}", get(message))
        .with_state(Arc::clone(&peers));
    let addr = spawn(app).await;
    let client = client(addr);
    let ctx = Context::background();

    for id in ["m-1", "missing", "m-2", "bad", "m-3", "missing", "m-4"] {
        let result = client.get_message(&ctx, GRANT, id).await;
        match id {
            "missing" => assert!(result.unwrap_err().is_not_found()),
            "bad" => {
                let Err(Error::Api(api)) = result else {
                    panic!("expected api error");
                };
                assert_eq!(api.status, 400);
                assert_eq!(api.message, "malformed id");
            }
            _ => assert_eq!(result.unwrap().id, id),
        }
        // Let the connection return to the pool before the next call.
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    assert_eq!(peers.lock().unwrap().len(), 1);
}
