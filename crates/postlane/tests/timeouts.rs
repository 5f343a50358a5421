//! Deadlines and cancellation during network I/O.

mod common;

use axum::body::Body;
use axum::routing::get;
use axum::Router;
use common::{client, client_with, spawn, GRANT};
use postlane::{Context, Error, FoldersApi, MessagesApi, NetworkError};
use std::time::{Duration, Instant};
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;

async fn slow(delay: Duration) -> &'static str {
    tokio::time::sleep(delay).await;
    r#"{"data":[]}"#
}

/// Sends headers and half a body, then stalls.
async fn stalled_body() -> Body {
    let (reader, mut writer) = tokio::io::duplex(1024);
    tokio::spawn(async move {
        writer.write_all(br#"{"data":["#).await.unwrap();
        tokio::time::sleep(Duration::from_secs(30)).await;
        drop(writer);
    });
    Body::from_stream(ReaderStream::new(reader))
}

fn router() -> Router {
    Router::new()
        .route(
            "/v3/grants/{grant}/folders",
            get(|| slow(Duration::from_secs(5))),
        )
        .route(
            "/v3/grants/{grant}/calendars",
            get(|| slow(Duration::from_millis(1500))),
        )
        .route("/v3/grants/{grant}/messages", get(stalled_body))
}

#[tokio::test]
async fn test_default_timeout_applies_without_deadline() {
    common::init_tracing();
    let addr = spawn(router()).await;
    let client = client_with(addr, |b| b.timeout(Duration::from_millis(300)));

    let start = Instant::now();
    let err = client
        .list_folders(&Context::background(), GRANT)
        .await
        .unwrap_err();
    let elapsed = start.elapsed();

    assert!(matches!(err, Error::Network(NetworkError::Timeout(_))), "{err:?}");
    assert!(elapsed >= Duration::from_millis(280), "{elapsed:?}");
    assert!(elapsed < Duration::from_millis(1500), "{elapsed:?}");
}

#[tokio::test]
async fn test_context_deadline_is_used_unmodified() {
    use postlane::CalendarsApi;

    let addr = spawn(router()).await;
    // A default far longer than the context deadline.
    let client = client_with(addr, |b| b.timeout(Duration::from_secs(30)));
    let ctx = Context::background().with_timeout(Duration::from_millis(500));

    let start = Instant::now();
    let err = client.list_calendars(&ctx, GRANT).await.unwrap_err();
    let elapsed = start.elapsed();

    assert!(matches!(err, Error::Network(NetworkError::Timeout(_))), "{err:?}");
    assert!(elapsed >= Duration::from_millis(480), "{elapsed:?}");
    assert!(elapsed < Duration::from_millis(1200), "{elapsed:?}");
}

#[tokio::test]
async fn test_cancel_during_request() {
    let addr = spawn(router()).await;
    let client = client(addr);
    let ctx = Context::background();
    let canceller = ctx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        canceller.cancel();
    });

    let start = Instant::now();
    let err = client.list_folders(&ctx, GRANT).await.unwrap_err();
    assert!(matches!(err, Error::Network(NetworkError::Cancelled)), "{err:?}");
    assert!(start.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_deadline_bounds_body_read() {
    let addr = spawn(router()).await;
    let client = client(addr);
    let ctx = Context::background().with_timeout(Duration::from_millis(300));

    let start = Instant::now();
    let err = client
        .list_messages(&ctx, GRANT, &Default::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Network(NetworkError::Timeout(_))), "{err:?}");
    assert!(start.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    // Bind then drop to get a port nobody listens on.
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let client = client(addr);
    let err = client
        .list_folders(&Context::background(), GRANT)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Network(NetworkError::Transport(_))), "{err:?}");
}
