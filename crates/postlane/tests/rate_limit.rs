//! Throttling against a zero-latency local server.

mod common;

use axum::routing::get;
use axum::{Json, Router};
use common::{client_with, spawn, GRANT};
use postlane::{Context, Error, FoldersApi, Interrupted};
use serde_json::{json, Value};
use std::time::{Duration, Instant};

async fn folders() -> Json<Value> {
    Json(json!({ "data": [] }))
}

fn router() -> Router {
    Router::new().route("/v3/grants/{grant}/folders", get(folders))
}

#[tokio::test]
async fn test_burst_passes_without_delay() {
    let addr = spawn(router()).await;
    let client = client_with(addr, |b| b.rate_limit(10));
    let ctx = Context::background();

    let start = Instant::now();
    for _ in 0..20 {
        client.list_folders(&ctx, GRANT).await.unwrap();
    }
    assert!(start.elapsed() < Duration::from_millis(700), "{:?}", start.elapsed());
}

#[tokio::test]
async fn test_calls_beyond_burst_are_throttled() {
    let addr = spawn(router()).await;
    let client = client_with(addr, |b| b.rate_limit(10));
    let ctx = Context::background();

    let start = Instant::now();
    for _ in 0..30 {
        client.list_folders(&ctx, GRANT).await.unwrap();
    }
    // Ten calls past the burst of 20 at 10/s.
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(900), "{elapsed:?}");
    assert!(elapsed < Duration::from_secs(3), "{elapsed:?}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_callers_share_one_bucket() {
    let addr = spawn(router()).await;
    let client = client_with(addr, |b| b.rate_limit(10));

    let start = Instant::now();
    let handles: Vec<_> = (0..30)
        .map(|_| {
            let client = client.clone();
            tokio::spawn(async move { client.list_folders(&Context::background(), GRANT).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }
    assert!(start.elapsed() >= Duration::from_millis(900));
}

#[tokio::test]
async fn test_context_deadline_aborts_limiter_wait() {
    let addr = spawn(router()).await;
    let client = client_with(addr, |b| b.rate_limit(1));
    let ctx = Context::background();
    client.list_folders(&ctx, GRANT).await.unwrap();
    client.list_folders(&ctx, GRANT).await.unwrap();

    let short = Context::background().with_timeout(Duration::from_millis(100));
    let start = Instant::now();
    let err = client.list_folders(&short, GRANT).await.unwrap_err();
    assert!(matches!(
        err,
        Error::RateLimitAborted(Interrupted::DeadlineExceeded)
    ));
    assert!(start.elapsed() < Duration::from_millis(600));
}

#[tokio::test]
async fn test_cancel_aborts_limiter_wait() {
    let addr = spawn(router()).await;
    let client = client_with(addr, |b| b.rate_limit(1));
    let ctx = Context::background();
    client.list_folders(&ctx, GRANT).await.unwrap();
    client.list_folders(&ctx, GRANT).await.unwrap();

    let waiting = ctx.child();
    let canceller = waiting.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });
    let err = client.list_folders(&waiting, GRANT).await.unwrap_err();
    assert!(matches!(err, Error::RateLimitAborted(Interrupted::Cancelled)));
}
