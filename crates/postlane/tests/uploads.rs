//! Buffered and streamed multipart uploads.

mod common;

use axum::body::to_bytes;
use axum::extract::{FromRequest, Multipart, Path, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use common::{client, spawn, GRANT};
use postlane::{
    Context, Error, MessagesApi, NetworkError, OutgoingAttachment, SendMessageRequest,
    StreamedAttachment,
};
use serde_json::{json, Value};
use std::io;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context as TaskContext, Poll};
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, ReadBuf};
use tokio::sync::Notify;

#[derive(Debug, Clone)]
struct SeenPart {
    name: String,
    filename: Option<String>,
    content_type: Option<String>,
    len: usize,
}

#[derive(Clone, Default)]
struct Seen {
    content_types: Arc<Mutex<Vec<String>>>,
    parts: Arc<Mutex<Vec<SeenPart>>>,
    json: Arc<Mutex<Vec<Value>>>,
    /// Outcome of each raw body read: the byte count, or the read error.
    raw_reads: Arc<Mutex<Vec<Result<usize, String>>>>,
    raw_done: Arc<Notify>,
}

fn sent(attachments: &[Value]) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "request_id": "req-send",
            "data": { "id": "sent-1", "subject": "Report", "attachments": attachments }
        })),
    )
}

async fn send(State(seen): State<Seen>, Path(grant): Path<String>, request: Request) -> (StatusCode, Json<Value>) {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    seen.content_types.lock().unwrap().push(content_type.clone());

    match grant.as_str() {
        "stall" => {
            tokio::time::sleep(Duration::from_secs(30)).await;
            return sent(&[]);
        }
        "raw" => {
            let read = to_bytes(request.into_body(), usize::MAX)
                .await
                .map(|body| body.len())
                .map_err(|e| e.to_string());
            seen.raw_reads.lock().unwrap().push(read);
            seen.raw_done.notify_one();
            return sent(&[]);
        }
        _ => {}
    }

    if content_type.starts_with("application/json") {
        let body = to_bytes(request.into_body(), usize::MAX).await.unwrap();
        seen.json.lock().unwrap().push(serde_json::from_slice(&body).unwrap());
        return sent(&[]);
    }

    let mut multipart = Multipart::from_request(request, &()).await.unwrap();
    let mut attachments = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let filename = field.file_name().map(str::to_string);
        let part_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.unwrap();
        if name == "message" {
            seen.json.lock().unwrap().push(serde_json::from_slice(&data).unwrap());
        } else {
            attachments.push(json!({
                "id": format!("att-{}", attachments.len()),
                "filename": filename.clone().unwrap_or_default(),
                "content_type": part_type.clone().unwrap_or_default(),
                "size": data.len(),
            }));
        }
        seen.parts.lock().unwrap().push(SeenPart {
            name,
            filename,
            content_type: part_type,
            len: data.len(),
        });
    }
    sent(&attachments)
}

fn router(seen: Seen) -> Router {
    Router::new()
        .route("/v3/grants/{grant}/messages/send", post(send))
        .with_state(seen)
}

/// Yields `good` bytes, then fails.
struct FailingReader {
    good: usize,
}

impl AsyncRead for FailingReader {
    fn poll_read(mut self: Pin<&mut Self>, _cx: &mut TaskContext<'_>, buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
        if self.good == 0 {
            return Poll::Ready(Err(io::Error::other("source vanished")));
        }
        let n = self.good.min(buf.remaining());
        buf.put_slice(&vec![b'x'; n]);
        self.good -= n;
        Poll::Ready(Ok(()))
    }
}

/// Never yields; records when it is dropped.
struct StuckReader {
    dropped: Arc<AtomicBool>,
}

impl AsyncRead for StuckReader {
    fn poll_read(self: Pin<&mut Self>, _cx: &mut TaskContext<'_>, _buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
        Poll::Pending
    }
}

impl Drop for StuckReader {
    fn drop(&mut self) {
        self.dropped.store(true, Ordering::SeqCst);
    }
}

fn request() -> SendMessageRequest {
    SendMessageRequest::new("ada@example.com", "Report", "See attached.")
}

#[tokio::test]
async fn test_two_attachments_become_two_file_parts() {
    let seen = Seen::default();
    let addr = spawn(router(seen.clone())).await;

    let message = request()
        .attach(OutgoingAttachment::new("report.pdf", b"%PDF-1.7 ...".to_vec()).with_content_type("application/pdf"))
        .attach(OutgoingAttachment::new("skipped.txt", Vec::new()))
        .attach(OutgoingAttachment::new("data.bin", vec![0u8; 2048]));

    let sent = client(addr)
        .send_message(&Context::background(), GRANT, &message)
        .await
        .unwrap();

    let parts = seen.parts.lock().unwrap().clone();
    let files: Vec<&SeenPart> = parts.iter().filter(|p| p.name != "message").collect();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0].name, "file0");
    assert_eq!(files[0].filename.as_deref(), Some("report.pdf"));
    assert_eq!(files[0].content_type.as_deref(), Some("application/pdf"));
    assert_eq!(files[1].name, "file1");
    assert_eq!(files[1].filename.as_deref(), Some("data.bin"));
    assert_eq!(files[1].content_type.as_deref(), Some("application/octet-stream"));
    assert_eq!(files[1].len, 2048);

    assert_eq!(sent.attachments.len(), 2);
    assert_eq!(seen.json.lock().unwrap()[0]["subject"], "Report");
}

#[tokio::test]
async fn test_without_attachments_sends_json() {
    let seen = Seen::default();
    let addr = spawn(router(seen.clone())).await;

    let message = request().attach(OutgoingAttachment::new("empty.txt", Vec::new()));
    client(addr)
        .send_message(&Context::background(), GRANT, &message)
        .await
        .unwrap();

    assert_eq!(seen.content_types.lock().unwrap()[0], "application/json");
    assert_eq!(seen.json.lock().unwrap()[0]["to"][0]["email"], "ada@example.com");
    assert!(seen.parts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_streamed_upload() {
    let seen = Seen::default();
    let addr = spawn(router(seen.clone())).await;
    let content = vec![7u8; 1024 * 1024];

    let attachment = StreamedAttachment::new("big.bin", io::Cursor::new(content));
    let sent = client(addr)
        .send_message_streamed(&Context::background(), GRANT, &request(), attachment)
        .await
        .unwrap();

    assert_eq!(sent.id, "sent-1");
    let content_type = seen.content_types.lock().unwrap()[0].clone();
    assert!(
        content_type.starts_with("multipart/form-data; boundary=postlane-"),
        "{content_type}"
    );
    let parts = seen.parts.lock().unwrap().clone();
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0].name, "message");
    assert_eq!(parts[1].name, "file0");
    assert_eq!(parts[1].filename.as_deref(), Some("big.bin"));
    assert_eq!(parts[1].len, 1024 * 1024);
}

#[tokio::test]
async fn test_streamed_source_failure_aborts_request() {
    let seen = Seen::default();
    let addr = spawn(router(seen.clone())).await;

    let attachment = StreamedAttachment::new("broken.bin", FailingReader { good: 10_000 });
    let err = client(addr)
        .send_message_streamed(&Context::background(), "raw", &request(), attachment)
        .await
        .unwrap_err();

    let Error::Upload(cause) = err else {
        panic!("expected upload error, got {err:?}");
    };
    assert!(cause.to_string().contains("source vanished"));

    // The handler may be dropped with the aborted connection before it records.
    let _ = tokio::time::timeout(Duration::from_millis(500), seen.raw_done.notified()).await;
    let reads = seen.raw_reads.lock().unwrap().clone();
    assert!(reads.iter().all(Result::is_err), "server received a complete body: {reads:?}");
}

#[tokio::test]
async fn test_streamed_body_is_complete_on_success() {
    let seen = Seen::default();
    let addr = spawn(router(seen.clone())).await;

    let attachment = StreamedAttachment::new("small.bin", io::Cursor::new(vec![1u8; 4096]));
    client(addr)
        .send_message_streamed(&Context::background(), "raw", &request(), attachment)
        .await
        .unwrap();

    let reads = seen.raw_reads.lock().unwrap().clone();
    assert_eq!(reads.len(), 1);
    assert!(*reads[0].as_ref().unwrap() > 4096);
}

#[tokio::test]
async fn test_streamed_writer_is_stopped_on_timeout() {
    let addr = spawn(router(Seen::default())).await;
    let dropped = Arc::new(AtomicBool::new(false));

    let attachment = StreamedAttachment::new(
        "stuck.bin",
        StuckReader {
            dropped: Arc::clone(&dropped),
        },
    );
    let ctx = Context::background().with_timeout(Duration::from_millis(300));
    let start = Instant::now();
    let err = client(addr)
        .send_message_streamed(&ctx, "stall", &request(), attachment)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Network(NetworkError::Timeout(_))), "{err:?}");
    assert!(start.elapsed() < Duration::from_secs(2));
    assert!(dropped.load(Ordering::SeqCst), "writer task still owns the source");
}

#[tokio::test]
async fn test_streamed_writer_is_stopped_on_cancel() {
    let addr = spawn(router(Seen::default())).await;
    let dropped = Arc::new(AtomicBool::new(false));

    let attachment = StreamedAttachment::new(
        "stuck.bin",
        StuckReader {
            dropped: Arc::clone(&dropped),
        },
    );
    let ctx = Context::background();
    let canceller = ctx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        canceller.cancel();
    });

    let err = client(addr)
        .send_message_streamed(&ctx, "stall", &request(), attachment)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Network(NetworkError::Cancelled)), "{err:?}");
    assert!(dropped.load(Ordering::SeqCst));
}
