//! Attachment uploads.
//!
//! Buffered uploads encode the whole `multipart/form-data` body up front and
//! go through the normal retrying send path. Streamed uploads encode on a
//! spawned writer task into an in-memory pipe while the HTTP request reads
//! the other end. A writer failure aborts the request body instead of ending
//! it early. The writer is always joined (or aborted and joined) before the
//! call returns, and its failure wins over the HTTP outcome.

use crate::client::{check_status, HttpClient, Payload};
use crate::context::Context;
use crate::error::{Error, Interrupted, NetworkError, Result};
use crate::models::{OutgoingAttachment, StreamedAttachment};
use bytes::Bytes;
use postlane_multipart::{ContentType, Form, MultipartWriter};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Method;
use serde::Serialize;
use std::io;
use std::pin::Pin;
use std::task::{ready, Context as TaskContext, Poll};
use std::time::Duration;
use tokio::io::{AsyncRead, DuplexStream, ReadBuf};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::io::ReaderStream;
use tracing::{debug, warn};
use url::Url;

/// Pipe capacity between the encoder task and the request body.
const PIPE_CAPACITY: usize = 64 * 1024;

/// Name of the JSON field carrying the message.
const MESSAGE_FIELD: &str = "message";

/// Form field name for the `index`-th uploaded attachment.
fn file_field(index: usize) -> String {
    format!("file{index}")
}

fn part_content_type(declared: Option<&str>) -> ContentType {
    declared.map_or_else(ContentType::octet_stream, ContentType::parse_or_octet_stream)
}

/// Builds the buffered form: the JSON `message` field, then one part per
/// non-empty attachment named `file0`, `file1`, ... without gaps.
#[must_use]
pub fn attachment_form(message_json: Bytes, attachments: &[OutgoingAttachment]) -> Form {
    let mut form = Form::new();
    form.field(MESSAGE_FIELD, &ContentType::application_json(), message_json);
    for attachment in attachments.iter().filter(|a| !a.content.is_empty()) {
        let name = file_field(form.len() - 1);
        form.file(
            &name,
            &attachment.filename,
            &part_content_type(attachment.content_type.as_deref()),
            attachment.content.clone(),
        );
    }
    form
}

fn encode_message<B: Serialize + ?Sized>(message: &B) -> Result<Bytes> {
    serde_json::to_vec(message)
        .map(Bytes::from)
        .map_err(|e| Error::InvalidInput(format!("cannot encode message: {e}")))
}

impl HttpClient {
    /// Sends `message` as JSON, or as a buffered multipart form when any
    /// attachment has content.
    pub(crate) async fn send_with_attachments<B>(
        &self,
        ctx: &Context,
        method: Method,
        url: Url,
        message: &B,
        attachments: &[OutgoingAttachment],
        accepted: &[u16],
    ) -> Result<Bytes>
    where
        B: Serialize + ?Sized + Sync,
    {
        if attachments.iter().all(|a| a.content.is_empty()) {
            let response = self.do_json(ctx, method, url, Some(message), accepted).await?;
            return response.bytes().await;
        }

        let form = attachment_form(encode_message(message)?, attachments);
        debug!(parts = form.len(), bytes = form.encoded_len(), "sending buffered multipart");
        let payload = Payload::Form {
            content_type: form.content_type().to_string(),
            body: form.into_bytes(),
        };
        let response = self.send(ctx, method, url, &payload, accepted, true).await?;
        response.bytes().await
    }

    /// Sends `message` with one attachment streamed from its reader.
    ///
    /// Never retried. Returns the accepted response body.
    pub(crate) async fn send_streamed<B>(
        &self,
        ctx: &Context,
        method: Method,
        url: Url,
        message: &B,
        attachment: StreamedAttachment,
        accepted: &[u16],
    ) -> Result<Bytes>
    where
        B: Serialize + ?Sized + Sync,
    {
        let message = encode_message(message)?;
        let ctx = ctx.child().with_deadline(self.transport().deadline_for(ctx));
        let deadline = self.transport().deadline_for(&ctx);

        let (reader, writer) = tokio::io::duplex(PIPE_CAPACITY);
        let multipart = MultipartWriter::new(writer);
        let content_type = multipart.content_type().to_string();
        let (mut task, status) = WriterTask::spawn(multipart, message, attachment);
        let body = PipeReader {
            pipe: reader,
            status: Some(status),
        };

        let request = self
            .transport()
            .http()
            .request(method, url)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, content_type)
            .bearer_auth(&self.config().api_key)
            .body(reqwest::Body::wrap_stream(ReaderStream::new(body)))
            .build()
            .map_err(NetworkError::Transport);

        let exchange = match request {
            Ok(request) => match self.transport().execute(&ctx, request).await {
                Ok(response) => match check_status(response, accepted).await {
                    Ok(response) => response.bytes().await,
                    Err(e) => Err(e),
                },
                Err(e) => Err(e),
            },
            Err(e) => Err(e.into()),
        };

        let budget = deadline.saturating_duration_since(Instant::now());
        match task.join(&ctx, deadline).await {
            WriterOutcome::Finished => exchange,
            // The request side went away first; its error explains why.
            WriterOutcome::Failed(e)
                if exchange.is_err() && e.io_kind() == Some(io::ErrorKind::BrokenPipe) =>
            {
                exchange
            }
            WriterOutcome::Failed(e) => {
                warn!(error = %e, "streamed upload writer failed");
                Err(Error::Upload(e))
            }
            WriterOutcome::Interrupted(reason) => exchange.and(Err(interrupted(reason, budget))),
        }
    }
}

fn interrupted(reason: Interrupted, budget: Duration) -> Error {
    match reason {
        Interrupted::Cancelled => NetworkError::Cancelled.into(),
        Interrupted::DeadlineExceeded => NetworkError::Timeout(budget).into(),
    }
}

enum WriterOutcome {
    Finished,
    Failed(postlane_multipart::Error),
    Interrupted(Interrupted),
}

/// Writer outcome as seen by the request body.
type WriterStatus = oneshot::Receiver<io::Result<()>>;

/// Read side of the upload pipe.
///
/// End of input is reported only after the writer finished cleanly. A failed
/// or abandoned writer turns it into an error, so the request body is aborted
/// and the server never sees a complete request.
struct PipeReader {
    pipe: DuplexStream,
    status: Option<WriterStatus>,
}

impl AsyncRead for PipeReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut TaskContext<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let before = buf.filled().len();
        ready!(Pin::new(&mut self.pipe).poll_read(cx, buf))?;
        if buf.filled().len() > before || buf.remaining() == 0 {
            return Poll::Ready(Ok(()));
        }
        let Some(status) = self.status.as_mut() else {
            return Poll::Ready(Ok(()));
        };
        let outcome = ready!(Pin::new(status).poll(cx));
        self.status = None;
        Poll::Ready(outcome.unwrap_or_else(|_| Err(io::Error::other("upload writer stopped"))))
    }
}

async fn encode(
    mut multipart: MultipartWriter<DuplexStream>,
    message: Bytes,
    attachment: StreamedAttachment,
) -> postlane_multipart::Result<()> {
    let StreamedAttachment {
        filename,
        content_type,
        mut reader,
    } = attachment;
    multipart
        .write_field(MESSAGE_FIELD, &message, Some(&ContentType::application_json()))
        .await?;
    let copied = multipart
        .write_file(
            &file_field(0),
            &filename,
            &part_content_type(content_type.as_deref()),
            &mut reader,
        )
        .await?;
    multipart.finish().await?;
    debug!(copied, "streamed upload encoded");
    Ok(())
}

/// The encoder task. Aborted when dropped so an abandoned call cannot leak it.
struct WriterTask {
    handle: JoinHandle<postlane_multipart::Result<()>>,
}

impl WriterTask {
    /// Starts encoding into `multipart`. The returned receiver resolves once
    /// the pipe's write end is closed.
    fn spawn(
        multipart: MultipartWriter<DuplexStream>,
        message: Bytes,
        attachment: StreamedAttachment,
    ) -> (Self, WriterStatus) {
        let (status_tx, status_rx) = oneshot::channel();
        let handle = tokio::spawn(async move {
            let result = encode(multipart, message, attachment).await;
            let status = match &result {
                Ok(()) => Ok(()),
                Err(e) => Err(io::Error::other(e.to_string())),
            };
            let _ = status_tx.send(status);
            result
        });
        (Self { handle }, status_rx)
    }

    /// Waits for the writer until `ctx` ends, then aborts it and waits for
    /// the abort to land.
    async fn join(&mut self, ctx: &Context, deadline: Instant) -> WriterOutcome {
        let joined = tokio::select! {
            biased;
            joined = &mut self.handle => Ok(joined),
            () = ctx.cancellation_token().cancelled() => Err(Interrupted::Cancelled),
            () = tokio::time::sleep_until(deadline) => Err(Interrupted::DeadlineExceeded),
        };
        match joined {
            Ok(Ok(Ok(()))) => WriterOutcome::Finished,
            Ok(Ok(Err(e))) => WriterOutcome::Failed(e),
            Ok(Err(join)) if join.is_panic() => WriterOutcome::Failed(
                io::Error::other("upload writer panicked").into(),
            ),
            Ok(Err(_)) => WriterOutcome::Finished,
            Err(reason) => {
                self.handle.abort();
                let _ = (&mut self.handle).await;
                WriterOutcome::Interrupted(reason)
            }
        }
    }
}

impl Drop for WriterTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_form_names_are_contiguous() {
        let attachments = vec![
            OutgoingAttachment::new("a.txt", b"aaa".to_vec()).with_content_type("text/plain"),
            OutgoingAttachment::new("empty.txt", Vec::new()),
            OutgoingAttachment::new("b.bin", b"bbb".to_vec()),
        ];
        let form = attachment_form(Bytes::from_static(b"{}"), &attachments);
        assert_eq!(form.len(), 3);

        let body = String::from_utf8(form.into_bytes().to_vec()).unwrap();
        assert!(body.contains("name=\"message\""));
        assert!(body.contains("name=\"file0\"; filename=\"a.txt\""));
        assert!(body.contains("name=\"file1\"; filename=\"b.bin\""));
        assert!(!body.contains("empty.txt"));
        assert!(body.contains("Content-Type: text/plain"));
        assert!(body.contains("Content-Type: application/octet-stream"));
    }

    async fn drain(mut reader: PipeReader) -> io::Result<Vec<u8>> {
        use tokio::io::AsyncReadExt;
        let mut out = Vec::new();
        reader.read_to_end(&mut out).await?;
        Ok(out)
    }

    fn pipe() -> (DuplexStream, oneshot::Sender<io::Result<()>>, PipeReader) {
        let (read, write) = tokio::io::duplex(64);
        let (tx, rx) = oneshot::channel();
        let reader = PipeReader {
            pipe: read,
            status: Some(rx),
        };
        (write, tx, reader)
    }

    #[tokio::test]
    async fn test_pipe_ends_cleanly_after_writer_success() {
        use tokio::io::AsyncWriteExt;
        let (mut write, tx, reader) = pipe();
        let pending = tokio::spawn(drain(reader));
        write.write_all(b"abc").await.unwrap();
        drop(write);
        tx.send(Ok(())).unwrap();
        assert_eq!(pending.await.unwrap().unwrap(), b"abc");
    }

    #[tokio::test]
    async fn test_pipe_fails_after_writer_error() {
        use tokio::io::AsyncWriteExt;
        let (mut write, tx, reader) = pipe();
        write.write_all(b"partial").await.unwrap();
        drop(write);
        tx.send(Err(io::Error::other("source vanished"))).unwrap();
        let err = drain(reader).await.unwrap_err();
        assert_eq!(err.to_string(), "source vanished");
    }

    #[tokio::test]
    async fn test_pipe_fails_when_writer_is_abandoned() {
        let (write, tx, reader) = pipe();
        drop(write);
        drop(tx);
        let err = drain(reader).await.unwrap_err();
        assert_eq!(err.to_string(), "upload writer stopped");
    }

    #[test]
    fn test_part_content_type_defaults() {
        assert_eq!(part_content_type(None).essence(), "application/octet-stream");
        assert_eq!(part_content_type(Some("")).essence(), "application/octet-stream");
        assert_eq!(part_content_type(Some("image/png")).essence(), "image/png");
    }
}
