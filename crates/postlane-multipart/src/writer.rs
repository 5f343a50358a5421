//! Streaming `multipart/form-data` encoder.
//!
//! Writes parts directly into an `AsyncWrite` so a body can be transmitted
//! while it is still being produced. File content is copied from an
//! `AsyncRead` without being collected in memory.

use crate::boundary::{close_delimiter, generate_boundary, part_delimiter, validate_boundary};
use crate::content_type::ContentType;
use crate::error::{Error, Result};
use crate::header::PartHeaders;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

/// Incremental multipart encoder over an async sink.
#[derive(Debug)]
pub struct MultipartWriter<W> {
    inner: W,
    boundary: String,
    parts_written: usize,
    finished: bool,
}

impl<W: AsyncWrite + Unpin> MultipartWriter<W> {
    /// Creates a writer with a random boundary.
    #[must_use]
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            boundary: generate_boundary(),
            parts_written: 0,
            finished: false,
        }
    }

    /// Creates a writer with a fixed boundary.
    ///
    /// # Errors
    ///
    /// Returns an error if the boundary is not RFC 2046 compliant.
    pub fn with_boundary(inner: W, boundary: impl Into<String>) -> Result<Self> {
        let boundary = boundary.into();
        validate_boundary(&boundary)?;
        Ok(Self {
            inner,
            boundary,
            parts_written: 0,
            finished: false,
        })
    }

    /// Returns the boundary.
    #[must_use]
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Returns the `multipart/form-data` type that matches this body.
    ///
    /// Use this verbatim as the request's `Content-Type`.
    #[must_use]
    pub fn content_type(&self) -> ContentType {
        ContentType::form_data(&self.boundary)
    }

    /// Number of parts written so far.
    #[must_use]
    pub const fn parts_written(&self) -> usize {
        self.parts_written
    }

    async fn open_part(&mut self, headers: &PartHeaders) -> Result<()> {
        if self.finished {
            return Err(Error::Finished);
        }
        let delimiter = part_delimiter(&self.boundary, self.parts_written == 0);
        self.inner.write_all(delimiter.as_bytes()).await?;
        self.inner.write_all(headers.encode().as_bytes()).await?;
        self.parts_written += 1;
        Ok(())
    }

    /// Writes a form field whose value is already in memory.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the sink fails.
    pub async fn write_field(
        &mut self,
        name: &str,
        value: &[u8],
        content_type: Option<&ContentType>,
    ) -> Result<()> {
        self.open_part(&PartHeaders::form_field(name, content_type))
            .await?;
        self.inner.write_all(value).await?;
        Ok(())
    }

    /// Writes a file part, copying its content from `reader`.
    ///
    /// Returns the number of content bytes copied.
    ///
    /// # Errors
    ///
    /// Returns an error if reading the source or writing the sink fails.
    /// A source failure surfaces as [`Error::Io`] with the source's error.
    pub async fn write_file<R>(
        &mut self,
        name: &str,
        filename: &str,
        content_type: &ContentType,
        reader: &mut R,
    ) -> Result<u64>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        self.open_part(&PartHeaders::form_file(name, filename, content_type))
            .await?;
        let copied = tokio::io::copy(reader, &mut self.inner).await?;
        Ok(copied)
    }

    /// Writes the closing delimiter, flushes and shuts down the sink.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the sink fails.
    pub async fn finish(mut self) -> Result<W> {
        if self.finished {
            return Err(Error::Finished);
        }
        self.finished = true;
        let close = close_delimiter(&self.boundary, self.parts_written == 0);
        self.inner.write_all(close.as_bytes()).await?;
        self.inner.flush().await?;
        self.inner.shutdown().await?;
        Ok(self.inner)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::form::Form;
    use std::io;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tokio::io::{AsyncReadExt, ReadBuf};

    /// Source that yields a prefix and then fails.
    struct FailingReader {
        prefix: Option<Vec<u8>>,
    }

    impl AsyncRead for FailingReader {
        fn poll_read(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            match self.prefix.take() {
                Some(bytes) => {
                    buf.put_slice(&bytes);
                    Poll::Ready(Ok(()))
                }
                None => Poll::Ready(Err(io::Error::other("disk unplugged"))),
            }
        }
    }

    #[tokio::test]
    async fn test_streamed_matches_buffered() {
        let mut buffered = Form::with_boundary("same").unwrap();
        buffered.field("message", &ContentType::application_json(), "{}");
        buffered.file("file", "x.bin", &ContentType::octet_stream(), b"0123456789".to_vec());
        let expected = buffered.into_bytes();

        let mut writer = MultipartWriter::with_boundary(Vec::new(), "same").unwrap();
        writer
            .write_field("message", b"{}", Some(&ContentType::application_json()))
            .await
            .unwrap();
        let mut source: &[u8] = b"0123456789";
        let copied = writer
            .write_file("file", "x.bin", &ContentType::octet_stream(), &mut source)
            .await
            .unwrap();
        assert_eq!(copied, 10);
        let out = writer.finish().await.unwrap();

        assert_eq!(out, expected.to_vec());
    }

    #[tokio::test]
    async fn test_through_duplex_pipe() {
        let (mut rx, tx) = tokio::io::duplex(16);
        let mut writer = MultipartWriter::new(tx);
        let boundary = writer.boundary().to_string();

        let producer = tokio::spawn(async move {
            let mut source: &[u8] = &[7u8; 1000];
            writer
                .write_file("file", "big.bin", &ContentType::octet_stream(), &mut source)
                .await?;
            writer.finish().await.map(|_| ())
        });

        let mut received = Vec::new();
        rx.read_to_end(&mut received).await.unwrap();
        producer.await.unwrap().unwrap();

        assert!(received.starts_with(format!("--{boundary}\r\n").as_bytes()));
        assert!(received.ends_with(format!("\r\n--{boundary}--\r\n").as_bytes()));
        assert_eq!(received.iter().filter(|b| **b == 7).count(), 1000);
    }

    #[tokio::test]
    async fn test_source_error_propagates() {
        let mut writer = MultipartWriter::new(Vec::new());
        let mut source = FailingReader {
            prefix: Some(b"partial".to_vec()),
        };
        let err = writer
            .write_file("file", "x", &ContentType::octet_stream(), &mut source)
            .await
            .unwrap_err();
        assert_eq!(err.io_kind(), Some(io::ErrorKind::Other));
        assert!(err.to_string().contains("disk unplugged"));
    }

    #[tokio::test]
    async fn test_content_type_uses_writer_boundary() {
        let writer = MultipartWriter::with_boundary(Vec::new(), "abc").unwrap();
        assert_eq!(
            writer.content_type().to_string(),
            "multipart/form-data; boundary=abc"
        );
    }
}
