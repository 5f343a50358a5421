//! Buffered `multipart/form-data` bodies.

use crate::boundary::{close_delimiter, generate_boundary, part_delimiter, validate_boundary};
use crate::content_type::ContentType;
use crate::error::Result;
use crate::header::PartHeaders;
use bytes::{BufMut, Bytes, BytesMut};

/// A single form part held in memory.
#[derive(Debug, Clone)]
pub struct Part {
    /// Part headers.
    pub headers: PartHeaders,
    /// Part body.
    pub body: Bytes,
}

impl Part {
    /// Creates a new part.
    #[must_use]
    pub const fn new(headers: PartHeaders, body: Bytes) -> Self {
        Self { headers, body }
    }
}

/// A form whose whole body is built in one pass.
#[derive(Debug, Clone)]
pub struct Form {
    boundary: String,
    parts: Vec<Part>,
}

impl Default for Form {
    fn default() -> Self {
        Self::new()
    }
}

impl Form {
    /// Creates an empty form with a random boundary.
    #[must_use]
    pub fn new() -> Self {
        Self {
            boundary: generate_boundary(),
            parts: Vec::new(),
        }
    }

    /// Creates an empty form with a fixed boundary.
    ///
    /// # Errors
    ///
    /// Returns an error if the boundary is not RFC 2046 compliant.
    pub fn with_boundary(boundary: impl Into<String>) -> Result<Self> {
        let boundary = boundary.into();
        validate_boundary(&boundary)?;
        Ok(Self {
            boundary,
            parts: Vec::new(),
        })
    }

    /// Returns the boundary.
    #[must_use]
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Returns the `multipart/form-data` type that matches this body.
    #[must_use]
    pub fn content_type(&self) -> ContentType {
        ContentType::form_data(&self.boundary)
    }

    /// Adds a plain text field.
    pub fn text(&mut self, name: &str, value: impl Into<String>) -> &mut Self {
        let value: String = value.into();
        self.parts.push(Part::new(
            PartHeaders::form_field(name, None),
            Bytes::from(value),
        ));
        self
    }

    /// Adds a field with an explicit content type.
    pub fn field(&mut self, name: &str, content_type: &ContentType, body: impl Into<Bytes>) -> &mut Self {
        self.parts.push(Part::new(
            PartHeaders::form_field(name, Some(content_type)),
            body.into(),
        ));
        self
    }

    /// Adds a file part.
    pub fn file(
        &mut self,
        name: &str,
        filename: &str,
        content_type: &ContentType,
        body: impl Into<Bytes>,
    ) -> &mut Self {
        self.parts.push(Part::new(
            PartHeaders::form_file(name, filename, content_type),
            body.into(),
        ));
        self
    }

    /// Returns the parts added so far.
    #[must_use]
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Returns the number of parts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Returns true if no parts have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Exact length of the encoded body.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        let mut len = close_delimiter(&self.boundary, self.parts.is_empty()).len();
        for (i, part) in self.parts.iter().enumerate() {
            len += part_delimiter(&self.boundary, i == 0).len();
            len += part.headers.encode().len();
            len += part.body.len();
        }
        len
    }

    /// Encodes the complete body.
    #[must_use]
    pub fn into_bytes(self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.encoded_len());
        for (i, part) in self.parts.iter().enumerate() {
            buf.put_slice(part_delimiter(&self.boundary, i == 0).as_bytes());
            buf.put_slice(part.headers.encode().as_bytes());
            buf.put_slice(&part.body);
        }
        buf.put_slice(close_delimiter(&self.boundary, self.parts.is_empty()).as_bytes());
        buf.freeze()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_encode_field_and_file() {
        let mut form = Form::with_boundary("XyZ").unwrap();
        form.field("message", &ContentType::application_json(), "{\"a\":1}");
        form.file("file0", "a.txt", &ContentType::new("text", "plain"), b"hello".to_vec());

        let body = form.into_bytes();
        let expected = "--XyZ\r\n\
             Content-Disposition: form-data; name=\"message\"\r\n\
             Content-Type: application/json\r\n\r\n\
             {\"a\":1}\
             \r\n--XyZ\r\n\
             Content-Disposition: form-data; name=\"file0\"; filename=\"a.txt\"\r\n\
             Content-Type: text/plain\r\n\r\n\
             hello\
             \r\n--XyZ--\r\n";
        assert_eq!(std::str::from_utf8(&body).unwrap(), expected);
    }

    #[test]
    fn test_empty_form() {
        let form = Form::with_boundary("b").unwrap();
        assert!(form.is_empty());
        assert_eq!(&form.into_bytes()[..], b"--b--\r\n");
    }

    #[test]
    fn test_content_type_matches_boundary() {
        let form = Form::new();
        assert_eq!(
            form.content_type().to_string(),
            format!("multipart/form-data; boundary={}", form.boundary())
        );
    }

    #[test]
    fn test_rejects_invalid_boundary() {
        assert!(Form::with_boundary("bad\"boundary").is_err());
    }

    proptest! {
        #[test]
        fn encoded_len_is_exact(
            fields in proptest::collection::vec(("[a-z]{1,8}", proptest::collection::vec(any::<u8>(), 0..64)), 0..6)
        ) {
            let mut form = Form::new();
            for (i, (name, body)) in fields.iter().enumerate() {
                if i % 2 == 0 {
                    form.file(name, "f.bin", &ContentType::octet_stream(), body.clone());
                } else {
                    form.text(name, String::from_utf8_lossy(body).into_owned());
                }
            }
            let expected = form.encoded_len();
            let boundary = form.boundary().to_string();
            let parts = form.len();
            let body = form.into_bytes();
            prop_assert_eq!(body.len(), expected);
            let delimiter = format!("--{boundary}\r\n");
            let opened = body
                .windows(delimiter.len())
                .filter(|w| *w == delimiter.as_bytes())
                .count();
            prop_assert_eq!(opened, parts);
        }
    }
}
