//! Per-part headers.

use crate::content_type::ContentType;
use std::fmt::Write as _;

/// Ordered headers of a single form part.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartHeaders {
    headers: Vec<(String, String)>,
}

impl PartHeaders {
    /// Creates a new empty header collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Headers for a plain form field.
    #[must_use]
    pub fn form_field(name: &str, content_type: Option<&ContentType>) -> Self {
        let mut headers = Self::new();
        headers.set(
            "Content-Disposition",
            format!("form-data; name=\"{}\"", escape_quoted(name)),
        );
        if let Some(ct) = content_type {
            headers.set("Content-Type", ct.to_string());
        }
        headers
    }

    /// Headers for a file part carrying its original filename.
    #[must_use]
    pub fn form_file(name: &str, filename: &str, content_type: &ContentType) -> Self {
        let mut headers = Self::new();
        headers.set(
            "Content-Disposition",
            format!(
                "form-data; name=\"{}\"; filename=\"{}\"",
                escape_quoted(name),
                escape_quoted(filename)
            ),
        );
        headers.set("Content-Type", content_type.to_string());
        headers
    }

    /// Sets a header value, replacing any existing value (case-insensitive).
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(existing) = self
            .headers
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(&name))
        {
            existing.1 = value;
        } else {
            self.headers.push((name, value));
        }
    }

    /// Renders the header block including the blank line that ends it.
    #[must_use]
    pub fn encode(&self) -> String {
        let mut out = String::new();
        for (name, value) in &self.headers {
            let _ = write!(out, "{name}: {value}\r\n");
        }
        out.push_str("\r\n");
        out
    }
}

/// Escapes a value for a quoted `Content-Disposition` parameter.
///
/// Matches the encoding browsers apply to form submissions: `"`, CR and LF
/// are percent-encoded and everything else is kept as is.
pub(crate) fn escape_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => out.push_str("%22"),
            '\r' => out.push_str("%0D"),
            '\n' => out.push_str("%0A"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_form_field_headers() {
        let headers = PartHeaders::form_field("message", Some(&ContentType::application_json()));
        assert_eq!(
            headers.encode(),
            "Content-Disposition: form-data; name=\"message\"\r\nContent-Type: application/json\r\n\r\n"
        );
    }

    #[test]
    fn test_form_file_headers() {
        let headers = PartHeaders::form_file("file0", "report.pdf", &ContentType::new("application", "pdf"));
        assert_eq!(
            headers.encode(),
            "Content-Disposition: form-data; name=\"file0\"; filename=\"report.pdf\"\r\n\
             Content-Type: application/pdf\r\n\r\n"
        );
    }

    #[test]
    fn test_escape_quoted() {
        assert_eq!(escape_quoted("a\"b"), "a%22b");
        assert_eq!(escape_quoted("line\r\nbreak"), "line%0D%0Abreak");
        assert_eq!(escape_quoted("back\\slash"), "back\\slash");
    }

    #[test]
    fn test_set_replaces_case_insensitive() {
        let mut headers = PartHeaders::new();
        headers.set("Content-Type", "text/plain");
        headers.set("content-type", "text/html");
        assert_eq!(headers.encode(), "Content-Type: text/html\r\n\r\n");
    }

    proptest! {
        #[test]
        fn escaped_filenames_never_break_the_header(name in ".*") {
            let escaped = escape_quoted(&name);
            prop_assert!(!escaped.contains('"'));
            prop_assert!(!escaped.contains('\r'));
            prop_assert!(!escaped.contains('\n'));
        }
    }
}
