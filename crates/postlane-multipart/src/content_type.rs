//! Content types for form parts and the outer request.

use crate::error::{Error, Result};
use std::fmt;

/// MIME content type with parameters.
///
/// Parameters keep their insertion order so the rendered header is stable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    /// Main type (e.g., "application", "image", "multipart").
    pub main_type: String,
    /// Subtype (e.g., "json", "png", "form-data").
    pub sub_type: String,
    /// Parameters (e.g., charset=utf-8, boundary=xxx).
    pub parameters: Vec<(String, String)>,
}

impl ContentType {
    /// Creates a new content type.
    #[must_use]
    pub fn new(main_type: impl Into<String>, sub_type: impl Into<String>) -> Self {
        Self {
            main_type: main_type.into(),
            sub_type: sub_type.into(),
            parameters: Vec::new(),
        }
    }

    /// Creates an application/json content type.
    #[must_use]
    pub fn application_json() -> Self {
        Self::new("application", "json")
    }

    /// Creates the generic binary content type used when none is known.
    #[must_use]
    pub fn octet_stream() -> Self {
        Self::new("application", "octet-stream")
    }

    /// Creates a multipart/form-data content type with boundary.
    #[must_use]
    pub fn form_data(boundary: impl Into<String>) -> Self {
        Self::new("multipart", "form-data").with_parameter("boundary", boundary)
    }

    /// Adds a parameter, replacing an existing one with the same name.
    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into().to_lowercase();
        let value = value.into();
        if let Some(existing) = self.parameters.iter_mut().find(|(k, _)| *k == key) {
            existing.1 = value;
        } else {
            self.parameters.push((key, value));
        }
        self
    }

    /// Returns `type/subtype` without parameters.
    #[must_use]
    pub fn essence(&self) -> String {
        format!("{}/{}", self.main_type, self.sub_type)
    }

    /// Parses a content type string.
    ///
    /// Format: `type/subtype; param1=value1; param2=value2`
    ///
    /// Parameters whose name is not a token are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the format is invalid or the type is not made of
    /// token characters.
    pub fn parse(s: &str) -> Result<Self> {
        let mut parts = s.split(';');

        let type_str = parts
            .next()
            .ok_or_else(|| Error::InvalidContentType("Empty content type".to_string()))?
            .trim();

        let (main_type, sub_type) = type_str
            .split_once('/')
            .ok_or_else(|| Error::InvalidContentType(format!("Missing subtype in {s:?}")))?;
        let main_type = main_type.trim().to_lowercase();
        let sub_type = sub_type.trim().to_lowercase();
        if !is_token(&main_type) || !is_token(&sub_type) {
            return Err(Error::InvalidContentType(s.to_string()));
        }

        let mut content_type = Self::new(main_type, sub_type);

        for param in parts {
            let param = param.trim();
            if let Some((key, value)) = param.split_once('=')
                && is_token(key.trim())
            {
                content_type = content_type.with_parameter(key.trim(), value.trim().trim_matches('"'));
            }
        }

        Ok(content_type)
    }

    /// Parses a content type, falling back to `application/octet-stream` when
    /// the input is empty or malformed.
    #[must_use]
    pub fn parse_or_octet_stream(s: &str) -> Self {
        if s.trim().is_empty() {
            return Self::octet_stream();
        }
        Self::parse(s).unwrap_or_else(|_| Self::octet_stream())
    }
}

const TSPECIALS: &str = "()<>@,;:\\\"/[]?=";

/// RFC 2045 token: printable ASCII without spaces or tspecials.
fn is_token(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_graphic() && !TSPECIALS.contains(c))
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let main = &self.main_type;
        let sub = &self.sub_type;
        write!(f, "{main}/{sub}")?;

        for (key, value) in &self.parameters {
            // Control characters would end the header line.
            let value: String = value.chars().filter(|c| !c.is_control()).collect();
            if is_token(&value) {
                write!(f, "; {key}={value}")?;
            } else {
                f.write_str("; ")?;
                f.write_str(key)?;
                f.write_str("=\"")?;
                for c in value.chars() {
                    if c == '"' || c == '\\' {
                        f.write_str("\\")?;
                    }
                    write!(f, "{c}")?;
                }
                f.write_str("\"")?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_form_data() {
        let ct = ContentType::form_data("abc123");
        assert_eq!(ct.essence(), "multipart/form-data");
        assert_eq!(ct.parameters, vec![("boundary".to_string(), "abc123".to_string())]);
        assert_eq!(ct.to_string(), "multipart/form-data; boundary=abc123");
    }

    #[test]
    fn test_parse_with_quoted_boundary() {
        let ct = ContentType::parse("multipart/form-data; boundary=\"a=b\"").unwrap();
        assert_eq!(ct.parameters[0].1, "a=b");
        assert_eq!(ct.to_string(), "multipart/form-data; boundary=\"a=b\"");
    }

    #[test]
    fn test_parse_lowercases_type() {
        let ct = ContentType::parse("Image/PNG").unwrap();
        assert_eq!(ct.essence(), "image/png");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(ContentType::parse("text").is_err());
        assert!(ContentType::parse("/plain").is_err());
        assert!(ContentType::parse("text/").is_err());
        assert!(ContentType::parse("a/b/c").is_err());
        assert!(ContentType::parse("text/plain\r\nX-Injected: 1").is_err());
    }

    #[test]
    fn test_display_strips_line_breaks_from_parameters() {
        let ct = ContentType::parse("text/plain; x=\"a\r\nb\"").unwrap();
        assert_eq!(ct.to_string(), "text/plain; x=ab");

        let ct = ContentType::new("text", "plain").with_parameter("name", "say \"hi\"\r\n");
        assert_eq!(ct.to_string(), "text/plain; name=\"say \\\"hi\\\"\"");
    }

    #[test]
    fn test_parse_skips_malformed_parameter_names() {
        let ct = ContentType::parse("text/plain; bad key=1; charset=utf-8").unwrap();
        assert_eq!(ct.to_string(), "text/plain; charset=utf-8");
    }

    #[test]
    fn test_parse_or_octet_stream() {
        assert_eq!(
            ContentType::parse_or_octet_stream(""),
            ContentType::octet_stream()
        );
        assert_eq!(
            ContentType::parse_or_octet_stream("garbage"),
            ContentType::octet_stream()
        );
        assert_eq!(
            ContentType::parse_or_octet_stream("application/pdf").essence(),
            "application/pdf"
        );
    }

    #[test]
    fn test_with_parameter_replaces() {
        let ct = ContentType::new("text", "plain")
            .with_parameter("charset", "us-ascii")
            .with_parameter("Charset", "utf-8");
        assert_eq!(ct.parameters.len(), 1);
        assert_eq!(ct.to_string(), "text/plain; charset=utf-8");
    }
}
