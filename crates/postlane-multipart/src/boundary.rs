//! Multipart boundary generation and validation.

use crate::error::{Error, Result};
use rand::Rng;
use rand::distributions::Alphanumeric;

/// Number of random characters in a generated boundary.
const BOUNDARY_RANDOM_LEN: usize = 32;

/// Maximum boundary length allowed by RFC 2046.
const MAX_BOUNDARY_LEN: usize = 70;

/// Generates a random boundary.
#[must_use]
pub fn generate_boundary() -> String {
    let random: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(BOUNDARY_RANDOM_LEN)
        .map(char::from)
        .collect();
    format!("postlane-{random}")
}

/// Validates a caller-supplied boundary against RFC 2046 `bchars`.
///
/// # Errors
///
/// Returns an error if the boundary is empty, longer than 70 characters,
/// ends with a space or contains characters outside the allowed set.
pub fn validate_boundary(boundary: &str) -> Result<()> {
    if boundary.is_empty() || boundary.len() > MAX_BOUNDARY_LEN {
        return Err(Error::InvalidBoundary(format!(
            "length must be 1-{MAX_BOUNDARY_LEN}, got {}",
            boundary.len()
        )));
    }
    if boundary.ends_with(' ') {
        return Err(Error::InvalidBoundary(
            "boundary must not end with a space".to_string(),
        ));
    }
    if let Some(c) = boundary.chars().find(|c| !is_bchar(*c)) {
        return Err(Error::InvalidBoundary(format!("illegal character {c:?}")));
    }
    Ok(())
}

const fn is_bchar(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '\'' | '(' | ')' | '+' | '_' | ',' | '-' | '.' | '/' | ':' | '=' | '?' | ' '
        )
}

/// Delimiter that opens a part; the first part has no leading CRLF.
pub(crate) fn part_delimiter(boundary: &str, first: bool) -> String {
    if first {
        format!("--{boundary}\r\n")
    } else {
        format!("\r\n--{boundary}\r\n")
    }
}

/// Delimiter that closes the body.
pub(crate) fn close_delimiter(boundary: &str, empty: bool) -> String {
    if empty {
        format!("--{boundary}--\r\n")
    } else {
        format!("\r\n--{boundary}--\r\n")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_boundary_is_valid() {
        let boundary = generate_boundary();
        assert!(boundary.starts_with("postlane-"));
        validate_boundary(&boundary).unwrap();
    }

    #[test]
    fn test_generated_boundaries_differ() {
        assert_ne!(generate_boundary(), generate_boundary());
    }

    #[test]
    fn test_validate_rejects_bad_boundaries() {
        assert!(validate_boundary("").is_err());
        assert!(validate_boundary(&"a".repeat(71)).is_err());
        assert!(validate_boundary("trailing ").is_err());
        assert!(validate_boundary("semi;colon").is_err());
        assert!(validate_boundary("quote\"").is_err());
    }

    #[test]
    fn test_delimiters() {
        assert_eq!(part_delimiter("b", true), "--b\r\n");
        assert_eq!(part_delimiter("b", false), "\r\n--b\r\n");
        assert_eq!(close_delimiter("b", false), "\r\n--b--\r\n");
        assert_eq!(close_delimiter("b", true), "--b--\r\n");
    }
}
