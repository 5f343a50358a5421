//! Checks every backend runs before touching its data.

use postlane::{Context, Error, Result};

/// Returns `value`, or [`Error::InvalidInput`] naming `field` when blank.
pub(crate) fn require<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    if value.trim().is_empty() {
        return Err(Error::missing(field));
    }
    Ok(value)
}

/// Fails the way a throttled client would when `ctx` has already ended.
pub(crate) fn live(ctx: &Context) -> Result<()> {
    match ctx.interruption() {
        Some(reason) => Err(Error::RateLimitAborted(reason)),
        None => Ok(()),
    }
}
