//! Error types for the scoring and caching seams.
//!
//! The score engine is total over clamped numeric input, so its only failure
//! mode is an unrecognized variant tag. Cache internals use `anyhow::Result`
//! with context, matching the rest of the IO layer; the `Origin` trait gets
//! its own error type so the serve path can tell a failed fetch apart from a
//! response that merely carries an error status.

use thiserror::Error;

/// Contract violations in the score engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreError {
    /// The variant tag did not name a known scoring formula. This is a caller
    /// bug, never a user-data problem, and is signalled distinctly so it can
    /// never be mistaken for a computed score.
    #[error("unknown score variant '{0}' (expected one of: original, sodium-adjusted, three-factor)")]
    InvalidVariant(String),
}

/// Failure to reach the origin at all.
///
/// An origin that answers with a 404 or 500 still produces a [`Response`];
/// `FetchError` is reserved for the transport-level case (offline,
/// unreachable root directory) where no response exists.
///
/// [`Response`]: crate::cache::Response
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("origin unreachable: {0}")]
    Unreachable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_variant_names_the_tag() {
        let err = ScoreError::InvalidVariant("meld-4".to_string());
        assert!(err.to_string().contains("meld-4"));
        assert!(err.to_string().contains("sodium-adjusted"));
    }

    #[test]
    fn fetch_error_carries_reason() {
        let err = FetchError::Unreachable("network down".to_string());
        assert!(err.to_string().contains("network down"));
    }
}
