//! Error types for the transcript store.

/// Errors returned by [`TranscriptStore`](crate::TranscriptStore) lookups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranscriptError {
    /// No transcript carries the requested ID.
    #[error("transcript not found: {0}")]
    NotFound(u64),
}
