//! Transcript storage and the audio-availability flag.
//!
//! Records live in a `Vec` in ID order. Because IDs are assigned as
//! `len + 1` under the same lock that pushes the record, a transcript with
//! ID `n` always sits at index `n - 1`, which turns `get` and
//! `mark_audio_available` into index lookups and `list_after` into a slice.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use visio_types::{transcript_audio_path, Transcript};

use crate::error::TranscriptError;

#[derive(Debug, Default)]
struct Inner {
    records: Vec<Transcript>,
}

impl Inner {
    fn slot(&self, id: u64) -> Option<usize> {
        let index = usize::try_from(id).ok()?.checked_sub(1)?;
        (index < self.records.len()).then_some(index)
    }
}

/// Shared handle to the process-wide transcript sequence.
///
/// Cloning the handle is cheap; every clone sees the same records.
#[derive(Debug, Clone, Default)]
pub struct TranscriptStore {
    inner: Arc<Mutex<Inner>>,
}

impl TranscriptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `std::sync::Mutex`: every critical section is a short `Vec`
    /// operation that never spans an `.await`.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                // Writers only push whole records or set a bool, so the data
                // behind a poisoned lock is still consistent.
                tracing::error!("transcript store lock poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    /// Appends a transcript with no advertised audio and returns the stored record.
    pub fn append(&self, text: impl Into<String>, is_user: bool) -> Transcript {
        self.insert(text.into(), is_user, false)
    }

    /// Appends a transcript whose `audio_url` points at its lazy-audio route.
    ///
    /// The URL embeds the ID, so it is computed inside the same critical
    /// section that assigns the ID.
    pub fn append_linked(&self, text: impl Into<String>, is_user: bool) -> Transcript {
        self.insert(text.into(), is_user, true)
    }

    fn insert(&self, text: String, is_user: bool, linked: bool) -> Transcript {
        let mut inner = self.lock();
        let id = inner.records.len() as u64 + 1;
        let transcript = Transcript {
            id,
            text,
            is_user,
            timestamp: Utc::now(),
            has_audio: false,
            audio_url: linked.then(|| transcript_audio_path(id)),
        };
        inner.records.push(transcript.clone());
        drop(inner);

        tracing::debug!(transcript_id = id, is_user, "appended transcript");
        transcript
    }

    /// Returns every transcript with `id > cursor`, oldest first.
    ///
    /// The full tail is always returned; there is no page size.
    pub fn list_after(&self, cursor: u64) -> Vec<Transcript> {
        let inner = self.lock();
        let start = usize::try_from(cursor)
            .unwrap_or(usize::MAX)
            .min(inner.records.len());
        inner.records[start..].to_vec()
    }

    /// Point lookup by ID.
    ///
    /// # Errors
    ///
    /// Returns `TranscriptError::NotFound` if no transcript has this ID.
    pub fn get(&self, id: u64) -> Result<Transcript, TranscriptError> {
        let inner = self.lock();
        inner
            .slot(id)
            .map(|index| inner.records[index].clone())
            .ok_or(TranscriptError::NotFound(id))
    }

    /// Sets `has_audio` on a transcript. Calling it again is a no-op success.
    ///
    /// # Errors
    ///
    /// Returns `TranscriptError::NotFound` if no transcript has this ID.
    pub fn mark_audio_available(&self, id: u64) -> Result<(), TranscriptError> {
        let mut inner = self.lock();
        let index = inner.slot(id).ok_or(TranscriptError::NotFound(id))?;
        let record = &mut inner.records[index];
        if !record.has_audio {
            record.has_audio = true;
            tracing::debug!(transcript_id = id, "audio marked available");
        }
        Ok(())
    }

    /// Number of stored transcripts.
    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
