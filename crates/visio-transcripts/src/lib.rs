//! In-memory transcript store for the Visio voice backend.
//!
//! Transcripts are held in creation order for the lifetime of the process.
//! IDs are assigned by the store, start at 1 and never skip or repeat. The
//! only mutation after creation is the one-way `has_audio` flip performed by
//! audio fulfillment.
//!
//! # Usage
//!
//! ```rust
//! use visio_transcripts::TranscriptStore;
//!
//! let store = TranscriptStore::new();
//! let hello = store.append("Hello", true);
//! let reply = store.append("Hi there", false);
//! assert_eq!((hello.id, reply.id), (1, 2));
//!
//! store.mark_audio_available(reply.id).unwrap();
//! assert_eq!(store.list_after(1).len(), 1);
//! ```

mod error;
mod store;

pub use error::TranscriptError;
pub use store::TranscriptStore;
