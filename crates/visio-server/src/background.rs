//! Background tasks for the Visio server.
//!
//! Includes:
//! - The eager audio fulfillment worker.
//! - The startup greeting transcript.

use crate::AppState;
use tokio::task::JoinHandle;
use visio_types::Transcript;
use visio_voice::FulfillmentWorker;

/// Assistant line appended when the server starts.
pub const GREETING: &str = "Welcome to your Vision Assistant! I'm ready to help you navigate \
and identify objects. Try saying 'Take me to train station' to get started.";

/// Spawns the eager fulfillment worker on its own task.
///
/// The task ends once every `AppState` clone (and with it the queue sender)
/// has been dropped.
pub fn spawn_fulfillment_worker(worker: FulfillmentWorker) -> JoinHandle<()> {
    tokio::spawn(worker.run())
}

/// Appends the welcome transcript and queues its audio.
///
/// `has_audio` stays false until the provider call succeeds.
pub fn seed_greeting(state: &AppState) -> Transcript {
    let greeting = state.transcripts.append_linked(GREETING, false);
    state.fulfillment.on_transcript_created(&greeting);
    tracing::info!(transcript_id = greeting.id, "seeded greeting transcript");
    greeting
}
