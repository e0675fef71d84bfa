//! Audio fulfillment: the bridge between stored transcripts and the
//! text-to-speech provider.
//!
//! Two paths lead to a transcript's `has_audio` flag:
//!
//! - **Eager**: [`AudioFulfillment::on_transcript_created`] queues a job for
//!   every assistant transcript. A [`FulfillmentWorker`] drains the queue on its
//!   own task and spawns one detached task per job, so the creating request
//!   never waits on the provider. Failures are logged and dropped.
//! - **Lazy**: [`AudioFulfillment::fetch_audio`] synthesizes on the caller's
//!   task and hands the bytes back.
//!
//! Both paths finish with the idempotent
//! [`TranscriptStore::mark_audio_available`], so an eager job racing a lazy
//! fetch for the same ID costs at most one extra provider call.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use visio_transcripts::TranscriptStore;
use visio_types::Transcript;

use crate::config::ProviderConfig;
use crate::error::VoiceError;
use crate::tts::SpeechSynthesizer;

/// One queued eager synthesis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FulfillmentJob {
    pub transcript_id: u64,
    pub text: String,
}

/// IDs whose eager job is queued or running.
#[derive(Debug, Clone, Default)]
struct InFlight(Arc<Mutex<HashSet<u64>>>);

impl InFlight {
    /// Returns `false` if the ID was already claimed.
    fn claim(&self, id: u64) -> bool {
        match self.0.lock() {
            Ok(mut set) => set.insert(id),
            Err(poisoned) => poisoned.into_inner().insert(id),
        }
    }

    fn release(&self, id: u64) {
        match self.0.lock() {
            Ok(mut set) => set.remove(&id),
            Err(poisoned) => poisoned.into_inner().remove(&id),
        };
    }
}

/// Tunables for [`AudioFulfillment`].
#[derive(Debug, Clone)]
pub struct FulfillmentSettings {
    /// When `false`, a lazy fetch on a transcript that already has audio
    /// fails with [`VoiceError::AudioUnavailable`].
    pub reserve_fulfilled_audio: bool,
}

impl Default for FulfillmentSettings {
    fn default() -> Self {
        Self {
            reserve_fulfilled_audio: true,
        }
    }
}

impl From<&ProviderConfig> for FulfillmentSettings {
    fn from(config: &ProviderConfig) -> Self {
        Self {
            reserve_fulfilled_audio: config.reserve_fulfilled_audio,
        }
    }
}

/// Entry points for producing transcript audio.
pub struct AudioFulfillment {
    store: TranscriptStore,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    queue: mpsc::UnboundedSender<FulfillmentJob>,
    in_flight: InFlight,
    settings: FulfillmentSettings,
}

impl std::fmt::Debug for AudioFulfillment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioFulfillment")
            .field("transcripts", &self.store.len())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl AudioFulfillment {
    /// Creates the service and the worker that runs its eager jobs.
    ///
    /// The worker does nothing until [`FulfillmentWorker::run`] is spawned. It
    /// stops once this service (the only queue sender) is dropped.
    pub fn new(
        store: TranscriptStore,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        settings: FulfillmentSettings,
    ) -> (Self, FulfillmentWorker) {
        let (tx, rx) = mpsc::unbounded_channel();
        let in_flight = InFlight::default();
        let worker = FulfillmentWorker {
            jobs: rx,
            store: store.clone(),
            synthesizer: Arc::clone(&synthesizer),
            in_flight: in_flight.clone(),
        };
        let service = Self {
            store,
            synthesizer,
            queue: tx,
            in_flight,
            settings,
        };
        (service, worker)
    }

    /// Schedules eager fulfillment for an assistant transcript.
    ///
    /// Returns `true` if a job was queued. User transcripts, transcripts that
    /// already have audio, and IDs with a job already in flight are skipped.
    /// Never blocks and never fails.
    pub fn on_transcript_created(&self, transcript: &Transcript) -> bool {
        if transcript.is_user || transcript.has_audio {
            return false;
        }
        if !self.in_flight.claim(transcript.id) {
            tracing::debug!(transcript_id = transcript.id, "eager fulfillment already in flight");
            return false;
        }

        let job = FulfillmentJob {
            transcript_id: transcript.id,
            text: transcript.text.clone(),
        };
        if let Err(e) = self.queue.send(job) {
            self.in_flight.release(transcript.id);
            tracing::warn!(
                transcript_id = transcript.id,
                "fulfillment queue closed, eager job dropped: {}",
                e
            );
            return false;
        }
        true
    }

    /// Returns audio for a stored transcript, synthesizing it on demand.
    ///
    /// # Errors
    ///
    /// - `VoiceError::NotFound` if the transcript does not exist.
    /// - `VoiceError::AudioUnavailable` if audio was already generated and
    ///   re-serving is disabled.
    /// - Any provider error from the synthesizer, unchanged.
    pub async fn fetch_audio(&self, id: u64, voice: Option<&str>) -> Result<Vec<u8>, VoiceError> {
        let transcript = self.store.get(id)?;

        if transcript.has_audio && !self.settings.reserve_fulfilled_audio {
            return Err(VoiceError::AudioUnavailable(id));
        }

        let audio = self.synthesizer.synthesize(&transcript.text, voice).await?;
        self.store.mark_audio_available(id)?;
        tracing::info!(transcript_id = id, bytes = audio.len(), "served transcript audio");
        Ok(audio)
    }

    /// Synthesizes arbitrary text without touching the store.
    pub async fn generate(&self, text: &str, voice: Option<&str>) -> Result<Vec<u8>, VoiceError> {
        self.synthesizer.synthesize(text, voice).await
    }
}

/// Drains the eager fulfillment queue.
pub struct FulfillmentWorker {
    jobs: mpsc::UnboundedReceiver<FulfillmentJob>,
    store: TranscriptStore,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    in_flight: InFlight,
}

impl FulfillmentWorker {
    /// Runs until every queue sender is dropped.
    ///
    /// Each job is spawned on its own task; a slow provider call never holds
    /// up the next job.
    pub async fn run(mut self) {
        tracing::info!("starting audio fulfillment worker");

        while let Some(job) = self.jobs.recv().await {
            let store = self.store.clone();
            let synthesizer = Arc::clone(&self.synthesizer);
            let in_flight = self.in_flight.clone();
            tokio::spawn(async move {
                let id = job.transcript_id;
                fulfill(&store, synthesizer.as_ref(), job).await;
                in_flight.release(id);
            });
        }

        tracing::info!("fulfillment queue closed, worker stopping");
    }
}

async fn fulfill(store: &TranscriptStore, synthesizer: &dyn SpeechSynthesizer, job: FulfillmentJob) {
    let id = job.transcript_id;

    match store.get(id) {
        Ok(t) if t.has_audio => {
            tracing::debug!(transcript_id = id, "audio already available, skipping eager job");
            return;
        }
        Ok(_) => {}
        Err(e) => {
            tracing::warn!(transcript_id = id, "eager fulfillment skipped: {}", e);
            return;
        }
    }

    match synthesizer.synthesize(&job.text, None).await {
        Ok(audio) => match store.mark_audio_available(id) {
            Ok(()) => {
                tracing::info!(transcript_id = id, bytes = audio.len(), "generated voice for transcript");
            }
            Err(e) => tracing::warn!(transcript_id = id, "failed to record audio: {}", e),
        },
        Err(e) => {
            tracing::warn!(transcript_id = id, "background voice generation failed: {}", e);
        }
    }
}
