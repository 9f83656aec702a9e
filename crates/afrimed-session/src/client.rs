//! The voice SDK boundary.
//!
//! The real SDK runs in the browser widget; this crate only consumes its
//! contract: fire-and-forget start/stop commands, with lifecycle and
//! message events delivered back over a channel. [`SimulatedVoiceClient`]
//! stands in for the SDK in tests and local development.

use crate::event::SdkEvent;
use afrimed_types::SpeakerRole;
use tokio::sync::mpsc;
use tracing::info;

/// Default capacity for the SDK event channel.
const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Command surface of the external voice SDK.
///
/// Both calls are fire-and-forget from the session's perspective:
/// completion (or failure) is observed later as [`SdkEvent`]s on the event
/// channel, never via a return value.
pub trait VoiceClient: Send + Sync + 'static {
    /// Asks the SDK to begin a call against the given assistant.
    fn start(&self, assistant_id: &str);

    /// Asks the SDK to hang up the active call.
    fn stop(&self);
}

/// A stand-in voice client that acknowledges commands with lifecycle
/// events and lets tests inject transcript and error events directly.
///
/// Clonable so a test can keep one handle for injecting events while the
/// session runner owns another.
#[derive(Debug, Clone)]
pub struct SimulatedVoiceClient {
    event_tx: mpsc::Sender<SdkEvent>,
}

impl SimulatedVoiceClient {
    /// Creates the client and the event receiver a session runner consumes.
    pub fn new() -> (Self, mpsc::Receiver<SdkEvent>) {
        let (event_tx, event_rx) = mpsc::channel(DEFAULT_EVENT_CAPACITY);
        (Self { event_tx }, event_rx)
    }

    /// Injects an arbitrary SDK event, as the real widget would deliver it.
    pub fn emit(&self, event: SdkEvent) {
        if self.event_tx.try_send(event).is_err() {
            tracing::warn!("simulated SDK event dropped (receiver closed or channel full)");
        }
    }

    /// Injects a transcript message event.
    pub fn emit_transcript(&self, role: SpeakerRole, text: impl Into<String>) {
        self.emit(SdkEvent::Message(crate::event::SdkMessage::transcript(
            role, text,
        )));
    }
}

impl VoiceClient for SimulatedVoiceClient {
    fn start(&self, assistant_id: &str) {
        info!(assistant_id, "simulated voice SDK starting call");
        self.emit(SdkEvent::CallStart);
    }

    fn stop(&self) {
        info!("simulated voice SDK stopping call");
        self.emit(SdkEvent::CallEnd);
    }
}
