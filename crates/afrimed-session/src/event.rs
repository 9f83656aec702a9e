//! Types crossing the voice SDK boundary.
//!
//! The SDK's callback surface is re-expressed as an explicit event stream:
//! the client delivers [`SdkEvent`]s over a channel, and the session state
//! machine answers user commands with [`SdkCommand`]s for the runner to
//! execute. This keeps the machine pure and testable without the SDK.

use afrimed_types::SpeakerRole;
use serde::Deserialize;

/// The `type` value the SDK puts on transcript messages. Other message
/// kinds (speech updates, metadata) are delivered but ignored.
pub const TRANSCRIPT_MESSAGE_KIND: &str = "transcript";

/// A streaming message from the voice SDK.
///
/// `role` and `transcript` are only guaranteed present when `kind` is
/// [`TRANSCRIPT_MESSAGE_KIND`].
#[derive(Debug, Clone, Deserialize)]
pub struct SdkMessage {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub role: Option<SpeakerRole>,
    #[serde(default)]
    pub transcript: Option<String>,
}

impl SdkMessage {
    /// Convenience constructor for a transcript message.
    pub fn transcript(role: SpeakerRole, text: impl Into<String>) -> Self {
        Self {
            kind: TRANSCRIPT_MESSAGE_KIND.to_string(),
            role: Some(role),
            transcript: Some(text.into()),
        }
    }
}

/// Lifecycle and message events delivered by the voice SDK.
#[derive(Debug, Clone)]
pub enum SdkEvent {
    /// The call connected.
    CallStart,
    /// The call ended on the SDK side; no stop command is needed.
    CallEnd,
    /// The SDK reported an error. Collapses the session to disconnected.
    Error(String),
    /// A streaming message (transcripts among other kinds).
    Message(SdkMessage),
}

/// Commands the session machine asks the runner to issue to the SDK.
///
/// Both are fire-and-forget: completion is observed later via
/// [`SdkEvent`]s, never via a return value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SdkCommand {
    /// Begin a call against the configured assistant.
    Start {
        /// Which AI persona the SDK should connect to.
        assistant_id: String,
    },
    /// Hang up the active call.
    Stop,
}
