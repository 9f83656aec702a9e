//! Shared types and constants for the AfriMed Assist platform.
//!
//! This crate provides the foundational types used across all AfriMed
//! crates: speaker roles, call lifecycle status, transcript lines, and
//! common constants.
//!
//! No crate in the workspace depends on anything *except* `afrimed-types`
//! for cross-cutting type definitions. This keeps the dependency graph
//! clean and prevents circular dependencies.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Credits granted to a user record when it is first provisioned.
pub const DEFAULT_STARTING_CREDITS: i64 = 10;

/// Who produced an utterance in a call transcript.
///
/// Matches the `role` field the voice SDK puts on transcript messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeakerRole {
    /// The human caller.
    User,
    /// The AI assistant.
    Assistant,
    /// System-injected content (prompts, notices).
    System,
}

impl SpeakerRole {
    /// Returns the lowercase wire label for this role.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
        }
    }
}

impl fmt::Display for SpeakerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a voice call session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CallStatus {
    /// No call has been started yet.
    #[default]
    Idle,
    /// A start command was issued; waiting for the SDK to connect.
    Connecting,
    /// The call is live.
    Connected,
    /// The call ended (user hangup, SDK completion, or error).
    Disconnected,
}

impl CallStatus {
    /// True while a call is in flight (start issued and not yet ended).
    pub fn is_active(self) -> bool {
        matches!(self, Self::Connecting | Self::Connected)
    }
}

/// One utterance in a call transcript: a speaker role and its text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptLine {
    /// Who spoke.
    pub role: SpeakerRole,
    /// What was said.
    pub text: String,
}

impl TranscriptLine {
    pub fn new(role: SpeakerRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }
}

impl fmt::Display for TranscriptLine {
    /// Renders the line as `"role: text"`, the format the dashboard shows.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.role, self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speaker_role_labels() {
        assert_eq!(SpeakerRole::User.as_str(), "user");
        assert_eq!(SpeakerRole::Assistant.as_str(), "assistant");
        assert_eq!(SpeakerRole::System.as_str(), "system");
    }

    #[test]
    fn speaker_role_wire_round_trip() {
        for role in [SpeakerRole::User, SpeakerRole::Assistant, SpeakerRole::System] {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.as_str()));
            let back: SpeakerRole = serde_json::from_str(&json).unwrap();
            assert_eq!(back, role);
        }
    }

    #[test]
    fn call_status_activity() {
        assert!(!CallStatus::Idle.is_active());
        assert!(CallStatus::Connecting.is_active());
        assert!(CallStatus::Connected.is_active());
        assert!(!CallStatus::Disconnected.is_active());
    }

    #[test]
    fn transcript_line_display() {
        let line = TranscriptLine::new(SpeakerRole::Assistant, "How can I help?");
        assert_eq!(line.to_string(), "assistant: How can I help?");
    }
}
