//! The pure call-session state machine.
//!
//! States: `Idle -> Connecting -> Connected -> Disconnected`, with
//! `Disconnected -> Connecting` on an explicit restart. All transitions
//! happen through [`CallSession::start_call`], [`CallSession::end_call`],
//! [`CallSession::apply`], and [`CallSession::tick`]; the machine never
//! performs I/O, so every property is testable with plain instants.

use crate::event::{SdkCommand, SdkEvent, TRANSCRIPT_MESSAGE_KIND};
use afrimed_types::{CallStatus, TranscriptLine};
use std::time::{Duration, Instant};

/// Elapsed duration shown before the first tick of a call.
const ZERO_ELAPSED: &str = "00:00";

/// One browser-local voice call: status, transcript, and derived duration.
///
/// The transcript is append-only for the lifetime of a call and cleared
/// only when the next call starts. Elapsed duration is derived solely from
/// the recorded start instant and the tick's clock reading, and only while
/// the call is connected.
#[derive(Debug)]
pub struct CallSession {
    assistant_id: String,
    status: CallStatus,
    transcript: Vec<TranscriptLine>,
    started_at: Option<Instant>,
    elapsed: String,
}

impl CallSession {
    /// Creates an idle session bound to one assistant identifier.
    pub fn new(assistant_id: impl Into<String>) -> Self {
        Self {
            assistant_id: assistant_id.into(),
            status: CallStatus::Idle,
            transcript: Vec::new(),
            started_at: None,
            elapsed: ZERO_ELAPSED.to_string(),
        }
    }

    pub fn status(&self) -> CallStatus {
        self.status
    }

    pub fn transcript(&self) -> &[TranscriptLine] {
        &self.transcript
    }

    /// The last derived duration, formatted (`MM:SS`, or `H:MM:SS` past an
    /// hour). Frozen at its final value once the call leaves `Connected`.
    pub fn elapsed(&self) -> &str {
        &self.elapsed
    }

    /// User action: begin a call (or restart after a disconnect).
    ///
    /// Clears any prior transcript and duration *before* the start command
    /// is produced, then moves to `Connecting`. A no-op while a call is
    /// already in flight.
    pub fn start_call(&mut self) -> Option<SdkCommand> {
        match self.status {
            CallStatus::Idle | CallStatus::Disconnected => {
                self.transcript.clear();
                self.started_at = None;
                self.elapsed = ZERO_ELAPSED.to_string();
                self.status = CallStatus::Connecting;
                Some(SdkCommand::Start {
                    assistant_id: self.assistant_id.clone(),
                })
            }
            CallStatus::Connecting | CallStatus::Connected => None,
        }
    }

    /// User action: hang up. A no-op unless a call is in flight.
    pub fn end_call(&mut self) -> Option<SdkCommand> {
        if self.status.is_active() {
            self.status = CallStatus::Disconnected;
            self.started_at = None;
            Some(SdkCommand::Stop)
        } else {
            None
        }
    }

    /// Applies one SDK event. `now` is the clock reading at delivery time,
    /// used only to record the start instant on `CallStart`.
    pub fn apply(&mut self, event: SdkEvent, now: Instant) {
        match event {
            SdkEvent::CallStart => {
                if self.status == CallStatus::Connecting {
                    self.status = CallStatus::Connected;
                    self.started_at = Some(now);
                }
            }
            SdkEvent::CallEnd => {
                if self.status.is_active() {
                    self.status = CallStatus::Disconnected;
                    self.started_at = None;
                }
            }
            SdkEvent::Error(reason) => {
                if self.status.is_active() {
                    tracing::warn!(%reason, "voice SDK error, disconnecting session");
                    self.status = CallStatus::Disconnected;
                    self.started_at = None;
                }
            }
            SdkEvent::Message(msg) => {
                if self.status != CallStatus::Connected || msg.kind != TRANSCRIPT_MESSAGE_KIND {
                    return;
                }
                if let (Some(role), Some(text)) = (msg.role, msg.transcript) {
                    self.transcript.push(TranscriptLine::new(role, text));
                }
            }
        }
    }

    /// Recomputes the elapsed duration from the start instant. Ticks
    /// arriving in any other state than `Connected` leave it untouched.
    pub fn tick(&mut self, now: Instant) {
        if self.status != CallStatus::Connected {
            return;
        }
        if let Some(started_at) = self.started_at {
            self.elapsed = format_elapsed(now.saturating_duration_since(started_at));
        }
    }
}

/// Formats a call duration as zero-padded `MM:SS`; sessions of an hour or
/// more roll over to `H:MM:SS` rather than letting the minutes field grow.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total_secs = elapsed.as_secs();
    let hours = total_secs / 3600;
    let mins = (total_secs % 3600) / 60;
    let secs = total_secs % 60;
    if hours > 0 {
        format!("{hours}:{mins:02}:{secs:02}")
    } else {
        format!("{mins:02}:{secs:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::SdkMessage;
    use afrimed_types::SpeakerRole;

    fn connected_session() -> (CallSession, Instant) {
        let mut session = CallSession::new("assistant-123");
        let start = Instant::now();
        assert!(session.start_call().is_some());
        session.apply(SdkEvent::CallStart, start);
        assert_eq!(session.status(), CallStatus::Connected);
        (session, start)
    }

    #[test]
    fn start_call_emits_start_command_with_assistant_id() {
        let mut session = CallSession::new("assistant-123");
        let cmd = session.start_call();
        assert_eq!(
            cmd,
            Some(SdkCommand::Start {
                assistant_id: "assistant-123".to_string()
            })
        );
        assert_eq!(session.status(), CallStatus::Connecting);
    }

    #[test]
    fn start_call_clears_prior_transcript_and_duration() {
        let (mut session, start) = connected_session();
        session.apply(
            SdkEvent::Message(SdkMessage::transcript(SpeakerRole::User, "hello")),
            start,
        );
        session.tick(start + Duration::from_secs(42));
        session.apply(SdkEvent::CallEnd, start);

        assert_eq!(session.transcript().len(), 1);
        assert_eq!(session.elapsed(), "00:42");

        assert!(session.start_call().is_some(), "restart from Disconnected");
        assert!(session.transcript().is_empty(), "transcript cleared");
        assert_eq!(session.elapsed(), "00:00", "duration cleared");
        assert_eq!(session.status(), CallStatus::Connecting);
    }

    #[test]
    fn start_call_is_noop_while_in_flight() {
        let (mut session, _) = connected_session();
        assert!(session.start_call().is_none());
        assert_eq!(session.status(), CallStatus::Connected);
    }

    #[test]
    fn end_call_from_connected_disconnects_and_emits_stop() {
        let (mut session, _) = connected_session();
        assert_eq!(session.end_call(), Some(SdkCommand::Stop));
        assert_eq!(session.status(), CallStatus::Disconnected);
    }

    #[test]
    fn end_call_is_noop_when_idle_or_disconnected() {
        let mut session = CallSession::new("assistant-123");
        assert!(session.end_call().is_none());

        let (mut session, _) = connected_session();
        session.end_call();
        assert!(session.end_call().is_none(), "second hangup is a no-op");
    }

    #[test]
    fn sdk_call_end_disconnects_without_stop_command() {
        let (mut session, start) = connected_session();
        session.apply(SdkEvent::CallEnd, start);
        assert_eq!(session.status(), CallStatus::Disconnected);
    }

    #[test]
    fn sdk_error_disconnects_and_freezes_transcript() {
        let (mut session, start) = connected_session();
        session.apply(
            SdkEvent::Message(SdkMessage::transcript(SpeakerRole::Assistant, "hi")),
            start,
        );
        session.apply(SdkEvent::Error("network dropped".to_string()), start);

        assert_eq!(session.status(), CallStatus::Disconnected);
        assert_eq!(session.transcript().len(), 1, "prior lines stay visible");

        // Frozen: messages and ticks after the error change nothing.
        session.apply(
            SdkEvent::Message(SdkMessage::transcript(SpeakerRole::User, "late")),
            start,
        );
        session.tick(start + Duration::from_secs(99));
        assert_eq!(session.transcript().len(), 1);
        assert_eq!(session.elapsed(), "00:00");
    }

    #[test]
    fn sdk_error_while_connecting_disconnects() {
        let mut session = CallSession::new("assistant-123");
        session.start_call();
        session.apply(SdkEvent::Error("mic denied".to_string()), Instant::now());
        assert_eq!(session.status(), CallStatus::Disconnected);
    }

    #[test]
    fn transcript_appends_in_delivery_order_despite_ticks() {
        let (mut session, start) = connected_session();

        let roles = [SpeakerRole::User, SpeakerRole::Assistant, SpeakerRole::User];
        for (i, role) in roles.into_iter().enumerate() {
            session.apply(
                SdkEvent::Message(SdkMessage::transcript(role, format!("line {i}"))),
                start,
            );
            session.tick(start + Duration::from_secs(i as u64 + 1));
        }

        let rendered: Vec<String> = session.transcript().iter().map(|l| l.to_string()).collect();
        assert_eq!(
            rendered,
            vec!["user: line 0", "assistant: line 1", "user: line 2"]
        );
    }

    #[test]
    fn non_transcript_messages_are_ignored() {
        let (mut session, start) = connected_session();
        session.apply(
            SdkEvent::Message(SdkMessage {
                kind: "speech-update".to_string(),
                role: Some(SpeakerRole::User),
                transcript: Some("partial".to_string()),
            }),
            start,
        );
        assert!(session.transcript().is_empty());
    }

    #[test]
    fn messages_before_connection_are_ignored() {
        let mut session = CallSession::new("assistant-123");
        session.start_call();
        session.apply(
            SdkEvent::Message(SdkMessage::transcript(SpeakerRole::User, "early")),
            Instant::now(),
        );
        assert!(session.transcript().is_empty());
    }

    #[test]
    fn tick_derives_elapsed_from_start_instant() {
        let (mut session, start) = connected_session();
        session.tick(start + Duration::from_secs(75));
        assert_eq!(session.elapsed(), "01:15");
    }

    #[test]
    fn format_elapsed_pads_and_rolls_over_hours() {
        assert_eq!(format_elapsed(Duration::from_secs(0)), "00:00");
        assert_eq!(format_elapsed(Duration::from_secs(9)), "00:09");
        assert_eq!(format_elapsed(Duration::from_secs(59 * 60 + 59)), "59:59");
        assert_eq!(format_elapsed(Duration::from_secs(3600)), "1:00:00");
        assert_eq!(
            format_elapsed(Duration::from_secs(2 * 3600 + 5 * 60 + 3)),
            "2:05:03"
        );
    }
}
