//! Call-session control for AfriMed Assist.
//!
//! Manages one voice-call lifecycle at a time: issuing start/stop commands
//! to the external voice SDK, tracking connection status, accumulating a
//! transcript, and deriving elapsed call duration.
//!
//! The architecture separates concerns the SDK's callback style would
//! otherwise tangle together:
//!
//! - [`CallSession`] is a pure state machine. Inputs are user commands and
//!   [`SdkEvent`]s; outputs are [`SdkCommand`]s. No timers, no I/O.
//! - [`TickHandle`] owns the one-second ticker for an active call, with an
//!   idempotent `cancel` released on every path out of the connected state.
//! - [`SessionRunner`] wires the machine to a [`VoiceClient`] and publishes
//!   [`SessionSnapshot`]s over a watch channel for the presentation layer,
//!   driven through a clonable [`SessionHandle`].
//!
//! Sessions are fully ephemeral: nothing is persisted, and an SDK error
//! collapses the session to `Disconnected` with the transcript frozen.

pub mod client;
pub mod error;
pub mod event;
pub mod runner;
pub mod session;
pub mod timer;

pub use client::{SimulatedVoiceClient, VoiceClient};
pub use error::SessionError;
pub use event::{SdkCommand, SdkEvent, SdkMessage, TRANSCRIPT_MESSAGE_KIND};
pub use runner::{SessionCommand, SessionHandle, SessionRunner, SessionSnapshot};
pub use session::{format_elapsed, CallSession};
pub use timer::TickHandle;
