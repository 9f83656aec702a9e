//! Async wiring between the pure session machine and the outside world.
//!
//! [`SessionRunner`] is a single event loop: user commands, SDK events, and
//! ticker instants all arrive over channels, so transitions stay serialized
//! with no locking. Every state snapshot is published over a watch channel
//! for the presentation layer.

use crate::client::VoiceClient;
use crate::error::SessionError;
use crate::event::{SdkCommand, SdkEvent};
use crate::session::CallSession;
use crate::timer::TickHandle;
use afrimed_types::CallStatus;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, watch};

/// How often the elapsed duration is recomputed during a call.
const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Capacity for the user-command channel.
const COMMAND_CAPACITY: usize = 16;

/// Capacity for the internal tick channel.
const TICK_CAPACITY: usize = 4;

/// User-initiated session commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    /// Start a call (also serves as reconnect after a disconnect).
    Start,
    /// End the active call.
    End,
}

/// Immutable view of the session state for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Current call status.
    pub status: CallStatus,
    /// Transcript lines rendered as `"role: text"`, in delivery order.
    pub transcript: Vec<String>,
    /// Formatted elapsed duration.
    pub elapsed: String,
}

/// Clonable handle for driving a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    command_tx: mpsc::Sender<SessionCommand>,
    snapshot_rx: watch::Receiver<SessionSnapshot>,
}

impl SessionHandle {
    /// Starts a call (or reconnects after a disconnect).
    pub async fn start_call(&self) -> Result<(), SessionError> {
        self.command_tx
            .send(SessionCommand::Start)
            .await
            .map_err(|_| SessionError::Closed)
    }

    /// Ends the active call.
    pub async fn end_call(&self) -> Result<(), SessionError> {
        self.command_tx
            .send(SessionCommand::End)
            .await
            .map_err(|_| SessionError::Closed)
    }

    /// Subscribes to state snapshots.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot_rx.clone()
    }
}

/// Owns one [`CallSession`] and executes its side effects: SDK commands,
/// the tick timer, and snapshot publication.
pub struct SessionRunner<C: VoiceClient> {
    session: CallSession,
    client: C,
    event_rx: mpsc::Receiver<SdkEvent>,
    command_rx: mpsc::Receiver<SessionCommand>,
    tick_tx: mpsc::Sender<Instant>,
    tick_rx: mpsc::Receiver<Instant>,
    snapshot_tx: watch::Sender<SessionSnapshot>,
    ticker: TickHandle,
}

impl<C: VoiceClient> SessionRunner<C> {
    /// Creates a runner for one assistant plus the handle that drives it.
    ///
    /// `event_rx` is the SDK event stream produced by the client's
    /// integration (e.g. [`crate::SimulatedVoiceClient::new`]).
    pub fn new(
        assistant_id: impl Into<String>,
        client: C,
        event_rx: mpsc::Receiver<SdkEvent>,
    ) -> (Self, SessionHandle) {
        let session = CallSession::new(assistant_id);
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CAPACITY);
        let (tick_tx, tick_rx) = mpsc::channel(TICK_CAPACITY);
        let (snapshot_tx, snapshot_rx) = watch::channel(snapshot_of(&session));

        let runner = Self {
            session,
            client,
            event_rx,
            command_rx,
            tick_tx,
            tick_rx,
            snapshot_tx,
            ticker: TickHandle::idle(),
        };
        let handle = SessionHandle {
            command_tx,
            snapshot_rx,
        };
        (runner, handle)
    }

    /// Runs the session loop until every command sender is dropped or the
    /// SDK event channel closes. The ticker is cancelled on the way out.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                command = self.command_rx.recv() => {
                    match command {
                        Some(command) => self.handle_command(command),
                        None => break,
                    }
                }
                event = self.event_rx.recv() => {
                    match event {
                        Some(event) => self.handle_event(event),
                        None => {
                            tracing::debug!("SDK event channel closed, stopping session loop");
                            break;
                        }
                    }
                }
                tick = self.tick_rx.recv() => {
                    // The runner holds its own tick sender, so this arm
                    // never yields `None`.
                    if let Some(now) = tick {
                        self.session.tick(now);
                        self.publish();
                    }
                }
            }
        }
        self.ticker.cancel();
    }

    fn handle_command(&mut self, command: SessionCommand) {
        let sdk_command = match command {
            SessionCommand::Start => self.session.start_call(),
            SessionCommand::End => self.session.end_call(),
        };
        self.sync_ticker();
        match sdk_command {
            Some(SdkCommand::Start { assistant_id }) => self.client.start(&assistant_id),
            Some(SdkCommand::Stop) => self.client.stop(),
            None => {}
        }
        self.publish();
    }

    fn handle_event(&mut self, event: SdkEvent) {
        self.session.apply(event, Instant::now());
        self.sync_ticker();
        self.publish();
    }

    /// Keeps the ticker aligned with the machine: running exactly while
    /// the call is connected, cancelled on every other state.
    fn sync_ticker(&mut self) {
        if self.session.status() == CallStatus::Connected {
            if !self.ticker.is_active() {
                self.ticker = TickHandle::spawn(TICK_PERIOD, self.tick_tx.clone());
            }
        } else {
            self.ticker.cancel();
        }
    }

    fn publish(&self) {
        self.snapshot_tx.send_replace(snapshot_of(&self.session));
    }
}

fn snapshot_of(session: &CallSession) -> SessionSnapshot {
    SessionSnapshot {
        status: session.status(),
        transcript: session
            .transcript()
            .iter()
            .map(|line| line.to_string())
            .collect(),
        elapsed: session.elapsed().to_string(),
    }
}
