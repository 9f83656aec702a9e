//! The per-call duration ticker.
//!
//! Exactly one ticker may be live per session, owned by the runner. The
//! handle models "scoped resource with guaranteed release on all exit
//! paths": `cancel` is idempotent, safe when no tick is active, and also
//! runs on drop so a leaked handle cannot keep ticking after the session
//! has ended.

use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Owned handle to the recurring tick task of an active call.
#[derive(Debug, Default)]
pub struct TickHandle {
    task: Option<JoinHandle<()>>,
}

impl TickHandle {
    /// A handle with no tick running.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Spawns a task sending the current instant on `tick_tx` every
    /// `period`, starting one period from now.
    pub fn spawn(period: Duration, tick_tx: mpsc::Sender<Instant>) -> Self {
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first interval tick completes immediately; the loop body
            // below should only fire after a full period has passed.
            interval.tick().await;
            loop {
                interval.tick().await;
                if tick_tx.send(Instant::now()).await.is_err() {
                    // Receiver gone: the session loop has shut down.
                    break;
                }
            }
        });
        Self { task: Some(task) }
    }

    /// Whether a tick task is currently running.
    pub fn is_active(&self) -> bool {
        self.task.is_some()
    }

    /// Stops the tick task. Idempotent; safe when no tick is active.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}
