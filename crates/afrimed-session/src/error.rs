use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    /// The session runner has shut down and no longer accepts commands.
    #[error("session loop is closed")]
    Closed,
}
