use thiserror::Error;

pub type Result<T, E = ActionError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("failed to launch {program}: {reason}")]
    Spawn { program: String, reason: String },
    #[error("I/O error: {0}")]
    Io(String),
}
