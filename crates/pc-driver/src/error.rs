use thiserror::Error;

pub type Result<T, E = DriverError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("command name is empty")]
    EmptyCommand,
    #[error("service not implemented: {0}")]
    NotImplemented(String),
    #[error("invalid input for {service}.{parameter}: {reason}")]
    InvalidInput {
        service: &'static str,
        parameter: &'static str,
        reason: String,
    },
    #[error("action failed: {0}")]
    Action(#[from] host_actions::ActionError),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("metrics error: {0}")]
    Metrics(String),
}
