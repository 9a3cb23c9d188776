use thiserror::Error;

pub type Result<T, E = TelemetryError> = core::result::Result<T, E>;

#[derive(Debug, Clone, Error)]
pub enum TelemetryError {
    #[error("collector backend error: {0}")]
    Backend(String),
}
