use thiserror::Error;

/// Error generated by a [TelemetrySession](super::TelemetrySession) or its [Transport](super::Transport)
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TelemetryError {
    #[error("Telemetry session has not been started")]
    NotStarted,
    #[error("Telemetry session was already started")]
    AlreadyStarted,
    #[error("Transport error: {0}")]
    Transport(String),
}
