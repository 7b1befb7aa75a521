use crate::applications::{PollError, StatusChangeError};
use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use std::fmt;

/// Failure reported by a backend directory (applications or saved jobs).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    #[error("backend unreachable: {0}")]
    Transport(String),
    #[error("not authorized: {0}")]
    Unauthorized(String),
    #[error("{resource} not found")]
    NotFound { resource: String },
    #[error("request rejected ({status}): {reason}")]
    Rejected { status: u16, reason: String },
    #[error("unexpected response payload: {0}")]
    Decode(String),
}

/// Top-level error surfaced by binaries built on this crate.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Service(ServiceError),
    StatusChange(StatusChangeError),
    Poll(PollError),
    Io(std::io::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Service(err) => write!(f, "service error: {}", err),
            AppError::StatusChange(err) => write!(f, "status change failed: {}", err),
            AppError::Poll(err) => write!(f, "polling error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Service(err) => Some(err),
            AppError::StatusChange(err) => Some(err),
            AppError::Poll(err) => Some(err),
            AppError::Io(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<ServiceError> for AppError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

impl From<StatusChangeError> for AppError {
    fn from(value: StatusChangeError) -> Self {
        Self::StatusChange(value)
    }
}

impl From<PollError> for AppError {
    fn from(value: PollError) -> Self {
        Self::Poll(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}
