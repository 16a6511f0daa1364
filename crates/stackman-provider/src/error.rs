//! Error taxonomy for the container runtime and compose runner

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Cannot connect to the Docker daemon: {0}")]
    DaemonUnreachable(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Operation timeout")]
    Timeout,

    #[error("Container not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("{0}")]
    Unknown(String),

    #[error("{0}")]
    Validation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProviderError {
    /// Map raw daemon or CLI text onto the taxonomy
    pub fn classify(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        let lower = detail.to_lowercase();

        if lower.contains("permission denied") || lower.contains("access is denied") {
            Self::PermissionDenied(detail)
        } else if lower.contains("cannot connect to the docker daemon")
            || lower.contains("is the docker daemon running")
            || lower.contains("connection refused")
            || lower.contains("no such file or directory")
        {
            Self::DaemonUnreachable(detail)
        } else if lower.contains("timeout")
            || lower.contains("timed out")
            || lower.contains("deadline exceeded")
        {
            Self::Timeout
        } else if lower.contains("no such container") || lower.contains("not found") {
            Self::NotFound(detail)
        } else if lower.contains("port is already allocated")
            || lower.contains("address already in use")
        {
            Self::Conflict(detail)
        } else {
            Self::Unknown(detail)
        }
    }

    /// Whether the daemon itself could not be reached
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Self::DaemonUnreachable(_) | Self::PermissionDenied(_))
    }
}

impl From<bollard::errors::Error> for ProviderError {
    fn from(err: bollard::errors::Error) -> Self {
        match err {
            bollard::errors::Error::DockerResponseServerError {
                status_code: 404,
                message,
            } => Self::NotFound(message),
            bollard::errors::Error::DockerResponseServerError {
                status_code: 409,
                message,
            } => Self::Conflict(message),
            bollard::errors::Error::RequestTimeoutError => Self::Timeout,
            other => Self::classify(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ProviderError>;
