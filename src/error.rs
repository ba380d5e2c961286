use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Why a request was rejected before anything was sent upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationKind {
    InvalidImageFormat,
    MissingMessage,
    /// Body is not JSON, has the wrong content type or does not fit the request shape.
    InvalidRequest,
    PayloadTooLarge,
}

impl ValidationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidImageFormat => "invalid_image_format",
            Self::MissingMessage => "missing_message",
            Self::InvalidRequest => "invalid_request",
            Self::PayloadTooLarge => "payload_too_large",
        }
    }
}

impl fmt::Display for ValidationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(ValidationKind),

    #[error("Rejected request body ({kind}): {reason}")]
    Body { kind: ValidationKind, reason: String },

    #[error("Upstream error{}: {message}", status_suffix(.status))]
    Upstream {
        status: Option<u16>,
        message: String,
    },

    #[error("Upstream returned no usable text")]
    EmptyResponse,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Address parse error: {0}")]
    AddrParse(#[from] std::net::AddrParseError),

    #[error("Internal error: {0}")]
    Internal(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (status {s})")).unwrap_or_default()
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn upstream(status: Option<u16>, msg: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: msg.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Validation kind for errors caused by the caller's input.
    pub fn validation_kind(&self) -> Option<ValidationKind> {
        match self {
            Self::Validation(kind) | Self::Body { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Stable machine-readable name reported to callers.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(kind) | Self::Body { kind, .. } => kind.as_str(),
            Self::Upstream { .. } => "upstream_error",
            Self::EmptyResponse => "empty_response",
            _ => "internal_error",
        }
    }
}

impl From<ValidationKind> for Error {
    fn from(kind: ValidationKind) -> Self {
        Self::Validation(kind)
    }
}
