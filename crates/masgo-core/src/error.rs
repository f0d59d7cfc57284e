//! Shared error type across masgo crates.

use thiserror::Error;

use crate::metric::MetricKind;

/// Transport-independent error classes (stable API).
///
/// The server maps each class onto an HTTP status; the core never sees
/// status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Request used a method other than the update-submission method.
    MethodNotAllowed,
    /// Path does not address an update, or the metric name is missing.
    NotFound,
    /// Malformed metric type or value.
    BadRequest,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in logs and self-observability labels.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            ClientCode::NotFound => "NOT_FOUND",
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, MasgoError>;

/// Unified error type used by core, server, and agent.
///
/// The `Display` text doubles as the plain-text response body.
#[derive(Debug, Error)]
pub enum MasgoError {
    #[error("only POST requests are allowed")]
    MethodNotAllowed,
    #[error("page not found")]
    NotFound,
    #[error("metric name is required")]
    NameRequired,
    #[error("invalid metric type")]
    InvalidMetricType,
    #[error("invalid gauge value")]
    InvalidGaugeValue,
    #[error("invalid counter value")]
    InvalidCounterValue,
    #[error("invalid counter value type")]
    InvalidCounterValueType,
    #[error("unknown metric type: {0}")]
    UnknownMetricType(MetricKind),
    #[error("config: {0}")]
    Config(String),
    #[error("transport: {0}")]
    Transport(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl MasgoError {
    /// Map internal error to a stable client-facing class.
    pub fn client_code(&self) -> ClientCode {
        match self {
            MasgoError::MethodNotAllowed => ClientCode::MethodNotAllowed,
            MasgoError::NotFound | MasgoError::NameRequired => ClientCode::NotFound,
            MasgoError::InvalidMetricType
            | MasgoError::InvalidGaugeValue
            | MasgoError::InvalidCounterValue => ClientCode::BadRequest,
            MasgoError::InvalidCounterValueType
            | MasgoError::UnknownMetricType(_)
            | MasgoError::Config(_)
            | MasgoError::Transport(_)
            | MasgoError::Internal(_) => ClientCode::Internal,
        }
    }
}
