//! Error types for the device-authorization flow.
//!
//! Every failure is returned synchronously from the operation that detected
//! it. The only built-in wait loop is the pending-authorization loop in the
//! poller, which never surfaces as an error.

use std::fmt;
use thiserror::Error;

/// The category of an authentication error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthErrorCode {
    /// The endpoint could not be reached: connect failure, timeout, body read.
    Transport,
    /// The device-code endpoint answered with something other than 200.
    DeviceFlowRequestFailed,
    /// The token endpoint answered outside the success/pending set.
    UnexpectedStatus,
    /// The response body did not have the expected JSON shape.
    ResponseParse,
    /// The device code expired before the user completed sign-in.
    FlowExpired,
    /// The caller aborted the flow (deadline or explicit cancellation).
    Cancelled,
    /// The supplied configuration is unusable.
    Configuration,
}

impl AuthErrorCode {
    /// Returns a machine-readable name for this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transport => "transport_error",
            Self::DeviceFlowRequestFailed => "device_flow_request_failed",
            Self::UnexpectedStatus => "unexpected_status",
            Self::ResponseParse => "response_parse_error",
            Self::FlowExpired => "flow_expired",
            Self::Cancelled => "cancelled",
            Self::Configuration => "configuration_error",
        }
    }
}

impl fmt::Display for AuthErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error that terminated an authentication attempt.
#[derive(Debug, Error)]
pub struct AuthError {
    code: AuthErrorCode,
    message: String,
    /// HTTP status code, for status-driven failures.
    status: Option<u16>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AuthError {
    /// Creates a new error with the given code and message.
    pub fn new(code: AuthErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            status: None,
            source: None,
        }
    }

    /// Creates a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(AuthErrorCode::Transport, message)
    }

    /// Creates the error returned when the device-code request is rejected.
    pub fn device_flow_request_failed(status: u16) -> Self {
        Self::new(
            AuthErrorCode::DeviceFlowRequestFailed,
            format!("device code request failed with status code {}", status),
        )
        .with_status(status)
    }

    /// Creates the error returned for a token response outside the
    /// success/pending set.
    pub fn unexpected_status(status: u16) -> Self {
        Self::new(
            AuthErrorCode::UnexpectedStatus,
            format!("token request failed with status code {}", status),
        )
        .with_status(status)
    }

    /// Creates a response parse error.
    pub fn response_parse(message: impl Into<String>) -> Self {
        Self::new(AuthErrorCode::ResponseParse, message)
    }

    /// Creates a flow-expired error.
    pub fn flow_expired() -> Self {
        Self::new(AuthErrorCode::FlowExpired, "authentication request expired")
    }

    /// Creates a cancellation error.
    pub fn cancelled() -> Self {
        Self::new(AuthErrorCode::Cancelled, "authentication was cancelled")
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(AuthErrorCode::Configuration, message)
    }

    /// Sets the HTTP status code for this error.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the source error for this error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the error code.
    pub fn code(&self) -> AuthErrorCode {
        self.code
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the HTTP status code, if this error was caused by one.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Returns true if the flow expired on the provider side.
    pub fn is_expired(&self) -> bool {
        self.code == AuthErrorCode::FlowExpired
    }

    /// Returns true if the caller aborted the flow.
    pub fn is_cancelled(&self) -> bool {
        self.code == AuthErrorCode::Cancelled
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "request timeout".to_string()
        } else if err.is_connect() {
            format!("connection failed: {}", err)
        } else {
            format!("request failed: {}", err)
        };
        Self::transport(message).with_source(err)
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(err: serde_json::Error) -> Self {
        Self::response_parse(format!("invalid JSON response: {}", err)).with_source(err)
    }
}

/// A specialized Result type for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;
