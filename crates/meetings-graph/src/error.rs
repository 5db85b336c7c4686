//! Error types for calendar event requests.

use std::fmt;
use thiserror::Error;

/// The category of a Graph API error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphErrorCode {
    /// The bearer token was rejected (401).
    AuthenticationFailed,
    /// The token lacks the permission for this operation (403).
    AuthorizationFailed,
    /// The event does not exist (404).
    NotFound,
    /// Any other status outside the one the operation expects.
    UnexpectedStatus,
    /// Connection failure, timeout, or unreadable body.
    NetworkError,
    /// The body did not have the expected JSON shape.
    InvalidResponse,
    /// The client could not be constructed.
    ConfigurationError,
}

impl GraphErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthenticationFailed => "authentication_failed",
            Self::AuthorizationFailed => "authorization_failed",
            Self::NotFound => "not_found",
            Self::UnexpectedStatus => "unexpected_status",
            Self::NetworkError => "network_error",
            Self::InvalidResponse => "invalid_response",
            Self::ConfigurationError => "configuration_error",
        }
    }
}

impl fmt::Display for GraphErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error returned by [`GraphClient`](crate::GraphClient).
#[derive(Debug, Error)]
pub struct GraphError {
    code: GraphErrorCode,
    message: String,
    status: Option<u16>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl GraphError {
    pub fn new(code: GraphErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            status: None,
            source: None,
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(GraphErrorCode::NetworkError, message)
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(GraphErrorCode::InvalidResponse, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(GraphErrorCode::ConfigurationError, message)
    }

    /// Classifies a status that the operation did not expect.
    pub fn from_status(status: u16, body: &str) -> Self {
        let code = match status {
            401 => GraphErrorCode::AuthenticationFailed,
            403 => GraphErrorCode::AuthorizationFailed,
            404 => GraphErrorCode::NotFound,
            _ => GraphErrorCode::UnexpectedStatus,
        };
        let message = if body.is_empty() {
            format!("request failed with status code {}", status)
        } else {
            format!("request failed with status code {}: {}", status, body)
        };
        Self::new(code, message).with_status(status)
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    pub fn code(&self) -> GraphErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl From<reqwest::Error> for GraphError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "request timeout".to_string()
        } else if err.is_connect() {
            format!("connection failed: {}", err)
        } else {
            format!("request failed: {}", err)
        };
        Self::network(message).with_source(err)
    }
}

/// A specialized Result type for Graph API operations.
pub type GraphResult<T> = Result<T, GraphError>;
