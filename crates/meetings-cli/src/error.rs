//! Client error types.

use std::fmt;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
#[derive(Debug)]
pub enum ClientError {
    /// Configuration error.
    Config(String),
    /// Sign-in failed.
    Auth(meetings_auth::AuthError),
    /// Calendar request failed.
    Graph(meetings_graph::GraphError),
    /// Invalid command-line input.
    Usage(String),
    /// IO error.
    Io(std::io::Error),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
            Self::Auth(err) => write!(f, "authentication failed: {}", err),
            Self::Graph(err) => write!(f, "calendar request failed: {}", err),
            Self::Usage(msg) => write!(f, "invalid arguments: {}", msg),
            Self::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Auth(err) => Some(err),
            Self::Graph(err) => Some(err),
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<meetings_auth::AuthError> for ClientError {
    fn from(err: meetings_auth::AuthError) -> Self {
        Self::Auth(err)
    }
}

impl From<meetings_graph::GraphError> for ClientError {
    fn from(err: meetings_graph::GraphError) -> Self {
        Self::Graph(err)
    }
}
