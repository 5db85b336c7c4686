//! Form-encoded HTTP transport.
//!
//! The flow only ever needs one kind of request: a `POST` with an
//! `application/x-www-form-urlencoded` body, answered by a status code and a
//! text body. [`FormTransport`] captures exactly that so the initiator and
//! poller can be driven by a scripted transport in tests.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tracing::debug;

use crate::error::{AuthError, AuthResult};

/// Default per-request timeout for [`ReqwestTransport`].
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A boxed future for object-safe async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Status and body of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body, decoded as text.
    pub body: String,
}

impl TransportResponse {
    /// Creates a new response.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns true for HTTP 200.
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Issues form-encoded `POST` requests. Implementations hold no flow state.
pub trait FormTransport: Send + Sync {
    /// Posts `params` as a form body to `url`.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthErrorCode::Transport`](crate::AuthErrorCode::Transport)
    /// error when the endpoint cannot be reached or the body cannot be read.
    /// Non-2xx statuses are not errors at this layer.
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        params: &'a [(&'a str, &'a str)],
    ) -> BoxFuture<'a, AuthResult<TransportResponse>>;
}

/// [`FormTransport`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http_client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport with the given per-request timeout.
    pub fn new(timeout: Duration) -> AuthResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                AuthError::transport(format!("failed to create HTTP client: {}", e)).with_source(e)
            })?;

        Ok(Self { http_client })
    }
}

impl FormTransport for ReqwestTransport {
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        params: &'a [(&'a str, &'a str)],
    ) -> BoxFuture<'a, AuthResult<TransportResponse>> {
        Box::pin(async move {
            let response = self.http_client.post(url).form(params).send().await?;

            let status = response.status().as_u16();
            let body = response.text().await.map_err(|e| {
                AuthError::transport(format!("failed to read response: {}", e)).with_source(e)
            })?;

            debug!(status, "form post to {} answered", url);
            Ok(TransportResponse { status, body })
        })
    }
}
