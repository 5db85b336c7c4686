//! Token polling: the second leg of the flow.
//!
//! ```text
//!  Waiting ──► Polling ──┬──► Succeeded   (200 + token body)
//!     ▲           │      ├──► Expired     (expiry reached before a token)
//!     └─pending───┘      ├──► Failed      (other status, transport, parse)
//!                        └──► Cancelled   (caller abort)
//! ```
//!
//! Each iteration checks expiry, sleeps one full interval, checks expiry
//! again and only then issues a request. The interval is never shortened and
//! never adapted to server feedback, and no request is sent once the session
//! has expired.

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::AuthConfig;
use crate::error::{AuthError, AuthErrorCode, AuthResult};
use crate::session::{DEVICE_CODE_GRANT_TYPE, DeviceFlowSession, TokenResponse, TokenResult};
use crate::transport::FormTransport;

/// State of a polling run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PollState {
    /// Waiting out the interval before the next request.
    Waiting,
    /// A token request is in flight.
    Polling,
    Succeeded,
    Expired,
    Failed,
    Cancelled,
}

impl PollState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Waiting | Self::Polling)
    }

    /// The terminal state a finished run ends in.
    pub fn of(result: &AuthResult<TokenResult>) -> Self {
        match result {
            Ok(_) => Self::Succeeded,
            Err(e) => match e.code() {
                AuthErrorCode::FlowExpired => Self::Expired,
                AuthErrorCode::Cancelled => Self::Cancelled,
                _ => Self::Failed,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::Polling => "polling",
            Self::Succeeded => "succeeded",
            Self::Expired => "expired",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for PollState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Polls the token endpoint until the user completes sign-in.
///
/// The state of the most recent run is kept for inspection through
/// [`TokenPoller::state`].
#[derive(Clone)]
pub struct TokenPoller {
    transport: Arc<dyn FormTransport>,
    state: Arc<watch::Sender<Option<PollState>>>,
}

impl TokenPoller {
    pub fn new(transport: Arc<dyn FormTransport>) -> Self {
        let (state, _) = watch::channel(None);
        Self {
            transport,
            state: Arc::new(state),
        }
    }

    /// State of the current or last run; `None` before the first run.
    pub fn state(&self) -> Option<PollState> {
        *self.state.borrow()
    }

    /// Runs the polling loop for `session` until a terminal state.
    ///
    /// Only a 200 response with a parseable token body that arrives before
    /// the session expires succeeds. A response carrying
    /// `config.pending_status` means "keep waiting"; every other status ends
    /// the run with `UnexpectedStatus`.
    pub async fn poll(
        &self,
        config: &AuthConfig,
        session: &DeviceFlowSession,
        cancel: &CancellationToken,
    ) -> AuthResult<TokenResult> {
        let result = self.run(config, session, cancel).await;
        let state = PollState::of(&result);
        self.state.send_replace(Some(state));
        match &result {
            Ok(_) => info!(%state, "device authorization completed"),
            Err(e) => warn!(%state, error = %e, "device authorization ended"),
        }
        result
    }

    async fn run(
        &self,
        config: &AuthConfig,
        session: &DeviceFlowSession,
        cancel: &CancellationToken,
    ) -> AuthResult<TokenResult> {
        let url = config.token_endpoint();
        let scope = config.scope_param();
        let params = [
            ("client_id", config.client_id.as_str()),
            ("grant_type", DEVICE_CODE_GRANT_TYPE),
            ("device_code", session.device_code()),
            ("scope", scope.as_str()),
        ];
        let mut attempts: u32 = 0;

        loop {
            if session.is_expired_at(Instant::now()) {
                return Err(AuthError::flow_expired());
            }

            self.enter(PollState::Waiting, attempts);
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(AuthError::cancelled()),
                _ = tokio::time::sleep(session.interval()) => {}
            }

            if session.is_expired_at(Instant::now()) {
                return Err(AuthError::flow_expired());
            }

            attempts += 1;
            self.enter(PollState::Polling, attempts);
            // A slow response must not carry the run past expiry.
            let response = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(AuthError::cancelled()),
                _ = tokio::time::sleep_until(session.expires_at()) => {
                    return Err(AuthError::flow_expired());
                }
                response = self.transport.post_form(&url, &params) => response?,
            };
            debug!(status = response.status, attempt = attempts, "token poll response");

            if response.is_ok() {
                let token: TokenResponse = serde_json::from_str(&response.body)?;
                return Ok(TokenResult::from_response(token, Utc::now()));
            }

            if response.status != config.pending_status {
                return Err(AuthError::unexpected_status(response.status));
            }
        }
    }

    fn enter(&self, state: PollState, attempts: u32) {
        debug!(%state, attempts, "device flow poller");
        self.state.send_replace(Some(state));
    }
}
