//! The `authenticate` operation: initiate, instruct, poll.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::AuthConfig;
use crate::error::{AuthError, AuthResult};
use crate::initiator::DeviceFlowInitiator;
use crate::poller::{PollState, TokenPoller};
use crate::session::{DeviceFlowSession, TokenResult};
use crate::transport::{DEFAULT_REQUEST_TIMEOUT, FormTransport, ReqwestTransport};

/// Receives the sign-in instruction once a device code has been issued.
pub trait InstructionSink: Send + Sync {
    fn emit(&self, session: &DeviceFlowSession);
}

/// Writes the instruction line to standard error.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl InstructionSink for StderrSink {
    fn emit(&self, session: &DeviceFlowSession) {
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(stderr, "{}", session.instruction());
        let _ = stderr.flush();
    }
}

/// Adapts a closure into an [`InstructionSink`].
pub struct FnSink<F>(pub F);

impl<F> InstructionSink for FnSink<F>
where
    F: Fn(&DeviceFlowSession) + Send + Sync,
{
    fn emit(&self, session: &DeviceFlowSession) {
        (self.0)(session)
    }
}

/// Runs a complete device-authorization flow.
///
/// One `Authenticator` owns its configuration; concurrent flows for
/// different users each use their own instance.
///
/// # Example
///
/// ```ignore
/// use meetings_auth::{AuthConfig, Authenticator};
///
/// let authenticator = Authenticator::new(AuthConfig::microsoft(client_id))?;
/// let token = authenticator
///     .authenticate_with_deadline(Some(Duration::from_secs(60)))
///     .await?;
/// ```
pub struct Authenticator {
    config: AuthConfig,
    initiator: DeviceFlowInitiator,
    poller: TokenPoller,
    sink: Arc<dyn InstructionSink>,
}

impl Authenticator {
    /// Creates an authenticator over HTTPS that prints instructions to
    /// standard error.
    pub fn new(config: AuthConfig) -> AuthResult<Self> {
        let transport = ReqwestTransport::new(DEFAULT_REQUEST_TIMEOUT)?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Creates an authenticator over the given transport.
    pub fn with_transport(
        config: AuthConfig,
        transport: Arc<dyn FormTransport>,
    ) -> AuthResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            initiator: DeviceFlowInitiator::new(transport.clone()),
            poller: TokenPoller::new(transport),
            sink: Arc::new(StderrSink),
        })
    }

    /// Replaces the instruction sink.
    pub fn with_sink(mut self, sink: Arc<dyn InstructionSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// State of the token poller for the current or last flow.
    pub fn poll_state(&self) -> Option<PollState> {
        self.poller.state()
    }

    /// Runs the flow and returns only the access token.
    pub async fn authenticate(&self, cancel: &CancellationToken) -> AuthResult<String> {
        self.authenticate_full(cancel)
            .await
            .map(|token| token.access_token)
    }

    /// Runs the flow and returns every issued token field.
    ///
    /// The instruction is emitted exactly once, after the device code is
    /// issued and before the first poll. If the device-code request fails,
    /// no polling happens.
    pub async fn authenticate_full(&self, cancel: &CancellationToken) -> AuthResult<TokenResult> {
        let session = self.initiator.start(&self.config, cancel).await?;

        info!(
            verification_uri = session.verification_uri(),
            "waiting for user to complete sign-in"
        );
        self.sink.emit(&session);

        self.poller.poll(&self.config, &session, cancel).await
    }

    /// Runs the flow, aborting with `Cancelled` once `deadline` elapses.
    ///
    /// A deadline is a caller-side limit and is reported separately from the
    /// provider-side `FlowExpired`.
    pub async fn authenticate_with_deadline(
        &self,
        deadline: Option<Duration>,
    ) -> AuthResult<String> {
        self.authenticate_full_with_deadline(deadline)
            .await
            .map(|token| token.access_token)
    }

    /// Like [`Authenticator::authenticate_with_deadline`], returning every
    /// issued token field.
    pub async fn authenticate_full_with_deadline(
        &self,
        deadline: Option<Duration>,
    ) -> AuthResult<TokenResult> {
        let cancel = CancellationToken::new();
        let Some(deadline) = deadline else {
            return self.authenticate_full(&cancel).await;
        };

        let trigger = cancel.clone();
        let timer = tokio::spawn(async move {
            tokio::time::sleep(deadline).await;
            debug!(?deadline, "authentication deadline elapsed");
            trigger.cancel();
        });

        let result = self.authenticate_full(&cancel).await;
        timer.abort();

        result.map_err(|e| {
            if e.is_cancelled() {
                AuthError::cancelled().with_source(DeadlineElapsed(deadline))
            } else {
                e
            }
        })
    }
}

/// Source attached to `Cancelled` errors caused by a deadline.
#[derive(Debug, thiserror::Error)]
#[error("deadline of {0:?} elapsed")]
pub struct DeadlineElapsed(pub Duration);
