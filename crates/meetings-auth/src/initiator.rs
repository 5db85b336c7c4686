//! Device-code request: the first leg of the flow.

use std::sync::Arc;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::AuthConfig;
use crate::error::{AuthError, AuthResult};
use crate::session::{DeviceCodeResponse, DeviceFlowSession};
use crate::transport::FormTransport;

/// Asks the identity provider for a device code. Single attempt, no retries.
#[derive(Clone)]
pub struct DeviceFlowInitiator {
    transport: Arc<dyn FormTransport>,
}

impl DeviceFlowInitiator {
    pub fn new(transport: Arc<dyn FormTransport>) -> Self {
        Self { transport }
    }

    /// Requests a device code and user code for `config`.
    ///
    /// The session expiry is measured from the moment the request is issued.
    ///
    /// # Errors
    ///
    /// - `DeviceFlowRequestFailed` for any non-200 status
    /// - `ResponseParse` for a body that is not the expected JSON
    /// - `Transport` when the endpoint cannot be reached
    /// - `Cancelled` if `cancel` fires while the request is in flight
    pub async fn start(
        &self,
        config: &AuthConfig,
        cancel: &CancellationToken,
    ) -> AuthResult<DeviceFlowSession> {
        if cancel.is_cancelled() {
            return Err(AuthError::cancelled());
        }

        let url = config.device_code_endpoint();
        let scope = config.scope_param();
        let params = [
            ("client_id", config.client_id.as_str()),
            ("scope", scope.as_str()),
        ];

        info!(tenant = %config.tenant, "requesting device code");
        let requested_at = Instant::now();

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(AuthError::cancelled()),
            response = self.transport.post_form(&url, &params) => response?,
        };

        debug!(status = response.status, "device code response");
        if !response.is_ok() {
            return Err(AuthError::device_flow_request_failed(response.status));
        }

        let parsed: DeviceCodeResponse = serde_json::from_str(&response.body)?;
        let session = DeviceFlowSession::from_response(parsed, requested_at)?;
        debug!(
            interval_secs = session.interval().as_secs(),
            expires_in_secs = session.remaining(requested_at).as_secs(),
            "device code issued"
        );
        Ok(session)
    }
}
