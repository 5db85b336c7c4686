//! Device-flow session and token records, plus their wire formats.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tokio::time::Instant;

use crate::error::{AuthError, AuthResult};

/// Poll interval assumed when the provider omits `interval` (RFC 8628 §3.2).
const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

/// Grant type sent with every token poll.
pub const DEVICE_CODE_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:device_code";

/// Response body of the device-code endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceCodeResponse {
    pub device_code: String,
    pub user_code: String,
    pub verification_uri: String,
    /// Lifetime of the device code, in seconds.
    pub expires_in: u64,
    /// Minimum wait between polls, in seconds.
    #[serde(default = "default_interval")]
    pub interval: u64,
    /// Ready-made instruction text some providers include.
    #[serde(default)]
    pub message: Option<String>,
}

fn default_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

/// Response body of a successful token poll.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Space-separated granted scopes.
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// A pending device authorization.
///
/// The expiry instant is fixed when the session is created; nothing in the
/// poller moves it.
#[derive(Clone, PartialEq, Eq)]
pub struct DeviceFlowSession {
    device_code: String,
    user_code: String,
    verification_uri: String,
    expires_at: Instant,
    interval: Duration,
}

impl DeviceFlowSession {
    /// Creates a session from explicit parts.
    pub fn new(
        device_code: impl Into<String>,
        user_code: impl Into<String>,
        verification_uri: impl Into<String>,
        expires_at: Instant,
        interval: Duration,
    ) -> Self {
        Self {
            device_code: device_code.into(),
            user_code: user_code.into(),
            verification_uri: verification_uri.into(),
            expires_at,
            interval,
        }
    }

    /// Builds a session from a device-code response received at `now`.
    ///
    /// A zero interval is raised to one second so the poller never spins.
    /// An `expires_in` too large to represent as an instant is a parse error.
    pub fn from_response(response: DeviceCodeResponse, now: Instant) -> AuthResult<Self> {
        let expires_at = now
            .checked_add(Duration::from_secs(response.expires_in))
            .ok_or_else(|| {
                AuthError::response_parse(format!(
                    "expires_in out of range: {}",
                    response.expires_in
                ))
            })?;

        Ok(Self::new(
            response.device_code,
            response.user_code,
            response.verification_uri,
            expires_at,
            Duration::from_secs(response.interval.max(1)),
        ))
    }

    /// Secret correlating polls with this authorization. Never log it.
    pub fn device_code(&self) -> &str {
        &self.device_code
    }

    /// Code the user types at the verification page.
    pub fn user_code(&self) -> &str {
        &self.user_code
    }

    /// Page the user opens to complete sign-in.
    pub fn verification_uri(&self) -> &str {
        &self.verification_uri
    }

    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns true if `now` is at or past the expiry instant.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    /// Time left before expiry, saturating at zero.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.expires_at.saturating_duration_since(now)
    }

    /// Human-readable sign-in instruction.
    pub fn instruction(&self) -> String {
        format!(
            "To sign in, use a web browser to open the page {} and enter the code {}",
            self.verification_uri, self.user_code
        )
    }
}

impl fmt::Debug for DeviceFlowSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceFlowSession")
            .field("device_code", &"<redacted>")
            .field("user_code", &self.user_code)
            .field("verification_uri", &self.verification_uri)
            .field("expires_at", &self.expires_at)
            .field("interval", &self.interval)
            .finish()
    }
}

/// Tokens issued at the end of a successful flow.
///
/// Ownership passes to the caller; the flow keeps no copy.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenResult {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub scopes: Vec<String>,
    /// Lifetime hint for the access token.
    pub expires_in: Option<Duration>,
    /// When the token response was received.
    pub obtained_at: DateTime<Utc>,
}

impl TokenResult {
    /// Builds a token result from a token response received at `obtained_at`.
    pub fn from_response(response: TokenResponse, obtained_at: DateTime<Utc>) -> Self {
        let scopes = response
            .scope
            .as_deref()
            .unwrap_or_default()
            .split_whitespace()
            .map(str::to_string)
            .collect();

        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            scopes,
            expires_in: response.expires_in.map(Duration::from_secs),
            obtained_at,
        }
    }

    /// Wall-clock expiry of the access token, when the provider gave one.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let lifetime = chrono::Duration::from_std(self.expires_in?).ok()?;
        Some(self.obtained_at + lifetime)
    }

    /// Returns true if every scope in `required` was granted.
    pub fn has_scopes(&self, required: &[String]) -> bool {
        required.iter().all(|scope| self.scopes.contains(scope))
    }
}

impl fmt::Debug for TokenResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResult")
            .field("access_token", &"<redacted>")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "<redacted>"),
            )
            .field("scopes", &self.scopes)
            .field("expires_in", &self.expires_in)
            .field("obtained_at", &self.obtained_at)
            .finish()
    }
}
