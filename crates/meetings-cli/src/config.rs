//! Client configuration.
//!
//! Settings live in `~/.config/meetings-as-code/config.toml` by default:
//!
//! ```toml
//! [auth]
//! tenant = "common"
//! client_id = "env::MICROSOFT_APP_CLIENT_ID"
//! scopes = ["Calendars.ReadWrite"]
//! timeout = 60
//!
//! [graph]
//! timeout = 30
//! ```
//!
//! `client_id` supports the `pass::` and `env::` secret references.

use std::path::{Path, PathBuf};
use std::time::Duration;

use meetings_auth::AuthConfig;
use meetings_auth::config::{
    DEFAULT_PENDING_STATUS, DEFAULT_SCOPE, DEFAULT_TENANT, MICROSOFT_DEVICE_CODE_URL,
    MICROSOFT_TOKEN_URL,
};
use serde::{Deserialize, Serialize};

/// Directory name under the platform config directory.
const APP_DIR: &str = "meetings-as-code";

/// Configuration for the meetings client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Debug mode.
    pub debug: bool,

    /// Device-flow sign-in settings.
    pub auth: AuthSettings,

    /// Calendar API settings.
    pub graph: GraphSettings,
}

/// Sign-in settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    pub tenant: String,

    /// Application (client) ID; supports `pass::` and `env::` prefixes.
    pub client_id: Option<String>,

    pub scopes: Vec<String>,

    /// Device-code endpoint template with a `{tenant}` placeholder.
    pub device_code_url: String,

    /// Token endpoint template with a `{tenant}` placeholder.
    pub token_url: String,

    /// Status the token endpoint uses for "still waiting for the user".
    pub pending_status: u16,

    /// Give up after this many seconds (0 disables the deadline).
    pub timeout: u64,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            tenant: DEFAULT_TENANT.to_string(),
            client_id: None,
            scopes: vec![DEFAULT_SCOPE.to_string()],
            device_code_url: MICROSOFT_DEVICE_CODE_URL.to_string(),
            token_url: MICROSOFT_TOKEN_URL.to_string(),
            pending_status: DEFAULT_PENDING_STATUS,
            timeout: 60,
        }
    }
}

impl AuthSettings {
    /// The caller-side deadline for one sign-in attempt.
    pub fn deadline(&self) -> Option<Duration> {
        (self.timeout > 0).then(|| Duration::from_secs(self.timeout))
    }

    /// Builds the flow configuration for `client_id`.
    pub fn to_auth_config(&self, client_id: impl Into<String>) -> AuthConfig {
        AuthConfig::new(
            &self.tenant,
            client_id,
            &self.device_code_url,
            &self.token_url,
            self.scopes.clone(),
        )
        .with_pending_status(self.pending_status)
    }

    /// Resolves the client ID stored in the file, expanding secret references.
    pub fn resolve_client_id(&self) -> Result<Option<String>, String> {
        self.client_id
            .as_deref()
            .map(|raw| {
                crate::secret::resolve(raw)
                    .map_err(|e| format!("failed to resolve client_id: {}", e))
            })
            .transpose()
    }
}

/// Calendar API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphSettings {
    /// Base URL of the Graph API.
    pub base_url: String,

    /// Request timeout in seconds.
    pub timeout: u64,
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            base_url: meetings_graph::GRAPH_API_BASE.to_string(),
            timeout: 30,
        }
    }
}

impl ClientConfig {
    /// Loads configuration from the default path, or defaults if absent.
    pub fn load() -> Result<Self, String> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content =
            std::fs::read_to_string(path).map_err(|e| format!("failed to read config: {}", e))?;
        toml::from_str(&content).map_err(|e| format!("failed to parse config: {}", e))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_microsoft_common_tenant() {
        let config = ClientConfig::default();
        assert_eq!(config.auth.tenant, "common");
        assert_eq!(config.auth.scopes, vec!["Calendars.ReadWrite".to_string()]);
        assert_eq!(config.auth.deadline(), Some(Duration::from_secs(60)));
        assert_eq!(config.graph.base_url, "https://graph.microsoft.com/v1.0");
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: ClientConfig = toml::from_str(
            r#"
[auth]
tenant = "contoso.onmicrosoft.com"
client_id = "11111111-2222-3333-4444-555555555555"
"#,
        )
        .unwrap();

        assert_eq!(config.auth.tenant, "contoso.onmicrosoft.com");
        assert_eq!(config.auth.pending_status, 400);
        assert_eq!(config.auth.timeout, 60);
        assert_eq!(config.graph.timeout, 30);

        let auth = config.auth.to_auth_config("override-id");
        assert_eq!(auth.client_id, "override-id");
        assert_eq!(
            auth.token_endpoint(),
            "https://login.microsoftonline.com/contoso.onmicrosoft.com/oauth2/v2.0/token"
        );
    }

    #[test]
    fn zero_timeout_disables_deadline() {
        let settings = AuthSettings {
            timeout: 0,
            ..Default::default()
        };
        assert_eq!(settings.deadline(), None);
    }

    #[test]
    fn client_id_env_reference_is_resolved() {
        unsafe {
            std::env::set_var("_MEETINGS_CFG_CLIENT_ID", "from-env");
        }
        let settings = AuthSettings {
            client_id: Some("env::_MEETINGS_CFG_CLIENT_ID".to_string()),
            ..Default::default()
        };
        assert_eq!(settings.resolve_client_id().unwrap(), Some("from-env".to_string()));
        unsafe {
            std::env::remove_var("_MEETINGS_CFG_CLIENT_ID");
        }
    }

    #[test]
    fn blank_client_id_is_rejected() {
        let settings = AuthSettings {
            client_id: Some("  ".to_string()),
            ..Default::default()
        };
        let err = settings.resolve_client_id().unwrap_err();
        assert!(err.starts_with("failed to resolve client_id"));
        assert!(err.contains("empty"));
    }

    #[test]
    fn missing_client_id_resolves_to_none() {
        assert_eq!(AuthSettings::default().resolve_client_id().unwrap(), None);
    }

    #[test]
    fn load_from_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "debug = true\n[graph]\ntimeout = 5\n").unwrap();

        let config = ClientConfig::load_from(&path).unwrap();
        assert!(config.debug);
        assert_eq!(config.graph.timeout, 5);
    }

    #[test]
    fn load_from_invalid_file_errors() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[auth\n").unwrap();

        let err = ClientConfig::load_from(&path).unwrap_err();
        assert!(err.contains("failed to parse config"));
    }

    #[test]
    fn round_trips_through_toml() {
        let config = ClientConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let back: ClientConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.auth.token_url, config.auth.token_url);
    }
}
