//! Device-flow sign-in.

use meetings_auth::{AuthConfig, Authenticator};
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Options given on the command line, taking priority over `config.toml`.
#[derive(Debug, Default)]
pub struct LoginOptions {
    pub tenant: Option<String>,
    pub client_id: Option<String>,
    pub scopes: Vec<String>,
    pub timeout: Option<u64>,
}

/// Runs the device-authorization flow and prints the access token.
///
/// The sign-in instruction goes to stderr; stdout carries only the token so
/// the command can be used in `$(meetings login)`.
pub async fn login(options: LoginOptions, config: &ClientConfig) -> ClientResult<()> {
    let auth_config = build_auth_config(&options, config)?;
    let deadline = match options.timeout {
        Some(0) => None,
        Some(secs) => Some(std::time::Duration::from_secs(secs)),
        None => config.auth.deadline(),
    };

    let requested = auth_config.scopes.clone();
    let authenticator = Authenticator::new(auth_config)?;
    let token = authenticator
        .authenticate_full_with_deadline(deadline)
        .await
        .inspect_err(|_| debug!(state = ?authenticator.poll_state(), "sign-in ended"))?;

    if !token.has_scopes(&requested) {
        warn!(granted = ?token.scopes, "provider granted fewer scopes than requested");
    }
    match token.expires_at() {
        Some(expires_at) => info!(%expires_at, "sign-in complete"),
        None => info!("sign-in complete"),
    }
    println!("{}", token.access_token);
    Ok(())
}

/// Merges command-line options over the file settings.
pub fn build_auth_config(options: &LoginOptions, config: &ClientConfig) -> ClientResult<AuthConfig> {
    let client_id = match options.client_id.as_deref() {
        Some(id) => crate::secret::resolve(id)
            .map_err(|e| ClientError::Config(format!("failed to resolve client ID: {}", e)))?,
        None => config
            .auth
            .resolve_client_id()
            .map_err(ClientError::Config)?
            .ok_or_else(|| {
                ClientError::Config(
                    "no client ID; pass --client-id, set MICROSOFT_APP_CLIENT_ID, \
                     or add client_id under [auth] in config.toml"
                        .to_string(),
                )
            })?,
    };

    let mut auth_config = config.auth.to_auth_config(client_id);
    if let Some(ref tenant) = options.tenant {
        auth_config = auth_config.with_tenant(tenant);
    }
    if !options.scopes.is_empty() {
        auth_config = auth_config.with_scopes(options.scopes.clone());
    }
    auth_config.validate()?;
    Ok(auth_config)
}
