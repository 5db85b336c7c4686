//! Configuration commands.

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Dump the current configuration to stdout.
pub fn dump(config: &ClientConfig) -> ClientResult<()> {
    let toml_str = toml::to_string_pretty(config)
        .map_err(|e| ClientError::Config(format!("failed to serialize config: {}", e)))?;
    println!("# config.toml ({})", ClientConfig::default_path().display());
    println!("{}", toml_str);

    Ok(())
}

/// Validate the configuration.
pub fn validate(config: &ClientConfig) -> ClientResult<()> {
    let client_id = config.auth.resolve_client_id().map_err(ClientError::Config)?;

    // Endpoint templates are checked even before a client ID is configured.
    let auth = config
        .auth
        .to_auth_config(client_id.as_deref().unwrap_or("unset"));
    auth.validate()?;

    match client_id {
        Some(_) => println!("Client ID resolves."),
        None => println!("No client_id configured; pass --client-id or set MICROSOFT_APP_CLIENT_ID."),
    }

    url::Url::parse(&config.graph.base_url)
        .map_err(|e| ClientError::Config(format!("invalid graph base_url: {}", e)))?;

    println!("Configuration is valid.");
    Ok(())
}

/// Show the configuration file path.
pub fn path() -> ClientResult<()> {
    let config_path = ClientConfig::default_path();
    println!("config: {}", config_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(validate(&ClientConfig::default()).is_ok());
    }

    #[test]
    fn bad_endpoint_template_is_rejected() {
        let mut config = ClientConfig::default();
        config.auth.token_url = "not a url".to_string();
        assert!(matches!(validate(&config), Err(ClientError::Auth(_))));
    }
}
