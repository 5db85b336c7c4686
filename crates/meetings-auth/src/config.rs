//! Device-flow configuration.

use url::Url;

use crate::error::{AuthError, AuthResult};

/// Placeholder substituted with the tenant identifier in endpoint templates.
pub const TENANT_PLACEHOLDER: &str = "{tenant}";

/// printf-style placeholder accepted for templates carried over from older
/// configuration files.
const LEGACY_TENANT_PLACEHOLDER: &str = "%s";

/// Microsoft identity platform endpoints.
pub const MICROSOFT_DEVICE_CODE_URL: &str =
    "https://login.microsoftonline.com/{tenant}/oauth2/v2.0/devicecode";
pub const MICROSOFT_TOKEN_URL: &str = "https://login.microsoftonline.com/{tenant}/oauth2/v2.0/token";

/// Tenant that accepts both work/school and personal accounts.
pub const DEFAULT_TENANT: &str = "common";

/// Scope needed to create, read, update and delete calendar events.
pub const DEFAULT_SCOPE: &str = "Calendars.ReadWrite";

/// Status the token endpoint uses for "authorization still pending".
pub const DEFAULT_PENDING_STATUS: u16 = 400;

/// Configuration for one device-flow authentication attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    /// Tenant identifier interpolated into both endpoint templates.
    pub tenant: String,

    /// Public client (application) ID registered with the identity provider.
    pub client_id: String,

    /// Device-code endpoint template containing one tenant placeholder.
    pub device_code_url: String,

    /// Token endpoint template containing one tenant placeholder.
    pub token_url: String,

    /// Requested scopes, sent space-joined.
    pub scopes: Vec<String>,

    /// HTTP status the token endpoint returns while the user has not yet
    /// completed sign-in. Any other non-200 status ends the flow.
    pub pending_status: u16,
}

impl AuthConfig {
    /// Creates a configuration from explicit parts.
    pub fn new(
        tenant: impl Into<String>,
        client_id: impl Into<String>,
        device_code_url: impl Into<String>,
        token_url: impl Into<String>,
        scopes: Vec<String>,
    ) -> Self {
        Self {
            tenant: tenant.into(),
            client_id: client_id.into(),
            device_code_url: device_code_url.into(),
            token_url: token_url.into(),
            scopes,
            pending_status: DEFAULT_PENDING_STATUS,
        }
    }

    /// Creates a configuration against the Microsoft identity platform with
    /// the `common` tenant and calendar read/write scope.
    pub fn microsoft(client_id: impl Into<String>) -> Self {
        Self::new(
            DEFAULT_TENANT,
            client_id,
            MICROSOFT_DEVICE_CODE_URL,
            MICROSOFT_TOKEN_URL,
            vec![DEFAULT_SCOPE.to_string()],
        )
    }

    /// Builder method to set the tenant.
    pub fn with_tenant(mut self, tenant: impl Into<String>) -> Self {
        self.tenant = tenant.into();
        self
    }

    /// Builder method to replace the requested scopes.
    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    /// Builder method to replace both endpoint templates.
    pub fn with_endpoints(
        mut self,
        device_code_url: impl Into<String>,
        token_url: impl Into<String>,
    ) -> Self {
        self.device_code_url = device_code_url.into();
        self.token_url = token_url.into();
        self
    }

    /// Builder method to set the status treated as "authorization pending".
    pub fn with_pending_status(mut self, status: u16) -> Self {
        self.pending_status = status;
        self
    }

    /// Returns the device-code endpoint with the tenant substituted.
    pub fn device_code_endpoint(&self) -> String {
        interpolate(&self.device_code_url, &self.tenant)
    }

    /// Returns the token endpoint with the tenant substituted.
    pub fn token_endpoint(&self) -> String {
        interpolate(&self.token_url, &self.tenant)
    }

    /// Returns the scopes joined by single spaces, as sent on the wire.
    pub fn scope_param(&self) -> String {
        self.scopes.join(" ")
    }

    /// Checks that the configuration can be used to start a flow.
    pub fn validate(&self) -> AuthResult<()> {
        if self.client_id.trim().is_empty() {
            return Err(AuthError::configuration("client_id is required"));
        }
        if self.tenant.trim().is_empty() {
            return Err(AuthError::configuration("tenant is required"));
        }
        if self.scopes.iter().all(|s| s.trim().is_empty()) {
            return Err(AuthError::configuration("at least one scope is required"));
        }
        validate_template("device_code_url", &self.device_code_url, &self.tenant)?;
        validate_template("token_url", &self.token_url, &self.tenant)?;
        if !(400..500).contains(&self.pending_status) {
            return Err(AuthError::configuration(format!(
                "pending_status must be a 4xx status, got {}",
                self.pending_status
            )));
        }
        Ok(())
    }
}

fn interpolate(template: &str, tenant: &str) -> String {
    if template.contains(TENANT_PLACEHOLDER) {
        template.replacen(TENANT_PLACEHOLDER, tenant, 1)
    } else {
        template.replacen(LEGACY_TENANT_PLACEHOLDER, tenant, 1)
    }
}

fn validate_template(name: &str, template: &str, tenant: &str) -> AuthResult<()> {
    let placeholders = template.matches(TENANT_PLACEHOLDER).count()
        + template.matches(LEGACY_TENANT_PLACEHOLDER).count();
    if placeholders != 1 {
        return Err(AuthError::configuration(format!(
            "{} must contain exactly one {} placeholder: {}",
            name, TENANT_PLACEHOLDER, template
        )));
    }

    let url = interpolate(template, tenant);
    Url::parse(&url).map_err(|e| {
        AuthError::configuration(format!("{} is not a valid URL: {}", name, e)).with_source(e)
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuthErrorCode;

    #[test]
    fn microsoft_defaults() {
        let config = AuthConfig::microsoft("11111111-2222-3333-4444-555555555555");
        assert_eq!(config.tenant, "common");
        assert_eq!(config.scopes, vec!["Calendars.ReadWrite".to_string()]);
        assert_eq!(config.pending_status, 400);
        assert_eq!(
            config.device_code_endpoint(),
            "https://login.microsoftonline.com/common/oauth2/v2.0/devicecode"
        );
        assert_eq!(
            config.token_endpoint(),
            "https://login.microsoftonline.com/common/oauth2/v2.0/token"
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn tenant_is_substituted_once() {
        let config = AuthConfig::microsoft("client").with_tenant("contoso.onmicrosoft.com");
        assert_eq!(
            config.token_endpoint(),
            "https://login.microsoftonline.com/contoso.onmicrosoft.com/oauth2/v2.0/token"
        );
    }

    #[test]
    fn legacy_printf_templates_are_accepted() {
        let config = AuthConfig::microsoft("client").with_endpoints(
            "https://login.example.com/%s/devicecode",
            "https://login.example.com/%s/token",
        );
        assert_eq!(
            config.device_code_endpoint(),
            "https://login.example.com/common/devicecode"
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn scopes_are_space_joined() {
        let config = AuthConfig::microsoft("client").with_scopes(vec![
            "Calendars.ReadWrite".to_string(),
            "offline_access".to_string(),
        ]);
        assert_eq!(config.scope_param(), "Calendars.ReadWrite offline_access");
    }

    #[test]
    fn validate_rejects_empty_client_id() {
        let err = AuthConfig::microsoft("  ").validate().unwrap_err();
        assert_eq!(err.code(), AuthErrorCode::Configuration);
        assert!(err.message().contains("client_id"));
    }

    #[test]
    fn validate_rejects_empty_scopes() {
        let err = AuthConfig::microsoft("client")
            .with_scopes(Vec::new())
            .validate()
            .unwrap_err();
        assert!(err.message().contains("scope"));
    }

    #[test]
    fn validate_rejects_template_without_placeholder() {
        let err = AuthConfig::microsoft("client")
            .with_endpoints(
                "https://login.example.com/devicecode",
                "https://login.example.com/{tenant}/token",
            )
            .validate()
            .unwrap_err();
        assert!(err.message().contains("device_code_url"));
    }

    #[test]
    fn validate_rejects_non_4xx_pending_status() {
        let err = AuthConfig::microsoft("client")
            .with_pending_status(500)
            .validate()
            .unwrap_err();
        assert!(err.message().contains("pending_status"));
    }
}
