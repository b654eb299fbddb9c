//! Configuration values.
//!
//! [`ClientConfig`] is what the library needs to talk to the Cloud API and is
//! built by the caller. [`AppConfig`] is read from the environment by the
//! webhook callback binary.
//!
//! # Security Notes
//! - The access token, verify token and app secret are secrets, never log them

use crate::consts;
use envconfig::Envconfig;
use std::{fmt, sync::LazyLock, time::Duration};

/// Immutable settings of a [`WhatsAppClient`](crate::messenger::WhatsAppClient).
#[derive(Clone)]
pub struct ClientConfig {
    /// 🔒 SENSITIVE: Cloud API access token
    token: String,
    /// Phone number id the messages are sent from
    phone_number_id: String,
    /// Graph API url including the version, without trailing slash
    base_url: String,
    /// Timeout applied to every request
    timeout: Duration,
}

impl ClientConfig {
    pub fn new(token: impl Into<String>, phone_number_id: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            phone_number_id: phone_number_id.into(),
            base_url: consts::DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(consts::DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Points the client to another Graph API url (other version, proxy...)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn phone_number_id(&self) -> &str {
        &self.phone_number_id
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// `{base_url}/{phone_number_id}/messages`
    pub fn messages_endpoint(&self) -> String {
        format!(
            "{base}/{id}/messages",
            base = self.base_url,
            id = self.phone_number_id
        )
    }

    /// `{base_url}/{phone_number_id}/media`
    pub fn media_upload_endpoint(&self) -> String {
        format!(
            "{base}/{id}/media",
            base = self.base_url,
            id = self.phone_number_id
        )
    }

    /// `{base_url}/{media_id}`
    pub fn media_endpoint(&self, media_id: &str) -> String {
        format!("{base}/{media_id}", base = self.base_url)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("token", &"<redacted>")
            .field("phone_number_id", &self.phone_number_id)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Settings of the webhook callback binary, read from the environment.
#[derive(Envconfig, Clone)]
pub struct AppConfig {
    /// Environment name (NON-SENSITIVE)
    /// Values: "local", "dev", "prod"
    #[envconfig(default = "local")]
    pub env: String,

    /// 🔒 SENSITIVE: Cloud API access token
    pub whatsapp_token: String,

    /// WhatsApp Business phone number ID (SEMI-SENSITIVE)
    pub whatsapp_phone_number_id: String,

    /// Graph API url including version (NON-SENSITIVE)
    #[envconfig(default = "https://graph.facebook.com/v21.0")]
    pub whatsapp_base_url: String,

    /// 🔒 SENSITIVE: token echoed by Meta in the subscription handshake
    pub whatsapp_verify_token: String,

    /// 🔒 SENSITIVE: app secret used to sign webhook deliveries.
    /// Signature checks are skipped when unset.
    pub whatsapp_app_secret: Option<String>,

    /// Host address for the callback server (NON-SENSITIVE)
    #[envconfig(default = "0.0.0.0")]
    pub hook_host: String,

    /// Port for the callback server (NON-SENSITIVE)
    #[envconfig(default = "5000")]
    pub hook_port: u16,

    /// Timeout in seconds for Cloud API requests (NON-SENSITIVE)
    #[envconfig(default = "30")]
    pub http_timeout_secs: u64,
}

impl AppConfig {
    /// Checks if running in production environment
    pub fn is_prod(&self) -> bool {
        self.env.to_lowercase() == "prod"
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(&self.whatsapp_token, &self.whatsapp_phone_number_id)
            .with_base_url(&self.whatsapp_base_url)
            .with_timeout(Duration::from_secs(self.http_timeout_secs))
    }
}

/// Global configuration of the callback binary.
///
/// Loaded on first access, panics with a descriptive message when a required
/// variable is missing.
pub static APP_CONFIG: LazyLock<AppConfig> = LazyLock::new(|| {
    AppConfig::init_from_env()
        .expect("Failed to load configuration. Check WHATSAPP_* environment variables.")
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        let config = ClientConfig::new("secret", "104000").with_base_url("http://localhost:9000/");

        assert_eq!(config.messages_endpoint(), "http://localhost:9000/104000/messages");
        assert_eq!(config.media_upload_endpoint(), "http://localhost:9000/104000/media");
        assert_eq!(config.media_endpoint("m-1"), "http://localhost:9000/m-1");
    }

    #[test]
    fn test_default_base_url() {
        let config = ClientConfig::new("secret", "104000");
        assert_eq!(config.base_url(), "https://graph.facebook.com/v21.0");
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = ClientConfig::new("super-secret-token", "104000");
        let printed = format!("{config:?}");
        assert!(!printed.contains("super-secret-token"));
        assert!(printed.contains("104000"));
    }
}
