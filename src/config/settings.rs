//! Configuration settings structure
//!
//! Defines the main settings structure and loading logic for the Trakt client.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration settings for the Trakt client
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Account and application credentials
    pub trakt: TraktSettings,
    /// Endpoint and transport configuration
    pub network: NetworkSettings,
    /// Logging configuration
    pub logging: LoggingSettings,
}

/// Trakt account and API application credentials
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TraktSettings {
    /// API application client id
    pub client_id: String,
    /// API application client secret
    pub client_secret: String,
    /// Account email used on the sign-in form
    pub email: String,
    /// Account password used on the sign-in form
    pub password: String,
    /// Operating mode: `full`, `add-only` or `dry-run`
    pub sync_mode: String,
}

/// Endpoint and transport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkSettings {
    /// Base URL of the JSON API
    pub api_base_url: String,
    /// Base URL of the website used for browser-emulated sign-in
    pub browser_base_url: String,
    /// User agent sent with every request
    pub user_agent: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Attempts per request while rate limited
    pub max_attempts: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level
    pub level: String,
    /// Enable verbose logging
    pub verbose: bool,
}

impl Default for TraktSettings {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            email: String::new(),
            password: String::new(),
            sync_mode: "full".to_string(),
        }
    }
}

// Credentials stay out of debug output.
impl std::fmt::Debug for TraktSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraktSettings")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("sync_mode", &self.sync_mode)
            .finish()
    }
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.trakt.tv".to_string(),
            browser_base_url: "https://trakt.tv".to_string(),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 30,
            max_attempts: 5,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            verbose: false,
        }
    }
}

impl NetworkSettings {
    /// Request timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Settings {
    /// Create new settings with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a TOML file
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Load settings from environment variables
    pub fn from_env() -> crate::Result<Self> {
        Self::default().merge_with_env()
    }

    /// Override fields with any `TRAKT_*` environment variables that are set
    pub fn merge_with_env(mut self) -> crate::Result<Self> {
        let overrides: [(&str, &mut String); 7] = [
            ("TRAKT_CLIENT_ID", &mut self.trakt.client_id),
            ("TRAKT_CLIENT_SECRET", &mut self.trakt.client_secret),
            ("TRAKT_EMAIL", &mut self.trakt.email),
            ("TRAKT_PASSWORD", &mut self.trakt.password),
            ("TRAKT_SYNC_MODE", &mut self.trakt.sync_mode),
            ("TRAKT_API_BASE_URL", &mut self.network.api_base_url),
            ("TRAKT_BROWSER_BASE_URL", &mut self.network.browser_base_url),
        ];
        for (key, field) in overrides {
            if let Ok(value) = std::env::var(key) {
                *field = value;
            }
        }

        if let Ok(timeout) = std::env::var("TRAKT_TIMEOUT_SECS") {
            self.network.timeout_secs = timeout
                .parse()
                .map_err(|e| crate::Error::Config(format!("Invalid timeout: {}", e)))?;
        }

        Ok(self)
    }

    /// Check that credentials are present and base URLs parse
    ///
    /// The sync mode is parsed at client construction, before any request.
    pub fn validate(&self) -> crate::Result<()> {
        let required = [
            ("client_id", &self.trakt.client_id),
            ("client_secret", &self.trakt.client_secret),
            ("email", &self.trakt.email),
            ("password", &self.trakt.password),
        ];
        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(crate::Error::config(format!(
                "missing trakt credentials: {}",
                missing.join(", ")
            )));
        }

        for (name, value) in [
            ("api_base_url", &self.network.api_base_url),
            ("browser_base_url", &self.network.browser_base_url),
        ] {
            url::Url::parse(value)
                .map_err(|e| crate::Error::config(format!("Invalid {}: {}", name, e)))?;
        }

        if self.network.max_attempts == 0 {
            return Err(crate::Error::config("max_attempts must be at least 1"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populated() -> Settings {
        let mut settings = Settings::default();
        settings.trakt.client_id = "id".to_string();
        settings.trakt.client_secret = "secret".to_string();
        settings.trakt.email = "user@example.com".to_string();
        settings.trakt.password = "hunter2".to_string();
        settings
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.network.api_base_url, "https://api.trakt.tv");
        assert_eq!(settings.network.browser_base_url, "https://trakt.tv");
        assert_eq!(settings.network.max_attempts, 5);
        assert_eq!(settings.trakt.sync_mode, "full");
        assert_eq!(settings.network.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_validate_reports_missing_credentials() {
        let err = Settings::default().validate().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("client_id"));
        assert!(message.contains("password"));
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let mut settings = populated();
        settings.network.api_base_url = "not a url".to_string();
        assert!(settings.validate().unwrap_err().to_string().contains("api_base_url"));
    }

    #[test]
    fn test_validate_accepts_populated() {
        assert!(populated().validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let rendered = format!("{:?}", populated());
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("\"secret\""));
        assert!(rendered.contains("<redacted>"));
    }
}
