//! Configuration types for the HTTP service
//!
//! Sources, later ones overriding earlier ones:
//!
//! 1. `/etc/gitea-webhook/service.yaml`
//! 2. `./config/service.yaml`
//! 3. an explicit file (`--config` or `GW_CONFIG_FILE`)
//! 4. environment variables prefixed `GW__`, e.g. `GW__SERVER__PORT=9090`
//!
//! Every field has a default, so only `webhook.secret` must be supplied.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::ConfigError;

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "GW";

/// Service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// HTTP server settings
    pub server: ServerConfig,

    /// Webhook endpoint settings
    pub webhook: WebhookConfig,

    /// Gitea API connection
    pub gitea: GiteaConfig,

    /// Commit status reporting
    pub status_reporting: StatusReportingConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout_seconds: u64,

    /// Maximum request size in bytes
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout_seconds: 30,
            max_body_size: gitea_webhook::webhook::DEFAULT_MAX_BODY_SIZE,
        }
    }
}

/// Webhook endpoint configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    /// Webhook endpoint path
    pub endpoint_path: String,

    /// Shared secret configured on the Gitea webhook
    pub secret: String,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            endpoint_path: "/webhook".to_string(),
            secret: String::new(),
        }
    }
}

impl fmt::Debug for WebhookConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookConfig")
            .field("endpoint_path", &self.endpoint_path)
            .field("secret", &"<REDACTED>")
            .finish()
    }
}

/// Gitea server connection
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GiteaConfig {
    /// Base URL of the Gitea server
    pub url: Option<String>,

    /// Access token; preferred over username/password
    pub token: Option<String>,

    pub username: Option<String>,
    pub password: Option<String>,
}

impl fmt::Debug for GiteaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GiteaConfig")
            .field("url", &self.url)
            .field("token", &self.token.as_ref().map(|_| "<REDACTED>"))
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<REDACTED>"))
            .finish()
    }
}

/// Commit status reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusReportingConfig {
    /// Post a `pending` status for every accepted event
    pub enabled: bool,

    /// Status context shown in Gitea
    pub context: String,

    /// Link attached to the status
    pub target_url: String,
}

impl Default for StatusReportingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            context: "gitea-webhook".to_string(),
            target_url: String::new(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set
    pub level: String,

    /// Enable JSON structured logging
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "gitea_webhook=info,gitea_webhook_service=info,tower_http=info".to_string(),
            json_format: false,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from the standard sources plus an optional
    /// explicit file, then validate it.
    pub fn load(explicit_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(
                config::File::with_name("/etc/gitea-webhook/service")
                    .required(false)
                    .format(config::FileFormat::Yaml),
            )
            .add_source(
                config::File::with_name("config/service")
                    .required(false)
                    .format(config::FileFormat::Yaml),
            );

        if let Some(path) = explicit_path.filter(|p| !p.is_empty()) {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        let config = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        Self::from_config(config)
    }

    /// Deserialize and validate an already assembled configuration.
    pub fn from_config(config: config::Config) -> Result<Self, ConfigError> {
        let service_config: ServiceConfig = config.try_deserialize()?;
        service_config.validate()?;
        Ok(service_config)
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.webhook.secret.is_empty() {
            return Err(ConfigError::Missing {
                key: "webhook.secret".to_string(),
            });
        }

        if !self.webhook.endpoint_path.starts_with('/') {
            return Err(ConfigError::Invalid {
                message: format!(
                    "webhook.endpoint_path must be absolute, got '{}'",
                    self.webhook.endpoint_path
                ),
            });
        }

        // Served by the health route; the router cannot hold both
        if self.webhook.endpoint_path == crate::HEALTH_PATH {
            return Err(ConfigError::Invalid {
                message: format!(
                    "webhook.endpoint_path must not be '{}'",
                    crate::HEALTH_PATH
                ),
            });
        }

        if self.server.max_body_size == 0 {
            return Err(ConfigError::Invalid {
                message: "server.max_body_size must be greater than zero".to_string(),
            });
        }

        if let Some(url) = &self.gitea.url {
            url::Url::parse(url).map_err(|e| ConfigError::Invalid {
                message: format!("gitea.url '{}' is not a valid URL: {}", url, e),
            })?;
        }

        if self.status_reporting.enabled {
            if self.gitea.url.is_none() {
                return Err(ConfigError::Missing {
                    key: "gitea.url".to_string(),
                });
            }
            if self.status_reporting.context.is_empty() {
                return Err(ConfigError::Invalid {
                    message: "status_reporting.context must not be empty".to_string(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
