//! Configuration loading and validation for the vault service.
//!
//! All values are read from environment variables once at startup. The process
//! exits with a clear error message if any value is present but invalid.

use anyhow::{Context, Result};
use serde::Deserialize;

/// Where this process runs, which decides whether the identity provider is
/// brought up at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionContext {
    /// Serves interactive users: the identity provider and its session
    /// listener are initialised.
    Interactive,
    /// Batch or server-side execution: no identity provider, the session stays
    /// `Loading`, field encryption still works.
    Headless,
}

/// Validated vault service configuration.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// Passphrase the field key is derived from. Falls back to the build-time
    /// value, then to an insecure default.
    #[serde(default)]
    pub encryption_key: Option<String>,

    /// Refuse to start instead of using the insecure default passphrase.
    #[serde(default)]
    pub require_encryption_key: bool,

    /// Execution context gate.
    #[serde(default = "default_execution_context")]
    pub execution_context: ExecutionContext,

    /// Project API key for the identity provider.
    #[serde(default)]
    pub identity_api_key: Option<String>,

    /// Base URL of the identity provider REST API.
    #[serde(default = "default_identity_base_url")]
    pub identity_base_url: String,

    /// Port the HTTP server listens on.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// OTLP endpoint for span export. Logs only when unset.
    #[serde(default)]
    pub otel_exporter_otlp_endpoint: Option<String>,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |secret: &Option<String>| secret.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("Config")
            .field("encryption_key", &redact(&self.encryption_key))
            .field("require_encryption_key", &self.require_encryption_key)
            .field("execution_context", &self.execution_context)
            .field("identity_api_key", &redact(&self.identity_api_key))
            .field("identity_base_url", &self.identity_base_url)
            .field("listen_port", &self.listen_port)
            .field("otel_exporter_otlp_endpoint", &self.otel_exporter_otlp_endpoint)
            .field("log_level", &self.log_level)
            .finish()
    }
}

fn default_execution_context() -> ExecutionContext {
    ExecutionContext::Interactive
}
fn default_identity_base_url() -> String {
    "https://identitytoolkit.googleapis.com/v1".into()
}
fn default_listen_port() -> u16 {
    8080
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable cannot be parsed or fails validation.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        if let Some(key) = &self.encryption_key {
            if key.trim().is_empty() {
                anyhow::bail!("ENCRYPTION_KEY must not be blank when set");
            }
        }
        if self.listen_port == 0 {
            anyhow::bail!("LISTEN_PORT must be > 0");
        }
        if self.identity_base_url.trim().is_empty() {
            anyhow::bail!("IDENTITY_BASE_URL must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Config {
        Config {
            encryption_key: Some("passphrase".into()),
            require_encryption_key: false,
            execution_context: default_execution_context(),
            identity_api_key: Some("api-key".into()),
            identity_base_url: default_identity_base_url(),
            listen_port: default_listen_port(),
            otel_exporter_otlp_endpoint: None,
            log_level: default_log_level(),
        }
    }

    #[test]
    fn defaults_are_correct() {
        assert_eq!(default_execution_context(), ExecutionContext::Interactive);
        assert_eq!(
            default_identity_base_url(),
            "https://identitytoolkit.googleapis.com/v1"
        );
        assert_eq!(default_listen_port(), 8080);
        assert_eq!(default_log_level(), "info");
    }

    #[test]
    fn validate_accepts_valid_config() {
        assert!(valid().validate().is_ok());
        let no_key = Config {
            encryption_key: None,
            ..valid()
        };
        assert!(no_key.validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_encryption_key() {
        let cfg = Config {
            encryption_key: Some("   ".into()),
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_port() {
        let cfg = Config {
            listen_port: 0,
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_base_url() {
        let cfg = Config {
            identity_base_url: "".into(),
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn debug_redacts_secrets() {
        let out = format!("{:?}", valid());
        assert!(!out.contains("passphrase"));
        assert!(!out.contains("api-key"));
        assert!(out.contains("[REDACTED]"));
        assert!(out.contains("listen_port: 8080"));

        let unset = format!(
            "{:?}",
            Config {
                identity_api_key: None,
                ..valid()
            }
        );
        assert!(unset.contains("identity_api_key: None"));
    }

    #[test]
    fn execution_context_parses_lowercase() {
        let ctx: ExecutionContext = serde_json::from_str("\"headless\"").unwrap();
        assert_eq!(ctx, ExecutionContext::Headless);
    }
}
