//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `ECOMMERCE_REQUEST_TIMEOUT_SECS` - Connect and overall request timeout (default: 30)
//! - `ECOMMERCE_INTEGRATION_TYPE` - Registry type tag of storefront integrations
//!   (default: `kivio_ecommerce`)

use std::time::Duration;

use kivio_ecommerce_core::ECOMMERCE_INTEGRATION_TYPE;
use thiserror::Error;

/// Default connect and overall request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EcommerceConfig {
    /// Applied both as connect timeout and as overall request timeout
    pub request_timeout: Duration,
    /// Registry type tag that marks storefront integrations
    pub integration_type: String,
}

impl Default for EcommerceConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            integration_type: ECOMMERCE_INTEGRATION_TYPE.to_string(),
        }
    }
}

impl EcommerceConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let request_timeout = match lookup("ECOMMERCE_REQUEST_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|e| {
                    ConfigError::InvalidEnvVar(
                        "ECOMMERCE_REQUEST_TIMEOUT_SECS".to_string(),
                        e.to_string(),
                    )
                })?;
                if secs == 0 {
                    return Err(ConfigError::InvalidEnvVar(
                        "ECOMMERCE_REQUEST_TIMEOUT_SECS".to_string(),
                        "timeout must be at least 1 second".to_string(),
                    ));
                }
                Duration::from_secs(secs)
            }
            None => DEFAULT_REQUEST_TIMEOUT,
        };

        let integration_type = lookup("ECOMMERCE_INTEGRATION_TYPE")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| ECOMMERCE_INTEGRATION_TYPE.to_string());

        Ok(Self {
            request_timeout,
            integration_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = EcommerceConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, EcommerceConfig::default());
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.integration_type, "kivio_ecommerce");
    }

    #[test]
    fn test_overrides() {
        let config = EcommerceConfig::from_lookup(lookup(&[
            ("ECOMMERCE_REQUEST_TIMEOUT_SECS", "5"),
            ("ECOMMERCE_INTEGRATION_TYPE", "staging_ecommerce"),
        ]))
        .unwrap();
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.integration_type, "staging_ecommerce");
    }

    #[test]
    fn test_invalid_timeout() {
        let err = EcommerceConfig::from_lookup(lookup(&[(
            "ECOMMERCE_REQUEST_TIMEOUT_SECS",
            "soon",
        )]))
        .unwrap_err();
        assert!(err.to_string().contains("ECOMMERCE_REQUEST_TIMEOUT_SECS"));

        assert!(
            EcommerceConfig::from_lookup(lookup(&[("ECOMMERCE_REQUEST_TIMEOUT_SECS", "0")]))
                .is_err()
        );
    }

    #[test]
    fn test_blank_integration_type_falls_back() {
        let config =
            EcommerceConfig::from_lookup(lookup(&[("ECOMMERCE_INTEGRATION_TYPE", "  ")])).unwrap();
        assert_eq!(config.integration_type, "kivio_ecommerce");
    }
}
