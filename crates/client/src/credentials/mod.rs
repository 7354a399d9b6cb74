//! Per-merchant credential resolution.
//!
//! Given a point-of-sale id, the resolver finds the merchant's active
//! storefront integration in the registry, reads its connection settings,
//! and exchanges them for a bearer token. Nothing is cached: every call
//! performs a registry query and a token exchange.
//!
//! Every await in the resolution races the caller's cancellation token, and
//! [`EcommerceCredentials::run`] lets the caller keep using that token for
//! the service calls that follow.

mod registry;

use std::sync::Arc;

use kivio_ecommerce_core::IntegrationResponse;
use secrecy::SecretString;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::client::token_endpoint;
use crate::error::EcommerceError;
use crate::service::EcommerceService;

pub use registry::{FileIntegrationRegistry, IntegrationRegistry, RegistryError};

/// Config key holding the storefront base URL.
pub const API_URL_KEY: &str = "apiUrl";
/// Config key holding the storefront username.
pub const USERNAME_KEY: &str = "username";
/// Config key holding the storefront password.
pub const PASSWORD_KEY: &str = "password";

// =============================================================================
// EcommerceCredentials
// =============================================================================

/// Resolved connection details for one merchant.
#[derive(Clone)]
pub struct EcommerceCredentials {
    api_url: String,
    api_key: SecretString,
    cancel: CancellationToken,
}

impl std::fmt::Debug for EcommerceCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EcommerceCredentials")
            .field("api_url", &self.api_url)
            .field("api_key", &"[REDACTED]")
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}

impl EcommerceCredentials {
    #[must_use]
    pub fn new(api_url: impl Into<String>, api_key: SecretString, cancel: CancellationToken) -> Self {
        Self {
            api_url: api_url.into(),
            api_key,
            cancel,
        }
    }

    /// Storefront base URL.
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Bearer token for the storefront.
    #[must_use]
    pub const fn api_key(&self) -> &SecretString {
        &self.api_key
    }

    /// Cancellation token supplied at resolution.
    #[must_use]
    pub const fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Run a storefront call under this resolution's cancellation token.
    ///
    /// # Errors
    ///
    /// Returns `EcommerceError::Cancelled` if the token fires first, otherwise
    /// whatever the call returns.
    pub async fn run<T, F>(&self, call: F) -> Result<T, EcommerceError>
    where
        F: Future<Output = Result<T, EcommerceError>>,
    {
        with_cancel(&self.cancel, call).await?
    }
}

// =============================================================================
// CredentialsResolver
// =============================================================================

/// Resolves [`EcommerceCredentials`] for a point of sale.
#[derive(Clone)]
pub struct CredentialsResolver {
    registry: Arc<dyn IntegrationRegistry>,
    service: EcommerceService,
    integration_type: String,
}

impl std::fmt::Debug for CredentialsResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsResolver")
            .field("integration_type", &self.integration_type)
            .finish_non_exhaustive()
    }
}

impl CredentialsResolver {
    /// Create a resolver.
    ///
    /// `integration_type` is the registry type tag that marks storefront
    /// integrations, normally `EcommerceConfig::integration_type`.
    #[must_use]
    pub fn new(
        registry: Arc<dyn IntegrationRegistry>,
        service: EcommerceService,
        integration_type: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            service,
            integration_type: integration_type.into(),
        }
    }

    /// Resolve base URL and bearer token for `pos_id`.
    ///
    /// # Errors
    ///
    /// - `Registry` if the registry query fails
    /// - `NoActiveIntegration` if no active storefront integration exists
    /// - `MissingCredentials` if `apiUrl`, `username`, or `password` is empty
    /// - `TokenExchangeFailed` if the token endpoint does not issue a token
    /// - `Cancelled` if `cancel` fires first
    #[instrument(skip(self, cancel), fields(pos_id = %pos_id))]
    pub async fn resolve(
        &self,
        pos_id: &str,
        cancel: CancellationToken,
    ) -> Result<EcommerceCredentials, EcommerceError> {
        let integrations = with_cancel(&cancel, self.registry.integrations_by_pos_id(pos_id))
            .await?
            .map_err(|source| EcommerceError::Registry {
                pos_id: pos_id.to_string(),
                source,
            })?;

        debug!(count = integrations.len(), "Fetched integrations");

        let settings = connection_settings(&integrations, &self.integration_type, pos_id)?;
        let token_url = token_endpoint(settings.api_url)
            .map_err(|e| EcommerceError::TokenExchangeFailed(e.to_string()))?;

        let api_key = with_cancel(
            &cancel,
            self.service
                .get_api_key(settings.username, &settings.password, &token_url),
        )
        .await??;

        info!(api_url = %settings.api_url, "Resolved storefront credentials");
        Ok(EcommerceCredentials::new(settings.api_url, api_key, cancel))
    }
}

/// Connection settings of the selected integration.
struct ConnectionSettings<'a> {
    api_url: &'a str,
    username: &'a str,
    password: SecretString,
}

/// Pick the first active integration of `integration_type`, in registry
/// order, and read its connection settings.
fn connection_settings<'a>(
    integrations: &'a [IntegrationResponse],
    integration_type: &str,
    pos_id: &str,
) -> Result<ConnectionSettings<'a>, EcommerceError> {
    let integration = integrations
        .iter()
        .find(|i| i.is_active_of_type(integration_type))
        .ok_or_else(|| {
            warn!(pos_id, "No active storefront integration");
            EcommerceError::NoActiveIntegration {
                pos_id: pos_id.to_string(),
            }
        })?;

    let setting = |key: &str| integration.config_value(key).filter(|v| !v.is_empty());

    match (
        setting(API_URL_KEY),
        setting(USERNAME_KEY),
        setting(PASSWORD_KEY),
    ) {
        (Some(api_url), Some(username), Some(password)) => Ok(ConnectionSettings {
            api_url,
            username,
            password: SecretString::from(password),
        }),
        _ => {
            warn!(
                pos_id,
                integration_id = %integration.integration_id,
                "Storefront integration is missing connection settings"
            );
            Err(EcommerceError::MissingCredentials {
                pos_id: pos_id.to_string(),
            })
        }
    }
}

/// Await `fut` unless `cancel` fires first.
async fn with_cancel<F: Future>(
    cancel: &CancellationToken,
    fut: F,
) -> Result<F::Output, EcommerceError> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(EcommerceError::Cancelled),
        output = fut => Ok(output),
    }
}
