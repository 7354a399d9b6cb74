//! Integration tests for the Kivio e-commerce client.
//!
//! Each test starts an `httpmock` server standing in for a merchant
//! storefront and drives the public client API against it. No network
//! access or external services are needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p kivio-ecommerce-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `credentials` - Integration selection and token exchange
//! - `catalog` - Listing, sweep, and single-item lookups
//! - `customers` - Customer lookups
//! - `writes` - Create and update operations

use std::sync::Arc;

use httpmock::MockServer;
use kivio_ecommerce_client::{
    CredentialsResolver, EcommerceClient, EcommerceConfig, EcommerceService,
    FileIntegrationRegistry,
};
use kivio_ecommerce_core::{IntegrationConfigResponse, IntegrationResponse};
use secrecy::SecretString;

/// Point of sale used throughout the tests.
pub const POS_ID: &str = "pos-1";

/// Bearer token issued by mocked token endpoints.
pub const TOKEN: &str = "test-token";

/// A mocked storefront and a service pointed at it.
pub struct TestContext {
    pub server: MockServer,
    pub service: EcommerceService,
}

impl TestContext {
    #[must_use]
    pub fn new() -> Self {
        Self {
            server: MockServer::start(),
            service: service(),
        }
    }

    /// Base URL of the mocked storefront.
    #[must_use]
    pub fn base_url(&self) -> String {
        self.server.base_url()
    }

    /// Token accepted by the mocked storefront.
    #[must_use]
    pub fn token() -> SecretString {
        SecretString::from(TOKEN)
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Service over a client built from default configuration.
///
/// # Panics
///
/// Panics if the HTTP client cannot be built.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn service() -> EcommerceService {
    EcommerceService::from_client(EcommerceClient::new(&EcommerceConfig::default()).unwrap())
}

/// Resolver over an in-memory registry.
#[must_use]
pub fn resolver(integrations: Vec<IntegrationResponse>) -> CredentialsResolver {
    CredentialsResolver::new(
        Arc::new(FileIntegrationRegistry::from_integrations(integrations)),
        service(),
        EcommerceConfig::default().integration_type,
    )
}

/// Integration descriptor for [`POS_ID`].
#[must_use]
pub fn integration(
    id: &str,
    integration_type: &str,
    status: &str,
    configs: &[(&str, &str)],
) -> IntegrationResponse {
    IntegrationResponse {
        integration_id: id.to_string(),
        pos_id: POS_ID.to_string(),
        name: format!("Integration {id}"),
        integration_type: integration_type.to_string(),
        status: status.to_string(),
        configs: configs
            .iter()
            .enumerate()
            .map(|(n, (key, value))| IntegrationConfigResponse {
                integration_config_id: format!("{id}-{n}"),
                key: (*key).to_string(),
                value: (*value).to_string(),
            })
            .collect(),
        ..Default::default()
    }
}

/// Active storefront integration with complete connection settings.
#[must_use]
pub fn active_storefront(id: &str, api_url: &str, username: &str) -> IntegrationResponse {
    integration(
        id,
        "kivio_ecommerce",
        "Active",
        &[
            ("apiUrl", api_url),
            ("username", username),
            ("password", "secret"),
        ],
    )
}

/// A page of listing records with ids in `ids`, all published and in stock.
#[must_use]
pub fn product_page(ids: std::ops::Range<u64>) -> serde_json::Value {
    let products: Vec<_> = ids
        .map(|id| {
            serde_json::json!({
                "id": id,
                "name": format!("Product {id}"),
                "short_description": format!("Short {id}"),
                "published": true,
                "stock_quantity": 3,
                "images": [{"src": format!("https://img.example/{id}.png")}]
            })
        })
        .collect();
    serde_json::json!({ "products": products })
}
