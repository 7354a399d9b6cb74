//! Kivio e-commerce storefront client.
//!
//! Layered access to a merchant's storefront REST API:
//!
//! - [`EcommerceClient`]: HTTP transport, one request per call
//! - [`EcommerceRepository`]: decoding, catalog mapping, and the full catalog sweep
//! - [`EcommerceService`]: the operations exposed to the platform
//! - [`CredentialsResolver`]: point-of-sale id to base URL and bearer token
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use kivio_ecommerce_client::{
//!     CredentialsResolver, EcommerceClient, EcommerceConfig, EcommerceService,
//!     FileIntegrationRegistry,
//! };
//! use tokio_util::sync::CancellationToken;
//!
//! let config = EcommerceConfig::from_env()?;
//! let service = EcommerceService::from_client(EcommerceClient::new(&config)?);
//! let registry = FileIntegrationRegistry::from_file("integrations.json").await?;
//! let resolver = CredentialsResolver::new(Arc::new(registry), service.clone(), config.integration_type);
//!
//! let creds = resolver.resolve("pos-1", CancellationToken::new()).await?;
//! let items = creds
//!     .run(service.get_all_items(creds.api_url(), creds.api_key()))
//!     .await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod repository;
pub mod service;

pub use client::types::ItemFilters;
pub use client::{EcommerceClient, token_endpoint};
pub use config::{ConfigError, EcommerceConfig};
pub use credentials::{
    CredentialsResolver, EcommerceCredentials, FileIntegrationRegistry, IntegrationRegistry,
    RegistryError,
};
pub use error::EcommerceError;
pub use repository::EcommerceRepository;
pub use service::EcommerceService;
