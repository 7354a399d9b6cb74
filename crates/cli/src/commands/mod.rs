//! Command implementations.
//!
//! Every command runs against a [`Context`] built once per invocation: the
//! storefront service plus the credentials resolved for the chosen point of
//! sale. Output is pretty JSON on stdout.

pub mod catalog;
pub mod customers;
pub mod orders;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use kivio_ecommerce_client::{
    ConfigError, CredentialsResolver, EcommerceClient, EcommerceConfig, EcommerceCredentials,
    EcommerceError, EcommerceService, FileIntegrationRegistry, RegistryError,
};
use serde::Serialize;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Integrations file error: {0}")]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Ecommerce(#[from] EcommerceError),

    /// Payload file could not be read.
    #[error("Failed to read payload {path}: {source}")]
    Payload {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No payload given; use --data or --data-file")]
    MissingPayload,

    #[error("Failed to format output: {0}")]
    Output(#[from] serde_json::Error),
}

/// Service and resolved credentials shared by all commands.
pub struct Context {
    pub service: EcommerceService,
    pub credentials: EcommerceCredentials,
}

impl Context {
    /// Load configuration, resolve credentials for `pos_id`, and cancel
    /// in-flight work on Ctrl-C.
    pub async fn connect(integrations: &Path, pos_id: &str) -> Result<Self, CommandError> {
        let config = EcommerceConfig::from_env()?;
        let registry = FileIntegrationRegistry::from_file(integrations).await?;
        let service = EcommerceService::from_client(EcommerceClient::new(&config)?);

        let cancel = CancellationToken::new();
        let on_interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupted, cancelling");
                on_interrupt.cancel();
            }
        });

        let resolver =
            CredentialsResolver::new(Arc::new(registry), service.clone(), config.integration_type);
        let credentials = resolver.resolve(pos_id, cancel).await?;

        Ok(Self {
            service,
            credentials,
        })
    }

    pub fn base_url(&self) -> &str {
        self.credentials.api_url()
    }
}

#[derive(Serialize)]
struct CredentialsView<'a> {
    api_url: &'a str,
    api_key: &'static str,
}

/// Print the resolved base URL. The token is never printed.
pub fn show_credentials(ctx: &Context) -> Result<(), CommandError> {
    print_json(&CredentialsView {
        api_url: ctx.base_url(),
        api_key: "[REDACTED]",
    })
}

/// Print a value as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<(), CommandError> {
    let text = serde_json::to_string_pretty(value)?;
    emit(&text);
    Ok(())
}

/// Print a storefront response body, pretty-printed when it is JSON.
pub fn print_body(body: &[u8]) {
    match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(text) => emit(&text),
            Err(_) => emit(&String::from_utf8_lossy(body)),
        },
        Err(_) => emit(&String::from_utf8_lossy(body)),
    }
}

#[allow(clippy::print_stdout)]
fn emit(text: &str) {
    println!("{text}");
}
