//! Integration registry seam.
//!
//! The registry stores per-merchant integration settings. The resolver only
//! needs one query from it, so the seam is a single-method async trait.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use kivio_ecommerce_core::IntegrationResponse;
use thiserror::Error;
use tracing::{debug, instrument};

/// Errors raised by an integration registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The registry service could not be reached or refused the query.
    #[error("Registry unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Source of integration descriptors for a point of sale.
#[async_trait]
pub trait IntegrationRegistry: Send + Sync {
    /// Every integration configured for `pos_id`, in registry order.
    async fn integrations_by_pos_id(
        &self,
        pos_id: &str,
    ) -> Result<Vec<IntegrationResponse>, RegistryError>;
}

/// Registry backed by a JSON array of integrations loaded once from disk.
#[derive(Debug, Clone, Default)]
pub struct FileIntegrationRegistry {
    integrations: Vec<IntegrationResponse>,
}

impl FileIntegrationRegistry {
    /// Load integrations from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Io` if the file cannot be read, or
    /// `RegistryError::Parse` if it is not a JSON array of integrations.
    #[instrument(skip(path), fields(file = %path.as_ref().display()))]
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| RegistryError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let integrations: Vec<IntegrationResponse> =
            serde_json::from_slice(&bytes).map_err(|source| RegistryError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        debug!(count = integrations.len(), "Loaded integrations");
        Ok(Self::from_integrations(integrations))
    }

    /// Build a registry from integrations already in memory.
    #[must_use]
    pub const fn from_integrations(integrations: Vec<IntegrationResponse>) -> Self {
        Self { integrations }
    }
}

#[async_trait]
impl IntegrationRegistry for FileIntegrationRegistry {
    async fn integrations_by_pos_id(
        &self,
        pos_id: &str,
    ) -> Result<Vec<IntegrationResponse>, RegistryError> {
        Ok(self
            .integrations
            .iter()
            .filter(|i| i.pos_id == pos_id)
            .cloned()
            .collect())
    }
}
