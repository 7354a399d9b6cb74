//! Error taxonomy for storefront operations.
//!
//! Every variant names the operation or identifier it concerns so a failure
//! can be diagnosed without request logs. Nothing in this crate retries; the
//! caller owns retry policy.

use thiserror::Error;

use crate::credentials::RegistryError;

/// Errors that can occur when talking to the storefront.
#[derive(Debug, Error)]
pub enum EcommerceError {
    /// An endpoint URL could not be built from the configured base URL.
    #[error("Invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Request construction or network-level failure.
    #[error("{operation}: request failed: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// Response status outside the accepted set for the operation.
    #[error("{operation}: unexpected status {status}")]
    UnexpectedStatus {
        operation: &'static str,
        status: u16,
        /// Response body, when it could be read.
        body: String,
    },

    /// Response body did not match the expected JSON shape.
    #[error("{operation}: failed to decode response: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The storefront answered 404 for a resource lookup.
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    /// A single-product lookup returned no products.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// The point of sale has no active storefront integration.
    #[error("No active ecommerce integration found for posID: {pos_id}")]
    NoActiveIntegration { pos_id: String },

    /// The active integration lacks `apiUrl`, `username`, or `password`.
    #[error("Missing required ecommerce credentials for posID: {pos_id}")]
    MissingCredentials { pos_id: String },

    /// Exchanging username/password for a bearer token failed.
    #[error("Token exchange failed: {0}")]
    TokenExchangeFailed(String),

    /// The integration registry could not be queried.
    #[error("Error fetching integrations for posID {pos_id}: {source}")]
    Registry {
        pos_id: String,
        #[source]
        source: RegistryError,
    },

    /// The caller cancelled the operation.
    #[error("Operation cancelled")]
    Cancelled,
}

impl EcommerceError {
    /// HTTP status carried by the error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            Self::NotFound { .. } => Some(404),
            _ => None,
        }
    }

    /// Whether the error reports a missing resource.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::ProductNotFound(_))
    }

    pub(crate) fn transport(operation: &'static str) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| Self::Transport { operation, source }
    }

    pub(crate) fn decode(operation: &'static str) -> impl FnOnce(serde_json::Error) -> Self {
        move |source| Self::Decode { operation, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_status_display() {
        let err = EcommerceError::UnexpectedStatus {
            operation: "create order",
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "create order: unexpected status 500");
        assert_eq!(err.status(), Some(500));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_not_found_display() {
        let err = EcommerceError::NotFound {
            resource: "Customer",
            id: "12".to_string(),
        };
        assert_eq!(err.to_string(), "Customer not found: 12");
        assert_eq!(err.status(), Some(404));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_credentials_errors_display() {
        let err = EcommerceError::NoActiveIntegration {
            pos_id: "pos-1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "No active ecommerce integration found for posID: pos-1"
        );

        let err = EcommerceError::TokenExchangeFailed("status 401".to_string());
        assert_eq!(err.to_string(), "Token exchange failed: status 401");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_product_not_found_is_not_found() {
        let err = EcommerceError::ProductNotFound("kivio-ecommerce∼3".to_string());
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Product not found: kivio-ecommerce∼3");
    }
}
