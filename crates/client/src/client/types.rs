//! Wire records for the storefront REST API.
//!
//! One record per request or response shape. Fields the client never reads
//! are left out; `serde` ignores them on the way in.

use kivio_ecommerce_core::null_as_default;
use serde::{Deserialize, Serialize};

/// Body of the guest-credential token exchange.
#[derive(Debug, Serialize)]
pub(crate) struct TokenRequest<'a> {
    pub guest: bool,
    pub username: &'a str,
    pub password: &'a str,
    pub remember_me: bool,
}

/// Response of the token exchange.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
}

/// A page of products. Every product endpoint wraps results in `products`.
#[derive(Debug, Deserialize)]
pub struct ProductPage<T> {
    #[serde(
        default = "Vec::new",
        deserialize_with = "null_as_default",
        bound(deserialize = "T: Deserialize<'de>")
    )]
    pub products: Vec<T>,
}

/// Product image reference.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductImage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub src: String,
}

/// Product as returned by the listing endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListedProduct {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub short_description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stock_quantity: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<ProductImage>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub published: bool,
}

/// Product as returned by the single-product endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductDetail {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub short_description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sku: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<ProductImage>,
}

/// Response of the product count endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct ProductCount {
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: i64,
}

/// Body of the stock update request.
#[derive(Debug, Serialize)]
pub(crate) struct StockUpdateRequest {
    pub product: StockQuantity,
}

#[derive(Debug, Serialize)]
pub(crate) struct StockQuantity {
    pub stock_quantity: i64,
}

/// Filters accepted by the product listing and count endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilters {
    /// Product name filter; sent as an empty `Name` parameter when unset.
    pub name: Option<String>,
}

impl ItemFilters {
    /// Filter by product name.
    #[must_use]
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    pub(crate) fn name_param(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_request_shape() {
        let body = serde_json::to_value(TokenRequest {
            guest: true,
            username: "shop",
            password: "pw",
            remember_me: true,
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "guest": true,
                "username": "shop",
                "password": "pw",
                "remember_me": true
            })
        );
    }

    #[test]
    fn test_stock_update_shape() {
        let body = serde_json::to_value(StockUpdateRequest {
            product: StockQuantity { stock_quantity: 8 },
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"product": {"stock_quantity": 8}}));
    }

    #[test]
    fn test_listed_product_defaults() {
        let page: ProductPage<ListedProduct> =
            serde_json::from_str(r#"{"products": [{"id": 3}], "total": 1}"#).unwrap();
        let product = &page.products[0];
        assert_eq!(product.id, 3);
        assert!(!product.published);
        assert_eq!(product.stock_quantity, 0);
        assert!(product.images.is_empty());
    }

    #[test]
    fn test_null_fields_decode_as_defaults() {
        let page: ProductPage<ListedProduct> = serde_json::from_str(
            r#"{"products": [{"id": 1, "name": null, "short_description": null,
                 "published": true, "stock_quantity": 5, "images": null}]}"#,
        )
        .unwrap();
        let product = &page.products[0];
        assert!(product.name.is_empty());
        assert!(product.short_description.is_empty());
        assert!(product.images.is_empty());
        assert!(product.published);

        let page: ProductPage<ProductDetail> = serde_json::from_str(
            r#"{"products": [{"id": 2, "sku": null, "images": [{"src": null}]}]}"#,
        )
        .unwrap();
        assert!(page.products[0].sku.is_empty());
        assert!(page.products[0].images[0].src.is_empty());

        let page: ProductPage<ListedProduct> =
            serde_json::from_str(r#"{"products": null}"#).unwrap();
        assert!(page.products.is_empty());
    }

    #[test]
    fn test_missing_products_is_empty_page() {
        let page: ProductPage<ListedProduct> = serde_json::from_str("{}").unwrap();
        assert!(page.products.is_empty());
    }
}
