//! Storefront REST transport client.
//!
//! Issues one HTTP request per call and hands back raw response bytes or a
//! typed [`EcommerceError`]. The client owns nothing but a configured
//! `reqwest::Client`; base URL and bearer token are supplied on every call
//! because they differ per merchant.
//!
//! # Example
//!
//! ```rust,ignore
//! use kivio_ecommerce_client::{EcommerceClient, EcommerceConfig};
//!
//! let client = EcommerceClient::new(&EcommerceConfig::default())?;
//! let body = client.get_orders("https://shop.example", &token).await?;
//! ```

pub mod types;

use std::sync::Arc;

use kivio_ecommerce_core::{CustomerId, OrderId, OrderItemId};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, error, instrument};
use url::Url;

use crate::config::EcommerceConfig;
use crate::error::EcommerceError;

use types::{
    ItemFilters, ProductCount, StockQuantity, StockUpdateRequest, TokenRequest, TokenResponse,
};

const JSON: &str = "application/json";
const JSON_PATCH: &str = "application/json-patch+json";
const TEXT_PLAIN: &str = "text/plain";

/// Maximum number of body characters copied into logs.
const LOGGED_BODY_CHARS: usize = 500;

const OK: &[StatusCode] = &[StatusCode::OK];
const CREATED: &[StatusCode] = &[StatusCode::OK, StatusCode::CREATED];
const UPDATED: &[StatusCode] = &[StatusCode::OK, StatusCode::NO_CONTENT];

// =============================================================================
// EcommerceClient
// =============================================================================

/// HTTP client for the storefront REST API.
///
/// Cheap to clone; clones share one connection pool and are safe to use from
/// concurrent tasks.
#[derive(Clone)]
pub struct EcommerceClient {
    inner: Arc<EcommerceClientInner>,
}

struct EcommerceClientInner {
    client: reqwest::Client,
}

impl std::fmt::Debug for EcommerceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EcommerceClient").finish_non_exhaustive()
    }
}

impl EcommerceClient {
    /// Create a new storefront client.
    ///
    /// The configured timeout applies both to connecting and to the whole
    /// request.
    ///
    /// # Errors
    ///
    /// Returns `EcommerceError::Transport` if the HTTP client fails to build.
    pub fn new(config: &EcommerceConfig) -> Result<Self, EcommerceError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.request_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(EcommerceError::transport("build http client"))?;

        Ok(Self::with_http_client(client))
    }

    /// Wrap an existing `reqwest::Client`.
    #[must_use]
    pub fn with_http_client(client: reqwest::Client) -> Self {
        Self {
            inner: Arc::new(EcommerceClientInner { client }),
        }
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Exchange storefront username/password for a bearer token.
    ///
    /// Sends a guest-credential request to `token_url` and expects exactly
    /// HTTP 200 with an `access_token` string.
    ///
    /// # Errors
    ///
    /// Returns `EcommerceError::TokenExchangeFailed` for transport failures,
    /// any status other than 200, an unparseable body, or a missing token.
    #[instrument(skip(self, password), fields(token_url = %token_url, username = %username))]
    pub async fn exchange_token(
        &self,
        token_url: &str,
        username: &str,
        password: &SecretString,
    ) -> Result<SecretString, EcommerceError> {
        let url = Url::parse(token_url).map_err(|e| {
            EcommerceError::TokenExchangeFailed(format!("invalid token url {token_url}: {e}"))
        })?;

        let body = serde_json::to_vec(&TokenRequest {
            guest: true,
            username,
            password: password.expose_secret(),
            remember_me: true,
        })
        .map_err(|e| {
            EcommerceError::TokenExchangeFailed(format!("failed to marshal payload: {e}"))
        })?;

        let response = self
            .inner
            .client
            .post(url)
            .header(ACCEPT, TEXT_PLAIN)
            .header(CONTENT_TYPE, JSON_PATCH)
            .body(body)
            .send()
            .await
            .map_err(|e| EcommerceError::TokenExchangeFailed(format!("failed to send request: {e}")))?;

        let status = response.status();
        if status != StatusCode::OK {
            error!(status = %status, "Token endpoint rejected credentials");
            return Err(EcommerceError::TokenExchangeFailed(format!(
                "status code: {}",
                status.as_u16()
            )));
        }

        let bytes = response.bytes().await.map_err(|e| {
            EcommerceError::TokenExchangeFailed(format!("failed to read response body: {e}"))
        })?;

        let token: TokenResponse = serde_json::from_slice(&bytes).map_err(|e| {
            EcommerceError::TokenExchangeFailed(format!("failed to unmarshal response: {e}"))
        })?;

        token
            .access_token
            .filter(|t| !t.is_empty())
            .map(SecretString::from)
            .ok_or_else(|| {
                EcommerceError::TokenExchangeFailed(
                    "access_token not found in response".to_string(),
                )
            })
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Get one page of products with publish and name filters.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the status is not 200.
    #[instrument(skip(self, api_key), fields(base_url = %base_url))]
    pub async fn get_items(
        &self,
        base_url: &str,
        api_key: &SecretString,
        page: u32,
        limit: u32,
        published_status: bool,
        filters: &ItemFilters,
    ) -> Result<Vec<u8>, EcommerceError> {
        let mut url = endpoint(base_url, &["api", "products"])?;
        url.query_pairs_mut()
            .append_pair("Page", &page.to_string())
            .append_pair("Limit", &limit.to_string())
            .append_pair("PublishedStatus", &published_status.to_string())
            .append_pair("Name", filters.name_param());

        self.get("get items", url, api_key).await
    }

    /// Get one page of products without filters, as used by the full sweep.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the status is not 200.
    #[instrument(skip(self, api_key), fields(base_url = %base_url))]
    pub async fn get_products_page(
        &self,
        base_url: &str,
        api_key: &SecretString,
        page: u32,
        limit: u32,
    ) -> Result<Vec<u8>, EcommerceError> {
        let mut url = endpoint(base_url, &["api", "products"])?;
        url.query_pairs_mut()
            .append_pair("Page", &page.to_string())
            .append_pair("Limit", &limit.to_string());

        self.get("get all items", url, api_key).await
    }

    /// Count published products matching the filters.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the status is not 200, or the
    /// body has no numeric `count`.
    #[instrument(skip(self, api_key), fields(base_url = %base_url))]
    pub async fn count_items(
        &self,
        base_url: &str,
        api_key: &SecretString,
        filters: &ItemFilters,
    ) -> Result<i64, EcommerceError> {
        const OPERATION: &str = "count items";

        let mut url = endpoint(base_url, &["api", "products", "count"])?;
        url.query_pairs_mut()
            .append_pair("PublishedStatus", "true")
            .append_pair("Name", filters.name_param());

        let body = self.get(OPERATION, url, api_key).await?;
        let result: ProductCount =
            serde_json::from_slice(&body).map_err(EcommerceError::decode(OPERATION))?;

        debug!(count = result.count, "Counted storefront items");
        Ok(result.count)
    }

    /// Get a product by its raw (untagged) storefront id.
    ///
    /// # Errors
    ///
    /// Returns `EcommerceError::ProductNotFound` on 404, or another error if
    /// the request fails or the status is not 200.
    #[instrument(skip(self, api_key), fields(base_url = %base_url, item_id = %item_id))]
    pub async fn get_item_by_id(
        &self,
        base_url: &str,
        api_key: &SecretString,
        item_id: &str,
    ) -> Result<Vec<u8>, EcommerceError> {
        let url = endpoint(base_url, &["api", "products", item_id])?;
        let request = self.inner.client.get(url).bearer_auth(api_key.expose_secret());

        let (status, body) = self.execute("get item", request).await?;
        if status == StatusCode::NOT_FOUND {
            return Err(EcommerceError::ProductNotFound(item_id.to_string()));
        }
        expect_status("get item", status, body, OK)
    }

    /// Set the stock quantity of a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the status is not 200/204.
    #[instrument(skip(self, api_key), fields(base_url = %base_url, item_id = %item_id))]
    pub async fn update_item_stock(
        &self,
        base_url: &str,
        api_key: &SecretString,
        item_id: &str,
        new_stock: i64,
    ) -> Result<(), EcommerceError> {
        const OPERATION: &str = "update item stock";

        let url = endpoint(base_url, &["api", "products", item_id])?;
        let body = serde_json::to_vec(&StockUpdateRequest {
            product: StockQuantity {
                stock_quantity: new_stock,
            },
        })
        .map_err(EcommerceError::decode(OPERATION))?;

        let request = self
            .inner
            .client
            .put(url)
            .bearer_auth(api_key.expose_secret())
            .header(CONTENT_TYPE, JSON)
            .body(body);

        let (status, body) = self.execute(OPERATION, request).await?;
        expect_status(OPERATION, status, body, UPDATED).map(drop)
    }

    // =========================================================================
    // Customers
    // =========================================================================

    /// List customers.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the status is not 200.
    #[instrument(skip(self, api_key), fields(base_url = %base_url))]
    pub async fn get_customers(
        &self,
        base_url: &str,
        api_key: &SecretString,
    ) -> Result<Vec<u8>, EcommerceError> {
        let url = endpoint(base_url, &["api", "customers"])?;
        self.get("get customers", url, api_key).await
    }

    /// Get a customer by id.
    ///
    /// Unlike the other customer endpoints this one has no `/api` prefix.
    ///
    /// # Errors
    ///
    /// Returns `EcommerceError::NotFound` on 404, or another error if the
    /// request fails or the status is not 200.
    #[instrument(skip(self, api_key), fields(base_url = %base_url, customer_id = %id))]
    pub async fn get_customer_by_id(
        &self,
        base_url: &str,
        api_key: &SecretString,
        id: &str,
    ) -> Result<Vec<u8>, EcommerceError> {
        let url = endpoint(base_url, &["customers", id])?;
        let request = self
            .inner
            .client
            .get(url)
            .bearer_auth(api_key.expose_secret())
            .header(CONTENT_TYPE, JSON);

        let (status, body) = self.execute("get customer", request).await?;
        if status == StatusCode::NOT_FOUND {
            return Err(EcommerceError::NotFound {
                resource: "Customer",
                id: id.to_string(),
            });
        }
        expect_status("get customer", status, body, OK)
    }

    /// Create a customer from a JSON payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the status is not 200/201.
    #[instrument(skip(self, api_key, customer_data), fields(base_url = %base_url))]
    pub async fn create_customer(
        &self,
        base_url: &str,
        api_key: &SecretString,
        customer_data: &[u8],
    ) -> Result<Vec<u8>, EcommerceError> {
        let url = endpoint(base_url, &["api", "customers"])?;
        self.post_json("create customer", url, api_key, customer_data)
            .await
    }

    /// Create a billing address for a customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the status is not 200/201.
    #[instrument(skip(self, api_key, address_data), fields(base_url = %base_url, customer_id = %customer_id))]
    pub async fn create_billing_address(
        &self,
        base_url: &str,
        api_key: &SecretString,
        customer_id: CustomerId,
        address_data: &[u8],
    ) -> Result<Vec<u8>, EcommerceError> {
        let id = customer_id.to_string();
        let url = endpoint(base_url, &["api", "customers", &id, "billingaddress"])?;
        self.post_json("create billing address", url, api_key, address_data)
            .await
    }

    /// Create a shipping address for a customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the status is not 200/201.
    #[instrument(skip(self, api_key, address_data), fields(base_url = %base_url, customer_id = %customer_id))]
    pub async fn create_shipping_address(
        &self,
        base_url: &str,
        api_key: &SecretString,
        customer_id: CustomerId,
        address_data: &[u8],
    ) -> Result<Vec<u8>, EcommerceError> {
        let id = customer_id.to_string();
        let url = endpoint(base_url, &["api", "customers", &id, "shippingaddress"])?;
        self.post_json("create shipping address", url, api_key, address_data)
            .await
    }

    /// Empty a customer's shopping cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the status is not 200/204.
    #[instrument(skip(self, api_key), fields(base_url = %base_url, customer_id = %customer_id))]
    pub async fn delete_customer_cart(
        &self,
        base_url: &str,
        api_key: &SecretString,
        customer_id: CustomerId,
    ) -> Result<(), EcommerceError> {
        const OPERATION: &str = "delete customer cart";

        let id = customer_id.to_string();
        let url = endpoint(base_url, &["api", "customers", &id, "cart"])?;
        let request = self
            .inner
            .client
            .delete(url)
            .bearer_auth(api_key.expose_secret());

        let (status, body) = self.execute(OPERATION, request).await?;
        expect_status(OPERATION, status, body, UPDATED).map(drop)
    }

    // =========================================================================
    // Carts, orders, stores
    // =========================================================================

    /// Add an item to a shopping cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the status is not 200/201.
    #[instrument(skip(self, api_key, cart_item_data), fields(base_url = %base_url))]
    pub async fn create_shopping_cart_item(
        &self,
        base_url: &str,
        api_key: &SecretString,
        cart_item_data: &[u8],
    ) -> Result<Vec<u8>, EcommerceError> {
        let url = endpoint(base_url, &["api", "shopping_cart_items"])?;
        self.post_json("create shopping cart item", url, api_key, cart_item_data)
            .await
    }

    /// List orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the status is not 200.
    #[instrument(skip(self, api_key), fields(base_url = %base_url))]
    pub async fn get_orders(
        &self,
        base_url: &str,
        api_key: &SecretString,
    ) -> Result<Vec<u8>, EcommerceError> {
        let url = endpoint(base_url, &["api", "orders"])?;
        self.get("get orders", url, api_key).await
    }

    /// Create an order.
    ///
    /// Not idempotent: a retried call creates a second order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the status is not 200/201.
    #[instrument(skip(self, api_key, order_data), fields(base_url = %base_url))]
    pub async fn create_order(
        &self,
        base_url: &str,
        api_key: &SecretString,
        order_data: &[u8],
    ) -> Result<Vec<u8>, EcommerceError> {
        let url = endpoint(base_url, &["api", "orders"])?;
        self.post_json("create order", url, api_key, order_data)
            .await
    }

    /// Update an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the status is not 200/204.
    #[instrument(skip(self, api_key, order_data), fields(base_url = %base_url, order_id = %order_id))]
    pub async fn update_order(
        &self,
        base_url: &str,
        api_key: &SecretString,
        order_id: OrderId,
        order_data: &[u8],
    ) -> Result<(), EcommerceError> {
        let id = order_id.to_string();
        let url = endpoint(base_url, &["api", "orders", &id])?;
        self.put_patch("update order", url, api_key, order_data)
            .await
    }

    /// Update the price of one order line.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the status is not 200/204.
    #[instrument(
        skip(self, api_key, order_item_data),
        fields(base_url = %base_url, order_id = %order_id, item_id = %item_id)
    )]
    pub async fn update_order_item_price(
        &self,
        base_url: &str,
        api_key: &SecretString,
        order_id: OrderId,
        item_id: OrderItemId,
        order_item_data: &[u8],
    ) -> Result<(), EcommerceError> {
        let order = order_id.to_string();
        let item = item_id.to_string();
        let url = endpoint(base_url, &["api", "orders", &order, "items", &item])?;
        self.put_patch("update order item price", url, api_key, order_item_data)
            .await
    }

    /// List stores.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the status is not 200.
    #[instrument(skip(self, api_key), fields(base_url = %base_url))]
    pub async fn get_stores(
        &self,
        base_url: &str,
        api_key: &SecretString,
    ) -> Result<Vec<u8>, EcommerceError> {
        let url = endpoint(base_url, &["api", "stores"])?;
        self.get("get stores", url, api_key).await
    }

    // =========================================================================
    // Request helpers
    // =========================================================================

    async fn get(
        &self,
        operation: &'static str,
        url: Url,
        api_key: &SecretString,
    ) -> Result<Vec<u8>, EcommerceError> {
        let request = self
            .inner
            .client
            .get(url)
            .bearer_auth(api_key.expose_secret())
            .header(CONTENT_TYPE, JSON);

        let (status, body) = self.execute(operation, request).await?;
        expect_status(operation, status, body, OK)
    }

    async fn post_json(
        &self,
        operation: &'static str,
        url: Url,
        api_key: &SecretString,
        body: &[u8],
    ) -> Result<Vec<u8>, EcommerceError> {
        let request = self
            .inner
            .client
            .post(url)
            .bearer_auth(api_key.expose_secret())
            .header(CONTENT_TYPE, JSON)
            .body(body.to_vec());

        let (status, body) = self.execute(operation, request).await?;
        expect_status(operation, status, body, CREATED)
    }

    async fn put_patch(
        &self,
        operation: &'static str,
        url: Url,
        api_key: &SecretString,
        body: &[u8],
    ) -> Result<(), EcommerceError> {
        let request = self
            .inner
            .client
            .put(url)
            .bearer_auth(api_key.expose_secret())
            .header(CONTENT_TYPE, JSON_PATCH)
            .header(ACCEPT, TEXT_PLAIN)
            .body(body.to_vec());

        let (status, body) = self.execute(operation, request).await?;
        expect_status(operation, status, body, UPDATED).map(drop)
    }

    /// Send a request and read the full body.
    async fn execute(
        &self,
        operation: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<(StatusCode, Vec<u8>), EcommerceError> {
        let response = request
            .send()
            .await
            .map_err(EcommerceError::transport(operation))?;

        let status = response.status();
        debug!(operation, status = %status, "Storefront responded");

        let body = response
            .bytes()
            .await
            .map_err(EcommerceError::transport(operation))?;

        Ok((status, body.to_vec()))
    }
}

/// Check a status against the accepted set, turning anything else into
/// `UnexpectedStatus` with the body attached.
fn expect_status(
    operation: &'static str,
    status: StatusCode,
    body: Vec<u8>,
    accepted: &[StatusCode],
) -> Result<Vec<u8>, EcommerceError> {
    if accepted.contains(&status) {
        return Ok(body);
    }

    let body = String::from_utf8_lossy(&body).into_owned();
    error!(
        operation,
        status = %status,
        body = %body.chars().take(LOGGED_BODY_CHARS).collect::<String>(),
        "Storefront returned unexpected status"
    );

    Err(EcommerceError::UnexpectedStatus {
        operation,
        status: status.as_u16(),
        body,
    })
}

/// Build an endpoint URL by appending path segments to the base URL.
///
/// Segments are percent-encoded, so caller-supplied ids cannot escape their
/// path position. A trailing slash on the base URL is ignored.
pub(crate) fn endpoint(base_url: &str, segments: &[&str]) -> Result<Url, EcommerceError> {
    let invalid = |source| EcommerceError::InvalidUrl {
        url: base_url.to_string(),
        source,
    };

    let mut url = Url::parse(base_url).map_err(invalid)?;
    url.path_segments_mut()
        .map_err(|()| invalid(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
        .pop_if_empty()
        .extend(segments);
    url.set_query(None);

    Ok(url)
}

/// Token endpoint of a storefront: `{api_url}/token`.
///
/// # Errors
///
/// Returns `EcommerceError::InvalidUrl` if `api_url` is not an absolute URL.
pub fn token_endpoint(api_url: &str) -> Result<String, EcommerceError> {
    endpoint(api_url, &["token"]).map(String::from)
}
