//! Translation between storefront wire data and domain types.
//!
//! The repository sits on top of [`EcommerceClient`]: it decodes raw
//! response bytes, applies the catalog mapping rules, and owns the full
//! catalog sweep.

mod conversions;

use kivio_ecommerce_core::{Customer, CustomerId, Item, OrderId, OrderItemId, strip_namespace};
use secrecy::SecretString;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::client::EcommerceClient;
use crate::client::types::{ItemFilters, ListedProduct, ProductDetail, ProductPage};
use crate::error::EcommerceError;

pub use conversions::{convert_listed_product, convert_listed_products, convert_product_detail};

/// Page size of the full catalog sweep.
pub const SWEEP_PAGE_SIZE: u32 = 100;

/// Re-encoded result of the full catalog sweep.
#[derive(Serialize)]
struct AllProducts<'a> {
    products: &'a [serde_json::Value],
}

/// Storefront repository.
#[derive(Debug, Clone)]
pub struct EcommerceRepository {
    client: EcommerceClient,
}

impl EcommerceRepository {
    /// Create a repository over an injected client.
    #[must_use]
    pub const fn new(client: EcommerceClient) -> Self {
        Self { client }
    }

    /// Exchange storefront credentials for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `EcommerceError::TokenExchangeFailed` if the exchange fails.
    pub async fn get_api_key(
        &self,
        username: &str,
        password: &SecretString,
        token_url: &str,
    ) -> Result<SecretString, EcommerceError> {
        self.client
            .exchange_token(token_url, username, password)
            .await
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Get one page of published items, hiding out-of-stock products.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    #[instrument(skip(self, api_key))]
    pub async fn get_items(
        &self,
        base_url: &str,
        api_key: &SecretString,
        page: u32,
        limit: u32,
    ) -> Result<Vec<Item>, EcommerceError> {
        let body = self
            .client
            .get_items(base_url, api_key, page, limit, true, &ItemFilters::default())
            .await?;

        let page: ProductPage<ListedProduct> =
            serde_json::from_slice(&body).map_err(EcommerceError::decode("get items"))?;

        Ok(convert_listed_products(page.products))
    }

    /// Get one page of products verbatim.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get_items_raw(
        &self,
        base_url: &str,
        api_key: &SecretString,
        page: u32,
        limit: u32,
        published_status: bool,
        filters: &ItemFilters,
    ) -> Result<Vec<u8>, EcommerceError> {
        self.client
            .get_items(base_url, api_key, page, limit, published_status, filters)
            .await
    }

    /// Get a single item by catalog or raw id.
    ///
    /// A leading namespace tag is stripped before the lookup. No publish or
    /// stock filtering is applied.
    ///
    /// # Errors
    ///
    /// Returns `EcommerceError::ProductNotFound` if the storefront returns no
    /// product, or another error if the request or decoding fails.
    #[instrument(skip(self, api_key))]
    pub async fn get_item_by_id(
        &self,
        base_url: &str,
        api_key: &SecretString,
        item_id: &str,
    ) -> Result<Item, EcommerceError> {
        let raw_id = strip_namespace(item_id);
        let body = self.client.get_item_by_id(base_url, api_key, raw_id).await?;

        let page: ProductPage<ProductDetail> =
            serde_json::from_slice(&body).map_err(EcommerceError::decode("get item"))?;

        page.products
            .into_iter()
            .next()
            .map(convert_product_detail)
            .ok_or_else(|| EcommerceError::ProductNotFound(item_id.to_string()))
    }

    /// Get a single product verbatim. A leading namespace tag is stripped.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get_item_by_id_raw(
        &self,
        base_url: &str,
        api_key: &SecretString,
        item_id: &str,
    ) -> Result<Vec<u8>, EcommerceError> {
        let raw_id = strip_namespace(item_id);
        debug!(item_id, raw_id, "Fetching raw item");
        self.client.get_item_by_id(base_url, api_key, raw_id).await
    }

    /// Sweep the whole catalog and return `{"products": [...]}` with every
    /// record exactly as the storefront sent it.
    ///
    /// # Errors
    ///
    /// Returns the first page failure; partial results are discarded.
    pub async fn get_all_items_raw(
        &self,
        base_url: &str,
        api_key: &SecretString,
    ) -> Result<Vec<u8>, EcommerceError> {
        let products: Vec<serde_json::Value> = self.fetch_all_products(base_url, api_key).await?;
        serde_json::to_vec(&AllProducts {
            products: &products,
        })
        .map_err(EcommerceError::decode("get all items"))
    }

    /// Sweep the whole catalog and map it with the listing rules.
    ///
    /// # Errors
    ///
    /// Returns the first page failure; partial results are discarded.
    pub async fn get_all_items(
        &self,
        base_url: &str,
        api_key: &SecretString,
    ) -> Result<Vec<Item>, EcommerceError> {
        let products: Vec<ListedProduct> = self.fetch_all_products(base_url, api_key).await?;
        Ok(convert_listed_products(products))
    }

    /// Request pages of [`SWEEP_PAGE_SIZE`] starting at page 1 until a page
    /// is empty or short.
    #[instrument(skip(self, api_key))]
    async fn fetch_all_products<T: DeserializeOwned>(
        &self,
        base_url: &str,
        api_key: &SecretString,
    ) -> Result<Vec<T>, EcommerceError> {
        let mut all = Vec::new();
        let mut page = 1;

        loop {
            let body = self
                .client
                .get_products_page(base_url, api_key, page, SWEEP_PAGE_SIZE)
                .await?;

            let response: ProductPage<T> =
                serde_json::from_slice(&body).map_err(EcommerceError::decode("get all items"))?;

            let fetched = response.products.len();
            if fetched == 0 {
                break;
            }

            all.extend(response.products);

            if fetched < SWEEP_PAGE_SIZE as usize {
                break;
            }

            page += 1;
        }

        debug!(pages = page, products = all.len(), "Catalog sweep finished");
        Ok(all)
    }

    /// Count published products matching the filters.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or decoding fails.
    pub async fn count_items(
        &self,
        base_url: &str,
        api_key: &SecretString,
        filters: &ItemFilters,
    ) -> Result<i64, EcommerceError> {
        self.client.count_items(base_url, api_key, filters).await
    }

    /// Set a product's stock quantity. A leading namespace tag is stripped.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the status is not 200/204.
    pub async fn update_item_stock(
        &self,
        base_url: &str,
        api_key: &SecretString,
        item_id: &str,
        new_stock: i64,
    ) -> Result<(), EcommerceError> {
        self.client
            .update_item_stock(base_url, api_key, strip_namespace(item_id), new_stock)
            .await
    }

    // =========================================================================
    // Customers
    // =========================================================================

    /// List customers.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a customer array.
    pub async fn get_customers(
        &self,
        base_url: &str,
        api_key: &SecretString,
    ) -> Result<Vec<Customer>, EcommerceError> {
        let body = self.client.get_customers(base_url, api_key).await?;
        decode_json("get customers", &body)
    }

    /// List customers verbatim.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get_customers_raw(
        &self,
        base_url: &str,
        api_key: &SecretString,
    ) -> Result<Vec<u8>, EcommerceError> {
        self.client.get_customers(base_url, api_key).await
    }

    /// Get a customer by id.
    ///
    /// # Errors
    ///
    /// Returns `EcommerceError::NotFound` if the storefront answers 404.
    pub async fn get_customer_by_id(
        &self,
        base_url: &str,
        api_key: &SecretString,
        id: &str,
    ) -> Result<Customer, EcommerceError> {
        let body = self.client.get_customer_by_id(base_url, api_key, id).await?;
        decode_json("get customer", &body)
    }

    /// Create a customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the status is not 200/201.
    pub async fn create_customer(
        &self,
        base_url: &str,
        api_key: &SecretString,
        customer_data: &[u8],
    ) -> Result<Vec<u8>, EcommerceError> {
        self.client
            .create_customer(base_url, api_key, customer_data)
            .await
    }

    /// Create a billing address.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the status is not 200/201.
    pub async fn create_billing_address(
        &self,
        base_url: &str,
        api_key: &SecretString,
        customer_id: CustomerId,
        address_data: &[u8],
    ) -> Result<Vec<u8>, EcommerceError> {
        self.client
            .create_billing_address(base_url, api_key, customer_id, address_data)
            .await
    }

    /// Create a shipping address.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the status is not 200/201.
    pub async fn create_shipping_address(
        &self,
        base_url: &str,
        api_key: &SecretString,
        customer_id: CustomerId,
        address_data: &[u8],
    ) -> Result<Vec<u8>, EcommerceError> {
        self.client
            .create_shipping_address(base_url, api_key, customer_id, address_data)
            .await
    }

    /// Empty a customer's cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the status is not 200/204.
    pub async fn delete_customer_cart(
        &self,
        base_url: &str,
        api_key: &SecretString,
        customer_id: CustomerId,
    ) -> Result<(), EcommerceError> {
        self.client
            .delete_customer_cart(base_url, api_key, customer_id)
            .await
    }

    // =========================================================================
    // Carts, orders, stores
    // =========================================================================

    /// Add an item to a shopping cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the status is not 200/201.
    pub async fn create_shopping_cart_item(
        &self,
        base_url: &str,
        api_key: &SecretString,
        cart_item_data: &[u8],
    ) -> Result<Vec<u8>, EcommerceError> {
        self.client
            .create_shopping_cart_item(base_url, api_key, cart_item_data)
            .await
    }

    /// List orders verbatim.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get_orders_raw(
        &self,
        base_url: &str,
        api_key: &SecretString,
    ) -> Result<Vec<u8>, EcommerceError> {
        self.client.get_orders(base_url, api_key).await
    }

    /// Create an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the status is not 200/201.
    pub async fn create_order(
        &self,
        base_url: &str,
        api_key: &SecretString,
        order_data: &[u8],
    ) -> Result<Vec<u8>, EcommerceError> {
        self.client
            .create_order(base_url, api_key, order_data)
            .await
    }

    /// Update an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the status is not 200/204.
    pub async fn update_order(
        &self,
        base_url: &str,
        api_key: &SecretString,
        order_id: OrderId,
        order_data: &[u8],
    ) -> Result<(), EcommerceError> {
        self.client
            .update_order(base_url, api_key, order_id, order_data)
            .await
    }

    /// Update the price of one order line.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the status is not 200/204.
    pub async fn update_order_item_price(
        &self,
        base_url: &str,
        api_key: &SecretString,
        order_id: OrderId,
        item_id: OrderItemId,
        order_item_data: &[u8],
    ) -> Result<(), EcommerceError> {
        self.client
            .update_order_item_price(base_url, api_key, order_id, item_id, order_item_data)
            .await
    }

    /// List stores verbatim.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get_stores_raw(
        &self,
        base_url: &str,
        api_key: &SecretString,
    ) -> Result<Vec<u8>, EcommerceError> {
        self.client.get_stores(base_url, api_key).await
    }
}

fn decode_json<T: DeserializeOwned>(
    operation: &'static str,
    body: &[u8],
) -> Result<T, EcommerceError> {
    serde_json::from_slice(body).map_err(EcommerceError::decode(operation))
}
