//! Storefront service surface.
//!
//! One async method per capability. Each takes the base URL and bearer token
//! resolved for a merchant, delegates to the repository, and logs failures.

use kivio_ecommerce_core::{Customer, CustomerId, Item, OrderId, OrderItemId};
use secrecy::SecretString;
use tracing::{error, instrument};

use crate::client::EcommerceClient;
use crate::client::types::ItemFilters;
use crate::error::EcommerceError;
use crate::repository::EcommerceRepository;

/// Storefront operations exposed to the platform.
#[derive(Debug, Clone)]
pub struct EcommerceService {
    repository: EcommerceRepository,
}

impl EcommerceService {
    /// Create a service over an injected repository.
    #[must_use]
    pub const fn new(repository: EcommerceRepository) -> Self {
        Self { repository }
    }

    /// Create a service over a client, wiring the repository in between.
    #[must_use]
    pub const fn from_client(client: EcommerceClient) -> Self {
        Self::new(EcommerceRepository::new(client))
    }

    /// Exchange storefront credentials for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `EcommerceError::TokenExchangeFailed` if the exchange fails.
    #[instrument(skip(self, password))]
    pub async fn get_api_key(
        &self,
        username: &str,
        password: &SecretString,
        token_url: &str,
    ) -> Result<SecretString, EcommerceError> {
        self.repository
            .get_api_key(username, password, token_url)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to obtain storefront token"))
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Get one page of sellable items.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or decoding fails.
    #[instrument(skip(self, api_key))]
    pub async fn get_items(
        &self,
        base_url: &str,
        api_key: &SecretString,
        page: u32,
        limit: u32,
    ) -> Result<Vec<Item>, EcommerceError> {
        self.repository
            .get_items(base_url, api_key, page, limit)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to get items"))
    }

    /// Get one page of products as returned by the storefront.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, api_key, filters))]
    pub async fn get_items_raw(
        &self,
        base_url: &str,
        api_key: &SecretString,
        page: u32,
        limit: u32,
        published_status: bool,
        filters: &ItemFilters,
    ) -> Result<Vec<u8>, EcommerceError> {
        self.repository
            .get_items_raw(base_url, api_key, page, limit, published_status, filters)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to get raw items"))
    }

    /// Get every sellable item in the catalog.
    ///
    /// # Errors
    ///
    /// Returns the first page failure.
    #[instrument(skip(self, api_key))]
    pub async fn get_all_items(
        &self,
        base_url: &str,
        api_key: &SecretString,
    ) -> Result<Vec<Item>, EcommerceError> {
        self.repository
            .get_all_items(base_url, api_key)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to get all items"))
    }

    /// Get every product in the catalog as `{"products": [...]}` JSON.
    ///
    /// # Errors
    ///
    /// Returns the first page failure.
    #[instrument(skip(self, api_key))]
    pub async fn get_all_items_raw(
        &self,
        base_url: &str,
        api_key: &SecretString,
    ) -> Result<Vec<u8>, EcommerceError> {
        self.repository
            .get_all_items_raw(base_url, api_key)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to get all raw items"))
    }

    /// Get one item by catalog or raw id.
    ///
    /// # Errors
    ///
    /// Returns `EcommerceError::ProductNotFound` if the product does not exist.
    #[instrument(skip(self, api_key))]
    pub async fn get_item_by_id(
        &self,
        base_url: &str,
        api_key: &SecretString,
        item_id: &str,
    ) -> Result<Item, EcommerceError> {
        self.repository
            .get_item_by_id(base_url, api_key, item_id)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to get item"))
    }

    /// Get one product as returned by the storefront.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, api_key))]
    pub async fn get_item_by_id_raw(
        &self,
        base_url: &str,
        api_key: &SecretString,
        item_id: &str,
    ) -> Result<Vec<u8>, EcommerceError> {
        self.repository
            .get_item_by_id_raw(base_url, api_key, item_id)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to get raw item"))
    }

    /// Count published products matching the filters.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or decoding fails.
    #[instrument(skip(self, api_key))]
    pub async fn count_items(
        &self,
        base_url: &str,
        api_key: &SecretString,
        filters: &ItemFilters,
    ) -> Result<i64, EcommerceError> {
        self.repository
            .count_items(base_url, api_key, filters)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to count items"))
    }

    /// Set a product's stock quantity.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the status is not 200/204.
    #[instrument(skip(self, api_key))]
    pub async fn update_item_stock(
        &self,
        base_url: &str,
        api_key: &SecretString,
        item_id: &str,
        new_stock: i64,
    ) -> Result<(), EcommerceError> {
        self.repository
            .update_item_stock(base_url, api_key, item_id, new_stock)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to update item stock"))
    }

    // =========================================================================
    // Customers
    // =========================================================================

    /// List customers.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or decoding fails.
    #[instrument(skip(self, api_key))]
    pub async fn get_customers(
        &self,
        base_url: &str,
        api_key: &SecretString,
    ) -> Result<Vec<Customer>, EcommerceError> {
        self.repository
            .get_customers(base_url, api_key)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to get customers"))
    }

    /// List customers as returned by the storefront.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, api_key))]
    pub async fn get_customers_raw(
        &self,
        base_url: &str,
        api_key: &SecretString,
    ) -> Result<Vec<u8>, EcommerceError> {
        self.repository
            .get_customers_raw(base_url, api_key)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to get raw customers"))
    }

    /// Get a customer by id.
    ///
    /// # Errors
    ///
    /// Returns `EcommerceError::NotFound` if the customer does not exist.
    #[instrument(skip(self, api_key))]
    pub async fn get_customer_by_id(
        &self,
        base_url: &str,
        api_key: &SecretString,
        id: &str,
    ) -> Result<Customer, EcommerceError> {
        self.repository
            .get_customer_by_id(base_url, api_key, id)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to get customer"))
    }

    /// Create a customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the status is not 200/201.
    #[instrument(skip(self, api_key, customer_data))]
    pub async fn create_customer(
        &self,
        base_url: &str,
        api_key: &SecretString,
        customer_data: &[u8],
    ) -> Result<Vec<u8>, EcommerceError> {
        self.repository
            .create_customer(base_url, api_key, customer_data)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to create customer"))
    }

    /// Create a billing address for a customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the status is not 200/201.
    #[instrument(skip(self, api_key, address_data))]
    pub async fn create_billing_address(
        &self,
        base_url: &str,
        api_key: &SecretString,
        customer_id: CustomerId,
        address_data: &[u8],
    ) -> Result<Vec<u8>, EcommerceError> {
        self.repository
            .create_billing_address(base_url, api_key, customer_id, address_data)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to create billing address"))
    }

    /// Create a shipping address for a customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the status is not 200/201.
    #[instrument(skip(self, api_key, address_data))]
    pub async fn create_shipping_address(
        &self,
        base_url: &str,
        api_key: &SecretString,
        customer_id: CustomerId,
        address_data: &[u8],
    ) -> Result<Vec<u8>, EcommerceError> {
        self.repository
            .create_shipping_address(base_url, api_key, customer_id, address_data)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to create shipping address"))
    }

    /// Empty a customer's shopping cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the status is not 200/204.
    #[instrument(skip(self, api_key))]
    pub async fn delete_customer_cart(
        &self,
        base_url: &str,
        api_key: &SecretString,
        customer_id: CustomerId,
    ) -> Result<(), EcommerceError> {
        self.repository
            .delete_customer_cart(base_url, api_key, customer_id)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to delete customer cart"))
    }

    // =========================================================================
    // Carts, orders, stores
    // =========================================================================

    /// Add an item to a shopping cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the status is not 200/201.
    #[instrument(skip(self, api_key, cart_item_data))]
    pub async fn create_shopping_cart_item(
        &self,
        base_url: &str,
        api_key: &SecretString,
        cart_item_data: &[u8],
    ) -> Result<Vec<u8>, EcommerceError> {
        self.repository
            .create_shopping_cart_item(base_url, api_key, cart_item_data)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to create shopping cart item"))
    }

    /// List orders as returned by the storefront.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, api_key))]
    pub async fn get_orders_raw(
        &self,
        base_url: &str,
        api_key: &SecretString,
    ) -> Result<Vec<u8>, EcommerceError> {
        self.repository
            .get_orders_raw(base_url, api_key)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to get orders"))
    }

    /// Create an order. A retried call creates a second order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the status is not 200/201.
    #[instrument(skip(self, api_key, order_data))]
    pub async fn create_order(
        &self,
        base_url: &str,
        api_key: &SecretString,
        order_data: &[u8],
    ) -> Result<Vec<u8>, EcommerceError> {
        self.repository
            .create_order(base_url, api_key, order_data)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to create order"))
    }

    /// Update an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the status is not 200/204.
    #[instrument(skip(self, api_key, order_data))]
    pub async fn update_order(
        &self,
        base_url: &str,
        api_key: &SecretString,
        order_id: OrderId,
        order_data: &[u8],
    ) -> Result<(), EcommerceError> {
        self.repository
            .update_order(base_url, api_key, order_id, order_data)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to update order"))
    }

    /// Update the price of one order line.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the status is not 200/204.
    #[instrument(skip(self, api_key, order_item_data))]
    pub async fn update_order_item_price(
        &self,
        base_url: &str,
        api_key: &SecretString,
        order_id: OrderId,
        item_id: OrderItemId,
        order_item_data: &[u8],
    ) -> Result<(), EcommerceError> {
        self.repository
            .update_order_item_price(base_url, api_key, order_id, item_id, order_item_data)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to update order item price"))
    }

    /// List stores as returned by the storefront.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, api_key))]
    pub async fn get_stores_raw(
        &self,
        base_url: &str,
        api_key: &SecretString,
    ) -> Result<Vec<u8>, EcommerceError> {
        self.repository
            .get_stores_raw(base_url, api_key)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to get stores"))
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;
    use crate::config::EcommerceConfig;

    fn service() -> EcommerceService {
        EcommerceService::from_client(EcommerceClient::new(&EcommerceConfig::default()).unwrap())
    }

    #[tokio::test]
    async fn test_get_items_maps_listing() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/products")
                .query_param("Page", "1")
                .query_param("Limit", "20")
                .query_param("PublishedStatus", "true")
                .query_param("Name", "");
            then.status(200).json_body(json!({
                "products": [
                    {"id": 1, "name": "A", "published": true, "stock_quantity": 5,
                     "images": [{"src": "https://img/a.png"}]},
                    {"id": 2, "name": "B", "published": false, "stock_quantity": 5},
                    {"id": 3, "name": "C", "published": true, "stock_quantity": 0}
                ]
            }));
        });

        let items = service()
            .get_items(&server.base_url(), &SecretString::from("t"), 1, 20)
            .await
            .unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].item_id, "kivio-ecommerce∼1");
        assert_eq!(items[0].url, "https://img/a.png");
        mock.assert_calls(1);
    }

    #[tokio::test]
    async fn test_get_customer_by_id() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/customers/8");
            then.status(200)
                .json_body(json!({"id": 8, "email": "ada@example.com", "name": "Ada"}));
        });

        let customer = service()
            .get_customer_by_id(&server.base_url(), &SecretString::from("t"), "8")
            .await
            .unwrap();

        assert_eq!(customer.id, "8");
        assert_eq!(customer.email, "ada@example.com");
    }
}
