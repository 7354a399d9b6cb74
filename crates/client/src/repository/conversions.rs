//! Product type conversion functions.
//!
//! Listings and single-product lookups map differently: listings hide
//! unpublished and out-of-stock products, single lookups return whatever the
//! storefront has. The platform relies on this asymmetry.

use kivio_ecommerce_core::{ECOMMERCE_SOURCE, Item, tag_product_id};

use crate::client::types::{ListedProduct, ProductDetail, ProductImage};

fn first_image_url(images: &[ProductImage]) -> String {
    images.first().map(|i| i.src.clone()).unwrap_or_default()
}

// =============================================================================
// Listing conversions
// =============================================================================

/// Convert a listed product, or `None` if it must stay hidden.
pub fn convert_listed_product(product: ListedProduct) -> Option<Item> {
    if !product.published || product.stock_quantity <= 0 {
        return None;
    }

    let item_id = tag_product_id(product.id);
    Some(Item {
        external_id: item_id.clone(),
        item_id,
        url: first_image_url(&product.images),
        name: product.name,
        description: product.short_description,
        point_of_sale_id: None,
        source: String::new(),
    })
}

/// Convert a page of listed products, preserving order.
pub fn convert_listed_products(products: Vec<ListedProduct>) -> Vec<Item> {
    products
        .into_iter()
        .filter_map(convert_listed_product)
        .collect()
}

// =============================================================================
// Single-product conversions
// =============================================================================

pub fn convert_product_detail(product: ProductDetail) -> Item {
    Item {
        item_id: tag_product_id(product.id),
        url: first_image_url(&product.images),
        name: product.name,
        description: product.short_description,
        external_id: product.sku,
        point_of_sale_id: None,
        source: ECOMMERCE_SOURCE.to_string(),
    }
}
