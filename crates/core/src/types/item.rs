//! Catalog item type.

use serde::{Deserialize, Serialize};

/// Prefix applied to every catalog identifier produced from the storefront.
///
/// The separator is U+223C (`∼`), not an ASCII tilde. Other catalog sources
/// on the platform use different prefixes, so the tag must be preserved
/// byte-for-byte.
pub const NAMESPACE_TAG: &str = "kivio-ecommerce∼";

/// Source label attached to items fetched individually from the storefront.
pub const ECOMMERCE_SOURCE: &str = "kivio ecommerce";

/// Errors that can occur when updating an [`Item`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ItemError {
    /// The display name is empty.
    #[error("name cannot be empty")]
    EmptyName,
    /// The description is empty.
    #[error("description cannot be empty")]
    EmptyDescription,
    /// The point-of-sale id is empty.
    #[error("point of sale id cannot be empty")]
    EmptyPointOfSaleId,
}

/// A catalog entry projected from an external storefront product.
///
/// Items are never stored locally. They are rebuilt on every fetch, and
/// `item_id` is always [`NAMESPACE_TAG`] followed by the numeric product id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub item_id: String,
    pub name: String,
    pub description: String,
    /// Identifier in the source system (tagged id for listings, SKU for
    /// single-item lookups).
    pub external_id: String,
    pub point_of_sale_id: Option<String>,
    /// Primary image URL, empty when the product has no images.
    pub url: String,
    /// Source label, empty for listing results.
    pub source: String,
}

impl Item {
    /// Replace the editable fields of the item.
    ///
    /// # Errors
    ///
    /// Returns an [`ItemError`] naming the first empty required field. The
    /// item is left untouched on error.
    pub fn update(
        &mut self,
        name: &str,
        description: &str,
        external_id: &str,
        point_of_sale_id: &str,
        url: &str,
    ) -> Result<(), ItemError> {
        if name.is_empty() {
            return Err(ItemError::EmptyName);
        }
        if description.is_empty() {
            return Err(ItemError::EmptyDescription);
        }
        if point_of_sale_id.is_empty() {
            return Err(ItemError::EmptyPointOfSaleId);
        }

        name.clone_into(&mut self.name);
        description.clone_into(&mut self.description);
        external_id.clone_into(&mut self.external_id);
        self.point_of_sale_id = Some(point_of_sale_id.to_string());
        url.clone_into(&mut self.url);

        Ok(())
    }
}

/// Build a catalog identifier from a numeric storefront product id.
#[must_use]
pub fn tag_product_id(product_id: u64) -> String {
    format!("{NAMESPACE_TAG}{product_id}")
}

/// Remove a leading [`NAMESPACE_TAG`] from an identifier, if present.
///
/// Only one prefix is removed; identifiers without the tag are returned as-is.
#[must_use]
pub fn strip_namespace(item_id: &str) -> &str {
    item_id.strip_prefix(NAMESPACE_TAG).unwrap_or(item_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_product_id() {
        assert_eq!(tag_product_id(42), "kivio-ecommerce∼42");
    }

    #[test]
    fn test_strip_namespace() {
        assert_eq!(strip_namespace("kivio-ecommerce∼42"), "42");
        assert_eq!(strip_namespace("42"), "42");
        // ASCII tilde is a different tag
        assert_eq!(strip_namespace("kivio-ecommerce~42"), "kivio-ecommerce~42");
        assert_eq!(
            strip_namespace("kivio-ecommerce∼kivio-ecommerce∼9"),
            "kivio-ecommerce∼9"
        );
    }

    #[test]
    fn test_update_replaces_fields() {
        let mut item = Item {
            item_id: tag_product_id(1),
            ..Default::default()
        };

        item.update("Chair", "Oak chair", "SKU-1", "pos-9", "https://img/1.png")
            .unwrap();

        assert_eq!(item.name, "Chair");
        assert_eq!(item.description, "Oak chair");
        assert_eq!(item.external_id, "SKU-1");
        assert_eq!(item.point_of_sale_id.as_deref(), Some("pos-9"));
        assert_eq!(item.url, "https://img/1.png");
        assert_eq!(item.item_id, "kivio-ecommerce∼1");
    }

    #[test]
    fn test_update_rejects_empty_required_fields() {
        let mut item = Item::default();

        assert_eq!(
            item.update("", "d", "e", "p", "u"),
            Err(ItemError::EmptyName)
        );
        assert_eq!(
            item.update("n", "", "e", "p", "u"),
            Err(ItemError::EmptyDescription)
        );
        assert_eq!(
            item.update("n", "d", "e", "", "u"),
            Err(ItemError::EmptyPointOfSaleId)
        );
        assert_eq!(item, Item::default());
    }

    #[test]
    fn test_update_allows_empty_external_id_and_url() {
        let mut item = Item::default();
        assert!(item.update("n", "d", "", "p", "").is_ok());
    }
}
