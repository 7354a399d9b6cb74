//! Lenient decoding of storefront fields.
//!
//! The storefront sends `null` for unset scalars and lists. `#[serde(default)]`
//! only covers absent fields, so nullable fields go through
//! [`null_as_default`] as well.

use serde::{Deserialize, Deserializer};

/// Deserialize a field, mapping JSON `null` to `T::default()`.
///
/// Use together with `#[serde(default)]` so absent fields decode the same way:
///
/// ```rust
/// # use serde::Deserialize;
/// #[derive(Deserialize)]
/// struct Product {
///     #[serde(default, deserialize_with = "kivio_ecommerce_core::null_as_default")]
///     sku: String,
/// }
///
/// let product: Product = serde_json::from_str(r#"{"sku": null}"#).unwrap();
/// assert!(product.sku.is_empty());
/// ```
///
/// # Errors
///
/// Returns the deserializer's error if the value is neither `null` nor a `T`.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Record {
        #[serde(default, deserialize_with = "null_as_default")]
        name: String,
        #[serde(default, deserialize_with = "null_as_default")]
        tags: Vec<String>,
        #[serde(default, deserialize_with = "null_as_default")]
        count: i64,
    }

    #[test]
    fn test_null_fields_become_defaults() {
        let record: Record =
            serde_json::from_str(r#"{"name": null, "tags": null, "count": null}"#).unwrap();
        assert!(record.name.is_empty());
        assert!(record.tags.is_empty());
        assert_eq!(record.count, 0);
    }

    #[test]
    fn test_absent_and_present_fields() {
        let record: Record = serde_json::from_str(r#"{"tags": ["a"], "count": 3}"#).unwrap();
        assert!(record.name.is_empty());
        assert_eq!(record.tags, ["a"]);
        assert_eq!(record.count, 3);
    }

    #[test]
    fn test_wrong_type_still_fails() {
        assert!(serde_json::from_str::<Record>(r#"{"count": "three"}"#).is_err());
    }
}
