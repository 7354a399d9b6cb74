//! Core types for the Kivio e-commerce client.
//!
//! This module provides the domain shapes built from external storefront data.

pub mod customer;
pub mod id;
pub mod integration;
pub mod item;
pub mod nullable;

pub use customer::Customer;
pub use id::*;
pub use integration::{
    ACTIVE_STATUS, ECOMMERCE_INTEGRATION_TYPE, IntegrationConfigResponse, IntegrationResponse,
};
pub use item::{ECOMMERCE_SOURCE, Item, ItemError, NAMESPACE_TAG, strip_namespace, tag_product_id};
pub use nullable::null_as_default;
