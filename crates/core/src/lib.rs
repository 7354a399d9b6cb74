//! Kivio E-commerce Core - Shared domain types.
//!
//! This crate provides the types exchanged between the auction platform and
//! the external e-commerce storefront:
//! - [`Item`] - Catalog entry projected from an external product
//! - [`Customer`] - External customer record
//! - [`IntegrationResponse`] - Integration registry descriptor
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O and no HTTP clients. The
//! client crate (`kivio-ecommerce-client`) owns every network concern.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
