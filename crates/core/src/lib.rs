//! Bazaar Core - Marketplace data-shaping library.
//!
//! This crate provides the types and pure functions shared by the Bazaar
//! storefront:
//! - `types` - Newtype IDs, prices, emails, and status enums
//! - `documents` - Read-only mirrors of backend documents (products, stores, orders, users)
//! - `view` - Mappers from documents to display-ready view models
//! - `payload` - Builders from editor/form state to backend write DTOs
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no clocks. Every mapper is total: absent or malformed input
//! degrades to a safe default instead of an error.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod documents;
pub mod payload;
pub mod types;
pub mod view;

pub use documents::*;
pub use types::*;
