//! GreenShop Core - Shared types library.
//!
//! This crate provides common types used across all GreenShop components:
//! - `storefront` - Catalog, search, cart and favorites engines
//! - `cli` - Terminal storefront built on the storefront library
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no storage
//! access, no timers. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, money and the product record

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
