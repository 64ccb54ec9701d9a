//! GreenShop storefront library.
//!
//! Catalog queries, debounced search, and the persisted cart and favorites
//! engines behind the `greenshop` CLI. The crate is UI-agnostic: every engine
//! is a plain struct driven through `&mut self`.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod favorites;
pub mod images;
pub mod persistence;
pub mod search;
pub mod state;

pub use error::{Result, StorefrontError};
