//! Core types for GreenShop.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod product;

pub use id::*;
pub use price::{Money, discount_percent};
pub use product::{LOW_STOCK_THRESHOLD, Product, StockStatus};
