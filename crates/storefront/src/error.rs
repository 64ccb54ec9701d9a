//! Unified error handling.
//!
//! Library operations that can fail return `Result<T, StorefrontError>`.
//! Persistence failures never appear here: they are logged and recovered
//! inside [`crate::persistence`].

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::config::ConfigError;

/// Top-level error type for the storefront.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The product catalog could not be loaded.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// No product matches the given slug or id.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl StorefrontError {
    /// Whether this error is a lookup miss rather than a setup failure.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result type alias for storefront operations.
pub type Result<T> = std::result::Result<T, StorefrontError>;
