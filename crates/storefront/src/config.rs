//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//! - `GREENSHOP_DATA_DIR` - Directory for persisted cart and favorites (default: .greenshop)
//! - `GREENSHOP_CATALOG_PATH` - JSON product catalog to use instead of the bundled one
//! - `GREENSHOP_SEARCH_DEBOUNCE_MS` - Search debounce delay in milliseconds (default: 300)
//! - `GREENSHOP_STOCK_POLICY` - `enforce` or `ignore` (default: enforce)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::cart::StockPolicy;

const DEFAULT_DATA_DIR: &str = ".greenshop";
const DEFAULT_SEARCH_DEBOUNCE_MS: &str = "300";
const DEFAULT_STOCK_POLICY: &str = "enforce";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// Directory holding persisted state slices
    pub data_dir: PathBuf,
    /// Catalog file; `None` uses the bundled catalog
    pub catalog_path: Option<PathBuf>,
    /// Quiet period before a search runs
    pub search_debounce: Duration,
    /// Whether cart quantities are capped at stock
    pub stock_policy: StockPolicy,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            catalog_path: None,
            search_debounce: crate::search::DEFAULT_DEBOUNCE,
            stock_policy: StockPolicy::default(),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = PathBuf::from(get_env_or_default(
            &lookup,
            "GREENSHOP_DATA_DIR",
            DEFAULT_DATA_DIR,
        ));
        let catalog_path = get_optional_env(&lookup, "GREENSHOP_CATALOG_PATH").map(PathBuf::from);

        let search_debounce = get_env_or_default(
            &lookup,
            "GREENSHOP_SEARCH_DEBOUNCE_MS",
            DEFAULT_SEARCH_DEBOUNCE_MS,
        )
        .trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|e| {
            ConfigError::InvalidEnvVar("GREENSHOP_SEARCH_DEBOUNCE_MS".to_string(), e.to_string())
        })?;

        let policy = get_env_or_default(&lookup, "GREENSHOP_STOCK_POLICY", DEFAULT_STOCK_POLICY);
        let stock_policy = StockPolicy::parse(&policy).ok_or_else(|| {
            ConfigError::InvalidEnvVar(
                "GREENSHOP_STOCK_POLICY".to_string(),
                format!("expected 'enforce' or 'ignore', got '{policy}'"),
            )
        })?;

        Ok(Self {
            data_dir,
            catalog_path,
            search_debounce,
            stock_policy,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional variable, treating blank values as unset.
fn get_optional_env<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|value| !value.trim().is_empty())
}

/// Get a variable with a default value.
fn get_env_or_default<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    get_optional_env(lookup, key).unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config, StorefrontConfig::default());
        assert_eq!(config.data_dir, PathBuf::from(".greenshop"));
        assert_eq!(config.search_debounce, Duration::from_millis(300));
        assert_eq!(config.stock_policy, StockPolicy::Enforce);
        assert!(config.catalog_path.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("GREENSHOP_DATA_DIR", "/tmp/shop"),
            ("GREENSHOP_CATALOG_PATH", "catalog.json"),
            ("GREENSHOP_SEARCH_DEBOUNCE_MS", "150"),
            ("GREENSHOP_STOCK_POLICY", "Ignore"),
        ])
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/shop"));
        assert_eq!(config.catalog_path, Some(PathBuf::from("catalog.json")));
        assert_eq!(config.search_debounce, Duration::from_millis(150));
        assert_eq!(config.stock_policy, StockPolicy::Ignore);
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = load(&[("GREENSHOP_DATA_DIR", "  "), ("GREENSHOP_CATALOG_PATH", "")]).unwrap();
        assert_eq!(config.data_dir, PathBuf::from(".greenshop"));
        assert!(config.catalog_path.is_none());
    }

    #[test]
    fn test_invalid_debounce() {
        let err = load(&[("GREENSHOP_SEARCH_DEBOUNCE_MS", "soon")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidEnvVar(ref key, _) if key == "GREENSHOP_SEARCH_DEBOUNCE_MS"
        ));
    }

    #[test]
    fn test_invalid_stock_policy() {
        let err = load(&[("GREENSHOP_STOCK_POLICY", "sometimes")]).unwrap_err();
        assert!(err.to_string().contains("GREENSHOP_STOCK_POLICY"));
    }
}
