//! Table-catalog discovery configuration.
//!
//! # Environment Variables
//!
//! - `CATALOG_SCHEMA`: Schema searched during table discovery
//!   (default: `public`)

use std::env;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Schema whose base tables are listed by discovery.
    pub schema: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            schema: "public".to_string(),
        }
    }
}

impl CatalogConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            schema: env::var("CATALOG_SCHEMA").unwrap_or_else(|_| "public".to_string()),
        }
    }
}
