//! Process configuration
//!
//! Connection settings for the REST catalog and its object store, built once
//! at startup from the environment. Every setting has a default that matches
//! a local docker-compose stack, so a bare invocation works against it out of
//! the box. CLI flags override the namespace and table name after the fact.

use crate::error::{Error, Result};
use url::Url;

// ============================================================================
// Defaults
// ============================================================================

const DEFAULT_REST_URI: &str = "http://localhost:8181";
const DEFAULT_WAREHOUSE: &str = "s3://warehouse/";
const DEFAULT_S3_ENDPOINT: &str = "http://localhost:9000";
const DEFAULT_S3_ACCESS_KEY: &str = "admin";
const DEFAULT_S3_SECRET_KEY: &str = "password";
const DEFAULT_S3_REGION: &str = "us-east-1";
const DEFAULT_NAMESPACE: &str = "default";
const DEFAULT_TABLE: &str = "raw";

// ============================================================================
// Config
// ============================================================================

/// Catalog and object-store connection settings
#[derive(Debug, Clone)]
pub struct Config {
    /// REST catalog endpoint
    pub rest_uri: String,

    /// Warehouse location handed to the catalog
    pub warehouse: String,

    /// S3-compatible endpoint backing the warehouse
    pub s3_endpoint: String,

    /// Object store access key
    pub s3_access_key: String,

    /// Object store secret key
    pub s3_secret_key: String,

    /// Object store region
    pub s3_region: String,

    /// Target namespace
    pub namespace: String,

    /// Target table name
    pub table: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rest_uri: DEFAULT_REST_URI.to_string(),
            warehouse: DEFAULT_WAREHOUSE.to_string(),
            s3_endpoint: DEFAULT_S3_ENDPOINT.to_string(),
            s3_access_key: DEFAULT_S3_ACCESS_KEY.to_string(),
            s3_secret_key: DEFAULT_S3_SECRET_KEY.to_string(),
            s3_region: DEFAULT_S3_REGION.to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            table: DEFAULT_TABLE.to_string(),
        }
    }
}

impl Config {
    /// Build the configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let config = Self {
            rest_uri: get("ICEBERG_REST_URI", DEFAULT_REST_URI),
            warehouse: get("ICEBERG_WAREHOUSE", DEFAULT_WAREHOUSE),
            s3_endpoint: get("S3_ENDPOINT", DEFAULT_S3_ENDPOINT),
            s3_access_key: get("S3_ACCESS_KEY", DEFAULT_S3_ACCESS_KEY),
            s3_secret_key: get("S3_SECRET_KEY", DEFAULT_S3_SECRET_KEY),
            s3_region: get("S3_REGION", DEFAULT_S3_REGION),
            namespace: get("ICEBERG_NAMESPACE", DEFAULT_NAMESPACE),
            table: get("ICEBERG_TABLE", DEFAULT_TABLE),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that endpoint settings parse as URLs
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.rest_uri)
            .map_err(|e| Error::config(format!("invalid catalog URI '{}': {e}", self.rest_uri)))?;
        Url::parse(&self.s3_endpoint)
            .map_err(|e| Error::config(format!("invalid S3 endpoint '{}': {e}", self.s3_endpoint)))?;
        if self.namespace.is_empty() {
            return Err(Error::config("namespace must not be empty"));
        }
        if self.table.is_empty() {
            return Err(Error::config("table name must not be empty"));
        }
        Ok(())
    }
}
