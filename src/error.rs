//! Error types for json-to-iceberg
//!
//! This module defines the error hierarchy for the whole pipeline.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for json-to-iceberg
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Input Errors
    // ============================================================================
    #[error("Unexpected JSON root type: {root_type} (expected array or object)")]
    InvalidInputShape { root_type: String },

    #[error("Failed to parse JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Schema Errors
    // ============================================================================
    #[error("Unsupported schema shape at '{path}': {data_type}")]
    UnsupportedSchemaShape { path: String, data_type: String },

    #[error("Schema inference failed: {message}")]
    SchemaInference { message: String },

    // ============================================================================
    // Arrow/Parquet Errors
    // ============================================================================
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    // ============================================================================
    // Sink Errors
    // ============================================================================
    #[error("Catalog error: {message}")]
    Catalog { message: String },

    #[error(transparent)]
    Iceberg(#[from] iceberg::Error),

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid catalog URI: {0}")]
    InvalidUri(#[from] url::ParseError),

    // ============================================================================
    // I/O and Generic Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create an invalid-input-shape error naming the root's JSON type
    pub fn invalid_input_shape(root_type: impl Into<String>) -> Self {
        Self::InvalidInputShape {
            root_type: root_type.into(),
        }
    }

    /// Create an unsupported-schema-shape error naming the offending column path
    pub fn unsupported_shape(path: impl Into<String>, data_type: impl std::fmt::Display) -> Self {
        Self::UnsupportedSchemaShape {
            path: path.into(),
            data_type: data_type.to_string(),
        }
    }

    /// Create a schema inference error
    pub fn schema(message: impl Into<String>) -> Self {
        Self::SchemaInference {
            message: message.into(),
        }
    }

    /// Create a catalog error
    pub fn catalog(message: impl Into<String>) -> Self {
        Self::Catalog {
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a file-not-found error
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }
}

/// Result type alias for json-to-iceberg
pub type Result<T> = std::result::Result<T, Error>;
