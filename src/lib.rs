// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # json-to-iceberg
//!
//! Flatten nested JSON payloads into tabular form and land them in an
//! Apache Iceberg table through a REST catalog.
//!
//! ## Pipeline
//!
//! ```text
//! JSON file ─▶ detect records ─▶ flatten ─▶ Arrow batch
//!                                              │
//!                  resolve placeholder types ◀─┘
//!                       │
//!                       ▼
//!            downgrade ns timestamps ─▶ Iceberg table (append/overwrite)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use json_to_iceberg::{records, resolve, table, Result};
//!
//! fn to_batch(payload: serde_json::Value) -> Result<arrow::record_batch::RecordBatch> {
//!     let records = records::detect_records(payload)?;
//!     let flat: Vec<_> = records
//!         .iter()
//!         .filter_map(|r| r.as_object())
//!         .map(|r| records::flatten_record(r, "."))
//!         .collect();
//!     let batch = table::assemble(&flat)?;
//!     resolve::resolve_batch(&batch, &resolve::default_type())
//! }
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the pipeline
pub mod error;

/// Record-set detection and flattening
pub mod records;

/// Schema inference and Arrow batch assembly
pub mod table;

/// Placeholder-type resolution
pub mod resolve;

/// Nanosecond-to-microsecond timestamp bridge
pub mod bridge;

/// Iceberg REST catalog sink
pub mod sink;

/// Process configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::Config;
pub use error::{Error, Result};
pub use sink::WriteMode;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
