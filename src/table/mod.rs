//! Tabular assembly
//!
//! Builds a single Arrow `RecordBatch` from a list of flattened records:
//! one column per flat key, column order = first-seen key order, row order =
//! input record order. Column types are unified across all records; columns
//! with no non-null observation come out as `DataType::Null` placeholders for
//! the resolver to fix.

mod builder;

pub use builder::{assemble, infer_schema, infer_type, merge_types, records_to_batch};
