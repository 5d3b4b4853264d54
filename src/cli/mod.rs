//! CLI module
//!
//! Command-line interface for the ingestion pipeline.
//!
//! # Commands
//!
//! - `ingest` - Flatten a JSON file and write it to an Iceberg table

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
