//! CLI commands and argument parsing

use crate::records::DEFAULT_SEPARATOR;
use crate::sink::WriteMode;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// JSON to Iceberg ingestion CLI
#[derive(Parser, Debug)]
#[command(name = "json-to-iceberg")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Flatten a JSON file and write it to an Iceberg table
    Ingest {
        /// Input JSON file
        #[arg(short, long)]
        input: PathBuf,

        /// Target namespace (defaults to ICEBERG_NAMESPACE)
        #[arg(short, long)]
        namespace: Option<String>,

        /// Target table name (defaults to ICEBERG_TABLE)
        #[arg(short, long)]
        table: Option<String>,

        /// Write mode
        #[arg(short, long, value_enum, default_value_t = WriteMode::Overwrite)]
        mode: WriteMode,

        /// Separator joining nested keys into column names
        #[arg(long, default_value = DEFAULT_SEPARATOR)]
        separator: String,
    },
}
