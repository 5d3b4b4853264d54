//! CLI runner - executes commands

use crate::bridge::downgrade_timestamps;
use crate::cli::commands::{Cli, Commands};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::records::{detect_records, flatten_record, json_type_name};
use crate::resolve::{default_type, resolve_batch};
use crate::sink::{IcebergSink, WriteMode};
use crate::table::assemble;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Ingest {
                input,
                namespace,
                table,
                mode,
                separator,
            } => {
                self.ingest(
                    input,
                    namespace.as_deref(),
                    table.as_deref(),
                    *mode,
                    separator,
                )
                .await
            }
        }
    }

    /// Full ingestion pipeline: load, detect, flatten, assemble, resolve,
    /// bridge, write
    async fn ingest(
        &self,
        input: &Path,
        namespace: Option<&str>,
        table: Option<&str>,
        mode: WriteMode,
        separator: &str,
    ) -> Result<()> {
        let mut config = Config::from_env()?;
        if let Some(ns) = namespace {
            config.namespace = ns.to_string();
        }
        if let Some(name) = table {
            config.table = name.to_string();
        }
        config.validate()?;

        let root = load_json(input)?;
        let records = detect_records(root)?;
        tracing::info!(records = records.len(), input = %input.display(), "detected records");

        let flat: Vec<Map<String, Value>> = records
            .iter()
            .map(|record| match record {
                Value::Object(map) => Ok(flatten_record(map, separator)),
                other => Err(Error::invalid_input_shape(json_type_name(other))),
            })
            .collect::<Result<_>>()?;

        let batch = assemble(&flat)?;
        tracing::info!(
            rows = batch.num_rows(),
            columns = batch.num_columns(),
            "assembled batch"
        );

        let batch = resolve_batch(&batch, &default_type())?;
        let batch = downgrade_timestamps(&batch)?;

        let sink = IcebergSink::connect(&config).await?;
        let rows = sink.write(&batch, mode).await?;

        println!("Wrote {rows} rows to {}", sink.table_name());
        Ok(())
    }
}

/// Read and parse the input file
fn load_json(path: &Path) -> Result<Value> {
    if !path.is_file() {
        return Err(Error::file_not_found(path.display().to_string()));
    }
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_load_json_missing_file() {
        let err = load_json(Path::new("/nonexistent/input.json")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn test_load_json_malformed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "{{not json").unwrap();

        let err = load_json(&path).unwrap_err();
        assert!(matches!(err, Error::MalformedJson(_)));
    }

    #[test]
    fn test_load_json_ok() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ok.json");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, r#"[{{"x": 1}}]"#).unwrap();

        let value = load_json(&path).unwrap();
        assert!(value.is_array());
    }
}
