//! Iceberg sink
//!
//! Persists a resolved, bridged Arrow batch to an Iceberg table through a
//! REST catalog. The sink owns namespace/table lifecycle (create when
//! missing, drop-and-recreate on overwrite) and the Parquet data-file write
//! plus snapshot commit. The batch handed in must already be resolved and
//! timestamp-bridged; the sink checks that contract and refuses otherwise.

mod catalog;
mod writer;

pub use catalog::IcebergSink;

/// How the target table is updated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum WriteMode {
    /// Add a snapshot to the existing table, creating it if missing
    Append,
    /// Replace the table: drop it if present, recreate, then append
    #[default]
    Overwrite,
}

impl std::fmt::Display for WriteMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Append => write!(f, "append"),
            Self::Overwrite => write!(f, "overwrite"),
        }
    }
}

#[cfg(test)]
mod tests;
