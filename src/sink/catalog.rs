//! REST catalog connection and table lifecycle

use crate::bridge::ensure_resolved;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::sink::writer;
use arrow::record_batch::RecordBatch;
use iceberg::table::Table;
use iceberg::{Catalog, CatalogBuilder, NamespaceIdent, TableCreation, TableIdent};
use iceberg_catalog_rest::{
    RestCatalog, RestCatalogBuilder, REST_CATALOG_PROP_URI, REST_CATALOG_PROP_WAREHOUSE,
};
use std::collections::HashMap;

use super::WriteMode;

/// Handle to one target table behind a REST catalog
pub struct IcebergSink {
    catalog: RestCatalog,
    namespace: NamespaceIdent,
    table_name: String,
}

impl IcebergSink {
    /// Connect to the catalog described by `config`
    pub async fn connect(config: &Config) -> Result<Self> {
        let mut props = HashMap::new();
        props.insert(REST_CATALOG_PROP_URI.to_string(), config.rest_uri.clone());
        props.insert(
            REST_CATALOG_PROP_WAREHOUSE.to_string(),
            config.warehouse.clone(),
        );
        props.insert("s3.endpoint".to_string(), config.s3_endpoint.clone());
        props.insert(
            "s3.access-key-id".to_string(),
            config.s3_access_key.clone(),
        );
        props.insert(
            "s3.secret-access-key".to_string(),
            config.s3_secret_key.clone(),
        );
        props.insert("s3.region".to_string(), config.s3_region.clone());

        let catalog = RestCatalogBuilder::default()
            .load("rest", props)
            .await
            .map_err(|e| Error::catalog(format!("failed to connect to catalog: {e}")))?;

        Ok(Self {
            catalog,
            namespace: NamespaceIdent::new(config.namespace.clone()),
            table_name: config.table.clone(),
        })
    }

    /// Fully qualified name of the target table
    pub fn table_name(&self) -> String {
        format!("{}.{}", self.namespace, self.table_name)
    }

    /// Write a batch to the target table and return the rows committed.
    ///
    /// Append loads the table when it exists and creates it from the batch
    /// schema when it does not. Overwrite drops any existing table first, so
    /// the result is a single-snapshot table holding exactly this batch.
    pub async fn write(&self, batch: &RecordBatch, mode: WriteMode) -> Result<usize> {
        ensure_resolved(batch.schema().as_ref())?;

        self.ensure_namespace().await?;
        let table = self.prepare_table(batch, mode).await?;

        if batch.num_rows() == 0 {
            tracing::info!(table = %self.table_name(), "no rows to write, table left as created");
            return Ok(0);
        }

        let aligned = writer::align_to_table(batch, &table)?;
        let rows = aligned.num_rows();
        let files = writer::write_data_files(&table, aligned).await?;
        writer::commit_append(&self.catalog, &table, files).await?;

        tracing::info!(table = %self.table_name(), rows, mode = ?mode, "committed snapshot");
        Ok(rows)
    }

    /// Create the namespace if the catalog does not know it yet
    async fn ensure_namespace(&self) -> Result<()> {
        if self.catalog.namespace_exists(&self.namespace).await? {
            return Ok(());
        }
        tracing::debug!(namespace = %self.namespace, "creating namespace");
        self.catalog
            .create_namespace(&self.namespace, HashMap::new())
            .await?;
        Ok(())
    }

    /// Load or (re)create the target table for this write
    async fn prepare_table(&self, batch: &RecordBatch, mode: WriteMode) -> Result<Table> {
        let ident = TableIdent::new(self.namespace.clone(), self.table_name.clone());
        let exists = self.catalog.table_exists(&ident).await?;

        if exists && mode == WriteMode::Overwrite {
            tracing::debug!(table = %self.table_name(), "dropping table for overwrite");
            self.catalog.drop_table(&ident).await?;
        } else if exists {
            return Ok(self.catalog.load_table(&ident).await?);
        }

        let schema = writer::to_iceberg_schema(batch.schema().as_ref())?;
        let creation = TableCreation::builder()
            .name(self.table_name.clone())
            .schema(schema)
            .build();

        tracing::debug!(table = %self.table_name(), "creating table");
        Ok(self.catalog.create_table(&self.namespace, creation).await?)
    }
}
