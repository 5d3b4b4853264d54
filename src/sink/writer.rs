//! Data-file writing and schema conversion
//!
//! Iceberg's Arrow conversion requires every field (nested ones included) to
//! carry a numeric field ID in its metadata. Fresh Arrow schemas from the
//! assembler have none, so IDs are assigned here in a pre-order walk before
//! conversion. After table creation the catalog's schema is authoritative;
//! batches are aligned to it column by column before they hit the writer.

use crate::error::{Error, Result};
use arrow::array::ArrayRef;
use arrow::compute::cast;
use arrow::datatypes::{DataType, Field, FieldRef, Fields, Schema as ArrowSchema};
use arrow::record_batch::RecordBatch;
use iceberg::arrow::{arrow_schema_to_schema, schema_to_arrow_schema};
use iceberg::spec::{DataFile, DataFileFormat, Schema as IcebergSchema};
use iceberg::table::Table;
use iceberg::transaction::{ApplyTransactionAction, Transaction};
use iceberg::writer::base_writer::data_file_writer::DataFileWriterBuilder;
use iceberg::writer::file_writer::location_generator::{
    DefaultFileNameGenerator, DefaultLocationGenerator,
};
use iceberg::writer::file_writer::rolling_writer::RollingFileWriterBuilder;
use iceberg::writer::file_writer::ParquetWriterBuilder;
use iceberg::writer::{IcebergWriter, IcebergWriterBuilder};
use iceberg::Catalog;
use parquet::file::properties::WriterProperties;
use std::sync::Arc;

const FIELD_ID_KEY: &str = "PARQUET:field_id";

/// Convert an Arrow schema into an Iceberg schema, assigning field IDs
pub(crate) fn to_iceberg_schema(schema: &ArrowSchema) -> Result<IcebergSchema> {
    let annotated = with_field_ids(schema);
    Ok(arrow_schema_to_schema(&annotated)?)
}

/// Return a copy of `schema` with sequential field IDs on every field
pub(crate) fn with_field_ids(schema: &ArrowSchema) -> ArrowSchema {
    let mut next_id = 1i32;
    let fields: Vec<FieldRef> = schema
        .fields()
        .iter()
        .map(|field| annotate_field(field, &mut next_id))
        .collect();
    ArrowSchema::new_with_metadata(Fields::from(fields), schema.metadata().clone())
}

fn annotate_field(field: &Field, next_id: &mut i32) -> FieldRef {
    let id = *next_id;
    *next_id += 1;

    let data_type = match field.data_type() {
        DataType::List(inner) => DataType::List(annotate_field(inner, next_id)),
        DataType::LargeList(inner) => DataType::LargeList(annotate_field(inner, next_id)),
        DataType::Struct(fields) => {
            let rewritten: Vec<FieldRef> = fields
                .iter()
                .map(|child| annotate_field(child, next_id))
                .collect();
            DataType::Struct(Fields::from(rewritten))
        }
        other => other.clone(),
    };

    let mut metadata = field.metadata().clone();
    metadata.insert(FIELD_ID_KEY.to_string(), id.to_string());
    Arc::new(
        Field::new(field.name(), data_type, field.is_nullable()).with_metadata(metadata),
    )
}

/// Rebuild a batch against the table's own Arrow schema.
///
/// Columns are matched by name; a batch column absent from the table, or a
/// table column absent from the batch, is a hard error. Matched columns are
/// cast only when the physical type differs.
pub(crate) fn align_to_table(batch: &RecordBatch, table: &Table) -> Result<RecordBatch> {
    let target = schema_to_arrow_schema(table.metadata().current_schema())?;
    let source = batch.schema();

    if source.fields().len() != target.fields().len() {
        return Err(Error::catalog(format!(
            "batch has {} columns but table '{}' has {}",
            source.fields().len(),
            table.identifier().name(),
            target.fields().len()
        )));
    }

    let mut columns: Vec<ArrayRef> = Vec::with_capacity(target.fields().len());
    for field in target.fields() {
        let index = source.index_of(field.name()).map_err(|_| {
            Error::catalog(format!(
                "table column '{}' is missing from the batch",
                field.name()
            ))
        })?;
        let column = batch.column(index);
        if column.data_type() == field.data_type() {
            columns.push(Arc::clone(column));
        } else {
            columns.push(cast(column, field.data_type())?);
        }
    }

    Ok(RecordBatch::try_new(Arc::new(target), columns)?)
}

/// Rolling-writer threshold before a new data file is started
const TARGET_FILE_SIZE_BYTES: usize = 512 * 1024 * 1024;

/// Write one batch out as Parquet data files in the table's location
pub(crate) async fn write_data_files(table: &Table, batch: RecordBatch) -> Result<Vec<DataFile>> {
    let location_generator = DefaultLocationGenerator::new(table.metadata().clone())?;
    let file_name_generator =
        DefaultFileNameGenerator::new("ingest".to_string(), None, DataFileFormat::Parquet);

    let parquet_builder = ParquetWriterBuilder::new(
        WriterProperties::default(),
        table.metadata().current_schema().clone(),
        None,
        table.file_io().clone(),
        location_generator,
        file_name_generator,
    );
    let rolling_builder = RollingFileWriterBuilder::new(parquet_builder, TARGET_FILE_SIZE_BYTES);

    let mut writer = DataFileWriterBuilder::new(
        rolling_builder,
        None,
        table.metadata().default_partition_spec_id(),
    )
    .build()
    .await?;
    writer.write(batch).await?;
    let files = writer.close().await?;

    tracing::debug!(files = files.len(), "wrote data files");
    Ok(files)
}

/// Commit data files to the table as one fast-append snapshot
pub(crate) async fn commit_append(
    catalog: &impl Catalog,
    table: &Table,
    files: Vec<DataFile>,
) -> Result<()> {
    let tx = Transaction::new(table);
    let append = tx.fast_append().add_data_files(files);
    let tx = append.apply(tx)?;
    tx.commit(catalog).await?;
    Ok(())
}
