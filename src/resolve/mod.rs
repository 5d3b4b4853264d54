//! Schema resolution: placeholder-type rewrite
//!
//! Flattening arbitrary JSON can leave columns (or nested list/struct
//! members) with no non-null observation, which the assembler types as
//! `DataType::Null`. Iceberg and Parquet have no pure null type, so every
//! placeholder must be replaced with a concrete default before the table can
//! be persisted. The rewrite is a pure recursive function over the type tree;
//! row values are never touched — nulls stay null, only the declared type
//! changes.

use crate::error::{Error, Result};
use arrow::array::ArrayRef;
use arrow::compute::cast;
use arrow::datatypes::{DataType, FieldRef, Fields, Schema};
use arrow::record_batch::RecordBatch;
use std::sync::Arc;

/// Fallback type for columns that are all-null
pub fn default_type() -> DataType {
    DataType::Utf8
}

/// Recursively replace `Null` with `default` inside an Arrow data type.
///
/// - `Null` → `default`
/// - `List` / `LargeList` → rebuilt around the resolved inner type
/// - `Struct` → rebuilt field-wise, preserving field names and order
/// - Recognized concrete types → returned unchanged
/// - Anything else → [`Error::UnsupportedSchemaShape`] naming `path`
pub fn resolve_type(data_type: &DataType, default: &DataType, path: &str) -> Result<DataType> {
    match data_type {
        DataType::Null => Ok(default.clone()),

        DataType::List(field) => {
            let inner = resolve_type(field.data_type(), default, path)?;
            Ok(DataType::List(Arc::new(
                field.as_ref().clone().with_data_type(inner),
            )))
        }

        DataType::LargeList(field) => {
            let inner = resolve_type(field.data_type(), default, path)?;
            Ok(DataType::LargeList(Arc::new(
                field.as_ref().clone().with_data_type(inner),
            )))
        }

        DataType::Struct(fields) => {
            let mut resolved: Vec<FieldRef> = Vec::with_capacity(fields.len());
            for field in fields {
                let child_path = format!("{path}.{}", field.name());
                let child = resolve_type(field.data_type(), default, &child_path)?;
                resolved.push(Arc::new(field.as_ref().clone().with_data_type(child)));
            }
            Ok(DataType::Struct(Fields::from(resolved)))
        }

        concrete if is_supported_scalar(concrete) => Ok(concrete.clone()),

        other => Err(Error::unsupported_shape(path, other)),
    }
}

/// Return a schema with every placeholder resolved to `default`
pub fn resolve_schema(schema: &Schema, default: &DataType) -> Result<Schema> {
    let fields: Vec<FieldRef> = schema
        .fields()
        .iter()
        .map(|field| {
            let resolved = resolve_type(field.data_type(), default, field.name())?;
            Ok(Arc::new(field.as_ref().clone().with_data_type(resolved)) as FieldRef)
        })
        .collect::<Result<_>>()?;
    Ok(Schema::new_with_metadata(
        Fields::from(fields),
        schema.metadata().clone(),
    ))
}

/// Resolve a batch's schema and cast exactly the columns that changed.
///
/// Columns whose resolved type equals their original type pass through by
/// reference; no cast is materialized for them. Idempotent: resolving an
/// already-resolved batch returns it unchanged.
pub fn resolve_batch(batch: &RecordBatch, default: &DataType) -> Result<RecordBatch> {
    let schema = batch.schema();
    let mut fields: Vec<FieldRef> = Vec::with_capacity(schema.fields().len());
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(schema.fields().len());
    let mut changed = 0usize;

    for (i, field) in schema.fields().iter().enumerate() {
        let resolved = resolve_type(field.data_type(), default, field.name())?;
        if &resolved == field.data_type() {
            fields.push(Arc::clone(field));
            columns.push(Arc::clone(batch.column(i)));
        } else {
            changed += 1;
            columns.push(cast(batch.column(i), &resolved)?);
            fields.push(Arc::new(field.as_ref().clone().with_data_type(resolved)));
        }
    }

    if changed == 0 {
        return Ok(batch.clone());
    }

    tracing::debug!(columns = changed, "resolved placeholder columns");
    let schema = Schema::new_with_metadata(Fields::from(fields), schema.metadata().clone());
    Ok(RecordBatch::try_new(Arc::new(schema), columns)?)
}

/// Concrete scalar types the resolver passes through untouched
fn is_supported_scalar(data_type: &DataType) -> bool {
    matches!(
        data_type,
        DataType::Boolean
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float16
            | DataType::Float32
            | DataType::Float64
            | DataType::Utf8
            | DataType::LargeUtf8
            | DataType::Binary
            | DataType::LargeBinary
            | DataType::Date32
            | DataType::Date64
            | DataType::Time32(_)
            | DataType::Time64(_)
            | DataType::Timestamp(_, _)
            | DataType::Duration(_)
            | DataType::Decimal128(_, _)
    )
}

#[cfg(test)]
mod tests;
