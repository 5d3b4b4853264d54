//! Format bridge: resolved Arrow table → Iceberg-compatible interchange
//!
//! Iceberg rejects timestamps finer than microseconds, so any nanosecond
//! timestamp column is rescaled to microseconds with its timezone kept. The
//! rescale is a real value cast (sub-microsecond components truncated): a
//! lossy, one-way, deterministic transform. Every other concrete type maps to
//! itself; there is no other precision change anywhere in the bridge.

use crate::error::{Error, Result};
use arrow::array::ArrayRef;
use arrow::compute::cast;
use arrow::datatypes::{DataType, FieldRef, Fields, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use std::sync::Arc;

/// Downgrade every nanosecond timestamp column (top-level or nested inside
/// List/Struct) to microsecond precision, preserving timezone metadata.
///
/// Columns that need no downgrade pass through by reference; running the
/// bridge on an already-microsecond batch is a no-op.
pub fn downgrade_timestamps(batch: &RecordBatch) -> Result<RecordBatch> {
    let schema = batch.schema();
    let mut fields: Vec<FieldRef> = Vec::with_capacity(schema.fields().len());
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(schema.fields().len());
    let mut changed = 0usize;

    for (i, field) in schema.fields().iter().enumerate() {
        let bridged = downgrade_type(field.data_type());
        if &bridged == field.data_type() {
            fields.push(Arc::clone(field));
            columns.push(Arc::clone(batch.column(i)));
        } else {
            changed += 1;
            columns.push(cast(batch.column(i), &bridged)?);
            fields.push(Arc::new(field.as_ref().clone().with_data_type(bridged)));
        }
    }

    if changed == 0 {
        return Ok(batch.clone());
    }

    tracing::debug!(columns = changed, "downgraded nanosecond timestamp columns");
    let schema = Schema::new_with_metadata(Fields::from(fields), schema.metadata().clone());
    Ok(RecordBatch::try_new(Arc::new(schema), columns)?)
}

/// Recursively rewrite `Timestamp(ns, tz)` to `Timestamp(us, tz)`
fn downgrade_type(data_type: &DataType) -> DataType {
    match data_type {
        DataType::Timestamp(TimeUnit::Nanosecond, tz) => {
            DataType::Timestamp(TimeUnit::Microsecond, tz.clone())
        }
        DataType::List(field) => DataType::List(Arc::new(
            field
                .as_ref()
                .clone()
                .with_data_type(downgrade_type(field.data_type())),
        )),
        DataType::LargeList(field) => DataType::LargeList(Arc::new(
            field
                .as_ref()
                .clone()
                .with_data_type(downgrade_type(field.data_type())),
        )),
        DataType::Struct(fields) => {
            let rewritten: Vec<FieldRef> = fields
                .iter()
                .map(|field| {
                    Arc::new(
                        field
                            .as_ref()
                            .clone()
                            .with_data_type(downgrade_type(field.data_type())),
                    ) as FieldRef
                })
                .collect();
            DataType::Struct(Fields::from(rewritten))
        }
        other => other.clone(),
    }
}

/// Contract check before table creation: a schema handed to the sink must not
/// contain a placeholder type anywhere in its tree.
pub fn ensure_resolved(schema: &Schema) -> Result<()> {
    for field in schema.fields() {
        check_resolved(field.data_type(), field.name())?;
    }
    Ok(())
}

fn check_resolved(data_type: &DataType, path: &str) -> Result<()> {
    match data_type {
        DataType::Null => Err(Error::schema(format!(
            "unresolved placeholder column '{path}'"
        ))),
        DataType::List(field) | DataType::LargeList(field) => {
            check_resolved(field.data_type(), path)
        }
        DataType::Struct(fields) => {
            for field in fields {
                check_resolved(field.data_type(), &format!("{path}.{}", field.name()))?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}
