//! Arrow schema inference and record-batch construction from flat records

use crate::error::Result;
use arrow::array::{
    ArrayRef, BooleanArray, Float64Array, Int64Array, ListArray, NullArray, StringArray,
    StructArray, TimestampNanosecondArray,
};
use arrow::buffer::{NullBuffer, OffsetBuffer};
use arrow::datatypes::{DataType, Field, Fields, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

/// Quick prefilter for ISO 8601 datetime strings; the chrono parse decides
static DATETIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}").expect("valid regex"));

/// Infer an Arrow schema from a set of flat records
///
/// Unifies one type per key across all records. Column order is the order in
/// which keys are first seen; all fields are nullable.
pub fn infer_schema(records: &[Map<String, Value>]) -> Result<Schema> {
    let mut order: Vec<String> = Vec::new();
    let mut types: HashMap<String, DataType> = HashMap::new();

    for record in records {
        for (key, value) in record {
            let inferred = infer_type(value);
            match types.entry(key.clone()) {
                Entry::Occupied(mut entry) => {
                    let merged = merge_types(entry.get(), &inferred);
                    entry.insert(merged);
                }
                Entry::Vacant(entry) => {
                    order.push(key.clone());
                    entry.insert(inferred);
                }
            }
        }
    }

    let fields: Vec<Field> = order
        .iter()
        .map(|name| Field::new(name, types[name].clone(), true))
        .collect();

    Ok(Schema::new(fields))
}

/// Build a `RecordBatch` from flat records and a unified schema
///
/// Missing keys become nulls; row order equals input record order.
pub fn records_to_batch(records: &[Map<String, Value>], schema: &Schema) -> Result<RecordBatch> {
    if records.is_empty() {
        return Ok(RecordBatch::new_empty(Arc::new(schema.clone())));
    }

    let mut columns: Vec<ArrayRef> = Vec::with_capacity(schema.fields().len());
    for field in schema.fields() {
        let values: Vec<Option<&Value>> =
            records.iter().map(|record| record.get(field.name())).collect();
        columns.push(build_array(&values, field.data_type())?);
    }

    Ok(RecordBatch::try_new(Arc::new(schema.clone()), columns)?)
}

/// Infer schema and build the batch in one step
pub fn assemble(records: &[Map<String, Value>]) -> Result<RecordBatch> {
    let schema = infer_schema(records)?;
    records_to_batch(records, &schema)
}

/// Infer an Arrow `DataType` from a single JSON value
pub fn infer_type(value: &Value) -> DataType {
    match value {
        Value::Null => DataType::Null,
        Value::Bool(_) => DataType::Boolean,
        Value::Number(n) => {
            // u64 values past i64::MAX widen to Float64 rather than nulling out
            if n.is_i64() {
                DataType::Int64
            } else {
                DataType::Float64
            }
        }
        Value::String(s) => {
            if is_datetime(s) {
                DataType::Timestamp(TimeUnit::Nanosecond, Some("UTC".into()))
            } else {
                DataType::Utf8
            }
        }
        Value::Array(arr) => {
            let element = arr
                .iter()
                .map(infer_type)
                .reduce(|a, b| merge_types(&a, &b))
                .unwrap_or(DataType::Null);
            DataType::List(Arc::new(Field::new("item", element, true)))
        }
        Value::Object(map) => {
            let fields: Vec<Field> = map
                .iter()
                .map(|(k, v)| Field::new(k, infer_type(v), true))
                .collect();
            DataType::Struct(Fields::from(fields))
        }
    }
}

/// Merge two data types into a compatible type
///
/// Null merges with anything; Int64 and Float64 promote to Float64; lists
/// and structs merge recursively (struct fields union, first-seen order);
/// otherwise conflicting types fall back to Utf8.
pub fn merge_types(a: &DataType, b: &DataType) -> DataType {
    match (a, b) {
        (a, b) if a == b => a.clone(),

        (DataType::Null, other) | (other, DataType::Null) => other.clone(),

        (DataType::Int64, DataType::Float64) | (DataType::Float64, DataType::Int64) => {
            DataType::Float64
        }

        (DataType::List(fa), DataType::List(fb)) => {
            let inner = merge_types(fa.data_type(), fb.data_type());
            DataType::List(Arc::new(Field::new("item", inner, true)))
        }

        (DataType::Struct(fa), DataType::Struct(fb)) => {
            let mut merged: Vec<Field> = Vec::with_capacity(fa.len());
            for field_a in fa {
                let data_type = match fb.iter().find(|f| f.name() == field_a.name()) {
                    Some(field_b) => merge_types(field_a.data_type(), field_b.data_type()),
                    None => field_a.data_type().clone(),
                };
                merged.push(Field::new(field_a.name(), data_type, true));
            }
            for field_b in fb {
                if !fa.iter().any(|f| f.name() == field_b.name()) {
                    merged.push(Field::new(field_b.name(), field_b.data_type().clone(), true));
                }
            }
            DataType::Struct(Fields::from(merged))
        }

        // Different types -> fall back to String (most flexible)
        _ => DataType::Utf8,
    }
}

/// Check whether a string is an ISO 8601 / RFC 3339 datetime
fn is_datetime(s: &str) -> bool {
    DATETIME_RE.is_match(s) && chrono::DateTime::parse_from_rfc3339(s).is_ok()
}

/// Parse an RFC 3339 string to nanoseconds since the epoch
fn parse_datetime_nanos(s: &str) -> Option<i64> {
    chrono::DateTime::parse_from_rfc3339(s)
        .ok()
        .and_then(|dt| dt.timestamp_nanos_opt())
}

/// Build an Arrow array for one column from per-row JSON values
fn build_array(values: &[Option<&Value>], data_type: &DataType) -> Result<ArrayRef> {
    match data_type {
        DataType::Null => Ok(Arc::new(NullArray::new(values.len()))),

        DataType::Boolean => {
            let arr: BooleanArray = values.iter().map(|v| v.and_then(Value::as_bool)).collect();
            Ok(Arc::new(arr))
        }

        DataType::Int64 => {
            let arr: Int64Array = values.iter().map(|v| v.and_then(Value::as_i64)).collect();
            Ok(Arc::new(arr))
        }

        DataType::Float64 => {
            #[allow(clippy::cast_precision_loss)]
            let arr: Float64Array = values
                .iter()
                .map(|v| v.and_then(|v| v.as_f64().or_else(|| v.as_i64().map(|i| i as f64))))
                .collect();
            Ok(Arc::new(arr))
        }

        DataType::Utf8 => {
            let arr: StringArray = values
                .iter()
                .map(|v| {
                    v.map(|v| match v {
                        Value::String(s) => s.clone(),
                        _ => v.to_string(),
                    })
                })
                .collect();
            Ok(Arc::new(arr))
        }

        DataType::Timestamp(TimeUnit::Nanosecond, tz) => {
            let arr: TimestampNanosecondArray = values
                .iter()
                .map(|v| v.and_then(Value::as_str).and_then(parse_datetime_nanos))
                .collect();
            let arr = match tz {
                Some(tz) => arr.with_timezone(Arc::clone(tz)),
                None => arr,
            };
            Ok(Arc::new(arr))
        }

        DataType::List(field) => build_list_array(values, field),

        DataType::Struct(fields) => build_struct_array(values, fields),

        // Fall back to string representation
        _ => {
            let arr: StringArray = values.iter().map(|v| v.map(ToString::to_string)).collect();
            Ok(Arc::new(arr))
        }
    }
}

/// Build a list array from JSON arrays
fn build_list_array(values: &[Option<&Value>], field: &Arc<Field>) -> Result<ArrayRef> {
    let mut all_items: Vec<Option<&Value>> = Vec::new();
    let mut offsets: Vec<i32> = vec![0];

    for value in values {
        if let Some(Value::Array(arr)) = value {
            for item in arr {
                all_items.push(Some(item));
            }
        }
        // Both array and non-array rows need an offset
        let offset = i32::try_from(all_items.len())
            .map_err(|_| crate::error::Error::schema("array too large for i32 offset"))?;
        offsets.push(offset);
    }

    let items_array = build_array(&all_items, field.data_type())?;
    let offset_buffer = OffsetBuffer::new(offsets.into());

    // A missing or null row is a null list, not an empty one
    let validity: NullBuffer = values
        .iter()
        .map(|v| matches!(v, Some(Value::Array(_))))
        .collect();

    let list_array = ListArray::new(Arc::clone(field), offset_buffer, items_array, Some(validity));
    Ok(Arc::new(list_array))
}

/// Build a struct array from JSON objects
fn build_struct_array(values: &[Option<&Value>], fields: &Fields) -> Result<ArrayRef> {
    let mut child_arrays: Vec<ArrayRef> = Vec::with_capacity(fields.len());

    for field in fields {
        let child_values: Vec<Option<&Value>> = values
            .iter()
            .map(|v| {
                v.and_then(|v| match v {
                    Value::Object(obj) => obj.get(field.name()),
                    _ => None,
                })
            })
            .collect();
        child_arrays.push(build_array(&child_values, field.data_type())?);
    }

    // A missing or null row is a null struct, not a struct of nulls
    let validity: NullBuffer = values
        .iter()
        .map(|v| matches!(v, Some(Value::Object(_))))
        .collect();

    let struct_array = StructArray::new(fields.clone(), child_arrays, Some(validity));
    Ok(Arc::new(struct_array))
}
