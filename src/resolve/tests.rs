//! Tests for schema resolution

use super::*;
use arrow::array::{Array, Int64Array, NullArray, StringArray};
use arrow::datatypes::{DataType, Field, Fields, TimeUnit};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn utf8() -> DataType {
    DataType::Utf8
}

fn list_of(inner: DataType) -> DataType {
    DataType::List(Arc::new(Field::new("item", inner, true)))
}

// ============================================================================
// resolve_type
// ============================================================================

#[test]
fn test_null_becomes_default() {
    let resolved = resolve_type(&DataType::Null, &utf8(), "a").unwrap();
    assert_eq!(resolved, DataType::Utf8);
}

#[test]
fn test_concrete_type_unchanged() {
    let resolved = resolve_type(&DataType::Int64, &utf8(), "a").unwrap();
    assert_eq!(resolved, DataType::Int64);

    let ts = DataType::Timestamp(TimeUnit::Microsecond, Some("UTC".into()));
    assert_eq!(resolve_type(&ts, &utf8(), "ts").unwrap(), ts);
}

#[test]
fn test_list_of_null() {
    let resolved = resolve_type(&list_of(DataType::Null), &utf8(), "tags").unwrap();
    assert_eq!(resolved, list_of(DataType::Utf8));
}

#[test]
fn test_list_of_concrete_unchanged() {
    let resolved = resolve_type(&list_of(DataType::Float64), &utf8(), "vals").unwrap();
    assert_eq!(resolved, list_of(DataType::Float64));
}

#[test]
fn test_struct_with_null_field() {
    let dtype = DataType::Struct(Fields::from(vec![
        Field::new("a", DataType::Null, true),
        Field::new("b", DataType::Int64, true),
    ]));
    let expected = DataType::Struct(Fields::from(vec![
        Field::new("a", DataType::Utf8, true),
        Field::new("b", DataType::Int64, true),
    ]));
    assert_eq!(resolve_type(&dtype, &utf8(), "s").unwrap(), expected);
}

#[test]
fn test_nested_list_struct_null() {
    // Three levels: list -> struct -> placeholder field, sibling untouched
    let dtype = list_of(DataType::Struct(Fields::from(vec![
        Field::new("x", DataType::Null, true),
        Field::new("y", DataType::Int64, true),
    ])));
    let expected = list_of(DataType::Struct(Fields::from(vec![
        Field::new("x", DataType::Utf8, true),
        Field::new("y", DataType::Int64, true),
    ])));
    assert_eq!(resolve_type(&dtype, &utf8(), "items").unwrap(), expected);
}

#[test]
fn test_unsupported_shape_names_path() {
    let dtype = DataType::Struct(Fields::from(vec![Field::new(
        "lookup",
        DataType::Dictionary(Box::new(DataType::Int32), Box::new(DataType::Utf8)),
        true,
    )]));
    let err = resolve_type(&dtype, &utf8(), "col").unwrap_err();
    match err {
        crate::error::Error::UnsupportedSchemaShape { path, .. } => {
            assert_eq!(path, "col.lookup");
        }
        other => panic!("expected UnsupportedSchemaShape, got {other:?}"),
    }
}

// ============================================================================
// resolve_batch
// ============================================================================

#[test]
fn test_all_null_column_becomes_default() {
    let schema = Schema::new(vec![Field::new("a", DataType::Null, true)]);
    let batch = RecordBatch::try_new(
        Arc::new(schema),
        vec![Arc::new(NullArray::new(3)) as ArrayRef],
    )
    .unwrap();

    let resolved = resolve_batch(&batch, &utf8()).unwrap();
    assert_eq!(resolved.schema().field(0).data_type(), &DataType::Utf8);

    // Row values are still null after resolution
    let col = resolved.column(0);
    assert_eq!(col.len(), 3);
    assert_eq!(col.null_count(), 3);
}

#[test]
fn test_concrete_columns_pass_through_untouched() {
    let schema = Schema::new(vec![
        Field::new("x", DataType::Int64, true),
        Field::new("y", DataType::Utf8, true),
    ]);
    let x = Arc::new(Int64Array::from(vec![1, 2])) as ArrayRef;
    let y = Arc::new(StringArray::from(vec!["a", "b"])) as ArrayRef;
    let batch = RecordBatch::try_new(Arc::new(schema), vec![x, y]).unwrap();

    let resolved = resolve_batch(&batch, &utf8()).unwrap();
    assert_eq!(resolved.schema(), batch.schema());
    // No cast materialized: the arrays are the same allocations
    assert!(Arc::ptr_eq(resolved.column(0), batch.column(0)));
    assert!(Arc::ptr_eq(resolved.column(1), batch.column(1)));
}

#[test]
fn test_mixed_null_and_concrete() {
    let schema = Schema::new(vec![
        Field::new("ok", DataType::Int64, true),
        Field::new("bad", DataType::Null, true),
    ]);
    let ok = Arc::new(Int64Array::from(vec![1, 2])) as ArrayRef;
    let bad = Arc::new(NullArray::new(2)) as ArrayRef;
    let batch = RecordBatch::try_new(Arc::new(schema), vec![ok, bad]).unwrap();

    let resolved = resolve_batch(&batch, &utf8()).unwrap();
    assert_eq!(resolved.schema().field(0).data_type(), &DataType::Int64);
    assert_eq!(resolved.schema().field(1).data_type(), &DataType::Utf8);
    // Only the placeholder column was cast
    assert!(Arc::ptr_eq(resolved.column(0), batch.column(0)));
    assert!(!Arc::ptr_eq(resolved.column(1), batch.column(1)));
}

#[test]
fn test_resolution_is_idempotent() {
    let schema = Schema::new(vec![Field::new("a", DataType::Null, true)]);
    let batch = RecordBatch::try_new(
        Arc::new(schema),
        vec![Arc::new(NullArray::new(2)) as ArrayRef],
    )
    .unwrap();

    let once = resolve_batch(&batch, &utf8()).unwrap();
    let twice = resolve_batch(&once, &utf8()).unwrap();
    assert_eq!(once.schema(), twice.schema());
    assert!(Arc::ptr_eq(once.column(0), twice.column(0)));
}

#[test]
fn test_all_null_int64_column_stays_int64() {
    // Declared type wins: an all-null column that is already Int64 is not
    // "fixed" to the default — resolution never inspects row values.
    let schema = Schema::new(vec![Field::new("n", DataType::Int64, true)]);
    let n = Arc::new(Int64Array::from(vec![None, None, None])) as ArrayRef;
    let batch = RecordBatch::try_new(Arc::new(schema), vec![n]).unwrap();

    let resolved = resolve_batch(&batch, &utf8()).unwrap();
    assert_eq!(resolved.schema().field(0).data_type(), &DataType::Int64);
    assert_eq!(resolved.column(0).null_count(), 3);
}

#[test]
fn test_resolve_nested_batch_values_stay_null() {
    // Column assembled from records where "tags" is always an empty array:
    // List(Null) resolves to List(Utf8) with the rows unchanged.
    let records: Vec<serde_json::Map<String, serde_json::Value>> = vec![
        serde_json::from_value(serde_json::json!({"tags": []})).unwrap(),
        serde_json::from_value(serde_json::json!({"tags": [null]})).unwrap(),
    ];
    let batch = crate::table::assemble(&records).unwrap();
    assert_eq!(
        batch.schema().field(0).data_type(),
        &list_of(DataType::Null)
    );

    let resolved = resolve_batch(&batch, &utf8()).unwrap();
    assert_eq!(
        resolved.schema().field(0).data_type(),
        &list_of(DataType::Utf8)
    );
    assert_eq!(resolved.num_rows(), 2);
}
