//! Tests for the sink's schema conversion
//!
//! Catalog round trips need a live REST endpoint and are covered by the
//! docker-compose stack, not here. These tests exercise the pure pieces:
//! field-ID assignment and Arrow-to-Iceberg schema conversion.

use super::writer::{to_iceberg_schema, with_field_ids};
use super::WriteMode;
use arrow::datatypes::{DataType, Field, Fields, Schema, TimeUnit};
use iceberg::spec::{PrimitiveType, Type};
use pretty_assertions::assert_eq;
use std::collections::HashSet;
use std::sync::Arc;

fn collect_ids(field: &Field, ids: &mut Vec<String>) {
    ids.push(field.metadata().get("PARQUET:field_id").unwrap().clone());
    match field.data_type() {
        DataType::List(inner) | DataType::LargeList(inner) => collect_ids(inner, ids),
        DataType::Struct(fields) => {
            for child in fields {
                collect_ids(child, ids);
            }
        }
        _ => {}
    }
}

#[test]
fn test_field_ids_assigned_to_every_field() {
    let schema = Schema::new(vec![
        Field::new("id", DataType::Int64, true),
        Field::new(
            "items",
            DataType::List(Arc::new(Field::new(
                "item",
                DataType::Struct(Fields::from(vec![
                    Field::new("sku", DataType::Utf8, true),
                    Field::new("qty", DataType::Int64, true),
                ])),
                true,
            ))),
            true,
        ),
    ]);

    let annotated = with_field_ids(&schema);
    let mut ids = Vec::new();
    for field in annotated.fields() {
        collect_ids(field, &mut ids);
    }

    // id, items, item, sku, qty
    assert_eq!(ids.len(), 5);
    let unique: HashSet<&String> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len());
}

#[test]
fn test_field_ids_preserve_shape() {
    let schema = Schema::new(vec![Field::new("name", DataType::Utf8, true)]);
    let annotated = with_field_ids(&schema);
    assert_eq!(annotated.field(0).name(), "name");
    assert_eq!(annotated.field(0).data_type(), &DataType::Utf8);
    assert!(annotated.field(0).is_nullable());
}

#[test]
fn test_to_iceberg_schema_scalar_types() {
    let schema = Schema::new(vec![
        Field::new("flag", DataType::Boolean, true),
        Field::new("count", DataType::Int64, true),
        Field::new("ratio", DataType::Float64, true),
        Field::new("label", DataType::Utf8, true),
        Field::new(
            "at",
            DataType::Timestamp(TimeUnit::Microsecond, Some("UTC".into())),
            true,
        ),
    ]);

    let converted = to_iceberg_schema(&schema).unwrap();
    let fields = converted.as_struct().fields();
    assert_eq!(fields.len(), 5);
    assert_eq!(fields[0].name, "flag");
    assert_eq!(*fields[0].field_type, Type::Primitive(PrimitiveType::Boolean));
    assert_eq!(*fields[1].field_type, Type::Primitive(PrimitiveType::Long));
    assert_eq!(*fields[2].field_type, Type::Primitive(PrimitiveType::Double));
    assert_eq!(*fields[3].field_type, Type::Primitive(PrimitiveType::String));
    assert_eq!(
        *fields[4].field_type,
        Type::Primitive(PrimitiveType::Timestamptz)
    );
}

#[test]
fn test_to_iceberg_schema_nested() {
    let schema = Schema::new(vec![Field::new(
        "tags",
        DataType::List(Arc::new(Field::new("item", DataType::Utf8, true))),
        true,
    )]);

    let converted = to_iceberg_schema(&schema).unwrap();
    let fields = converted.as_struct().fields();
    assert!(matches!(*fields[0].field_type, Type::List(_)));
}

#[test]
fn test_default_mode_is_overwrite() {
    assert_eq!(WriteMode::default(), WriteMode::Overwrite);
}
