//! Recursive key-path flattening for nested records

use serde_json::{Map, Value};

/// Default separator for flattened key names
pub const DEFAULT_SEPARATOR: &str = ".";

/// Flatten a single nested record into a flat mapping with composite keys.
///
/// - Nested objects → separator-joined keys (e.g. `user.address.city`)
/// - Arrays of scalars → kept verbatim (→ Arrow `List` column)
/// - Arrays of objects → kept verbatim (→ Arrow `List(Struct)` column)
/// - Nulls → preserved, so all-null columns stay visible to schema inference
///
/// Arrays are never recursed into: exploding list-of-struct values into rows
/// would change the table's grain, and the columnar backend handles nested
/// list/struct columns natively.
///
/// Pure function; safe to invoke once per record independently.
pub fn flatten_record(record: &Map<String, Value>, separator: &str) -> Map<String, Value> {
    let mut flat = Map::new();
    flatten_into(record, separator, "", &mut flat);
    flat
}

fn flatten_into(
    record: &Map<String, Value>,
    separator: &str,
    prefix: &str,
    flat: &mut Map<String, Value>,
) {
    for (key, value) in record {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}{separator}{key}")
        };
        match value {
            Value::Object(nested) => flatten_into(nested, separator, &full_key, flat),
            // Scalars, nulls, and arrays of either kind are kept as-is
            other => {
                flat.insert(full_key, other.clone());
            }
        }
    }
}
