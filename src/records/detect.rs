//! Record-set detection from arbitrary JSON roots

use crate::error::{Error, Result};
use serde_json::Value;

/// Auto-detect the record list from a parsed JSON payload.
///
/// Supported root shapes:
/// - Top-level array: `[{...}, {...}]` — returned unchanged. Elements are
///   assumed to be objects; this is a documented leniency, not an error path.
/// - Wrapped array: `{"data": [{...}], ...}` — the first value (in insertion
///   order) that is a non-empty array whose first element is an object wins.
///   Later array-of-object fields are ignored even if more plausible.
/// - Single object: `{...}` — treated as a one-record list.
///
/// Any other root (string, number, boolean, null) fails with
/// [`Error::InvalidInputShape`] naming the root's type.
pub fn detect_records(root: Value) -> Result<Vec<Value>> {
    match root {
        Value::Array(records) => Ok(records),
        Value::Object(map) => {
            let wrapped = map.iter().find_map(|(_, value)| match value {
                Value::Array(arr) if !arr.is_empty() && arr[0].is_object() => {
                    Some(arr.clone())
                }
                _ => None,
            });
            match wrapped {
                Some(records) => Ok(records),
                // No array-of-objects value: the whole object is one record
                None => Ok(vec![Value::Object(map)]),
            }
        }
        other => Err(Error::invalid_input_shape(json_type_name(&other))),
    }
}

/// Human-readable name of a JSON value's type, for error messages
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
