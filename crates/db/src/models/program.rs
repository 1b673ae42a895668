//! Program documents (`program:{program_id}`).
//!
//! Programs are opaque JSON objects; the only field the backend relies on
//! is `id`, which is always kept in sync with the storage key.

use serde_json::{Map, Value};

/// Field holding the program id inside a program document.
pub const PROGRAM_ID_FIELD: &str = "id";

/// Read the `id` field of a program document, if it is a non-empty string.
pub fn program_id(document: &Value) -> Option<&str> {
    document
        .get(PROGRAM_ID_FIELD)
        .and_then(Value::as_str)
        .filter(|id| !id.trim().is_empty())
}

/// Return `document` with its `id` field set to `program_id`.
///
/// Returns `None` when `document` is not a JSON object.
pub fn with_program_id(document: Value, program_id: &str) -> Option<Value> {
    let mut object: Map<String, Value> = match document {
        Value::Object(map) => map,
        _ => return None,
    };
    object.insert(PROGRAM_ID_FIELD.into(), Value::String(program_id.to_string()));
    Some(Value::Object(object))
}
