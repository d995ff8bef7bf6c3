// Light input clean-up ahead of filtering

use crate::value::Record;
use serde_json::Value;

/// Copy the listed fields (every field when `fields` is empty), trimming
/// strings that contain a carriage return. Nested lists and objects are
/// cleaned recursively; `null` and missing fields are dropped.
pub fn sanitize(input: &Record, fields: &[&str]) -> Record {
    let mut out = Record::new();

    let keys: Vec<&str> = if fields.is_empty() {
        input.keys().map(String::as_str).collect()
    } else {
        fields.to_vec()
    };

    for key in keys {
        match input.get(key) {
            None | Some(Value::Null) => continue,
            Some(value) => {
                out.insert(key.to_string(), clean(value));
            }
        }
    }

    out
}

fn clean(value: &Value) -> Value {
    match value {
        Value::String(s) if s.contains('\r') => Value::String(s.trim().to_string()),
        Value::Array(items) => Value::Array(items.iter().map(clean).collect()),
        Value::Object(map) => Value::Object(sanitize(map, &[])),
        other => other.clone(),
    }
}
