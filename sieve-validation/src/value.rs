//! Input records and value helpers.

use serde_json::{Map, Value};

/// A field-name to value mapping, in insertion order.
pub type Record = Map<String, Value>;

/// `null`, `""`, `[]` and `{}` are empty; `0`, `false` and `" "` are not.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// The value at `key`, or `default` when it is missing or `null`.
pub fn field(key: &str, record: &Record, default: Value) -> Value {
    match record.get(key) {
        Some(value) if !value.is_null() => value.clone(),
        _ => default,
    }
}

/// Text form of a scalar: strings as-is, `null` as `""`, everything else
/// through its JSON rendering.
pub fn to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Resolve a field key against a record.
///
/// An exact key match wins. Otherwise the key is read as a path: `.`
/// separates segments, `[n]` indexes lists and `*` fans out over every
/// child, collecting the matches into a list (children missing the rest of
/// the path are left out).
///
/// ```
/// use serde_json::json;
/// use sieve_validation::data_get;
///
/// let record = json!({
///     "address": {"city": "Lyon"},
///     "items": [{"sku": "a1"}, {"sku": "b2"}]
/// });
/// let record = record.as_object().unwrap();
///
/// assert_eq!(data_get(record, "address.city"), Some(json!("Lyon")));
/// assert_eq!(data_get(record, "items[1].sku"), Some(json!("b2")));
/// assert_eq!(data_get(record, "items.*.sku"), Some(json!(["a1", "b2"])));
/// assert_eq!(data_get(record, "address.zip"), None);
/// ```
pub fn data_get(record: &Record, key: &str) -> Option<Value> {
    if let Some(value) = record.get(key) {
        return Some(value.clone());
    }

    let segments = path_segments(key);
    let (head, rest) = segments.split_first()?;

    if *head == "*" {
        return Some(collect_wildcard(record.values(), rest));
    }

    record.get(*head).and_then(|value| lookup(value, rest))
}

fn path_segments(key: &str) -> Vec<&str> {
    key.split(['.', '[', ']'])
        .filter(|segment| !segment.is_empty())
        .collect()
}

fn lookup(value: &Value, segments: &[&str]) -> Option<Value> {
    let Some((head, rest)) = segments.split_first() else {
        return Some(value.clone());
    };

    if *head == "*" {
        return match value {
            Value::Array(items) => Some(collect_wildcard(items.iter(), rest)),
            Value::Object(map) => Some(collect_wildcard(map.values(), rest)),
            _ => None,
        };
    }

    match value {
        Value::Object(map) => map.get(*head).and_then(|child| lookup(child, rest)),
        Value::Array(items) => head
            .parse::<usize>()
            .ok()
            .and_then(|index| items.get(index))
            .and_then(|child| lookup(child, rest)),
        _ => None,
    }
}

fn collect_wildcard<'a>(children: impl Iterator<Item = &'a Value>, rest: &[&str]) -> Value {
    let nested = rest.contains(&"*");
    let mut collected = Vec::new();

    for child in children {
        match lookup(child, rest) {
            Some(Value::Array(items)) if nested => collected.extend(items),
            Some(value) => collected.push(value),
            None => {}
        }
    }

    Value::Array(collected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_is_empty() {
        assert!(is_empty(&Value::Null));
        assert!(is_empty(&json!("")));
        assert!(is_empty(&json!([])));
        assert!(is_empty(&json!({})));
        assert!(!is_empty(&json!(0)));
        assert!(!is_empty(&json!(false)));
        assert!(!is_empty(&json!(" ")));
        assert!(!is_empty(&json!([""])));
    }

    #[test]
    fn test_field_default() {
        let data = record(json!({"a": 1, "b": null}));
        assert_eq!(field("a", &data, json!(0)), json!(1));
        assert_eq!(field("b", &data, json!("x")), json!("x"));
        assert_eq!(field("c", &data, Value::Null), Value::Null);
    }

    #[test]
    fn test_to_text() {
        assert_eq!(to_text(&json!("abc")), "abc");
        assert_eq!(to_text(&json!(12)), "12");
        assert_eq!(to_text(&json!(1.5)), "1.5");
        assert_eq!(to_text(&json!(true)), "true");
        assert_eq!(to_text(&Value::Null), "");
    }

    #[test]
    fn test_exact_key_beats_path() {
        let data = record(json!({"a.b": "flat", "a": {"b": "nested"}}));
        assert_eq!(data_get(&data, "a.b"), Some(json!("flat")));
    }

    #[test]
    fn test_nested_paths() {
        let data = record(json!({
            "user": {"emails": ["a@x.io", "b@x.io"], "name": {"first": "Ada"}}
        }));
        assert_eq!(data_get(&data, "user.name.first"), Some(json!("Ada")));
        assert_eq!(data_get(&data, "user.emails[0]"), Some(json!("a@x.io")));
        assert_eq!(data_get(&data, "user.emails.1"), Some(json!("b@x.io")));
        assert_eq!(data_get(&data, "user.emails[5]"), None);
        assert_eq!(data_get(&data, "user.name.first.x"), None);
    }

    #[test]
    fn test_wildcards() {
        let data = record(json!({
            "orders": [
                {"lines": [{"qty": 1}, {"qty": 2}]},
                {"lines": [{"qty": 3}]},
                {"note": "no lines"}
            ]
        }));
        assert_eq!(
            data_get(&data, "orders.*.lines.*.qty"),
            Some(json!([1, 2, 3]))
        );
        assert_eq!(
            data_get(&data, "orders.*.note"),
            Some(json!(["no lines"]))
        );
    }
}
