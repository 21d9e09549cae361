//! Traversal and typed access over an untyped JSON payload.
//!
//! Nothing here assumes a schema: every accessor checks the type it finds and
//! returns `None` otherwise.

use serde_json::{Map, Value};

/// Depth-first iterator over every object in a JSON tree.
///
/// Objects are yielded before their children; arrays are descended into but
/// never yielded; scalars yield nothing. Order follows the payload's own key
/// and element order.
#[derive(Debug, Clone)]
pub struct Records<'a> {
    stack: Vec<&'a Value>,
}

impl<'a> Iterator for Records<'a> {
    type Item = &'a Map<String, Value>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(value) = self.stack.pop() {
            match value {
                Value::Object(map) => {
                    self.stack.extend(map.values().rev());
                    return Some(map);
                }
                Value::Array(items) => self.stack.extend(items.iter().rev()),
                _ => {}
            }
        }
        None
    }
}

/// Walks `value` and yields every embedded object, starting with `value` itself.
///
/// Calling `walk` again restarts the traversal.
pub fn walk(value: &Value) -> Records<'_> {
    Records { stack: vec![value] }
}

/// Follows a dot-separated path of object keys.
pub fn deep_get<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(value, |current, key| current.as_object()?.get(key))
}

/// Whether `value` is a JSON integer (not a float, not a bool).
pub fn is_integer(value: &Value) -> bool {
    value.is_i64() || value.is_u64()
}

/// `map[key]` as an `i64`, if it is an integer that fits.
pub fn get_i64(map: &Map<String, Value>, key: &str) -> Option<i64> {
    map.get(key).and_then(Value::as_i64)
}

/// `map[key]` as a string slice.
pub fn get_str<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    map.get(key).and_then(Value::as_str)
}

/// `map[key]` as a boolean.
pub fn get_bool(map: &Map<String, Value>, key: &str) -> Option<bool> {
    map.get(key).and_then(Value::as_bool)
}

/// `map[key]` if present and not `null`.
pub fn get_present<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    map.get(key).filter(|value| !value.is_null())
}

/// Integers pass through; all-digit strings are parsed; everything else is `None`.
pub fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
            s.parse().ok()
        }
        _ => None,
    }
}
