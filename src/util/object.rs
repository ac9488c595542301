//! Helpers for loosely typed values (JSON objects handed in by hosts).

use chrono::DateTime;
use serde_json::{Map, Value};

/// Numeric values directly contained in an object or array.
pub fn numeric_values(value: &Value) -> Vec<f64> {
    let items: Box<dyn Iterator<Item = &Value>> = match value {
        Value::Object(map) => Box::new(map.values()),
        Value::Array(items) => Box::new(items.iter()),
        _ => return Vec::new(),
    };

    items.filter_map(Value::as_f64).collect()
}

/// A JSON number that is finite. Strings are not numbers here, even if they
/// parse as one.
pub fn valid_number(value: &Value) -> bool {
    value.as_f64().is_some_and(f64::is_finite)
}

/// Exchange the values stored under two keys. Missing keys are treated as
/// absent and move across as absent.
pub fn swap(map: &mut Map<String, Value>, first: &str, second: &str) {
    let a = map.remove(first);
    let b = map.remove(second);

    if let Some(b) = b {
        map.insert(first.to_string(), b);
    }
    if let Some(a) = a {
        map.insert(second.to_string(), a);
    }
}

/// Number of own entries (object keys or array items); scalars have none.
pub fn size(value: &Value) -> usize {
    match value {
        Value::Object(map) => map.len(),
        Value::Array(items) => items.len(),
        _ => 0,
    }
}

pub fn is_string(value: &Value) -> bool {
    value.is_string()
}

pub fn is_number(value: &Value) -> bool {
    value.is_number()
}

/// JSON cannot carry callables.
pub fn is_function(_value: &Value) -> bool {
    false
}

/// Strings holding an RFC 3339 timestamp count as dates.
pub fn is_date(value: &Value) -> bool {
    value
        .as_str()
        .is_some_and(|s| DateTime::parse_from_rfc3339(s).is_ok())
}

/// A missing key or an explicit `null`.
pub fn is_undefined(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_values() {
        let obj = json!({"a": 1, "b": "2", "c": 3.5, "d": null});
        let mut nums = numeric_values(&obj);
        nums.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(nums, vec![1.0, 3.5]);

        assert_eq!(numeric_values(&json!([1, "x", 2])), vec![1.0, 2.0]);
        assert!(numeric_values(&json!(42)).is_empty());
    }

    #[test]
    fn test_valid_number() {
        assert!(valid_number(&json!(1.25)));
        assert!(valid_number(&json!(-7)));
        assert!(!valid_number(&json!("7")));
        assert!(!valid_number(&Value::Null));
    }

    #[test]
    fn test_swap() {
        let mut map = json!({"x": 1, "y": 2}).as_object().unwrap().clone();
        swap(&mut map, "x", "y");
        assert_eq!(map["x"], json!(2));
        assert_eq!(map["y"], json!(1));

        swap(&mut map, "x", "missing");
        assert!(!map.contains_key("x"));
        assert_eq!(map["missing"], json!(2));
    }

    #[test]
    fn test_size_and_type_checks() {
        assert_eq!(size(&json!({"a": 1, "b": 2})), 2);
        assert_eq!(size(&json!([1, 2, 3])), 3);
        assert_eq!(size(&json!("abc")), 0);

        assert!(is_string(&json!("s")));
        assert!(is_number(&json!(3)));
        assert!(!is_function(&json!({})));
        assert!(is_date(&json!("2024-02-29T10:00:00Z")));
        assert!(!is_date(&json!("February")));

        let obj = json!({"a": null, "b": 1});
        assert!(is_undefined(obj.get("a")));
        assert!(is_undefined(obj.get("zzz")));
        assert!(!is_undefined(obj.get("b")));
    }
}
