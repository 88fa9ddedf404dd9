//! Helpers for loosely-typed definition values.
//!
//! Definitions are JSON values. Arrays are positional; object keys that are
//! canonical integers are positional too, every other key is a name.

use std::borrow::Cow;

use serde_json::Value;

/// A definition entry key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKey<'a> {
    /// Positional entry (array index or canonical integer object key).
    Position(i64),
    /// Named entry.
    Name(&'a str),
}

impl EntryKey<'_> {
    /// Classify an object key.
    #[must_use]
    pub fn classify(key: &str) -> EntryKey<'_> {
        canonical_integer(key).map_or(EntryKey::Name(key), EntryKey::Position)
    }

    /// The key as text, as passed to rule callbacks.
    #[must_use]
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            EntryKey::Position(index) => Cow::Owned(index.to_string()),
            EntryKey::Name(name) => Cow::Borrowed(name),
        }
    }

    /// The name, if this is a named key.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            EntryKey::Position(_) => None,
            EntryKey::Name(name) => Some(name),
        }
    }
}

/// Parse a key that is written exactly as an integer would print.
///
/// `"0"`, `"12"` and `"-3"` qualify; `"012"`, `"+1"`, `"-0"` and `" 1"` do not.
fn canonical_integer(key: &str) -> Option<i64> {
    let digits = key.strip_prefix('-').unwrap_or(key);
    let canonical = match digits.as_bytes() {
        [] => false,
        [b'0'] => digits.len() == key.len(),
        [first, rest @ ..] => {
            (b'1'..=b'9').contains(first) && rest.iter().all(u8::is_ascii_digit)
        }
    };
    if canonical { key.parse().ok() } else { None }
}

/// Iterate the entries of an array or object in order.
///
/// Scalars have no entries.
pub fn entries(value: &Value) -> Vec<(EntryKey<'_>, &Value)> {
    match value {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| (EntryKey::Position(index_key(index)), item))
            .collect(),
        Value::Object(map) => map
            .iter()
            .map(|(key, item)| (EntryKey::classify(key), item))
            .collect(),
        _ => Vec::new(),
    }
}

fn index_key(index: usize) -> i64 {
    i64::try_from(index).unwrap_or(i64::MAX)
}

/// Whether a value is an array or object.
#[must_use]
pub fn is_structured(value: &Value) -> bool {
    matches!(value, Value::Array(_) | Value::Object(_))
}

/// Look up a field that is present and not `null`.
#[must_use]
pub fn get_set<'a>(item: &'a Value, key: &str) -> Option<&'a Value> {
    let found = match item {
        Value::Object(map) => map.get(key),
        Value::Array(items) => canonical_integer(key)
            .and_then(|index| usize::try_from(index).ok())
            .and_then(|index| items.get(index)),
        _ => None,
    };
    found.filter(|value| !value.is_null())
}

/// Whether a field is present and not `null`.
#[must_use]
pub fn is_set(item: &Value, key: &str) -> bool {
    get_set(item, key).is_some()
}

/// Render a scalar as text.
///
/// Strings are verbatim, numbers use their JSON form, `true` is `1`, and
/// `false` and `null` are empty. Structured values use their JSON encoding.
#[must_use]
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(true) => "1".to_owned(),
        Value::Bool(false) | Value::Null => String::new(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Truthiness of a value.
#[must_use]
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !(text.is_empty() || text == "0"),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Parse a numeric string, allowing surrounding whitespace.
fn numeric_string(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let looks_numeric = !trimmed.is_empty()
        && trimmed
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E'))
        && trimmed.bytes().any(|b| b.is_ascii_digit());
    if looks_numeric { trimmed.parse().ok() } else { None }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => numeric_string(text),
        _ => None,
    }
}

/// Integer view of a value for bitmask tests.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|n| n as i64)),
        Value::String(text) => numeric_string(text).map(|n| n as i64),
        Value::Bool(flag) => Some(i64::from(*flag)),
        Value::Null => Some(0),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Loose equality between two definition values.
///
/// Numbers and numeric strings compare by value, booleans compare by
/// truthiness, `null` equals the empty string and every falsy value, and
/// everything else compares as text or structurally.
#[must_use]
pub fn loose_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Bool(flag), other) | (other, Value::Bool(flag)) => *flag == truthy(other),
        (Value::Null, Value::String(text)) | (Value::String(text), Value::Null) => text.is_empty(),
        (Value::Null, other) | (other, Value::Null) => !truthy(other),
        (Value::String(a), Value::String(b)) => match (numeric_string(a), numeric_string(b)) {
            (Some(x), Some(y)) => (x - y).abs() < f64::EPSILON,
            _ => a == b,
        },
        (Value::Number(number), Value::String(text))
        | (Value::String(text), Value::Number(number)) => match numeric_string(text) {
            Some(parsed) => number
                .as_f64()
                .is_some_and(|n| (n - parsed).abs() < f64::EPSILON),
            None => number.to_string() == *text,
        },
        (Value::Number(_), Value::Number(_)) => match (as_number(left), as_number(right)) {
            (Some(x), Some(y)) => (x - y).abs() < f64::EPSILON,
            _ => false,
        },
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| loose_eq(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, x)| b.get(key).is_some_and(|y| loose_eq(x, y)))
        }
        _ => false,
    }
}
