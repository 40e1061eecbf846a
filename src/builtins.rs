//! Named transforms that can be referenced from options files, schema files,
//! and the command line.

use std::sync::Arc;

use serde_json::Value;

use crate::error::BoxError;
use crate::types::{PropertyFn, ValueFn};

/// Names accepted by [`property_transform`].
pub const PROPERTY_TRANSFORMS: &[&str] =
    &["uppercase", "lowercase", "camelCase", "snake_case", "kebab-case"];

/// Names accepted by [`value_transform`].
pub const VALUE_TRANSFORMS: &[&str] = &["identity", "uppercase", "lowercase", "trim", "stringify"];

/// Look up a built-in property transform by name.
pub fn property_transform(name: &str) -> Option<PropertyFn> {
    let f: fn(&str) -> String = match name {
        "uppercase" => |p: &str| p.to_uppercase(),
        "lowercase" => |p: &str| p.to_lowercase(),
        "camelCase" => to_camel_case,
        "snake_case" => |p: &str| split_words(p).join("_"),
        "kebab-case" => |p: &str| split_words(p).join("-"),
        _ => return None,
    };
    Some(Arc::new(move |p: &str| Ok::<_, BoxError>(f(p))))
}

/// Look up a built-in value transform by name.
pub fn value_transform(name: &str) -> Option<ValueFn> {
    let f: fn(&Value) -> Value = match name {
        "identity" => Value::clone,
        "uppercase" => |v: &Value| map_str(v, str::to_uppercase),
        "lowercase" => |v: &Value| map_str(v, str::to_lowercase),
        "trim" => |v: &Value| map_str(v, |s| s.trim().to_string()),
        "stringify" => |v: &Value| match v {
            Value::String(_) => v.clone(),
            other => Value::String(other.to_string()),
        },
        _ => return None,
    };
    Some(Arc::new(move |v: &Value| Ok::<_, BoxError>(f(v))))
}

fn map_str(value: &Value, f: impl Fn(&str) -> String) -> Value {
    match value {
        Value::String(s) => Value::String(f(s)),
        other => other.clone(),
    }
}

/// Split an identifier into lowercase words on `_`, `-`, spaces and
/// lower-to-upper case boundaries.
fn split_words(name: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for c in name.chars() {
        if c == '_' || c == '-' || c == ' ' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn to_camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for (i, word) in split_words(name).iter().enumerate() {
        if i == 0 {
            out.push_str(word);
            continue;
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}
