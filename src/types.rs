//! Transform function types and JSON helpers.

use std::sync::Arc;

use serde_json::Value;

use crate::error::BoxError;

/// Property-name transform: receives the source key, returns the output key.
pub type PropertyFn = Arc<dyn Fn(&str) -> Result<String, BoxError> + Send + Sync>;

/// Value transform: receives a value, returns its replacement.
pub type ValueFn = Arc<dyn Fn(&Value) -> Result<Value, BoxError> + Send + Sync>;

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
