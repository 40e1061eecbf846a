//! The mapping engine: walks a source object and builds the mapped object.

use std::borrow::Cow;

use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::error::MapError;
use crate::options::{MapperOptions, ValidatedOptions};
use crate::schema::{Directive, Schema};
use crate::types::json_type_name;

/// Maps objects to new objects using global transforms and an optional schema.
///
/// A mapper is immutable after construction and can be shared across threads
/// and reused for any number of calls.
///
/// Recursion follows the nesting of the source. Without
/// [`MapperOptions::max_depth`] there is no limit, so very deep input can
/// exhaust the stack.
#[derive(Clone)]
pub struct MagicMapper {
    options: ValidatedOptions,
}

impl MagicMapper {
    /// Schema directive meaning "copy this value without transformation or recursion".
    pub const DIRECT: Directive = Directive::Direct;

    /// Create a mapper, validating the options once.
    ///
    /// # Errors
    ///
    /// Returns `MapError::InvalidOptionType` if `propertyTransform` or
    /// `valueTransform` was supplied as data that does not name a transform.
    pub fn new(options: MapperOptions) -> Result<Self, MapError> {
        let options = options.validate()?;
        Ok(Self { options })
    }

    /// Whether only schema-listed properties are kept.
    pub fn is_exclusive(&self) -> bool {
        self.options.exclusive
    }

    /// Map the own properties of `source` into a new object.
    ///
    /// For each property the key goes through `propertyTransform` and the
    /// value through `valueTransform`. The transformed key then selects the
    /// schema directive, if any. Without a directive, arrays are mapped
    /// element-wise, objects recursively, and scalars copied. The same schema
    /// is used at every nesting level.
    ///
    /// # Errors
    ///
    /// Returns `MapError::SchemaRequired` in exclusive mode without a schema,
    /// `MapError::DepthExceeded` past the configured depth, and passes errors
    /// from transform functions through as `MapError::Transform`. No partial
    /// result is returned.
    pub fn map(
        &self,
        source: &Map<String, Value>,
        schema: Option<&Schema>,
    ) -> Result<Map<String, Value>, MapError> {
        self.require_schema(schema)?;
        debug!(
            properties = source.len(),
            exclusive = self.options.exclusive,
            schema_entries = schema.map(Schema::len),
            "mapping object"
        );
        self.map_object(source, schema, "", 0)
    }

    /// Map an object or an array of objects.
    ///
    /// # Errors
    ///
    /// As [`MagicMapper::map`], plus `MapError::NotAnObject` for scalar input.
    pub fn map_value(&self, source: &Value, schema: Option<&Schema>) -> Result<Value, MapError> {
        self.require_schema(schema)?;
        match source {
            Value::Object(map) => self.map(map, schema).map(Value::Object),
            Value::Array(items) => {
                debug!(elements = items.len(), "mapping array");
                self.map_array(items, schema, "", 0)
            }
            scalar => Err(MapError::NotAnObject {
                actual: json_type_name(scalar).to_string(),
            }),
        }
    }

    fn require_schema(&self, schema: Option<&Schema>) -> Result<(), MapError> {
        if self.options.exclusive && schema.is_none() {
            return Err(MapError::SchemaRequired);
        }
        Ok(())
    }

    fn map_object(
        &self,
        source: &Map<String, Value>,
        schema: Option<&Schema>,
        path: &str,
        depth: usize,
    ) -> Result<Map<String, Value>, MapError> {
        if let Some(limit) = self.options.max_depth {
            if depth > limit {
                return Err(MapError::DepthExceeded {
                    limit,
                    path: path.to_string(),
                });
            }
        }

        let mut mapped = Map::new();

        for (key, value) in source {
            let property = match &self.options.property_transform {
                Some(f) => f(key).map_err(MapError::Transform)?,
                None => key.clone(),
            };
            let from_value: Cow<'_, Value> = match &self.options.value_transform {
                Some(f) => Cow::Owned(f(value).map_err(MapError::Transform)?),
                None => Cow::Borrowed(value),
            };

            let directive = schema.and_then(|s| s.get(&property));
            if self.options.exclusive && directive.is_none() {
                trace!(path, property = %property, "not in schema, skipped");
                continue;
            }

            // Only `Value::Object` is a mappable object; null is a scalar.
            let resolved = match directive {
                Some(directive) => {
                    trace!(path, property = %property, ?directive, "schema directive");
                    directive.apply(from_value).map_err(MapError::Transform)?
                }
                None => match &*from_value {
                    Value::Array(items) => {
                        let child_path = child_pointer(path, &property);
                        self.map_array(items, schema, &child_path, depth)?
                    }
                    Value::Object(object) => {
                        let child_path = child_pointer(path, &property);
                        Value::Object(self.map_object(object, schema, &child_path, depth + 1)?)
                    }
                    scalar => scalar.clone(),
                },
            };

            mapped.insert(property, resolved);
        }

        Ok(mapped)
    }

    /// Object elements are mapped; everything else, nested arrays included,
    /// is copied.
    fn map_array(
        &self,
        items: &[Value],
        schema: Option<&Schema>,
        path: &str,
        depth: usize,
    ) -> Result<Value, MapError> {
        let mut result = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let resolved = match item {
                Value::Object(object) => {
                    let item_path = format!("{}/{}", path, i);
                    Value::Object(self.map_object(object, schema, &item_path, depth + 1)?)
                }
                other => other.clone(),
            };
            result.push(resolved);
        }
        Ok(Value::Array(result))
    }
}

impl std::fmt::Debug for MagicMapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MagicMapper")
            .field("property_transform", &self.options.property_transform.is_some())
            .field("value_transform", &self.options.value_transform.is_some())
            .field("exclusive", &self.options.exclusive)
            .field("max_depth", &self.options.max_depth)
            .finish()
    }
}

fn child_pointer(path: &str, key: &str) -> String {
    format!("{}/{}", path, escape_pointer(key))
}

/// Escape a key for use as a JSON Pointer segment (`~` -> `~0`, `/` -> `~1`).
fn escape_pointer(key: &str) -> Cow<'_, str> {
    if key.contains(['~', '/']) {
        Cow::Owned(key.replace('~', "~0").replace('/', "~1"))
    } else {
        Cow::Borrowed(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn mapper() -> MagicMapper {
        MagicMapper::new(MapperOptions::new()).unwrap()
    }

    #[test]
    fn copies_flat_object() {
        let source = object(json!({ "a": 1, "b": "two", "c": null, "d": false }));
        let mapped = mapper().map(&source, None).unwrap();
        assert_eq!(mapped, source);
    }

    #[test]
    fn preserves_key_order() {
        let source = object(json!({ "z": 1, "a": 2, "m": 3 }));
        let mapped = mapper().map(&source, None).unwrap();
        let keys: Vec<&str> = mapped.keys().map(String::as_str).collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn schema_matches_nested_properties() {
        // The top-level schema is reused for nested objects.
        let source = object(json!({ "outer": { "secret": "x", "keep": 1 } }));
        let schema = Schema::new().literal("secret", "***");
        let mapped = mapper().map(&source, Some(&schema)).unwrap();
        assert_eq!(
            Value::Object(mapped),
            json!({ "outer": { "secret": "***", "keep": 1 } })
        );
    }

    #[test]
    fn schema_applies_inside_array_elements() {
        let source = object(json!({ "items": [{ "id": 1 }, { "id": 2 }, 7] }));
        let schema = Schema::new().transform("id", |v| json!(v.as_i64().unwrap_or(0) + 100));
        let mapped = mapper().map(&source, Some(&schema)).unwrap();
        assert_eq!(
            Value::Object(mapped),
            json!({ "items": [{ "id": 101 }, { "id": 102 }, 7] })
        );
    }

    #[test]
    fn nested_arrays_and_nulls_in_arrays_pass_through() {
        let mapper = MagicMapper::new(MapperOptions::new().property_transform(|p| p.to_uppercase()))
            .unwrap();
        let source = object(json!({ "grid": [[{ "x": 1 }], null, { "y": 2 }] }));
        let mapped = mapper.map(&source, None).unwrap();
        assert_eq!(
            Value::Object(mapped),
            json!({ "GRID": [[{ "x": 1 }], null, { "Y": 2 }] })
        );
    }

    #[test]
    fn exclusive_drops_nested_objects_not_in_schema() {
        let mapper = MagicMapper::new(MapperOptions::new().exclusive(true)).unwrap();
        let source = object(json!({ "a": 1, "nested": { "a": 2 } }));
        let schema = Schema::new().direct("a");
        let mapped = mapper.map(&source, Some(&schema)).unwrap();
        assert_eq!(Value::Object(mapped), json!({ "a": 1 }));
    }

    #[test]
    fn exclusive_keeps_falsy_literal_entries() {
        let mapper = MagicMapper::new(MapperOptions::new().exclusive(true)).unwrap();
        let source = object(json!({ "a": 1, "b": 2, "c": 3 }));
        let schema = Schema::new().literal("a", false).literal("b", 0);
        let mapped = mapper.map(&source, Some(&schema)).unwrap();
        assert_eq!(Value::Object(mapped), json!({ "a": false, "b": 0 }));
    }

    #[test]
    fn exclusive_with_empty_schema_yields_empty_object() {
        let mapper = MagicMapper::new(MapperOptions::new().exclusive(true)).unwrap();
        assert!(mapper.is_exclusive());
        let source = object(json!({ "a": 1 }));
        let mapped = mapper.map(&source, Some(&Schema::new())).unwrap();
        assert!(mapped.is_empty());
    }

    #[test]
    fn value_transform_runs_before_recursion() {
        let mapper = MagicMapper::new(MapperOptions::new().value_transform(|v| match v {
            Value::String(s) if s == "wrap" => json!({ "wrapped": true }),
            other => other.clone(),
        }))
        .unwrap();
        let source = object(json!({ "a": "wrap" }));
        let mapped = mapper.map(&source, None).unwrap();
        assert_eq!(Value::Object(mapped), json!({ "a": { "wrapped": true } }));
    }

    #[test]
    fn depth_guard_reports_path() {
        let mapper = MagicMapper::new(MapperOptions::new().max_depth(1)).unwrap();
        let ok = object(json!({ "a": { "b": 1 } }));
        assert!(mapper.map(&ok, None).is_ok());

        let deep = object(json!({ "a": { "b": { "c": 1 } } }));
        let err = mapper.map(&deep, None).unwrap_err();
        assert!(matches!(
            err,
            MapError::DepthExceeded { limit: 1, ref path } if path == "/a/b"
        ));
    }

    #[test]
    fn depth_guard_path_escapes_keys() {
        let mapper = MagicMapper::new(MapperOptions::new().max_depth(1)).unwrap();
        let source = object(json!({ "flat": 1, "a/b": { "c~d": { "e": 1 } } }));
        let err = mapper.map(&source, None).unwrap_err();
        assert!(matches!(err, MapError::DepthExceeded { ref path, .. } if path == "/a~1b/c~0d"));
    }

    #[test]
    fn depth_guard_counts_array_elements() {
        let mapper = MagicMapper::new(MapperOptions::new().max_depth(0)).unwrap();
        let source = object(json!({ "list": [{ "x": 1 }] }));
        let err = mapper.map(&source, None).unwrap_err();
        assert!(matches!(err, MapError::DepthExceeded { ref path, .. } if path == "/list/0"));
    }

    #[test]
    fn depth_guard_ignores_direct_values() {
        let mapper = MagicMapper::new(MapperOptions::new().max_depth(0)).unwrap();
        let source = object(json!({ "blob": { "deep": { "deeper": {} } } }));
        let schema = Schema::new().direct("blob");
        assert!(mapper.map(&source, Some(&schema)).is_ok());
    }

    #[test]
    fn map_value_handles_top_level_array() {
        let source = json!([{ "a": 1 }, "plain"]);
        let mapped = mapper().map_value(&source, None).unwrap();
        assert_eq!(mapped, source);
    }

    #[test]
    fn map_value_rejects_scalars() {
        let err = mapper().map_value(&json!(5), None).unwrap_err();
        assert!(matches!(err, MapError::NotAnObject { ref actual } if actual == "number"));
    }

    #[test]
    fn map_value_requires_schema_in_exclusive_mode() {
        let mapper = MagicMapper::new(MapperOptions::new().exclusive(true)).unwrap();
        let err = mapper.map_value(&json!([]), None).unwrap_err();
        assert!(matches!(err, MapError::SchemaRequired));
    }

    #[test]
    fn escapes_pointer_segments() {
        assert_eq!(escape_pointer("plain"), "plain");
        assert_eq!(escape_pointer("a/b~c"), "a~1b~0c");
    }

    #[test]
    fn mapper_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MagicMapper>();
    }
}
