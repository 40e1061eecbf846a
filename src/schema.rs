//! Mapping schemas: per-property directives keyed by output property name.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::builtins;
use crate::error::{BoxError, LoadError};
use crate::types::{json_type_name, ValueFn};

/// Sentinel directive: copy the property's value as-is, without recursion.
pub const DIRECT: Directive = Directive::Direct;

/// Per-property instruction controlling how a mapped value is produced.
#[derive(Clone)]
pub enum Directive {
    /// Copy the (value-transformed) source value unchanged.
    Direct,
    /// Replace the value with the function's result.
    Transform(ValueFn),
    /// Use this value verbatim, ignoring the source value.
    Literal(Value),
}

impl Directive {
    /// Build a transform directive from an infallible function.
    pub fn transform<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        Directive::Transform(Arc::new(move |v: &Value| Ok::<_, BoxError>(f(v))))
    }

    /// Build a transform directive from a fallible function.
    pub fn try_transform<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        Directive::Transform(Arc::new(f))
    }

    /// Resolve the mapped value for `value` under this directive.
    ///
    /// Only `Direct` takes ownership of the value.
    pub(crate) fn apply(&self, value: Cow<'_, Value>) -> Result<Value, BoxError> {
        match self {
            Directive::Direct => Ok(value.into_owned()),
            Directive::Transform(f) => f(&value),
            Directive::Literal(literal) => Ok(literal.clone()),
        }
    }
}

impl fmt::Debug for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Directive::Direct => f.write_str("Direct"),
            Directive::Transform(_) => f.write_str("Transform(<fn>)"),
            Directive::Literal(v) => f.debug_tuple("Literal").field(v).finish(),
        }
    }
}

impl From<Value> for Directive {
    fn from(value: Value) -> Self {
        Directive::Literal(value)
    }
}

/// Directive as written in a schema file.
///
/// ```json
/// { "kind": "direct" }
/// { "kind": "transform", "value": "uppercase" }
/// { "kind": "literal", "value": 0 }
/// ```
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase", deny_unknown_fields)]
enum DirectiveSpec {
    Direct,
    Transform(String),
    Literal(Value),
}

/// A mapping from (transformed) property name to [`Directive`].
///
/// The same schema applies at every nesting level of a mapping call.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    entries: HashMap<String, Directive>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a "map directly" entry.
    pub fn direct(self, name: impl Into<String>) -> Self {
        self.with(name, Directive::Direct)
    }

    /// Add a transform entry.
    pub fn transform<F>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.with(name, Directive::transform(f))
    }

    /// Add a fallible transform entry. Errors propagate out of the mapping call.
    pub fn try_transform<F>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        self.with(name, Directive::try_transform(f))
    }

    /// Add a literal override entry.
    pub fn literal(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(name, Directive::Literal(value.into()))
    }

    fn with(mut self, name: impl Into<String>, directive: Directive) -> Self {
        self.insert(name, directive);
        self
    }

    /// Insert or replace an entry, returning the previous directive.
    pub fn insert(&mut self, name: impl Into<String>, directive: Directive) -> Option<Directive> {
        self.entries.insert(name.into(), directive)
    }

    pub fn get(&self, name: &str) -> Option<&Directive> {
        self.entries.get(name)
    }

    /// True when an entry exists, whatever its directive.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build a schema from its JSON form.
    ///
    /// The value must be an object whose entries are tagged directives:
    /// `{"kind": "direct"}`, `{"kind": "transform", "value": "<name>"}` or
    /// `{"kind": "literal", "value": <any>}`. Transform names refer to the
    /// built-in value transforms.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::InvalidSchema` for a non-object schema, malformed
    /// entries, or unknown transform names.
    pub fn from_value(value: &Value) -> Result<Self, LoadError> {
        let Some(map) = value.as_object() else {
            return Err(LoadError::InvalidSchema {
                property: String::new(),
                message: format!("expected object, got {}", json_type_name(value)),
            });
        };

        let mut schema = Schema::new();
        for (name, entry) in map {
            let spec = DirectiveSpec::deserialize(entry).map_err(|e| LoadError::InvalidSchema {
                property: name.clone(),
                message: e.to_string(),
            })?;

            let directive = match spec {
                DirectiveSpec::Direct => Directive::Direct,
                DirectiveSpec::Literal(v) => Directive::Literal(v),
                DirectiveSpec::Transform(transform) => {
                    let f = builtins::value_transform(&transform).ok_or_else(|| {
                        LoadError::InvalidSchema {
                            property: name.clone(),
                            message: format!("unknown transform \"{}\"", transform),
                        }
                    })?;
                    Directive::Transform(f)
                }
            };
            schema.insert(name.clone(), directive);
        }
        Ok(schema)
    }
}

impl<K: Into<String>> FromIterator<(K, Directive)> for Schema {
    fn from_iter<I: IntoIterator<Item = (K, Directive)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, d)| (k.into(), d)).collect(),
        }
    }
}
