//! Mapper configuration: global transforms, exclusive mode, depth guard.

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::builtins;
use crate::error::{BoxError, LoadError, MapError};
use crate::types::{json_type_name, PropertyFn, ValueFn};

/// A transform option as supplied: either a callable, or a value from
/// configuration data that must name a built-in transform.
#[derive(Clone)]
enum OptionSource<F> {
    Callable(F),
    Unresolved(Value),
}

impl<F> OptionSource<F> {
    /// Turn the supplied option into a callable, or fail if it is not one.
    ///
    /// Falsy values (`null`, `false`, `0`, `""`) mean the option was not
    /// supplied.
    fn resolve(self, option: &str, lookup: fn(&str) -> Option<F>) -> Result<Option<F>, MapError> {
        match self {
            OptionSource::Callable(f) => Ok(Some(f)),
            OptionSource::Unresolved(value) if is_falsy(&value) => Ok(None),
            OptionSource::Unresolved(Value::String(name)) => match lookup(&name) {
                Some(f) => Ok(Some(f)),
                None => Err(MapError::InvalidOptionType {
                    option: option.to_string(),
                    actual: format!("string \"{}\"", name),
                }),
            },
            OptionSource::Unresolved(other) => Err(MapError::InvalidOptionType {
                option: option.to_string(),
                actual: json_type_name(&other).to_string(),
            }),
        }
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Options for a [`MagicMapper`](crate::MagicMapper).
///
/// Build them in code:
///
/// ```
/// use magic_mapper::MapperOptions;
///
/// let options = MapperOptions::new()
///     .property_transform(|p| p.to_uppercase())
///     .exclusive(true);
/// ```
///
/// or read them from JSON with [`MapperOptions::from_value`]. Transform
/// options are only checked when the mapper is constructed.
#[derive(Clone, Default)]
pub struct MapperOptions {
    property_transform: Option<OptionSource<PropertyFn>>,
    value_transform: Option<OptionSource<ValueFn>>,
    exclusive: bool,
    max_depth: Option<usize>,
}

/// JSON form of [`MapperOptions`].
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawOptions {
    #[serde(default)]
    property_transform: Option<Value>,
    #[serde(default)]
    value_transform: Option<Value>,
    #[serde(default)]
    exclusive: bool,
    #[serde(default)]
    max_depth: Option<usize>,
}

impl MapperOptions {
    /// Defaults: no transforms, non-exclusive, unbounded depth.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rename every visited property key.
    pub fn property_transform<F>(self, f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.try_property_transform(move |p| Ok(f(p)))
    }

    /// Rename every visited property key with a fallible function.
    pub fn try_property_transform<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> Result<String, BoxError> + Send + Sync + 'static,
    {
        self.property_transform = Some(OptionSource::Callable(Arc::new(f)));
        self
    }

    /// Rewrite every visited property value before any other step.
    pub fn value_transform<F>(self, f: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.try_value_transform(move |v| Ok(f(v)))
    }

    /// Rewrite every visited property value with a fallible function.
    pub fn try_value_transform<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        self.value_transform = Some(OptionSource::Callable(Arc::new(f)));
        self
    }

    /// Supply `propertyTransform` as configuration data (normally a built-in name).
    pub fn property_transform_value(mut self, value: impl Into<Value>) -> Self {
        self.property_transform = Some(OptionSource::Unresolved(value.into()));
        self
    }

    /// Supply `valueTransform` as configuration data (normally a built-in name).
    pub fn value_transform_value(mut self, value: impl Into<Value>) -> Self {
        self.value_transform = Some(OptionSource::Unresolved(value.into()));
        self
    }

    /// Only keep properties listed in the schema.
    pub fn exclusive(mut self, exclusive: bool) -> Self {
        self.exclusive = exclusive;
        self
    }

    /// Fail instead of recursing deeper than `depth` nested containers.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Read options from their JSON form:
    ///
    /// ```json
    /// { "propertyTransform": "camelCase", "valueTransform": null, "exclusive": false, "maxDepth": 64 }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `LoadError::InvalidOptions` for unknown keys or mistyped
    /// `exclusive`/`maxDepth`. Transform entries are accepted as-is and
    /// checked by [`MagicMapper::new`](crate::MagicMapper::new).
    pub fn from_value(value: &Value) -> Result<Self, LoadError> {
        let raw = RawOptions::deserialize(value).map_err(|e| LoadError::InvalidOptions {
            message: e.to_string(),
        })?;

        Ok(Self {
            property_transform: raw.property_transform.map(OptionSource::Unresolved),
            value_transform: raw.value_transform.map(OptionSource::Unresolved),
            exclusive: raw.exclusive,
            max_depth: raw.max_depth,
        })
    }

    /// Overlay options from `other` where it sets them.
    ///
    /// Transforms and the depth limit from `other` win when present;
    /// exclusive mode is on if either side enables it.
    pub fn merge(mut self, other: MapperOptions) -> Self {
        if other.property_transform.is_some() {
            self.property_transform = other.property_transform;
        }
        if other.value_transform.is_some() {
            self.value_transform = other.value_transform;
        }
        if other.max_depth.is_some() {
            self.max_depth = other.max_depth;
        }
        self.exclusive |= other.exclusive;
        self
    }

    pub(crate) fn validate(self) -> Result<ValidatedOptions, MapError> {
        let property_transform = match self.property_transform {
            Some(source) => source.resolve("propertyTransform", builtins::property_transform)?,
            None => None,
        };
        let value_transform = match self.value_transform {
            Some(source) => source.resolve("valueTransform", builtins::value_transform)?,
            None => None,
        };

        Ok(ValidatedOptions {
            property_transform,
            value_transform,
            exclusive: self.exclusive,
            max_depth: self.max_depth,
        })
    }
}

impl fmt::Debug for MapperOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn describe<F>(source: &Option<OptionSource<F>>) -> String {
            match source {
                None => "None".to_string(),
                Some(OptionSource::Callable(_)) => "<fn>".to_string(),
                Some(OptionSource::Unresolved(v)) => v.to_string(),
            }
        }

        f.debug_struct("MapperOptions")
            .field("property_transform", &describe(&self.property_transform))
            .field("value_transform", &describe(&self.value_transform))
            .field("exclusive", &self.exclusive)
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

/// Options after construction-time validation: every transform is callable.
#[derive(Clone)]
pub(crate) struct ValidatedOptions {
    pub property_transform: Option<PropertyFn>,
    pub value_transform: Option<ValueFn>,
    pub exclusive: bool,
    pub max_depth: Option<usize>,
}
