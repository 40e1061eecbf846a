//! Magic Mapper
//!
//! Recursive object-to-object mapping for JSON values.
//!
//! A [`MagicMapper`] copies a source object into a new object, renaming keys
//! with an optional `propertyTransform`, rewriting values with an optional
//! `valueTransform`, and consulting a [`Schema`] that can override how single
//! properties are produced.
//!
//! # Example
//!
//! ```
//! use magic_mapper::{MagicMapper, MapperOptions, Schema};
//! use serde_json::json;
//!
//! let mapper = MagicMapper::new(
//!     MapperOptions::new().property_transform(|p| p.to_uppercase()),
//! )
//! .unwrap();
//!
//! let schema = Schema::new()
//!     .direct("RAW")
//!     .transform("PRICE", |v| json!(v.as_f64().unwrap_or(0.0) * 100.0))
//!     .literal("SOURCE", "import");
//!
//! let source = json!({
//!     "price": 1.5,
//!     "raw": { "keep": "as-is" },
//!     "source": "ignored",
//!     "nested": { "id": 7 }
//! });
//!
//! let mapped = mapper.map_value(&source, Some(&schema)).unwrap();
//! assert_eq!(mapped, json!({
//!     "PRICE": 150.0,
//!     "RAW": { "keep": "as-is" },
//!     "SOURCE": "import",
//!     "NESTED": { "ID": 7 }
//! }));
//! ```
//!
//! # Resolution Rules
//!
//! | Schema entry for the (transformed) key | Mapped value |
//! |----------------------------------------|--------------|
//! | [`DIRECT`] | transformed value, no recursion |
//! | transform function | function result |
//! | literal | the literal, source ignored |
//! | (none), array | object elements mapped, others copied |
//! | (none), object | mapped recursively |
//! | (none), scalar | copied (dropped in exclusive mode) |
//!
//! In exclusive mode only properties with a schema entry are kept, and a
//! schema is required.

mod builtins;
mod error;
mod loader;
mod mapper;
mod options;
mod schema;
mod types;

pub use builtins::{property_transform, value_transform, PROPERTY_TRANSFORMS, VALUE_TRANSFORMS};
pub use error::{BoxError, LoadError, MapError};
pub use loader::{load_json, load_json_str, load_options, load_schema};
pub use mapper::MagicMapper;
pub use options::MapperOptions;
pub use schema::{Directive, Schema, DIRECT};
pub use types::{json_type_name, PropertyFn, ValueFn};
