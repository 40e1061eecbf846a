//! Loading sources, schemas, and options from JSON files and strings.

use std::path::Path;

use serde_json::Value;

use crate::error::LoadError;
use crate::options::MapperOptions;
use crate::schema::Schema;

/// Load a JSON document from a file path.
///
/// # Errors
///
/// Returns `LoadError::FileNotFound` if the file doesn't exist,
/// or `LoadError::InvalidJson` if the file isn't valid JSON.
pub fn load_json(path: &Path) -> Result<Value, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| LoadError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    load_json_str(&content)
}

/// Load a JSON document from a string.
///
/// # Errors
///
/// Returns `LoadError::InvalidJson` if the string isn't valid JSON.
pub fn load_json_str(content: &str) -> Result<Value, LoadError> {
    serde_json::from_str(content).map_err(|source| LoadError::InvalidJson { source })
}

/// Load a schema file (see [`Schema::from_value`] for the format).
pub fn load_schema(path: &Path) -> Result<Schema, LoadError> {
    Schema::from_value(&load_json(path)?)
}

/// Load an options file (see [`MapperOptions::from_value`] for the format).
pub fn load_options(path: &Path) -> Result<MapperOptions, LoadError> {
    MapperOptions::from_value(&load_json(path)?)
}
