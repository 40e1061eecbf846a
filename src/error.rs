//! Error types for object mapping and input loading.

use std::path::PathBuf;
use thiserror::Error;

/// Boxed error returned by caller-supplied transform functions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors during mapper construction or mapping.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("'{option}' must be a callable transform, got {actual}")]
    InvalidOptionType { option: String, actual: String },

    #[error("exclusive mode requires a schema")]
    SchemaRequired,

    #[error("expected an object or array to map, got {actual}")]
    NotAnObject { actual: String },

    #[error("maximum mapping depth {limit} exceeded at {path}")]
    DepthExceeded { limit: usize, path: String },

    /// Error raised by a property, value, or schema transform, passed through untouched.
    #[error(transparent)]
    Transform(BoxError),
}

impl MapError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        2
    }
}

/// Errors while loading sources, schemas, or options from JSON.
#[derive(Debug, Error)]
pub enum LoadError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Content errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid schema entry \"{property}\": {message}")]
    InvalidSchema { property: String, message: String },

    #[error("invalid options: {message}")]
    InvalidOptions { message: String },
}

impl LoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::FileNotFound { .. } | LoadError::ReadError { .. } => 3,
            _ => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Boom;

    impl std::fmt::Display for Boom {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "boom")
        }
    }

    impl std::error::Error for Boom {}

    #[test]
    fn load_error_exit_codes() {
        let err = LoadError::FileNotFound {
            path: PathBuf::from("source.json"),
        };
        assert_eq!(err.exit_code(), 3);

        let err = LoadError::InvalidSchema {
            property: "id".into(),
            message: "unknown transform".into(),
        };
        assert_eq!(err.exit_code(), 2);

        let err = LoadError::InvalidOptions {
            message: "unknown field".into(),
        };
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn map_error_exit_codes() {
        assert_eq!(MapError::SchemaRequired.exit_code(), 2);
        let err = MapError::DepthExceeded {
            limit: 4,
            path: "/a/b".into(),
        };
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn invalid_option_display() {
        let err = MapError::InvalidOptionType {
            option: "propertyTransform".into(),
            actual: "\"notAFunction\"".into(),
        };
        assert_eq!(
            err.to_string(),
            "'propertyTransform' must be a callable transform, got \"notAFunction\""
        );
    }

    #[test]
    fn transform_error_is_transparent() {
        let err = MapError::Transform(Box::new(Boom));
        assert_eq!(err.to_string(), "boom");
        match err {
            MapError::Transform(inner) => assert!(inner.downcast_ref::<Boom>().is_some()),
            other => panic!("unexpected error: {other}"),
        }
    }
}
