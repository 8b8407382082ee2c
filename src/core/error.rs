//! Error types for reading, querying and writing config documents

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used by the config document layer
pub type Result<T> = std::result::Result<T, ConfError>;

/// Errors produced by the config document layer
#[derive(Debug, Error)]
pub enum ConfError {
    /// The file could not be opened, read or written
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A stored value does not have the requested shape
    #[error("[{section}] {key} = {value:?} is not a valid {expected}")]
    Coercion {
        section: String,
        key: String,
        value: String,
        expected: &'static str,
    },

    /// A line that is neither blank nor a comment appeared before the first header
    #[error("line {line}: {text:?} appears before any [section] header")]
    OrphanLine { line: usize, text: String },
}

impl ConfError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn coercion(section: &str, key: &str, value: &str, expected: &'static str) -> Self {
        Self::Coercion {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            expected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coercion_message() {
        let err = ConfError::coercion("sdl", "fullscreen", "yes", "boolean");
        assert_eq!(
            err.to_string(),
            "[sdl] fullscreen = \"yes\" is not a valid boolean"
        );
    }

    #[test]
    fn test_io_error_keeps_source() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = ConfError::io("/tmp/missing.conf", source);
        assert!(err.to_string().contains("/tmp/missing.conf"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
