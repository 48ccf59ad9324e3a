//! Shared error types for the application

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for structlint operations
#[derive(Debug, Error)]
pub enum Error {
    /// A file the tree walk listed could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal errors
    #[error(transparent)]
    Walk(#[from] walkdir::Error),

    /// Configuration errors
    #[error("Configuration error in '{field}': {message}")]
    Config { field: String, message: String },

    /// A configured regular expression failed to compile
    #[error("Invalid pattern for '{field}' ({pattern:?}): {source}")]
    InvalidPattern {
        field: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Both `allowed` and `disallowed` import rules were given for one scope
    #[error("Only one of '{scope}_allowed' and '{scope}_disallowed' may be specified for imports")]
    ConflictingImportRules { scope: String },

    /// An identifier string did not have the `path:ordinal:name` shape
    #[error("Malformed identifier {0:?}: expected exactly two ':' separators")]
    MalformedIdentifier(String),

    /// A source path could not be related to the configured source root
    #[error("{} should be relative to {}, or at least overlap with it", path.display(), base.display())]
    PathRelocation { path: PathBuf, base: PathBuf },

    /// TOML parse errors
    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error(transparent)]
    TomlSerialize(#[from] toml::ser::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error for one field
    pub fn config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Config {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an invalid pattern error
    pub fn invalid_pattern(
        field: impl Into<String>,
        pattern: impl Into<String>,
        source: regex::Error,
    ) -> Self {
        Self::InvalidPattern {
            field: field.into(),
            pattern: pattern.into(),
            source,
        }
    }

    /// Whether the user can fix this by editing configuration or inputs
    pub fn is_configuration_problem(&self) -> bool {
        matches!(
            self,
            Self::Config { .. }
                | Self::InvalidPattern { .. }
                | Self::ConflictingImportRules { .. }
                | Self::PathRelocation { .. }
                | Self::Toml(_)
        )
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;
