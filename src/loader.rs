use anyhow::Result;
use serde_json::{Map, Value as JsonValue};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Top-level contents of the configuration file, in file order
pub type ConfigMap = Map<String, JsonValue>;

/// Reasons a configuration file could not be turned into a `ConfigMap`
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Configuration file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Invalid JSON in configuration file: {}", path.display())]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid JSON in configuration file: {} (top-level value is {found}, expected an object)", path.display())]
    NotAnObject { path: PathBuf, found: &'static str },

    #[error("Failed to read configuration file: {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl LoadError {
    /// Whether the loader degrades this failure to an empty mapping
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, LoadError::Io { .. })
    }
}

/// Reads the configuration file from disk on every call
///
/// There is deliberately no cache: each request sees the file as it is on
/// disk at that moment, so edits take effect without a restart.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    path: Arc<PathBuf>,
}

impl ConfigLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
        }
    }

    /// Load the configuration mapping
    ///
    /// A missing file, invalid JSON, or a top-level value that is not an
    /// object is logged and yields an empty mapping. Any other I/O failure is
    /// returned to the caller.
    pub async fn load(&self) -> Result<ConfigMap> {
        match self.read_mapping().await {
            Ok(map) => {
                tracing::debug!("Loaded {} keys from {}", map.len(), self.path.display());
                Ok(map)
            }
            Err(err) if err.is_recoverable() => {
                match &err {
                    LoadError::InvalidJson { source, .. } => {
                        tracing::error!("{}: {}", err, source)
                    }
                    _ => tracing::error!("{}", err),
                }
                Ok(ConfigMap::new())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Read and parse the file without any fallback
    pub async fn read_mapping(&self) -> Result<ConfigMap, LoadError> {
        let raw = tokio::fs::read(self.path.as_path())
            .await
            .map_err(|source| {
                if source.kind() == io::ErrorKind::NotFound {
                    LoadError::NotFound {
                        path: self.path.to_path_buf(),
                    }
                } else {
                    LoadError::Io {
                        path: self.path.to_path_buf(),
                        source,
                    }
                }
            })?;

        parse_mapping(&raw).map_err(|err| match err {
            ParseFailure::Syntax(source) => LoadError::InvalidJson {
                path: self.path.to_path_buf(),
                source,
            },
            ParseFailure::Shape(found) => LoadError::NotAnObject {
                path: self.path.to_path_buf(),
                found,
            },
        })
    }
}

enum ParseFailure {
    Syntax(serde_json::Error),
    Shape(&'static str),
}

fn parse_mapping(raw: &[u8]) -> Result<ConfigMap, ParseFailure> {
    match serde_json::from_slice::<JsonValue>(raw).map_err(ParseFailure::Syntax)? {
        JsonValue::Object(map) => Ok(map),
        other => Err(ParseFailure::Shape(json_type_name(&other))),
    }
}

fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
