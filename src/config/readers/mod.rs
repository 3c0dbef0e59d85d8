//! Format-specific config readers.
//!
//! Every reader turns one file into the same normalized JSON shape (see
//! [`crate::config::schema`]), so the handler can merge sources of different
//! formats.

mod json;
mod php;
mod xml;
mod yaml;

pub use json::JsonReader;
pub use php::PhpReader;
pub use xml::XmlReader;
pub use yaml::YamlReader;

use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::error::{EnvironautError, Result};

/// Reads one config file into the normalized value model.
pub trait ConfigReader {
    /// Parse the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `UnreadableLocation` if the file cannot be read and
    /// `ConfigParse` if its content is malformed.
    fn read(&self, path: &Path) -> Result<Value>;
}

/// Read a config file to a string.
pub(crate) fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        tracing::debug!("Failed to read {}: {}", path.display(), e);
        EnvironautError::UnreadableLocation {
            path: path.to_path_buf(),
        }
    })
}

pub(crate) fn parse_error(path: &Path, message: impl ToString) -> EnvironautError {
    EnvironautError::ConfigParse {
        path: path.to_path_buf(),
        message: message.to_string(),
    }
}

/// Require the parsed root to be a mapping. An empty document counts as an
/// empty mapping.
pub(crate) fn expect_object(path: &Path, value: Value) -> Result<Value> {
    match value {
        Value::Object(_) => Ok(value),
        Value::Null => Ok(Value::Object(Default::default())),
        other => Err(parse_error(
            path,
            format!("root must be a mapping, got: {}", other),
        )),
    }
}
