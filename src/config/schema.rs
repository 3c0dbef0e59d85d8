//! Typed view over merged configuration.
//!
//! The merged config is kept as a JSON value; [`Config`] provides accessors
//! for the well-known keys:
//!
//! ```json
//! {
//!   "name": "my-app",
//!   "description": "...",
//!   "introduction": "...",
//!   "keywords": ["php", "deployment"],
//!   "checks": [
//!     { "name": "php", "class": "executable", "group": "tools", "command": "php" }
//!   ],
//!   "cache": { "location": ".environaut.cache", "pretty": true },
//!   "report": { "class": "default" },
//!   "runner": { "class": "default" },
//!   "export": {
//!     "formatters": [ { "type": "json", "location": "config.json" } ]
//!   }
//! }
//! ```

use serde_json::{Map, Value};

use crate::error::{EnvironautError, Result};
use crate::parameters::Parameters;
use crate::report::DEFAULT_GROUP;

/// Check class used when a definition does not name one.
pub const DEFAULT_CHECK_CLASS: &str = "value";

/// Keys of a check definition that are not passed on as parameters.
const CHECK_RESERVED_KEYS: &[&str] = &["name", "class", "group"];

/// One entry of the `checks` list.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckDefinition {
    pub name: String,
    pub class: String,
    pub group: String,
    pub parameters: Parameters,
}

/// One entry of `export.formatters`.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatterDefinition {
    /// Registered formatter name (`json`, `php`, `plain`, `shell`, `xml`).
    pub kind: String,
    pub parameters: Parameters,
}

/// Immutable merged configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    data: Value,
}

impl Config {
    /// Wrap merged config data.
    pub fn new(data: Value) -> Self {
        Self { data }
    }

    /// The raw merged value.
    pub fn as_value(&self) -> &Value {
        &self.data
    }

    /// Look up a value by dotted path (`"export.formatters"`).
    pub fn get(&self, path: &str) -> Option<&Value> {
        path.split('.')
            .try_fold(&self.data, |value, key| value.as_object()?.get(key))
    }

    fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.get_str("name")
    }

    pub fn description(&self) -> Option<&str> {
        self.get_str("description")
    }

    pub fn introduction(&self) -> Option<&str> {
        self.get_str("introduction")
    }

    pub fn keywords(&self) -> Vec<String> {
        match self.get("keywords") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            Some(Value::String(s)) => s.split(',').map(|k| k.trim().to_string()).collect(),
            _ => Vec::new(),
        }
    }

    /// Implementor name configured for a section (`cache`, `report`,
    /// `runner`, `export`).
    pub fn implementor(&self, section: &str) -> Option<&str> {
        self.get(section)
            .and_then(|s| s.get("class"))
            .and_then(Value::as_str)
    }

    /// Parameters of a section, without its `class` key.
    pub fn section_parameters(&self, section: &str) -> Parameters {
        let mut params = self
            .get(section)
            .map(Parameters::from_value)
            .unwrap_or_default();
        params.remove("class");
        params
    }

    /// Parameters for the settings cache.
    pub fn cache_parameters(&self) -> Parameters {
        self.section_parameters("cache")
    }

    /// Check definitions in configured order.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `checks` is not a list of objects.
    pub fn checks(&self) -> Result<Vec<CheckDefinition>> {
        let items = match self.get("checks") {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(EnvironautError::InvalidConfig {
                    message: format!("'checks' must be a list, got: {}", other),
                })
            }
        };

        items
            .iter()
            .enumerate()
            .map(|(index, item)| check_definition(index, item))
            .collect()
    }

    /// Formatter definitions in configured order.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if a definition is not an object or names no
    /// formatter type.
    pub fn formatters(&self) -> Result<Vec<FormatterDefinition>> {
        let items = match self.get("export.formatters") {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(EnvironautError::InvalidConfig {
                    message: format!("'export.formatters' must be a list, got: {}", other),
                })
            }
        };

        items.iter().map(formatter_definition).collect()
    }
}

fn check_definition(index: usize, item: &Value) -> Result<CheckDefinition> {
    let map = item.as_object().ok_or_else(|| EnvironautError::InvalidConfig {
        message: format!("check #{} must be an object, got: {}", index + 1, item),
    })?;
    let text = |key: &str| map.get(key).and_then(Value::as_str).filter(|s| !s.is_empty());

    let parameters: Map<String, Value> = map
        .iter()
        .filter(|(key, _)| !CHECK_RESERVED_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    Ok(CheckDefinition {
        name: text("name")
            .map(str::to_string)
            .unwrap_or_else(|| format!("check-{}", index + 1)),
        class: text("class").unwrap_or(DEFAULT_CHECK_CLASS).to_string(),
        group: text("group").unwrap_or(DEFAULT_GROUP).to_string(),
        parameters: parameters.into(),
    })
}

fn formatter_definition(item: &Value) -> Result<FormatterDefinition> {
    let map = item.as_object().ok_or_else(|| EnvironautError::InvalidConfig {
        message: format!("formatter definition must be an object, got: {}", item),
    })?;

    let kind = map
        .get("type")
        .or_else(|| map.get("class"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .or_else(|| kind_from_location(map.get("location")?.as_str()?))
        .ok_or_else(|| EnvironautError::InvalidConfig {
            message: format!("formatter definition needs a 'type': {}", item),
        })?;

    let mut parameters = Parameters::from_value(item);
    parameters.remove("type");
    parameters.remove("class");
    Ok(FormatterDefinition { kind, parameters })
}

/// Guess a formatter from the output file's extension.
fn kind_from_location(location: &str) -> Option<String> {
    let ext = std::path::Path::new(location).extension()?.to_str()?;
    let kind = match ext.to_lowercase().as_str() {
        "json" => "json",
        "php" => "php",
        "sh" | "env" => "shell",
        "xml" => "xml",
        "txt" => "plain",
        _ => return None,
    };
    Some(kind.to_string())
}
