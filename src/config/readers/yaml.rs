use serde_json::Value;
use std::path::Path;

use super::{expect_object, parse_error, read_source, ConfigReader};
use crate::error::Result;

/// Reads `.yml` / `.yaml` config files.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlReader;

impl ConfigReader for YamlReader {
    fn read(&self, path: &Path) -> Result<Value> {
        let content = read_source(path)?;
        if content.trim().is_empty() {
            return expect_object(path, Value::Null);
        }
        let value: Value = serde_yaml::from_str(&content).map_err(|e| parse_error(path, e))?;
        expect_object(path, value)
    }
}
