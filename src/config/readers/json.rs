use serde_json::Value;
use std::path::Path;

use super::{expect_object, parse_error, read_source, ConfigReader};
use crate::error::Result;

/// Reads `.json` config files.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReader;

impl ConfigReader for JsonReader {
    fn read(&self, path: &Path) -> Result<Value> {
        let content = read_source(path)?;
        let value: Value = serde_json::from_str(&content).map_err(|e| parse_error(path, e))?;
        expect_object(path, value)
    }
}
