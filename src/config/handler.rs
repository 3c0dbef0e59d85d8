//! Config location resolution and merging.

use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::merger::merge_all;
use crate::config::readers::{ConfigReader, JsonReader, PhpReader, XmlReader, YamlReader};
use crate::config::schema::Config;
use crate::error::{EnvironautError, Result};

/// Filenames looked up, in order, when a location is a directory.
pub const DEFAULT_FILENAMES: &[&str] = &[
    "environaut.xml",
    "environaut.json",
    "environaut.php",
    "environaut.yml",
];

/// Resolves config locations to files, reads them with the reader matching
/// their extension and merges the results in the order locations were added.
pub struct ConfigHandler {
    readers: BTreeMap<String, Box<dyn ConfigReader>>,
    default_filenames: Vec<String>,
    locations: Vec<PathBuf>,
}

impl Default for ConfigHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConfigHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigHandler")
            .field("readers", &self.readers.keys().collect::<Vec<_>>())
            .field("default_filenames", &self.default_filenames)
            .field("locations", &self.locations)
            .finish()
    }
}

impl ConfigHandler {
    /// Create a handler with the built-in readers and default filenames.
    pub fn new() -> Self {
        let mut handler = Self {
            readers: BTreeMap::new(),
            default_filenames: DEFAULT_FILENAMES.iter().map(|s| s.to_string()).collect(),
            locations: Vec::new(),
        };
        handler.register_reader("xml", XmlReader);
        handler.register_reader("json", JsonReader);
        handler.register_reader("php", PhpReader);
        handler.register_reader("yml", YamlReader);
        handler.register_reader("yaml", YamlReader);
        handler
    }

    /// Register (or replace) the reader for a file extension.
    pub fn register_reader(&mut self, extension: &str, reader: impl ConfigReader + 'static) {
        self.readers
            .insert(extension.to_lowercase(), Box::new(reader));
    }

    /// Replace the filenames looked up in directory locations.
    pub fn set_default_filenames(&mut self, filenames: Vec<String>) {
        self.default_filenames = filenames;
    }

    pub fn default_filenames(&self) -> &[String] {
        &self.default_filenames
    }

    /// Extensions a reader is registered for, sorted.
    pub fn supported_extensions(&self) -> Vec<&str> {
        self.readers.keys().map(String::as_str).collect()
    }

    /// Add a config file or directory.
    ///
    /// # Errors
    ///
    /// Returns `UnreadableLocation` if the path does not exist or cannot be
    /// read.
    pub fn add_location(&mut self, location: impl Into<PathBuf>) -> Result<()> {
        let location = location.into();
        if !is_readable(&location) {
            return Err(EnvironautError::UnreadableLocation { path: location });
        }
        self.locations.push(location);
        Ok(())
    }

    pub fn locations(&self) -> &[PathBuf] {
        &self.locations
    }

    /// Read every location and merge the results.
    ///
    /// Without added locations the current working directory is used.
    ///
    /// # Errors
    ///
    /// Returns `NoConfigFileFound` for a directory without a default config
    /// file, `UnsupportedExtension` for a file no reader handles and the
    /// reader's errors for files that fail to parse.
    pub fn get_config(&self) -> Result<Config> {
        let locations = if self.locations.is_empty() {
            vec![std::env::current_dir()?]
        } else {
            self.locations.clone()
        };

        let values = locations
            .iter()
            .map(|location| self.read_location(location))
            .collect::<Result<Vec<Value>>>()?;

        Ok(Config::new(merge_all(values.iter())))
    }

    fn read_location(&self, location: &Path) -> Result<Value> {
        let file = if location.is_dir() {
            self.find_default_file(location)?
        } else {
            location.to_path_buf()
        };

        let reader = self.reader_for(&file)?;
        tracing::debug!("Reading config from {}", file.display());
        reader.read(&file)
    }

    fn find_default_file(&self, dir: &Path) -> Result<PathBuf> {
        self.default_filenames
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file() && is_readable(path) && self.reader_for(path).is_ok())
            .ok_or_else(|| EnvironautError::NoConfigFileFound {
                path: dir.to_path_buf(),
                attempted: self.default_filenames.join(", "),
            })
    }

    fn reader_for(&self, file: &Path) -> Result<&dyn ConfigReader> {
        file.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| self.readers.get(&ext.to_lowercase()))
            .map(|reader| reader.as_ref())
            .ok_or_else(|| EnvironautError::UnsupportedExtension {
                path: file.to_path_buf(),
                supported: self.supported_extensions().join(", "),
            })
    }
}

fn is_readable(path: &Path) -> bool {
    if path.is_dir() {
        fs::read_dir(path).is_ok()
    } else {
        fs::File::open(path).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn add_location_rejects_missing_path() {
        let temp = TempDir::new().unwrap();
        let mut handler = ConfigHandler::new();
        let result = handler.add_location(temp.path().join("missing.json"));
        assert!(matches!(
            result,
            Err(EnvironautError::UnreadableLocation { .. })
        ));
        assert!(handler.locations().is_empty());
    }

    #[test]
    fn directory_uses_first_default_filename() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("environaut.json"), r#"{"name": "json"}"#).unwrap();
        fs::write(temp.path().join("environaut.yml"), "name: yaml").unwrap();

        let mut handler = ConfigHandler::new();
        handler.add_location(temp.path()).unwrap();
        let config = handler.get_config().unwrap();
        assert_eq!(config.name(), Some("json"));
    }

    #[test]
    fn directory_without_config_lists_attempts() {
        let temp = TempDir::new().unwrap();
        let mut handler = ConfigHandler::new();
        handler.add_location(temp.path()).unwrap();
        let err = handler.get_config().unwrap_err();
        assert!(matches!(err, EnvironautError::NoConfigFileFound { .. }));
        assert!(err.to_string().contains("environaut.xml, environaut.json"));
    }

    #[test]
    fn unsupported_extension_lists_supported() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");
        fs::write(&path, "a=b").unwrap();

        let mut handler = ConfigHandler::new();
        handler.add_location(&path).unwrap();
        let err = handler.get_config().unwrap_err();
        assert!(matches!(err, EnvironautError::UnsupportedExtension { .. }));
        assert!(err.to_string().contains("json, php, xml, yaml, yml"));
    }

    #[test]
    fn locations_merge_in_order() {
        let temp = TempDir::new().unwrap();
        let base = temp.path().join("base.json");
        let local = temp.path().join("local.yml");
        fs::write(
            &base,
            r#"{"name": "base", "keywords": ["a"], "cache": {"pretty": false, "location": "x"}}"#,
        )
        .unwrap();
        fs::write(&local, "name: local\nkeywords: [b]\ncache:\n  pretty: true\n").unwrap();

        let mut handler = ConfigHandler::new();
        handler.add_location(&base).unwrap();
        handler.add_location(&local).unwrap();
        let config = handler.get_config().unwrap();

        assert_eq!(config.name(), Some("local"));
        assert_eq!(config.keywords(), vec!["a", "b"]);
        assert_eq!(
            config.get("cache"),
            Some(&json!({"pretty": true, "location": "x"}))
        );
    }

    #[test]
    fn custom_default_filenames() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("custom.json"), r#"{"name": "custom"}"#).unwrap();

        let mut handler = ConfigHandler::new();
        handler.set_default_filenames(vec!["custom.json".to_string()]);
        handler.add_location(temp.path()).unwrap();
        assert_eq!(handler.get_config().unwrap().name(), Some("custom"));
    }

    #[test]
    fn parse_errors_propagate() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("environaut.json");
        fs::write(&path, "{").unwrap();

        let mut handler = ConfigHandler::new();
        handler.add_location(&path).unwrap();
        assert!(matches!(
            handler.get_config(),
            Err(EnvironautError::ConfigParse { .. })
        ));
    }
}
