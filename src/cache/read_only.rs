//! Load-only settings cache.

use std::path::{Path, PathBuf};

use super::{is_readable, read_settings, resolve_location, SettingsCache};
use crate::error::{EnvironautError, Result};
use crate::parameters::Parameters;
use crate::report::Setting;

/// A cache that can be loaded and queried but never written.
#[derive(Debug, Clone, Default)]
pub struct ReadOnlyCache {
    location: Option<PathBuf>,
    parameters: Parameters,
    settings: Vec<Setting>,
}

impl ReadOnlyCache {
    /// Create an empty cache.
    ///
    /// Recognized parameters: `read_location`, `location`, `working_dir`.
    pub fn new(parameters: Parameters) -> Self {
        Self {
            location: None,
            parameters,
            settings: Vec::new(),
        }
    }

    /// Use an explicit location.
    ///
    /// # Errors
    ///
    /// Returns `InvalidLocation` if the file cannot be read right now.
    pub fn set_location(&mut self, location: impl Into<PathBuf>) -> Result<()> {
        let location = location.into();
        if !is_readable(&location) {
            return Err(EnvironautError::InvalidLocation {
                path: location,
                mode: "readable",
            });
        }
        self.location = Some(location);
        Ok(())
    }

    /// The explicitly set location, if any.
    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    /// The location `load` reads from.
    pub fn read_location(&self) -> PathBuf {
        resolve_location(self.location.as_deref(), &self.parameters, "read_location")
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Load settings from the read location, replacing any held settings.
    ///
    /// Returns `false` if there was nothing to read.
    ///
    /// # Errors
    ///
    /// Returns `CorruptCache` if the file exists but cannot be decoded.
    pub fn load(&mut self) -> Result<bool> {
        let path = self.read_location();
        match read_settings(&path)? {
            Some(settings) => {
                self.settings = settings;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl SettingsCache for ReadOnlyCache {
    fn all_settings(&self) -> &[Setting] {
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{GroupFilter, SettingFlag};
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    const CACHE: &str = r#"[
        {"name": "host", "value": "db.local", "group": "database", "flag": 1},
        {"name": "password", "value": "s3cret", "group": "database", "flag": 2},
        {"name": "host", "value": "cache.local", "group": "redis", "flag": 1}
    ]"#;

    fn loaded() -> (TempDir, ReadOnlyCache) {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.cache");
        fs::write(&path, CACHE).unwrap();
        let mut cache = ReadOnlyCache::new(Parameters::new());
        cache.set_location(&path).unwrap();
        assert!(cache.load().unwrap());
        (temp, cache)
    }

    #[test]
    fn set_location_requires_readable_file() {
        let temp = TempDir::new().unwrap();
        let mut cache = ReadOnlyCache::new(Parameters::new());
        let err = cache.set_location(temp.path().join("missing")).unwrap_err();
        assert!(matches!(err, EnvironautError::InvalidLocation { .. }));
        assert!(cache.location().is_none());
    }

    #[test]
    fn get_returns_first_match() {
        let (_temp, cache) = loaded();
        let setting = cache.get("host", &GroupFilter::Any, None).unwrap();
        assert_eq!(setting.value(), &json!("db.local"));

        let redis = cache.get("host", &GroupFilter::from("redis"), None).unwrap();
        assert_eq!(redis.value(), &json!("cache.local"));
    }

    #[test]
    fn has_respects_flag_bits() {
        let (_temp, cache) = loaded();
        assert!(cache.has("password", &GroupFilter::Any, Some(SettingFlag::SENSITIVE)));
        assert!(!cache.has("password", &GroupFilter::Any, Some(SettingFlag::NORMAL)));
        assert!(cache.has("password", &GroupFilter::Any, Some(SettingFlag::ALL)));
        assert!(!cache.has("nope", &GroupFilter::Any, None));
    }

    #[test]
    fn get_all_filters_and_keeps_order() {
        let (_temp, cache) = loaded();
        assert_eq!(cache.get_all(&GroupFilter::Any, None).len(), 3);
        assert_eq!(cache.get_all(&GroupFilter::Many(vec![]), None).len(), 3);

        let database = cache.get_all(&GroupFilter::from("database"), None);
        let names: Vec<_> = database.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["host", "password"]);
    }

    #[test]
    fn load_missing_file_returns_false() {
        let temp = TempDir::new().unwrap();
        let params = Parameters::from_value(&json!({
            "working_dir": temp.path().to_str().unwrap()
        }));
        let mut cache = ReadOnlyCache::new(params);
        assert!(!cache.load().unwrap());
        assert!(cache.all_settings().is_empty());
    }

    #[test]
    fn load_prefers_read_location_parameter() {
        let temp = TempDir::new().unwrap();
        let read = temp.path().join("read.cache");
        fs::write(&read, CACHE).unwrap();
        let params = Parameters::from_value(&json!({
            "read_location": read.to_str().unwrap(),
            "location": temp.path().join("other.cache").to_str().unwrap()
        }));
        let mut cache = ReadOnlyCache::new(params);
        assert_eq!(cache.read_location(), read);
        assert!(cache.load().unwrap());
        assert_eq!(cache.all_settings().len(), 3);
    }
}
