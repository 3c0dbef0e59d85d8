//! Read-write settings cache.

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use super::entry::CacheEntry;
use super::{is_writable, read_settings, resolve_location, SettingsCache};
use crate::error::{EnvironautError, Result};
use crate::parameters::Parameters;
use crate::report::Setting;

/// A cache that accumulates settings and persists them on [`Cache::save`].
#[derive(Debug, Clone, Default)]
pub struct Cache {
    location: Option<PathBuf>,
    parameters: Parameters,
    settings: Vec<Setting>,
}

impl Cache {
    /// Create an empty cache.
    ///
    /// Recognized parameters: `read_location`, `write_location`,
    /// `location`, `working_dir`, `pretty`.
    pub fn new(parameters: Parameters) -> Self {
        Self {
            location: None,
            parameters,
            settings: Vec::new(),
        }
    }

    /// Use an explicit location for both loading and saving.
    ///
    /// # Errors
    ///
    /// Returns `InvalidLocation` if the path cannot be written right now.
    pub fn set_location(&mut self, location: impl Into<PathBuf>) -> Result<()> {
        let location = location.into();
        if !is_writable(&location) {
            return Err(EnvironautError::InvalidLocation {
                path: location,
                mode: "writable",
            });
        }
        self.location = Some(location);
        Ok(())
    }

    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    /// The location `load` reads from.
    pub fn read_location(&self) -> PathBuf {
        resolve_location(self.location.as_deref(), &self.parameters, "read_location")
    }

    /// The location `save` writes to.
    pub fn write_location(&self) -> PathBuf {
        resolve_location(self.location.as_deref(), &self.parameters, "write_location")
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Load settings from the read location, replacing any held settings.
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

    /// Append a setting. Duplicates are kept.
    pub fn add(&mut self, setting: Setting) {
        self.settings.push(setting);
    }

    /// Append several settings.
    pub fn add_all(&mut self, settings: impl IntoIterator<Item = Setting>) {
        self.settings.extend(settings);
    }

    /// Append settings from untyped `{name, value, group, flag}` records.
    ///
    /// Records that do not form a valid setting are skipped. Returns the
    /// number of settings added.
    pub fn add_all_records(&mut self, records: &[Value]) -> usize {
        let before = self.settings.len();
        for record in records {
            let setting = serde_json::from_value::<CacheEntry>(record.clone())
                .map_err(|e| EnvironautError::Other(e.into()))
                .and_then(CacheEntry::into_setting);
            match setting {
                Ok(setting) => self.settings.push(setting),
                Err(e) => tracing::debug!("Skipping invalid cache record {}: {}", record, e),
            }
        }
        self.settings.len() - before
    }

    /// Write every held setting to the write location.
    ///
    /// The file is written first and then restricted to owner read/write.
    ///
    /// # Errors
    ///
    /// Returns `EncodingError` if the settings cannot be serialized and
    /// `CacheWrite` if the file cannot be written.
    pub fn save(&self) -> Result<PathBuf> {
        let path = self.write_location();
        let entries: Vec<CacheEntry> = self.settings.iter().map(CacheEntry::from).collect();

        let encoded = if self.parameters.get_bool("pretty", false) {
            serde_json::to_string_pretty(&entries)
        } else {
            serde_json::to_string(&entries)
        }
        .map_err(|e| EnvironautError::EncodingError {
            message: e.to_string(),
        })?;

        let write_error = |source| EnvironautError::CacheWrite {
            path: path.clone(),
            source,
        };
        fs::write(&path, encoded).map_err(write_error)?;
        restrict_permissions(&path).map_err(write_error)?;

        tracing::info!("Saved {} settings to cache {}", entries.len(), path.display());
        Ok(path)
    }
}

impl SettingsCache for Cache {
    fn all_settings(&self) -> &[Setting] {
        &self.settings
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ReadOnlyCache;
    use crate::report::{GroupFilter, SettingFlag};
    use serde_json::json;
    use tempfile::TempDir;

    fn cache_in(temp: &TempDir) -> Cache {
        Cache::new(Parameters::from_value(&json!({
            "working_dir": temp.path().to_str().unwrap()
        })))
    }

    #[test]
    fn add_then_has() {
        let temp = TempDir::new().unwrap();
        let mut cache = cache_in(&temp);
        let setting = Setting::new("token", "abc")
            .unwrap()
            .with_group("api")
            .with_flag(SettingFlag::SENSITIVE);
        cache.add(setting);
        assert!(cache.has(
            "token",
            &GroupFilter::from("api"),
            Some(SettingFlag::SENSITIVE)
        ));
    }

    #[test]
    fn duplicates_are_retained() {
        let temp = TempDir::new().unwrap();
        let mut cache = cache_in(&temp);
        cache.add(Setting::new("a", 1).unwrap());
        cache.add(Setting::new("a", 2).unwrap());
        assert_eq!(cache.get_all(&GroupFilter::Any, None).len(), 2);
        assert_eq!(
            cache.get("a", &GroupFilter::Any, None).unwrap().value(),
            &json!(1)
        );
    }

    #[test]
    fn save_and_load_round_trip() {
        let temp = TempDir::new().unwrap();
        let mut cache = cache_in(&temp);
        let first = Setting::new("host", "db.local").unwrap().with_group("database");
        let second = Setting::new("ports", json!([80, 443]))
            .unwrap()
            .with_flag(SettingFlag::CACHE_ONLY);
        cache.add_all([first.clone(), second.clone()]);

        let path = cache.save().unwrap();
        assert_eq!(path, temp.path().join(".environaut.cache"));

        let mut reloaded = cache_in(&temp);
        assert!(reloaded.load().unwrap());
        assert_eq!(reloaded.all_settings(), &[first, second]);
    }

    #[cfg(unix)]
    #[test]
    fn save_restricts_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let mut cache = cache_in(&temp);
        cache.add(Setting::new("secret", "x").unwrap());
        let path = cache.save().unwrap();

        let mode = fs::metadata(path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn save_uses_write_location_parameter() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("write.cache");
        let mut cache = Cache::new(Parameters::from_value(&json!({
            "write_location": target.to_str().unwrap(),
            "location": temp.path().join("other.cache").to_str().unwrap(),
            "pretty": true
        })));
        cache.add(Setting::new("a", 1).unwrap());

        assert_eq!(cache.save().unwrap(), target);
        let content = fs::read_to_string(&target).unwrap();
        assert!(content.contains('\n'));

        let mut reader = ReadOnlyCache::new(Parameters::new());
        reader.set_location(&target).unwrap();
        assert!(reader.load().unwrap());
        assert!(reader.has("a", &GroupFilter::Any, None));
    }

    #[test]
    fn save_into_missing_directory_fails() {
        let temp = TempDir::new().unwrap();
        let mut cache = Cache::new(Parameters::from_value(&json!({
            "location": temp.path().join("missing/dir/x.cache").to_str().unwrap()
        })));
        cache.add(Setting::new("a", 1).unwrap());
        assert!(matches!(
            cache.save(),
            Err(EnvironautError::CacheWrite { .. })
        ));
    }

    #[test]
    fn set_location_rejects_missing_directory() {
        let temp = TempDir::new().unwrap();
        let mut cache = cache_in(&temp);
        assert!(cache.set_location(temp.path().join("a/b/c.cache")).is_err());
        assert!(cache.set_location(temp.path().join("c.cache")).is_ok());
    }

    #[test]
    fn add_all_records_skips_invalid() {
        let temp = TempDir::new().unwrap();
        let mut cache = cache_in(&temp);
        let added = cache.add_all_records(&[
            json!({"name": "ok", "value": 1, "group": "g", "flag": 1}),
            json!({"name": "", "value": 1, "group": "g", "flag": 1}),
            json!("not a record"),
            json!({"name": "partial"}),
        ]);
        assert_eq!(added, 1);
        assert!(cache.has("ok", &GroupFilter::from("g"), None));
    }

    #[test]
    fn load_corrupt_cache_fails() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".environaut.cache"), "[{").unwrap();
        let mut cache = cache_in(&temp);
        assert!(matches!(
            cache.load(),
            Err(EnvironautError::CorruptCache { .. })
        ));
    }
}
