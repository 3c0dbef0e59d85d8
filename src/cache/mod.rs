//! Settings cache.
//!
//! Cached settings let a later run reuse values instead of re-checking or
//! re-prompting. [`ReadOnlyCache`] only loads a persisted cache;
//! [`Cache`] can also accumulate settings and save them.
//!
//! The cache file is a JSON array of `{name, value, group, flag}` records.
//! Because cached settings may hold secrets, [`Cache::save`] restricts the
//! file to its owner.

pub mod entry;
pub mod read_only;
pub mod store;

pub use entry::CacheEntry;
pub use read_only::ReadOnlyCache;
pub use store::Cache;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{EnvironautError, Result};
use crate::parameters::Parameters;
use crate::report::{GroupFilter, Setting, SettingFlag};

/// File name of the cache inside the working directory.
pub const DEFAULT_CACHE_FILE: &str = ".environaut.cache";

/// Get the default cache location for the given parameters.
///
/// Uses `parameters["working_dir"]` when present, else the current
/// directory.
pub fn default_location(parameters: &Parameters) -> PathBuf {
    parameters
        .get_str("working_dir")
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
        .join(DEFAULT_CACHE_FILE)
}

/// Resolve the effective location: explicit, then the mode-specific
/// parameter, then `location`, then the default.
pub(crate) fn resolve_location(
    explicit: Option<&Path>,
    parameters: &Parameters,
    mode_key: &str,
) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| parameters.get_str(mode_key).map(PathBuf::from))
        .or_else(|| parameters.get_str("location").map(PathBuf::from))
        .unwrap_or_else(|| default_location(parameters))
}

/// Read-side queries shared by both cache flavours.
pub trait SettingsCache {
    /// Settings currently held, in insertion order.
    fn all_settings(&self) -> &[Setting];

    /// True if a setting matches all given criteria.
    fn has(&self, name: &str, groups: &GroupFilter, flag: Option<SettingFlag>) -> bool {
        self.get(name, groups, flag).is_some()
    }

    /// First setting matching all given criteria.
    fn get(&self, name: &str, groups: &GroupFilter, flag: Option<SettingFlag>) -> Option<&Setting> {
        self.all_settings()
            .iter()
            .find(|s| s.name() == name && s.matches_group(groups) && s.matches_flag(flag))
    }

    /// Every setting matching the criteria, in insertion order.
    fn get_all(&self, groups: &GroupFilter, flag: Option<SettingFlag>) -> Vec<&Setting> {
        self.all_settings()
            .iter()
            .filter(|s| s.matches_group(groups) && s.matches_flag(flag))
            .collect()
    }
}

/// True if `path` is an existing file we can open for reading.
pub(crate) fn is_readable(path: &Path) -> bool {
    path.is_file() && fs::File::open(path).is_ok()
}

/// True if `path` can be written: an existing writable file, or a missing
/// file in an existing, writable directory.
pub(crate) fn is_writable(path: &Path) -> bool {
    if path.exists() {
        return path.is_file() && fs::OpenOptions::new().append(true).open(path).is_ok();
    }
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    parent
        .metadata()
        .map(|m| m.is_dir() && !m.permissions().readonly())
        .unwrap_or(false)
}

/// Load settings from a cache file.
///
/// Returns `Ok(None)` if the file is missing or cannot be read.
///
/// # Errors
///
/// Returns `CorruptCache` if the file exists but does not decode.
pub(crate) fn read_settings(path: &Path) -> Result<Option<Vec<Setting>>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!("No cache read from {}: {}", path.display(), e);
            return Ok(None);
        }
    };

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Some(Vec::new()));
    }

    let corrupt = |message: String| EnvironautError::CorruptCache {
        path: path.to_path_buf(),
        message,
    };

    let entries: Vec<CacheEntry> =
        serde_json::from_slice(&bytes).map_err(|e| corrupt(e.to_string()))?;

    let settings = entries
        .into_iter()
        .map(|entry| entry.into_setting().map_err(|e| corrupt(e.to_string())))
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!("Loaded {} cached settings from {}", settings.len(), path.display());
    Ok(Some(settings))
}
