//! Persisted cache record.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::report::{Setting, SettingFlag};

/// One setting as stored in the cache file.
///
/// Every record has exactly these four fields; anything else is treated as
/// a corrupt cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheEntry {
    pub name: String,
    pub value: Value,
    pub group: String,
    pub flag: u32,
}

impl CacheEntry {
    /// Turn the record back into a setting.
    ///
    /// # Errors
    ///
    /// Returns `EmptySettingName` if the record has no name.
    pub fn into_setting(self) -> Result<Setting> {
        Ok(Setting::new(self.name, self.value)?
            .with_group(self.group)
            .with_flag(SettingFlag::from_bits(self.flag)))
    }
}

impl From<&Setting> for CacheEntry {
    fn from(setting: &Setting) -> Self {
        Self {
            name: setting.name().to_string(),
            value: setting.value().clone(),
            group: setting.group().to_string(),
            flag: setting.flag().bits(),
        }
    }
}
