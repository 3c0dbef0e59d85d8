//! Built-in, non-interactive checks.
//!
//! A check inspects one aspect of the environment and produces a
//! [`CheckResult`] of messages and settings. Checks are constructed from
//! [`CheckDefinition`]s through the [`crate::registry::CheckRegistry`].
//!
//! Common parameters understood by every built-in check:
//! - `setting_name` - name of the produced setting (defaults to the check name)
//! - `sensitive` - flag the produced setting as sensitive
//! - `cache_only` - flag the produced setting as cache-only
//! - `use_cache` - reuse a cached setting when present (default `true`)

pub mod environment;
pub mod executable;
pub mod value;

pub use environment::EnvironmentCheck;
pub use executable::ExecutableCheck;
pub use value::ValueCheck;

use serde_json::Value;

use crate::cache::SettingsCache;
use crate::config::CheckDefinition;
use crate::error::Result;
use crate::parameters::Parameters;
use crate::report::{CheckResult, GroupFilter, Message, Setting, SettingFlag, Severity};

/// What a running check may consult.
#[derive(Default, Clone, Copy)]
pub struct CheckContext<'a> {
    /// Settings cached by an earlier run.
    pub cache: Option<&'a dyn SettingsCache>,
}

impl<'a> CheckContext<'a> {
    pub fn new(cache: Option<&'a dyn SettingsCache>) -> Self {
        Self { cache }
    }
}

/// One configured environment check.
pub trait Check {
    /// Name the check was configured with.
    fn name(&self) -> &str;

    /// Group the check's settings and messages belong to.
    fn group(&self) -> &str;

    /// Run the check.
    ///
    /// # Errors
    ///
    /// Returns an error only for failures that should abort the run; failed
    /// expectations are reported as messages in the result.
    fn run(&self, ctx: &CheckContext<'_>) -> Result<CheckResult>;
}

/// Name, group and parameters shared by the built-in checks.
#[derive(Debug, Clone)]
pub struct CheckBase {
    name: String,
    group: String,
    parameters: Parameters,
}

impl CheckBase {
    pub fn new(definition: &CheckDefinition) -> Self {
        Self {
            name: definition.name.clone(),
            group: definition.group.clone(),
            parameters: definition.parameters.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Name of the setting this check produces.
    pub fn setting_name(&self) -> &str {
        self.parameters
            .get_str("setting_name")
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.name)
    }

    /// Flag from the `sensitive` / `cache_only` parameters.
    pub fn setting_flag(&self) -> SettingFlag {
        let mut flag = SettingFlag::NORMAL;
        if self.parameters.get_bool("sensitive", false) {
            flag = SettingFlag::SENSITIVE;
        }
        if self.parameters.get_bool("cache_only", false) {
            flag = flag.union(SettingFlag::CACHE_ONLY);
        }
        flag
    }

    /// Build the setting this check produces.
    pub fn setting(&self, value: impl Into<Value>) -> Result<Setting> {
        Ok(Setting::new(self.setting_name(), value)?
            .with_group(self.group.as_str())
            .with_flag(self.setting_flag()))
    }

    /// A message in this check's group.
    pub fn message(&self, text: impl Into<String>, severity: Severity) -> Message {
        Message::new(self.name.as_str(), text, severity).with_group(self.group.as_str())
    }

    /// A previously cached setting for this check, when caching is enabled.
    pub fn cached<'c>(&self, ctx: &CheckContext<'c>) -> Option<&'c Setting> {
        if !self.parameters.get_bool("use_cache", true) {
            return None;
        }
        let cache = ctx.cache?;
        cache.get(
            self.setting_name(),
            &GroupFilter::from(self.group.as_str()),
            None,
        )
    }

    /// Start a result, seeded from the cache when possible.
    ///
    /// Returns `None` when no cached setting exists.
    pub fn cached_result(&self, ctx: &CheckContext<'_>) -> Option<CheckResult> {
        let setting = self.cached(ctx)?;
        tracing::debug!("Check '{}' uses cached setting '{}'", self.name, setting.name());
        let mut result = CheckResult::new(self.name.as_str());
        result.add_message(self.message(
            format!("Using cached value for '{}'", setting.name()),
            Severity::Info,
        ));
        result.add_setting(setting.clone());
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::Cache;
    use serde_json::json;

    fn definition(params: Value) -> CheckDefinition {
        CheckDefinition {
            name: "mode".to_string(),
            class: "value".to_string(),
            group: "app".to_string(),
            parameters: Parameters::from_value(&params),
        }
    }

    #[test]
    fn setting_uses_name_group_and_flag() {
        let base = CheckBase::new(&definition(json!({"sensitive": true})));
        let setting = base.setting("dev").unwrap();
        assert_eq!(setting.name(), "mode");
        assert_eq!(setting.group(), "app");
        assert_eq!(setting.flag(), SettingFlag::SENSITIVE);
    }

    #[test]
    fn setting_name_override_and_cache_only() {
        let base = CheckBase::new(&definition(json!({
            "setting_name": "app_mode",
            "cache_only": "yes"
        })));
        let setting = base.setting(1).unwrap();
        assert_eq!(setting.name(), "app_mode");
        assert!(setting.flag().matches(SettingFlag::CACHE_ONLY));
        assert!(setting.flag().matches(SettingFlag::NORMAL));
    }

    #[test]
    fn cached_lookup_respects_group_and_use_cache() {
        let mut cache = Cache::default();
        cache.add(Setting::new("mode", "prod").unwrap().with_group("app"));
        cache.add(Setting::new("mode", "other").unwrap().with_group("elsewhere"));
        let ctx = CheckContext::new(Some(&cache));

        let base = CheckBase::new(&definition(json!({})));
        assert_eq!(base.cached(&ctx).unwrap().value(), &json!("prod"));

        let disabled = CheckBase::new(&definition(json!({"use_cache": false})));
        assert!(disabled.cached(&ctx).is_none());
        assert!(base.cached(&CheckContext::default()).is_none());
    }
}
