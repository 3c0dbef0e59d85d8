//! Per-check results.

use serde_json::Value;

use super::message::{Message, Severity, SeverityMask};
use super::setting::{GroupFilter, Setting};
use crate::config::merger::merge_into;

/// Settings and messages produced by one check execution.
#[derive(Debug, Clone, Default)]
pub struct CheckResult {
    check: String,
    messages: Vec<Message>,
    settings: Vec<Setting>,
}

impl CheckResult {
    /// Create an empty result for the named check.
    pub fn new(check: impl Into<String>) -> Self {
        Self {
            check: check.into(),
            ..Default::default()
        }
    }

    /// Name of the check that produced this result.
    pub fn check(&self) -> &str {
        &self.check
    }

    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn add_setting(&mut self, setting: Setting) {
        self.settings.push(setting);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn settings(&self) -> &[Setting] {
        &self.settings
    }

    /// True if any message is at least as severe as `Error`.
    pub fn has_errors(&self) -> bool {
        let mask = SeverityMask::at_least(Severity::Error);
        self.messages.iter().any(|m| mask.contains(m.severity()))
    }

    /// Settings grouped as `{group: {name: value}}`, restricted to `groups`.
    ///
    /// Unknown groups produce an empty mapping.
    pub fn settings_value(&self, groups: &GroupFilter) -> Value {
        let mut grouped = Value::Object(Default::default());
        for setting in self.settings.iter().filter(|s| s.matches_group(groups)) {
            merge_into(&mut grouped, &setting.to_value());
        }
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn setting(name: &str, value: Value, group: &str) -> Setting {
        Setting::new(name, value).unwrap().with_group(group)
    }

    #[test]
    fn keeps_insertion_order_without_dedup() {
        let mut result = CheckResult::new("check");
        result.add_setting(setting("b", json!(1), "g"));
        result.add_setting(setting("a", json!(2), "g"));
        result.add_setting(setting("b", json!(3), "g"));

        let names: Vec<_> = result.settings().iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["b", "a", "b"]);
    }

    #[test]
    fn settings_value_groups_settings() {
        let mut result = CheckResult::new("check");
        result.add_setting(setting("host", json!("localhost"), "db"));
        result.add_setting(setting("debug", json!(true), "app"));

        assert_eq!(
            result.settings_value(&GroupFilter::Any),
            json!({"db": {"host": "localhost"}, "app": {"debug": true}})
        );
        assert_eq!(
            result.settings_value(&GroupFilter::from("app")),
            json!({"app": {"debug": true}})
        );
    }

    #[test]
    fn unknown_group_gives_empty_mapping() {
        let mut result = CheckResult::new("check");
        result.add_setting(setting("host", json!("localhost"), "db"));
        assert_eq!(result.settings_value(&GroupFilter::from("nope")), json!({}));
    }

    #[test]
    fn has_errors_looks_at_severity() {
        let mut result = CheckResult::new("check");
        result.add_message(Message::new("x", "fine", Severity::Info));
        assert!(!result.has_errors());
        result.add_message(Message::new("x", "broken", Severity::Error));
        assert!(result.has_errors());
    }
}
