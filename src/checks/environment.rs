//! Environment variable check.

use serde_json::Value;

use super::{Check, CheckBase, CheckContext};
use crate::config::CheckDefinition;
use crate::error::Result;
use crate::report::{CheckResult, Severity};

type EnvLookup = fn(&str) -> Option<String>;

fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Exports the value of an environment variable.
///
/// Parameters:
/// - `variable` - variable to read (defaults to the check name)
/// - `default` - value used when the variable is unset
/// - `required` - report an error when unset and no default exists
#[derive(Clone)]
pub struct EnvironmentCheck {
    base: CheckBase,
    lookup: EnvLookup,
}

impl EnvironmentCheck {
    pub const CLASS: &'static str = "environment";

    pub fn new(definition: &CheckDefinition) -> Self {
        Self {
            base: CheckBase::new(definition),
            lookup: process_env,
        }
    }

    /// Replace the variable lookup.
    pub fn with_lookup(mut self, lookup: EnvLookup) -> Self {
        self.lookup = lookup;
        self
    }

    fn variable(&self) -> &str {
        self.base
            .parameters()
            .get_str("variable")
            .filter(|v| !v.is_empty())
            .unwrap_or(self.base.name())
    }
}

impl Check for EnvironmentCheck {
    fn name(&self) -> &str {
        self.base.name()
    }

    fn group(&self) -> &str {
        self.base.group()
    }

    fn run(&self, _ctx: &CheckContext<'_>) -> Result<CheckResult> {
        let variable = self.variable();
        let mut result = CheckResult::new(self.name());

        if let Some(value) = (self.lookup)(variable) {
            result.add_setting(self.base.setting(value)?);
            result.add_message(
                self.base
                    .message(format!("Environment variable {} is set", variable), Severity::Info),
            );
            return Ok(result);
        }

        let default = self
            .base
            .parameters()
            .get("default")
            .filter(|d| !d.is_null())
            .cloned();
        match default {
            Some(default) => {
                result.add_setting(self.base.setting(default)?);
                result.add_message(self.base.message(
                    format!("Environment variable {} is not set, using default", variable),
                    Severity::Notice,
                ));
            }
            None if self.base.parameters().get_bool("required", false) => {
                result.add_message(self.base.message(
                    format!("Required environment variable {} is not set", variable),
                    Severity::Error,
                ));
            }
            None => {
                result.add_setting(self.base.setting(Value::Null)?);
                result.add_message(self.base.message(
                    format!("Environment variable {} is not set", variable),
                    Severity::Warn,
                ));
            }
        }
        Ok(result)
    }
}
