//! Static value check.

use super::{Check, CheckBase, CheckContext};
use crate::config::CheckDefinition;
use crate::error::Result;
use crate::report::{CheckResult, Severity};

/// Exports a configured value as a setting, or the cached one when an
/// earlier run stored it.
///
/// Parameters: `value`, plus the common check parameters.
#[derive(Debug, Clone)]
pub struct ValueCheck {
    base: CheckBase,
}

impl ValueCheck {
    pub const CLASS: &'static str = "value";

    pub fn new(definition: &CheckDefinition) -> Self {
        Self {
            base: CheckBase::new(definition),
        }
    }
}

impl Check for ValueCheck {
    fn name(&self) -> &str {
        self.base.name()
    }

    fn group(&self) -> &str {
        self.base.group()
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Result<CheckResult> {
        if let Some(result) = self.base.cached_result(ctx) {
            return Ok(result);
        }

        let mut result = CheckResult::new(self.name());
        match self.base.parameters().get("value") {
            Some(value) => {
                result.add_setting(self.base.setting(value.clone())?);
                result.add_message(self.base.message(
                    format!("Setting '{}' configured", self.base.setting_name()),
                    Severity::Info,
                ));
            }
            None => result.add_message(self.base.message(
                format!("No value configured for '{}'", self.base.setting_name()),
                Severity::Warn,
            )),
        }
        Ok(result)
    }
}
