//! Shell variable export.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

use super::{grouped_settings, SettingsFormatter};
use crate::error::{EnvironautError, Result};
use crate::parameters::Parameters;
use crate::report::Report;
use crate::template::{format_value, value_to_string};

const DEFAULT_TEMPLATE: &str = "%name$s='%value$s'\n";

/// Valid shell variable names.
static IDENTIFIER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("IDENTIFIER_REGEX must compile")
});

/// Writes settings as `NAME='value'` lines that can be sourced by a shell.
///
/// Parameters:
/// - `location`, `groups`
/// - `use_group_as_prefix` (default `false`) names variables `group_name`
/// - `capitalize_names` (default `true`) upper-cases the group prefix
/// - `template` (default `%name$s='%value$s'\n`) renders one line
#[derive(Debug, Clone, Default)]
pub struct ShellFormatter {
    parameters: Parameters,
}

impl ShellFormatter {
    pub const NAME: &'static str = "shell";

    pub fn new(parameters: Parameters) -> Self {
        Self { parameters }
    }

    /// Variable name for a setting.
    ///
    /// # Errors
    ///
    /// Returns `InvalidIdentifier` if the result is not a valid shell
    /// variable name.
    pub fn variable_name(&self, group: &str, name: &str) -> Result<String> {
        let variable = if self.parameters.get_bool("use_group_as_prefix", false) {
            let prefix = if self.parameters.get_bool("capitalize_names", true) {
                group.to_uppercase()
            } else {
                group.to_string()
            };
            format!("{}_{}", prefix, name)
        } else {
            name.to_string()
        };

        if IDENTIFIER_REGEX.is_match(&variable) {
            Ok(variable)
        } else {
            Err(EnvironautError::InvalidIdentifier { name: variable })
        }
    }
}

impl SettingsFormatter for ShellFormatter {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn default_location(&self) -> &'static str {
        "environaut-config.sh"
    }

    fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    fn render(&self, report: &Report) -> Result<String> {
        let template = self.parameters.get_or("template", Value::from(DEFAULT_TEMPLATE));
        let grouped = report.settings_value(&self.groups()?);

        let mut out = String::new();
        for (group, name, value) in grouped_settings(&grouped) {
            let mut args = Parameters::new();
            args.set("name", self.variable_name(group, name)?);
            args.set("value", escape_single_quotes(&shell_value(value)));
            args.set("group", group);
            out.push_str(&format_value(&template, &args)?);
        }
        Ok(out)
    }
}

/// Coerce a setting value to the text assigned to a shell variable.
fn shell_value(value: &Value) -> String {
    match value {
        Value::Array(items) => items
            .iter()
            .map(shell_value)
            .collect::<Vec<_>>()
            .join("\n"),
        other => value_to_string(other),
    }
}

/// Escape for use inside single quotes: `'` becomes `'\''`.
fn escape_single_quotes(value: &str) -> String {
    value.replace('\'', r"'\''")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{CheckResult, Setting};
    use serde_json::json;

    fn report_with(settings: Vec<Setting>) -> Report {
        let mut result = CheckResult::new("c");
        for setting in settings {
            result.add_setting(setting);
        }
        let mut report = Report::default();
        report.add_result(result);
        report
    }

    fn formatter(params: Value) -> ShellFormatter {
        ShellFormatter::new(Parameters::from_value(&params))
    }

    #[test]
    fn capitalized_group_prefix() {
        let report = report_with(vec![Setting::new("custom", true).unwrap().with_group("group")]);
        let f = formatter(json!({"use_group_as_prefix": true}));
        assert_eq!(f.render(&report).unwrap(), "GROUP_custom='1'\n");

        let f = formatter(json!({"use_group_as_prefix": true, "capitalize_names": false}));
        assert_eq!(f.render(&report).unwrap(), "group_custom='1'\n");
    }

    #[test]
    fn value_coercion() {
        let report = report_with(vec![
            Setting::new("yes", true).unwrap(),
            Setting::new("no", false).unwrap(),
            Setting::new("none", Value::Null).unwrap(),
            Setting::new("list", json!(["a", "b"])).unwrap(),
            Setting::new("quote", "it's").unwrap(),
        ]);
        assert_eq!(
            formatter(json!({})).render(&report).unwrap(),
            "yes='1'\nno=''\nnone=''\nlist='a\nb'\nquote='it'\\''s'\n"
        );
    }

    #[test]
    fn invalid_identifier_raises() {
        let report = report_with(vec![Setting::new("db-host", "x").unwrap()]);
        let err = formatter(json!({})).render(&report).unwrap_err();
        assert!(matches!(err, EnvironautError::InvalidIdentifier { ref name } if name == "db-host"));

        let report = report_with(vec![Setting::new("host", "x").unwrap().with_group("1db")]);
        let f = formatter(json!({"use_group_as_prefix": true}));
        assert!(f.render(&report).is_err());
    }

    #[test]
    fn custom_line_template() {
        let report = report_with(vec![Setting::new("host", "x").unwrap().with_group("db")]);
        let f = formatter(json!({"template": "export %name$s=\"%value$s\" # %group$s\n"}));
        assert_eq!(f.render(&report).unwrap(), "export host=\"x\" # db\n");
    }
}
