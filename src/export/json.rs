//! JSON settings export.

use super::SettingsFormatter;
use crate::error::{EnvironautError, Result};
use crate::parameters::Parameters;
use crate::report::Report;

/// Writes settings as a `{group: {name: value}}` JSON object.
///
/// Parameters: `location`, `groups`, `pretty` (default `true`).
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    parameters: Parameters,
}

impl JsonFormatter {
    pub const NAME: &'static str = "json";

    pub fn new(parameters: Parameters) -> Self {
        Self { parameters }
    }
}

impl SettingsFormatter for JsonFormatter {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn default_location(&self) -> &'static str {
        "environaut-config.json"
    }

    fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    fn render(&self, report: &Report) -> Result<String> {
        // Always an object, even when nothing was exported.
        let settings = report.settings_value(&self.groups()?);
        let encoded = if self.parameters.get_bool("pretty", true) {
            serde_json::to_string_pretty(&settings)
        } else {
            serde_json::to_string(&settings)
        };
        encoded.map_err(|e| EnvironautError::EncodingError {
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::STATUS_FAILED;
    use crate::report::{CheckResult, Setting};
    use serde_json::{json, Value};
    use std::fs;
    use tempfile::TempDir;

    fn formatter(params: Value) -> JsonFormatter {
        JsonFormatter::new(Parameters::from_value(&params))
    }

    #[test]
    fn empty_report_writes_empty_object() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.json");
        let f = formatter(json!({"location": path.to_str().unwrap()}));

        let status = f.format(&Report::default()).unwrap();
        assert!(!status.contains(STATUS_FAILED));
        assert_eq!(fs::read_to_string(path).unwrap(), "{}");
    }

    #[test]
    fn groups_filter_and_compact_output() {
        let mut result = CheckResult::new("c");
        result.add_setting(Setting::new("host", "db").unwrap().with_group("database"));
        result.add_setting(Setting::new("debug", false).unwrap());
        let mut report = Report::default();
        report.add_result(result);

        let f = formatter(json!({"groups": ["database"], "pretty": false}));
        assert_eq!(f.render(&report).unwrap(), r#"{"database":{"host":"db"}}"#);

        let all = formatter(json!({"pretty": false}));
        assert_eq!(
            all.render(&report).unwrap(),
            r#"{"database":{"host":"db"},"default":{"debug":false}}"#
        );
    }

    #[test]
    fn invalid_groups_raise() {
        let f = formatter(json!({"groups": 5}));
        assert!(matches!(
            f.render(&Report::default()),
            Err(EnvironautError::InvalidCriteria { .. })
        ));
    }

    #[test]
    fn default_location() {
        assert_eq!(
            formatter(json!({})).location(),
            std::path::PathBuf::from("environaut-config.json")
        );
    }
}
