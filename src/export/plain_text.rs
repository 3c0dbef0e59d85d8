//! Template-driven plain text export.

use super::{grouped_settings, SettingsFormatter};
use crate::error::{EnvironautError, Result};
use crate::parameters::Parameters;
use crate::report::Report;
use crate::template::format_value;

/// Renders a user-supplied template with every setting as a named
/// placeholder.
///
/// Parameters: `location`, `groups`, `template` (required),
/// `embed_group_path` (default `true`: placeholders are `group.name`,
/// otherwise the bare `name`).
///
/// ```text
/// DB_HOST=%database.host$s
/// DEBUG=%default.debug$d
/// ```
#[derive(Debug, Clone, Default)]
pub struct PlainTextFormatter {
    parameters: Parameters,
}

impl PlainTextFormatter {
    pub const NAME: &'static str = "plain";

    pub fn new(parameters: Parameters) -> Self {
        Self { parameters }
    }
}

impl SettingsFormatter for PlainTextFormatter {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn default_location(&self) -> &'static str {
        "environaut-config.txt"
    }

    fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    fn render(&self, report: &Report) -> Result<String> {
        let template = self
            .parameters
            .get("template")
            .filter(|t| !t.is_null())
            .ok_or_else(|| EnvironautError::NoTemplate {
                formatter: Self::NAME.to_string(),
            })?;

        let embed_group_path = self.parameters.get_bool("embed_group_path", true);
        let grouped = report.settings_value(&self.groups()?);
        let mut args = Parameters::new();
        for (group, name, value) in grouped_settings(&grouped) {
            let key = if embed_group_path {
                format!("{}.{}", group, name)
            } else {
                name.to_string()
            };
            args.set(key, value.clone());
        }

        format_value(template, &args)
    }
}
