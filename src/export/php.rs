//! PHP array-literal settings export.

use serde_json::{Map, Value};

use super::{grouped_settings, SettingsFormatter};
use crate::config::merge_into;
use crate::error::Result;
use crate::parameters::Parameters;
use crate::report::Report;
use crate::template::format_value;

const DEFAULT_TEMPLATE: &str = "<?php\n\nreturn %settings$s;\n";
const INDENT: &str = "    ";

/// Writes settings as a PHP file returning an array literal.
///
/// Parameters: `location`, `groups`, `template` (placeholder `%settings$s`),
/// `nested` (default `true`; `false` drops the group level).
#[derive(Debug, Clone, Default)]
pub struct PhpFormatter {
    parameters: Parameters,
}

impl PhpFormatter {
    pub const NAME: &'static str = "php";

    pub fn new(parameters: Parameters) -> Self {
        Self { parameters }
    }
}

impl SettingsFormatter for PhpFormatter {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn default_location(&self) -> &'static str {
        "environaut-config.php"
    }

    fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    fn render(&self, report: &Report) -> Result<String> {
        let grouped = report.settings_value(&self.groups()?);
        let settings = if self.parameters.get_bool("nested", true) {
            grouped
        } else {
            let mut flat = Value::Object(Map::new());
            for (_, name, value) in grouped_settings(&grouped) {
                let mut entry = Map::new();
                entry.insert(name.to_string(), value.clone());
                merge_into(&mut flat, &Value::Object(entry));
            }
            flat
        };

        let template = self.parameters.get_or("template", Value::from(DEFAULT_TEMPLATE));
        let mut args = Parameters::new();
        args.set("settings", php_literal(&settings, 0));
        format_value(&template, &args)
    }
}

/// Render a value as PHP source.
pub fn php_literal(value: &Value, depth: usize) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => php_string(s),
        Value::Array(items) if items.is_empty() => "[]".to_string(),
        Value::Object(map) if map.is_empty() => "[]".to_string(),
        Value::Array(items) => {
            let entries = items.iter().map(|item| php_literal(item, depth + 1));
            php_array(entries, depth)
        }
        Value::Object(map) => {
            let entries = map.iter().map(|(key, item)| {
                format!("{} => {}", php_string(key), php_literal(item, depth + 1))
            });
            php_array(entries, depth)
        }
    }
}

fn php_array(entries: impl Iterator<Item = String>, depth: usize) -> String {
    let inner = INDENT.repeat(depth + 1);
    let mut out = String::from("[\n");
    for entry in entries {
        out.push_str(&inner);
        out.push_str(&entry);
        out.push_str(",\n");
    }
    out.push_str(&INDENT.repeat(depth));
    out.push(']');
    out
}

fn php_string(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}
