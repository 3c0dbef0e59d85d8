//! XML settings export.

use serde_json::{Map, Value};

use super::SettingsFormatter;
use crate::error::Result;
use crate::parameters::Parameters;
use crate::report::Report;
use crate::template::{format_value, value_to_string};

const FILE_TEMPLATE: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<environaut>\n%groups$s</environaut>\n";
const GROUP_TEMPLATE: &str = "    <settings prefix=\"%group$s.\">\n%settings$s    </settings>\n";
const SETTING_TEMPLATE: &str = "        <setting name=\"%name$s\">%value$s</setting>\n";

/// Writes settings as nested `<settings>` / `<setting>` elements.
///
/// Parameters: `location`, `groups` and three templates:
/// - `file_template` with `%groups$s`
/// - `group_template` with `%group$s` and `%settings$s`
/// - `setting_template` with `%name$s`, `%value$s` and `%group$s`
#[derive(Debug, Clone, Default)]
pub struct XmlFormatter {
    parameters: Parameters,
}

impl XmlFormatter {
    pub const NAME: &'static str = "xml";

    pub fn new(parameters: Parameters) -> Self {
        Self { parameters }
    }

    fn template(&self, key: &str, default: &str) -> Value {
        self.parameters.get_or(key, Value::from(default))
    }
}

impl SettingsFormatter for XmlFormatter {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn default_location(&self) -> &'static str {
        "environaut-config.xml"
    }

    fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    fn render(&self, report: &Report) -> Result<String> {
        let file_template = self.template("file_template", FILE_TEMPLATE);
        let group_template = self.template("group_template", GROUP_TEMPLATE);
        let setting_template = self.template("setting_template", SETTING_TEMPLATE);

        let grouped = report.settings_value(&self.groups()?);
        let empty = Map::new();
        let mut groups = String::new();
        for (group, settings) in grouped.as_object().unwrap_or(&empty) {
            let group = escape(group);
            let mut rendered = String::new();
            for (name, value) in settings.as_object().unwrap_or(&empty) {
                let mut args = Parameters::new();
                args.set("name", escape(name));
                args.set("value", escape(&xml_value(value)));
                args.set("group", group.as_str());
                rendered.push_str(&format_value(&setting_template, &args)?);
            }

            let mut args = Parameters::new();
            args.set("group", group.as_str());
            args.set("settings", rendered);
            groups.push_str(&format_value(&group_template, &args)?);
        }

        let mut args = Parameters::new();
        args.set("groups", groups);
        format_value(&file_template, &args)
    }
}

fn xml_value(value: &Value) -> String {
    match value {
        Value::Bool(b) => b.to_string(),
        other => value_to_string(other),
    }
}

/// Strip control characters (other than tab and newlines) and escape
/// markup characters.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            '\t' | '\n' | '\r' => out.push(c),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{CheckResult, Setting};
    use serde_json::json;

    fn report() -> Report {
        let mut result = CheckResult::new("c");
        result.add_setting(Setting::new("host", "a<b>&\"c\"\u{7}").unwrap().with_group("db"));
        result.add_setting(Setting::new("debug", false).unwrap());
        let mut report = Report::default();
        report.add_result(result);
        report
    }

    #[test]
    fn default_templates() {
        let f = XmlFormatter::new(Parameters::new());
        assert_eq!(
            f.render(&report()).unwrap(),
            concat!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
                "<environaut>\n",
                "    <settings prefix=\"db.\">\n",
                "        <setting name=\"host\">a&lt;b&gt;&amp;&quot;c&quot;</setting>\n",
                "    </settings>\n",
                "    <settings prefix=\"default.\">\n",
                "        <setting name=\"debug\">false</setting>\n",
                "    </settings>\n",
                "</environaut>\n"
            )
        );
    }

    #[test]
    fn custom_templates_and_groups() {
        let f = XmlFormatter::new(Parameters::from_value(&json!({
            "groups": ["default"],
            "file_template": "<root>%groups$s</root>",
            "group_template": "<g id=\"%group$s\">%settings$s</g>",
            "setting_template": "<%name$s>%value$s</%name$s>"
        })));
        assert_eq!(
            f.render(&report()).unwrap(),
            "<root><g id=\"default\"><debug>false</debug></g></root>"
        );
    }

    #[test]
    fn output_is_well_formed() {
        let xml = XmlFormatter::new(Parameters::new()).render(&report()).unwrap();
        let doc = roxmltree::Document::parse(&xml).unwrap();
        let setting = doc
            .descendants()
            .find(|n| n.attribute("name") == Some("host"))
            .unwrap();
        assert_eq!(setting.text(), Some("a<b>&\"c\""));
    }
}
